use std::time::Duration;

/// Longest frame the integrator will step in one go (~24 FPS).
pub const MAX_FRAME_TIME: Duration = Duration::from_millis(41);

/// Cap a measured frame time so a slow frame cannot produce a huge physics step.
pub fn clamp_frame_time(elapsed: Duration, max: Duration) -> Duration {
    elapsed.min(max)
}

/// Physics step in seconds for a measured frame time.
pub fn delta_seconds(elapsed: Duration, max: Duration) -> f32 {
    clamp_frame_time(elapsed, max).as_secs_f32()
}
