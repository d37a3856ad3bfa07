use superplat_core::collision::Axis;

use crate::body::Body;

/// What the integrator needs from whoever owns the bodies.
pub trait CollisionWorld {
    type Handle: Copy;

    fn body_mut(&mut self, handle: Self::Handle) -> Option<&mut Body>;

    /// Test `mover` against its broad-phase candidates on `axis` and dispatch hits.
    fn test_collisions(&mut self, mover: Self::Handle, axis: Axis);

    /// Horizontal extent of the level in world units.
    fn level_width(&self) -> f32;
}

/// Clamp `v` to `[-limit, limit]`.
fn clamp_speed(v: f32, limit: f32) -> f32 {
    let limit = limit.abs();
    v.max(-limit).min(limit)
}

fn tests_itself(body: &Body) -> bool {
    body.collidable && body.checks_own_collisions
}

/// Advance one body by `dt` seconds.
///
/// X moves and resolves before Y, so grounded state is only decided once the
/// horizontal position for the tick is final. Collision tests always see bounds
/// resynced from the position they were triggered by.
pub fn apply_physics<W: CollisionWorld>(world: &mut W, handle: W::Handle, dt: f32) {
    let Some(body) = world.body_mut(handle) else {
        return;
    };
    body.sync_bounds();
    body.snapshot_bounds();

    // Horizontal phase
    body.velocity.x = clamp_speed(body.velocity.x, body.terminal_velocity.x);
    body.position.x += body.velocity.x * dt;
    body.sync_bounds();
    if tests_itself(body) {
        world.test_collisions(handle, Axis::X);
    }

    // Vertical phase
    let Some(body) = world.body_mut(handle) else {
        return;
    };
    body.velocity.y += body.gravity * dt;
    body.velocity.y = clamp_speed(body.velocity.y, body.terminal_velocity.y);
    body.position.y += body.velocity.y * dt;
    body.sync_bounds();
    if tests_itself(body) {
        world.test_collisions(handle, Axis::Y);
    }

    let level_width = world.level_width();
    if let Some(body) = world.body_mut(handle) {
        keep_in_bounds(body, level_width);
    }
}

/// Clamp a collidable body horizontally into `[0, level_width - width]`.
///
/// Non-collidable bodies (a dying player) are left alone.
pub fn keep_in_bounds(body: &mut Body, level_width: f32) {
    if !body.collidable {
        return;
    }
    let max_x = (level_width - body.width as f32).max(0.0);
    let clamped = body.position.x.clamp(0.0, max_x);
    if clamped != body.position.x {
        body.position.x = clamped;
        body.velocity.x = 0.0;
        body.sync_bounds();
    }
}
