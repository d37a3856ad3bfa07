pub mod behavior;
pub mod body;
pub mod broadphase;
pub mod bump;
pub mod config;
pub mod context;
pub mod entities;
pub mod event;
pub mod layout;
pub mod level;
pub mod physics;
pub mod score;
pub mod tile;

pub use behavior::{Behavior, Entity, Kind, Reaction};
pub use body::{Body, Facing};
pub use config::{LevelConfig, PhysicsConfig};
pub use entities::player::PlayerInput;
pub use event::{LevelEvent, SizeState};
pub use layout::LevelLayout;
pub use level::Level;
