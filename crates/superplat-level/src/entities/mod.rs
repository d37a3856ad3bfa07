//! Concrete level objects. Each submodule pairs a [`Behavior`] with the
//! constructor functions that build its [`Entity`].
//!
//! [`Behavior`]: crate::behavior::Behavior
//! [`Entity`]: crate::behavior::Entity

pub mod block;
pub mod enemy;
pub mod finish;
pub mod item;
pub mod player;
