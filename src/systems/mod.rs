//! The Entity-Component-System (ECS) module.
//!
//! This module contains the per-tick rules: components, resources and the systems that
//! move entities and apply scoring and stage transitions.

pub mod collision;
pub mod components;
pub mod ghost;
pub mod item;
pub mod player;
pub mod stage;
pub mod vulnerable;

pub use self::collision::*;
pub use self::components::*;
pub use self::ghost::*;
pub use self::item::*;
pub use self::player::*;
pub use self::stage::*;
pub use self::vulnerable::*;
