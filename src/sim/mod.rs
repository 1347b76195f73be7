//! Deterministic simulation core: entities, the session that steps them, and
//! the snapshot handed to presentation.

pub mod asteroid;
pub mod bullet;
pub mod entity;
pub mod input;
pub mod player;
pub mod session;
pub mod snapshot;
pub mod vector;

pub use asteroid::{Asteroid, AsteroidSize};
pub use bullet::Bullet;
pub use entity::{Body, Entity, EntityId, Kind};
pub use input::Intents;
pub use player::Player;
pub use session::GameSession;
pub use snapshot::{EntityView, Shape, Snapshot};
pub use vector::Vector2;

/// Side length of the square, toroidal play-field in world units.
pub const WORLD_SIZE: f64 = 550.0;
