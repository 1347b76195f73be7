//! Asteroids as a fixed-step simulation.
//!
//! [`sim`] holds the deterministic game core and [`clock`] the scheduler that
//! turns wall time into ticks. The terminal front end in the binary only
//! feeds [`sim::Intents`] in and draws [`sim::Snapshot`]s out.

pub mod clock;
pub mod sim;

pub use clock::{Clock, MAX_TICKS_PER_FRAME};
pub use sim::{GameSession, Intents, Snapshot, WORLD_SIZE};
