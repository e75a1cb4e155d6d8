//! The multi-agent environment surface.
//!
//! - `action`: player moves and the intensity-to-bid mapping
//! - `observation`: per-seat snapshots and their spaces
//! - `engine`: the reset/step/observe state machine

pub mod action;
pub mod engine;
pub mod observation;

pub use action::{bid_for_intensity, Action};
pub use engine::{HighSocietyEnv, Info};
pub use observation::{ActionSpace, BoxSpace, Observation, ObservationSpace, FIELD_NAMES};
