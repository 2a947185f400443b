pub mod action;
pub mod config;
pub mod navigation;
pub mod observation;

pub use action::{ActionInput, ActionSet};
pub use config::{NavigationConfig, RewardConfig, SpeedPolicy, DEFAULT_GOALS};
pub use navigation::{EpisodeState, NavigationEnv};
pub use observation::{MemoryMap, Observation, ObservationSpace, Position, OBSERVATION_KEY};
