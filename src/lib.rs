pub mod core;
pub mod emulator;
pub mod envs;
pub mod rollout;
pub mod spaces;
pub mod utils;
pub mod wrappers;

pub use crate::core::{ConfigurationError, Env, EnvError, Info, InfoValue, Result, Step, TeardownError};
pub use crate::emulator::{Button, EmulatorHandle, ScriptedEmulator, SnapshotLoadError};
pub use crate::envs::{ActionInput, ActionSet, NavigationConfig, NavigationEnv, Observation, Position};
pub use crate::rollout::{evaluate, run_episode, EpisodeSummary, Evaluation, Policy, RandomPolicy, Trajectory};
pub use crate::spaces::{BoxSpace, Discrete, Space};
pub use crate::wrappers::{RecordEpisodeStatistics, TransformObservation};
