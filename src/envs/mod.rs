pub mod gameboy;

pub use gameboy::{ActionInput, ActionSet, NavigationConfig, NavigationEnv, Observation, Position};
