// Immutable configuration for the navigation environment.

use std::path::{Path, PathBuf};

use crate::core::ConfigurationError;
use super::action::ActionSet;
use super::observation::{MemoryMap, Position};

/// Default goal tiles `(x, y, map_id, orientation)` for the bundled memory map.
pub const DEFAULT_GOALS: [Position; 3] = [
    Position::new(16, 8, 80, 1),
    Position::new(17, 9, 80, 2),
    Position::new(16, 10, 80, 0),
];

/// Reward terms. All contributions are additive.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardConfig {
    /// Applied on every step.
    pub step_cost: f32,
    /// First time a map id is seen in an episode.
    pub new_map_bonus: f32,
    /// Goal tile reached with the confirm action.
    pub goal_bonus: f32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self { step_cost: -0.001, new_map_bonus: 1.0, goal_bonus: 10.0 }
    }
}

impl RewardConfig {
    pub fn reward(&self, new_map: bool, goal_reached: bool) -> f32 {
        let mut reward = self.step_cost;
        if new_map {
            reward += self.new_map_bonus;
        }
        if goal_reached {
            reward += self.goal_bonus;
        }
        reward
    }
}

/// Emulation speed multipliers. Left untouched entirely in debug mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpeedPolicy {
    pub headless: u32,
    pub rendered: u32,
}

impl Default for SpeedPolicy {
    fn default() -> Self { Self { headless: 60, rendered: 3 } }
}

impl SpeedPolicy {
    pub fn multiplier(&self, render: bool) -> u32 {
        if render { self.rendered } else { self.headless }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NavigationConfig {
    pub actions: ActionSet,
    pub goals: Vec<Position>,
    /// Episode budget in emulator ticks.
    pub max_gameplay_time: u64,
    pub ticks_per_step: u32,
    pub snapshot_path: PathBuf,
    pub memory_map: MemoryMap,
    pub reward: RewardConfig,
    pub speed: SpeedPolicy,
    pub debug: bool,
    pub render: bool,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            actions: ActionSet::default(),
            goals: DEFAULT_GOALS.to_vec(),
            max_gameplay_time: 1_080_000,
            ticks_per_step: 60,
            snapshot_path: PathBuf::from("data/zero_state.state"),
            memory_map: MemoryMap::default(),
            reward: RewardConfig::default(),
            speed: SpeedPolicy::default(),
            debug: false,
            render: false,
        }
    }
}

impl NavigationConfig {
    pub fn with_snapshot_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.snapshot_path = path.as_ref().to_path_buf();
        self
    }

    pub fn with_max_gameplay_time(mut self, ticks: u64) -> Self {
        self.max_gameplay_time = ticks;
        self
    }

    pub fn with_ticks_per_step(mut self, ticks: u32) -> Self {
        self.ticks_per_step = ticks;
        self
    }

    pub fn with_goals<I: IntoIterator<Item = Position>>(mut self, goals: I) -> Self {
        self.goals = goals.into_iter().collect();
        self
    }

    pub fn with_actions(mut self, actions: ActionSet) -> Self {
        self.actions = actions;
        self
    }

    pub fn with_memory_map(mut self, memory_map: MemoryMap) -> Self {
        self.memory_map = memory_map;
        self
    }

    pub fn with_reward(mut self, reward: RewardConfig) -> Self {
        self.reward = reward;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_render(mut self, render: bool) -> Self {
        self.render = render;
        self
    }

    pub fn is_goal(&self, position: &Position) -> bool { self.goals.contains(position) }

    /// Check values that would make the environment unusable. Snapshot
    /// existence is checked at load time instead.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.actions.is_empty() {
            return Err(ConfigurationError::InvalidConfig("action vocabulary must not be empty".into()));
        }
        if self.ticks_per_step == 0 {
            return Err(ConfigurationError::InvalidConfig("ticks_per_step must be at least 1".into()));
        }
        Ok(())
    }
}
