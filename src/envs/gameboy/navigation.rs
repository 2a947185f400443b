use std::collections::HashSet;

use crate::core::{ConfigurationError, Env, Info, Result, Step, TeardownError};
use crate::emulator::EmulatorHandle;
use crate::spaces::Discrete;
use super::action::{ActionInput, ActionSet};
use super::config::NavigationConfig;
use super::observation::{Observation, ObservationSpace, Position};

/// Per-episode bookkeeping. Cleared on every reset.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EpisodeState {
    elapsed_ticks: u64,
    visited_map_ids: HashSet<u8>,
    // Tracked for parity; reward and termination never read it.
    visited_positions: HashSet<Position>,
    last_position: Option<Position>,
}

impl EpisodeState {
    pub fn elapsed_ticks(&self) -> u64 { self.elapsed_ticks }
    pub fn visited_map_ids(&self) -> &HashSet<u8> { &self.visited_map_ids }
    pub fn visited_positions(&self) -> &HashSet<Position> { &self.visited_positions }
    pub fn last_position(&self) -> Option<Position> { self.last_position }

    fn clear(&mut self) {
        self.elapsed_ticks = 0;
        self.visited_map_ids.clear();
        self.visited_positions.clear();
    }

    fn record(&mut self, position: Position) {
        self.visited_map_ids.insert(position.map_id);
        self.visited_positions.insert(position);
        self.last_position = Some(position);
    }
}

/// Episodic navigation over a Game Boy emulator.
///
/// Observation: `info = [x, y, map_id, orientation]`
/// Action space: `Discrete(n)` over the configured buttons, index 0 confirms.
/// Reward: step cost, plus a bonus on the first visit of each map, plus a goal
/// bonus when standing on a goal tile and pressing confirm.
/// Terminates on the goal condition; truncates once the tick budget is spent.
pub struct NavigationEnv<E: EmulatorHandle> {
    emulator: E,
    config: NavigationConfig,
    action_space: Discrete,
    observation_space: ObservationSpace,
    state: EpisodeState,
    seed: Option<u64>,
}

impl<E: EmulatorHandle> NavigationEnv<E> {
    /// Take ownership of the emulator, apply the speed policy and load the
    /// starting snapshot.
    pub fn new(emulator: E, config: NavigationConfig) -> Result<Self> {
        config.validate()?;
        let action_space = config.actions.space();
        let mut env = Self {
            emulator,
            config,
            action_space,
            observation_space: ObservationSpace::default(),
            state: EpisodeState::default(),
            seed: None,
        };
        if !env.config.debug {
            let multiplier = env.config.speed.multiplier(env.config.render);
            env.emulator.set_emulation_speed(multiplier);
        }
        env.load_snapshot()?;
        Ok(env)
    }

    pub fn config(&self) -> &NavigationConfig { &self.config }
    pub fn actions(&self) -> &ActionSet { &self.config.actions }
    pub fn action_space(&self) -> &Discrete { &self.action_space }
    pub fn observation_space(&self) -> &ObservationSpace { &self.observation_space }
    pub fn episode(&self) -> &EpisodeState { &self.state }
    pub fn seed(&self) -> Option<u64> { self.seed }
    pub fn emulator(&self) -> &E { &self.emulator }
    pub fn emulator_mut(&mut self) -> &mut E { &mut self.emulator }

    /// Current position, read straight from emulator memory.
    pub fn position(&self) -> Position { self.config.memory_map.read_position(&self.emulator) }

    pub fn observe(&self) -> Observation { Observation::from(self.position()) }

    /// Stop the emulator and report the outcome. [`Env::close`] discards it.
    pub fn shutdown(&mut self) -> std::result::Result<(), TeardownError> { self.emulator.stop() }

    fn load_snapshot(&mut self) -> Result<()> {
        let path = &self.config.snapshot_path;
        if !path.exists() {
            return Err(ConfigurationError::MissingSnapshot(path.clone()).into());
        }
        let bytes = std::fs::read(path)
            .map_err(|source| ConfigurationError::UnreadableSnapshot { path: path.clone(), source })?;
        self.emulator
            .load_snapshot(&bytes)
            .map_err(|e| ConfigurationError::SnapshotRejected { path: path.clone(), reason: e.to_string() })?;
        log::debug!("loaded snapshot {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }
}

impl<E: EmulatorHandle> Env for NavigationEnv<E> {
    type Obs = Observation;
    type Act = ActionInput;

    fn reset(&mut self, seed: Option<u64>) -> Result<(Self::Obs, Info)> {
        if seed.is_some() {
            self.seed = seed;
        }
        self.load_snapshot()?;
        self.state.clear();
        log::debug!("episode reset (seed: {:?})", self.seed);
        Ok((self.observe(), Info::new()))
    }

    fn step(&mut self, action: Self::Act) -> Result<Step<Self::Obs>> {
        let index = action.to_index()?;
        let button = self.config.actions.button(index)?;

        self.emulator.press_button(button);
        for _ in 0..self.config.ticks_per_step {
            self.emulator.tick();
            self.state.elapsed_ticks += 1;
        }

        let position = self.position();
        let new_map = !self.state.visited_map_ids.contains(&position.map_id);
        let goal_reached = index == ActionSet::CONFIRM && self.config.is_goal(&position);
        let reward = self.config.reward.reward(new_map, goal_reached);
        self.state.record(position);

        if new_map {
            log::debug!("first visit to map {} at tick {}", position.map_id, self.state.elapsed_ticks);
        }
        let terminated = goal_reached;
        let truncated = self.state.elapsed_ticks >= self.config.max_gameplay_time;
        if terminated {
            log::info!("goal {:?} reached after {} ticks", position, self.state.elapsed_ticks);
        }
        if truncated {
            log::info!("episode truncated at {} ticks", self.state.elapsed_ticks);
        }

        Ok(Step::new(Observation::from(position), reward, terminated, truncated, Info::new()))
    }

    fn close(&mut self) {
        if let Err(e) = self.shutdown() {
            log::warn!("ignoring emulator teardown failure: {e}");
        }
    }
}
