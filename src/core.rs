// Core traits and types shared by every environment in the crate.

use std::path::PathBuf;

/// A small ordered info map returned alongside observations.
/// Navigation steps return it empty; wrappers add episode statistics to it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Info {
    entries: Vec<(String, InfoValue)>,
}

impl Info {
    pub fn new() -> Self { Self { entries: Vec::new() } }

    /// Insert a key, replacing any previous value under the same key.
    pub fn insert<K: Into<String>>(&mut self, key: K, value: InfoValue) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&InfoValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &InfoValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn len(&self) -> usize { self.entries.len() }
}

/// Value types that can live in an [`Info`] map.
#[derive(Clone, Debug, PartialEq)]
pub enum InfoValue {
    Bool(bool),
    I64(i64),
    U64(u64),
    F64(f64),
    Str(String),
}

impl From<bool> for InfoValue { fn from(v: bool) -> Self { InfoValue::Bool(v) } }
impl From<i64> for InfoValue { fn from(v: i64) -> Self { InfoValue::I64(v) } }
impl From<u64> for InfoValue { fn from(v: u64) -> Self { InfoValue::U64(v) } }
impl From<f64> for InfoValue { fn from(v: f64) -> Self { InfoValue::F64(v) } }
impl From<f32> for InfoValue { fn from(v: f32) -> Self { InfoValue::F64(v as f64) } }
impl From<&str> for InfoValue { fn from(v: &str) -> Self { InfoValue::Str(v.to_string()) } }
impl From<String> for InfoValue { fn from(v: String) -> Self { InfoValue::Str(v) } }

/// The outcome of a single `Env::step`.
#[derive(Clone, Debug, PartialEq)]
pub struct Step<Obs> {
    pub observation: Obs,
    pub reward: f32,
    pub terminated: bool,
    pub truncated: bool,
    pub info: Info,
}

impl<Obs> Step<Obs> {
    pub fn new(observation: Obs, reward: f32, terminated: bool, truncated: bool, info: Info) -> Self {
        Self { observation, reward, terminated, truncated, info }
    }

    /// True when the driver should stop stepping and call `reset`.
    pub fn is_done(&self) -> bool { self.terminated || self.truncated }
}

/// Misconfiguration of the caller or deployment. Never retried.
#[derive(thiserror::Error, Debug)]
pub enum ConfigurationError {
    #[error("snapshot file not found: {}", .0.display())]
    MissingSnapshot(PathBuf),
    #[error("failed to read snapshot {}: {source}", .path.display())]
    UnreadableSnapshot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("emulator rejected snapshot {}: {reason}", .path.display())]
    SnapshotRejected { path: PathBuf, reason: String },
    #[error("action index {index} is out of range for an action vocabulary of {size}")]
    InvalidAction { index: usize, size: usize },
    #[error("action batch is empty")]
    EmptyActionBatch,
    #[error("action index must be non-negative, got {0}")]
    NegativeAction(i64),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Failure while an emulator releases its resources.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("emulator failed to stop: {0}")]
pub struct TeardownError(pub String);

/// Errors surfaced by environment operations.
#[derive(thiserror::Error, Debug)]
pub enum EnvError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Teardown(#[from] TeardownError),
}

pub type Result<T> = std::result::Result<T, EnvError>;

/// Sequential decision process contract consumed by training and evaluation drivers.
pub trait Env {
    type Obs;
    type Act;

    /// Start a new episode. The seed is optional; environments without
    /// stochastic initial states may only record it.
    fn reset(&mut self, seed: Option<u64>) -> Result<(Self::Obs, Info)>;

    /// Apply an action and advance the environment by one step.
    fn step(&mut self, action: Self::Act) -> Result<Step<Self::Obs>>;

    /// Release external resources. Must not fail.
    fn close(&mut self) {}
}
