// Action vocabulary and normalization of driver-provided actions.

use crate::core::ConfigurationError;
use crate::emulator::Button;
use crate::spaces::Discrete;

/// Ordered list of buttons an agent may press. Index 0 is the confirm button.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ActionSet {
    buttons: Vec<Button>,
}

impl Default for ActionSet {
    fn default() -> Self {
        Self { buttons: vec![Button::A, Button::B, Button::Left, Button::Right, Button::Up, Button::Down] }
    }
}

impl ActionSet {
    /// Index of the confirm/interact action.
    pub const CONFIRM: usize = 0;

    pub fn new<I: Into<Vec<Button>>>(buttons: I) -> Result<Self, ConfigurationError> {
        let buttons = buttons.into();
        if buttons.is_empty() {
            return Err(ConfigurationError::InvalidConfig("action vocabulary must not be empty".into()));
        }
        Ok(Self { buttons })
    }

    pub fn len(&self) -> usize { self.buttons.len() }
    pub fn is_empty(&self) -> bool { self.buttons.is_empty() }
    pub fn buttons(&self) -> &[Button] { &self.buttons }

    /// Button for an index, or `InvalidAction` when out of range.
    pub fn button(&self, index: usize) -> Result<Button, ConfigurationError> {
        self.buttons
            .get(index)
            .copied()
            .ok_or(ConfigurationError::InvalidAction { index, size: self.buttons.len() })
    }

    pub fn space(&self) -> Discrete { Discrete::new(self.buttons.len() as u32) }
}

/// An action as handed over by a driver: a bare index, or an index wrapped
/// in a batch as produced by vectorized callers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionInput {
    Index(i64),
    Batch(Vec<i64>),
}

impl ActionInput {
    /// Canonical index. Batches are unwrapped to their first element.
    /// Range checking against a vocabulary is left to [`ActionSet::button`].
    pub fn to_index(&self) -> Result<usize, ConfigurationError> {
        let raw = match self {
            ActionInput::Index(i) => *i,
            ActionInput::Batch(items) => *items.first().ok_or(ConfigurationError::EmptyActionBatch)?,
        };
        usize::try_from(raw).map_err(|_| ConfigurationError::NegativeAction(raw))
    }
}

impl From<usize> for ActionInput { fn from(v: usize) -> Self { ActionInput::Index(v as i64) } }
impl From<u32> for ActionInput { fn from(v: u32) -> Self { ActionInput::Index(v as i64) } }
impl From<i32> for ActionInput { fn from(v: i32) -> Self { ActionInput::Index(v as i64) } }
impl From<i64> for ActionInput { fn from(v: i64) -> Self { ActionInput::Index(v) } }
impl From<Vec<i64>> for ActionInput { fn from(v: Vec<i64>) -> Self { ActionInput::Batch(v) } }

impl From<Vec<u32>> for ActionInput {
    fn from(v: Vec<u32>) -> Self { ActionInput::Batch(v.into_iter().map(i64::from).collect()) }
}

impl From<&[u32]> for ActionInput {
    fn from(v: &[u32]) -> Self { ActionInput::Batch(v.iter().map(|&a| i64::from(a)).collect()) }
}

impl<const N: usize> From<[u32; N]> for ActionInput {
    fn from(v: [u32; N]) -> Self { ActionInput::Batch(v.iter().map(|&a| i64::from(a)).collect()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_vocabulary_starts_with_confirm() {
        let actions = ActionSet::default();
        assert_eq!(actions.len(), 6);
        assert_eq!(actions.button(ActionSet::CONFIRM).unwrap(), Button::A);
        assert_eq!(actions.space().n(), 6);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let actions = ActionSet::default();
        assert!(matches!(actions.button(6), Err(ConfigurationError::InvalidAction { index: 6, size: 6 })));
        assert!(ActionSet::new(Vec::new()).is_err());
    }

    #[test]
    fn wrapped_inputs_normalize_to_scalar() {
        assert_eq!(ActionInput::from(3usize).to_index().unwrap(), 3);
        assert_eq!(ActionInput::from([4u32]).to_index().unwrap(), 4);
        assert_eq!(ActionInput::from(vec![2u32, 5]).to_index().unwrap(), 2);
        assert!(matches!(ActionInput::from(-1i64).to_index(), Err(ConfigurationError::NegativeAction(-1))));
        assert!(matches!(ActionInput::Batch(vec![]).to_index(), Err(ConfigurationError::EmptyActionBatch)));
    }
}
