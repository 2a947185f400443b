//! Emulator handle abstraction.
//!
//! The environment drives an emulator exclusively through [`EmulatorHandle`].
//! Real backends live outside this crate; [`ScriptedEmulator`] is an
//! in-process implementation with programmable memory used by tests and demos.

pub mod scripted;

use std::fmt;

pub use crate::core::TeardownError;
pub use scripted::{ScriptedEmulator, TickHook};

/// Game Boy joypad buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Button {
    A,
    B,
    Left,
    Right,
    Up,
    Down,
    Start,
    Select,
}

impl Button {
    /// Lowercase button name as understood by emulator front-ends.
    pub fn name(self) -> &'static str {
        match self {
            Button::A => "a",
            Button::B => "b",
            Button::Left => "left",
            Button::Right => "right",
            Button::Up => "up",
            Button::Down => "down",
            Button::Start => "start",
            Button::Select => "select",
        }
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

/// The emulator refused a snapshot.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct SnapshotLoadError(pub String);

/// Capabilities the navigation environment needs from an emulator.
pub trait EmulatorHandle {
    /// Read one byte of emulator memory. No side effects.
    fn read_byte(&self, address: u16) -> u8;

    /// Issue an edge-triggered button press.
    fn press_button(&mut self, button: Button);

    /// Advance the emulation by one frame.
    fn tick(&mut self);

    /// Replace the full emulator state with a persisted snapshot.
    fn load_snapshot(&mut self, snapshot: &[u8]) -> Result<(), SnapshotLoadError>;

    /// Set playback speed as a multiple of real time.
    fn set_emulation_speed(&mut self, multiplier: u32);

    /// Stop the emulator. Callers tearing down may ignore the error.
    fn stop(&mut self) -> Result<(), TeardownError>;
}

impl<T: EmulatorHandle + ?Sized> EmulatorHandle for Box<T> {
    fn read_byte(&self, address: u16) -> u8 { (**self).read_byte(address) }
    fn press_button(&mut self, button: Button) { (**self).press_button(button) }
    fn tick(&mut self) { (**self).tick() }
    fn load_snapshot(&mut self, snapshot: &[u8]) -> Result<(), SnapshotLoadError> { (**self).load_snapshot(snapshot) }
    fn set_emulation_speed(&mut self, multiplier: u32) { (**self).set_emulation_speed(multiplier) }
    fn stop(&mut self) -> Result<(), TeardownError> { (**self).stop() }
}
