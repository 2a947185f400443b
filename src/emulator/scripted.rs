// Deterministic in-process emulator with programmable memory.

use super::{Button, EmulatorHandle, SnapshotLoadError, TeardownError};

const MEMORY_SIZE: usize = 0x1_0000;

/// Called once per tick with mutable access to memory. The button is `Some`
/// only on the first tick after a press, mirroring edge-triggered input.
pub type TickHook = Box<dyn FnMut(&mut [u8], Option<Button>)>;

/// An [`EmulatorHandle`] backed by a flat 64 KiB address space.
///
/// Loading any snapshot restores memory to the baseline image configured
/// with [`ScriptedEmulator::with_byte`]; the snapshot bytes themselves are
/// recorded but not interpreted.
pub struct ScriptedEmulator {
    memory: Vec<u8>,
    baseline: Vec<u8>,
    hook: Option<TickHook>,
    pending_press: Option<Button>,
    presses: Vec<Button>,
    total_ticks: u64,
    snapshot_loads: usize,
    last_snapshot: Vec<u8>,
    speed: Option<u32>,
    stopped: bool,
    stop_failure: Option<String>,
    snapshot_failure: Option<String>,
}

impl Default for ScriptedEmulator {
    fn default() -> Self { Self::new() }
}

impl ScriptedEmulator {
    pub fn new() -> Self {
        Self {
            memory: vec![0; MEMORY_SIZE],
            baseline: vec![0; MEMORY_SIZE],
            hook: None,
            pending_press: None,
            presses: Vec::new(),
            total_ticks: 0,
            snapshot_loads: 0,
            last_snapshot: Vec::new(),
            speed: None,
            stopped: false,
            stop_failure: None,
            snapshot_failure: None,
        }
    }

    /// Set a byte in both live memory and the snapshot baseline.
    pub fn with_byte(mut self, address: u16, value: u8) -> Self {
        self.memory[address as usize] = value;
        self.baseline[address as usize] = value;
        self
    }

    pub fn with_hook<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut [u8], Option<Button>) + 'static,
    {
        self.hook = Some(Box::new(hook));
        self
    }

    /// Make `stop` fail with the given message.
    pub fn failing_stop<S: Into<String>>(mut self, reason: S) -> Self {
        self.stop_failure = Some(reason.into());
        self
    }

    /// Make `load_snapshot` fail with the given message.
    pub fn rejecting_snapshots<S: Into<String>>(mut self, reason: S) -> Self {
        self.snapshot_failure = Some(reason.into());
        self
    }

    /// Overwrite live memory without touching the baseline.
    pub fn write_byte(&mut self, address: u16, value: u8) {
        self.memory[address as usize] = value;
    }

    pub fn memory(&self) -> &[u8] { &self.memory }
    pub fn presses(&self) -> &[Button] { &self.presses }
    pub fn total_ticks(&self) -> u64 { self.total_ticks }
    pub fn snapshot_loads(&self) -> usize { self.snapshot_loads }
    pub fn last_snapshot(&self) -> &[u8] { &self.last_snapshot }
    pub fn speed(&self) -> Option<u32> { self.speed }
    pub fn is_stopped(&self) -> bool { self.stopped }
}

impl EmulatorHandle for ScriptedEmulator {
    fn read_byte(&self, address: u16) -> u8 { self.memory[address as usize] }

    fn press_button(&mut self, button: Button) {
        self.presses.push(button);
        self.pending_press = Some(button);
    }

    fn tick(&mut self) {
        let pressed = self.pending_press.take();
        if let Some(hook) = self.hook.as_mut() {
            hook(self.memory.as_mut_slice(), pressed);
        }
        self.total_ticks += 1;
    }

    fn load_snapshot(&mut self, snapshot: &[u8]) -> Result<(), SnapshotLoadError> {
        if let Some(reason) = &self.snapshot_failure {
            return Err(SnapshotLoadError(reason.clone()));
        }
        self.memory.copy_from_slice(&self.baseline);
        self.pending_press = None;
        self.last_snapshot = snapshot.to_vec();
        self.snapshot_loads += 1;
        Ok(())
    }

    fn set_emulation_speed(&mut self, multiplier: u32) { self.speed = Some(multiplier); }

    fn stop(&mut self) -> Result<(), TeardownError> {
        if let Some(reason) = &self.stop_failure {
            return Err(TeardownError(reason.clone()));
        }
        self.stopped = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_restores_baseline_memory() {
        let mut emu = ScriptedEmulator::new().with_byte(0xC0D4, 16);
        emu.write_byte(0xC0D4, 99);
        emu.load_snapshot(b"state").unwrap();
        assert_eq!(emu.read_byte(0xC0D4), 16);
        assert_eq!(emu.last_snapshot(), b"state");
        assert_eq!(emu.snapshot_loads(), 1);
    }

    #[test]
    fn hook_sees_press_only_on_first_tick() {
        let mut emu = ScriptedEmulator::new().with_hook(|mem, pressed| {
            if pressed == Some(Button::Right) {
                mem[0xC0D4] = mem[0xC0D4].wrapping_add(1);
            }
        });
        emu.press_button(Button::Right);
        for _ in 0..60 {
            emu.tick();
        }
        assert_eq!(emu.read_byte(0xC0D4), 1);
        assert_eq!(emu.total_ticks(), 60);
        assert_eq!(emu.presses(), &[Button::Right]);
    }

    #[test]
    fn configured_failures_surface_as_errors() {
        let mut emu = ScriptedEmulator::new().failing_stop("device busy").rejecting_snapshots("bad header");
        assert_eq!(emu.load_snapshot(b"x"), Err(SnapshotLoadError("bad header".into())));
        assert_eq!(emu.stop(), Err(TeardownError("device busy".into())));
        assert!(!emu.is_stopped());
    }
}
