// Player position, memory layout, and the observation built from them.

use rand::Rng;

use crate::emulator::EmulatorHandle;
use crate::spaces::{BoxSpace, Space};

/// Name of the single field holding the observation vector.
pub const OBSERVATION_KEY: &str = "info";

/// Player position as read from emulator memory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: u8,
    pub y: u8,
    pub map_id: u8,
    pub orientation: u8,
}

impl Position {
    pub const fn new(x: u8, y: u8, map_id: u8, orientation: u8) -> Self {
        Self { x, y, map_id, orientation }
    }
}

impl From<(u8, u8, u8, u8)> for Position {
    fn from((x, y, map_id, orientation): (u8, u8, u8, u8)) -> Self { Self::new(x, y, map_id, orientation) }
}

/// Working-memory addresses of the position fields. The defaults were found
/// empirically for one game ROM and must match the loaded binary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemoryMap {
    pub player_x: u16,
    pub player_y: u16,
    pub map_id: u16,
    pub orientation: u16,
}

impl Default for MemoryMap {
    fn default() -> Self {
        Self { player_x: 0xC0D4, player_y: 0xC0D5, map_id: 0xC92D, orientation: 0xC0D8 }
    }
}

impl MemoryMap {
    /// Read the current position. Every call goes to the emulator.
    pub fn read_position<E: EmulatorHandle + ?Sized>(&self, emulator: &E) -> Position {
        Position {
            x: emulator.read_byte(self.player_x),
            y: emulator.read_byte(self.player_y),
            map_id: emulator.read_byte(self.map_id),
            orientation: emulator.read_byte(self.orientation),
        }
    }
}

/// Observation handed to the agent: `[x, y, map_id, orientation]` under the
/// `info` field, as floats in the byte range.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Observation {
    pub info: [f32; 4],
}

impl From<Position> for Observation {
    fn from(p: Position) -> Self {
        Self { info: [p.x as f32, p.y as f32, p.map_id as f32, p.orientation as f32] }
    }
}

impl Observation {
    /// Position encoded in this observation, if every value is an integer in 0..=255.
    pub fn position(&self) -> Option<Position> {
        let mut bytes = [0u8; 4];
        for (dst, &v) in bytes.iter_mut().zip(self.info.iter()) {
            if !(0.0..=255.0).contains(&v) || v.fract() != 0.0 {
                return None;
            }
            *dst = v as u8;
        }
        Some(Position::new(bytes[0], bytes[1], bytes[2], bytes[3]))
    }
}

/// Observation space: one named `BoxSpace<f32, 4>` bounded to [0, 255].
#[derive(Clone, Debug, PartialEq)]
pub struct ObservationSpace {
    info: BoxSpace<f32, 4>,
}

impl Default for ObservationSpace {
    fn default() -> Self { Self { info: BoxSpace::new([0.0; 4], [255.0; 4]) } }
}

impl ObservationSpace {
    pub fn key(&self) -> &'static str { OBSERVATION_KEY }
    pub fn info(&self) -> &BoxSpace<f32, 4> { &self.info }
}

impl Space for ObservationSpace {
    type Element = Observation;

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Element {
        Observation { info: self.info.sample(rng) }
    }

    fn contains(&self, elem: &Self::Element) -> bool { self.info.contains(&elem.info) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emulator::ScriptedEmulator;
    use crate::utils::rng_from_seed;

    #[test]
    fn reads_position_from_mapped_addresses() {
        let map = MemoryMap::default();
        let emu = ScriptedEmulator::new()
            .with_byte(0xC0D4, 16)
            .with_byte(0xC0D5, 8)
            .with_byte(0xC92D, 80)
            .with_byte(0xC0D8, 1);
        let pos = map.read_position(&emu);
        assert_eq!(pos, Position::new(16, 8, 80, 1));
        assert_eq!(Observation::from(pos).info, [16.0, 8.0, 80.0, 1.0]);
    }

    #[test]
    fn observation_round_trips_position() {
        let obs = Observation::from(Position::new(255, 0, 3, 2));
        assert_eq!(obs.position(), Some(Position::new(255, 0, 3, 2)));
        assert_eq!(Observation { info: [1.5, 0.0, 0.0, 0.0] }.position(), None);
    }

    #[test]
    fn sampled_observations_stay_in_byte_range() {
        let space = ObservationSpace::default();
        let mut rng = rng_from_seed(5);
        for _ in 0..100 {
            let obs = space.sample(&mut rng);
            assert!(space.contains(&obs));
        }
        assert!(!space.contains(&Observation { info: [256.0, 0.0, 0.0, 0.0] }));
        assert_eq!(space.key(), "info");
    }
}
