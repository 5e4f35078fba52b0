//! MIDI program slots.

use core::fmt;

/// One of the 256 patch map entries.
///
/// Slots `0..128` are bank 0 programs, slots `128..256` are bank 128 (drum)
/// programs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slot(u8);

impl Slot {
    /// Number of slots in the patch map.
    pub const COUNT: usize = 256;

    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// Slot for a bank/program pair. Any nonzero bank selects the drum half.
    pub const fn from_bank_program(bank: u8, program: u8) -> Self {
        let drum = if bank == 0 { 0 } else { 0x80 };
        Self(drum | (program & 0x7F))
    }

    /// All slots in patch map order.
    pub fn all() -> impl Iterator<Item = Slot> {
        (0..=u8::MAX).map(Slot)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// MIDI bank: 0 for melodic slots, 128 for drum slots.
    pub const fn bank(self) -> u8 {
        if self.0 < 128 { 0 } else { 128 }
    }

    /// MIDI program within the bank.
    pub const fn program(self) -> u8 {
        self.0 & 0x7F
    }

    pub const fn is_drum(self) -> bool {
        self.0 >= 128
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}:{:03}", self.bank(), self.program())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn melodic_and_drum_halves() {
        assert_eq!(Slot::new(0).bank(), 0);
        assert_eq!(Slot::new(127).program(), 127);
        assert!(!Slot::new(127).is_drum());
        assert_eq!(Slot::new(128).bank(), 128);
        assert_eq!(Slot::new(128).program(), 0);
        assert_eq!(Slot::new(255).program(), 127);
        assert!(Slot::new(200).is_drum());
    }

    #[test]
    fn bank_program_round_trip() {
        let slot = Slot::from_bank_program(128, 25);
        assert_eq!(slot.index(), 153);
        assert_eq!(slot.to_string(), "128:025");
        assert_eq!(Slot::from_bank_program(0, 5).to_string(), "000:005");
    }

    #[test]
    fn all_covers_every_slot_once() {
        let slots: Vec<_> = Slot::all().collect();
        assert_eq!(slots.len(), Slot::COUNT);
        assert_eq!(slots[0], Slot::new(0));
        assert_eq!(slots[255], Slot::new(255));
    }
}
