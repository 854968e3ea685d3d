//! Sticky shutoff/collapse tracking.

use crate::registers::Event;

const SHUTOFF: u8 = 0b01;
const COLLAPSE: u8 = 0b10;

/// Shutoff and collapse judgements accumulated since the last reset.
///
/// The device clears `EVENT` whenever it is read, so every snapshot is ORed
/// into the latch; a flag stays set until [`EventLatch::clear`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EventLatch {
    bits: u8,
}

impl EventLatch {
    /// Creates an empty latch.
    pub const fn new() -> Self {
        Self { bits: 0 }
    }

    /// Merges the judgement bits of an `EVENT` snapshot.
    pub fn accumulate(&mut self, event: Event) {
        if event.shutoff() {
            self.bits |= SHUTOFF;
        }
        if event.collapse() {
            self.bits |= COLLAPSE;
        }
    }

    /// Shutoff judgement seen since the last reset.
    pub const fn shutoff(&self) -> bool {
        self.bits & SHUTOFF != 0
    }

    /// Collapse judgement seen since the last reset.
    pub const fn collapse(&self) -> bool {
        self.bits & COLLAPSE != 0
    }

    /// Two-bit mask: bit 0 shutoff, bit 1 collapse.
    pub const fn bits(&self) -> u8 {
        self.bits
    }

    /// Forgets every accumulated judgement.
    pub fn clear(&mut self) {
        self.bits = 0;
    }
}
