//! Side effects requested by the controllers
//!
//! The controllers never touch hardware. Acknowledgments and alerts are
//! queued as effects during a tick and drained by the firmware tasks that
//! own the indicator LED and the horn.

use heapless::Vec;

/// One requested side effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Effect {
    /// Single horn pulse.
    Honk,
    /// Blink the indicator `n` times as an acknowledgment.
    Blink(u8),
    IndicatorOn,
    IndicatorOff,
    IndicatorToggle,
}

/// Bounded per-tick effect queue.
///
/// A single tick queues at most a couple of indicator changes and two horn
/// pulses; overflow drops the effect rather than grow.
#[derive(Debug, Default)]
pub struct Effects {
    queue: Vec<Effect, 8>,
}

impl Effects {
    pub const fn new() -> Self {
        Self { queue: Vec::new() }
    }

    pub(crate) fn push(&mut self, effect: Effect) {
        let _ = self.queue.push(effect);
    }
}

impl core::ops::Deref for Effects {
    type Target = [Effect];

    fn deref(&self) -> &[Effect] {
        &self.queue
    }
}
