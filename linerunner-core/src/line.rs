//! Line sensor interpretation
//!
//! The line sensor is three photodetectors packed into a 3-bit code:
//! bit 0 = right, bit 1 = middle, bit 2 = left. Code 0 means the line was
//! lost, code 7 ("full bar") marks a checkpoint stripe across the track.
//! Both of those are events with dedicated handling in the navigator; the
//! remaining codes map to a fixed steering table.

use crate::config::{LOW_SPEED, MEDIUM_SPEED};
use crate::state::WheelSpeeds;

/// Gentle correction: outer wheel stays at cruise, inner drops to ~70%.
const GENTLE_SPEED: i8 = (MEDIUM_SPEED as i16 * 7 / 10) as i8;

/// Mild correction for two-detector readings, inner wheel at ~80%.
const MILD_SPEED: i8 = (MEDIUM_SPEED as i16 * 4 / 5) as i8;

/// Raw three-detector line reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineCode(u8);

impl LineCode {
    /// No detector sees the line.
    pub const LOST: Self = Self(0);

    /// All three detectors see the line (checkpoint stripe).
    pub const FULL_BAR: Self = Self(0b111);

    pub const fn new(code: u8) -> Self {
        Self(code & 0b111)
    }

    /// Pack individual detector states into a code.
    pub const fn from_detectors(left: bool, middle: bool, right: bool) -> Self {
        Self(((left as u8) << 2) | ((middle as u8) << 1) | (right as u8))
    }

    pub const fn raw(self) -> u8 {
        self.0
    }

    pub const fn is_lost(self) -> bool {
        self.0 == 0
    }

    pub const fn is_full_bar(self) -> bool {
        self.0 == 0b111
    }
}

/// Which side of the vehicle the line was last seen on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Side {
    Left,
    Right,
}

/// Recovery hint from a line reading: right-weighted codes (1, 3) hint
/// right, left-weighted codes (4, 6) hint left. Symmetric readings give no
/// hint and leave the navigator to its spiral search.
pub const fn side_hint(code: LineCode) -> Option<Side> {
    match code.raw() {
        1 | 3 => Some(Side::Right),
        4 | 6 => Some(Side::Left),
        _ => None,
    }
}

/// Steering command for a lane-position code.
///
/// Codes 0 and 7 never reach this table during normal operation; they fall
/// through to the slow-straight fallback like any undefined reading.
pub fn steer(code: LineCode) -> WheelSpeeds {
    match code.raw() {
        // Line drifted to the far right, ease right.
        1 => WheelSpeeds::new(MEDIUM_SPEED, GENTLE_SPEED),
        // Centered.
        2 => WheelSpeeds::straight(MEDIUM_SPEED),
        // Drifting right.
        3 => WheelSpeeds::new(MEDIUM_SPEED, MILD_SPEED),
        // Line drifted to the far left, ease left.
        4 => WheelSpeeds::new(GENTLE_SPEED, MEDIUM_SPEED),
        // Drifting left.
        6 => WheelSpeeds::new(MILD_SPEED, MEDIUM_SPEED),
        // Both outer detectors but not the middle: degraded reading, hold
        // course slowly.
        5 => WheelSpeeds::straight(LOW_SPEED),
        _ => WheelSpeeds::straight(LOW_SPEED),
    }
}
