//! Compile-time tuning constants
//!
//! Two knobs matter on contest day: the wheel speed presets and the light
//! threshold. Both are fixed at build time; there is no runtime
//! configuration surface.

/// Wheels stopped.
pub const STOP_SPEED: i8 = 0;

/// Careful maneuvering speed (recovery, creeping, degraded readings).
pub const LOW_SPEED: i8 = 30;

/// Cruising speed for normal line following.
pub const MEDIUM_SPEED: i8 = 50;

/// Top speed preset.
pub const HIGH_SPEED: i8 = 60;

/// Reverse speed for backing maneuvers.
pub const REVERSE_SPEED: i8 = -30;

/// Smoothed light level (0-100) above which a beacon counts as detected.
pub const LIGHT_THRESHOLD: u8 = 70;

/// Control loop period in milliseconds. Every tick counter in the
/// controllers counts periods of this length.
pub const CONTROL_TICK_MS: u64 = 100;
