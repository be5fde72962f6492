//! Task implementations
pub mod drive;
pub mod heartbeat;
pub mod horn_sound;
pub mod led_indicate;
pub mod mission_tick;
