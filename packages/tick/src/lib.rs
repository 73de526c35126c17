#![no_std]

pub mod types;
pub mod update;
pub mod values_inside;

pub use types::{TickCheckpoint, TickInfo, TickStore, ValuesInside};
pub use update::{cross_tick, find_next_initialized_tick, is_valid_tick, update_tick, validate_tick_range};
pub use values_inside::get_values_inside;
