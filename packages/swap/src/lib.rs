#![no_std]

pub mod engine;
pub mod types;

// Re-export types
pub use types::{SwapOutcome, SwapParams};

// Re-export engine functions and types
pub use engine::{engine_swap, SwapState};
