// PerpAMM Funding Package

#![no_std]

pub mod rate;
pub mod state;

pub use rate::{extrapolated_sum_a, extrapolated_sum_fp, funding_rate_x128, next_a_x128};
pub use state::{AdvancedFunding, FundingState};
