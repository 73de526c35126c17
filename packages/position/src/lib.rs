#![no_std]

pub mod manager;
pub mod token;
pub mod types;

pub use manager::{
    create_empty_position, modify_position, settle, unrealized_fee, unrealized_funding,
    unrealized_net_position,
};
pub use types::{LiquidityPosition, PositionStatus, SettlementResult, TokenPosition};
