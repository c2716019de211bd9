//! Margin pool and position keeper instructions

pub mod apply_funding;
pub mod deposit_collateral;
pub mod initialize_margin_pool;
pub mod liquidate;
pub mod withdraw_collateral;

pub use apply_funding::*;
pub use deposit_collateral::*;
pub use initialize_margin_pool::*;
pub use liquidate::*;
pub use withdraw_collateral::*;
