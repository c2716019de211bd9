//! Pool lifecycle and internal balance instructions

pub mod deposit_tokens;
pub mod initialize_batch_pool;
pub mod withdraw_tokens;

pub use deposit_tokens::*;
pub use initialize_batch_pool::*;
pub use withdraw_tokens::*;
