//! Batch settlement instructions

pub mod execute_perp_batch;
pub mod execute_spot_batch;
pub mod execute_spot_batch_with_proofs;

pub use execute_perp_batch::*;
pub use execute_spot_batch::*;
pub use execute_spot_batch_with_proofs::*;
