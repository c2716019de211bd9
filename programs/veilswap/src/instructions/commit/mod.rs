//! Commitment submission instructions

pub mod submit_commitment;
pub mod submit_commitment_with_proof;

pub use submit_commitment::*;
pub use submit_commitment_with_proof::*;
