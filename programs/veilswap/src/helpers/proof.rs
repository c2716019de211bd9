//! Groth16 commitment proof verification
//!
//! The commitment circuit proves knowledge of an intent whose Poseidon hash
//! equals the proof's single public signal. Verification failures are
//! deliberately collapsed into the unified `InvalidCommitment`: the caller
//! learns nothing about which pairing or parse step failed.

use anchor_lang::prelude::*;
use groth16_solana::groth16::{Groth16Verifier, Groth16Verifyingkey};

use crate::constants::GROTH16_PROOF_SIZE;
use crate::errors::VeilswapError;
use crate::helpers::field::is_canonical_field_element;

/// Verify a Groth16 proof binding `commitment_hash` as the sole public
/// signal of the commitment circuit.
///
/// # Arguments
/// * `proof_bytes` - 256-byte Groth16 proof (A: 64, B: 128, C: 64)
/// * `vk_data` - Verification key in groth16-solana format
/// * `commitment_hash` - The claimed Poseidon commitment, big-endian field element
pub fn verify_commitment_proof(
    proof_bytes: &[u8],
    vk_data: &[u8],
    commitment_hash: &[u8; 32],
) -> Result<()> {
    if proof_bytes.len() != GROTH16_PROOF_SIZE {
        msg!("proof length {} != {}", proof_bytes.len(), GROTH16_PROOF_SIZE);
        return Err(VeilswapError::InvalidCommitment.into());
    }
    if !is_canonical_field_element(commitment_hash) {
        msg!("public signal is not a canonical field element");
        return Err(VeilswapError::InvalidCommitment.into());
    }

    let vk = parse_vk(vk_data)?;
    if vk.nr_pubinputs != 1 {
        msg!("commitment circuit expects 1 public input, vk has {}", vk.nr_pubinputs);
        return Err(VeilswapError::InvalidCommitment.into());
    }

    let proof_a: [u8; 64] = proof_bytes[0..64]
        .try_into()
        .map_err(|_| VeilswapError::InvalidCommitment)?;
    let proof_b: [u8; 128] = proof_bytes[64..192]
        .try_into()
        .map_err(|_| VeilswapError::InvalidCommitment)?;
    let proof_c: [u8; 64] = proof_bytes[192..256]
        .try_into()
        .map_err(|_| VeilswapError::InvalidCommitment)?;

    let public_inputs: [[u8; 32]; 1] = [*commitment_hash];

    let mut verifier =
        Groth16Verifier::new(&proof_a, &proof_b, &proof_c, &public_inputs, &vk).map_err(|e| {
            msg!("verifier construction failed: {:?}", e);
            VeilswapError::InvalidCommitment
        })?;

    verifier.verify().map_err(|e| {
        msg!("pairing check failed: {:?}", e);
        error!(VeilswapError::InvalidCommitment)
    })
}

/// Parse a verification key from raw bytes.
///
/// Format: alpha_g1 (64) | beta_g2 (128) | gamma_g2 (128) | delta_g2 (128)
/// | ic_count (4, big-endian) | IC elements (64 each).
pub fn parse_vk(vk_data: &[u8]) -> Result<Groth16Verifyingkey<'_>> {
    const HEADER: usize = 64 + 128 + 128 + 128 + 4;
    if vk_data.len() < HEADER {
        return Err(VeilswapError::InvalidVerificationKey.into());
    }

    let vk_alpha_g1: [u8; 64] = vk_data[0..64]
        .try_into()
        .map_err(|_| VeilswapError::InvalidVerificationKey)?;
    let vk_beta_g2: [u8; 128] = vk_data[64..192]
        .try_into()
        .map_err(|_| VeilswapError::InvalidVerificationKey)?;
    let vk_gamma_g2: [u8; 128] = vk_data[192..320]
        .try_into()
        .map_err(|_| VeilswapError::InvalidVerificationKey)?;
    let vk_delta_g2: [u8; 128] = vk_data[320..448]
        .try_into()
        .map_err(|_| VeilswapError::InvalidVerificationKey)?;

    let ic_count = u32::from_be_bytes([vk_data[448], vk_data[449], vk_data[450], vk_data[451]])
        as usize;
    if ic_count == 0 || ic_count > 21 {
        return Err(VeilswapError::InvalidVerificationKey.into());
    }
    if vk_data.len() < HEADER + ic_count * 64 {
        return Err(VeilswapError::InvalidVerificationKey.into());
    }

    let ic_bytes = &vk_data[HEADER..HEADER + ic_count * 64];
    let vk_ic: &[[u8; 64]] = unsafe {
        std::slice::from_raw_parts(ic_bytes.as_ptr() as *const [u8; 64], ic_count)
    };

    Ok(Groth16Verifyingkey {
        nr_pubinputs: ic_count - 1,
        vk_alpha_g1,
        vk_beta_g2,
        vk_gamme_g2: vk_gamma_g2, // field name typo lives in groth16-solana
        vk_delta_g2,
        vk_ic,
    })
}
