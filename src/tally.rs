//! Per-voting-type weight computation and pass/quorum arithmetic.
//! Pure functions — no state, easy to unit test in
//! isolation from the proposal store.

use crate::error::{DaoError, Result};

/// Weighted voting type: effective weight is the voter's resolved power,
/// capped by the weight they declared.
pub fn weighted_effective(power: u64, declared: u64) -> u64 {
    power.min(declared)
}

/// Quadratic voting type: cost in tokens for a declared weight `w`.
pub fn quadratic_cost(w: u64) -> Result<u64> {
    w.checked_mul(w)
        .ok_or_else(|| DaoError::InvalidProposal("quadratic weight too large".into()))
}

/// Reputation voting type: declared weight must not exceed the voter's
/// current reputation score.
pub fn reputation_effective(reputation: u64, declared: u64) -> Result<u64> {
    if declared > reputation {
        return Err(DaoError::InsufficientTokens {
            have: reputation,
            need: declared,
        });
    }
    Ok(declared)
}

/// `yes + no + abstain >= quorum_bp * circulating_supply / 10000`.
pub fn quorum_met(participating: u64, circulating_supply: u64, quorum_bp: u32) -> bool {
    let lhs = participating as u128 * 10_000;
    let rhs = circulating_supply as u128 * quorum_bp as u128;
    lhs >= rhs
}

/// `yes * 10000 / (yes + no) >= threshold_bp`, evaluated via cross
/// multiplication to avoid integer-division rounding loss.
pub fn pass_condition(yes: u64, no: u64, threshold_bp: u32) -> bool {
    let total = yes as u128 + no as u128;
    if total == 0 {
        return false;
    }
    yes as u128 * 10_000 >= threshold_bp as u128 * total
}
