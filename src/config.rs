//! Tunable governance parameters, seeded with sane defaults.
//!
//! Serde-derived with `#[serde(default = ...)]` per field — the core has no
//! file/env I/O of its own, but this is the typed, serializable snapshot a
//! caller loads into `Dao::new` and can persist externally between
//! processes.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaoConfig {
    /// Minimum token balance required (plus fee) to create a proposal.
    #[serde(default = "default_min_proposal_threshold")]
    pub min_proposal_threshold: u64,

    /// Minimum `end_time - start_time` for a proposal, in seconds.
    #[serde(default = "default_min_voting_period")]
    pub min_voting_period: u64,

    /// Minimum participating weight (basis points of circulating supply)
    /// for a proposal's tally to be valid.
    #[serde(default = "default_quorum_threshold_bp")]
    pub quorum_threshold_bp: u32,

    /// Treasury pending-transaction expiry, seconds after creation (24h).
    #[serde(default = "default_treasury_expiry_secs")]
    pub treasury_expiry_secs: u64,

    /// Length of a "month" in seconds, as used by the per-category vesting
    /// policy table (founders/team/ecosystem cliffs and durations are
    /// specified in months). Defaults to a 30-day month; tests may shrink
    /// this for determinism without changing the policy table itself.
    #[serde(default = "default_vesting_month_secs")]
    pub vesting_month_secs: u64,

    pub reputation: ReputationConfig,
}

impl Default for DaoConfig {
    fn default() -> Self {
        Self {
            min_proposal_threshold: default_min_proposal_threshold(),
            min_voting_period: default_min_voting_period(),
            quorum_threshold_bp: default_quorum_threshold_bp(),
            treasury_expiry_secs: default_treasury_expiry_secs(),
            vesting_month_secs: default_vesting_month_secs(),
            reputation: ReputationConfig::default(),
        }
    }
}

fn default_min_proposal_threshold() -> u64 {
    1000
}

fn default_min_voting_period() -> u64 {
    86_400
}

fn default_quorum_threshold_bp() -> u32 {
    1_000
}

fn default_treasury_expiry_secs() -> u64 {
    24 * 60 * 60
}

fn default_vesting_month_secs() -> u64 {
    30 * 24 * 60 * 60
}

/// Reputation engine constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReputationConfig {
    pub base_score: u64,
    pub proposal_created_bonus: u64,
    pub voting_participation_bonus: u64,
    pub proposal_passed_bonus: u64,
    pub proposal_rejected_penalty: u64,
    /// Fractional decay per period, expressed in basis points (e.g. 500 = 5%).
    pub decay_rate_bp: u32,
    pub max_score: u64,
    pub min_score: u64,
    pub decay_period_days: u64,
}

impl Default for ReputationConfig {
    fn default() -> Self {
        Self {
            base_score: 100,
            proposal_created_bonus: 10,
            voting_participation_bonus: 2,
            proposal_passed_bonus: 15,
            proposal_rejected_penalty: 10,
            decay_rate_bp: 500,
            max_score: 10_000,
            min_score: 0,
            decay_period_days: 30,
        }
    }
}
