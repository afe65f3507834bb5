//! Allocation of total supply across fixed categories, each capped in
//! basis points of the configured maximum supply.

use crate::error::{DaoError, Result};
use crate::types::{DistributionCategory, Timestamp, VestingType};
use std::collections::HashMap;

/// The fixed per-category vesting policy: `(type, cliff, duration)` in
/// seconds, derived from `month_secs`. `None` means the category credits
/// its recipient directly with no vesting schedule (treasury).
pub fn category_vesting_policy(
    category: DistributionCategory,
    month_secs: u64,
) -> Option<(VestingType, Timestamp, Timestamp)> {
    match category {
        DistributionCategory::Founders => Some((VestingType::Linear, 12 * month_secs, 48 * month_secs)),
        DistributionCategory::Team => Some((VestingType::Linear, 6 * month_secs, 36 * month_secs)),
        DistributionCategory::Community => Some((VestingType::Immediate, 0, 0)),
        DistributionCategory::Ecosystem => Some((VestingType::Linear, 3 * month_secs, 24 * month_secs)),
        DistributionCategory::Treasury => None,
    }
}

/// A category's cap and running allocation, both raw token amounts.
/// `allocation` is the cap in absolute tokens, computed once from
/// `cap_bp` at construction time so `allocate` never has to re-derive
/// basis points (and round away) from a per-call amount.
#[derive(Debug, Clone, Copy)]
pub struct DistributionBucket {
    pub category: DistributionCategory,
    pub cap_bp: u32,
    pub allocation: u64,
    pub distributed: u64,
}

impl DistributionBucket {
    fn remaining(&self) -> u64 {
        self.allocation.saturating_sub(self.distributed)
    }
}

#[derive(Debug, Clone)]
pub struct DistributionEngine {
    total_supply: u64,
    buckets: HashMap<DistributionCategory, DistributionBucket>,
}

impl DistributionEngine {
    /// `caps` must be exactly the five categories and sum to 10000 bp.
    pub fn new(total_supply: u64, caps: &[(DistributionCategory, u32)]) -> Result<Self> {
        let sum: u32 = caps.iter().map(|(_, bp)| *bp).sum();
        if sum != 10_000 {
            return Err(DaoError::InvalidThreshold(format!(
                "distribution caps must sum to 10000 bp, got {sum}"
            )));
        }
        let mut buckets = HashMap::new();
        for (category, cap_bp) in caps {
            buckets.insert(
                *category,
                DistributionBucket {
                    category: *category,
                    cap_bp: *cap_bp,
                    allocation: bp_of_supply(*cap_bp, total_supply),
                    distributed: 0,
                },
            );
        }
        Ok(Self {
            total_supply,
            buckets,
        })
    }

    pub fn bucket(&self, category: DistributionCategory) -> Option<&DistributionBucket> {
        self.buckets.get(&category)
    }

    pub fn buckets(&self) -> impl Iterator<Item = &DistributionBucket> {
        self.buckets.values()
    }

    /// Reserve `amount` tokens from `category`'s remaining allotment.
    /// Rejects allocations where `distributed + amount > allocation`, per
    /// the raw token-amount cap computed at construction time; does not
    /// itself mint or move tokens, which remain a ledger concern.
    pub fn allocate(&mut self, category: DistributionCategory, amount: u64) -> Result<()> {
        let bucket = self
            .buckets
            .get_mut(&category)
            .ok_or_else(|| DaoError::InvalidProposal("unknown distribution category".into()))?;
        if amount > bucket.remaining() {
            return Err(DaoError::InvalidThreshold(format!(
                "allocation of {amount} exceeds {:?}'s remaining {}",
                category,
                bucket.remaining()
            )));
        }
        bucket.distributed += amount;
        tracing::info!(?category, amount, "tokens allocated from distribution bucket");
        Ok(())
    }
}

fn bp_of_supply(cap_bp: u32, total_supply: u64) -> u64 {
    ((cap_bp as u128 * total_supply as u128) / 10_000) as u64
}
