//! Vesting schedules and claims. Tokens are minted only at
//! claim time — a schedule tracks an entitlement, not a pre-minted,
//! locked balance, so the ledger's `sum(balances) == total_supply`
//! invariant never needs a "locked supply" exception.

use crate::error::{DaoError, Result};
use crate::types::{Address, Timestamp, VestingType};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct VestingSchedule {
    pub beneficiary: Address,
    pub vesting_type: VestingType,
    pub total_amount: u64,
    pub start: Timestamp,
    /// Linear/cliff: seconds from `start` to full vesting.
    /// Milestone: ignored; use `milestones` instead.
    pub duration: Timestamp,
    /// Cliff-only: seconds from `start` before anything vests.
    pub cliff: Timestamp,
    /// Milestone-only: `(unlock_bp, reached)` pairs, bp summing to 10000.
    pub milestones: Vec<(u32, bool)>,
    pub claimed: u64,
}

impl VestingSchedule {
    /// Total amount vested (claimable or already claimed) as of `now`.
    pub fn vested(&self, now: Timestamp) -> u64 {
        match self.vesting_type {
            VestingType::Immediate => self.total_amount,
            VestingType::Linear => {
                if now < self.start + self.cliff {
                    0
                } else if self.duration == 0 || now >= self.start + self.duration {
                    self.total_amount
                } else {
                    let elapsed = now - self.start;
                    ((self.total_amount as u128 * elapsed as u128) / self.duration as u128) as u64
                }
            }
            VestingType::Cliff => {
                if now < self.start + self.cliff {
                    0
                } else {
                    self.total_amount
                }
            }
            VestingType::Milestone => {
                let reached_bp: u32 = self
                    .milestones
                    .iter()
                    .filter(|(_, reached)| *reached)
                    .map(|(bp, _)| *bp)
                    .sum();
                ((self.total_amount as u128 * reached_bp.min(10_000) as u128) / 10_000) as u64
            }
        }
    }

    pub fn claimable(&self, now: Timestamp) -> u64 {
        self.vested(now).saturating_sub(self.claimed)
    }

    /// Mark a milestone index as reached. Idempotent.
    pub fn reach_milestone(&mut self, index: usize) -> Result<()> {
        let milestone = self
            .milestones
            .get_mut(index)
            .ok_or_else(|| DaoError::InvalidProposal("no such milestone".into()))?;
        milestone.1 = true;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct VestingStore {
    schedules: HashMap<(Address, u64), VestingSchedule>,
    next_id: HashMap<Address, u64>,
}

impl VestingStore {
    pub fn create(&mut self, schedule: VestingSchedule) -> u64 {
        let id = *self.next_id.entry(schedule.beneficiary.clone()).or_insert(0);
        self.next_id.insert(schedule.beneficiary.clone(), id + 1);
        self.schedules.insert((schedule.beneficiary.clone(), id), schedule);
        id
    }

    pub fn get(&self, beneficiary: &Address, id: u64) -> Option<&VestingSchedule> {
        self.schedules.get(&(beneficiary.clone(), id))
    }

    pub fn get_mut(&mut self, beneficiary: &Address, id: u64) -> Option<&mut VestingSchedule> {
        self.schedules.get_mut(&(beneficiary.clone(), id))
    }

    pub fn for_beneficiary(&self, beneficiary: &Address) -> Vec<(u64, &VestingSchedule)> {
        self.schedules
            .iter()
            .filter(|((addr, _), _)| addr == beneficiary)
            .map(|((_, id), s)| (*id, s))
            .collect()
    }

    /// Returns the amount newly claimable (before mutation) so the caller
    /// can mint exactly that much, then records it as claimed.
    pub fn claim(&mut self, beneficiary: &Address, id: u64, now: Timestamp) -> Result<u64> {
        let schedule = self
            .schedules
            .get_mut(&(beneficiary.clone(), id))
            .ok_or_else(|| DaoError::InvalidProposal("no such vesting schedule".into()))?;
        let claimable = schedule.claimable(now);
        if claimable == 0 {
            return Err(DaoError::InvalidProposal("nothing claimable yet".into()));
        }
        schedule.claimed += claimable;
        tracing::info!(beneficiary = %beneficiary, id, claimable, "vesting claimed");
        Ok(claimable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear(start: Timestamp, cliff: Timestamp, duration: Timestamp) -> VestingSchedule {
        VestingSchedule {
            beneficiary: Address::new("b"),
            vesting_type: VestingType::Linear,
            total_amount: 1_000,
            start,
            duration,
            cliff,
            milestones: Vec::new(),
            claimed: 0,
        }
    }

    #[test]
    fn linear_vests_nothing_before_cliff_and_pro_rata_after() {
        let s = linear(0, 100, 1_000);
        assert_eq!(s.vested(50), 0);
        assert_eq!(s.vested(100), 100);
        assert_eq!(s.vested(500), 500);
        assert_eq!(s.vested(1_000), 1_000);
        assert_eq!(s.vested(2_000), 1_000);
    }

    #[test]
    fn cliff_type_is_all_or_nothing() {
        let s = VestingSchedule {
            vesting_type: VestingType::Cliff,
            ..linear(0, 365, 0)
        };
        assert_eq!(s.vested(364), 0);
        assert_eq!(s.vested(365), 1_000);
    }

    #[test]
    fn milestone_type_sums_reached_basis_points() {
        let mut s = VestingSchedule {
            vesting_type: VestingType::Milestone,
            milestones: vec![(4_000, false), (6_000, false)],
            ..linear(0, 0, 0)
        };
        assert_eq!(s.vested(0), 0);
        s.reach_milestone(0).unwrap();
        assert_eq!(s.vested(0), 400);
        s.reach_milestone(1).unwrap();
        assert_eq!(s.vested(0), 1_000);
        assert!(s.reach_milestone(5).is_err());
    }

    #[test]
    fn claim_drains_claimable_and_rejects_when_nothing_due() {
        let mut store = VestingStore::default();
        let beneficiary = Address::new("b");
        let id = store.create(linear(0, 0, 1_000));
        assert!(store.claim(&beneficiary, id, 0).is_err());
        let claimed = store.claim(&beneficiary, id, 500).unwrap();
        assert_eq!(claimed, 500);
        assert!(store.claim(&beneficiary, id, 500).is_err());
        let more = store.claim(&beneficiary, id, 1_000).unwrap();
        assert_eq!(more, 500);
    }
}
