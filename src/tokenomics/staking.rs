//! Staking pools: lock tokens for a reward rate, accrue, and claim.
//! Rewards are newly minted at claim time, mirroring the
//! vesting module's mint-on-claim accounting.

use crate::error::{DaoError, Result};
use crate::types::{Address, Timestamp};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct StakerInfo {
    pub staked: u64,
    pub since: Timestamp,
    pub last_accrued: Timestamp,
    pub accrued_rewards: u64,
}

#[derive(Debug, Clone)]
pub struct StakingPool {
    pub reward_rate_bp: u32,
    /// Seconds a stake must remain locked before it can be withdrawn.
    pub lockup_secs: u64,
    total_staked: u64,
    stakers: HashMap<Address, StakerInfo>,
}

impl StakingPool {
    pub fn new(reward_rate_bp: u32, lockup_secs: u64) -> Self {
        Self {
            reward_rate_bp,
            lockup_secs,
            total_staked: 0,
            stakers: HashMap::new(),
        }
    }

    pub fn total_staked(&self) -> u64 {
        self.total_staked
    }

    pub fn staker(&self, addr: &Address) -> Option<&StakerInfo> {
        self.stakers.get(addr)
    }

    pub fn stake(&mut self, addr: &Address, amount: u64, now: Timestamp) -> Result<()> {
        if amount == 0 {
            return Err(DaoError::InvalidProposal("stake amount must be > 0".into()));
        }
        self.accrue(addr, now);
        let info = self.stakers.entry(addr.clone()).or_insert_with(|| StakerInfo {
            since: now,
            last_accrued: now,
            ..Default::default()
        });
        info.staked = info.staked.saturating_add(amount);
        self.total_staked = self.total_staked.saturating_add(amount);
        tracing::info!(addr = %addr, amount, "tokens staked");
        Ok(())
    }

    /// Accrue pending rewards up to `now`, at `reward_rate_bp` annualized
    /// (365 days), proportional to elapsed seconds.
    pub fn accrue(&mut self, addr: &Address, now: Timestamp) {
        let Some(info) = self.stakers.get_mut(addr) else {
            return;
        };
        if now <= info.last_accrued || info.staked == 0 {
            info.last_accrued = now;
            return;
        }
        let elapsed = now - info.last_accrued;
        const YEAR_SECS: u128 = 365 * 24 * 60 * 60;
        let reward = ((info.staked as u128 * self.reward_rate_bp as u128 * elapsed as u128)
            / (10_000u128 * YEAR_SECS)) as u64;
        info.accrued_rewards = info.accrued_rewards.saturating_add(reward);
        info.last_accrued = now;
    }

    pub fn unstake(&mut self, addr: &Address, amount: u64, now: Timestamp) -> Result<()> {
        if amount == 0 {
            return Err(DaoError::InvalidProposal("unstake amount must be > 0".into()));
        }
        self.accrue(addr, now);
        let info = self
            .stakers
            .get_mut(addr)
            .ok_or_else(|| DaoError::InsufficientTokens { have: 0, need: amount })?;
        if now < info.since + self.lockup_secs {
            return Err(DaoError::InvalidTimeframe("stake is still locked".into()));
        }
        if info.staked < amount {
            return Err(DaoError::InsufficientTokens {
                have: info.staked,
                need: amount,
            });
        }
        info.staked -= amount;
        self.total_staked = self.total_staked.saturating_sub(amount);
        tracing::info!(addr = %addr, amount, "tokens unstaked");
        Ok(())
    }

    /// Drain and return accrued rewards for minting to `addr`.
    pub fn claim_rewards(&mut self, addr: &Address, now: Timestamp) -> Result<u64> {
        self.accrue(addr, now);
        let info = self
            .stakers
            .get_mut(addr)
            .ok_or_else(|| DaoError::InvalidProposal("no stake on record".into()))?;
        let rewards = info.accrued_rewards;
        if rewards == 0 {
            return Err(DaoError::InvalidProposal("no rewards accrued".into()));
        }
        info.accrued_rewards = 0;
        Ok(rewards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YEAR: u64 = 365 * 24 * 60 * 60;

    #[test]
    fn stake_rejects_zero_amount() {
        let mut pool = StakingPool::new(1_000, 0);
        assert!(pool.stake(&Address::new("a"), 0, 0).is_err());
    }

    #[test]
    fn accrual_is_proportional_to_elapsed_time_at_rate() {
        // 1000 bp (10%) annualized on a 1_000 stake for a full year.
        let mut pool = StakingPool::new(1_000, 0);
        let a = Address::new("a");
        pool.stake(&a, 1_000, 0).unwrap();
        pool.accrue(&a, YEAR);
        assert_eq!(pool.staker(&a).unwrap().accrued_rewards, 100);
    }

    #[test]
    fn unstake_rejects_before_lockup_elapses() {
        let mut pool = StakingPool::new(0, 1_000);
        let a = Address::new("a");
        pool.stake(&a, 500, 0).unwrap();
        assert!(pool.unstake(&a, 100, 500).is_err());
        pool.unstake(&a, 100, 1_000).unwrap();
        assert_eq!(pool.staker(&a).unwrap().staked, 400);
    }

    #[test]
    fn claim_rewards_drains_and_rejects_when_empty() {
        let mut pool = StakingPool::new(1_000, 0);
        let a = Address::new("a");
        pool.stake(&a, 1_000, 0).unwrap();
        assert!(pool.claim_rewards(&a, 0).is_err());
        pool.accrue(&a, YEAR);
        let claimed = pool.claim_rewards(&a, YEAR).unwrap();
        assert_eq!(claimed, 100);
        assert!(pool.claim_rewards(&a, YEAR).is_err());
    }
}
