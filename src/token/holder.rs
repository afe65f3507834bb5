//! Per-participant metadata that mirrors ledger state: a holder's first
//! activity timestamp, staked amount, and reputation score. Created on
//! first receipt, never deleted.

use crate::config::ReputationConfig;
use crate::types::{Address, Timestamp};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenHolder {
    pub address: Address,
    pub balance: u64,
    pub staked_total: u64,
    pub reputation: u64,
    pub joined_at: Timestamp,
    pub last_active: Timestamp,
}

#[derive(Debug, Clone, Default)]
pub struct HolderRegistry {
    holders: HashMap<Address, TokenHolder>,
}

impl HolderRegistry {
    pub fn get(&self, addr: &Address) -> Option<&TokenHolder> {
        self.holders.get(addr)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TokenHolder> {
        self.holders.values()
    }

    pub fn reputation_of(&self, addr: &Address) -> u64 {
        self.holders.get(addr).map(|h| h.reputation).unwrap_or(0)
    }

    /// Ensure a holder record exists, creating it with the initial score
    /// formula `base + balance/100` clamped to `[min, max]`.
    pub fn ensure(
        &mut self,
        addr: &Address,
        now: Timestamp,
        balance: u64,
        cfg: &ReputationConfig,
    ) -> &mut TokenHolder {
        self.holders.entry(addr.clone()).or_insert_with(|| {
            let initial = (cfg.base_score + balance / 100).clamp(cfg.min_score, cfg.max_score);
            TokenHolder {
                address: addr.clone(),
                balance,
                staked_total: 0,
                reputation: initial,
                joined_at: now,
                last_active: now,
            }
        })
    }

    pub fn sync_balance(&mut self, addr: &Address, balance: u64) {
        if let Some(h) = self.holders.get_mut(addr) {
            h.balance = balance;
        }
    }

    pub fn touch_active(&mut self, addr: &Address, now: Timestamp) {
        if let Some(h) = self.holders.get_mut(addr) {
            h.last_active = now;
        }
    }

    pub fn set_reputation(&mut self, addr: &Address, score: u64) {
        if let Some(h) = self.holders.get_mut(addr) {
            h.reputation = score;
        }
    }

    pub fn add_staked(&mut self, addr: &Address, amount: u64) {
        if let Some(h) = self.holders.get_mut(addr) {
            h.staked_total = h.staked_total.saturating_add(amount);
        }
    }

    pub fn sub_staked(&mut self, addr: &Address, amount: u64) {
        if let Some(h) = self.holders.get_mut(addr) {
            h.staked_total = h.staked_total.saturating_sub(amount);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_is_idempotent_and_seeds_reputation_from_balance() {
        let mut registry = HolderRegistry::default();
        let cfg = ReputationConfig::default();
        let addr = Address::new("a");
        registry.ensure(&addr, 0, 500, &cfg);
        assert_eq!(registry.reputation_of(&addr), cfg.base_score + 5);
        // Re-ensuring does not reset balance or reputation.
        registry.set_reputation(&addr, 9_999);
        registry.ensure(&addr, 10, 999, &cfg);
        assert_eq!(registry.reputation_of(&addr), 9_999);
        assert_eq!(registry.get(&addr).unwrap().balance, 500);
    }

    #[test]
    fn staked_total_tracks_add_and_sub_without_underflow() {
        let mut registry = HolderRegistry::default();
        let cfg = ReputationConfig::default();
        let addr = Address::new("a");
        registry.ensure(&addr, 0, 0, &cfg);
        registry.add_staked(&addr, 100);
        registry.sub_staked(&addr, 150);
        assert_eq!(registry.get(&addr).unwrap().staked_total, 0);
    }
}
