//! Fungible governance-token ledger: balances, allowances, mint/burn/transfer
//! accounting.
//!
//! Pure bookkeeping — this module knows nothing
//! about holder metadata, reputation, or proposals; those live one layer up
//! so the dependency graph stays acyclic.

pub mod holder;

use crate::error::{DaoError, Result};
use crate::types::Address;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct TokenLedger {
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    total_supply: u64,
    balances: HashMap<Address, u64>,
    allowances: HashMap<(Address, Address), u64>,
}

impl TokenLedger {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>, decimals: u8) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            decimals,
            total_supply: 0,
            balances: HashMap::new(),
            allowances: HashMap::new(),
        }
    }

    pub fn total_supply(&self) -> u64 {
        self.total_supply
    }

    pub fn balance_of(&self, addr: &Address) -> u64 {
        self.balances.get(addr).copied().unwrap_or(0)
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> u64 {
        self.allowances
            .get(&(owner.clone(), spender.clone()))
            .copied()
            .unwrap_or(0)
    }

    fn credit(&mut self, addr: &Address, amount: u64) -> Result<()> {
        let bal = self.balance_of(addr);
        let new_bal = bal.checked_add(amount).ok_or_else(|| {
            DaoError::InsufficientTokens {
                have: bal,
                need: amount,
            }
        })?;
        self.balances.insert(addr.clone(), new_bal);
        Ok(())
    }

    fn debit(&mut self, addr: &Address, amount: u64) -> Result<()> {
        let bal = self.balance_of(addr);
        if bal < amount {
            return Err(DaoError::InsufficientTokens {
                have: bal,
                need: amount,
            });
        }
        self.balances.insert(addr.clone(), bal - amount);
        Ok(())
    }

    pub fn mint(&mut self, to: &Address, amount: u64) -> Result<()> {
        if amount == 0 {
            return Err(DaoError::InvalidProposal("mint amount must be > 0".into()));
        }
        let new_supply = self.total_supply.checked_add(amount).ok_or_else(|| {
            DaoError::InvalidProposal("mint would overflow total supply".into())
        })?;
        self.credit(to, amount)?;
        self.total_supply = new_supply;
        tracing::info!(to = %to, amount, "token minted");
        Ok(())
    }

    pub fn burn(&mut self, from: &Address, amount: u64) -> Result<()> {
        if amount == 0 {
            return Err(DaoError::InvalidProposal("burn amount must be > 0".into()));
        }
        self.debit(from, amount)?;
        self.total_supply -= amount;
        tracing::info!(from = %from, amount, "token burned");
        Ok(())
    }

    /// Validate that `transfer(from, to, amount)` would succeed, without
    /// mutating any balance. Lets a caller that must commit some other
    /// piece of state (e.g. a treasury transaction's `executed` flag)
    /// strictly before the ledger mutation confirm the mutation can't then
    /// fail out from under it.
    pub fn check_transfer(&self, from: &Address, to: &Address, amount: u64) -> Result<()> {
        if amount == 0 {
            return Err(DaoError::InvalidProposal("transfer amount must be > 0".into()));
        }
        if from == to {
            return Err(DaoError::InvalidProposal("self-transfer is not allowed".into()));
        }
        let from_bal = self.balance_of(from);
        if from_bal < amount {
            return Err(DaoError::InsufficientTokens {
                have: from_bal,
                need: amount,
            });
        }
        let to_bal = self.balance_of(to);
        to_bal
            .checked_add(amount)
            .ok_or_else(|| DaoError::TokenTransferFailed("recipient balance overflow".into()))?;
        Ok(())
    }

    pub fn transfer(&mut self, from: &Address, to: &Address, amount: u64) -> Result<()> {
        // Validate the credit side before mutating anything, so a would-be
        // overflow on `to` never leaves `from` debited without a recipient.
        self.check_transfer(from, to, amount)?;
        self.debit(from, amount)?;
        self.credit(to, amount)?;
        tracing::debug!(from = %from, to = %to, amount, "token transferred");
        Ok(())
    }

    pub fn approve(&mut self, owner: &Address, spender: &Address, amount: u64) -> Result<()> {
        // Overwrites any prior allowance; final allowance is exactly `amount`.
        self.allowances
            .insert((owner.clone(), spender.clone()), amount);
        Ok(())
    }

    pub fn transfer_from(
        &mut self,
        spender: &Address,
        owner: &Address,
        to: &Address,
        amount: u64,
    ) -> Result<()> {
        if amount == 0 {
            return Err(DaoError::InvalidProposal("transfer amount must be > 0".into()));
        }
        let allowed = self.allowance(owner, spender);
        if allowed < amount {
            return Err(DaoError::InsufficientTokens {
                have: allowed,
                need: amount,
            });
        }
        // transfer() re-validates balances and performs the atomic move.
        self.transfer(owner, to, amount)?;
        self.allowances
            .insert((owner.clone(), spender.clone()), allowed - amount);
        Ok(())
    }

    /// `sum(balances) == total_supply`, checked at dispatcher boundaries
    /// A mismatch is a fatal, unrecoverable error.
    pub fn assert_invariant(&self) -> Result<()> {
        let sum: u128 = self.balances.values().map(|b| *b as u128).sum();
        if sum != self.total_supply as u128 {
            return Err(DaoError::Fatal(format!(
                "sum(balances)={} != total_supply={}",
                sum, self.total_supply
            )));
        }
        Ok(())
    }
}
