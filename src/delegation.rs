//! Delegation graph: time-bounded, single-step delegations and the
//! effective-voting-power resolver.

use crate::error::{DaoError, Result};
use crate::token::TokenLedger;
use crate::types::{Address, Timestamp};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct Delegation {
    pub delegate: Address,
    pub start: Timestamp,
    /// 0 = no expiry.
    pub expiry: Timestamp,
    pub revoked: bool,
}

impl Delegation {
    fn is_active(&self, now: Timestamp) -> bool {
        !self.revoked && (self.expiry == 0 || now < self.expiry)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DelegationGraph {
    /// delegator -> delegation. At most one per delegator.
    delegations: HashMap<Address, Delegation>,
}

impl DelegationGraph {
    pub fn delegate(
        &mut self,
        delegator: &Address,
        delegate: &Address,
        start: Timestamp,
        expiry: Timestamp,
    ) -> Result<()> {
        if delegator == delegate {
            return Err(DaoError::InvalidDelegation(
                "cannot delegate to self".into(),
            ));
        }
        if expiry != 0 && expiry <= start {
            return Err(DaoError::InvalidTimeframe(
                "delegation expiry must be after its start".into(),
            ));
        }
        self.delegations.insert(
            delegator.clone(),
            Delegation {
                delegate: delegate.clone(),
                start,
                expiry,
                revoked: false,
            },
        );
        Ok(())
    }

    pub fn revoke(&mut self, delegator: &Address, now: Timestamp) -> Result<()> {
        match self.delegations.get_mut(delegator) {
            Some(d) if d.is_active(now) => {
                d.revoked = true;
                Ok(())
            }
            Some(_) | None => Err(DaoError::InvalidDelegation(
                "no active delegation to revoke".into(),
            )),
        }
    }

    pub fn delegation_of(&self, delegator: &Address) -> Option<&Delegation> {
        self.delegations.get(delegator)
    }

    pub fn has_delegated(&self, delegator: &Address, now: Timestamp) -> bool {
        self.delegations
            .get(delegator)
            .map(|d| d.is_active(now))
            .unwrap_or(false)
    }

    /// Effective voting power of `addr`, resolved at the instant `now`
    /// (delegation weight is dynamic — resolved fresh at vote time).
    /// If `addr` has delegated away, its power is 0; otherwise it is its own
    /// balance plus the balances of every non-expired, non-revoked delegator
    /// pointing to it.
    pub fn effective_power(&self, addr: &Address, ledger: &TokenLedger, now: Timestamp) -> u64 {
        if self.has_delegated(addr, now) {
            return 0;
        }
        let mut power = ledger.balance_of(addr);
        for (delegator, d) in &self.delegations {
            if d.delegate == *addr && d.is_active(now) {
                power = power.saturating_add(ledger.balance_of(delegator));
            }
        }
        power
    }
}
