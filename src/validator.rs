//! Security gate: role grants, per-function pause flags, emergency mode,
//! and the fee schedule consulted by the dispatcher before any state
//! mutation.

use crate::error::{DaoError, Result};
use crate::types::{Address, Role, RoleGrant, Timestamp, TransactionKind};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Default)]
pub struct SecurityGate {
    roles: HashMap<Address, RoleGrant>,
    paused: HashSet<TransactionKind>,
    emergency: bool,
    fees: HashMap<TransactionKind, u64>,
}

impl SecurityGate {
    pub fn grant_role(&mut self, addr: Address, role: Role, expires_at: Timestamp) {
        self.roles.insert(addr, RoleGrant { role, expires_at });
    }

    pub fn revoke_role(&mut self, addr: &Address) {
        self.roles.remove(addr);
    }

    pub fn role_of(&self, addr: &Address, now: Timestamp) -> Role {
        match self.roles.get(addr) {
            Some(grant) if grant.is_active(now) => grant.role,
            _ => Role::Member,
        }
    }

    pub fn require_role(&self, addr: &Address, minimum: Role, now: Timestamp) -> Result<()> {
        // RoleExpired only applies to an address that once held a grant and
        // has since lapsed; an address with no grant at all is simply
        // unauthorized, not expired.
        if !matches!(minimum, Role::Member) {
            if let Some(grant) = self.roles.get(addr) {
                if !grant.is_active(now) {
                    return Err(DaoError::RoleExpired(addr.to_string()));
                }
            }
        }
        let current = self.role_of(addr, now);
        if (current as u32) < (minimum as u32) {
            return Err(DaoError::Unauthorized(format!(
                "{addr} does not hold the required role"
            )));
        }
        Ok(())
    }

    pub fn set_paused(&mut self, kind: TransactionKind, paused: bool) {
        if paused {
            self.paused.insert(kind);
        } else {
            self.paused.remove(&kind);
        }
    }

    pub fn is_paused(&self, kind: TransactionKind) -> bool {
        self.paused.contains(&kind)
    }

    pub fn set_emergency(&mut self, active: bool) {
        self.emergency = active;
        tracing::warn!(active, "emergency mode toggled");
    }

    pub fn is_emergency(&self) -> bool {
        self.emergency
    }

    pub fn set_fee(&mut self, kind: TransactionKind, amount: u64) {
        self.fees.insert(kind, amount);
    }

    pub fn fee_for(&self, kind: TransactionKind) -> u64 {
        self.fees.get(&kind).copied().unwrap_or(0)
    }

    /// Checked before any transaction is processed: emergency mode blocks
    /// everything except the transactions that can lift it, and a paused
    /// function blocks only itself.
    pub fn check_gate(&self, kind: TransactionKind) -> Result<()> {
        if self.emergency {
            return Err(DaoError::EmergencyActive);
        }
        if self.is_paused(kind) {
            return Err(DaoError::FunctionPaused(kind));
        }
        Ok(())
    }
}
