//! Multi-signature treasury: pending transactions, signature aggregation,
//! and the canonical signing payload.

use crate::error::{DaoError, Result};
use crate::history::{hash_serializable, ChainHashable, HistoryLog};
use crate::types::{Address, Digest, Timestamp};
use sha2::{Digest as _, Sha256};
use std::collections::HashMap;

/// Treasury actions recorded to the hash-chained audit trail, mirroring the
/// teacher's `AuditAction` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    CreateTx,
    SignTx,
    ExecuteTx,
    UpdateSigners,
    SweepExpired,
}

impl AuditAction {
    fn discriminant(self) -> u8 {
        match self {
            AuditAction::CreateTx => 0,
            AuditAction::SignTx => 1,
            AuditAction::ExecuteTx => 2,
            AuditAction::UpdateSigners => 3,
            AuditAction::SweepExpired => 4,
        }
    }
}

/// The payload half of a treasury audit entry; `actor` and `timestamp` live
/// on the enclosing `HistoryEntry`.
#[derive(Debug, Clone)]
pub struct AuditPayload {
    pub action: AuditAction,
    /// The transaction id the action concerns, or all-zero for
    /// signer-set-wide actions like `UpdateSigners`.
    pub target: Digest,
}

impl ChainHashable for AuditPayload {
    fn hash_into(&self, hasher: &mut Sha256) {
        hash_serializable(hasher, &self.action.discriminant());
        hasher.update(self.target);
    }
}

pub type AuditEntry = crate::history::HistoryEntry<AuditPayload>;

#[derive(Debug, Clone)]
pub struct PendingTransaction {
    pub id: Digest,
    pub recipient: Address,
    pub amount: u64,
    pub purpose: String,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    pub signatures: Vec<Address>,
    pub executed: bool,
}

impl PendingTransaction {
    fn is_expired(&self, now: Timestamp) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone)]
pub struct Treasury {
    /// Ledger address backing this treasury's balance. Execution moves
    /// tokens out of this address, so `sum(balances) == total_supply`
    /// never needs a special case for treasury funds.
    pub address: Address,
    pub signers: Vec<Address>,
    pub required_signatures: u32,
    pending: HashMap<Digest, PendingTransaction>,
    /// Mirror of `ledger.balance_of(&self.address)`, refreshed by the DAO
    /// after every ledger mutation that touches it.
    pub balance: u64,
    audit: HistoryLog<AuditPayload>,
}

impl Treasury {
    pub fn new(address: Address, signers: Vec<Address>, required_signatures: u32) -> Result<Self> {
        validate_signer_set(&signers, required_signatures)?;
        Ok(Self {
            address,
            signers,
            required_signatures,
            pending: HashMap::new(),
            balance: 0,
            audit: HistoryLog::default(),
        })
    }

    pub fn audit_trail(&self) -> &[AuditEntry] {
        self.audit.entries()
    }

    /// Recompute the audit trail's chain hashes and confirm none were
    /// tampered with or reordered.
    pub fn audit_verified(&self) -> bool {
        self.audit.verify()
    }

    pub fn pending(&self, id: &Digest) -> Option<&PendingTransaction> {
        self.pending.get(id)
    }

    pub fn all_pending(&self) -> impl Iterator<Item = &PendingTransaction> {
        self.pending.values()
    }

    #[allow(clippy::too_many_arguments)]
    pub fn create_tx(
        &mut self,
        id: Digest,
        recipient: Address,
        amount: u64,
        purpose: String,
        now: Timestamp,
        expiry_secs: u64,
        creator: &Address,
    ) -> Result<()> {
        if amount == 0 {
            return Err(DaoError::InvalidProposal(
                "treasury amount must be > 0".into(),
            ));
        }
        if purpose.trim().is_empty() {
            return Err(DaoError::InvalidProposal(
                "treasury purpose must not be empty".into(),
            ));
        }
        self.pending.insert(
            id,
            PendingTransaction {
                id,
                recipient,
                amount,
                purpose,
                created_at: now,
                expires_at: now + expiry_secs,
                signatures: Vec::new(),
                executed: false,
            },
        );
        self.audit.append(
            creator.clone(),
            now,
            AuditPayload {
                action: AuditAction::CreateTx,
                target: id,
            },
        );
        Ok(())
    }

    /// Append `signer`'s signature, verified against the canonical payload.
    /// Returns `true` if the signature threshold was just reached (the
    /// caller is then responsible for executing, since execution needs
    /// access to the token ledger).
    pub fn sign_tx(
        &mut self,
        id: &Digest,
        signer: &Address,
        signature: &[u8],
        now: Timestamp,
        verify: impl FnOnce(&[u8], &[u8], &[u8]) -> bool,
    ) -> Result<bool> {
        let tx = self
            .pending
            .get(id)
            .ok_or(DaoError::ProposalNotFound(*id))?;
        if tx.executed {
            return Err(DaoError::InvalidProposal(
                "treasury transaction already executed".into(),
            ));
        }
        if tx.is_expired(now) {
            return Err(DaoError::InvalidTimeframe(
                "treasury transaction expired".into(),
            ));
        }
        if !self.signers.contains(signer) {
            return Err(DaoError::Unauthorized(format!(
                "{signer} is not an authorized treasury signer"
            )));
        }
        if tx.signatures.contains(signer) {
            return Err(DaoError::InvalidProposal(format!(
                "{signer} has already signed this transaction"
            )));
        }
        let payload = signing_payload(id, &tx.recipient, tx.amount, &tx.purpose, tx.created_at);
        if !verify(&payload, signature, signer.as_str().as_bytes()) {
            return Err(DaoError::InvalidSignature);
        }

        let tx = self.pending.get_mut(id).expect("checked above");
        tx.signatures.push(signer.clone());
        self.audit.append(
            signer.clone(),
            now,
            AuditPayload {
                action: AuditAction::SignTx,
                target: *id,
            },
        );
        Ok(tx.signatures.len() as u32 >= self.required_signatures)
    }

    /// Re-verify the authorized, deduplicated signature set meets the
    /// threshold over the canonical payload, run `check_transfer` against
    /// the actual ledger move the caller is about to perform, and only then
    /// mark the tx executed. `check_transfer` must validate (without
    /// mutating) that crediting `recipient` with `amount` will succeed;
    /// since nothing else touches the ledger between this call returning
    /// and the caller performing the move, a transfer that passes here
    /// cannot then fail and strand the flag. Returns the recipient and
    /// amount for the caller to credit.
    pub fn mark_executed(
        &mut self,
        id: &Digest,
        executor: &Address,
        now: Timestamp,
        check_transfer: impl FnOnce(&Address, u64) -> Result<()>,
    ) -> Result<(Address, u64)> {
        let tx = self
            .pending
            .get(id)
            .ok_or(DaoError::ProposalNotFound(*id))?;
        if tx.executed {
            return Err(DaoError::InvalidProposal(
                "treasury transaction already executed".into(),
            ));
        }
        let distinct_signers: std::collections::HashSet<&Address> = tx
            .signatures
            .iter()
            .filter(|s| self.signers.contains(s))
            .collect();
        if (distinct_signers.len() as u32) < self.required_signatures {
            return Err(DaoError::QuorumNotMet {
                participated: distinct_signers.len() as u64,
                required: self.required_signatures as u64,
            });
        }
        if self.balance < tx.amount {
            return Err(DaoError::TreasuryInsufficient {
                have: self.balance,
                need: tx.amount,
            });
        }
        let recipient = tx.recipient.clone();
        let amount = tx.amount;
        check_transfer(&recipient, amount)?;
        let tx = self.pending.get_mut(id).expect("checked above");
        tx.executed = true;
        self.audit.append(
            executor.clone(),
            now,
            AuditPayload {
                action: AuditAction::ExecuteTx,
                target: *id,
            },
        );
        Ok((recipient, amount))
    }

    pub fn update_signers(&mut self, new_signers: Vec<Address>, required: u32, admin: &Address, now: Timestamp) -> Result<()> {
        validate_signer_set(&new_signers, required)?;
        self.signers = new_signers;
        self.required_signatures = required;
        self.audit.append(
            admin.clone(),
            now,
            AuditPayload {
                action: AuditAction::UpdateSigners,
                target: [0u8; 32],
            },
        );
        Ok(())
    }

    /// Remove expired, non-executed pending transactions. Idempotent:
    /// running it again with nothing newly expired removes nothing. Not
    /// gated by a role, so the audit actor is the well-known system address
    /// rather than a caller identity.
    pub fn sweep_expired(&mut self, now: Timestamp) -> usize {
        let expired: Vec<Digest> = self
            .pending
            .values()
            .filter(|tx| !tx.executed && tx.is_expired(now))
            .map(|tx| tx.id)
            .collect();
        for id in &expired {
            self.pending.remove(id);
            self.audit.append(
                Address::new("system"),
                now,
                AuditPayload {
                    action: AuditAction::SweepExpired,
                    target: *id,
                },
            );
        }
        expired.len()
    }
}

fn validate_signer_set(signers: &[Address], required: u32) -> Result<()> {
    if signers.is_empty() {
        return Err(DaoError::InvalidThreshold(
            "treasury signer set must not be empty".into(),
        ));
    }
    if required == 0 || required as usize > signers.len() {
        return Err(DaoError::InvalidThreshold(format!(
            "required signatures {required} must be within 1..={}",
            signers.len()
        )));
    }
    Ok(())
}

/// `SHA-256(tx_id || recipient_address_bytes || uint64_be(amount) ||
/// purpose_utf8 || uint64_be(created_at))` — the sole byte string signers
/// produce signatures over. Changing this is a breaking
/// wire-format change; it lives in exactly one place.
pub fn signing_payload(
    tx_id: &Digest,
    recipient: &Address,
    amount: u64,
    purpose: &str,
    created_at: Timestamp,
) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(tx_id);
    hasher.update(recipient.as_str().as_bytes());
    hasher.update(amount.to_be_bytes());
    hasher.update(purpose.as_bytes());
    hasher.update(created_at.to_be_bytes());
    let out = hasher.finalize();
    let mut payload = [0u8; 32];
    payload.copy_from_slice(&out);
    payload
}
