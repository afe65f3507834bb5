//! Core value types shared across the governance core.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 32-byte content identifier: proposal ids, transaction hashes, metadata
/// digests. Never interpreted, only compared and hashed.
pub type Digest = [u8; 32];

/// Unix timestamp, seconds.
pub type Timestamp = u64;

/// Basis points: 0..=10000, one hundredth of a percent.
pub type BasisPoints = u32;

/// Stable, case-sensitive string projection of a public key.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(pub String);

impl Address {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Closed sum type replacing an untyped "map of arbitrary values" for
/// parameter values and proposal payload fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterValue {
    U64(u64),
    I64(i64),
    Bool(bool),
    Bytes(Vec<u8>),
}

impl ParameterValue {
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            ParameterValue::U64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ParameterValue::I64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParameterValue::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

/// A named parameter change, as carried by a parameter-proposal payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterChange {
    pub name: String,
    pub value: ParameterValue,
}

pub type ParameterChangeSet = Vec<ParameterChange>;

/// Transaction kind discriminants, one byte on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TransactionKind {
    Proposal = 0x10,
    Vote = 0x11,
    Delegation = 0x12,
    Treasury = 0x13,
    TokenMint = 0x14,
    TokenBurn = 0x15,
    TokenDistribution = 0x16,
    VestingClaim = 0x17,
    Stake = 0x18,
    ParameterProposal = 0x19,
    Unstake = 0x1A,
    ClaimRewards = 0x1B,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum ProposalType {
    General = 0x01,
    Treasury = 0x02,
    Technical = 0x03,
    Parameter = 0x04,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum ProposalStatus {
    Pending = 0x01,
    Active = 0x02,
    Passed = 0x03,
    Rejected = 0x04,
    Executed = 0x05,
    Cancelled = 0x06,
}

impl ProposalStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProposalStatus::Rejected | ProposalStatus::Executed | ProposalStatus::Cancelled
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum VotingType {
    Simple = 0x01,
    Quadratic = 0x02,
    Weighted = 0x03,
    Reputation = 0x04,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum VoteChoice {
    Yes = 0x01,
    No = 0x02,
    Abstain = 0x03,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum DistributionCategory {
    Founders = 0x01,
    Team = 0x02,
    Community = 0x03,
    Treasury = 0x04,
    Ecosystem = 0x05,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum VestingType {
    Linear = 0x01,
    Cliff = 0x02,
    Milestone = 0x03,
    Immediate = 0x04,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u32)]
pub enum Role {
    Member = 0,
    Signer = 1,
    Admin = 2,
}

/// A role grant with an optional expiry (0 = never expires).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleGrant {
    pub role: Role,
    pub expires_at: Timestamp,
}

impl RoleGrant {
    pub fn is_active(&self, now: Timestamp) -> bool {
        self.expires_at == 0 || now < self.expires_at
    }
}
