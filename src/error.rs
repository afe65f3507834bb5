//! Error types for the governance core.

use thiserror::Error;

/// Numeric error codes, stable across the wire boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u16)]
pub enum ErrorCode {
    InsufficientTokens = 4001,
    ProposalNotFound = 4002,
    VotingClosed = 4003,
    Unauthorized = 4004,
    InvalidSignature = 4005,
    QuorumNotMet = 4006,
    TreasuryInsufficient = 4007,
    InvalidProposal = 4008,
    DuplicateVote = 4009,
    InvalidDelegation = 4010,
    InvalidTimeframe = 4011,
    InvalidThreshold = 4012,
    TokenTransferFailed = 4013,
    InvalidVoteChoice = 4014,
    ProposalExpired = 4015,
    SecurityViolation = 4016,
    EmergencyActive = 4017,
    FunctionPaused = 4018,
    RoleExpired = 4019,
    AuditAccessDenied = 4020,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DaoError {
    #[error("insufficient tokens: have {have}, need {need}")]
    InsufficientTokens { have: u64, need: u64 },

    #[error("proposal not found: {0:?}")]
    ProposalNotFound(crate::types::Digest),

    #[error("voting closed for proposal {0:?}")]
    VotingClosed(crate::types::Digest),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("invalid signature")]
    InvalidSignature,

    #[error("quorum not met: {participated} < {required}")]
    QuorumNotMet { participated: u64, required: u64 },

    #[error("treasury insufficient: have {have}, need {need}")]
    TreasuryInsufficient { have: u64, need: u64 },

    #[error("invalid proposal: {0}")]
    InvalidProposal(String),

    #[error("duplicate vote by {0}")]
    DuplicateVote(String),

    #[error("invalid delegation: {0}")]
    InvalidDelegation(String),

    #[error("invalid timeframe: {0}")]
    InvalidTimeframe(String),

    #[error("invalid threshold: {0}")]
    InvalidThreshold(String),

    #[error("token transfer failed: {0}")]
    TokenTransferFailed(String),

    #[error("invalid vote choice")]
    InvalidVoteChoice,

    #[error("proposal expired: {0:?}")]
    ProposalExpired(crate::types::Digest),

    #[error("security violation: {0}")]
    SecurityViolation(String),

    #[error("emergency mode active")]
    EmergencyActive,

    #[error("function paused: {0:?}")]
    FunctionPaused(crate::types::TransactionKind),

    #[error("role expired for {0}")]
    RoleExpired(String),

    #[error("audit access denied")]
    AuditAccessDenied,

    /// State-corruption: fatal, should halt the dispatcher.
    #[error("fatal invariant violation: {0}")]
    Fatal(String),
}

impl DaoError {
    pub fn code(&self) -> ErrorCode {
        match self {
            DaoError::InsufficientTokens { .. } => ErrorCode::InsufficientTokens,
            DaoError::ProposalNotFound(_) => ErrorCode::ProposalNotFound,
            DaoError::VotingClosed(_) => ErrorCode::VotingClosed,
            DaoError::Unauthorized(_) => ErrorCode::Unauthorized,
            DaoError::InvalidSignature => ErrorCode::InvalidSignature,
            DaoError::QuorumNotMet { .. } => ErrorCode::QuorumNotMet,
            DaoError::TreasuryInsufficient { .. } => ErrorCode::TreasuryInsufficient,
            DaoError::InvalidProposal(_) => ErrorCode::InvalidProposal,
            DaoError::DuplicateVote(_) => ErrorCode::DuplicateVote,
            DaoError::InvalidDelegation(_) => ErrorCode::InvalidDelegation,
            DaoError::InvalidTimeframe(_) => ErrorCode::InvalidTimeframe,
            DaoError::InvalidThreshold(_) => ErrorCode::InvalidThreshold,
            DaoError::TokenTransferFailed(_) => ErrorCode::TokenTransferFailed,
            DaoError::InvalidVoteChoice => ErrorCode::InvalidVoteChoice,
            DaoError::ProposalExpired(_) => ErrorCode::ProposalExpired,
            DaoError::SecurityViolation(_) => ErrorCode::SecurityViolation,
            DaoError::EmergencyActive => ErrorCode::EmergencyActive,
            DaoError::FunctionPaused(_) => ErrorCode::FunctionPaused,
            DaoError::RoleExpired(_) => ErrorCode::RoleExpired,
            DaoError::AuditAccessDenied => ErrorCode::AuditAccessDenied,
            // Fatal errors never cross the wire as a recoverable code; callers
            // matching on `code()` should check `is_fatal()` first.
            DaoError::Fatal(_) => ErrorCode::SecurityViolation,
        }
    }

    /// Fatal errors (state corruption) should halt the dispatcher rather than
    /// be treated as an ordinary rule violation.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DaoError::Fatal(_))
    }
}

pub type Result<T> = std::result::Result<T, DaoError>;
