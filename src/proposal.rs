//! Proposal store: the data side of the proposal lifecycle. Lifecycle
//! transitions and tally orchestration live in `Dao` (lib.rs), which has
//! the cross-substate access they need; this module owns storage, lookups,
//! and the one-vote-per-voter invariant.

use crate::error::{DaoError, Result};
use crate::types::{
    Address, Digest, ParameterChangeSet, ProposalStatus, ProposalType, Timestamp, VoteChoice,
    VotingType,
};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub enum ProposalPayload {
    Treasury(TreasuryDisbursement),
    Parameter(ParameterChangeSet),
}

#[derive(Debug, Clone)]
pub struct TreasuryDisbursement {
    pub recipient: Address,
    pub amount: u64,
    pub purpose: String,
}

#[derive(Debug, Clone, Default)]
pub struct ProposalResults {
    pub yes: u64,
    pub no: u64,
    pub abstain: u64,
    pub total_voters: u64,
    pub passed: bool,
    pub quorum_reached: bool,
}

#[derive(Debug, Clone)]
pub struct Proposal {
    pub id: Digest,
    pub creator: Address,
    pub title: String,
    pub description: String,
    pub proposal_type: ProposalType,
    pub voting_type: VotingType,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub threshold: u32,
    pub status: ProposalStatus,
    pub results: ProposalResults,
    pub metadata: Digest,
    pub payload: Option<ProposalPayload>,
}

#[derive(Debug, Clone)]
pub struct Vote {
    pub choice: VoteChoice,
    pub declared_weight: u64,
    pub reason: String,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, Default)]
pub struct VotingProgress {
    pub breakdown: Vec<(Address, Vote)>,
    pub results: ProposalResults,
    pub time_remaining: i64,
}

#[derive(Debug, Clone, Default)]
pub struct ProposalStore {
    proposals: HashMap<Digest, Proposal>,
    votes: HashMap<(Digest, Address), Vote>,
}

impl ProposalStore {
    pub fn insert(&mut self, proposal: Proposal) {
        self.proposals.insert(proposal.id, proposal);
    }

    pub fn get(&self, id: &Digest) -> Option<&Proposal> {
        self.proposals.get(id)
    }

    pub fn get_mut(&mut self, id: &Digest) -> Option<&mut Proposal> {
        self.proposals.get_mut(id)
    }

    pub fn require(&self, id: &Digest) -> Result<&Proposal> {
        self.proposals
            .get(id)
            .ok_or(DaoError::ProposalNotFound(*id))
    }

    pub fn require_mut(&mut self, id: &Digest) -> Result<&mut Proposal> {
        self.proposals
            .get_mut(id)
            .ok_or(DaoError::ProposalNotFound(*id))
    }

    pub fn all(&self) -> impl Iterator<Item = &Proposal> {
        self.proposals.values()
    }

    pub fn ids(&self) -> Vec<Digest> {
        self.proposals.keys().copied().collect()
    }

    pub fn by_status(&self, status: ProposalStatus) -> Vec<&Proposal> {
        self.proposals.values().filter(|p| p.status == status).collect()
    }

    pub fn by_type(&self, t: ProposalType) -> Vec<&Proposal> {
        self.proposals
            .values()
            .filter(|p| p.proposal_type == t)
            .collect()
    }

    pub fn by_creator(&self, creator: &Address) -> Vec<&Proposal> {
        self.proposals
            .values()
            .filter(|p| &p.creator == creator)
            .collect()
    }

    pub fn has_voted(&self, id: &Digest, voter: &Address) -> bool {
        self.votes.contains_key(&(*id, voter.clone()))
    }

    pub fn get_vote(&self, id: &Digest, voter: &Address) -> Option<&Vote> {
        self.votes.get(&(*id, voter.clone()))
    }

    pub fn record_vote(&mut self, id: Digest, voter: Address, vote: Vote) -> Result<()> {
        if self.has_voted(&id, &voter) {
            return Err(DaoError::DuplicateVote(voter.to_string()));
        }
        self.votes.insert((id, voter), vote);
        Ok(())
    }

    pub fn votes_for(&self, id: &Digest) -> Vec<(&Address, &Vote)> {
        self.votes
            .iter()
            .filter(|((pid, _), _)| pid == id)
            .map(|((_, voter), v)| (voter, v))
            .collect()
    }

    pub fn voting_progress(&self, id: &Digest, now: Timestamp) -> Result<VotingProgress> {
        let proposal = self.require(id)?;
        let breakdown: Vec<(Address, Vote)> = self
            .votes_for(id)
            .into_iter()
            .map(|(a, v)| (a.clone(), v.clone()))
            .collect();
        let time_remaining = proposal.end_time as i64 - now as i64;
        Ok(VotingProgress {
            breakdown,
            results: proposal.results.clone(),
            time_remaining,
        })
    }
}

/// Deterministic proposal id derived from creator, title, and the
/// submission's transaction hash, so two proposals never collide even when
/// submitted in the same second.
pub fn derive_proposal_id(creator: &Address, title: &str, tx_hash: &Digest) -> Digest {
    use sha2::{Digest as _, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(creator.as_str().as_bytes());
    hasher.update(title.as_bytes());
    hasher.update(tx_hash);
    let out = hasher.finalize();
    let mut id = [0u8; 32];
    id.copy_from_slice(&out);
    id
}
