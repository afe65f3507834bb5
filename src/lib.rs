//! dao_core - deterministic in-memory governance core
//!
//! A token ledger, proposal lifecycle, multiple vote-weighting schemes,
//! delegation, a multisig treasury, tokenomics (distribution, vesting,
//! staking), a reputation engine, and a typed parameter registry, all
//! owned by a single `Dao` and driven through one transaction dispatcher.
//! No networking, no persistence, no floating point: every external
//! capability (clock, signature verification, metadata storage) is
//! injected as a trait so the core itself stays pure and deterministic.

pub mod clock;
pub mod config;
pub mod delegation;
pub mod error;
pub mod history;
pub mod metadata;
pub mod parameters;
pub mod proposal;
pub mod reputation;
pub mod signing;
pub mod tally;
pub mod token;
pub mod tokenomics;
pub mod treasury;
pub mod types;
pub mod validator;

use clock::Clock;
use config::DaoConfig;
use delegation::DelegationGraph;
use error::{DaoError, Result};
use metadata::MetadataClient;
use parameters::ParameterRegistry;
use proposal::{derive_proposal_id, Proposal, ProposalPayload, ProposalResults, ProposalStore, Vote};
use reputation::{ReputationEngine, ReputationEventType};
use signing::SignatureVerifier;
use std::sync::Mutex;
use token::holder::HolderRegistry;
use token::TokenLedger;
use tokenomics::distribution::DistributionEngine;
use tokenomics::vesting::VestingSchedule;
use tokenomics::{StakingPool, VestingStore};
use treasury::Treasury;
use types::{
    Address, Digest, DistributionCategory, ParameterChange, ProposalStatus, ProposalType, Role,
    Timestamp, TransactionKind, VoteChoice, VotingType,
};
use validator::SecurityGate;

/// Central, single-owner governance state. Every substate is a plain
/// field rather than behind its own lock; callers that need thread
/// safety reach for [`SyncDao`] instead of locking internally here.
pub struct Dao {
    pub config: DaoConfig,
    clock: Box<dyn Clock>,
    verifier: Box<dyn SignatureVerifier>,
    metadata: Option<Box<dyn MetadataClient>>,
    pub ledger: TokenLedger,
    pub holders: HolderRegistry,
    pub reputation: ReputationEngine,
    pub delegations: DelegationGraph,
    pub proposals: ProposalStore,
    pub treasury: Treasury,
    pub distribution: DistributionEngine,
    pub vesting: VestingStore,
    pub staking: StakingPool,
    pub staking_pool_address: Address,
    pub parameters: ParameterRegistry,
    pub security: SecurityGate,
}

/// Everything the constructor needs beyond what lives in `DaoConfig`.
pub struct DaoInit {
    pub clock: Box<dyn Clock>,
    pub verifier: Box<dyn SignatureVerifier>,
    pub metadata: Option<Box<dyn MetadataClient>>,
    pub token_symbol: String,
    pub token_name: String,
    pub token_decimals: u8,
    pub treasury_address: Address,
    pub treasury_signers: Vec<Address>,
    pub treasury_required_signatures: u32,
    pub staking_pool_address: Address,
    pub staking_reward_rate_bp: u32,
    pub staking_lockup_secs: u64,
    pub max_supply: u64,
    pub distribution_caps: Vec<(DistributionCategory, u32)>,
}

impl Dao {
    pub fn new(config: DaoConfig, init: DaoInit) -> Result<Self> {
        let parameters = ParameterRegistry::seeded(&config);
        let treasury = Treasury::new(
            init.treasury_address,
            init.treasury_signers,
            init.treasury_required_signatures,
        )?;
        let distribution = DistributionEngine::new(init.max_supply, &init.distribution_caps)?;
        Ok(Self {
            reputation: ReputationEngine::new(config.reputation),
            ledger: TokenLedger::new(init.token_symbol, init.token_name, init.token_decimals),
            holders: HolderRegistry::default(),
            delegations: DelegationGraph::default(),
            proposals: ProposalStore::default(),
            treasury,
            distribution,
            vesting: VestingStore::default(),
            staking: StakingPool::new(init.staking_reward_rate_bp, init.staking_lockup_secs),
            staking_pool_address: init.staking_pool_address,
            parameters,
            security: SecurityGate::default(),
            config,
            clock: init.clock,
            verifier: init.verifier,
            metadata: init.metadata,
        })
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub fn metadata_client(&self) -> Option<&dyn MetadataClient> {
        self.metadata.as_deref()
    }

    /// The one boundary check callers should run after a batch of
    /// transactions (or on a cadence): `sum(balances) == total_supply`.
    /// A failure here is fatal and means state has already corrupted.
    pub fn assert_invariants(&self) -> Result<()> {
        self.ledger.assert_invariant()
    }

    pub fn refresh_treasury_balance(&mut self) {
        self.treasury.balance = self.ledger.balance_of(&self.treasury.address);
    }

    fn sync_holder(&mut self, addr: &Address, now: Timestamp) {
        let balance = self.ledger.balance_of(addr);
        self.holders.ensure(addr, now, balance, &self.config.reputation);
        self.holders.sync_balance(addr, balance);
    }

    // ---- token ----------------------------------------------------

    pub fn mint(&mut self, admin: &Address, to: &Address, amount: u64, now: Timestamp) -> Result<()> {
        self.security.require_role(admin, Role::Admin, now)?;
        self.ledger.mint(to, amount)?;
        self.sync_holder(to, now);
        self.refresh_treasury_balance();
        Ok(())
    }

    pub fn burn(&mut self, holder: &Address, amount: u64, now: Timestamp) -> Result<()> {
        self.ledger.burn(holder, amount)?;
        self.sync_holder(holder, now);
        self.refresh_treasury_balance();
        Ok(())
    }

    pub fn transfer(&mut self, from: &Address, to: &Address, amount: u64, now: Timestamp) -> Result<()> {
        self.ledger.transfer(from, to, amount)?;
        self.sync_holder(from, now);
        self.sync_holder(to, now);
        self.holders.touch_active(from, now);
        self.refresh_treasury_balance();
        Ok(())
    }

    pub fn approve(&mut self, owner: &Address, spender: &Address, amount: u64) -> Result<()> {
        self.ledger.approve(owner, spender, amount)
    }

    pub fn transfer_from(
        &mut self,
        spender: &Address,
        owner: &Address,
        to: &Address,
        amount: u64,
        now: Timestamp,
    ) -> Result<()> {
        self.ledger.transfer_from(spender, owner, to, amount)?;
        self.sync_holder(owner, now);
        self.sync_holder(to, now);
        self.refresh_treasury_balance();
        Ok(())
    }

    // ---- proposals --------------------------------------------------

    #[allow(clippy::too_many_arguments)]
    pub fn create_proposal(
        &mut self,
        creator: &Address,
        title: String,
        description: String,
        proposal_type: ProposalType,
        voting_type: VotingType,
        start_time: Timestamp,
        end_time: Timestamp,
        threshold_bp: u32,
        metadata: Digest,
        payload: Option<ProposalPayload>,
        tx_hash: Digest,
        now: Timestamp,
    ) -> Result<Digest> {
        let balance = self.ledger.balance_of(creator);
        if balance < self.config.min_proposal_threshold {
            return Err(DaoError::InsufficientTokens {
                have: balance,
                need: self.config.min_proposal_threshold,
            });
        }
        if start_time >= end_time {
            return Err(DaoError::InvalidTimeframe(
                "start_time must be before end_time".into(),
            ));
        }
        if start_time < now {
            return Err(DaoError::InvalidTimeframe(
                "start_time must not be in the past".into(),
            ));
        }
        if end_time - start_time < self.config.min_voting_period {
            return Err(DaoError::InvalidTimeframe(
                "voting period below the configured minimum".into(),
            ));
        }
        if threshold_bp == 0 || threshold_bp > 10_000 {
            return Err(DaoError::InvalidThreshold(
                "pass threshold must be within 1..=10000 bp".into(),
            ));
        }
        let id = derive_proposal_id(creator, &title, &tx_hash);
        if self.proposals.get(&id).is_some() {
            return Err(DaoError::InvalidProposal("proposal id collision".into()));
        }
        self.proposals.insert(Proposal {
            id,
            creator: creator.clone(),
            title,
            description,
            proposal_type,
            voting_type,
            start_time,
            end_time,
            threshold: threshold_bp,
            status: ProposalStatus::Pending,
            results: ProposalResults::default(),
            metadata,
            payload,
        });
        self.sync_holder(creator, now);
        self.reputation
            .record(&mut self.holders, creator, ReputationEventType::ProposalCreated, now, id);
        tracing::info!(proposal = ?id, creator = %creator, "proposal created");
        Ok(id)
    }

    /// Only the creator may cancel, and only while the proposal is still
    /// `Pending`. No fee refund: the creation fee is already spent.
    pub fn cancel_proposal(&mut self, id: Digest, caller: &Address, _now: Timestamp) -> Result<()> {
        let proposal = self.proposals.require(&id)?;
        if &proposal.creator != caller {
            return Err(DaoError::Unauthorized(
                "only the creator may cancel a proposal".into(),
            ));
        }
        if proposal.status != ProposalStatus::Pending {
            return Err(DaoError::InvalidProposal(
                "only a pending proposal can be cancelled".into(),
            ));
        }
        let proposal = self.proposals.require_mut(&id)?;
        proposal.status = ProposalStatus::Cancelled;
        Ok(())
    }

    pub fn vote(
        &mut self,
        voter: &Address,
        proposal_id: Digest,
        choice: VoteChoice,
        declared_weight: u64,
        reason: String,
        now: Timestamp,
    ) -> Result<()> {
        let proposal = self.proposals.require(&proposal_id)?;
        if proposal.status != ProposalStatus::Active || now >= proposal.end_time {
            return Err(DaoError::VotingClosed(proposal_id));
        }
        if self.proposals.has_voted(&proposal_id, voter) {
            return Err(DaoError::DuplicateVote(voter.to_string()));
        }
        let voting_type = proposal.voting_type;

        let effective_weight = match voting_type {
            VotingType::Simple => 1,
            VotingType::Weighted => {
                let power = self.delegations.effective_power(voter, &self.ledger, now);
                tally::weighted_effective(power, declared_weight)
            }
            VotingType::Quadratic => {
                // Cost is debited from the voter with no counterparty credit
                // (burned, so `sum(balances) == total_supply` still holds).
                let cost = tally::quadratic_cost(declared_weight)?;
                self.ledger.burn(voter, cost)?;
                self.sync_holder(voter, now);
                declared_weight
            }
            VotingType::Reputation => {
                let rep = self.holders.reputation_of(voter);
                tally::reputation_effective(rep, declared_weight)?
            }
        };

        self.proposals.record_vote(
            proposal_id,
            voter.clone(),
            Vote {
                choice,
                declared_weight,
                reason,
                timestamp: now,
            },
        )?;

        let proposal = self.proposals.require_mut(&proposal_id)?;
        match choice {
            VoteChoice::Yes => proposal.results.yes = proposal.results.yes.saturating_add(effective_weight),
            VoteChoice::No => proposal.results.no = proposal.results.no.saturating_add(effective_weight),
            VoteChoice::Abstain => {
                proposal.results.abstain = proposal.results.abstain.saturating_add(effective_weight)
            }
        }
        proposal.results.total_voters += 1;

        self.sync_holder(voter, now);
        self.holders.touch_active(voter, now);
        self.reputation
            .record(&mut self.holders, voter, ReputationEventType::VoteCast, now, proposal_id);
        Ok(())
    }

    /// Advance every non-terminal proposal's status for the current time:
    /// `Pending` -> `Active` once `now >= start_time`, then `Active` ->
    /// `{Passed, Rejected}` once `now >= end_time` (tallying quorum and pass
    /// condition and recording the creator's reputation event). Idempotent
    /// — an already-finalized proposal is not revisited. Returns the ids
    /// that just reached a terminal status.
    pub fn update_statuses(&mut self, now: Timestamp) -> Vec<Digest> {
        let to_activate: Vec<Digest> = self
            .proposals
            .by_status(ProposalStatus::Pending)
            .into_iter()
            .filter(|p| now >= p.start_time)
            .map(|p| p.id)
            .collect();
        for id in to_activate {
            if let Ok(p) = self.proposals.require_mut(&id) {
                p.status = ProposalStatus::Active;
            }
        }

        let candidates: Vec<Digest> = self
            .proposals
            .by_status(ProposalStatus::Active)
            .into_iter()
            .filter(|p| now >= p.end_time)
            .map(|p| p.id)
            .collect();
        let circulating = self
            .ledger
            .total_supply()
            .saturating_sub(self.ledger.balance_of(&self.treasury.address));
        let mut finalized = Vec::with_capacity(candidates.len());
        for id in candidates {
            let (participating, yes, no, creator, threshold) = {
                let p = self.proposals.require(&id).expect("listed above");
                (
                    p.results.yes.saturating_add(p.results.no).saturating_add(p.results.abstain),
                    p.results.yes,
                    p.results.no,
                    p.creator.clone(),
                    p.threshold,
                )
            };
            let quorum_reached = tally::quorum_met(participating, circulating, self.config.quorum_threshold_bp);
            let passed = quorum_reached && tally::pass_condition(yes, no, threshold);

            let p = self.proposals.require_mut(&id).expect("listed above");
            p.results.quorum_reached = quorum_reached;
            p.results.passed = passed;
            p.status = if passed {
                ProposalStatus::Passed
            } else {
                ProposalStatus::Rejected
            };

            let event = if passed {
                ReputationEventType::ProposalPassed
            } else {
                ReputationEventType::ProposalRejected
            };
            self.sync_holder(&creator, now);
            self.reputation.record(&mut self.holders, &creator, event, now, id);
            tracing::info!(proposal = ?id, passed, "proposal finalized");
            finalized.push(id);
        }
        finalized
    }

    /// Apply a `Passed` proposal's payload. Treasury proposals hand off to
    /// the existing multisig flow (a disbursement still needs signatures);
    /// parameter proposals apply their changes immediately.
    pub fn execute_proposal(&mut self, id: Digest, executor: &Address, now: Timestamp) -> Result<()> {
        let proposal = self.proposals.require(&id)?;
        if proposal.status != ProposalStatus::Passed {
            return Err(DaoError::InvalidProposal("proposal has not passed".into()));
        }
        let creator = proposal.creator.clone();
        let title = proposal.title.clone();
        let payload = proposal.payload.clone();

        match payload {
            Some(ProposalPayload::Treasury(disbursement)) => {
                let tx_id = derive_proposal_id(&creator, &format!("execute:{title}"), &id);
                self.treasury.create_tx(
                    tx_id,
                    disbursement.recipient,
                    disbursement.amount,
                    disbursement.purpose,
                    now,
                    self.config.treasury_expiry_secs,
                    executor,
                )?;
            }
            Some(ProposalPayload::Parameter(changes)) => {
                for change in &changes {
                    self.check_parameter_sanity(change)?;
                }
                for change in changes {
                    self.parameters.apply(change, executor.clone(), Some(id), now)?;
                }
            }
            None => {}
        }

        let proposal = self.proposals.require_mut(&id)?;
        proposal.status = ProposalStatus::Executed;
        Ok(())
    }

    /// Cross-parameter sanity rules from spec.md §4.8 that the registry's
    /// own per-field constraints can't express, since they depend on other
    /// substates: a proposal threshold can't lock out half the supply, and
    /// a treasury withdraw cap can't exceed what the treasury actually holds.
    fn check_parameter_sanity(&self, change: &ParameterChange) -> Result<()> {
        match change.name.as_str() {
            "min_proposal_threshold" => {
                if let Some(v) = change.value.as_u64() {
                    if v > self.ledger.total_supply() / 2 {
                        return Err(DaoError::InvalidThreshold(
                            "min_proposal_threshold must not exceed half of total supply".into(),
                        ));
                    }
                }
            }
            "max_treasury_withdraw" => {
                if let Some(v) = change.value.as_u64() {
                    if v > self.treasury.balance {
                        return Err(DaoError::InvalidThreshold(
                            "max_treasury_withdraw must not exceed the treasury's current balance".into(),
                        ));
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    // ---- delegation -------------------------------------------------

    pub fn delegate(&mut self, delegator: &Address, delegate: &Address, expiry: Timestamp, now: Timestamp) -> Result<()> {
        self.delegations.delegate(delegator, delegate, now, expiry)?;
        self.sync_holder(delegator, now);
        self.holders.touch_active(delegator, now);
        Ok(())
    }

    pub fn revoke_delegation(&mut self, delegator: &Address, now: Timestamp) -> Result<()> {
        self.delegations.revoke(delegator, now)
    }

    // ---- treasury -----------------------------------------------------

    pub fn create_treasury_tx(
        &mut self,
        creator: &Address,
        recipient: Address,
        amount: u64,
        purpose: String,
        tx_hash: Digest,
        now: Timestamp,
    ) -> Result<Digest> {
        self.security.require_role(creator, Role::Signer, now)?;
        let id = derive_proposal_id(creator, &purpose, &tx_hash);
        self.treasury
            .create_tx(id, recipient, amount, purpose, now, self.config.treasury_expiry_secs, creator)?;
        Ok(id)
    }

    /// Append a signature; if it reaches threshold, execute immediately.
    /// Returns whether execution happened.
    pub fn sign_treasury_tx(
        &mut self,
        signer: &Address,
        id: Digest,
        signature: &[u8],
        now: Timestamp,
    ) -> Result<bool> {
        let verifier = self.verifier.as_ref();
        let reached = self
            .treasury
            .sign_tx(&id, signer, signature, now, |payload, sig, pk| verifier.verify(payload, sig, pk))?;
        if !reached {
            return Ok(false);
        }
        let treasury_address = self.treasury.address.clone();
        let ledger = &self.ledger;
        let (recipient, amount) = self.treasury.mark_executed(&id, signer, now, |recipient, amount| {
            ledger.check_transfer(&treasury_address, recipient, amount)
        })?;
        self.ledger
            .transfer(&treasury_address, &recipient, amount)
            .expect("mark_executed already validated this transfer would succeed");
        self.sync_holder(&recipient, now);
        self.refresh_treasury_balance();
        Ok(true)
    }

    pub fn update_treasury_signers(
        &mut self,
        admin: &Address,
        signers: Vec<Address>,
        required: u32,
        now: Timestamp,
    ) -> Result<()> {
        self.security.require_role(admin, Role::Admin, now)?;
        self.treasury.update_signers(signers, required, admin, now)
    }

    pub fn sweep_expired_treasury_txs(&mut self, now: Timestamp) -> usize {
        self.treasury.sweep_expired(now)
    }

    // ---- tokenomics ---------------------------------------------------

    /// Allocate `amount` from `category`'s cap to `beneficiary`, dispatching
    /// the fixed per-category vesting policy (§4.6): treasury credits the
    /// treasury address directly, community vests immediately, and
    /// founders/team/ecosystem get their linear cliff+duration schedule.
    /// Returns the new vesting schedule id, or `None` for a direct credit.
    pub fn distribute(
        &mut self,
        admin: &Address,
        category: DistributionCategory,
        beneficiary: Address,
        amount: u64,
        now: Timestamp,
    ) -> Result<Option<u64>> {
        self.security.require_role(admin, Role::Admin, now)?;
        self.distribution.allocate(category, amount)?;
        let policy = tokenomics::category_vesting_policy(category, self.config.vesting_month_secs);
        let Some((vesting_type, cliff, duration)) = policy else {
            let treasury_address = self.treasury.address.clone();
            self.ledger.mint(&treasury_address, amount)?;
            self.refresh_treasury_balance();
            return Ok(None);
        };
        let schedule_id = self.vesting.create(VestingSchedule {
            beneficiary,
            vesting_type,
            total_amount: amount,
            start: now,
            duration,
            cliff,
            milestones: Vec::new(),
            claimed: 0,
        });
        Ok(Some(schedule_id))
    }

    pub fn claim_vesting(&mut self, beneficiary: &Address, schedule_id: u64, now: Timestamp) -> Result<u64> {
        let amount = self.vesting.claim(beneficiary, schedule_id, now)?;
        self.ledger.mint(beneficiary, amount)?;
        self.sync_holder(beneficiary, now);
        Ok(amount)
    }

    pub fn stake(&mut self, staker: &Address, amount: u64, now: Timestamp) -> Result<()> {
        let pool = self.staking_pool_address.clone();
        self.ledger.transfer(staker, &pool, amount)?;
        self.staking.stake(staker, amount, now)?;
        self.holders.add_staked(staker, amount);
        self.sync_holder(staker, now);
        Ok(())
    }

    pub fn unstake(&mut self, staker: &Address, amount: u64, now: Timestamp) -> Result<()> {
        self.staking.unstake(staker, amount, now)?;
        let pool = self.staking_pool_address.clone();
        self.ledger.transfer(&pool, staker, amount)?;
        self.holders.sub_staked(staker, amount);
        self.sync_holder(staker, now);
        Ok(())
    }

    pub fn claim_rewards(&mut self, staker: &Address, now: Timestamp) -> Result<u64> {
        let rewards = self.staking.claim_rewards(staker, now)?;
        self.ledger.mint(staker, rewards)?;
        self.sync_holder(staker, now);
        Ok(rewards)
    }

    // ---- parameters ---------------------------------------------------

    /// Expedited admin path for a parameter change (`ParameterProposal`
    /// transaction kind), separate from a full `ProposalType::Parameter`
    /// governance vote.
    pub fn apply_parameter_change_direct(&mut self, admin: &Address, change: ParameterChange, now: Timestamp) -> Result<()> {
        self.security.require_role(admin, Role::Admin, now)?;
        self.check_parameter_sanity(&change)?;
        self.parameters.apply(change, admin.clone(), None, now)
    }

    // ---- reputation maintenance -----------------------------------

    pub fn decay_reputation(&mut self, now: Timestamp) {
        self.reputation.apply_inactivity_decay(&mut self.holders, now);
    }

    pub fn recalculate_reputation(&mut self) {
        self.reputation.recalculate_all(&mut self.holders);
    }

    // ---- security administration ------------------------------------

    pub fn grant_role(&mut self, admin: &Address, target: Address, role: Role, expires_at: Timestamp, now: Timestamp) -> Result<()> {
        self.security.require_role(admin, Role::Admin, now)?;
        self.security.grant_role(target, role, expires_at);
        Ok(())
    }

    pub fn revoke_role(&mut self, admin: &Address, target: &Address, now: Timestamp) -> Result<()> {
        self.security.require_role(admin, Role::Admin, now)?;
        self.security.revoke_role(target);
        Ok(())
    }

    pub fn set_paused(&mut self, admin: &Address, kind: TransactionKind, paused: bool, now: Timestamp) -> Result<()> {
        self.security.require_role(admin, Role::Admin, now)?;
        self.security.set_paused(kind, paused);
        Ok(())
    }

    pub fn set_emergency(&mut self, admin: &Address, active: bool, now: Timestamp) -> Result<()> {
        self.security.require_role(admin, Role::Admin, now)?;
        self.security.set_emergency(active);
        Ok(())
    }

    pub fn set_fee(&mut self, admin: &Address, kind: TransactionKind, amount: u64, now: Timestamp) -> Result<()> {
        self.security.require_role(admin, Role::Admin, now)?;
        self.security.set_fee(kind, amount);
        Ok(())
    }

    // ---- dispatcher ---------------------------------------------------

    /// Route one transaction through the security gate, fee debit, handler,
    /// and invariant check, in that order. The fee is refunded if the
    /// handler fails, so a rejected transaction never costs the submitter
    /// anything beyond gas already spent getting here.
    pub fn process(&mut self, tx: Transaction, submitter: &Address, fee: u64, tx_hash: Digest) -> Result<ProcessOutcome> {
        let now = self.clock.now();
        let kind = tx.kind();
        self.security.check_gate(kind)?;

        let min_fee = self.security.fee_for(kind);
        if fee < min_fee {
            return Err(DaoError::InvalidThreshold(format!(
                "fee {fee} below the required minimum {min_fee} for {kind:?}"
            )));
        }
        if fee > 0 {
            self.ledger.burn(submitter, fee)?;
            self.sync_holder(submitter, now);
        }

        match self.dispatch(tx, submitter, tx_hash, now) {
            Ok(outcome) => {
                self.assert_invariants()?;
                Ok(outcome)
            }
            Err(err) => {
                if fee > 0 {
                    let _ = self.ledger.mint(submitter, fee);
                    self.sync_holder(submitter, now);
                }
                Err(err)
            }
        }
    }

    fn dispatch(&mut self, tx: Transaction, submitter: &Address, tx_hash: Digest, now: Timestamp) -> Result<ProcessOutcome> {
        match tx {
            Transaction::CreateProposal {
                title,
                description,
                proposal_type,
                voting_type,
                start_time,
                end_time,
                threshold_bp,
                metadata,
                payload,
            } => {
                let id = self.create_proposal(
                    submitter,
                    title,
                    description,
                    proposal_type,
                    voting_type,
                    start_time,
                    end_time,
                    threshold_bp,
                    metadata,
                    payload,
                    tx_hash,
                    now,
                )?;
                Ok(ProcessOutcome::ProposalCreated(id))
            }
            Transaction::CastVote {
                proposal_id,
                choice,
                declared_weight,
                reason,
            } => {
                self.vote(submitter, proposal_id, choice, declared_weight, reason, now)?;
                Ok(ProcessOutcome::Voted)
            }
            Transaction::Delegate { delegate, expiry } => {
                self.delegate(submitter, &delegate, expiry, now)?;
                Ok(ProcessOutcome::Delegated)
            }
            Transaction::RevokeDelegation => {
                self.revoke_delegation(submitter, now)?;
                Ok(ProcessOutcome::DelegationRevoked)
            }
            Transaction::CreateTreasuryTx {
                recipient,
                amount,
                purpose,
            } => {
                let id = self.create_treasury_tx(submitter, recipient, amount, purpose, tx_hash, now)?;
                Ok(ProcessOutcome::TreasuryTxCreated(id))
            }
            Transaction::SignTreasuryTx { tx_id, signature } => {
                let executed = self.sign_treasury_tx(submitter, tx_id, &signature, now)?;
                Ok(ProcessOutcome::TreasurySigned { executed })
            }
            Transaction::UpdateTreasurySigners { signers, required } => {
                self.update_treasury_signers(submitter, signers, required, now)?;
                Ok(ProcessOutcome::TreasurySignersUpdated)
            }
            Transaction::Mint { to, amount } => {
                self.mint(submitter, &to, amount, now)?;
                Ok(ProcessOutcome::Minted)
            }
            Transaction::Burn { amount } => {
                self.burn(submitter, amount, now)?;
                Ok(ProcessOutcome::Burned)
            }
            Transaction::Distribute {
                category,
                beneficiary,
                amount,
            } => {
                let schedule_id = self.distribute(submitter, category, beneficiary, amount, now)?;
                Ok(ProcessOutcome::Distributed { schedule_id })
            }
            Transaction::ClaimVesting { schedule_id } => {
                let amount = self.claim_vesting(submitter, schedule_id, now)?;
                Ok(ProcessOutcome::VestingClaimed(amount))
            }
            Transaction::Stake { amount } => {
                self.stake(submitter, amount, now)?;
                Ok(ProcessOutcome::Staked)
            }
            Transaction::Unstake { amount } => {
                self.unstake(submitter, amount, now)?;
                Ok(ProcessOutcome::Unstaked)
            }
            Transaction::ClaimRewards => {
                let amount = self.claim_rewards(submitter, now)?;
                Ok(ProcessOutcome::RewardsClaimed(amount))
            }
            Transaction::ApplyParameterChange { change } => {
                self.apply_parameter_change_direct(submitter, change, now)?;
                Ok(ProcessOutcome::ParameterApplied)
            }
        }
    }
}

/// One variant per `TransactionKind`; carries exactly the fields its
/// handler needs. The submitter, fee, and tx hash are supplied separately
/// to `Dao::process`, not embedded here.
#[derive(Debug, Clone)]
pub enum Transaction {
    CreateProposal {
        title: String,
        description: String,
        proposal_type: ProposalType,
        voting_type: VotingType,
        start_time: Timestamp,
        end_time: Timestamp,
        threshold_bp: u32,
        metadata: Digest,
        payload: Option<ProposalPayload>,
    },
    CastVote {
        proposal_id: Digest,
        choice: VoteChoice,
        declared_weight: u64,
        reason: String,
    },
    Delegate {
        delegate: Address,
        expiry: Timestamp,
    },
    RevokeDelegation,
    CreateTreasuryTx {
        recipient: Address,
        amount: u64,
        purpose: String,
    },
    SignTreasuryTx {
        tx_id: Digest,
        signature: Vec<u8>,
    },
    UpdateTreasurySigners {
        signers: Vec<Address>,
        required: u32,
    },
    Mint {
        to: Address,
        amount: u64,
    },
    Burn {
        amount: u64,
    },
    Distribute {
        category: DistributionCategory,
        beneficiary: Address,
        amount: u64,
    },
    ClaimVesting {
        schedule_id: u64,
    },
    Stake {
        amount: u64,
    },
    Unstake {
        amount: u64,
    },
    ClaimRewards,
    ApplyParameterChange {
        change: ParameterChange,
    },
}

impl Transaction {
    pub fn kind(&self) -> TransactionKind {
        match self {
            Transaction::CreateProposal { .. } => TransactionKind::Proposal,
            Transaction::CastVote { .. } => TransactionKind::Vote,
            Transaction::Delegate { .. } | Transaction::RevokeDelegation => TransactionKind::Delegation,
            Transaction::CreateTreasuryTx { .. }
            | Transaction::SignTreasuryTx { .. }
            | Transaction::UpdateTreasurySigners { .. } => TransactionKind::Treasury,
            Transaction::Mint { .. } => TransactionKind::TokenMint,
            Transaction::Burn { .. } => TransactionKind::TokenBurn,
            Transaction::Distribute { .. } => TransactionKind::TokenDistribution,
            Transaction::ClaimVesting { .. } => TransactionKind::VestingClaim,
            Transaction::Stake { .. } => TransactionKind::Stake,
            Transaction::Unstake { .. } => TransactionKind::Unstake,
            Transaction::ClaimRewards => TransactionKind::ClaimRewards,
            Transaction::ApplyParameterChange { .. } => TransactionKind::ParameterProposal,
        }
    }
}

#[derive(Debug, Clone)]
pub enum ProcessOutcome {
    ProposalCreated(Digest),
    Voted,
    Delegated,
    DelegationRevoked,
    TreasuryTxCreated(Digest),
    TreasurySigned { executed: bool },
    TreasurySignersUpdated,
    Minted,
    Burned,
    Distributed { schedule_id: Option<u64> },
    VestingClaimed(u64),
    Staked,
    Unstaked,
    RewardsClaimed(u64),
    ParameterApplied,
}

/// Thin mutex wrapper for callers that need `Dao` shared across threads.
/// `Dao` itself holds no internal locking — the core's resource model is
/// single-threaded cooperative over one logical state.
pub struct SyncDao(Mutex<Dao>);

impl SyncDao {
    pub fn new(dao: Dao) -> Self {
        Self(Mutex::new(dao))
    }

    pub fn with<T>(&self, f: impl FnOnce(&mut Dao) -> T) -> T {
        let mut guard = self.0.lock().expect("Dao mutex poisoned");
        f(&mut guard)
    }
}
