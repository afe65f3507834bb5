//! End-to-end governance scenarios (basic flow, proposal + vote, treasury
//! multisig, delegation, quadratic voting, vesting claim) plus the
//! invariant checks that should hold after every one of them.

use dao_core::clock::FixedClock;
use dao_core::config::DaoConfig;
use dao_core::signing::EchoVerifier;
use dao_core::treasury::signing_payload;
use dao_core::types::{
    Address, DistributionCategory, ProposalType, Role, VoteChoice, VotingType,
};
use dao_core::{Dao, DaoInit};

fn addr(s: &str) -> Address {
    Address::new(s)
}

fn new_dao(now: u64) -> Dao {
    let init = DaoInit {
        clock: Box::new(FixedClock::new(now)),
        verifier: Box::new(EchoVerifier),
        metadata: None,
        token_symbol: "GOV".into(),
        token_name: "Governance Token".into(),
        token_decimals: 6,
        treasury_address: addr("treasury"),
        treasury_signers: vec![addr("signer-a"), addr("signer-b"), addr("signer-c")],
        treasury_required_signatures: 2,
        staking_pool_address: addr("staking-pool"),
        staking_reward_rate_bp: 500,
        staking_lockup_secs: 0,
        max_supply: 1_000_000,
        distribution_caps: vec![
            (DistributionCategory::Founders, 1_500),
            (DistributionCategory::Team, 1_500),
            (DistributionCategory::Community, 4_000),
            (DistributionCategory::Treasury, 2_000),
            (DistributionCategory::Ecosystem, 1_000),
        ],
    };
    Dao::new(DaoConfig::default(), init).expect("dao construction")
}

#[test]
fn basic_flow_mint_transfer_burn() {
    let mut dao = new_dao(1_000);
    let alice = addr("alice");
    let bob = addr("bob");
    let admin = addr("admin");
    dao.security.grant_role(admin.clone(), Role::Admin, 0);

    dao.mint(&admin, &alice, 10_000, 1_000).unwrap();
    assert_eq!(dao.ledger.balance_of(&alice), 10_000);
    assert_eq!(dao.ledger.total_supply(), 10_000);

    dao.transfer(&alice, &bob, 4_000, 1_000).unwrap();
    assert_eq!(dao.ledger.balance_of(&alice), 6_000);
    assert_eq!(dao.ledger.balance_of(&bob), 4_000);

    dao.burn(&bob, 1_000, 1_000).unwrap();
    assert_eq!(dao.ledger.balance_of(&bob), 3_000);
    assert_eq!(dao.ledger.total_supply(), 9_000);

    dao.assert_invariants().unwrap();
}

#[test]
fn proposal_lifecycle_simple_vote_passes() {
    let mut dao = new_dao(0);
    let admin = addr("admin");
    dao.security.grant_role(admin.clone(), Role::Admin, 0);

    let alice = addr("alice");
    let bob = addr("bob");
    let carol = addr("carol");
    dao.mint(&admin, &alice, 5_000, 0).unwrap();
    dao.mint(&admin, &bob, 3_000, 0).unwrap();
    dao.mint(&admin, &carol, 2_000, 0).unwrap();

    let id = dao
        .create_proposal(
            &alice,
            "Raise quorum".into(),
            "Adjust the quorum threshold".into(),
            ProposalType::General,
            VotingType::Simple,
            0,
            100_000,
            5_100,
            [0u8; 32],
            None,
            [1u8; 32],
            0,
        )
        .unwrap();
    assert_eq!(dao.proposals.get(&id).unwrap().status, dao_core::types::ProposalStatus::Pending);
    dao.update_statuses(0);
    assert_eq!(dao.proposals.get(&id).unwrap().status, dao_core::types::ProposalStatus::Active);

    dao.vote(&alice, id, VoteChoice::Yes, 1, String::new(), 10).unwrap();
    dao.vote(&bob, id, VoteChoice::Yes, 1, String::new(), 10).unwrap();
    dao.vote(&carol, id, VoteChoice::No, 1, String::new(), 10).unwrap();

    assert!(matches!(
        dao.vote(&alice, id, VoteChoice::No, 1, String::new(), 10),
        Err(dao_core::error::DaoError::DuplicateVote(_))
    ));

    let finalized = dao.update_statuses(100_001);
    assert_eq!(finalized, vec![id]);
    let proposal = dao.proposals.get(&id).unwrap();
    assert!(proposal.results.passed);
    assert_eq!(proposal.results.yes, 2);
    assert_eq!(proposal.results.no, 1);

    dao.assert_invariants().unwrap();
}

#[test]
fn treasury_two_of_three_multisig_executes_on_threshold() {
    let mut dao = new_dao(0);
    let admin = addr("admin");
    dao.security.grant_role(admin.clone(), Role::Admin, 0);
    for s in ["signer-a", "signer-b", "signer-c"] {
        dao.security.grant_role(addr(s), Role::Signer, 0);
    }
    dao.mint(&admin, &addr("treasury"), 10_000, 0).unwrap();

    let recipient = addr("vendor");
    let tx_id = dao
        .create_treasury_tx(&addr("signer-a"), recipient.clone(), 2_500, "grant payout".into(), [9u8; 32], 0)
        .unwrap();

    let payload = signing_payload(&tx_id, &recipient, 2_500, "grant payout", 0);
    let sig_a = EchoVerifier::sign(&payload, addr("signer-a").as_str().as_bytes());
    let sig_b = EchoVerifier::sign(&payload, addr("signer-b").as_str().as_bytes());

    let executed_after_first = dao.sign_treasury_tx(&addr("signer-a"), tx_id, &sig_a, 10).unwrap();
    assert!(!executed_after_first);

    let executed_after_second = dao.sign_treasury_tx(&addr("signer-b"), tx_id, &sig_b, 20).unwrap();
    assert!(executed_after_second);

    assert_eq!(dao.ledger.balance_of(&recipient), 2_500);
    assert_eq!(dao.ledger.balance_of(&addr("treasury")), 7_500);
    dao.assert_invariants().unwrap();
}

#[test]
fn delegation_moves_weighted_voting_power() {
    let mut dao = new_dao(0);
    let admin = addr("admin");
    dao.security.grant_role(admin.clone(), Role::Admin, 0);
    let alice = addr("alice");
    let bob = addr("bob");
    dao.mint(&admin, &alice, 6_000, 0).unwrap();
    dao.mint(&admin, &bob, 1_000, 0).unwrap();

    dao.delegate(&alice, &bob, 0, 0).unwrap();
    assert_eq!(dao.delegations.effective_power(&alice, &dao.ledger, 10), 0);
    assert_eq!(dao.delegations.effective_power(&bob, &dao.ledger, 10), 7_000);

    let id = dao
        .create_proposal(
            &bob,
            "Delegated vote test".into(),
            "desc".into(),
            ProposalType::General,
            VotingType::Weighted,
            0,
            100_000,
            5_100,
            [0u8; 32],
            None,
            [2u8; 32],
            0,
        )
        .unwrap();
    dao.update_statuses(0);
    dao.vote(&bob, id, VoteChoice::Yes, 7_000, String::new(), 10).unwrap();
    assert_eq!(dao.proposals.get(&id).unwrap().results.yes, 7_000);
}

#[test]
fn quadratic_voting_burns_cost_and_preserves_invariant() {
    let mut dao = new_dao(0);
    let admin = addr("admin");
    dao.security.grant_role(admin.clone(), Role::Admin, 0);
    let alice = addr("alice");
    dao.mint(&admin, &alice, 1_000, 0).unwrap();

    let id = dao
        .create_proposal(
            &alice,
            "Quadratic test".into(),
            "desc".into(),
            ProposalType::General,
            VotingType::Quadratic,
            0,
            100_000,
            5_100,
            [0u8; 32],
            None,
            [3u8; 32],
            0,
        )
        .unwrap();
    dao.update_statuses(0);
    dao.vote(&alice, id, VoteChoice::Yes, 10, String::new(), 10).unwrap();
    assert_eq!(dao.ledger.balance_of(&alice), 900); // 1000 - 10^2
    assert_eq!(dao.proposals.get(&id).unwrap().results.yes, 10);
    dao.assert_invariants().unwrap();
}

#[test]
fn vesting_claim_mints_only_what_has_vested() {
    // Shrink the "month" unit to one second so the founders' 12mo cliff /
    // 48mo duration policy is exercisable with small, deterministic ticks.
    let mut config = DaoConfig::default();
    config.vesting_month_secs = 1;
    let init = DaoInit {
        clock: Box::new(FixedClock::new(0)),
        verifier: Box::new(EchoVerifier),
        metadata: None,
        token_symbol: "GOV".into(),
        token_name: "Governance Token".into(),
        token_decimals: 6,
        treasury_address: addr("treasury"),
        treasury_signers: vec![addr("signer-a"), addr("signer-b"), addr("signer-c")],
        treasury_required_signatures: 2,
        staking_pool_address: addr("staking-pool"),
        staking_reward_rate_bp: 500,
        staking_lockup_secs: 0,
        max_supply: 1_000_000,
        distribution_caps: vec![
            (DistributionCategory::Founders, 1_500),
            (DistributionCategory::Team, 1_500),
            (DistributionCategory::Community, 4_000),
            (DistributionCategory::Treasury, 2_000),
            (DistributionCategory::Ecosystem, 1_000),
        ],
    };
    let mut dao = Dao::new(config, init).expect("dao construction");
    let admin = addr("admin");
    dao.security.grant_role(admin.clone(), Role::Admin, 0);
    let alice = addr("alice");

    // Founders: linear, cliff 12mo, duration 48mo -> 12s / 48s here.
    let schedule_id = dao
        .distribute(&admin, DistributionCategory::Founders, alice.clone(), 1_000, 0)
        .unwrap()
        .expect("founder allocations vest");

    // Before the cliff, nothing is claimable.
    assert!(dao.claim_vesting(&alice, schedule_id, 0).is_err());
    assert!(dao.claim_vesting(&alice, schedule_id, 11).is_err());

    // At the cliff, 12/48 = 25% unlocks immediately.
    let claimed = dao.claim_vesting(&alice, schedule_id, 12).unwrap();
    assert_eq!(claimed, 250);
    assert_eq!(dao.ledger.balance_of(&alice), 250);

    // Halfway through the schedule, another 25% has vested.
    let claimed_more = dao.claim_vesting(&alice, schedule_id, 24).unwrap();
    assert_eq!(claimed_more, 250);
    assert_eq!(dao.ledger.balance_of(&alice), 500);

    // At the end of the duration, the remainder is claimable.
    let claimed_rest = dao.claim_vesting(&alice, schedule_id, 48).unwrap();
    assert_eq!(claimed_rest, 500);
    assert_eq!(dao.ledger.balance_of(&alice), 1_000);

    dao.assert_invariants().unwrap();
}

#[test]
fn parameter_and_treasury_history_chains_verify() {
    let mut dao = new_dao(0);
    let admin = addr("admin");
    dao.security.grant_role(admin.clone(), Role::Admin, 0);
    for s in ["signer-a", "signer-b"] {
        dao.security.grant_role(addr(s), Role::Signer, 0);
    }
    dao.mint(&admin, &addr("treasury"), 5_000, 0).unwrap();

    dao.apply_parameter_change_direct(
        &admin,
        dao_core::types::ParameterChange {
            name: "quorum_threshold_bp".into(),
            value: dao_core::types::ParameterValue::U64(4_200),
        },
        10,
    )
    .unwrap();
    assert!(dao.parameters.history_verified());
    let record = &dao.parameters.history()[0];
    assert_eq!(record.actor, admin);
    assert_eq!(record.payload.name, "quorum_threshold_bp");

    let recipient = addr("vendor");
    let tx_id = dao
        .create_treasury_tx(&addr("signer-a"), recipient.clone(), 1_000, "ops".into(), [5u8; 32], 0)
        .unwrap();
    let payload = signing_payload(&tx_id, &recipient, 1_000, "ops", 0);
    let sig_a = EchoVerifier::sign(&payload, addr("signer-a").as_str().as_bytes());
    let sig_b = EchoVerifier::sign(&payload, addr("signer-b").as_str().as_bytes());
    dao.sign_treasury_tx(&addr("signer-a"), tx_id, &sig_a, 0).unwrap();
    dao.sign_treasury_tx(&addr("signer-b"), tx_id, &sig_b, 0).unwrap();

    assert!(dao.treasury.audit_verified());
    // create_tx, sign (signer-a), sign (signer-b), execute-on-threshold.
    assert_eq!(dao.treasury.audit_trail().len(), 4);
}

#[test]
fn pending_proposal_can_be_cancelled_only_by_creator() {
    let mut dao = new_dao(0);
    let admin = addr("admin");
    dao.security.grant_role(admin.clone(), Role::Admin, 0);
    let alice = addr("alice");
    let bob = addr("bob");
    dao.mint(&admin, &alice, 5_000, 0).unwrap();

    let id = dao
        .create_proposal(
            &alice,
            "Cancel me".into(),
            "desc".into(),
            ProposalType::General,
            VotingType::Simple,
            3_600,
            100_000,
            5_100,
            [0u8; 32],
            None,
            [4u8; 32],
            0,
        )
        .unwrap();
    assert_eq!(
        dao.proposals.get(&id).unwrap().status,
        dao_core::types::ProposalStatus::Pending
    );

    assert!(dao.cancel_proposal(id, &bob, 0).is_err());
    dao.cancel_proposal(id, &alice, 0).unwrap();
    assert_eq!(
        dao.proposals.get(&id).unwrap().status,
        dao_core::types::ProposalStatus::Cancelled
    );
    assert!(dao.cancel_proposal(id, &alice, 0).is_err());
}

#[test]
fn treasury_execution_does_not_stick_a_tx_as_executed_when_the_transfer_would_fail() {
    let mut dao = new_dao(0);
    let admin = addr("admin");
    dao.security.grant_role(admin.clone(), Role::Admin, 0);
    for s in ["signer-a", "signer-b", "signer-c"] {
        dao.security.grant_role(addr(s), Role::Signer, 0);
    }
    dao.mint(&admin, &addr("treasury"), 10_000, 0).unwrap();

    // Recipient is the treasury's own address: the ledger's self-transfer
    // guard will refuse this move, so the tx must never end up executed.
    let recipient = addr("treasury");
    let tx_id = dao
        .create_treasury_tx(
            &addr("signer-a"),
            recipient.clone(),
            2_500,
            "misdirected payout".into(),
            [7u8; 32],
            0,
        )
        .unwrap();
    let payload = signing_payload(&tx_id, &recipient, 2_500, "misdirected payout", 0);
    let sig_a = EchoVerifier::sign(&payload, addr("signer-a").as_str().as_bytes());
    let sig_b = EchoVerifier::sign(&payload, addr("signer-b").as_str().as_bytes());

    dao.sign_treasury_tx(&addr("signer-a"), tx_id, &sig_a, 10).unwrap();
    assert!(dao.sign_treasury_tx(&addr("signer-b"), tx_id, &sig_b, 20).is_err());

    assert!(!dao.treasury.pending(&tx_id).unwrap().executed);
    assert_eq!(dao.ledger.balance_of(&addr("treasury")), 10_000);
    dao.assert_invariants().unwrap();
}

#[test]
fn require_role_distinguishes_never_granted_from_expired_grant() {
    let mut dao = new_dao(0);
    let never_granted = addr("stranger");
    let once_granted = addr("lapsed");
    dao.security.grant_role(once_granted.clone(), Role::Signer, 50);

    assert!(matches!(
        dao.security.require_role(&never_granted, Role::Signer, 0),
        Err(dao_core::error::DaoError::Unauthorized(_))
    ));
    assert!(matches!(
        dao.security.require_role(&once_granted, Role::Signer, 100),
        Err(dao_core::error::DaoError::RoleExpired(_))
    ));
}
