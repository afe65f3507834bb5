//! Reputation engine: event-driven score adjustments and inactivity decay.
//! Each event nudges a holder's score; inactivity decays it over time.

use crate::config::ReputationConfig;
use crate::history::{hash_serializable, ChainHashable, HistoryLog};
use crate::token::holder::HolderRegistry;
use crate::types::{Address, Digest, Timestamp};
use sha2::Sha256;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReputationEventType {
    ProposalCreated,
    VoteCast,
    ProposalPassed,
    ProposalRejected,
}

impl ReputationEventType {
    fn impact(self, cfg: &ReputationConfig) -> i64 {
        match self {
            ReputationEventType::ProposalCreated => cfg.proposal_created_bonus as i64,
            ReputationEventType::VoteCast => cfg.voting_participation_bonus as i64,
            ReputationEventType::ProposalPassed => cfg.proposal_passed_bonus as i64,
            ReputationEventType::ProposalRejected => -(cfg.proposal_rejected_penalty as i64),
        }
    }

    fn discriminant(self) -> u8 {
        match self {
            ReputationEventType::ProposalCreated => 0,
            ReputationEventType::VoteCast => 1,
            ReputationEventType::ProposalPassed => 2,
            ReputationEventType::ProposalRejected => 3,
        }
    }
}

/// The payload half of a reputation-history entry; `addr` and `timestamp`
/// live on the enclosing `HistoryEntry` as `actor`/`timestamp`.
#[derive(Debug, Clone)]
pub struct ReputationEventPayload {
    pub event_type: ReputationEventType,
    pub impact: i64,
    pub context: Digest,
}

impl ChainHashable for ReputationEventPayload {
    fn hash_into(&self, hasher: &mut Sha256) {
        hash_serializable(hasher, &self.event_type.discriminant());
        hash_serializable(hasher, &self.impact);
        hash_serializable(hasher, &self.context);
    }
}

pub type ReputationEvent = crate::history::HistoryEntry<ReputationEventPayload>;

#[derive(Debug, Clone)]
pub struct ReputationEngine {
    pub config: ReputationConfig,
    history: HashMap<Address, HistoryLog<ReputationEventPayload>>,
}

impl ReputationEngine {
    pub fn new(config: ReputationConfig) -> Self {
        Self {
            config,
            history: HashMap::new(),
        }
    }

    pub fn history_of(&self, addr: &Address) -> &[ReputationEvent] {
        self.history.get(addr).map(|log| log.entries()).unwrap_or(&[])
    }

    /// Recompute one holder's event-log chain hashes and confirm none were
    /// tampered with or reordered.
    pub fn history_verified(&self, addr: &Address) -> bool {
        self.history.get(addr).map(|log| log.verify()).unwrap_or(true)
    }

    /// Apply an event's impact to `addr`'s current score (clamped) and log it.
    /// The holder record must already exist (callers `ensure` it first).
    pub fn record(
        &mut self,
        holders: &mut HolderRegistry,
        addr: &Address,
        event_type: ReputationEventType,
        now: Timestamp,
        context: Digest,
    ) {
        let impact = event_type.impact(&self.config);
        let current = holders.reputation_of(addr) as i64;
        let updated = (current + impact).clamp(self.config.min_score as i64, self.config.max_score as i64);
        holders.set_reputation(addr, updated as u64);
        self.history.entry(addr.clone()).or_default().append(
            addr.clone(),
            now,
            ReputationEventPayload {
                event_type,
                impact,
                context,
            },
        );
        tracing::debug!(addr = %addr, ?event_type, impact, "reputation event recorded");
    }

    /// Multiply every idle holder's score by `(1 - decay_rate)^k`, where `k`
    /// is the number of whole decay periods elapsed since `last_active`.
    pub fn apply_inactivity_decay(&mut self, holders: &mut HolderRegistry, now: Timestamp) {
        let period_secs = self.config.decay_period_days.saturating_mul(86_400);
        if period_secs == 0 {
            return;
        }
        let addrs: Vec<Address> = holders.iter().map(|h| h.address.clone()).collect();
        for addr in addrs {
            let (last_active, score) = match holders.get(&addr) {
                Some(h) => (h.last_active, h.reputation),
                None => continue,
            };
            let idle = now.saturating_sub(last_active);
            let k = idle / period_secs;
            if k == 0 {
                continue;
            }
            let decayed = decay_score(score, self.config.decay_rate_bp, k);
            let decayed = decayed.max(self.config.min_score);
            holders.set_reputation(&addr, decayed);
            tracing::debug!(addr = %addr, k, decayed, "reputation decayed for inactivity");
        }
    }

    /// Deterministically recompute every holder's score from scratch:
    /// `base + balance/100`, then replay the event log in order. Idempotent.
    pub fn recalculate_all(&mut self, holders: &mut HolderRegistry) {
        let addrs: Vec<Address> = holders.iter().map(|h| h.address.clone()).collect();
        for addr in addrs {
            let balance = holders.get(&addr).map(|h| h.balance).unwrap_or(0);
            let mut score = (self.config.base_score + balance / 100) as i64;
            score = score.clamp(self.config.min_score as i64, self.config.max_score as i64);
            if let Some(log) = self.history.get(&addr) {
                for ev in log.entries() {
                    score = (score + ev.payload.impact)
                        .clamp(self.config.min_score as i64, self.config.max_score as i64);
                }
            }
            holders.set_reputation(&addr, score as u64);
        }
    }

    /// Ranking by score descending, ties broken by address ascending.
    pub fn ranking(&self, holders: &HolderRegistry) -> Vec<(Address, u64)> {
        let mut ranked: Vec<(Address, u64)> = holders
            .iter()
            .map(|h| (h.address.clone(), h.reputation))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked
    }
}

fn decay_score(score: u64, decay_rate_bp: u32, periods: u64) -> u64 {
    let mut value = score as u128;
    let retain_bp = 10_000u128.saturating_sub(decay_rate_bp as u128);
    for _ in 0..periods {
        value = value * retain_bp / 10_000;
    }
    value as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::holder::HolderRegistry;

    fn setup() -> (ReputationEngine, HolderRegistry, Address) {
        let cfg = ReputationConfig::default();
        let mut holders = HolderRegistry::default();
        let addr = Address::new("a");
        holders.ensure(&addr, 0, 0, &cfg);
        (ReputationEngine::new(cfg), holders, addr)
    }

    #[test]
    fn record_clamps_to_configured_bounds() {
        let (mut engine, mut holders, addr) = setup();
        for _ in 0..1_000 {
            engine.record(
                &mut holders,
                &addr,
                ReputationEventType::ProposalRejected,
                0,
                [0u8; 32],
            );
        }
        assert_eq!(holders.reputation_of(&addr), engine.config.min_score);
        assert!(engine.history_verified(&addr));
        assert_eq!(engine.history_of(&addr).len(), 1_000);
    }

    #[test]
    fn decay_score_shrinks_geometrically_and_never_grows() {
        assert_eq!(decay_score(1_000, 500, 0), 1_000);
        let once = decay_score(1_000, 500, 1);
        assert!(once < 1_000);
        let twice = decay_score(1_000, 500, 2);
        assert!(twice < once);
    }

    #[test]
    fn apply_inactivity_decay_only_touches_idle_holders() {
        let (mut engine, mut holders, addr) = setup();
        holders.set_reputation(&addr, 1_000);
        let period = engine.config.decay_period_days * 86_400;
        engine.apply_inactivity_decay(&mut holders, period - 1);
        assert_eq!(holders.reputation_of(&addr), 1_000);
        engine.apply_inactivity_decay(&mut holders, period);
        assert!(holders.reputation_of(&addr) < 1_000);
    }

    #[test]
    fn recalculate_all_replays_events_from_base_deterministically() {
        let (mut engine, mut holders, addr) = setup();
        engine.record(&mut holders, &addr, ReputationEventType::ProposalCreated, 0, [0u8; 32]);
        engine.record(&mut holders, &addr, ReputationEventType::VoteCast, 1, [0u8; 32]);
        let before = holders.reputation_of(&addr);
        engine.recalculate_all(&mut holders);
        assert_eq!(holders.reputation_of(&addr), before);
    }
}
