//! Typed parameter registry: the governable knobs named in `DaoConfig`,
//! each with a constraint checked before a parameter-change proposal is
//! allowed to apply.

use crate::error::{DaoError, Result};
use crate::history::{hash_serializable, ChainHashable, HistoryEntry, HistoryLog};
use crate::types::{Address, Digest, ParameterChange, ParameterValue, Timestamp};
use sha2::Sha256;
use std::collections::HashMap;

/// A bound a parameter's new value must satisfy.
#[derive(Debug, Clone)]
pub enum Constraint {
    U64Range { min: u64, max: u64 },
    I64Range { min: i64, max: i64 },
    Bool,
    None,
}

impl Constraint {
    fn check(&self, value: &ParameterValue) -> Result<()> {
        match (self, value) {
            (Constraint::U64Range { min, max }, ParameterValue::U64(v)) => {
                if v < min || v > max {
                    return Err(DaoError::InvalidThreshold(format!(
                        "value {v} outside allowed range {min}..={max}"
                    )));
                }
                Ok(())
            }
            (Constraint::I64Range { min, max }, ParameterValue::I64(v)) => {
                if v < min || v > max {
                    return Err(DaoError::InvalidThreshold(format!(
                        "value {v} outside allowed range {min}..={max}"
                    )));
                }
                Ok(())
            }
            (Constraint::Bool, ParameterValue::Bool(_)) => Ok(()),
            (Constraint::None, _) => Ok(()),
            _ => Err(DaoError::InvalidProposal(
                "parameter value type does not match its constraint".into(),
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParameterDescriptor {
    pub name: String,
    pub value: ParameterValue,
    pub constraint: Constraint,
}

/// The payload half of a parameter-change history entry; `executor` and
/// `applied_at` live on the enclosing [`HistoryEntry`] as `actor`/`timestamp`.
#[derive(Debug, Clone)]
pub struct ParameterChangePayload {
    pub name: String,
    pub old_value: ParameterValue,
    pub new_value: ParameterValue,
    /// Set when the change came from an executed parameter proposal.
    pub proposal_id: Option<Digest>,
}

impl ChainHashable for ParameterChangePayload {
    fn hash_into(&self, hasher: &mut Sha256) {
        hash_serializable(hasher, &self.name);
        hash_serializable(hasher, &self.old_value);
        hash_serializable(hasher, &self.new_value);
        hash_serializable(hasher, &self.proposal_id);
    }
}

pub type ParameterChangeRecord = HistoryEntry<ParameterChangePayload>;

#[derive(Debug, Clone, Default)]
pub struct ParameterRegistry {
    descriptors: HashMap<String, ParameterDescriptor>,
    history: HistoryLog<ParameterChangePayload>,
}

impl ParameterRegistry {
    pub fn register(&mut self, name: impl Into<String>, value: ParameterValue, constraint: Constraint) {
        let name = name.into();
        constraint
            .check(&value)
            .expect("built-in default parameter value must satisfy its own constraint");
        self.descriptors.insert(
            name.clone(),
            ParameterDescriptor {
                name,
                value,
                constraint,
            },
        );
    }

    pub fn get(&self, name: &str) -> Option<&ParameterDescriptor> {
        self.descriptors.get(name)
    }

    pub fn history(&self) -> &[ParameterChangeRecord] {
        self.history.entries()
    }

    /// Recompute the change log's chain hashes and confirm none were
    /// tampered with or reordered.
    pub fn history_verified(&self) -> bool {
        self.history.verify()
    }

    pub fn validate(&self, change: &ParameterChange) -> Result<()> {
        let descriptor = self
            .descriptors
            .get(&change.name)
            .ok_or_else(|| DaoError::InvalidProposal(format!("unknown parameter {}", change.name)))?;
        descriptor.constraint.check(&change.value)
    }

    pub fn apply(
        &mut self,
        change: ParameterChange,
        executor: Address,
        proposal_id: Option<Digest>,
        now: Timestamp,
    ) -> Result<()> {
        self.validate(&change)?;
        let descriptor = self
            .descriptors
            .get_mut(&change.name)
            .expect("validated above");
        let old_value = descriptor.value.clone();
        descriptor.value = change.value.clone();
        self.history.append(
            executor,
            now,
            ParameterChangePayload {
                name: change.name,
                old_value,
                new_value: change.value,
                proposal_id,
            },
        );
        Ok(())
    }

    /// Seed the registry from `DaoConfig` defaults with sane constraints.
    pub fn seeded(config: &crate::config::DaoConfig) -> Self {
        let mut registry = Self::default();
        registry.register(
            "min_proposal_threshold",
            ParameterValue::U64(config.min_proposal_threshold),
            Constraint::U64Range {
                min: 0,
                max: u64::MAX,
            },
        );
        registry.register(
            "min_voting_period",
            ParameterValue::U64(config.min_voting_period),
            Constraint::U64Range {
                min: 3_600,
                max: 30 * 24 * 60 * 60,
            },
        );
        registry.register(
            "quorum_threshold_bp",
            ParameterValue::U64(config.quorum_threshold_bp as u64),
            Constraint::U64Range { min: 1, max: 10_000 },
        );
        registry.register(
            "treasury_expiry_secs",
            ParameterValue::U64(config.treasury_expiry_secs),
            Constraint::U64Range {
                min: 3_600,
                max: 365 * 24 * 60 * 60,
            },
        );
        registry.register(
            "max_treasury_withdraw",
            ParameterValue::U64(u64::MAX),
            Constraint::U64Range {
                min: 0,
                max: u64::MAX,
            },
        );
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_panics_if_default_violates_its_own_constraint() {
        let result = std::panic::catch_unwind(|| {
            let mut registry = ParameterRegistry::default();
            registry.register(
                "bad",
                ParameterValue::U64(100),
                Constraint::U64Range { min: 0, max: 10 },
            );
        });
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_unknown_parameter_and_out_of_range_value() {
        let mut registry = ParameterRegistry::default();
        registry.register(
            "quorum_threshold_bp",
            ParameterValue::U64(1_000),
            Constraint::U64Range { min: 1, max: 10_000 },
        );
        assert!(registry
            .validate(&ParameterChange {
                name: "nope".into(),
                value: ParameterValue::U64(1)
            })
            .is_err());
        assert!(registry
            .validate(&ParameterChange {
                name: "quorum_threshold_bp".into(),
                value: ParameterValue::U64(20_000)
            })
            .is_err());
    }

    #[test]
    fn apply_updates_value_and_appends_history() {
        let mut registry = ParameterRegistry::default();
        registry.register(
            "quorum_threshold_bp",
            ParameterValue::U64(1_000),
            Constraint::U64Range { min: 1, max: 10_000 },
        );
        registry
            .apply(
                ParameterChange {
                    name: "quorum_threshold_bp".into(),
                    value: ParameterValue::U64(2_000),
                },
                Address::new("admin"),
                None,
                100,
            )
            .unwrap();
        assert_eq!(
            registry.get("quorum_threshold_bp").unwrap().value.as_u64(),
            Some(2_000)
        );
        assert_eq!(registry.history().len(), 1);
        assert!(registry.history_verified());
    }

    #[test]
    fn seeded_registry_rejects_quorum_above_10000_bp() {
        let registry = ParameterRegistry::seeded(&crate::config::DaoConfig::default());
        assert!(registry
            .validate(&ParameterChange {
                name: "quorum_threshold_bp".into(),
                value: ParameterValue::U64(10_001)
            })
            .is_err());
    }
}
