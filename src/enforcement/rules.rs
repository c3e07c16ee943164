//! Guard policies: the tunable values behind the standard guards.
//!
//! Policies are plain serde data so they can be loaded from configuration.
//! Validation uses `Validation` so every problem is reported in one pass.

use crate::core::Guard;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stillwater::validation::Validation;
use thiserror::Error;

/// Default number of `retry` actions allowed on a failed payment.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Upper bound accepted for `max_retries`.
pub const MAX_RETRIES_CEILING: u32 = 100;

/// A single configuration problem.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max_retries ({value}) exceeds the ceiling of {ceiling}")]
    MaxRetriesTooHigh { value: u32, ceiling: u32 },

    #[error("approval_limit must be positive (got {0})")]
    NonPositiveApprovalLimit(Decimal),

    #[error("approver_roles contains an empty role name")]
    EmptyRole,

    #[error("approver_roles lists '{0}' more than once")]
    DuplicateRole(String),

    #[error("could not parse policy document: {0}")]
    Parse(String),
}

/// Every problem found while validating a policy document.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid guard policies: {}", render(.0))]
pub struct ConfigErrors(pub Vec<ConfigError>);

fn render(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

type Check = Validation<(), Vec<ConfigError>>;

/// Values consumed by the standard guards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GuardPolicies {
    /// Retries allowed before `retry` is denied.
    pub max_retries: u32,
    /// Largest amount that may be submitted or approved, if any.
    pub approval_limit: Option<Decimal>,
    /// Roles allowed to approve. Empty means any role.
    pub approver_roles: Vec<String>,
}

impl Default for GuardPolicies {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            approval_limit: None,
            approver_roles: Vec::new(),
        }
    }
}

impl GuardPolicies {
    /// Parse and validate a JSON policy document. Missing fields take their
    /// defaults.
    pub fn from_json(document: &str) -> Result<Self, ConfigErrors> {
        let policies: Self = serde_json::from_str(document)
            .map_err(|e| ConfigErrors(vec![ConfigError::Parse(e.to_string())]))?;
        policies.validate()?;
        Ok(policies)
    }

    /// Check every field, accumulating ALL problems.
    pub fn check(&self) -> Validation<(), Vec<ConfigError>> {
        let mut checks: Vec<Check> = Vec::new();

        checks.push(if self.max_retries > MAX_RETRIES_CEILING {
            Validation::Failure(vec![ConfigError::MaxRetriesTooHigh {
                value: self.max_retries,
                ceiling: MAX_RETRIES_CEILING,
            }])
        } else {
            Validation::Success(())
        });

        if let Some(limit) = self.approval_limit {
            checks.push(if limit <= Decimal::ZERO {
                Validation::Failure(vec![ConfigError::NonPositiveApprovalLimit(limit)])
            } else {
                Validation::Success(())
            });
        }

        for (i, role) in self.approver_roles.iter().enumerate() {
            checks.push(if role.trim().is_empty() {
                Validation::Failure(vec![ConfigError::EmptyRole])
            } else if self.approver_roles[..i].contains(role) {
                Validation::Failure(vec![ConfigError::DuplicateRole(role.clone())])
            } else {
                Validation::Success(())
            });
        }

        Validation::all_vec(checks).map(|_| ())
    }

    pub fn validate(&self) -> Result<(), ConfigErrors> {
        match self.check() {
            Validation::Success(()) => Ok(()),
            Validation::Failure(errors) => Err(ConfigErrors(errors)),
        }
    }

    pub(crate) fn submit_guards(&self) -> Vec<Guard> {
        self.approval_limit
            .map(Guard::amount_limit)
            .into_iter()
            .collect()
    }

    /// SoD first, so a self-approval is always reported as such.
    pub(crate) fn approve_guards(&self) -> Vec<Guard> {
        let mut guards = vec![Guard::segregation_of_duties()];
        if !self.approver_roles.is_empty() {
            guards.push(Guard::actor_role(self.approver_roles.clone()));
        }
        if let Some(limit) = self.approval_limit {
            guards.push(Guard::amount_limit(limit));
        }
        guards
    }

    pub(crate) fn retry_guards(&self) -> Vec<Guard> {
        vec![Guard::retry_limit(self.max_retries)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn defaults_are_valid() {
        let policies = GuardPolicies::default();
        assert_eq!(policies.max_retries, 3);
        assert!(policies.validate().is_ok());
    }

    #[test]
    fn validation_accumulates_all_problems() {
        let policies = GuardPolicies {
            max_retries: 1_000,
            approval_limit: Some(dec!(-5)),
            approver_roles: vec!["approver".into(), "".into(), "approver".into()],
        };

        let errors = policies.validate().unwrap_err().0;
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ConfigError::EmptyRole));
        assert!(errors.contains(&ConfigError::DuplicateRole("approver".into())));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::MaxRetriesTooHigh { .. })));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::NonPositiveApprovalLimit(_))));
    }

    #[test]
    fn from_json_fills_defaults() {
        let policies = GuardPolicies::from_json(r#"{"approval_limit": "2500.00"}"#).unwrap();
        assert_eq!(policies.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(policies.approval_limit, Some(dec!(2500.00)));
    }

    #[test]
    fn from_json_rejects_unknown_fields() {
        let err = GuardPolicies::from_json(r#"{"max_retry": 2}"#).unwrap_err();
        assert!(matches!(err.0.as_slice(), [ConfigError::Parse(_)]));
    }

    #[test]
    fn from_json_reports_invalid_values() {
        let err = GuardPolicies::from_json(r#"{"max_retries": 500}"#).unwrap_err();
        assert_eq!(
            err.0,
            vec![ConfigError::MaxRetriesTooHigh {
                value: 500,
                ceiling: MAX_RETRIES_CEILING
            }]
        );
    }

    #[test]
    fn approve_guards_start_with_sod() {
        let policies = GuardPolicies {
            approver_roles: vec!["approver".into()],
            approval_limit: Some(dec!(100)),
            ..GuardPolicies::default()
        };
        let names: Vec<_> = policies
            .approve_guards()
            .iter()
            .map(|g| g.name().to_string())
            .collect();
        assert_eq!(
            names,
            vec!["segregation_of_duties", "actor_role", "amount_limit"]
        );
    }

    #[test]
    fn submit_guards_empty_without_limit() {
        assert!(GuardPolicies::default().submit_guards().is_empty());
    }
}
