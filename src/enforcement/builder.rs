//! Builder API for guard policies.

use crate::enforcement::rules::{ConfigErrors, GuardPolicies};
use rust_decimal::Decimal;

/// Fluent construction of [`GuardPolicies`], validated on `build`.
#[derive(Debug, Default)]
pub struct PolicyBuilder {
    policies: GuardPolicies,
}

impl PolicyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum retry attempts for failed payments
    pub fn max_retries(mut self, n: u32) -> Self {
        self.policies.max_retries = n;
        self
    }

    /// Cap the amount that may be submitted or approved
    pub fn approval_limit(mut self, limit: Decimal) -> Self {
        self.policies.approval_limit = Some(limit);
        self
    }

    /// Allow a role to approve. Once any role is added, only listed roles may approve.
    pub fn approver_role(mut self, role: impl Into<String>) -> Self {
        self.policies.approver_roles.push(role.into());
        self
    }

    pub fn build(self) -> Result<GuardPolicies, ConfigErrors> {
        self.policies.validate()?;
        Ok(self.policies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enforcement::rules::ConfigError;
    use rust_decimal_macros::dec;

    #[test]
    fn builder_sets_fields() {
        let policies = PolicyBuilder::new()
            .max_retries(5)
            .approval_limit(dec!(10000))
            .approver_role("controller")
            .build()
            .unwrap();

        assert_eq!(policies.max_retries, 5);
        assert_eq!(policies.approval_limit, Some(dec!(10000)));
        assert_eq!(policies.approver_roles, vec!["controller".to_string()]);
    }

    #[test]
    fn builder_validates() {
        let err = PolicyBuilder::new()
            .approval_limit(Decimal::ZERO)
            .build()
            .unwrap_err();
        assert_eq!(
            err.0,
            vec![ConfigError::NonPositiveApprovalLimit(Decimal::ZERO)]
        );
    }
}
