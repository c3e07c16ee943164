//! Guard policies and the typed denials they produce.
//!
//! Guards run fail-fast in declaration order: the first failing guard decides
//! the rejection, so callers always receive one actionable reason.
//!
//! # Example
//!
//! ```rust
//! use payflow::enforcement::PolicyBuilder;
//!
//! let policies = PolicyBuilder::new()
//!     .max_retries(3)
//!     .approver_role("approver")
//!     .build()
//!     .unwrap();
//! assert_eq!(policies.max_retries, 3);
//! ```

pub mod builder;
pub mod context;
pub mod rules;
pub mod violations;

pub use builder::PolicyBuilder;
pub use context::{ActorContext, GuardInput, TransitionContext};
pub use rules::{ConfigError, ConfigErrors, GuardPolicies, DEFAULT_MAX_RETRIES};
pub use violations::{IllegalReason, TransitionError};
