//! Payflow: a pure payment lifecycle state machine
//!
//! Payflow follows the "pure core, imperative shell" philosophy. The core
//! decides whether a payment may move from one state to another and never
//! performs I/O; the shell persists decisions and emits their side effects.
//!
//! # Core Concepts
//!
//! - **States**: `draft`, `pending_approval`, `approved`, `processing`,
//!   `completed`, `rejected`, `failed`, with terminal and immutable flags
//! - **Transition table**: a closed-world map of `(state, action) -> state`
//! - **Guards**: named predicates such as segregation of duties and the
//!   retry limit
//! - **Evaluator**: applies an action and returns the next state plus the
//!   side effects the caller must run, or a typed denial
//!
//! # Example
//!
//! ```rust
//! use payflow::core::{Action, PaymentState};
//! use payflow::enforcement::{ActorContext, TransitionContext};
//! use payflow::TransitionEvaluator;
//!
//! let evaluator = TransitionEvaluator::default();
//! let alice = ActorContext::new("alice", "clerk", "acme");
//! let bob = ActorContext::new("bob", "approver", "acme");
//!
//! let submitted = evaluator
//!     .apply(PaymentState::Draft, Action::Submit, &alice, &TransitionContext::new())
//!     .unwrap();
//! assert_eq!(submitted.to, PaymentState::PendingApproval);
//!
//! let ctx = TransitionContext::new().submitted_by("alice");
//! let approved = evaluator
//!     .apply(submitted.to, Action::Approve, &bob, &ctx)
//!     .unwrap();
//! assert_eq!(approved.to, PaymentState::Approved);
//! ```

pub mod builder;
pub mod checkpoint;
pub mod core;
pub mod enforcement;
pub mod evaluator;
pub mod service;

// Re-export commonly used types
pub use self::core::{Action, Guard, PaymentState, SideEffect, State, StateRegistry, TransitionTable};
pub use enforcement::{ActorContext, GuardPolicies, TransitionContext, TransitionError};
pub use evaluator::{TransitionEvaluator, TransitionOutcome, TransitionResult};
pub use service::{PaymentRecord, PaymentService, ServiceError, TransitionRequest};
