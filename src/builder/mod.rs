//! Builder API for custom transition tables.
//!
//! The standard payment lifecycle is available through
//! [`TransitionTable::standard`](crate::core::TransitionTable::standard).
//! These builders exist for deployments that need a different lifecycle
//! while keeping the same closed-world guarantees.
//!
//! # Example
//!
//! ```
//! use payflow::builder::{TransitionBuilder, TransitionTableBuilder};
//! use payflow::core::{Action, Guard, PaymentState, SideEffect};
//!
//! let table = TransitionTableBuilder::new()
//!     .transition(
//!         TransitionBuilder::new()
//!             .from(PaymentState::Draft)
//!             .on(Action::Submit)
//!             .to(PaymentState::PendingApproval)
//!             .effect(SideEffect::RecordSubmitter),
//!     )?
//!     .transition(
//!         TransitionBuilder::new()
//!             .from(PaymentState::PendingApproval)
//!             .on(Action::Approve)
//!             .to(PaymentState::Approved)
//!             .guard(Guard::segregation_of_duties()),
//!     )?
//!     .build()?;
//!
//! assert_eq!(table.len(), 2);
//! # Ok::<(), payflow::builder::BuildError>(())
//! ```

pub mod error;
pub mod table;
pub mod transition;

pub use error::BuildError;
pub use table::TransitionTableBuilder;
pub use transition::TransitionBuilder;
