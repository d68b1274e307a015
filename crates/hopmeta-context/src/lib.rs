//! Request-scoped metadata propagation for RPC call trees.
//!
//! A [`Context`] carries string metadata alongside a call without every
//! function signature having to mention it. Three flows are supported:
//!
//! - **Transit** values travel forward for one hop past the one they were
//!   written in. [`Context::transfer_forward`] ages them at every outbound
//!   call.
//! - **Persistent** values travel forward indefinitely.
//! - **Backward** values travel from a callee back to its caller through
//!   lock-protected containers installed near the root of the call tree.
//!
//! Contexts are immutable: every write returns a new context, and the forward
//! stores are append-only [`hopmeta_chain::Chain`]s. The backward containers
//! are the only shared mutable state.
//!
//! # Modules
//!
//! - [`context`] — the [`Context`] handle
//! - [`transit`] — [`TransitStore`] and the transit operations
//! - [`persistent`] — persistent operations
//! - [`backward`] — [`BackwardValues`] and the backward operations
//! - [`maybe`] — [`MaybeContext`] for `Option<Context>`

pub mod backward;
pub mod context;
pub mod maybe;
pub mod persistent;
pub mod transit;

pub use backward::{BackwardValues, Direction};
pub use context::Context;
pub use maybe::MaybeContext;
pub use transit::TransitStore;
