//! Observability helpers for the request pipeline and token flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` (on by default) to emit a `token_rest_client.flow` span per token call,
//!   with `flow`, `endpoint` and `outcome` fields, plus request/response events.
//! - Enable `metrics` to increment `token_rest_client_flow_total` per attempt and settled call,
//!   and to record `token_rest_client_flow_duration_seconds` when a call settles. Both carry
//!   `flow` and `outcome` labels.

mod counter;
mod events;
mod span;

pub use counter::*;
pub use events::*;
pub use span::*;

// self
use crate::_prelude::*;

/// Token flows observed by the lifecycle manager.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Full authentication against the auth endpoint.
	Authenticate,
	/// Refresh against the refresh endpoint.
	Refresh,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::Authenticate => "authenticate",
			FlowKind::Refresh => "refresh",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a token flow.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the waiters.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
