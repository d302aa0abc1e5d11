//! Per-integration hooks that describe how a downstream service issues tokens.

// self
use crate::_prelude::*;

/// Describes the authentication and refresh payloads of one downstream service.
///
/// The lifecycle manager owns caching, single-flight, and endpoint selection; a provider only
/// builds request payloads and reads token data out of responses. Both endpoints answer with the
/// same response shape.
pub trait TokenProvider
where
	Self: 'static + Send + Sync,
{
	/// Payload POSTed to the authentication endpoint.
	type AuthRequest: Serialize;
	/// Payload POSTed to the refresh endpoint.
	type RefreshRequest: Serialize;
	/// Response returned by both token endpoints.
	type AuthResponse: 'static + Send + Sync + DeserializeOwned;

	/// Builds the authentication payload (credentials, API keys, ...).
	fn build_auth_request(&self) -> Self::AuthRequest;

	/// Builds a refresh payload from the response currently cached.
	fn build_refresh_request(&self, current: &Self::AuthResponse) -> Self::RefreshRequest;

	/// Extracts the bearer token value.
	fn extract_token(&self, response: &Self::AuthResponse) -> String;

	/// Extracts the token lifetime, measured from the moment the response is stored.
	fn extract_expiry(&self, response: &Self::AuthResponse) -> Duration;

	/// Returns `true` when the cached response should be refreshed before its next use.
	fn needs_refresh(&self, response: &Self::AuthResponse) -> bool;
}
