//! Client configuration shared read-only by every component of one client.
//!
//! Both structs deserialize from the camelCase keys hosts already use
//! (`baseUri`, `authUri`, `refreshTokenUri`, ...) and expose fluent builders for code-first setup.

// std
use std::{ops::Deref, time::Duration as StdDuration};
// self
use crate::{_prelude::*, error::ConfigError};

const DEFAULT_LOGGABLE_CONTENT_TYPES: [&str; 9] = [
	"application/json",
	"text/json",
	"application/ld+json",
	"application/problem+json",
	"application/xml",
	"text/xml",
	"application/problem+xml",
	"text/plain",
	"text/html",
];

/// Base configuration for any REST client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
	/// Absolute URI every request path is appended to.
	pub base_uri: String,
	/// Includes request/response bodies in logs when their content type is whitelisted.
	#[serde(default = "default_true")]
	pub log_request_response_with_contents: bool,
	/// Content types whose bodies may appear in verbose logs.
	#[serde(default = "default_content_type_whitelist")]
	pub response_content_type_whitelist_for_logging: BTreeSet<String>,
	/// Per-call timeout in milliseconds, applied by the transport.
	#[serde(default)]
	pub request_timeout_ms: Option<u64>,
}
impl ClientConfig {
	/// Creates a configuration for the provided base URI with default logging settings.
	pub fn new(base_uri: impl Into<String>) -> Self {
		Self {
			base_uri: base_uri.into(),
			log_request_response_with_contents: true,
			response_content_type_whitelist_for_logging: default_content_type_whitelist(),
			request_timeout_ms: None,
		}
	}

	/// Enables or disables verbose content logging.
	pub fn with_content_logging(mut self, enabled: bool) -> Self {
		self.log_request_response_with_contents = enabled;

		self
	}

	/// Replaces the content-type whitelist.
	pub fn with_content_type_whitelist<I, S>(mut self, content_types: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.response_content_type_whitelist_for_logging =
			content_types.into_iter().map(Into::into).collect();

		self
	}

	/// Adds one content type to the whitelist.
	pub fn allow_content_type(mut self, content_type: impl Into<String>) -> Self {
		self.response_content_type_whitelist_for_logging.insert(content_type.into());

		self
	}

	/// Sets the per-call transport timeout.
	///
	/// Sub-millisecond remainders round up so a non-zero timeout never becomes zero.
	pub fn with_request_timeout(mut self, timeout: StdDuration) -> Self {
		let millis = timeout.as_nanos().div_ceil(1_000_000);

		self.request_timeout_ms = Some(u64::try_from(millis).unwrap_or(u64::MAX));

		self
	}

	/// Returns the per-call transport timeout, if configured.
	pub fn request_timeout(&self) -> Option<StdDuration> {
		self.request_timeout_ms.map(StdDuration::from_millis)
	}

	/// Parses and validates the base URI.
	pub fn base_url(&self) -> Result<Url, ConfigError> {
		let url = Url::parse(&self.base_uri)
			.map_err(|source| ConfigError::InvalidBaseUri { uri: self.base_uri.clone(), source })?;

		if url.cannot_be_a_base() {
			return Err(ConfigError::CannotBeABase { uri: self.base_uri.clone() });
		}

		Ok(url)
	}

	/// Validates the base URI.
	pub fn validate(&self) -> Result<(), ConfigError> {
		self.base_url().map(|_| ())
	}

	/// Returns `true` when a body of `content_type` may be written to logs.
	///
	/// Parameters such as `; charset=utf-8` are ignored and matching is case-insensitive. A
	/// missing content type is never loggable.
	pub fn should_log_content(&self, content_type: Option<&str>) -> bool {
		if !self.log_request_response_with_contents {
			return false;
		}

		let Some(content_type) = content_type.map(normalize_content_type) else {
			return false;
		};

		self.response_content_type_whitelist_for_logging
			.iter()
			.any(|allowed| normalize_content_type(allowed) == content_type)
	}
}

/// Policy applied when a token refresh call fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshFailurePolicy {
	#[default]
	/// Fall back to a full authentication inside the same single-flight operation.
	Reauthenticate,
	/// Surface [`Error::TokenRefreshFailure`] to every waiter.
	Propagate,
}

/// Configuration for clients that authenticate with bearer tokens.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAuthConfig {
	/// Shared client settings.
	#[serde(flatten)]
	pub client: ClientConfig,
	/// Path of the authentication endpoint, relative to the base URI.
	pub auth_uri: String,
	/// Path of the token refresh endpoint, relative to the base URI.
	pub refresh_token_uri: String,
	/// What to do when a refresh call fails.
	#[serde(default)]
	pub refresh_failure_policy: RefreshFailurePolicy,
}
impl TokenAuthConfig {
	/// Creates a token-auth configuration on top of `client`.
	pub fn new(
		client: ClientConfig,
		auth_uri: impl Into<String>,
		refresh_token_uri: impl Into<String>,
	) -> Self {
		Self {
			client,
			auth_uri: auth_uri.into(),
			refresh_token_uri: refresh_token_uri.into(),
			refresh_failure_policy: RefreshFailurePolicy::default(),
		}
	}

	/// Overrides the refresh failure policy.
	pub fn with_refresh_failure_policy(mut self, policy: RefreshFailurePolicy) -> Self {
		self.refresh_failure_policy = policy;

		self
	}

	/// Validates the base URI and both token endpoints.
	pub fn validate(&self) -> Result<(), ConfigError> {
		self.client.validate()?;

		if self.auth_uri.trim().is_empty() {
			return Err(ConfigError::MissingEndpoint { field: "authUri" });
		}
		if self.refresh_token_uri.trim().is_empty() {
			return Err(ConfigError::MissingEndpoint { field: "refreshTokenUri" });
		}

		Ok(())
	}
}
impl Deref for TokenAuthConfig {
	type Target = ClientConfig;

	fn deref(&self) -> &Self::Target {
		&self.client
	}
}

fn default_true() -> bool {
	true
}

fn default_content_type_whitelist() -> BTreeSet<String> {
	DEFAULT_LOGGABLE_CONTENT_TYPES.iter().map(|value| (*value).to_owned()).collect()
}

fn normalize_content_type(raw: &str) -> String {
	raw.split(';').next().unwrap_or_default().trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn whitelist_ignores_parameters_and_case() {
		let config = ClientConfig::new("https://api.example.com");

		assert!(config.should_log_content(Some("application/json; charset=utf-8")));
		assert!(config.should_log_content(Some("Text/HTML")));
		assert!(!config.should_log_content(Some("application/octet-stream")));
		assert!(!config.should_log_content(None));
	}

	#[test]
	fn disabled_logging_never_logs_content() {
		let config = ClientConfig::new("https://api.example.com").with_content_logging(false);

		assert!(!config.should_log_content(Some("application/json")));
	}

	#[test]
	fn custom_whitelist_replaces_defaults() {
		let config = ClientConfig::new("https://api.example.com")
			.with_content_type_whitelist(["application/vnd.api+json"]);

		assert!(config.should_log_content(Some("application/vnd.api+json")));
		assert!(!config.should_log_content(Some("application/json")));
	}

	#[test]
	fn base_url_rejects_relative_and_opaque_uris() {
		let err = ClientConfig::new("/relative").base_url().expect_err("Relative URI must fail.");

		assert!(matches!(err, ConfigError::InvalidBaseUri { .. }));

		let err = ClientConfig::new("mailto:ops@example.com")
			.base_url()
			.expect_err("Opaque URI must fail.");

		assert!(matches!(err, ConfigError::CannotBeABase { .. }));
	}

	#[test]
	fn token_config_deserializes_with_defaults() {
		let config: TokenAuthConfig = serde_json::from_str(
			r#"{"baseUri":"https://api.example.com","authUri":"/auth","refreshTokenUri":"/auth/refresh"}"#,
		)
		.expect("Token auth config should deserialize from camelCase keys.");

		assert_eq!(config.base_uri, "https://api.example.com");
		assert!(config.log_request_response_with_contents);
		assert!(config.response_content_type_whitelist_for_logging.contains("application/ld+json"));
		assert_eq!(config.refresh_failure_policy, RefreshFailurePolicy::Reauthenticate);
		assert_eq!(config.request_timeout(), None);
		assert!(config.validate().is_ok());
	}

	#[test]
	fn request_timeout_keeps_millisecond_precision() {
		let config = ClientConfig::new("https://api.example.com")
			.with_request_timeout(StdDuration::from_millis(2_900));

		assert_eq!(config.request_timeout_ms, Some(2_900));
		assert_eq!(config.request_timeout(), Some(StdDuration::from_millis(2_900)));

		let config = ClientConfig::new("https://api.example.com")
			.with_request_timeout(StdDuration::from_micros(250));

		assert_eq!(config.request_timeout(), Some(StdDuration::from_millis(1)));

		let config: ClientConfig =
			serde_json::from_str(r#"{"baseUri":"https://api.example.com","requestTimeoutMs":750}"#)
				.expect("Client config should deserialize a millisecond timeout.");

		assert_eq!(config.request_timeout(), Some(StdDuration::from_millis(750)));
	}

	#[test]
	fn token_config_rejects_empty_endpoints() {
		let config = TokenAuthConfig::new(ClientConfig::new("https://api.example.com"), "", "/r");

		assert!(matches!(
			config.validate(),
			Err(ConfigError::MissingEndpoint { field: "authUri" })
		));
	}
}
