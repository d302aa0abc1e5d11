//! Client-level error types shared by the request pipeline and the token lifecycle.
//!
//! Every variant is `Clone`: a single-flight token acquisition hands the same outcome to all of
//! its waiters, failures included.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Shared, type-erased error source.
pub type BoxError = Arc<dyn StdError + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Clone, Debug, ThisError)]
pub enum Error {
	/// Local configuration or request-construction problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeout), distinct from application failures.
	#[error("Transport failure during {method} {path}.")]
	Transport {
		/// Method of the request that failed.
		method: Method,
		/// Resolved request path.
		path: String,
		/// Underlying transport failure.
		#[source]
		source: TransportError,
	},

	/// A route template placeholder has no corresponding value.
	#[error("Route template `{template}` has no value for the `{placeholder}` segment.")]
	MissingSegmentValue {
		/// Route template being resolved.
		template: String,
		/// Name of the unresolved placeholder.
		placeholder: String,
	},
	/// The authentication call did not produce a usable token.
	#[error("Authentication against `{path}` failed.")]
	AuthenticationFailure {
		/// Configured authentication endpoint.
		path: String,
		/// Failure raised by the authentication call.
		#[source]
		source: Arc<Error>,
	},
	/// The refresh call did not produce a usable token.
	#[error("Token refresh against `{path}` failed.")]
	TokenRefreshFailure {
		/// Configured refresh endpoint.
		path: String,
		/// Failure raised by the refresh call.
		#[source]
		source: Arc<Error>,
	},
	/// The downstream service answered with a non-success response.
	#[error("{method} {path} responded with failure status {status}.")]
	FailureResponse {
		/// Method of the failed request.
		method: Method,
		/// Resolved request path.
		path: String,
		/// Response status code.
		status: StatusCode,
		/// Raw response content (lossy UTF-8).
		content: String,
	},
	/// A success response could not be converted into the expected type.
	#[error("Response with status {status} could not be deserialized at `{location}`.")]
	DeserializationFailure {
		/// Response status code.
		status: StatusCode,
		/// Raw response content (lossy UTF-8).
		content: String,
		/// JSON path at which deserialization stopped (`.` for the document root).
		location: String,
		/// Underlying parse error.
		#[source]
		source: Arc<serde_json::Error>,
	},
}
impl Error {
	/// Returns the response status carried by the error, if any.
	pub fn status(&self) -> Option<StatusCode> {
		match self {
			Self::FailureResponse { status, .. } | Self::DeserializationFailure { status, .. } =>
				Some(*status),
			Self::AuthenticationFailure { source, .. } | Self::TokenRefreshFailure { source, .. } =>
				source.status(),
			_ => None,
		}
	}

	/// Returns the raw response content carried by the error, if any.
	pub fn content(&self) -> Option<&str> {
		match self {
			Self::FailureResponse { content, .. } | Self::DeserializationFailure { content, .. } =>
				Some(content),
			Self::AuthenticationFailure { source, .. } | Self::TokenRefreshFailure { source, .. } =>
				source.content(),
			_ => None,
		}
	}
}

/// Configuration and request-construction failures.
#[derive(Clone, Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Base URI cannot be parsed.
	#[error("Base URI `{uri}` is invalid.")]
	InvalidBaseUri {
		/// Offending URI.
		uri: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Base URI parses but cannot carry relative paths (e.g. `mailto:`).
	#[error("Base URI `{uri}` cannot be used as a base for request paths.")]
	CannotBeABase {
		/// Offending URI.
		uri: String,
	},
	/// A token-auth endpoint was left empty.
	#[error("The `{field}` endpoint must not be empty.")]
	MissingEndpoint {
		/// Configuration key that was empty.
		field: &'static str,
	},

	/// Request payload could not be serialized to JSON.
	#[error("Request payload could not be serialized.")]
	PayloadSerialization {
		/// Underlying serializer failure.
		#[source]
		source: Arc<serde_json::Error>,
	},
	/// GET payloads must be objects so their fields can become query parameters.
	#[error("A GET payload must serialize to an object, found {found}.")]
	UnsupportedQueryPayload {
		/// JSON kind the payload serialized to.
		found: &'static str,
	},
	/// More positional segment values were supplied than the template has placeholders.
	#[error("Route template `{template}` has {expected} placeholders but {supplied} values were supplied.")]
	SurplusSegmentValues {
		/// Route template being resolved.
		template: String,
		/// Number of placeholders in the template.
		expected: usize,
		/// Number of positional values supplied.
		supplied: usize,
	},
	/// A header value contains characters HTTP does not allow.
	#[error("Header `{name}` has an invalid value.")]
	InvalidHeader {
		/// Header name.
		name: String,
	},

	/// Token provider extracted an empty token.
	#[error("Token provider extracted an empty token.")]
	EmptyToken,
	/// Token provider reported a zero or negative lifetime.
	#[error("Token provider reported a non-positive lifetime.")]
	NonPositiveExpiry,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::HttpClientBuild { source: Arc::new(src) }
	}
}
impl From<serde_json::Error> for ConfigError {
	fn from(e: serde_json::Error) -> Self {
		Self::PayloadSerialization { source: Arc::new(e) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, timeout, IO).
#[derive(Clone, Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the downstream service.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The request did not complete within the configured timeout.
	#[error("Request to the downstream service timed out.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the downstream service.")]
	Io(#[source] Arc<std::io::Error>),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Network { source: Arc::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Timeout { source: Arc::new(src) }
	}
}
impl From<std::io::Error> for TransportError {
	fn from(e: std::io::Error) -> Self {
		Self::Io(Arc::new(e))
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::timeout(e) } else { Self::network(e) }
	}
}
