//! Transport primitives for outbound REST calls.
//!
//! The module exposes [`HttpTransport`] alongside [`ResponseDescriptor`] so hosts can plug in
//! any HTTP stack. The transport only moves bytes: status classification, deserialization, and
//! bearer-token handling all live above it. Failures that prevent a response from arriving at
//! all (network, TLS, timeout) are reported as [`TransportError`]; any response that does arrive,
//! whatever its status, is returned as `Ok`.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
use ::http::header::CONTENT_TYPE;
// self
#[cfg(feature = "reqwest")] use crate::{config::ClientConfig, error::ConfigError};
use crate::{_prelude::*, error::TransportError, request::RequestDescriptor};

/// Boxed future returned by [`HttpTransport::send`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<ResponseDescriptor, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP stacks capable of executing one request.
///
/// Implementations must be `Send + Sync + 'static` so one transport can be shared by every clone
/// of a client and by the token lifecycle manager. The returned future must be `Send` so callers
/// can spawn client calls onto multi-threaded executors.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` to the fully resolved `url`.
	fn send<'a>(&'a self, url: Url, request: &'a RequestDescriptor) -> TransportFuture<'a>;
}

/// Response as received from the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResponseDescriptor {
	/// Status code.
	pub status: StatusCode,
	/// Response headers.
	pub headers: HeaderMap,
	/// Raw response content.
	pub content: Vec<u8>,
}
impl ResponseDescriptor {
	/// Creates an empty response with `status`.
	pub fn new(status: StatusCode) -> Self {
		Self { status, headers: HeaderMap::new(), content: Vec::new() }
	}

	/// Creates a JSON response with `status` and `body`.
	pub fn json(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
		let mut response = Self::new(status).with_content(body);

		response.headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

		response
	}

	/// Replaces the content.
	pub fn with_content(mut self, content: impl Into<Vec<u8>>) -> Self {
		self.content = content.into();

		self
	}

	/// Adds or replaces a header.
	pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
		self.headers.insert(name, value);

		self
	}

	/// Returns the `Content-Type` header, if it is valid text.
	pub fn content_type(&self) -> Option<&str> {
		self.headers.get(CONTENT_TYPE).and_then(|value| value.to_str().ok())
	}

	/// Returns the content as text, replacing invalid UTF-8 sequences.
	pub fn text(&self) -> Cow<'_, str> {
		String::from_utf8_lossy(&self.content)
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a reqwest client honoring the configured per-call timeout.
	pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
		let mut builder = ReqwestClient::builder();

		if let Some(timeout) = config.request_timeout() {
			builder = builder.timeout(timeout);
		}

		Ok(Self(builder.build()?))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	fn send<'a>(&'a self, url: Url, request: &'a RequestDescriptor) -> TransportFuture<'a> {
		Box::pin(async move {
			let mut builder =
				self.0.request(request.method.clone(), url).headers(request.headers.clone());

			if let Some(body) = request.body.as_ref() {
				builder = builder.body(body.clone());
			}

			let response = builder.send().await?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let content = response.bytes().await?.to_vec();

			Ok(ResponseDescriptor { status, headers, content })
		})
	}
}
