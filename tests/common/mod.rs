//! Helpers shared by the integration tests: a scripted in-memory transport and a demo token
//! provider.

#![allow(dead_code)]

// std
use std::time::Duration as StdDuration;
// crates.io
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use time::Duration;
// self
use token_rest_client::{
	config::{ClientConfig, RefreshFailurePolicy, TokenAuthConfig},
	error::TransportError,
	http::{HttpTransport, ResponseDescriptor, TransportFuture},
	http_types::StatusCode,
	request::RequestDescriptor,
	token::TokenProvider,
	url::Url,
};
#[cfg(feature = "reqwest")]
use token_rest_client::{http::ReqwestTransport, reqwest::Client as ReqwestClient};

pub const AUTH_PATH: &str = "/auth/login";
pub const REFRESH_PATH: &str = "/auth/refresh";

type Handler =
	Box<dyn Fn(&RequestDescriptor) -> Result<ResponseDescriptor, TransportError> + Send + Sync>;

/// In-memory transport answering every request through a closure and recording what it saw.
pub struct ScriptedTransport {
	handler: Handler,
	delay: Option<StdDuration>,
	calls: Mutex<Vec<(Url, RequestDescriptor)>>,
}
impl ScriptedTransport {
	pub fn new<F>(handler: F) -> Self
	where
		F: 'static + Send + Sync + Fn(&RequestDescriptor) -> Result<ResponseDescriptor, TransportError>,
	{
		Self { handler: Box::new(handler), delay: None, calls: Mutex::new(Vec::new()) }
	}

	/// Delays every response so concurrent callers overlap.
	pub fn with_delay(mut self, delay: StdDuration) -> Self {
		self.delay = Some(delay);

		self
	}

	pub fn requests(&self) -> Vec<RequestDescriptor> {
		self.calls.lock().iter().map(|(_, request)| request.clone()).collect()
	}

	pub fn urls(&self) -> Vec<Url> {
		self.calls.lock().iter().map(|(url, _)| url.clone()).collect()
	}

	pub fn calls_to(&self, path: &str) -> usize {
		self.calls.lock().iter().filter(|(_, request)| request.path == path).count()
	}
}
impl HttpTransport for ScriptedTransport {
	fn send<'a>(&'a self, url: Url, request: &'a RequestDescriptor) -> TransportFuture<'a> {
		Box::pin(async move {
			self.calls.lock().push((url, request.clone()));

			if let Some(delay) = self.delay {
				tokio::time::sleep(delay).await;
			}

			(self.handler)(request)
		})
	}
}

/// Builds a reqwest transport that accepts the self-signed certificates produced by `httpmock`.
#[cfg(feature = "reqwest")]
pub fn test_reqwest_transport() -> ReqwestTransport {
	let client = ReqwestClient::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.build()
		.expect("Failed to build insecure Reqwest client for tests.");

	ReqwestTransport::with_client(client)
}

#[derive(Debug, Serialize)]
pub struct LoginRequest {
	pub username: String,
	pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshRequest {
	pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
	pub access_token: String,
	pub refresh_token: String,
	/// Lifetime in seconds.
	pub expires_in: f64,
	#[serde(default)]
	pub stale: bool,
}

/// Provider for a service that flags tokens needing a refresh with `stale: true`.
pub struct DemoProvider;
impl TokenProvider for DemoProvider {
	type AuthRequest = LoginRequest;
	type AuthResponse = LoginResponse;
	type RefreshRequest = RefreshRequest;

	fn build_auth_request(&self) -> Self::AuthRequest {
		LoginRequest { username: "svc-reporting".into(), password: "hunter2".into() }
	}

	fn build_refresh_request(&self, current: &Self::AuthResponse) -> Self::RefreshRequest {
		RefreshRequest { refresh_token: current.refresh_token.clone() }
	}

	fn extract_token(&self, response: &Self::AuthResponse) -> String {
		response.access_token.clone()
	}

	fn extract_expiry(&self, response: &Self::AuthResponse) -> Duration {
		Duration::seconds_f64(response.expires_in)
	}

	fn needs_refresh(&self, response: &Self::AuthResponse) -> bool {
		response.stale
	}
}

pub fn token_config(base_uri: &str) -> TokenAuthConfig {
	TokenAuthConfig::new(ClientConfig::new(base_uri), AUTH_PATH, REFRESH_PATH)
}

pub fn propagating_config(base_uri: &str) -> TokenAuthConfig {
	token_config(base_uri).with_refresh_failure_policy(RefreshFailurePolicy::Propagate)
}

/// JSON body returned by the token endpoints.
pub fn token_body(access: &str, refresh: &str, expires_in: f64, stale: bool) -> String {
	serde_json::json!({
		"access_token": access,
		"refresh_token": refresh,
		"expires_in": expires_in,
		"stale": stale,
	})
	.to_string()
}

pub fn token_response(access: &str, refresh: &str, expires_in: f64, stale: bool) -> ResponseDescriptor {
	ResponseDescriptor::json(StatusCode::OK, token_body(access, refresh, expires_in, stale))
}
