//! Demonstrates a bearer client that logs in once, reuses the cached token, and refreshes it when
//! the service flags it as stale.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde::{Deserialize, Serialize};
use time::Duration;
// self
use token_rest_client::{
	client::ReqwestBearerClient,
	config::{ClientConfig, TokenAuthConfig},
	http::ReqwestTransport,
	http_types::Method,
	reqwest::Client as ReqwestClient,
	token::TokenProvider,
};

#[derive(Serialize)]
struct Login {
	api_key: &'static str,
}

#[derive(Serialize)]
struct Refresh {
	session: String,
}

#[derive(Deserialize)]
struct Session {
	token: String,
	session: String,
	ttl_seconds: i64,
	#[serde(default)]
	rotate: bool,
}

struct ReportingApi;
impl TokenProvider for ReportingApi {
	type AuthRequest = Login;
	type AuthResponse = Session;
	type RefreshRequest = Refresh;

	fn build_auth_request(&self) -> Self::AuthRequest {
		Login { api_key: "demo-key" }
	}

	fn build_refresh_request(&self, current: &Self::AuthResponse) -> Self::RefreshRequest {
		Refresh { session: current.session.clone() }
	}

	fn extract_token(&self, response: &Self::AuthResponse) -> String {
		response.token.clone()
	}

	fn extract_expiry(&self, response: &Self::AuthResponse) -> Duration {
		Duration::seconds(response.ttl_seconds)
	}

	fn needs_refresh(&self, response: &Self::AuthResponse) -> bool {
		response.rotate
	}
}

#[derive(Debug, Serialize)]
struct ReportQuery {
	id: u32,
	format: &'static str,
}

#[derive(Debug, Deserialize)]
struct Report {
	id: u32,
	rows: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let login = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/session");
			then.status(200).json_body(serde_json::json!({
				"token": "demo-access",
				"session": "s-1",
				"ttl_seconds": 900,
				"rotate": true,
			}));
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/session/refresh");
			then.status(200).json_body(serde_json::json!({
				"token": "demo-rotated",
				"session": "s-2",
				"ttl_seconds": 900,
			}));
		})
		.await;
	let report = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/reports/7").query_param("format", "csv");
			then.status(200).json_body(serde_json::json!({ "id": 7, "rows": 1200 }));
		})
		.await;
	let config = TokenAuthConfig::new(
		ClientConfig::new(server.url("/api")),
		"/session",
		"/session/refresh",
	);
	// The mock server presents a self-signed certificate.
	let transport = ReqwestTransport::with_client(
		ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()?,
	);
	let client = ReqwestBearerClient::with_transport(config, ReportingApi, transport)?;

	for _ in 0..2 {
		let query = ReportQuery { id: 7, format: "csv" };
		let found = client.send::<_, Report>(Method::GET, "/reports/{id}", &query, &[]).await?;

		println!("Report {} has {} rows.", found.id, found.rows);
	}

	println!(
		"Authentications: {}, refreshes: {}.",
		client.tokens().metrics().authentications(),
		client.tokens().metrics().refreshes()
	);

	login.assert_async().await;
	refresh.assert_async().await;
	report.assert_calls_async(2).await;

	Ok(())
}
