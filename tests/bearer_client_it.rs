#![cfg(feature = "reqwest")]

mod common;

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;
// self
use common::*;
use token_rest_client::{
	client::{ReqwestBearerClient, RestClient},
	config::ClientConfig,
	error::Error,
	http_types::{Method, StatusCode},
};

#[derive(Debug, Serialize)]
struct OrderQuery<'a> {
	id: u32,
	status: &'a str,
	cursor: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct NewOrder<'a> {
	sku: &'a str,
	quantity: u32,
}

#[derive(Debug, Deserialize, PartialEq)]
struct Order {
	id: u32,
	sku: String,
}

async fn mock_login(server: &MockServer) -> httpmock::Mock<'_> {
	server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/v1/auth/login")
				.json_body(json!({ "username": "svc-reporting", "password": "hunter2" }));
			then.status(200).json_body(json!({
				"access_token": "token-1",
				"refresh_token": "refresh-1",
				"expires_in": 300,
			}));
		})
		.await
}

fn bearer_client(server: &MockServer) -> ReqwestBearerClient<DemoProvider> {
	ReqwestBearerClient::with_transport(
		token_config(&server.url("/v1")),
		DemoProvider,
		test_reqwest_transport(),
	)
	.expect("Reqwest bearer client should build.")
}

#[tokio::test]
async fn get_payload_fills_path_and_query_with_a_bearer_token() -> Result<()> {
	let server = MockServer::start_async().await;
	let login = mock_login(&server).await;
	let orders = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/v1/users/42/orders/7")
				.query_param("status", "open")
				.header("authorization", "Bearer token-1");
			then.status(200).json_body(json!([{ "id": 7, "sku": "A-1" }]));
		})
		.await;
	let client = bearer_client(&server);
	let query = OrderQuery { id: 7, status: "open", cursor: None };

	for _ in 0..2 {
		let found = client
			.send::<_, Vec<Order>>(Method::GET, "/users/{userId}/orders/{id}", &query, &[&42])
			.await?;

		assert_eq!(found, [Order { id: 7, sku: "A-1".into() }]);
	}

	login.assert_calls_async(1).await;
	orders.assert_calls_async(2).await;

	Ok(())
}

#[tokio::test]
async fn non_get_payload_is_sent_as_a_json_body() -> Result<()> {
	let server = MockServer::start_async().await;
	let login = mock_login(&server).await;
	let create = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/v1/users/42/orders")
				.header("authorization", "Bearer token-1")
				.header("content-type", "application/json")
				.json_body(json!({ "sku": "B-2", "quantity": 3 }));
			then.status(201).json_body(json!({ "id": 8, "sku": "B-2" }));
		})
		.await;
	let client = bearer_client(&server);
	let created = client
		.send::<_, Order>(
			Method::POST,
			"/users/{userId}/orders",
			&NewOrder { sku: "B-2", quantity: 3 },
			&[&42],
		)
		.await?;

	assert_eq!(created, Order { id: 8, sku: "B-2".into() });

	login.assert_async().await;
	create.assert_async().await;

	Ok(())
}

#[tokio::test]
async fn failure_status_surfaces_a_failure_response() -> Result<()> {
	let server = MockServer::start_async().await;
	let _login = mock_login(&server).await;
	let missing = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/orders/404");
			then.status(404).header("content-type", "text/plain").body("order not found");
		})
		.await;
	let client = bearer_client(&server);
	let err = client
		.send::<_, Order>(Method::GET, "/orders/{id}", &(), &[&404])
		.await
		.expect_err("A 404 should surface as a failure response.");

	match err {
		Error::FailureResponse { method, path, status, content } => {
			assert_eq!(method, Method::GET);
			assert_eq!(path, "/orders/404");
			assert_eq!(status, StatusCode::NOT_FOUND);
			assert_eq!(content, "order not found");
		},
		other => panic!("Unexpected error: {other:?}."),
	}

	missing.assert_async().await;

	Ok(())
}

#[tokio::test]
async fn unparseable_success_body_keeps_the_raw_content() -> Result<()> {
	let server = MockServer::start_async().await;
	let _login = mock_login(&server).await;
	let _order = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/orders/1");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"id":"one","sku":"A-1"}"#);
		})
		.await;
	let client = bearer_client(&server);
	let err = client
		.send::<_, Order>(Method::GET, "/orders/{id}", &(), &[&1])
		.await
		.expect_err("A mistyped id should fail deserialization.");

	match err {
		Error::DeserializationFailure { status, content, location, .. } => {
			assert_eq!(status, StatusCode::OK);
			assert_eq!(content, r#"{"id":"one","sku":"A-1"}"#);
			assert_eq!(location, "id");
		},
		other => panic!("Unexpected error: {other:?}."),
	}

	Ok(())
}

#[tokio::test]
async fn rejected_login_is_reported_as_an_authentication_failure() -> Result<()> {
	let server = MockServer::start_async().await;
	let login = server
		.mock_async(|when, then| {
			when.method(POST).path("/v1/auth/login");
			then.status(401).json_body(json!({ "error": "invalid_credentials" }));
		})
		.await;
	let orders = server
		.mock_async(|when, then| {
			when.path("/v1/orders");
			then.status(200).json_body(json!([]));
		})
		.await;
	let client = bearer_client(&server);
	let err = client
		.send::<_, Vec<Order>>(Method::GET, "/orders", &(), &[])
		.await
		.expect_err("The API call must not happen without a token.");

	assert!(matches!(err, Error::AuthenticationFailure { ref path, .. } if path == AUTH_PATH));
	assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));

	login.assert_async().await;
	orders.assert_calls_async(0).await;

	Ok(())
}

#[tokio::test]
async fn plain_client_sends_without_authentication() -> Result<()> {
	let server = MockServer::start_async().await;
	let logout = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/v1/sessions/s-1");
			then.status(204);
		})
		.await;
	let client =
		RestClient::with_transport(ClientConfig::new(server.url("/v1")), test_reqwest_transport())?;

	client.send_unit(Method::DELETE, "/sessions/{id}", &(), &[&"s-1"]).await?;

	logout.assert_async().await;

	Ok(())
}
