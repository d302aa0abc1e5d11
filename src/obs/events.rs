//! Request/response log events.
//!
//! Bodies only reach the log when content logging is enabled and the body's content type is on the
//! configured whitelist; anything else is replaced with a size marker.

// crates.io
use ::http::header::CONTENT_TYPE;
// self
use crate::{_prelude::*, config::ClientConfig, http::ResponseDescriptor, request::RequestDescriptor};

/// Returns the body text to log, or a size marker when the body must stay out of logs.
pub fn loggable_content<'a>(
	config: &ClientConfig,
	content_type: Option<&str>,
	content: &'a [u8],
) -> Cow<'a, str> {
	if config.should_log_content(content_type) {
		String::from_utf8_lossy(content)
	} else {
		Cow::Owned(format!("<{} bytes omitted>", content.len()))
	}
}

/// Logs a request right before it reaches the transport.
pub fn log_request(config: &ClientConfig, request: &RequestDescriptor) {
	#[cfg(feature = "tracing")]
	{
		let content_type = request.headers.get(CONTENT_TYPE).and_then(|value| value.to_str().ok());

		match request.body.as_deref() {
			Some(body) => tracing::info!(
				method = %request.method,
				path = %request.path,
				body = %loggable_content(config, content_type, body),
				"Sending request."
			),
			None => tracing::info!(method = %request.method, path = %request.path, "Sending request."),
		}
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (config, request, CONTENT_TYPE);
	}
}

/// Logs a response as soon as the transport returns it.
pub fn log_response(config: &ClientConfig, request: &RequestDescriptor, response: &ResponseDescriptor) {
	#[cfg(feature = "tracing")]
	tracing::info!(
		method = %request.method,
		path = %request.path,
		status = response.status.as_u16(),
		content = %loggable_content(config, response.content_type(), &response.content),
		"Received response."
	);
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (config, request, response);
	}
}

/// Logs a response that was classified as a failure.
pub fn log_failure_response(
	config: &ClientConfig,
	request: &RequestDescriptor,
	response: &ResponseDescriptor,
) {
	#[cfg(feature = "tracing")]
	tracing::error!(
		method = %request.method,
		path = %request.path,
		query = ?request.query,
		status = response.status.as_u16(),
		content = %loggable_content(config, response.content_type(), &response.content),
		"Request failed."
	);
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (config, request, response);
	}
}

/// Logs a success response whose body could not be deserialized.
pub fn log_deserialization_failure(request: &RequestDescriptor, error: &Error) {
	#[cfg(feature = "tracing")]
	tracing::error!(
		method = %request.method,
		path = %request.path,
		error = %error,
		content = error.content().unwrap_or_default(),
		"Response could not be deserialized."
	);
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (request, error);
	}
}

/// Logs a transport failure.
pub fn log_transport_failure(request: &RequestDescriptor, error: &Error) {
	#[cfg(feature = "tracing")]
	tracing::error!(method = %request.method, path = %request.path, error = %error, "Transport failed.");
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (request, error);
	}
}

/// Logs a failed refresh that falls back to full authentication.
pub fn log_refresh_fallback(error: &Error) {
	#[cfg(feature = "tracing")]
	tracing::warn!(error = %error, "Token refresh failed; falling back to authentication.");
	#[cfg(not(feature = "tracing"))]
	{
		let _ = error;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn binary_bodies_are_replaced_with_a_size_marker() {
		let config = ClientConfig::new("https://api.example.com");

		assert_eq!(loggable_content(&config, Some("image/png"), &[0, 1, 2]), "<3 bytes omitted>");
		assert_eq!(loggable_content(&config, Some("application/json"), b"{}"), "{}");
	}

	#[test]
	fn content_logging_flag_overrides_the_whitelist() {
		let config = ClientConfig::new("https://api.example.com").with_content_logging(false);

		assert_eq!(loggable_content(&config, Some("application/json"), b"{}"), "<2 bytes omitted>");
	}
}
