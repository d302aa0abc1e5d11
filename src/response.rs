//! Response classification, typed deserialization, and failure handling.
//!
//! [`ResponseProcessor`] is the per-integration hook for everything that happens after the
//! transport returns: deciding success vs. failure, turning a success body into a typed value, and
//! turning a failure into either an error or a recovered typed value. Every hook has a default,
//! so [`DefaultResponseProcessor`] is an empty impl.

// self
use crate::{_prelude::*, http::ResponseDescriptor, request::RequestDescriptor};

/// Result of classifying a response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
	/// The response should be deserialized.
	Success,
	/// The response should be passed to the failure handler.
	Failure,
}

/// Hooks applied to every response received by a client.
pub trait ResponseProcessor
where
	Self: 'static + Send + Sync,
{
	/// Decides whether `response` counts as a success. Defaults to any 2xx status.
	fn is_success(&self, response: &ResponseDescriptor) -> bool {
		response.status.is_success()
	}

	/// Classifies `response` using [`is_success`](Self::is_success).
	fn classify(&self, response: &ResponseDescriptor) -> Classification {
		if self.is_success(response) { Classification::Success } else { Classification::Failure }
	}

	/// Converts a success response into `R`.
	fn deserialize<R>(&self, response: &ResponseDescriptor) -> Result<R>
	where
		R: DeserializeOwned,
	{
		deserialize_content(response)
	}

	/// Handles a failure response.
	///
	/// The default signals [`Error::FailureResponse`]. Integrations may override it to recover a
	/// typed value (for example an error envelope) with [`deserialize_content`].
	fn handle_failure<R>(&self, request: &RequestDescriptor, response: &ResponseDescriptor) -> Result<R>
	where
		R: DeserializeOwned,
	{
		Err(failure_response(request, response))
	}
}

/// Processor that keeps every default hook.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultResponseProcessor;
impl ResponseProcessor for DefaultResponseProcessor {}

/// Deserializes the JSON content of `response` into `R`.
///
/// Fails with [`Error::DeserializationFailure`] carrying the raw content, the JSON path where
/// parsing stopped, and the parser error. Trailing data after the JSON document is rejected.
pub fn deserialize_content<R>(response: &ResponseDescriptor) -> Result<R>
where
	R: DeserializeOwned,
{
	let mut de = serde_json::Deserializer::from_slice(&response.content);
	let value = serde_path_to_error::deserialize(&mut de).map_err(|err| {
		let location = err.path().to_string();

		deserialization_failure(response, location, err.into_inner())
	})?;

	de.end().map_err(|err| deserialization_failure(response, ".".into(), err))?;

	Ok(value)
}

/// Builds the default [`Error::FailureResponse`] for `request` + `response`.
pub fn failure_response(request: &RequestDescriptor, response: &ResponseDescriptor) -> Error {
	Error::FailureResponse {
		method: request.method.clone(),
		path: request.path.clone(),
		status: response.status,
		content: response.text().into_owned(),
	}
}

fn deserialization_failure(
	response: &ResponseDescriptor,
	location: String,
	source: serde_json::Error,
) -> Error {
	Error::DeserializationFailure {
		status: response.status,
		content: response.text().into_owned(),
		location,
		source: Arc::new(source),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[derive(Debug, Deserialize)]
	struct Widget {
		id: u32,
		name: String,
	}

	#[test]
	fn default_classification_uses_2xx() {
		let processor = DefaultResponseProcessor;

		assert_eq!(
			processor.classify(&ResponseDescriptor::new(StatusCode::NO_CONTENT)),
			Classification::Success
		);
		assert_eq!(
			processor.classify(&ResponseDescriptor::new(StatusCode::NOT_FOUND)),
			Classification::Failure
		);
	}

	#[test]
	fn deserialization_failure_keeps_raw_content_and_path() {
		let response =
			ResponseDescriptor::json(StatusCode::OK, r#"{"id":"not-a-number","name":"w"}"#);
		let err = deserialize_content::<Widget>(&response)
			.expect_err("Mistyped field should fail deserialization.");

		match err {
			Error::DeserializationFailure { status, content, location, .. } => {
				assert_eq!(status, StatusCode::OK);
				assert_eq!(content, r#"{"id":"not-a-number","name":"w"}"#);
				assert_eq!(location, "id");
			},
			other => panic!("Unexpected error: {other:?}."),
		}
	}

	#[test]
	fn empty_and_trailing_content_fail() {
		let empty = ResponseDescriptor::new(StatusCode::OK);

		assert!(matches!(
			deserialize_content::<Widget>(&empty),
			Err(Error::DeserializationFailure { .. })
		));

		let trailing = ResponseDescriptor::json(StatusCode::OK, r#"{"id":1,"name":"w"} junk"#);

		assert!(matches!(
			deserialize_content::<Widget>(&trailing),
			Err(Error::DeserializationFailure { .. })
		));
	}

	#[test]
	fn success_content_deserializes() {
		let response = ResponseDescriptor::json(StatusCode::OK, r#"{"id":7,"name":"gear"}"#);
		let widget = deserialize_content::<Widget>(&response).expect("Valid JSON should parse.");

		assert_eq!(widget.id, 7);
		assert_eq!(widget.name, "gear");
	}

	#[test]
	fn overridden_failure_handler_recovers_typed_errors() {
		#[derive(Debug, Deserialize, PartialEq)]
		struct ApiError {
			code: String,
		}

		struct EnvelopeProcessor;
		impl ResponseProcessor for EnvelopeProcessor {
			fn handle_failure<R>(
				&self,
				_request: &RequestDescriptor,
				response: &ResponseDescriptor,
			) -> Result<R>
			where
				R: DeserializeOwned,
			{
				deserialize_content(response)
			}
		}

		let request = RequestDescriptor::builder(Method::GET, "/widgets")
			.build_empty()
			.expect("Request should build.");
		let response = ResponseDescriptor::json(StatusCode::CONFLICT, r#"{"code":"busy"}"#);
		let recovered = EnvelopeProcessor
			.handle_failure::<ApiError>(&request, &response)
			.expect("Override should recover the error envelope.");

		assert_eq!(recovered, ApiError { code: "busy".into() });

		let err = DefaultResponseProcessor
			.handle_failure::<ApiError>(&request, &response)
			.expect_err("Default handler should signal a failure response.");

		assert_eq!(err.status(), Some(StatusCode::CONFLICT));
		assert_eq!(err.content(), Some(r#"{"code":"busy"}"#));
	}
}
