//! Payload placement: GET payload fields become path segments or query parameters.

// crates.io
use serde_json::{Map, Value};
// self
use crate::{_prelude::*, error::ConfigError};

/// Splits a serialized GET payload into placeholder bindings and query parameters.
///
/// Fields whose name matches a still-unbound placeholder fill every unbound occurrence of that
/// placeholder; the rest become query parameters in field order. Null, empty, and
/// whitespace-only values are omitted. Array fields produce one query pair per element.
pub(crate) fn bind_query_payload(
	payload: Value,
	placeholders: &[&str],
	bindings: &mut [Option<String>],
) -> Result<Vec<(String, String)>> {
	let fields = match payload {
		Value::Null => return Ok(Vec::new()),
		Value::Object(fields) => fields,
		other => return Err(ConfigError::UnsupportedQueryPayload { found: kind(&other) }.into()),
	};

	Ok(bind_fields(fields, placeholders, bindings))
}

fn bind_fields(
	fields: Map<String, Value>,
	placeholders: &[&str],
	bindings: &mut [Option<String>],
) -> Vec<(String, String)> {
	let mut query = Vec::new();

	for (name, value) in fields {
		let unbound = placeholders
			.iter()
			.zip(bindings.iter())
			.any(|(placeholder, binding)| *placeholder == name && binding.is_none());

		if unbound {
			if let Some(rendered) = render_scalar(&value) {
				let encoded = urlencoding::encode(&rendered).into_owned();

				for (placeholder, binding) in placeholders.iter().zip(bindings.iter_mut()) {
					if *placeholder == name && binding.is_none() {
						*binding = Some(encoded.clone());
					}
				}
			}

			continue;
		}

		match value {
			Value::Array(items) =>
				for item in items {
					if let Some(rendered) = render_scalar(&item) {
						query.push((name.clone(), rendered));
					}
				},
			other =>
				if let Some(rendered) = render_scalar(&other) {
					query.push((name, rendered));
				},
		}
	}

	query
}

/// Renders a JSON value as a single parameter string, or `None` when it carries nothing.
pub(crate) fn render_scalar(value: &Value) -> Option<String> {
	match value {
		Value::Null => None,
		Value::String(text) if text.trim().is_empty() => None,
		Value::String(text) => Some(text.clone()),
		Value::Bool(flag) => Some(flag.to_string()),
		Value::Number(number) => Some(number.to_string()),
		Value::Array(items) if items.is_empty() => None,
		Value::Object(fields) if fields.is_empty() => None,
		other => Some(other.to_string()),
	}
}

fn kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}
