//! Request construction: route templates, positional segments, and payload placement.
//!
//! [`RequestBuilder`] turns a method, a `{name}` route template, positional segment values, and a
//! serializable payload into an immutable [`RequestDescriptor`]. Placeholders bind to positional
//! values in order of appearance, never by name. What happens to the payload depends only on the
//! method: GET payload fields fill any placeholders left unbound (matched by name) and otherwise
//! become query parameters; every other method sends the whole payload as a JSON body.

pub mod template;

mod payload;

pub use template::*;

// crates.io
use ::http::header::{AUTHORIZATION, CONTENT_TYPE};
// self
use crate::{_prelude::*, error::ConfigError};

const JSON_CONTENT_TYPE: &str = "application/json";

/// Concrete request ready to hand to a transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestDescriptor {
	/// HTTP method.
	pub method: Method,
	/// Route template the path was resolved from.
	pub template: String,
	/// Resolved, percent-encoded path relative to the base URI.
	pub path: String,
	/// Query parameters in insertion order.
	pub query: Vec<(String, String)>,
	/// Request headers.
	pub headers: HeaderMap,
	/// Serialized JSON body, if any.
	pub body: Option<Vec<u8>>,
}
impl RequestDescriptor {
	/// Starts a builder for `method` + `template`.
	pub fn builder(method: Method, template: impl Into<String>) -> RequestBuilder {
		RequestBuilder::new(method, template)
	}

	/// Joins the resolved path and query onto `base`, preserving any path prefix of `base`.
	pub fn url(&self, base: &Url) -> Url {
		let mut url = base.clone();
		let prefix = base.path().trim_end_matches('/');
		let path = self.path.trim_start_matches('/');

		url.set_path(&format!("{prefix}/{path}"));
		url.set_query(None);
		url.set_fragment(None);

		if !self.query.is_empty() {
			url.query_pairs_mut()
				.extend_pairs(self.query.iter().map(|(key, value)| (key.as_str(), value.as_str())));
		}

		url
	}

	/// Looks up the first query value for `name`.
	pub fn query_value(&self, name: &str) -> Option<&str> {
		self.query.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
	}

	/// Parses the body back into JSON, mostly for diagnostics and tests.
	pub fn body_json(&self) -> Option<serde_json::Value> {
		self.body.as_deref().and_then(|bytes| serde_json::from_slice(bytes).ok())
	}

	/// Returns `true` when an `Authorization` header is present.
	pub fn has_authorization(&self) -> bool {
		self.headers.contains_key(AUTHORIZATION)
	}

	/// Returns a copy with `Authorization` set to `value`, replacing any existing value.
	pub fn with_authorization(mut self, value: HeaderValue) -> Self {
		self.headers.insert(AUTHORIZATION, value);

		self
	}
}

/// Builder for [`RequestDescriptor`] values.
#[derive(Clone, Debug)]
pub struct RequestBuilder {
	method: Method,
	template: String,
	segments: Vec<Option<String>>,
	headers: HeaderMap,
}
impl RequestBuilder {
	/// Creates a builder for `method` + `template`.
	pub fn new(method: Method, template: impl Into<String>) -> Self {
		Self { method, template: template.into(), segments: Vec::new(), headers: HeaderMap::new() }
	}

	/// Appends the next positional segment value.
	pub fn segment(mut self, value: impl Display) -> Self {
		self.segments.push(Some(value.to_string()));

		self
	}

	/// Appends a positional segment value that may be absent.
	///
	/// An absent, empty, or whitespace-only value makes [`build`](Self::build) fail with
	/// [`Error::MissingSegmentValue`] for the placeholder at this position.
	pub fn optional_segment<V>(mut self, value: Option<V>) -> Self
	where
		V: Display,
	{
		self.segments.push(value.map(|value| value.to_string()));

		self
	}

	/// Appends several positional segment values.
	pub fn segments<I, V>(mut self, values: I) -> Self
	where
		I: IntoIterator<Item = V>,
		V: Display,
	{
		self.segments.extend(values.into_iter().map(|value| Some(value.to_string())));

		self
	}

	/// Adds or replaces a header.
	pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
		self.headers.insert(name, value);

		self
	}

	/// Adds or replaces a header from string parts.
	pub fn try_header(self, name: &str, value: &str) -> Result<Self> {
		let invalid = || ConfigError::InvalidHeader { name: name.to_owned() };
		let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
		let value = HeaderValue::from_str(value).map_err(|_| invalid())?;

		Ok(self.header(name, value))
	}

	/// Resolves the template without a payload.
	pub fn build_empty(self) -> Result<RequestDescriptor> {
		self.build(&())
	}

	/// Resolves the template and places `payload` according to the method.
	pub fn build<P>(self, payload: &P) -> Result<RequestDescriptor>
	where
		P: ?Sized + Serialize,
	{
		let Self { method, template, segments, mut headers } = self;
		let route = RouteTemplate::parse(&template);
		let placeholders = route.placeholders().collect::<Vec<_>>();

		if segments.len() > placeholders.len() {
			return Err(ConfigError::SurplusSegmentValues {
				template: template.clone(),
				expected: placeholders.len(),
				supplied: segments.len(),
			}
			.into());
		}

		let mut bindings = vec![None; placeholders.len()];

		for (idx, value) in segments.into_iter().enumerate() {
			let value = value.filter(|value| !value.trim().is_empty()).ok_or_else(|| {
				Error::MissingSegmentValue {
					template: template.clone(),
					placeholder: placeholders[idx].to_owned(),
				}
			})?;

			bindings[idx] = Some(urlencoding::encode(&value).into_owned());
		}

		let value = serde_json::to_value(payload).map_err(ConfigError::from)?;
		let (query, body) = if method == Method::GET {
			(payload::bind_query_payload(value, &placeholders, &mut bindings)?, None)
		} else if value.is_null() {
			(Vec::new(), None)
		} else {
			(Vec::new(), Some(serde_json::to_vec(&value).map_err(ConfigError::from)?))
		};
		let path = route.render(&bindings)?;

		if body.is_some() && !headers.contains_key(CONTENT_TYPE) {
			headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
		}

		Ok(RequestDescriptor { method, template, path, query, headers, body })
	}
}
