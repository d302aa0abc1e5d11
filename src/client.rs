//! Typed REST clients tying the request pipeline together.
//!
//! [`RestClient`] builds a request, hands it to the transport, and runs the response through its
//! [`ResponseProcessor`]. [`BearerRestClient`] adds an [`AuthInterceptor`] in front of the
//! transport that attaches the token owned by a [`TokenLifecycleManager`](crate::token::TokenLifecycleManager).
//! Both are cheap to clone; clones share one transport, one configuration, and (for bearer
//! clients) one token cache.

pub mod auth;

pub use auth::*;

// self
use crate::{
	_prelude::*,
	config::ClientConfig,
	http::{HttpTransport, ResponseDescriptor},
	obs,
	request::{RequestBuilder, RequestDescriptor},
	response::{Classification, DefaultResponseProcessor, ResponseProcessor},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

/// [`RestClient`] backed by reqwest.
#[cfg(feature = "reqwest")]
pub type ReqwestRestClient<H = DefaultResponseProcessor> = RestClient<ReqwestTransport, H>;
/// [`BearerRestClient`] backed by reqwest.
#[cfg(feature = "reqwest")]
pub type ReqwestBearerClient<P, H = DefaultResponseProcessor> =
	BearerRestClient<P, ReqwestTransport, H>;

/// REST client sending typed requests relative to one base URI.
pub struct RestClient<T, H = DefaultResponseProcessor>
where
	T: HttpTransport,
	H: ResponseProcessor,
{
	core: Arc<ClientCore<T, H>>,
}
#[cfg(feature = "reqwest")]
impl RestClient<ReqwestTransport> {
	/// Creates a reqwest-backed client honoring the configured timeout.
	pub fn new(config: ClientConfig) -> Result<Self> {
		let transport = ReqwestTransport::from_config(&config)?;

		Self::with_transport(config, transport)
	}
}
impl<T> RestClient<T>
where
	T: HttpTransport,
{
	/// Creates a client over `transport` with the default response processor.
	pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self> {
		Self::with_processor(config, transport, DefaultResponseProcessor)
	}
}
impl<T, H> RestClient<T, H>
where
	T: HttpTransport,
	H: ResponseProcessor,
{
	/// Creates a client over `transport` with a custom response processor.
	pub fn with_processor(config: ClientConfig, transport: T, processor: H) -> Result<Self> {
		let base_url = config.base_url()?;

		Ok(Self { core: Arc::new(ClientCore { config, base_url, transport, processor }) })
	}

	/// Returns the client configuration.
	pub fn config(&self) -> &ClientConfig {
		&self.core.config
	}

	/// Returns the parsed base URL.
	pub fn base_url(&self) -> &Url {
		&self.core.base_url
	}

	/// Returns the transport.
	pub fn transport(&self) -> &T {
		&self.core.transport
	}

	/// Returns the response processor.
	pub fn processor(&self) -> &H {
		&self.core.processor
	}

	/// Builds and sends a typed request, deserializing the success response into `R`.
	///
	/// `segments` bind positionally to the `{name}` placeholders of `template`.
	pub fn send<'a, P, R>(
		&'a self,
		method: Method,
		template: &str,
		payload: &P,
		segments: &[&dyn Display],
	) -> impl Future<Output = Result<R>> + Send + use<'a, T, H, P, R>
	where
		P: ?Sized + Serialize,
		R: DeserializeOwned,
	{
		let request = RequestBuilder::new(method, template).segments(segments).build(payload);

		async move { self.execute(request?).await }
	}

	/// Builds and sends a request whose success response carries no content of interest.
	pub fn send_unit<'a, P>(
		&'a self,
		method: Method,
		template: &str,
		payload: &P,
		segments: &[&dyn Display],
	) -> impl Future<Output = Result<()>> + Send + use<'a, T, H, P>
	where
		P: ?Sized + Serialize,
	{
		let request = RequestBuilder::new(method, template).segments(segments).build(payload);

		async move { self.execute_unit(request?).await }
	}

	/// Sends a prepared request and deserializes the success response into `R`.
	pub async fn execute<R>(&self, request: RequestDescriptor) -> Result<R>
	where
		R: DeserializeOwned,
	{
		let response = self.dispatch(&request).await?;

		self.process(&request, &response)
	}

	/// Sends a prepared request without deserializing the success response.
	pub async fn execute_unit(&self, request: RequestDescriptor) -> Result<()> {
		let response = self.dispatch(&request).await?;

		match self.core.processor.classify(&response) {
			Classification::Success => Ok(()),
			Classification::Failure => {
				obs::log_failure_response(&self.core.config, &request, &response);

				self.core
					.processor
					.handle_failure::<serde::de::IgnoredAny>(&request, &response)
					.map(|_| ())
			},
		}
	}

	/// Sends a prepared request and returns the raw response, whatever its status.
	pub async fn dispatch(&self, request: &RequestDescriptor) -> Result<ResponseDescriptor> {
		let url = request.url(&self.core.base_url);

		obs::log_request(&self.core.config, request);

		let response = self.core.transport.send(url, request).await.map_err(|source| {
			let e = Error::Transport {
				method: request.method.clone(),
				path: request.path.clone(),
				source,
			};

			obs::log_transport_failure(request, &e);

			e
		})?;

		obs::log_response(&self.core.config, request, &response);

		Ok(response)
	}

	fn process<R>(&self, request: &RequestDescriptor, response: &ResponseDescriptor) -> Result<R>
	where
		R: DeserializeOwned,
	{
		let processor = &self.core.processor;

		match processor.classify(response) {
			Classification::Success => processor.deserialize(response).inspect_err(|e| {
				obs::log_deserialization_failure(request, e);
			}),
			Classification::Failure => {
				obs::log_failure_response(&self.core.config, request, response);

				processor.handle_failure(request, response)
			},
		}
	}
}
impl<T, H> Clone for RestClient<T, H>
where
	T: HttpTransport,
	H: ResponseProcessor,
{
	fn clone(&self) -> Self {
		Self { core: Arc::clone(&self.core) }
	}
}
impl<T, H> Debug for RestClient<T, H>
where
	T: HttpTransport,
	H: ResponseProcessor,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RestClient")
			.field("base_url", &self.core.base_url.as_str())
			.field("config", &self.core.config)
			.finish_non_exhaustive()
	}
}

struct ClientCore<T, H> {
	config: ClientConfig,
	base_url: Url,
	transport: T,
	processor: H,
}
