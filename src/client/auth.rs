//! Bearer-token interception for outgoing requests.

// self
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;
use crate::{
	_prelude::*,
	client::RestClient,
	config::TokenAuthConfig,
	http::{HttpTransport, ResponseDescriptor},
	request::{RequestBuilder, RequestDescriptor},
	response::{DefaultResponseProcessor, ResponseProcessor},
	token::{TokenLifecycleManager, TokenProvider},
};

/// Decides per request whether a bearer token must be attached.
///
/// Requests whose resolved path equals the authentication or refresh endpoint go out untouched;
/// every other request gets `Authorization: Bearer <token>`, replacing any existing value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthInterceptor {
	auth_path: String,
	refresh_path: String,
}
impl AuthInterceptor {
	/// Creates an interceptor that skips the endpoints of `config`.
	pub fn from_config(config: &TokenAuthConfig) -> Self {
		Self { auth_path: config.auth_uri.clone(), refresh_path: config.refresh_token_uri.clone() }
	}

	/// Returns `true` unless `request` targets one of the token endpoints.
	pub fn requires_token(&self, request: &RequestDescriptor) -> bool {
		request.path != self.auth_path && request.path != self.refresh_path
	}

	/// Attaches a token from `tokens` when [`requires_token`](Self::requires_token) holds.
	pub async fn intercept<P, T, H>(
		&self,
		request: RequestDescriptor,
		tokens: &TokenLifecycleManager<P, T, H>,
	) -> Result<RequestDescriptor>
	where
		P: TokenProvider,
		T: HttpTransport,
		H: ResponseProcessor,
	{
		if !self.requires_token(&request) {
			return Ok(request);
		}

		let token = tokens.get_token().await?;

		Ok(request.with_authorization(token.bearer_header()?))
	}
}

/// REST client that authenticates every request with a managed bearer token.
pub struct BearerRestClient<P, T, H = DefaultResponseProcessor>
where
	P: TokenProvider,
	T: HttpTransport,
	H: ResponseProcessor,
{
	client: RestClient<T, H>,
	tokens: TokenLifecycleManager<P, T, H>,
	interceptor: AuthInterceptor,
}
#[cfg(feature = "reqwest")]
impl<P> BearerRestClient<P, ReqwestTransport>
where
	P: TokenProvider,
{
	/// Creates a reqwest-backed bearer client honoring the configured timeout.
	pub fn new(config: TokenAuthConfig, provider: P) -> Result<Self> {
		let transport = ReqwestTransport::from_config(&config)?;

		Self::with_transport(config, provider, transport)
	}
}
impl<P, T> BearerRestClient<P, T>
where
	P: TokenProvider,
	T: HttpTransport,
{
	/// Creates a bearer client over `transport` with the default response processor.
	pub fn with_transport(config: TokenAuthConfig, provider: P, transport: T) -> Result<Self> {
		Self::with_processor(config, provider, transport, DefaultResponseProcessor)
	}
}
impl<P, T, H> BearerRestClient<P, T, H>
where
	P: TokenProvider,
	T: HttpTransport,
	H: ResponseProcessor,
{
	/// Creates a bearer client over `transport` with a custom response processor.
	///
	/// The token endpoints are called through the same transport and processor as every other
	/// request.
	pub fn with_processor(
		config: TokenAuthConfig,
		provider: P,
		transport: T,
		processor: H,
	) -> Result<Self> {
		config.validate()?;

		let interceptor = AuthInterceptor::from_config(&config);
		let client = RestClient::with_processor(config.client.clone(), transport, processor)?;
		let tokens = TokenLifecycleManager::new(provider, client.clone(), &config)?;

		Ok(Self { client, tokens, interceptor })
	}

	/// Returns the underlying unauthenticated client.
	pub fn client(&self) -> &RestClient<T, H> {
		&self.client
	}

	/// Returns the token lifecycle manager.
	pub fn tokens(&self) -> &TokenLifecycleManager<P, T, H> {
		&self.tokens
	}

	/// Returns the interceptor.
	pub fn interceptor(&self) -> &AuthInterceptor {
		&self.interceptor
	}

	/// Builds and sends an authenticated typed request.
	///
	/// `segments` bind positionally to the `{name}` placeholders of `template`.
	pub fn send<'a, Q, R>(
		&'a self,
		method: Method,
		template: &str,
		payload: &Q,
		segments: &[&dyn Display],
	) -> impl Future<Output = Result<R>> + Send + use<'a, P, T, H, Q, R>
	where
		Q: ?Sized + Serialize,
		R: DeserializeOwned,
	{
		let request = RequestBuilder::new(method, template).segments(segments).build(payload);

		async move { self.execute(request?).await }
	}

	/// Builds and sends an authenticated request whose success response carries no content of
	/// interest.
	pub fn send_unit<'a, Q>(
		&'a self,
		method: Method,
		template: &str,
		payload: &Q,
		segments: &[&dyn Display],
	) -> impl Future<Output = Result<()>> + Send + use<'a, P, T, H, Q>
	where
		Q: ?Sized + Serialize,
	{
		let request = RequestBuilder::new(method, template).segments(segments).build(payload);

		async move { self.execute_unit(request?).await }
	}

	/// Authenticates and sends a prepared request, deserializing the success response into `R`.
	pub async fn execute<R>(&self, request: RequestDescriptor) -> Result<R>
	where
		R: DeserializeOwned,
	{
		let request = self.interceptor.intercept(request, &self.tokens).await?;

		self.client.execute(request).await
	}

	/// Authenticates and sends a prepared request without deserializing the success response.
	pub async fn execute_unit(&self, request: RequestDescriptor) -> Result<()> {
		let request = self.interceptor.intercept(request, &self.tokens).await?;

		self.client.execute_unit(request).await
	}

	/// Authenticates and sends a prepared request, returning the raw response.
	pub async fn dispatch(&self, request: RequestDescriptor) -> Result<ResponseDescriptor> {
		let request = self.interceptor.intercept(request, &self.tokens).await?;

		self.client.dispatch(&request).await
	}
}
impl<P, T, H> Clone for BearerRestClient<P, T, H>
where
	P: TokenProvider,
	T: HttpTransport,
	H: ResponseProcessor,
{
	fn clone(&self) -> Self {
		Self {
			client: self.client.clone(),
			tokens: self.tokens.clone(),
			interceptor: self.interceptor.clone(),
		}
	}
}
impl<P, T, H> Debug for BearerRestClient<P, T, H>
where
	P: TokenProvider,
	T: HttpTransport,
	H: ResponseProcessor,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("BearerRestClient")
			.field("client", &self.client)
			.field("tokens", &self.tokens)
			.field("interceptor", &self.interceptor)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::config::ClientConfig;

	fn interceptor() -> AuthInterceptor {
		AuthInterceptor::from_config(&TokenAuthConfig::new(
			ClientConfig::new("https://api.example.com"),
			"/auth/login",
			"/auth/refresh",
		))
	}

	#[test]
	fn token_endpoints_are_matched_on_the_resolved_path() {
		let interceptor = interceptor();
		let login = RequestBuilder::new(Method::POST, "/auth/{action}")
			.segment("login")
			.build_empty()
			.expect("Request should build.");
		let refresh = RequestBuilder::new(Method::POST, "/auth/refresh")
			.build_empty()
			.expect("Request should build.");
		let other = RequestBuilder::new(Method::POST, "/auth/login/extra")
			.build_empty()
			.expect("Request should build.");

		assert!(!interceptor.requires_token(&login));
		assert!(!interceptor.requires_token(&refresh));
		assert!(interceptor.requires_token(&other));
	}
}
