//! Single-flight token acquisition, caching, and refresh.
//!
//! Every caller of [`TokenLifecycleManager::current`] goes through one decision made under the
//! flight lock: reuse the cached token, join the acquisition already in flight, or start a new
//! one. An acquisition is a [`Shared`] future that performs the network call and writes the cache
//! before resolving, so every waiter observes the same stored token. The manager only keeps a
//! weak handle to it; when every waiter is dropped, the acquisition is abandoned and the next
//! caller starts over.

// std
use std::time::Instant;
// crates.io
use futures::{
	FutureExt,
	future::{Shared, WeakShared},
};
// self
use crate::{
	_prelude::*,
	client::RestClient,
	config::{RefreshFailurePolicy, TokenAuthConfig},
	error::ConfigError,
	http::HttpTransport,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	request::RequestDescriptor,
	response::{DefaultResponseProcessor, ResponseProcessor},
	token::{CachedToken, TokenCache, TokenMetrics, TokenProvider, TokenSecret},
};

type TokenFlight<A> = Pin<Box<dyn Future<Output = Result<CachedToken<A>>> + Send>>;
type AuthResponseOf<P> = <P as TokenProvider>::AuthResponse;

/// Orchestrates authentication and refresh of one cached bearer token.
///
/// Clones share the same cache and in-flight acquisition.
pub struct TokenLifecycleManager<P, T, H = DefaultResponseProcessor>
where
	P: TokenProvider,
	T: HttpTransport,
	H: ResponseProcessor,
{
	inner: Arc<Inner<P, T, H>>,
}
impl<P, T, H> TokenLifecycleManager<P, T, H>
where
	P: TokenProvider,
	T: HttpTransport,
	H: ResponseProcessor,
{
	/// Creates a manager that calls the token endpoints of `config` through `client`.
	pub fn new(provider: P, client: RestClient<T, H>, config: &TokenAuthConfig) -> Result<Self> {
		config.validate()?;

		Ok(Self {
			inner: Arc::new(Inner {
				provider,
				client,
				auth_path: config.auth_uri.clone(),
				refresh_path: config.refresh_token_uri.clone(),
				policy: config.refresh_failure_policy,
				cache: TokenCache::default(),
				metrics: TokenMetrics::default(),
				flight: Mutex::new(FlightSlot::default()),
			}),
		})
	}

	/// Returns a usable bearer token, authenticating or refreshing first when needed.
	pub async fn get_token(&self) -> Result<TokenSecret> {
		self.current().await.map(|token| token.token)
	}

	/// Returns the usable cached token together with the response it was extracted from.
	pub async fn current(&self) -> Result<CachedToken<AuthResponseOf<P>>> {
		let (generation, flight) = match self.acquire() {
			Acquisition::Cached(token) => return Ok(token),
			Acquisition::Flight { generation, flight } => (generation, flight),
		};
		let outcome = flight.await;

		self.settle(generation);

		outcome
	}

	/// Returns the cached token without any network call, even if it is stale.
	pub fn cached_token(&self) -> Option<CachedToken<AuthResponseOf<P>>> {
		self.inner.cache.get()
	}

	/// Drops the cached token so the next call authenticates from scratch.
	///
	/// An acquisition already in flight is left alone and still stores its result.
	pub fn invalidate(&self) {
		if self.inner.cache.clear().is_some() {
			#[cfg(feature = "tracing")]
			tracing::debug!("Cached token invalidated.");
		}
	}

	/// Returns the token flow counters.
	pub fn metrics(&self) -> &TokenMetrics {
		&self.inner.metrics
	}

	/// Returns the token provider.
	pub fn provider(&self) -> &P {
		&self.inner.provider
	}

	/// Path of the authentication endpoint.
	pub fn auth_path(&self) -> &str {
		&self.inner.auth_path
	}

	/// Path of the refresh endpoint.
	pub fn refresh_path(&self) -> &str {
		&self.inner.refresh_path
	}

	fn acquire(&self) -> Acquisition<AuthResponseOf<P>> {
		let mut slot = self.inner.flight.lock();

		if let Some((generation, flight)) = slot.pending.as_ref().and_then(|(generation, weak)| {
			weak.upgrade().map(|flight| (*generation, flight))
		}) {
			return Acquisition::Flight { generation, flight };
		}

		let step = match self.inner.cache.get() {
			Some(token) if token.is_expired_at(OffsetDateTime::now_utc()) => Step::Authenticate,
			Some(token) if self.inner.provider.needs_refresh(&token.auth_response) =>
				Step::Refresh(token),
			Some(token) => {
				self.inner.metrics.record_cache_hit();

				return Acquisition::Cached(token);
			},
			None => Step::Authenticate,
		};
		let flight: TokenFlight<AuthResponseOf<P>> = Box::pin(Arc::clone(&self.inner).run(step));
		let flight = flight.shared();
		let generation = slot.generation.wrapping_add(1);

		slot.generation = generation;
		slot.pending = flight.downgrade().map(|weak| (generation, weak));

		Acquisition::Flight { generation, flight }
	}

	fn settle(&self, generation: u64) {
		let mut slot = self.inner.flight.lock();

		if slot.pending.as_ref().is_some_and(|(pending, _)| *pending == generation) {
			slot.pending = None;
		}
	}
}
impl<P, T, H> Clone for TokenLifecycleManager<P, T, H>
where
	P: TokenProvider,
	T: HttpTransport,
	H: ResponseProcessor,
{
	fn clone(&self) -> Self {
		Self { inner: Arc::clone(&self.inner) }
	}
}
impl<P, T, H> Debug for TokenLifecycleManager<P, T, H>
where
	P: TokenProvider,
	T: HttpTransport,
	H: ResponseProcessor,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenLifecycleManager")
			.field("auth_path", &self.inner.auth_path)
			.field("refresh_path", &self.inner.refresh_path)
			.field("policy", &self.inner.policy)
			.field("cache", &self.inner.cache)
			.field("metrics", &self.inner.metrics)
			.finish_non_exhaustive()
	}
}

struct Inner<P, T, H>
where
	P: TokenProvider,
	T: HttpTransport,
	H: ResponseProcessor,
{
	provider: P,
	client: RestClient<T, H>,
	auth_path: String,
	refresh_path: String,
	policy: RefreshFailurePolicy,
	cache: TokenCache<AuthResponseOf<P>>,
	metrics: TokenMetrics,
	flight: Mutex<FlightSlot<AuthResponseOf<P>>>,
}
impl<P, T, H> Inner<P, T, H>
where
	P: TokenProvider,
	T: HttpTransport,
	H: ResponseProcessor,
{
	async fn run(
		self: Arc<Self>,
		step: Step<AuthResponseOf<P>>,
	) -> Result<CachedToken<AuthResponseOf<P>>> {
		let current = match step {
			Step::Authenticate => return self.authenticate().await,
			Step::Refresh(current) => current,
		};

		match self.refresh(&current).await {
			Ok(token) => Ok(token),
			Err(e) => match self.policy {
				RefreshFailurePolicy::Propagate => Err(e),
				RefreshFailurePolicy::Reauthenticate => {
					obs::log_refresh_fallback(&e);

					self.authenticate().await
				},
			},
		}
	}

	async fn authenticate(&self) -> Result<CachedToken<AuthResponseOf<P>>> {
		const KIND: FlowKind = FlowKind::Authenticate;

		let span = FlowSpan::new(KIND, &self.auth_path);

		span.instrument(async {
			let started = Instant::now();

			obs::record_flow_outcome(KIND, FlowOutcome::Attempt);
			self.metrics.record_authentication();

			let request = token_request(&self.auth_path, &self.provider.build_auth_request());
			let result = self.issue(request).await.map_err(|e| Error::AuthenticationFailure {
				path: self.auth_path.clone(),
				source: Arc::new(e),
			});

			self.observe(KIND, &span, started, result)
		})
		.await
	}

	async fn refresh(
		&self,
		current: &CachedToken<AuthResponseOf<P>>,
	) -> Result<CachedToken<AuthResponseOf<P>>> {
		const KIND: FlowKind = FlowKind::Refresh;

		let span = FlowSpan::new(KIND, &self.refresh_path);

		span.instrument(async {
			let started = Instant::now();

			obs::record_flow_outcome(KIND, FlowOutcome::Attempt);
			self.metrics.record_refresh();

			let request = token_request(
				&self.refresh_path,
				&self.provider.build_refresh_request(&current.auth_response),
			);
			let result = self.issue(request).await.map_err(|e| Error::TokenRefreshFailure {
				path: self.refresh_path.clone(),
				source: Arc::new(e),
			});

			self.observe(KIND, &span, started, result)
		})
		.await
	}

	async fn issue(
		&self,
		request: Result<RequestDescriptor>,
	) -> Result<CachedToken<AuthResponseOf<P>>> {
		let response = self.client.execute::<AuthResponseOf<P>>(request?).await?;

		self.store(response)
	}

	fn store(&self, response: AuthResponseOf<P>) -> Result<CachedToken<AuthResponseOf<P>>> {
		let token = self.provider.extract_token(&response);

		if token.trim().is_empty() {
			return Err(ConfigError::EmptyToken.into());
		}

		let lifetime = self.provider.extract_expiry(&response);

		if !lifetime.is_positive() {
			return Err(ConfigError::NonPositiveExpiry.into());
		}

		let token = CachedToken::issue(
			TokenSecret::new(token),
			Arc::new(response),
			OffsetDateTime::now_utc(),
			lifetime,
		);

		self.cache.replace(token.clone());

		Ok(token)
	}

	fn observe<V>(
		&self,
		kind: FlowKind,
		span: &FlowSpan,
		started: Instant,
		result: Result<V>,
	) -> Result<V> {
		let outcome = match &result {
			Ok(_) => FlowOutcome::Success,
			Err(_e) => {
				self.metrics.record_failure();

				#[cfg(feature = "tracing")]
				tracing::warn!(flow = kind.as_str(), error = %_e, "Token flow failed.");

				FlowOutcome::Failure
			},
		};

		span.record_outcome(outcome);
		obs::record_flow_outcome(kind, outcome);
		obs::record_flow_duration(kind, outcome, started.elapsed());

		result
	}
}

struct FlightSlot<A> {
	generation: u64,
	pending: Option<(u64, WeakShared<TokenFlight<A>>)>,
}
impl<A> Default for FlightSlot<A> {
	fn default() -> Self {
		Self { generation: 0, pending: None }
	}
}

enum Acquisition<A> {
	Cached(CachedToken<A>),
	Flight { generation: u64, flight: Shared<TokenFlight<A>> },
}

enum Step<A> {
	Authenticate,
	Refresh(CachedToken<A>),
}

fn token_request<Q>(path: &str, payload: &Q) -> Result<RequestDescriptor>
where
	Q: Serialize,
{
	RequestDescriptor::builder(Method::POST, path).build(payload)
}
