//! Single-slot token cache owned by one lifecycle manager.

// self
use crate::{_prelude::*, token::TokenSecret};

/// Token issued by the authentication or refresh endpoint, together with the response it came from.
///
/// Values are replaced whole; nothing mutates a cached token in place.
pub struct CachedToken<A> {
	/// Bearer token value.
	pub token: TokenSecret,
	/// Instant the token was stored.
	pub issued_at: OffsetDateTime,
	/// Instant the token stops being usable.
	pub expires_at: OffsetDateTime,
	/// Provider response the token was extracted from; refresh requests are built from it.
	pub auth_response: Arc<A>,
}
impl<A> CachedToken<A> {
	/// Creates a token issued at `issued_at` that lives for `lifetime`.
	pub fn issue(
		token: TokenSecret,
		auth_response: Arc<A>,
		issued_at: OffsetDateTime,
		lifetime: Duration,
	) -> Self {
		Self { token, issued_at, expires_at: issued_at.saturating_add(lifetime), auth_response }
	}

	/// Returns `true` once `now` has reached the expiry instant.
	pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
		now >= self.expires_at
	}

	/// Lifetime left at `now`, clamped to zero.
	pub fn remaining_at(&self, now: OffsetDateTime) -> Duration {
		(self.expires_at - now).max(Duration::ZERO)
	}
}
impl<A> Clone for CachedToken<A> {
	fn clone(&self) -> Self {
		Self {
			token: self.token.clone(),
			issued_at: self.issued_at,
			expires_at: self.expires_at,
			auth_response: Arc::clone(&self.auth_response),
		}
	}
}
impl<A> Debug for CachedToken<A> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CachedToken")
			.field("token", &self.token)
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish_non_exhaustive()
	}
}

/// Holds zero or one [`CachedToken`].
pub struct TokenCache<A>(RwLock<Option<CachedToken<A>>>);
impl<A> TokenCache<A> {
	/// Returns a copy of the cached token, if any.
	pub fn get(&self) -> Option<CachedToken<A>> {
		self.0.read().clone()
	}

	/// Stores `token`, returning the one it replaced.
	pub fn replace(&self, token: CachedToken<A>) -> Option<CachedToken<A>> {
		self.0.write().replace(token)
	}

	/// Drops the cached token, returning it.
	pub fn clear(&self) -> Option<CachedToken<A>> {
		self.0.write().take()
	}
}
impl<A> Default for TokenCache<A> {
	fn default() -> Self {
		Self(RwLock::new(None))
	}
}
impl<A> Debug for TokenCache<A> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenCache").field(&*self.0.read()).finish()
	}
}
