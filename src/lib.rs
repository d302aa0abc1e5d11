//! Typed REST API clients over a shared HTTP transport, with single-flight bearer-token
//! acquisition, caching, and refresh.
//!
//! The crate is organized leaf-first:
//!
//! - [`request`] resolves route templates and payloads into [`request::RequestDescriptor`]s.
//! - [`http`] defines the [`http::HttpTransport`] seam and the reqwest-backed default.
//! - [`response`] classifies responses and deserializes typed values.
//! - [`token`] owns the cached token and the single-flight [`token::TokenLifecycleManager`].
//! - [`client`] ties everything together behind [`client::RestClient`] and
//!   [`client::BearerRestClient`].

#![deny(clippy::all)]
#![warn(missing_docs, unused_crate_dependencies)]

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod obs;
pub mod request;
pub mod response;
pub mod token;

mod _prelude {
	pub use std::{
		borrow::Cow,
		collections::BTreeSet,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use ::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use ::http as http_types;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _};
