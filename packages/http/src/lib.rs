//! # ifsvol-http
//!
//! Transport layer for the `ifsvol` volume client.
//!
//! This crate knows nothing about volumes. It sends [`HttpRequest`]s to a
//! storage array's namespace API and hands back [`HttpResponse`]s, honoring
//! the deadline and cancellation carried by a [`RequestContext`].
//!
//! ```ignore
//! use std::time::Duration;
//! use ifsvol_http::{HttpExecutor, HttpRequest, RequestContext, ReqwestExecutor};
//!
//! let executor = ReqwestExecutor::new("https://cluster:8080", Duration::from_secs(30))?
//!     .with_basic_auth("svc", "secret");
//!
//! let ctx = RequestContext::with_timeout(Duration::from_secs(5));
//! let response = executor.execute(&ctx, &HttpRequest::get("namespace/ifs/volumes"))?;
//! ```

pub mod context;
pub mod error;
pub mod executor;
pub mod types;

pub use context::{CancellationHandle, RequestContext};
pub use error::Error;
pub use executor::{HttpExecutor, ReqwestExecutor};
pub use types::{HttpRequest, HttpResponse, Method};
