//! The client capability consumed by volume operations.
//!
//! [`Client`] is deliberately narrow: the identity the process acts as, the
//! configured volumes path, and a way to send one request. Anything that
//! can do those things (a real array connection, a recording mock, an
//! in-memory fake) can drive [`Volumes`](crate::Volumes).

use std::sync::Arc;

use ifsvol_http::{HttpExecutor, HttpRequest, HttpResponse, RequestContext};

use crate::path::DEFAULT_VOLUMES_PATH;

/// Identity plus transport.
pub trait Client: Send + Sync {
    /// User that new volumes are assigned to.
    fn user(&self) -> &str;

    /// Group that new volumes are assigned to. Empty means no group.
    fn group(&self) -> &str;

    /// Location of volumes on the array, e.g. `/ifs/volumes`.
    fn volumes_path(&self) -> &str;

    fn send(
        &self,
        ctx: &RequestContext,
        request: &HttpRequest,
    ) -> Result<HttpResponse, ifsvol_http::Error>;
}

impl<C: Client + ?Sized> Client for Arc<C> {
    fn user(&self) -> &str {
        (**self).user()
    }

    fn group(&self) -> &str {
        (**self).group()
    }

    fn volumes_path(&self) -> &str {
        (**self).volumes_path()
    }

    fn send(
        &self,
        ctx: &RequestContext,
        request: &HttpRequest,
    ) -> Result<HttpResponse, ifsvol_http::Error> {
        (**self).send(ctx, request)
    }
}

/// [`Client`] backed by an [`HttpExecutor`].
pub struct HttpClient<E> {
    executor: E,
    user: String,
    group: String,
    volumes_path: String,
}

impl<E: HttpExecutor> HttpClient<E> {
    /// Create a client acting as `user` with no group, using the default
    /// volumes path.
    pub fn new(executor: E, user: impl Into<String>) -> Self {
        Self {
            executor,
            user: user.into(),
            group: String::new(),
            volumes_path: DEFAULT_VOLUMES_PATH.to_string(),
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    pub fn with_volumes_path(mut self, volumes_path: impl Into<String>) -> Self {
        self.volumes_path = volumes_path.into();
        self
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }
}

impl<E: HttpExecutor> Client for HttpClient<E> {
    fn user(&self) -> &str {
        &self.user
    }

    fn group(&self) -> &str {
        &self.group
    }

    fn volumes_path(&self) -> &str {
        &self.volumes_path
    }

    fn send(
        &self,
        ctx: &RequestContext,
        request: &HttpRequest,
    ) -> Result<HttpResponse, ifsvol_http::Error> {
        self.executor.execute(ctx, request)
    }
}
