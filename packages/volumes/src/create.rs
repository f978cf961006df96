//! Two-phase volume creation.
//!
//! The namespace API cannot create a container and set its owner in one
//! call, so creation is a small state machine:
//!
//! ```text
//! Unstarted --materialize--> Materialized --assign ownership--> OwnershipAssigned
//!     |                           |
//!  (fails: stays Unstarted)    (fails) --> PartiallyFailed
//! ```
//!
//! A failed ownership step is never retried or rolled back here. The
//! volume stays on the array with its initial ACL and the caller gets a
//! [`VolumeError::PartialCreation`] to decide between deleting it and
//! re-applying ownership.

use ifsvol_http::{HttpRequest, RequestContext};

use crate::acl::{AclRequest, ACL_QUERY};
use crate::client::Client;
use crate::error::VolumeError;
use crate::path::NamespacePath;
use crate::response;
use crate::types::Volume;

pub const TARGET_TYPE_HEADER: &str = "x-isi-ifs-target-type";
pub const ACCESS_CONTROL_HEADER: &str = "x-isi-ifs-access-control";

const CONTAINER: &str = "container";
const PUBLIC_READ_WRITE: &str = "public_read_write";

/// Where a [`VolumeCreation`] stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreationState {
    /// Nothing exists yet, or the creation request failed.
    Unstarted,
    /// The container exists with its initial public ACL.
    Materialized,
    /// The container exists and is owned by the client identity.
    OwnershipAssigned,
    /// The container exists but the ownership request failed.
    PartiallyFailed,
}

impl CreationState {
    /// True once the container exists on the array.
    pub fn volume_exists(self) -> bool {
        !matches!(self, CreationState::Unstarted)
    }
}

/// One in-flight creation of a named volume.
pub struct VolumeCreation<'a, C: ?Sized> {
    client: &'a C,
    name: String,
    path: String,
    state: CreationState,
}

impl<'a, C: Client + ?Sized> VolumeCreation<'a, C> {
    pub(crate) fn new(client: &'a C, root: &NamespacePath, name: &str) -> Self {
        Self {
            client,
            name: name.to_string(),
            path: root.volume(name),
            state: CreationState::Unstarted,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn state(&self) -> CreationState {
        self.state
    }

    /// Drive the creation forward from its current state.
    ///
    /// From `Unstarted` both phases run; a creation failure returns that
    /// error unchanged and leaves the state at `Unstarted`. From
    /// `Materialized` or `PartiallyFailed` only the ownership phase runs,
    /// once. From `OwnershipAssigned` nothing is sent.
    pub fn run(&mut self, ctx: &RequestContext) -> Result<Volume, VolumeError> {
        if self.state == CreationState::Unstarted {
            self.materialize(ctx)?;
        }

        if self.state != CreationState::OwnershipAssigned {
            if let Err(source) = self.assign_ownership(ctx) {
                self.state = CreationState::PartiallyFailed;
                return Err(VolumeError::PartialCreation {
                    name: self.name.clone(),
                    path: self.path.clone(),
                    source: Box::new(source),
                });
            }
        }

        Ok(Volume {
            name: self.name.clone(),
            path: self.path.clone(),
        })
    }

    fn materialize(&mut self, ctx: &RequestContext) -> Result<(), VolumeError> {
        tracing::debug!(volume = %self.name, path = %self.path, "creating container");

        let request = HttpRequest::put(self.path.as_str())
            .with_header(TARGET_TYPE_HEADER, CONTAINER)
            .with_header(ACCESS_CONTROL_HEADER, PUBLIC_READ_WRITE);
        let response = self.client.send(ctx, &request)?;
        response::check(response, None)?;

        self.state = CreationState::Materialized;
        Ok(())
    }

    fn assign_ownership(&mut self, ctx: &RequestContext) -> Result<(), VolumeError> {
        tracing::debug!(volume = %self.name, user = self.client.user(), "assigning ownership");

        set_ownership(self.client, ctx, &self.path)?;

        self.state = CreationState::OwnershipAssigned;
        Ok(())
    }
}

/// Apply the client identity as owner (and group, if any) of `path`.
pub(crate) fn set_ownership<C: Client + ?Sized>(
    client: &C,
    ctx: &RequestContext,
    path: &str,
) -> Result<(), VolumeError> {
    let acl = AclRequest::update(client.user(), client.group());
    let request = HttpRequest::put(path)
        .with_query(ACL_QUERY, "")
        .with_body(&acl)
        .map_err(ifsvol_http::Error::from)?;
    let response = client.send(ctx, &request)?;
    response::check(response, None)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::HttpClient;
    use ifsvol_http::executor::mock::MockExecutor;
    use ifsvol_http::{HttpExecutor, HttpResponse, Method};

    fn root() -> NamespacePath {
        NamespacePath::resolve("/ifs/volumes")
    }

    fn ok() -> ifsvol_http::HttpResponse {
        MockExecutor::success_response(serde_json::Value::Null)
    }

    #[test]
    fn both_phases_succeed() {
        let executor = MockExecutor::new().then_respond(ok()).then_respond(ok());
        let client = HttpClient::new(executor.clone(), "svc").with_group("storage");
        let root = root();

        let mut creation = VolumeCreation::new(&client, &root, "vol1");
        assert_eq!(creation.state(), CreationState::Unstarted);

        let volume = creation.run(&RequestContext::background()).unwrap();

        assert_eq!(creation.state(), CreationState::OwnershipAssigned);
        assert_eq!(volume.name, "vol1");
        assert_eq!(volume.path, "namespace/ifs/volumes/vol1");

        let recorded = executor.recorded_requests();
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[1].method, Method::PUT);
        assert_eq!(recorded[1].query.get(ACL_QUERY).map(String::as_str), Some(""));
        assert_eq!(
            recorded[1].body.as_ref().unwrap()["group"],
            serde_json::json!({"name": "storage", "type": "group"})
        );
    }

    #[test]
    fn materialize_failure_stops_before_ownership() {
        let executor = MockExecutor::new().then_fail("connection refused");
        let client = HttpClient::new(executor.clone(), "svc");
        let root = root();

        let mut creation = VolumeCreation::new(&client, &root, "vol1");
        let err = creation.run(&RequestContext::background()).unwrap_err();

        assert!(matches!(
            err,
            VolumeError::Transport(ifsvol_http::Error::Unavailable { .. })
        ));
        assert_eq!(creation.state(), CreationState::Unstarted);
        assert!(!creation.state().volume_exists());
        assert_eq!(executor.recorded_requests().len(), 1);
    }

    #[test]
    fn ownership_failure_is_partial_creation() {
        let executor = MockExecutor::new()
            .then_respond(ok())
            .then_respond(MockExecutor::error_response(500, "acl write failed"));
        let client = HttpClient::new(executor.clone(), "svc");
        let root = root();

        let mut creation = VolumeCreation::new(&client, &root, "vol1");
        let err = creation.run(&RequestContext::background()).unwrap_err();

        assert_eq!(creation.state(), CreationState::PartiallyFailed);
        assert!(creation.state().volume_exists());
        match err {
            VolumeError::PartialCreation { name, path, source } => {
                assert_eq!(name, "vol1");
                assert_eq!(path, "namespace/ifs/volumes/vol1");
                assert!(matches!(*source, VolumeError::Api { status: 500, .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(executor.recorded_requests().len(), 2);
    }

    /// Answers through `inner`, then cancels the caller's context.
    struct CancelAfterReply {
        inner: MockExecutor,
    }

    impl HttpExecutor for CancelAfterReply {
        fn execute(
            &self,
            ctx: &RequestContext,
            request: &HttpRequest,
        ) -> Result<HttpResponse, ifsvol_http::Error> {
            let response = self.inner.execute(ctx, request);
            ctx.cancel();
            response
        }
    }

    #[test]
    fn cancellation_between_phases_is_partial_creation() {
        let executor = MockExecutor::new().then_respond(ok()).then_respond(ok());
        let client = HttpClient::new(
            CancelAfterReply {
                inner: executor.clone(),
            },
            "svc",
        );
        let root = root();
        let ctx = RequestContext::background();

        let mut creation = VolumeCreation::new(&client, &root, "vol1");
        let err = creation.run(&ctx).unwrap_err();

        match err {
            VolumeError::PartialCreation { name, path, source } => {
                assert_eq!(name, "vol1");
                assert_eq!(path, "namespace/ifs/volumes/vol1");
                assert!(matches!(
                    *source,
                    VolumeError::Transport(ifsvol_http::Error::Cancelled)
                ));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(creation.state(), CreationState::PartiallyFailed);
        assert_eq!(executor.recorded_requests().len(), 1);
        assert!(executor.recorded_requests()[0].query.is_empty());
    }

    #[test]
    fn rerun_after_partial_failure_only_reapplies_ownership() {
        let executor = MockExecutor::new()
            .then_respond(ok())
            .then_fail("timeout")
            .then_respond(ok());
        let client = HttpClient::new(executor.clone(), "svc");
        let root = root();
        let ctx = RequestContext::background();

        let mut creation = VolumeCreation::new(&client, &root, "vol1");
        assert!(creation.run(&ctx).unwrap_err().is_partial_creation());

        creation.run(&ctx).unwrap();

        assert_eq!(creation.state(), CreationState::OwnershipAssigned);
        let recorded = executor.recorded_requests();
        assert_eq!(recorded.len(), 3);
        assert!(recorded[0].query.is_empty());
        assert!(recorded[2].query.contains_key(ACL_QUERY));
    }

    #[test]
    fn completed_creation_sends_nothing_more() {
        let executor = MockExecutor::new().then_respond(ok()).then_respond(ok());
        let client = HttpClient::new(executor.clone(), "svc");
        let root = root();
        let ctx = RequestContext::background();

        let mut creation = VolumeCreation::new(&client, &root, "vol1");
        creation.run(&ctx).unwrap();
        creation.run(&ctx).unwrap();

        assert_eq!(executor.recorded_requests().len(), 2);
    }
}
