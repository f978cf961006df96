//! Volume operations over a [`Client`].

use ifsvol_http::{HttpRequest, RequestContext};

use crate::client::Client;
use crate::create::{self, VolumeCreation};
use crate::error::VolumeError;
use crate::path::NamespacePath;
use crate::response;
use crate::types::{Volume, VolumeAttributes, VolumeEntry, VolumeListing};

pub const COPY_SOURCE_HEADER: &str = "x-isi-ifs-copy-source";

const METADATA_QUERY: &str = "metadata";
const RECURSIVE_QUERY: &str = "recursive";

/// Volume management for one client.
///
/// The namespace root is resolved once from the client's volumes path and
/// never changes afterwards. `Volumes` holds no other state, so one value
/// can serve concurrent callers. Nothing here retries or logs failures;
/// every error goes back to the caller.
pub struct Volumes<C> {
    client: C,
    root: NamespacePath,
}

impl<C: Client> Volumes<C> {
    pub fn new(client: C) -> Self {
        let root = NamespacePath::resolve(client.volumes_path());
        Self { client, root }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn root(&self) -> &NamespacePath {
        &self.root
    }

    /// List the volumes under the namespace root.
    pub fn list(&self, ctx: &RequestContext) -> Result<Vec<VolumeEntry>, VolumeError> {
        tracing::debug!(root = %self.root, "listing volumes");

        let response = self.client.send(ctx, &HttpRequest::get(self.root.as_str()))?;
        let response = response::check(response, None)?;
        let listing: VolumeListing = response::decode(&response)?;
        Ok(listing.children)
    }

    /// Fetch the metadata of a volume.
    pub fn get(&self, ctx: &RequestContext, name: &str) -> Result<VolumeAttributes, VolumeError> {
        validate_name(name)?;
        tracing::debug!(volume = name, "fetching volume metadata");

        let request = HttpRequest::get(self.root.volume(name)).with_query(METADATA_QUERY, "");
        let response = self.client.send(ctx, &request)?;
        let response = response::check(response, Some(name))?;
        response::decode(&response)
    }

    /// Whether a volume exists. Any failure other than not-found is an error.
    pub fn exists(&self, ctx: &RequestContext, name: &str) -> Result<bool, VolumeError> {
        match self.get(ctx, name) {
            Ok(_) => Ok(true),
            Err(VolumeError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Recursively delete a volume and everything in it.
    ///
    /// Deleting a missing volume fails with [`VolumeError::NotFound`].
    pub fn delete(&self, ctx: &RequestContext, name: &str) -> Result<(), VolumeError> {
        validate_name(name)?;
        tracing::debug!(volume = name, "deleting volume");

        let request = HttpRequest::delete(self.root.volume(name)).with_query(RECURSIVE_QUERY, "true");
        let response = self.client.send(ctx, &request)?;
        response::check(response, Some(name))?;
        Ok(())
    }

    /// [`Volumes::delete`] that treats a missing volume as done. Returns
    /// whether a volume was actually removed.
    pub fn delete_if_exists(&self, ctx: &RequestContext, name: &str) -> Result<bool, VolumeError> {
        match self.delete(ctx, name) {
            Ok(()) => Ok(true),
            Err(VolumeError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Create `destination` as a server-side copy of `source`.
    ///
    /// A single request; the copy gets whatever ownership the array gives
    /// it. A missing source is reported by the array as an API error.
    pub fn copy(
        &self,
        ctx: &RequestContext,
        source: &str,
        destination: &str,
    ) -> Result<(), VolumeError> {
        validate_name(source)?;
        validate_name(destination)?;
        if source == destination {
            return Err(VolumeError::InvalidName {
                reason: format!("cannot copy volume {source} onto itself"),
            });
        }
        tracing::debug!(source, destination, "copying volume");

        let request = HttpRequest::put(self.root.volume(destination))
            .with_header(COPY_SOURCE_HEADER, self.root.copy_source(source));
        let response = self.client.send(ctx, &request)?;
        response::check(response, None)?;
        Ok(())
    }

    /// Create a volume owned by the client identity.
    ///
    /// See [`crate::create`] for the two phases and how a failure of the
    /// second one is reported.
    pub fn create(&self, ctx: &RequestContext, name: &str) -> Result<Volume, VolumeError> {
        self.creation(name)?.run(ctx)
    }

    /// Start a creation that the caller drives and inspects step by step.
    pub fn creation(&self, name: &str) -> Result<VolumeCreation<'_, C>, VolumeError> {
        validate_name(name)?;
        Ok(VolumeCreation::new(&self.client, &self.root, name))
    }

    /// Re-apply the client identity as owner of an existing volume, e.g.
    /// after a [`VolumeError::PartialCreation`].
    pub fn set_ownership(&self, ctx: &RequestContext, name: &str) -> Result<(), VolumeError> {
        validate_name(name)?;
        tracing::debug!(volume = name, user = self.client.user(), "setting volume ownership");

        create::set_ownership(&self.client, ctx, &self.root.volume(name))
    }
}

fn validate_name(name: &str) -> Result<(), VolumeError> {
    if name.is_empty() {
        return Err(VolumeError::InvalidName {
            reason: "volume name must not be empty".to_string(),
        });
    }
    Ok(())
}
