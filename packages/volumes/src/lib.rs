//! # ifsvol
//!
//! Provision and decommission volumes on a storage array through its
//! path-based namespace API.
//!
//! | Module | Purpose |
//! |---|---|
//! | [`path`] | Resolves the namespace root that volumes live under. |
//! | [`client`] | [`Client`] capability: identity plus transport. |
//! | [`volumes`] | [`Volumes`]: list, get, exists, delete, copy, create. |
//! | [`create`] | Two-phase create state machine. |
//! | [`acl`] | Ownership request body. |
//! | [`config`] | [`ClientConfig`] from environment or JSON. |
//! | [`error`] | [`VolumeError`]. |
//!
//! ```ignore
//! use ifsvol::{ClientConfig, RequestContext, VolumeError, Volumes};
//!
//! let volumes = Volumes::new(ClientConfig::from_env()?.connect()?);
//! let ctx = RequestContext::with_timeout(std::time::Duration::from_secs(30));
//!
//! match volumes.create(&ctx, "pv-0001") {
//!     Ok(volume) => println!("ready at {}", volume.path),
//!     Err(e @ VolumeError::PartialCreation { .. }) => {
//!         // The container exists with its initial ACL; fix or remove it.
//!         volumes.delete(&ctx, "pv-0001")?;
//!         return Err(e.into());
//!     }
//!     Err(e) => return Err(e.into()),
//! }
//! ```

pub mod acl;
pub mod client;
pub mod config;
pub mod create;
pub mod error;
pub mod path;
pub mod types;
pub mod volumes;

mod response;

pub use acl::{AclRequest, Ownership, OwnershipKind};
pub use client::{Client, HttpClient};
pub use config::{ClientConfig, ConfigError};
pub use create::{CreationState, VolumeCreation};
pub use error::VolumeError;
pub use path::NamespacePath;
pub use types::{Attribute, Volume, VolumeAttributes, VolumeEntry};
pub use volumes::Volumes;

pub use ifsvol_http::{CancellationHandle, RequestContext};
