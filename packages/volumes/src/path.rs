//! Namespace path resolution.

use std::fmt;

/// Prefix of every path served by the array's namespace API.
pub const NAMESPACE_PREFIX: &str = "namespace";

/// Default location of volumes on the array.
pub const DEFAULT_VOLUMES_PATH: &str = "/ifs/volumes";

/// The namespace path under which a client's volumes live, e.g.
/// `namespace/ifs/volumes`. No leading or trailing slash.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamespacePath(String);

impl NamespacePath {
    /// Resolve the namespace root for a configured volumes path.
    ///
    /// Leading, trailing and doubled slashes in `volumes_path` are ignored,
    /// so `/ifs/volumes`, `ifs/volumes/` and `//ifs//volumes` all resolve to
    /// `namespace/ifs/volumes`.
    pub fn resolve(volumes_path: &str) -> Self {
        let mut root = String::from(NAMESPACE_PREFIX);
        for segment in volumes_path.split('/').filter(|s| !s.is_empty()) {
            root.push('/');
            root.push_str(segment);
        }
        Self(root)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path of a volume under this root. `name` is used verbatim.
    pub fn volume(&self, name: &str) -> String {
        format!("{}/{}", self.0, name)
    }

    /// Absolute form used by the copy-source header: `/root/name`.
    pub fn copy_source(&self, name: &str) -> String {
        format!("/{}/{}", self.0, name)
    }
}

impl fmt::Display for NamespacePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
