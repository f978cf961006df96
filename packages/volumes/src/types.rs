//! Response shapes and result values.

use serde::{Deserialize, Serialize};

/// One entry of a volume listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VolumeEntry {
    pub name: String,
}

/// Listing body: `{"children": [{"name": ..}, ..]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct VolumeListing {
    #[serde(default)]
    pub children: Vec<VolumeEntry>,
}

/// One metadata attribute of a volume.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Attribute {
    pub name: String,
    #[serde(default)]
    pub value: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

/// Metadata of a volume as reported by the array.
///
/// The set of attributes is server-defined; the accessors only interpret
/// the well-known `owner` and `group` entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VolumeAttributes {
    #[serde(default)]
    pub attrs: Vec<Attribute>,
}

impl VolumeAttributes {
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.attrs.iter().find(|a| a.name == name).map(|a| &a.value)
    }

    pub fn owner(&self) -> Option<&str> {
        self.get("owner").and_then(serde_json::Value::as_str)
    }

    pub fn group(&self) -> Option<&str> {
        self.get("group").and_then(serde_json::Value::as_str)
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.attrs.iter()
    }
}

/// A volume that was created with its ownership assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Volume {
    pub name: String,
    /// Namespace path of the volume, e.g. `namespace/ifs/volumes/vol1`.
    pub path: String,
}
