//! Uploaded-file descriptors and the parallel-array normalizer.
//!
//! The raw descriptor a server request is built from maps each field name
//! to either a flat `{name, type, tmp_name, error, size}` object or to five
//! *parallel* nested maps (one per property) sharing one key structure, to
//! arbitrary depth. Normalization produces a tree of the same shape whose
//! leaves combine the five parallel values found at each path.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::HttpError;

const FILE_PROPERTIES: [&str; 5] = ["name", "type", "tmp_name", "error", "size"];

/// Metadata for one uploaded file, as supplied by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedFile {
    client_filename: Option<String>,
    client_media_type: Option<String>,
    tmp_name: Option<String>,
    error: i64,
    size: Option<u64>,
}

impl UploadedFile {
    pub fn new(
        client_filename: Option<String>,
        client_media_type: Option<String>,
        tmp_name: Option<String>,
        error: i64,
        size: Option<u64>,
    ) -> Self {
        Self {
            client_filename,
            client_media_type,
            tmp_name,
            error,
            size,
        }
    }

    fn from_raw(property: &Map<String, Value>) -> Self {
        Self {
            client_filename: string_of(property.get("name")),
            client_media_type: string_of(property.get("type")),
            tmp_name: string_of(property.get("tmp_name")),
            error: property.get("error").and_then(Value::as_i64).unwrap_or(0),
            size: property.get("size").and_then(Value::as_u64),
        }
    }

    pub fn client_filename(&self) -> Option<&str> {
        self.client_filename.as_deref()
    }

    pub fn client_media_type(&self) -> Option<&str> {
        self.client_media_type.as_deref()
    }

    pub fn tmp_name(&self) -> Option<&str> {
        self.tmp_name.as_deref()
    }

    /// The upload error code; `None` when the upload succeeded (code 0).
    pub fn error(&self) -> Option<i64> {
        if self.error == 0 { None } else { Some(self.error) }
    }

    pub fn size(&self) -> Option<u64> {
        self.size
    }
}

fn string_of(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(str::to_string)
}

/// A normalized uploaded-file tree: nested field names with an
/// [`UploadedFile`] at every leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum FileTree {
    File(UploadedFile),
    Nested(IndexMap<String, FileTree>),
}

impl FileTree {
    pub fn as_file(&self) -> Option<&UploadedFile> {
        match self {
            FileTree::File(file) => Some(file),
            FileTree::Nested(_) => None,
        }
    }

    /// Child subtree under `key`; `None` on a leaf or a missing key.
    pub fn get(&self, key: &str) -> Option<&FileTree> {
        match self {
            FileTree::File(_) => None,
            FileTree::Nested(children) => children.get(key),
        }
    }

    /// Number of direct children; 0 on a leaf.
    pub fn len(&self) -> usize {
        match self {
            FileTree::File(_) => 0,
            FileTree::Nested(children) => children.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Normalize a raw `field name -> descriptor` mapping.
///
/// Errors name the property (`name`, `type`, `tmp_name`, `error`, `size`)
/// missing from a parallel map and the field it was found under.
pub fn normalize_tree(raw: &Value) -> Result<IndexMap<String, FileTree>, HttpError> {
    let fields = raw.as_object().ok_or(HttpError::InvalidUploadedFileRoot)?;
    let mut files = IndexMap::new();
    for (field_name, property) in fields {
        let property = property
            .as_object()
            .filter(|map| FILE_PROPERTIES.iter().all(|p| map.contains_key(*p)))
            .ok_or_else(|| HttpError::InvalidUploadedFileDescriptor(field_name.clone()))?;
        files.insert(field_name.clone(), normalize_field(property, field_name)?);
    }
    Ok(files)
}

fn normalize_field(
    property: &Map<String, Value>,
    field_name: &str,
) -> Result<FileTree, HttpError> {
    let Some(Value::Object(names)) = property.get("name") else {
        return Ok(FileTree::File(UploadedFile::from_raw(property)));
    };

    let mut children = IndexMap::new();
    for dirname in names.keys() {
        let mut subtree = Map::new();
        for prop in FILE_PROPERTIES {
            let branch = property
                .get(prop)
                .and_then(Value::as_object)
                .and_then(|map| map.get(dirname))
                .ok_or_else(|| HttpError::InvalidUploadedFile {
                    property: prop,
                    field: field_name.to_string(),
                })?;
            subtree.insert(prop.to_string(), branch.clone());
        }
        children.insert(dirname.clone(), normalize_field(&subtree, dirname)?);
    }
    Ok(FileTree::Nested(children))
}
