//! Core types for spark-block.
//!
//! These mirror the backend's object and file contracts, field names
//! included, so they can be decoded straight off the wire.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::error::ORefError;

/// Per-block key/value overrides. `"file"` holds the previewed path.
pub type MetaMap = BTreeMap<String, String>;

/// Metadata key holding the current preview path.
pub const META_FILE: &str = "file";

// =============================================================================
// Object references
// =============================================================================

/// Reference to an object in the workspace store, written `"<otype>:<oid>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ORef {
    pub otype: String,
    pub oid: String,
}

impl ORef {
    pub fn new(otype: impl Into<String>, oid: impl Into<String>) -> Self {
        Self {
            otype: otype.into(),
            oid: oid.into(),
        }
    }

    pub fn block(oid: impl Into<String>) -> Self {
        Self::new(Block::OTYPE, oid)
    }
}

impl fmt::Display for ORef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.otype, self.oid)
    }
}

impl FromStr for ORef {
    type Err = ORefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (otype, oid) = s
            .split_once(':')
            .ok_or_else(|| ORefError::MissingSeparator(s.to_string()))?;
        if otype.is_empty() || oid.is_empty() {
            return Err(ORefError::Empty(s.to_string()));
        }
        Ok(Self::new(otype, oid))
    }
}

/// An object that lives in the workspace store.
pub trait WaveObj: Clone + PartialEq + 'static {
    const OTYPE: &'static str;

    fn oid(&self) -> &str;

    fn oref(&self) -> ORef {
        ORef::new(Self::OTYPE, self.oid())
    }
}

// =============================================================================
// View tags
// =============================================================================

/// Which content view a block renders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ViewTag {
    Term,
    Preview,
    Plot,
    CodeEdit,
    Other(String),
}

impl ViewTag {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Term => "term",
            Self::Preview => "preview",
            Self::Plot => "plot",
            Self::CodeEdit => "codeedit",
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for ViewTag {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "term" => Self::Term,
            "preview" => Self::Preview,
            "plot" => Self::Plot,
            "codeedit" => Self::CodeEdit,
            _ => Self::Other(tag),
        }
    }
}

impl From<&str> for ViewTag {
    fn from(tag: &str) -> Self {
        Self::from(tag.to_string())
    }
}

impl From<ViewTag> for String {
    fn from(tag: ViewTag) -> Self {
        match tag {
            ViewTag::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ViewTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Workspace objects
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub oid: String,
    pub view: ViewTag,
    #[serde(default)]
    pub meta: MetaMap,
}

impl Block {
    pub fn new(oid: impl Into<String>, view: impl Into<ViewTag>) -> Self {
        Self {
            oid: oid.into(),
            view: view.into(),
            meta: MetaMap::new(),
        }
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    /// The previewed path, if any.
    pub fn file(&self) -> Option<&str> {
        self.meta.get(META_FILE).map(String::as_str)
    }
}

impl WaveObj for Block {
    const OTYPE: &'static str = "block";

    fn oid(&self) -> &str {
        &self.oid
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tab {
    pub oid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub blockids: Vec<String>,
}

impl WaveObj for Tab {
    const OTYPE: &'static str = "tab";

    fn oid(&self) -> &str {
        &self.oid
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Window {
    pub oid: String,
    #[serde(default)]
    pub activetabid: Option<String>,
    #[serde(default)]
    pub activeblockid: Option<String>,
}

impl WaveObj for Window {
    const OTYPE: &'static str = "window";

    fn oid(&self) -> &str {
        &self.oid
    }
}

// =============================================================================
// File contracts
// =============================================================================

/// Result of a stat call.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FileInfo {
    pub path: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub modtime: i64,
    #[serde(default, rename = "isdir")]
    pub is_dir: bool,
    #[serde(default, rename = "mimetype")]
    pub mime_type: String,
}

impl FileInfo {
    pub fn new(path: impl Into<String>, mime_type: impl Into<String>, size: u64) -> Self {
        let path = path.into();
        let mime_type = mime_type.into();
        let name = path.rsplit('/').next().unwrap_or_default().to_string();
        Self {
            is_dir: mime_type == "directory",
            path,
            name,
            size,
            modtime: 0,
            mime_type,
        }
    }
}

/// Result of a read call. The payload is base64-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FullFile {
    #[serde(default)]
    pub info: Option<FileInfo>,
    #[serde(default)]
    pub data64: String,
}

impl FullFile {
    pub fn from_bytes(info: Option<FileInfo>, bytes: &[u8]) -> Self {
        Self {
            info,
            data64: STANDARD.encode(bytes),
        }
    }

    /// Decode the payload as text.
    ///
    /// A malformed payload decodes to the empty string. Invalid UTF-8 is
    /// replaced rather than rejected.
    pub fn decode_text(&self) -> String {
        match STANDARD.decode(self.data64.as_bytes()) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(err) => {
                log::warn!("discarding undecodable file payload: {err}");
                String::new()
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oref_parse_and_display() {
        let oref: ORef = "block:1234abcd-5678".parse().unwrap();
        assert_eq!(oref.otype, "block");
        assert_eq!(oref.oid, "1234abcd-5678");
        assert_eq!(oref.to_string(), "block:1234abcd-5678");
        assert_eq!(ORef::block("x").to_string(), "block:x");
    }

    #[test]
    fn test_oref_parse_errors() {
        assert!(matches!(
            "block".parse::<ORef>(),
            Err(ORefError::MissingSeparator(_))
        ));
        assert!(matches!(":abc".parse::<ORef>(), Err(ORefError::Empty(_))));
    }

    #[test]
    fn test_block_deserializes_backend_shape() {
        let json = r#"{"oid":"b1","view":"preview","meta":{"file":"/tmp/a.md"}}"#;
        let block: Block = serde_json::from_str(json).unwrap();
        assert_eq!(block.view, ViewTag::Preview);
        assert_eq!(block.file(), Some("/tmp/a.md"));

        let json = r#"{"oid":"b2","view":"sysinfo"}"#;
        let block: Block = serde_json::from_str(json).unwrap();
        assert_eq!(block.view, ViewTag::Other("sysinfo".into()));
        assert_eq!(block.file(), None);
    }

    #[test]
    fn test_view_tag_roundtrips_as_plain_string() {
        let json = serde_json::to_string(&ViewTag::CodeEdit).unwrap();
        assert_eq!(json, "\"codeedit\"");
    }

    #[test]
    fn test_file_info_field_names() {
        let json = r#"{"path":"/a/b","name":"b","size":12,"isdir":true,"mimetype":"directory"}"#;
        let info: FileInfo = serde_json::from_str(json).unwrap();
        assert!(info.is_dir);
        assert_eq!(info.mime_type, "directory");
        assert_eq!(info.size, 12);
    }

    #[test]
    fn test_full_file_decode() {
        let file = FullFile::from_bytes(None, "héllo".as_bytes());
        assert_eq!(file.decode_text(), "héllo");

        let broken = FullFile {
            info: None,
            data64: "%%%".into(),
        };
        assert_eq!(broken.decode_text(), "");
    }
}
