//! Preview - file preview for `preview` blocks.
//!
//! [`PreviewView`] reads the block's [`PreviewCells`], picks a view with
//! [`dispatch`], and returns it together with the icon side effect. It reads
//! only the cells the chosen view needs:
//!
//! - streaming media reads `stat` and builds a [`stream_url`]
//! - oversize and missing files never touch `full_file`
//! - markdown, code and directory views read `decoded_text`
//!
//! # Example
//!
//! ```ignore
//! let view = PreviewView::new(meta, files, &config);
//! match view.render() {
//!     Loadable::Pending => show_loading(),
//!     Loadable::Ready(rendered) => host.apply(rendered),
//! }
//! ```

mod kind;
mod nav;
mod pipeline;

pub use kind::{PreviewKind, dispatch, icon_for_file, is_code_mime, media_kind};
pub use nav::breadcrumbs;
pub use pipeline::PreviewCells;

use std::rc::Rc;

use crate::block::BlockMeta;
use crate::cells::Loadable;
use crate::config::BlockConfig;
use crate::services::{FileService, stream_url};
use crate::types::FileInfo;
use crate::view::{Rendered, SideEffect, ViewNode};

pub const NOT_FOUND_TEXT: &str = "File Not Found";
pub const TOO_LARGE_TEXT: &str = "File Too Large to Preview";
pub const NOT_SUPPORTED_TEXT: &str = "Preview Not Supported";
pub const BAD_LISTING_TEXT: &str = "Unable to read directory listing";

/// Preview of one block's current path.
#[derive(Clone)]
pub struct PreviewView {
    meta: BlockMeta,
    cells: PreviewCells,
    backend_url: String,
    max_size: u64,
}

impl PreviewView {
    pub fn new(meta: BlockMeta, files: Rc<dyn FileService>, config: &BlockConfig) -> Self {
        let cells = PreviewCells::new(&meta, files);
        Self {
            meta,
            cells,
            backend_url: config.backend_url.clone(),
            max_size: config.max_preview_size,
        }
    }

    pub fn cells(&self) -> &PreviewCells {
        &self.cells
    }

    /// Write a new path. The view follows once the store pushes it back.
    pub fn navigate(&self, path: impl Into<String>) {
        self.meta
            .cells()
            .write(&self.cells.path, Some(path.into()));
    }

    /// Render the preview, or `Pending` while the file type is unknown.
    pub fn render(&self) -> Loadable<Rendered> {
        let store = self.meta.cells();
        let path = store.get(&self.cells.path.cell());

        let (mime_type, info) = match (
            store.get(&self.cells.mime_type),
            store.get(&self.cells.stat),
        ) {
            (Loadable::Ready(mime_type), Loadable::Ready(info)) => {
                (mime_type.unwrap_or_default(), info)
            }
            _ => return Loadable::Pending,
        };

        let kind = dispatch(&mime_type, info.as_ref(), self.max_size);
        log::debug!(
            "preview {}: {kind:?} for {path:?} ({mime_type})",
            self.meta.block_id()
        );

        let body = match kind {
            PreviewKind::Streaming => self.streaming_view(&mime_type, info.as_ref()),
            PreviewKind::NotFound => ViewNode::Centered(not_found_text(path.as_deref())),
            PreviewKind::TooLarge => ViewNode::Centered(TOO_LARGE_TEXT.to_string()),
            PreviewKind::Markdown => self.with_text(|text| ViewNode::Markdown { text }),
            PreviewKind::Code => self.with_text(|text| ViewNode::Code {
                text,
                filename: path.clone(),
                readonly: true,
            }),
            PreviewKind::Directory => self.with_text(|text| match parse_listing(&text) {
                Some(entries) => ViewNode::Directory {
                    path: path.clone().unwrap_or_default(),
                    entries,
                },
                None => ViewNode::Centered(BAD_LISTING_TEXT.to_string()),
            }),
            PreviewKind::Unsupported => ViewNode::Unsupported {
                mime_type: mime_type.clone(),
            },
        };

        let view = ViewNode::Preview {
            nav: breadcrumbs(path.as_deref().unwrap_or_default()),
            body: Box::new(body),
        };
        let icon = icon_for_file(&mime_type, path.as_deref());
        Loadable::Ready(Rendered::new(view).with_effect(SideEffect::SetIconOverride {
            block_id: self.meta.block_id().to_string(),
            icon,
        }))
    }

    fn streaming_view(&self, mime_type: &str, info: Option<&FileInfo>) -> ViewNode {
        match (media_kind(mime_type), info) {
            (Some(media), Some(info)) => ViewNode::Stream {
                media,
                url: stream_url(&self.backend_url, &info.path),
            },
            _ => ViewNode::Centered(NOT_SUPPORTED_TEXT.to_string()),
        }
    }

    /// Build a content view from the decoded text, or `Loading` while the
    /// read is in flight.
    fn with_text(&self, view: impl FnOnce(String) -> ViewNode) -> ViewNode {
        match self.meta.cells().get(&self.cells.decoded_text) {
            Loadable::Ready(text) => view(text),
            Loadable::Pending => ViewNode::Loading,
        }
    }
}

/// `File Not Found"<name>"`, or just `File Not Found` for a blank name.
pub fn not_found_text(name: Option<&str>) -> String {
    match name {
        Some(name) if !name.trim().is_empty() => {
            let quoted = serde_json::Value::String(name.to_string());
            format!("{NOT_FOUND_TEXT}{quoted}")
        }
        _ => NOT_FOUND_TEXT.to_string(),
    }
}

/// Decode a directory listing payload (JSON array of file infos).
pub fn parse_listing(text: &str) -> Option<Vec<FileInfo>> {
    match serde_json::from_str(text) {
        Ok(entries) => Some(entries),
        Err(err) => {
            log::warn!("malformed directory listing: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_text() {
        assert_eq!(not_found_text(None), "File Not Found");
        assert_eq!(not_found_text(Some("   ")), "File Not Found");
        assert_eq!(
            not_found_text(Some("/tmp/a \"b\".txt")),
            r#"File Not Found"/tmp/a \"b\".txt""#
        );
    }

    #[test]
    fn test_parse_listing() {
        let json = r#"[{"path":"/a/x","name":"x","size":3,"modtime":0,"isdir":false,"mimetype":"text/plain"}]"#;
        let entries = parse_listing(json).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].mime_type, "text/plain");
        assert!(!entries[0].is_dir);

        assert_eq!(parse_listing("not json"), None);
        assert_eq!(parse_listing(""), None);
    }
}
