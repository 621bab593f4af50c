//! # spark-block
//!
//! Reactive block frame and file preview pipeline for terminal workspaces.
//!
//! A workspace tab holds blocks. Each block is a frame (header, close
//! control, hover reveal) around a content view chosen by the block's view
//! tag. The `preview` view resolves a filesystem path through a chain of
//! lazily derived cells and picks a renderer from the file's MIME type.
//!
//! ## Architecture
//!
//! ```text
//! ObjectStore ─▶ BlockMeta ─▶ PreviewCells ─▶ dispatch ─▶ ViewNode
//!      │              (path → stat/full_file → mime/text)       │
//!      └──── Tab / Window ─▶ BlockFrame (HoverMachine) ◀────────┘
//! ```
//!
//! Derived state lives in a [`cells::CellStore`]: values are recomputed on
//! read, only when a dependency changed. Async cells (`stat`, `full_file`)
//! report [`cells::Loadable::Pending`] until their call settles, and a
//! settlement for an outdated path is discarded.
//!
//! ## Modules
//!
//! - [`types`] - Workspace objects and file contracts
//! - [`cells`] - Versioned reactive cell store
//! - [`services`] - Backend contracts and the object store
//! - [`block`] - Metadata accessor, frame, hover machine, renderer registry
//! - [`preview`] - File resolution pipeline and view dispatch
//! - [`view`] - Render output tree
//! - [`input`] - crossterm pointer events
//! - [`config`] - Tunables and JSON loading

pub mod block;
pub mod cells;
pub mod config;
pub mod error;
pub mod input;
pub mod preview;
pub mod services;
pub mod types;
pub mod view;

// Re-export commonly used items
pub use types::*;

pub use block::{
    BlockFrame, BlockMeta, BlockView, FrameVariant, HoverMachine, HoverState, RenderContext,
    ViewRegistry, ViewRenderer, header_text, select_variant,
};

pub use cells::{Cell, CellStore, Loadable, WritableCell};

pub use config::{BlockConfig, load_config};

pub use error::{ConfigError, FileServiceError, ORefError, ObjectServiceError, RenderError};

pub use input::{FrameBounds, PointerEvent, PointerKind, convert_event, convert_mouse_event};

pub use preview::{PreviewCells, PreviewKind, PreviewView, breadcrumbs, dispatch, icon_for_file};

pub use services::{FileService, ObjectService, ObjectStore, stream_url};

pub use view::{
    Breadcrumb, FrameFlags, FrameNode, Icon, MediaKind, Rendered, SideEffect, ViewNode,
};
