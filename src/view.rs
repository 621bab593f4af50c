//! View tree - what a block renders to.
//!
//! Views are plain data. Leaf renderers (terminal, markdown, code editor,
//! media) consume the matching node; this crate only decides which node to
//! produce and with what inputs.

use crate::block::FrameVariant;
use crate::types::FileInfo;

// =============================================================================
// Icons
// =============================================================================

/// Block icon shown in the frame chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icon {
    Home,
    Folder,
    FilePdf,
    Image,
    Film,
    Headphones,
    FileLines,
    FileCode,
    File,
}

impl Icon {
    /// Glyph name in the icon font.
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Folder => "folder",
            Self::FilePdf => "file-pdf",
            Self::Image => "image",
            Self::Film => "film",
            Self::Headphones => "headphones",
            Self::FileLines => "file-lines",
            Self::FileCode => "file-code",
            Self::File => "file",
        }
    }
}

// =============================================================================
// Frame chrome
// =============================================================================

bitflags::bitflags! {
    /// Chrome state of a rendered frame.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FrameFlags: u8 {
        const FOCUSED = 1 << 0;
        const PREVIEW = 1 << 1;
        const HEADER_VISIBLE = 1 << 2;
        const CLOSABLE = 1 << 3;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameNode {
    pub block_id: String,
    pub variant: FrameVariant,
    pub header: String,
    pub flags: FrameFlags,
    pub icon: Option<Icon>,
    pub content: ViewNode,
}

// =============================================================================
// Content
// =============================================================================

/// Media element used for a streamed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Pdf,
    Video,
    Audio,
    Image,
}

/// One segment of the directory navigation bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    pub label: String,
    /// Path written when the crumb is clicked.
    pub path: String,
    pub clickable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewNode {
    /// Nothing to show.
    Empty,
    /// Suspense fallback.
    Loading,
    /// Centered message (not found, too large, ...).
    Centered(String),
    /// A renderer failed; siblings are unaffected.
    Failure(String),
    /// Placeholder used instead of content in preview (ghost) frames.
    Ghost,
    Terminal { block_id: String },
    Plot,
    /// Media element pointed straight at the streaming URL.
    Stream { media: MediaKind, url: String },
    Markdown { text: String },
    Code {
        text: String,
        filename: Option<String>,
        readonly: bool,
    },
    Directory { path: String, entries: Vec<FileInfo> },
    /// `Preview (<mimetype>)`.
    Unsupported { mime_type: String },
    /// Full preview: navigation bar above the dispatched view.
    Preview {
        nav: Vec<Breadcrumb>,
        body: Box<ViewNode>,
    },
    Frame(Box<FrameNode>),
}

impl ViewNode {
    /// Message of a centered placeholder.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Centered(text) | Self::Failure(text) => Some(text),
            Self::Loading => Some("Loading..."),
            _ => None,
        }
    }

    pub fn as_frame(&self) -> Option<&FrameNode> {
        match self {
            Self::Frame(frame) => Some(frame),
            _ => None,
        }
    }

    /// Body of a preview node.
    pub fn preview_body(&self) -> Option<&ViewNode> {
        match self {
            Self::Preview { body, .. } => Some(body),
            _ => None,
        }
    }
}

// =============================================================================
// Render output
// =============================================================================

/// Deferred write requested by a renderer and applied by the frame host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    SetIconOverride { block_id: String, icon: Icon },
}

impl SideEffect {
    /// Effects with the same target replace each other when queued.
    pub fn same_target(&self, other: &SideEffect) -> bool {
        match (self, other) {
            (
                Self::SetIconOverride { block_id: a, .. },
                Self::SetIconOverride { block_id: b, .. },
            ) => a == b,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub view: ViewNode,
    pub effects: Vec<SideEffect>,
}

impl Rendered {
    pub fn new(view: ViewNode) -> Self {
        Self {
            view,
            effects: Vec::new(),
        }
    }

    pub fn with_effect(mut self, effect: SideEffect) -> Self {
        self.effects.push(effect);
        self
    }
}

impl From<ViewNode> for Rendered {
    fn from(view: ViewNode) -> Self {
        Self::new(view)
    }
}
