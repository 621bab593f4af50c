//! Block frame chrome.
//!
//! A tab with a single block shows it frameless: the header is hidden until
//! the hover machine reveals it. With two or more blocks every block gets the
//! technical frame, whose header is always visible and which highlights the
//! window's active block. Content is passed through unchanged either way.

use crate::types::Block;
use crate::view::{FrameFlags, FrameNode, Icon, ViewNode};

use super::hover::HoverMachine;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameVariant {
    /// Hover-reveal header, no border.
    Frameless,
    /// Persistent header and focus highlight.
    Tech,
}

/// Frame variant for a tab holding `block_count` blocks.
pub fn select_variant(block_count: usize) -> FrameVariant {
    if block_count <= 1 {
        FrameVariant::Frameless
    } else {
        FrameVariant::Tech
    }
}

/// `"<view> [<oid prefix>]"`, or `"no block data"`.
pub fn header_text(block: Option<&Block>) -> String {
    match block {
        Some(block) => {
            let short: String = block.oid.chars().take(8).collect();
            format!("{} [{short}]", block.view)
        }
        None => "no block data".to_string(),
    }
}

/// Chrome around one block's content.
pub struct BlockFrame {
    block_id: String,
    hover: HoverMachine,
    preview: bool,
    closable: bool,
}

impl BlockFrame {
    pub fn new(block_id: impl Into<String>, hover: HoverMachine, closable: bool) -> Self {
        Self {
            block_id: block_id.into(),
            hover,
            preview: false,
            closable,
        }
    }

    /// Ghost frame for drag previews: fixed header, placeholder content.
    pub fn ghost(block_id: impl Into<String>, closable: bool) -> Self {
        Self {
            block_id: block_id.into(),
            hover: HoverMachine::ghost(),
            preview: true,
            closable,
        }
    }

    pub fn hover(&self) -> &HoverMachine {
        &self.hover
    }

    pub fn is_preview(&self) -> bool {
        self.preview
    }

    pub fn set_closable(&mut self, closable: bool) {
        self.closable = closable;
    }

    pub fn render(
        &self,
        block: Option<&Block>,
        block_count: usize,
        focused: bool,
        icon: Option<Icon>,
        content: ViewNode,
    ) -> FrameNode {
        let variant = select_variant(block_count);
        let mut flags = FrameFlags::empty();
        flags.set(FrameFlags::PREVIEW, self.preview);
        flags.set(FrameFlags::CLOSABLE, self.closable);
        match variant {
            FrameVariant::Frameless => {
                flags.set(FrameFlags::HEADER_VISIBLE, self.hover.header_visible());
            }
            FrameVariant::Tech => {
                flags.insert(FrameFlags::HEADER_VISIBLE);
                flags.set(FrameFlags::FOCUSED, focused || self.preview);
            }
        }

        FrameNode {
            block_id: self.block_id.clone(),
            variant,
            header: header_text(block),
            flags,
            icon,
            content: if self.preview { ViewNode::Ghost } else { content },
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ViewTag;
    use std::time::{Duration, Instant};

    fn block() -> Block {
        Block::new("0123456789abcdef", ViewTag::Term)
    }

    fn frame() -> BlockFrame {
        BlockFrame::new("b1", HoverMachine::new(15, Duration::from_millis(100)), false)
    }

    #[test]
    fn test_select_variant() {
        assert_eq!(select_variant(0), FrameVariant::Frameless);
        assert_eq!(select_variant(1), FrameVariant::Frameless);
        assert_eq!(select_variant(2), FrameVariant::Tech);
        assert_eq!(select_variant(7), FrameVariant::Tech);
    }

    #[test]
    fn test_header_text() {
        assert_eq!(header_text(Some(&block())), "term [01234567]");
        assert_eq!(
            header_text(Some(&Block::new("abc", ViewTag::Preview))),
            "preview [abc]"
        );
        assert_eq!(header_text(None), "no block data");
    }

    #[test]
    fn test_frameless_header_follows_hover() {
        let frame = frame();
        let node = frame.render(Some(&block()), 1, true, None, ViewNode::Plot);
        assert_eq!(node.variant, FrameVariant::Frameless);
        assert!(!node.flags.contains(FrameFlags::HEADER_VISIBLE));
        assert!(!node.flags.contains(FrameFlags::FOCUSED));
        assert_eq!(node.content, ViewNode::Plot);

        let t0 = Instant::now();
        frame.hover().pointer_move(0, t0);
        frame.hover().tick(t0 + Duration::from_millis(100));
        let node = frame.render(Some(&block()), 1, true, None, ViewNode::Plot);
        assert!(node.flags.contains(FrameFlags::HEADER_VISIBLE));
    }

    #[test]
    fn test_tech_focus() {
        let frame = frame();
        let focused = frame.render(Some(&block()), 2, true, Some(Icon::Folder), ViewNode::Plot);
        assert_eq!(focused.variant, FrameVariant::Tech);
        assert!(focused.flags.contains(FrameFlags::HEADER_VISIBLE | FrameFlags::FOCUSED));
        assert_eq!(focused.icon, Some(Icon::Folder));

        let other = frame.render(Some(&block()), 2, false, None, ViewNode::Plot);
        assert!(!other.flags.contains(FrameFlags::FOCUSED));
    }

    #[test]
    fn test_ghost_frame() {
        let ghost = BlockFrame::ghost("b1", true);
        let frameless = ghost.render(Some(&block()), 1, false, None, ViewNode::Plot);
        assert_eq!(frameless.content, ViewNode::Ghost);
        assert!(frameless.flags.contains(
            FrameFlags::HEADER_VISIBLE | FrameFlags::PREVIEW | FrameFlags::CLOSABLE
        ));

        let tech = ghost.render(Some(&block()), 3, false, None, ViewNode::Plot);
        assert!(tech.flags.contains(FrameFlags::FOCUSED));
    }
}
