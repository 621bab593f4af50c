//! BlockView - one block, framed.
//!
//! Reads the block descriptor, renders its content through the
//! [`ViewRegistry`] inside an error boundary, and wraps the result in the
//! frame chosen from the owning tab's block count. Side effects returned by
//! the content renderer are queued and applied on a later [`BlockView::tick`].
//!
//! # Example
//!
//! ```ignore
//! let view = BlockView::new(objects, "b1", "t1", "w1", registry, config)
//!     .on_close(|| close_block("b1"));
//!
//! objects.cells().subscribe(move || request_render());
//! if let Some(node) = view.render(Instant::now()) {
//!     paint(&node);
//! }
//! ```

use std::cell::Cell as StdCell;
use std::time::Instant;

use crate::cells::{Cell, Loadable};
use crate::config::BlockConfig;
use crate::input::{FrameBounds, PointerEvent};
use crate::services::ObjectStore;
use crate::types::{Block, Tab, Window};
use crate::view::ViewNode;

use super::boundary::{failure_view, isolate};
use super::effects::DeferredEffects;
use super::frame::{BlockFrame, FrameVariant};
use super::hover::HoverMachine;
use super::meta::BlockMeta;
use super::registry::{RenderContext, ViewRegistry};

pub struct BlockView {
    meta: BlockMeta,
    tab_id: String,
    window_id: String,
    registry: ViewRegistry,
    config: BlockConfig,
    frame: BlockFrame,
    effects: DeferredEffects,
    on_close: Option<Box<dyn Fn()>>,
    variant: StdCell<Option<FrameVariant>>,
}

impl BlockView {
    pub fn new(
        objects: ObjectStore,
        block_id: impl Into<String>,
        tab_id: impl Into<String>,
        window_id: impl Into<String>,
        registry: ViewRegistry,
        config: BlockConfig,
    ) -> Self {
        let meta = BlockMeta::new(objects, block_id);
        let frame = BlockFrame::new(
            meta.block_id(),
            HoverMachine::from_config(&config),
            false,
        );
        Self {
            effects: DeferredEffects::new(config.icon_override_delay()),
            meta,
            tab_id: tab_id.into(),
            window_id: window_id.into(),
            registry,
            config,
            frame,
            on_close: None,
            variant: StdCell::new(None),
        }
    }

    /// Render as a ghost (drag preview): fixed header, no content, no hover.
    pub fn ghost(mut self) -> Self {
        let closable = self.on_close.is_some();
        self.frame = BlockFrame::ghost(self.meta.block_id(), closable);
        self
    }

    /// Show a close control that runs `callback`.
    pub fn on_close(mut self, callback: impl Fn() + 'static) -> Self {
        self.on_close = Some(Box::new(callback));
        self.frame.set_closable(true);
        self
    }

    /// Activate the close control. Returns false when there is none.
    pub fn close(&self) -> bool {
        match &self.on_close {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }

    pub fn meta(&self) -> &BlockMeta {
        &self.meta
    }

    pub fn frame(&self) -> &BlockFrame {
        &self.frame
    }

    /// Whether this block is the window's active block.
    pub fn is_focused(&self) -> Cell<bool> {
        let window = self.meta.objects().value_atom::<Window>(&self.window_id);
        let block_id = self.meta.block_id().to_string();
        self.meta.cells().keyed(&self.meta.key("isFocused"), move |cells| {
            cells.derive(move |g| {
                g.get(&window)
                    .and_then(|window| window.activeblockid)
                    .is_some_and(|active| active == block_id)
            })
        })
    }

    /// Number of blocks in the owning tab.
    pub fn block_count(&self) -> usize {
        self.meta
            .objects()
            .get::<Tab>(&self.tab_id)
            .0
            .map_or(0, |tab| tab.blockids.len())
    }

    /// Render the framed block.
    ///
    /// `None` when the store has no descriptor for the block. While the
    /// descriptor is loading the frame shows the loading placeholder.
    pub fn render(&self, now: Instant) -> Option<ViewNode> {
        let (block, loading) = self.meta.objects().get::<Block>(self.meta.block_id());
        let content = match (&block, loading) {
            (_, true) => ViewNode::Loading,
            (Some(_), false) if self.frame.is_preview() => ViewNode::Ghost,
            (Some(block), false) => self.render_content(block, now),
            (None, false) => {
                log::debug!("block {} has no data", self.meta.block_id());
                self.variant.set(None);
                return None;
            }
        };

        let cells = self.meta.cells();
        let icon = cells.get(&self.meta.icon_override());
        let focused = cells.get(&self.is_focused());
        let node = self
            .frame
            .render(block.as_ref(), self.block_count(), focused, icon, content);
        self.variant.set(Some(node.variant));
        Some(ViewNode::Frame(Box::new(node)))
    }

    fn render_content(&self, block: &Block, now: Instant) -> ViewNode {
        let ctx = RenderContext {
            meta: &self.meta,
            config: &self.config,
        };
        match isolate(|| self.registry.render(block, &ctx)) {
            Ok(Loadable::Ready(rendered)) => {
                for effect in rendered.effects {
                    self.effects.schedule(effect, now);
                }
                rendered.view
            }
            Ok(Loadable::Pending) => ViewNode::Loading,
            Err(err) => failure_view(&err),
        }
    }

    /// Advance timers. Returns true when the block should render again.
    pub fn tick(&self, now: Instant) -> bool {
        let shown = self.frame.hover().header_visible();
        self.frame.hover().tick(now);
        let applied = self.effects.flush(now, self.meta.objects());
        applied > 0 || shown != self.frame.hover().header_visible()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.frame.hover().next_deadline(), self.effects.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Feed a pointer event to the hover machine.
    ///
    /// Only frameless frames react. Returns true when header visibility
    /// changed.
    pub fn handle_pointer(&self, event: &PointerEvent, bounds: FrameBounds, now: Instant) -> bool {
        if self.variant.get() != Some(FrameVariant::Frameless) {
            return false;
        }
        let hover = self.frame.hover();
        let shown = hover.header_visible();
        hover.handle_pointer(event, bounds, now);
        shown != hover.header_visible()
    }

    /// Navigate the previewed path (directory entries, breadcrumbs).
    pub fn navigate(&self, path: impl Into<String>) {
        self.meta.set_path(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cells::CellStore;
    use crate::services::{MemoryFileService, MemoryObjectService};
    use crate::view::FrameFlags;
    use futures::executor::LocalPool;
    use std::rc::Rc;

    fn setup() -> (LocalPool, ObjectStore, BlockView) {
        let pool = LocalPool::new();
        let objects = ObjectStore::new(
            CellStore::new(pool.spawner()),
            Rc::new(MemoryObjectService::default()),
        );
        let registry = ViewRegistry::with_defaults(Rc::new(MemoryFileService::default()));
        let view = BlockView::new(
            objects.clone(),
            "b1",
            "t1",
            "w1",
            registry,
            BlockConfig::default(),
        );
        (pool, objects, view)
    }

    fn tab(blocks: &[&str]) -> Tab {
        Tab {
            oid: "t1".into(),
            name: "main".into(),
            blockids: blocks.iter().map(|b| b.to_string()).collect(),
        }
    }

    #[test]
    fn test_missing_block_renders_nothing() {
        let (_pool, objects, view) = setup();
        objects.remove::<Block>("b1");
        assert_eq!(view.render(Instant::now()), None);
    }

    #[test]
    fn test_loading_block_shows_placeholder() {
        let (_pool, _objects, view) = setup();
        let node = view.render(Instant::now()).unwrap();
        let frame = node.as_frame().unwrap();
        assert_eq!(frame.content, ViewNode::Loading);
        assert_eq!(frame.header, "no block data");
    }

    #[test]
    fn test_reload_shows_placeholder() {
        let (_pool, objects, view) = setup();
        objects.put(Block::new("b1", "term"));
        let node = view.render(Instant::now()).unwrap();
        assert_eq!(node.as_frame().unwrap().header, "term [b1]");

        objects.set_loading::<Block>("b1");
        let node = view.render(Instant::now()).unwrap();
        let frame = node.as_frame().unwrap();
        assert_eq!(frame.content, ViewNode::Loading);
        assert_eq!(frame.header, "no block data");
    }

    #[test]
    fn test_focus_follows_window() {
        let (_pool, objects, view) = setup();
        objects.put(Block::new("b1", "term"));
        objects.put(tab(&["b1", "b2"]));
        objects.put(Window {
            oid: "w1".into(),
            activetabid: Some("t1".into()),
            activeblockid: Some("b2".into()),
        });

        let node = view.render(Instant::now()).unwrap();
        assert!(!node.as_frame().unwrap().flags.contains(FrameFlags::FOCUSED));

        objects.put(Window {
            oid: "w1".into(),
            activetabid: Some("t1".into()),
            activeblockid: Some("b1".into()),
        });
        let node = view.render(Instant::now()).unwrap();
        assert!(node.as_frame().unwrap().flags.contains(FrameFlags::FOCUSED));
    }

    #[test]
    fn test_close_control() {
        let (_pool, objects, view) = setup();
        assert!(!view.close());

        let closed = Rc::new(StdCell::new(false));
        let flag = closed.clone();
        let view = view.on_close(move || flag.set(true));
        objects.put(Block::new("b1", "plot"));
        let node = view.render(Instant::now()).unwrap();
        assert!(node.as_frame().unwrap().flags.contains(FrameFlags::CLOSABLE));
        assert!(view.close());
        assert!(closed.get());
    }

    #[test]
    fn test_pointer_ignored_by_tech_frame() {
        let (_pool, objects, view) = setup();
        objects.put(Block::new("b1", "term"));
        objects.put(tab(&["b1", "b2"]));
        view.render(Instant::now());

        let bounds = FrameBounds::new(0, 0, 80, 24);
        assert!(!view.handle_pointer(&PointerEvent::moved(1, 0), bounds, Instant::now()));
        assert_eq!(view.next_deadline(), None);
    }

    #[test]
    fn test_ghost_block() {
        let (_pool, objects, view) = setup();
        let view = view.ghost();
        objects.put(Block::new("b1", "term"));
        let frame = view.render(Instant::now()).unwrap();
        let frame = frame.as_frame().unwrap();
        assert_eq!(frame.content, ViewNode::Ghost);
        assert!(frame.flags.contains(FrameFlags::PREVIEW | FrameFlags::HEADER_VISIBLE));

        let bounds = FrameBounds::new(0, 0, 80, 24);
        assert!(!view.handle_pointer(&PointerEvent::leave(), bounds, Instant::now()));
        assert!(view.frame().hover().header_visible());
    }
}
