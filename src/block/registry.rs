//! Content renderer dispatch by view tag.
//!
//! # Example
//!
//! ```ignore
//! let mut registry = ViewRegistry::with_defaults(files);
//! registry.register("sysinfo", Rc::new(SysInfoRenderer));
//! let content = registry.render(&block, &ctx)?;
//! ```

use std::collections::HashMap;
use std::rc::Rc;

use crate::cells::Loadable;
use crate::config::BlockConfig;
use crate::error::RenderError;
use crate::preview::PreviewView;
use crate::services::FileService;
use crate::types::{Block, ViewTag};
use crate::view::{Rendered, ViewNode};

use super::meta::BlockMeta;

/// What a renderer gets besides the block itself.
pub struct RenderContext<'a> {
    pub meta: &'a BlockMeta,
    pub config: &'a BlockConfig,
}

/// A leaf content renderer.
///
/// `Pending` means the renderer is waiting on an async cell; the block shows
/// its loading fallback and renders again once the cell settles.
pub trait ViewRenderer {
    fn render(&self, block: &Block, ctx: &RenderContext<'_>)
    -> Result<Loadable<Rendered>, RenderError>;
}

pub struct TerminalRenderer;

impl ViewRenderer for TerminalRenderer {
    fn render(
        &self,
        block: &Block,
        _ctx: &RenderContext<'_>,
    ) -> Result<Loadable<Rendered>, RenderError> {
        Ok(Loadable::Ready(
            ViewNode::Terminal {
                block_id: block.oid.clone(),
            }
            .into(),
        ))
    }
}

pub struct PlotRenderer;

impl ViewRenderer for PlotRenderer {
    fn render(
        &self,
        _block: &Block,
        _ctx: &RenderContext<'_>,
    ) -> Result<Loadable<Rendered>, RenderError> {
        Ok(Loadable::Ready(ViewNode::Plot.into()))
    }
}

/// Blank, editable code editor.
pub struct CodeEditRenderer;

impl ViewRenderer for CodeEditRenderer {
    fn render(
        &self,
        _block: &Block,
        _ctx: &RenderContext<'_>,
    ) -> Result<Loadable<Rendered>, RenderError> {
        Ok(Loadable::Ready(
            ViewNode::Code {
                text: String::new(),
                filename: None,
                readonly: false,
            }
            .into(),
        ))
    }
}

pub struct PreviewRenderer {
    files: Rc<dyn FileService>,
}

impl PreviewRenderer {
    pub fn new(files: Rc<dyn FileService>) -> Self {
        Self { files }
    }

}

impl ViewRenderer for PreviewRenderer {
    fn render(
        &self,
        _block: &Block,
        ctx: &RenderContext<'_>,
    ) -> Result<Loadable<Rendered>, RenderError> {
        let view = PreviewView::new(ctx.meta.clone(), self.files.clone(), ctx.config);
        Ok(view.render())
    }
}

// =============================================================================
// Registry
// =============================================================================

#[derive(Clone, Default)]
pub struct ViewRegistry {
    renderers: HashMap<String, Rc<dyn ViewRenderer>>,
}

impl ViewRegistry {
    /// An empty registry: every block renders empty content.
    pub fn new() -> Self {
        Self::default()
    }

    /// `term`, `preview`, `plot` and `codeedit`.
    pub fn with_defaults(files: Rc<dyn FileService>) -> Self {
        let mut registry = Self::new();
        registry.register(ViewTag::Term, Rc::new(TerminalRenderer));
        registry.register(ViewTag::Preview, Rc::new(PreviewRenderer::new(files)));
        registry.register(ViewTag::Plot, Rc::new(PlotRenderer));
        registry.register(ViewTag::CodeEdit, Rc::new(CodeEditRenderer));
        registry
    }

    pub fn register(&mut self, tag: impl Into<ViewTag>, renderer: Rc<dyn ViewRenderer>) {
        self.renderers
            .insert(tag.into().as_str().to_string(), renderer);
    }

    pub fn contains(&self, tag: &ViewTag) -> bool {
        self.renderers.contains_key(tag.as_str())
    }

    /// Render `block` with the renderer registered for its view tag.
    pub fn render(
        &self,
        block: &Block,
        ctx: &RenderContext<'_>,
    ) -> Result<Loadable<Rendered>, RenderError> {
        match self.renderers.get(block.view.as_str()) {
            Some(renderer) => renderer.render(block, ctx),
            None => {
                log::debug!("no renderer for view {:?}", block.view.as_str());
                Ok(Loadable::Ready(ViewNode::Empty.into()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cells::CellStore;
    use crate::services::{MemoryFileService, MemoryObjectService, ObjectStore};
    use futures::executor::LocalPool;

    fn render(registry: &ViewRegistry, block: Block) -> Loadable<Rendered> {
        let pool = LocalPool::new();
        let objects = ObjectStore::new(
            CellStore::new(pool.spawner()),
            Rc::new(MemoryObjectService::default()),
        );
        let meta = BlockMeta::new(objects, block.oid.clone());
        let config = BlockConfig::default();
        let ctx = RenderContext {
            meta: &meta,
            config: &config,
        };
        registry.render(&block, &ctx).unwrap()
    }

    fn view(rendered: Loadable<Rendered>) -> ViewNode {
        rendered.ready().unwrap().view
    }

    #[test]
    fn test_default_renderers() {
        let registry = ViewRegistry::with_defaults(Rc::new(MemoryFileService::default()));
        assert_eq!(
            view(render(&registry, Block::new("b1", "term"))),
            ViewNode::Terminal {
                block_id: "b1".into()
            }
        );
        assert_eq!(view(render(&registry, Block::new("b1", "plot"))), ViewNode::Plot);
        assert_eq!(
            view(render(&registry, Block::new("b1", "codeedit"))),
            ViewNode::Code {
                text: String::new(),
                filename: None,
                readonly: false
            }
        );
        assert!(render(&registry, Block::new("b1", "preview")).is_pending());
    }

    #[test]
    fn test_unknown_tag_renders_empty() {
        let registry = ViewRegistry::with_defaults(Rc::new(MemoryFileService::default()));
        assert!(!registry.contains(&ViewTag::from("web")));
        assert_eq!(view(render(&registry, Block::new("b1", "web"))), ViewNode::Empty);
        assert_eq!(view(render(&ViewRegistry::new(), Block::new("b1", "term"))), ViewNode::Empty);
    }

    #[test]
    fn test_custom_renderer() {
        struct Fixed;
        impl ViewRenderer for Fixed {
            fn render(
                &self,
                _block: &Block,
                _ctx: &RenderContext<'_>,
            ) -> Result<Loadable<Rendered>, RenderError> {
                Ok(Loadable::Ready(ViewNode::Centered("fixed".into()).into()))
            }
        }

        let mut registry = ViewRegistry::new();
        registry.register("web", Rc::new(Fixed));
        assert_eq!(
            view(render(&registry, Block::new("b1", "web"))),
            ViewNode::Centered("fixed".into())
        );
    }
}
