//! Block - a content view inside its frame.
//!
//! ```text
//! BlockView
//!   ├── BlockMeta        descriptor + path cell
//!   ├── ViewRegistry     view tag -> renderer (inside the error boundary)
//!   ├── BlockFrame       frameless or tech chrome, HoverMachine
//!   └── DeferredEffects  side effects returned by renderers
//! ```

mod block_view;
mod boundary;
mod effects;
mod frame;
mod hover;
mod meta;
mod registry;

pub use block_view::BlockView;
pub use boundary::{failure_view, isolate};
pub use effects::DeferredEffects;
pub use frame::{BlockFrame, FrameVariant, header_text, select_variant};
pub use hover::{HoverMachine, HoverState};
pub use meta::BlockMeta;
pub use registry::{
    CodeEditRenderer, PlotRenderer, PreviewRenderer, RenderContext, TerminalRenderer,
    ViewRegistry, ViewRenderer,
};
