//! Error boundary around a block's content renderer.
//!
//! A failing or panicking renderer turns into a failure placeholder for that
//! block only; the frame and sibling blocks keep rendering.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::error::RenderError;
use crate::view::ViewNode;

/// Run `render`, turning a panic into [`RenderError::Panicked`].
pub fn isolate<T>(render: impl FnOnce() -> Result<T, RenderError>) -> Result<T, RenderError> {
    match catch_unwind(AssertUnwindSafe(render)) {
        Ok(result) => result,
        Err(payload) => Err(RenderError::Panicked(panic_message(payload.as_ref()))),
    }
}

/// Placeholder shown in place of content that failed to render.
pub fn failure_view(err: &RenderError) -> ViewNode {
    log::error!("{err}");
    ViewNode::Failure(err.to_string())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_passes_through() {
        assert_eq!(isolate(|| Ok::<_, RenderError>(7)), Ok(7));
    }

    #[test]
    fn test_error_passes_through() {
        let err = RenderError::Renderer {
            view: "plot".into(),
            message: "no data".into(),
        };
        let result: Result<(), _> = isolate(|| Err(err.clone()));
        assert_eq!(result, Err(err));
    }

    #[test]
    fn test_panic_is_caught() {
        let result: Result<(), _> = isolate(|| panic!("boom {}", 1));
        assert_eq!(result, Err(RenderError::Panicked("boom 1".to_string())));

        let result: Result<(), _> = isolate(|| panic!("static"));
        assert_eq!(result, Err(RenderError::Panicked("static".to_string())));
    }

    #[test]
    fn test_failure_view() {
        let view = failure_view(&RenderError::Panicked("boom".into()));
        assert_eq!(view.message(), Some("renderer panicked: boom"));
    }
}
