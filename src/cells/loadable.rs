//! Loadable - the value of an asynchronous cell.
//!
//! `Pending` is distinct from a resolved `None`: a cell of type
//! `Loadable<Option<FileInfo>>` can be pending, resolved-to-absent, or
//! resolved-to-present.

/// Pending or resolved value of an async cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Loadable<T> {
    /// The computation has not settled yet.
    #[default]
    Pending,
    /// The computation settled with this value.
    Ready(T),
}

impl<T> Loadable<T> {
    #[inline]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn as_ref(&self) -> Loadable<&T> {
        match self {
            Self::Pending => Loadable::Pending,
            Self::Ready(value) => Loadable::Ready(value),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Loadable<U> {
        match self {
            Self::Pending => Loadable::Pending,
            Self::Ready(value) => Loadable::Ready(f(value)),
        }
    }

    pub fn and_then<U>(self, f: impl FnOnce(T) -> Loadable<U>) -> Loadable<U> {
        match self {
            Self::Pending => Loadable::Pending,
            Self::Ready(value) => f(value),
        }
    }

    /// The resolved value, or `None` while pending.
    pub fn ready(self) -> Option<T> {
        match self {
            Self::Pending => None,
            Self::Ready(value) => Some(value),
        }
    }

    pub fn unwrap_or(self, default: T) -> T {
        self.ready().unwrap_or(default)
    }
}

impl<T> From<T> for Loadable<T> {
    fn from(value: T) -> Self {
        Self::Ready(value)
    }
}
