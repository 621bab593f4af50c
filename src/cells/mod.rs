//! Reactive Cells
//!
//! A small reactive graph for values that are derived from other values and
//! from asynchronous calls.
//!
//! - [`CellStore::source`] - writable value
//! - [`CellStore::derive`] - pure function of other cells, computed on read
//! - [`CellStore::derive_async`] - reads dependencies, then awaits; readers
//!   observe [`Loadable::Pending`] until it settles
//! - [`CellStore::derive_writable`] - derived read with a custom write path
//! - [`CellStore::keyed`] - define a cell once per key and share it
//! - [`CellStore::subscribe`] - re-render hook for changes and settlements

pub mod loadable;
pub mod store;

pub use loadable::Loadable;
pub use store::{Cell, CellStore, Getter, ListenerId, NodeId, WritableCell};
