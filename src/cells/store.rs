//! CellStore - versioned dependency graph with lazy recomputation.
//!
//! Every node caches its value together with the versions of the nodes it
//! read during its last computation. Reading a node re-checks those
//! versions (refreshing each dependency first) and recomputes only when one
//! of them moved. A node's own version moves only when its value actually
//! changes, so an unchanged path never re-triggers a stat.
//!
//! Async nodes store a [`Loadable`]. Recomputing one flips it to `Pending`,
//! bumps its generation and spawns the future on the store's spawner. When
//! the future settles, the result is written only if the generation still
//! matches; otherwise it is dropped as stale.
//!
//! # Example
//!
//! ```ignore
//! let mut pool = LocalPool::new();
//! let store = CellStore::new(pool.spawner());
//!
//! let path = store.source(Some("/tmp/a.txt".to_string()));
//! let upper = store.derive(move |g| g.get(&path).map(|p| p.to_uppercase()));
//!
//! assert_eq!(store.get(&upper), Some("/TMP/A.TXT".to_string()));
//! store.set(&path, None);
//! assert_eq!(store.get(&upper), None);
//! ```

use std::any::Any;
use std::cell::{Cell as StdCell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::rc::Rc;

use futures::FutureExt;
use futures::executor::LocalSpawner;
use futures::future::LocalBoxFuture;
use futures::task::LocalSpawnExt;

use super::Loadable;

// =============================================================================
// TYPES
// =============================================================================

/// Index of a node in the store.
pub type NodeId = usize;

/// Handle returned by [`CellStore::subscribe`].
pub type ListenerId = u64;

type Value = Rc<dyn Any>;
type EqFn = fn(&Value, &Value) -> bool;
type ComputeFn = Box<dyn Fn(&Getter<'_>) -> Value>;
type AsyncComputeFn = Box<dyn Fn(&Getter<'_>) -> LocalBoxFuture<'static, Value>>;
type WriteFn<T> = Rc<dyn Fn(&CellStore, T)>;

/// Typed handle to a node. Cheap to copy; the value lives in the store.
pub struct Cell<T> {
    id: NodeId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Cell<T> {
    fn new(id: NodeId) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }
}

impl<T> Clone for Cell<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Cell<T> {}

impl<T> PartialEq for Cell<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Cell<T> {}

impl<T> fmt::Debug for Cell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cell({})", self.id)
    }
}

/// A derived cell with a custom write path.
///
/// Reads go through the derived cell; writes call the supplied writer, which
/// usually forwards to an external store. Nothing is cached locally on write.
pub struct WritableCell<T> {
    cell: Cell<T>,
    write: WriteFn<T>,
}

impl<T> WritableCell<T> {
    pub fn cell(&self) -> Cell<T> {
        self.cell
    }
}

impl<T> Clone for WritableCell<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell,
            write: self.write.clone(),
        }
    }
}

impl<T> PartialEq for WritableCell<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cell == other.cell
    }
}

impl<T> fmt::Debug for WritableCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WritableCell({})", self.cell.id)
    }
}

enum NodeKind {
    Source,
    Derived(ComputeFn),
    Async { compute: AsyncComputeFn, pending: Value },
}

struct NodeState {
    value: Value,
    version: u64,
    computed: bool,
    deps: Vec<(NodeId, u64)>,
    generation: u64,
}

struct Node {
    key: Option<String>,
    kind: NodeKind,
    eq: EqFn,
    computing: StdCell<bool>,
    state: RefCell<NodeState>,
}

impl Node {
    fn label(&self, id: NodeId) -> String {
        match &self.key {
            Some(key) => format!("{id}:{key}"),
            None => id.to_string(),
        }
    }
}

struct Shared {
    nodes: RefCell<Vec<Rc<Node>>>,
    handles: RefCell<HashMap<String, Rc<dyn Any>>>,
    /// Key of the handle currently being defined through `keyed`.
    defining: RefCell<Option<String>>,
    listeners: RefCell<Vec<(ListenerId, Rc<dyn Fn()>)>>,
    next_listener: StdCell<ListenerId>,
    spawner: LocalSpawner,
}

/// Clears a node's `computing` flag on drop, including on unwind.
struct ComputingGuard<'a>(&'a StdCell<bool>);

impl<'a> ComputingGuard<'a> {
    fn enter(flag: &'a StdCell<bool>) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for ComputingGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

fn value_eq<T: PartialEq + 'static>(a: &Value, b: &Value) -> bool {
    match (a.downcast_ref::<T>(), b.downcast_ref::<T>()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

// =============================================================================
// GETTER
// =============================================================================

/// Read context passed to compute functions. Records every cell read.
pub struct Getter<'a> {
    store: &'a CellStore,
    deps: RefCell<Vec<(NodeId, u64)>>,
}

impl<'a> Getter<'a> {
    fn new(store: &'a CellStore) -> Self {
        Self {
            store,
            deps: RefCell::new(Vec::new()),
        }
    }

    /// Read a cell and record it as a dependency.
    pub fn get<T: Clone + 'static>(&self, cell: &Cell<T>) -> T {
        let (value, version) = self.store.refresh(cell.id);
        let mut deps = self.deps.borrow_mut();
        if !deps.iter().any(|(id, _)| *id == cell.id) {
            deps.push((cell.id, version));
        }
        drop(deps);
        downcast(cell.id, &value)
    }

    fn finish(self) -> Vec<(NodeId, u64)> {
        self.deps.into_inner()
    }
}

fn downcast<T: Clone + 'static>(id: NodeId, value: &Value) -> T {
    match value.downcast_ref::<T>() {
        Some(value) => value.clone(),
        None => unreachable!("cell {id} holds a value of a different type"),
    }
}

// =============================================================================
// STORE
// =============================================================================

/// Single-threaded reactive cell store. Clones share the same graph.
#[derive(Clone)]
pub struct CellStore {
    shared: Rc<Shared>,
}

impl CellStore {
    /// Create a store whose async cells run on `spawner`.
    pub fn new(spawner: LocalSpawner) -> Self {
        Self {
            shared: Rc::new(Shared {
                nodes: RefCell::new(Vec::new()),
                handles: RefCell::new(HashMap::new()),
                defining: RefCell::new(None),
                listeners: RefCell::new(Vec::new()),
                next_listener: StdCell::new(0),
                spawner,
            }),
        }
    }

    // -------------------------------------------------------------------------
    // Definition
    // -------------------------------------------------------------------------

    /// A writable cell holding `initial`.
    pub fn source<T: Clone + PartialEq + 'static>(&self, initial: T) -> Cell<T> {
        self.insert(NodeKind::Source, value_eq::<T>, Rc::new(initial), true)
    }

    /// A cell computed from other cells. Computed on first read.
    pub fn derive<T, F>(&self, compute: F) -> Cell<T>
    where
        T: Clone + PartialEq + 'static,
        F: Fn(&Getter<'_>) -> T + 'static,
    {
        let compute: ComputeFn = Box::new(move |getter: &Getter<'_>| {
            Rc::new(compute(getter)) as Value
        });
        self.insert(NodeKind::Derived(compute), value_eq::<T>, Rc::new(()), false)
    }

    /// A cell whose compute reads its dependencies synchronously and then
    /// awaits an external call.
    pub fn derive_async<T, F, Fut>(&self, compute: F) -> Cell<Loadable<T>>
    where
        T: Clone + PartialEq + 'static,
        F: Fn(&Getter<'_>) -> Fut + 'static,
        Fut: Future<Output = T> + 'static,
    {
        let compute: AsyncComputeFn = Box::new(move |getter: &Getter<'_>| {
            let future = compute(getter);
            async move { Rc::new(Loadable::Ready(future.await)) as Value }.boxed_local()
        });
        let pending: Value = Rc::new(Loadable::<T>::Pending);
        self.insert(
            NodeKind::Async {
                compute,
                pending: pending.clone(),
            },
            value_eq::<Loadable<T>>,
            pending,
            false,
        )
    }

    /// A derived cell whose writes go through `write`.
    pub fn derive_writable<T, R, W>(&self, read: R, write: W) -> WritableCell<T>
    where
        T: Clone + PartialEq + 'static,
        R: Fn(&Getter<'_>) -> T + 'static,
        W: Fn(&CellStore, T) + 'static,
    {
        WritableCell {
            cell: self.derive(read),
            write: Rc::new(write),
        }
    }

    /// Look up a handle by key, defining it with `init` the first time.
    ///
    /// This is how per-block cells are defined once and shared by every
    /// reader (`"block:<id>:preview:statfile"` and friends).
    pub fn keyed<H, F>(&self, key: &str, init: F) -> H
    where
        H: Clone + 'static,
        F: FnOnce(&CellStore) -> H,
    {
        let existing = self.shared.handles.borrow().get(key).cloned();
        if let Some(handle) = existing {
            if let Some(handle) = handle.downcast_ref::<H>() {
                return handle.clone();
            }
            log::warn!("cell key {key:?} redefined with a different type");
        }

        let previous = self.shared.defining.replace(Some(key.to_string()));
        let handle = init(self);
        self.shared.defining.replace(previous);

        self.shared
            .handles
            .borrow_mut()
            .insert(key.to_string(), Rc::new(handle.clone()));
        handle
    }

    fn insert<T>(&self, kind: NodeKind, eq: EqFn, value: Value, computed: bool) -> Cell<T> {
        let node = Rc::new(Node {
            key: self.shared.defining.borrow_mut().take(),
            kind,
            eq,
            computing: StdCell::new(false),
            state: RefCell::new(NodeState {
                value,
                version: 0,
                computed,
                deps: Vec::new(),
                generation: 0,
            }),
        });
        let mut nodes = self.shared.nodes.borrow_mut();
        nodes.push(node);
        Cell::new(nodes.len() - 1)
    }

    // -------------------------------------------------------------------------
    // Reading and writing
    // -------------------------------------------------------------------------

    /// Read a cell, recomputing it first if any dependency moved.
    pub fn get<T: Clone + 'static>(&self, cell: &Cell<T>) -> T {
        let (value, _) = self.refresh(cell.id);
        downcast(cell.id, &value)
    }

    /// Current version of a cell, after refreshing it.
    pub fn version<T>(&self, cell: &Cell<T>) -> u64 {
        self.refresh(cell.id).1
    }

    /// Replace the value of a source cell. Equal values are ignored.
    pub fn set<T: Clone + PartialEq + 'static>(&self, cell: &Cell<T>, value: T) {
        let node = self.node(cell.id);
        if !matches!(node.kind, NodeKind::Source) {
            log::warn!("ignoring set on derived cell {}", node.label(cell.id));
            return;
        }
        {
            let mut state = node.state.borrow_mut();
            let value: Value = Rc::new(value);
            if (node.eq)(&state.value, &value) {
                return;
            }
            state.value = value;
            state.version += 1;
        }
        self.notify();
    }

    /// Write through a writable cell.
    pub fn write<T>(&self, cell: &WritableCell<T>, value: T) {
        (cell.write)(self, value);
    }

    /// Run a fire-and-forget task on the store's spawner.
    pub fn spawn(&self, task: impl Future<Output = ()> + 'static) {
        if let Err(err) = self.shared.spawner.spawn_local(task) {
            log::error!("failed to spawn task: {err}");
        }
    }

    // -------------------------------------------------------------------------
    // Listeners
    // -------------------------------------------------------------------------

    /// Register a callback run whenever a source cell changes or an async
    /// cell settles. Readers use it to re-render.
    pub fn subscribe(&self, listener: impl Fn() + 'static) -> ListenerId {
        let id = self.shared.next_listener.get();
        self.shared.next_listener.set(id + 1);
        self.shared
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: ListenerId) {
        self.shared
            .listeners
            .borrow_mut()
            .retain(|(listener_id, _)| *listener_id != id);
    }

    fn notify(&self) {
        let listeners: Vec<Rc<dyn Fn()>> = self
            .shared
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener();
        }
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn node(&self, id: NodeId) -> Rc<Node> {
        self.shared.nodes.borrow()[id].clone()
    }

    /// Bring a node up to date and return its value and version.
    fn refresh(&self, id: NodeId) -> (Value, u64) {
        let node = self.node(id);
        if node.computing.get() {
            log::error!("dependency cycle through cell {}", node.label(id));
        } else if self.is_stale(&node) {
            let _guard = ComputingGuard::enter(&node.computing);
            self.recompute(id, &node);
        }
        let state = node.state.borrow();
        (state.value.clone(), state.version)
    }

    fn is_stale(&self, node: &Node) -> bool {
        if matches!(node.kind, NodeKind::Source) {
            return false;
        }
        let deps = {
            let state = node.state.borrow();
            if !state.computed {
                return true;
            }
            state.deps.clone()
        };
        deps.into_iter()
            .any(|(dep, seen)| self.refresh(dep).1 != seen)
    }

    fn recompute(&self, id: NodeId, node: &Node) {
        match &node.kind {
            NodeKind::Source => {}
            NodeKind::Derived(compute) => {
                let getter = Getter::new(self);
                let value = compute(&getter);
                let deps = getter.finish();
                let mut state = node.state.borrow_mut();
                let changed = !state.computed || !(node.eq)(&state.value, &value);
                state.deps = deps;
                state.computed = true;
                if changed {
                    state.value = value;
                    state.version += 1;
                }
                log::trace!("recomputed cell {} (changed: {changed})", node.label(id));
            }
            NodeKind::Async { compute, pending } => {
                let getter = Getter::new(self);
                let future = compute(&getter);
                let deps = getter.finish();
                let generation = {
                    let mut state = node.state.borrow_mut();
                    state.deps = deps;
                    state.computed = true;
                    state.generation += 1;
                    if !(node.eq)(&state.value, pending) {
                        state.value = pending.clone();
                        state.version += 1;
                    }
                    state.generation
                };
                log::debug!(
                    "cell {} pending (generation {generation})",
                    node.label(id)
                );
                self.spawn_settle(id, generation, future);
            }
        }
    }

    fn spawn_settle(&self, id: NodeId, generation: u64, future: LocalBoxFuture<'static, Value>) {
        let shared = Rc::downgrade(&self.shared);
        self.spawn(async move {
            let value = future.await;
            if let Some(shared) = shared.upgrade() {
                CellStore { shared }.settle(id, generation, value);
            }
        });
    }

    fn settle(&self, id: NodeId, generation: u64, value: Value) {
        let node = self.node(id);
        {
            let mut state = node.state.borrow_mut();
            if state.generation != generation {
                log::debug!(
                    "cell {}: discarding stale result (generation {generation}, current {})",
                    node.label(id),
                    state.generation
                );
                return;
            }
            state.value = value;
            state.version += 1;
        }
        log::debug!("cell {} settled", node.label(id));
        self.notify();
    }
}

// =============================================================================
// TESTS
// =============================================================================
