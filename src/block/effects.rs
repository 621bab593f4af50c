//! Deferred side effects.
//!
//! Renderers never write shared cells while rendering. They return
//! [`SideEffect`]s, the block queues them here with a short delay, and the
//! host applies them on a later tick, outside any render pass.

use std::cell::RefCell;
use std::time::{Duration, Instant};

use crate::services::ObjectStore;
use crate::view::SideEffect;

use super::meta::BlockMeta;

pub struct DeferredEffects {
    delay: Duration,
    queue: RefCell<Vec<(Instant, SideEffect)>>,
}

impl DeferredEffects {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            queue: RefCell::new(Vec::new()),
        }
    }

    /// Queue `effect` to run `delay` after `now`.
    ///
    /// A queued effect with the same target is replaced in place and keeps
    /// the earlier due time.
    pub fn schedule(&self, effect: SideEffect, now: Instant) {
        let mut queue = self.queue.borrow_mut();
        if let Some(slot) = queue.iter_mut().find(|(_, queued)| queued.same_target(&effect)) {
            slot.1 = effect;
            return;
        }
        queue.push((now + self.delay, effect));
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.queue.borrow().iter().map(|(due, _)| *due).min()
    }

    /// Apply every effect due at `now`. Returns how many ran.
    pub fn flush(&self, now: Instant, objects: &ObjectStore) -> usize {
        let due: Vec<SideEffect> = {
            let mut queue = self.queue.borrow_mut();
            let (due, pending): (Vec<_>, Vec<_>) =
                queue.drain(..).partition(|(at, _)| *at <= now);
            *queue = pending;
            due.into_iter().map(|(_, effect)| effect).collect()
        };
        let count = due.len();
        for effect in due {
            apply(effect, objects);
        }
        count
    }
}

fn apply(effect: SideEffect, objects: &ObjectStore) {
    match effect {
        SideEffect::SetIconOverride { block_id, icon } => {
            log::debug!("block {block_id}: icon override {}", icon.glyph());
            let meta = BlockMeta::new(objects.clone(), block_id);
            meta.cells().set(&meta.icon_override(), Some(icon));
        }
    }
}
