//! Execution-unit-scoped ambient context
//!
//! Each thread owns one live `FieldMap`; scoped mutations are bracketed by a
//! `ContextScope` guard that restores prior state on every exit path,
//! including unwinding. Concurrent units never share the mapping: a spawned
//! unit inherits by taking a `snapshot()` in the parent and calling `adopt()`
//! at the start of the child, after which the two evolve independently.

use std::cell::RefCell;
use std::marker::PhantomData;

use super::field::{FieldMap, FieldValue};

thread_local! {
    static AMBIENT: RefCell<FieldMap> = RefCell::new(FieldMap::new());
}

/// Clone the current unit's live field mapping.
pub fn snapshot() -> FieldMap {
    AMBIENT.with(|ambient| ambient.borrow().clone())
}

/// Replace the current unit's mapping with an inherited copy.
///
/// Call this at the top of a spawned thread or task with the parent's
/// `snapshot()`; later changes on either side stay invisible to the other.
pub fn adopt(fields: FieldMap) {
    AMBIENT.with(|ambient| *ambient.borrow_mut() = fields);
}

/// Merge `fields` into the current unit's mapping and return a guard that
/// undoes exactly those changes when dropped.
///
/// Scopes nest; an inner scope shadows outer values and releasing it never
/// disturbs fields introduced by a still-active outer scope.
#[must_use = "dropping the scope immediately reverts the context"]
pub fn contextualize(fields: FieldMap) -> ContextScope {
    let saved = AMBIENT.with(|ambient| {
        let mut live = ambient.borrow_mut();
        fields
            .iter()
            .map(|(key, value)| {
                let prior = live.insert(key, value.clone());
                (key.to_string(), prior)
            })
            .collect()
    });

    ContextScope {
        saved,
        _not_send: PhantomData,
    }
}

/// Guard representing a reversible set of ambient context mutations.
///
/// Owns the set of keys it touched plus each key's prior value (or absence).
/// `!Send`: the guard must drop on the unit whose mapping it changed.
pub struct ContextScope {
    saved: Vec<(String, Option<FieldValue>)>,
    _not_send: PhantomData<*const ()>,
}

impl Drop for ContextScope {
    fn drop(&mut self) {
        AMBIENT.with(|ambient| {
            let mut live = ambient.borrow_mut();
            for (key, prior) in self.saved.drain(..) {
                match prior {
                    Some(value) => live.insert(key, value),
                    None => live.remove(&key),
                };
            }
        });
    }
}
