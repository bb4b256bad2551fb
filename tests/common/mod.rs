//! Shared refcount-audited payload for trie tests.

#![allow(dead_code)]

use std::cell::Cell;
use std::ptr::NonNull;
use std::sync::atomic::{AtomicI32, Ordering};

use factdb_dsa::{RefCounted, TrieArray};

/// Test payload: a tag for identity checks, a live refcount, and the
/// trie-private scratch word. Allocations are leaked; the audit is about
/// counts, not memory.
pub struct Probe {
    pub tag: u32,
    refs: AtomicI32,
    link: Cell<*mut ()>,
}

impl Probe {
    pub fn alloc(tag: u32) -> NonNull<Probe> {
        NonNull::from(Box::leak(Box::new(Probe {
            tag,
            refs: AtomicI32::new(0),
            link: Cell::new(std::ptr::null_mut()),
        })))
    }
}

impl RefCounted for Probe {
    fn use_refs(&self, delta: i32) {
        let prev = self.refs.fetch_add(delta, Ordering::AcqRel);
        assert!(
            prev + delta >= 0,
            "probe {} refcount underflow: {} + {}",
            self.tag,
            prev,
            delta
        );
    }

    fn link(&self) -> *mut () {
        self.link.get()
    }

    fn set_link(&self, link: *mut ()) {
        self.link.set(link);
    }
}

pub fn refs(p: NonNull<Probe>) -> i32 {
    unsafe { p.as_ref() }.refs.load(Ordering::Acquire)
}

pub fn tag_of(slot: Option<NonNull<Probe>>) -> Option<u32> {
    slot.map(|p| unsafe { p.as_ref() }.tag)
}

/// Leaves currently carrying `p`, counted through `foreach`.
pub fn leaf_count(trie: &mut TrieArray<Probe>, p: NonNull<Probe>) -> u32 {
    let mut count = 0;
    trie.foreach(|v| {
        if v == p {
            count += 1;
        }
        None
    });
    count
}

pub fn assert_link_clear(p: NonNull<Probe>) {
    assert!(
        unsafe { p.as_ref() }.link().is_null(),
        "probe {}: trie scratch link left set",
        unsafe { p.as_ref() }.tag
    );
}

/// Combinator assigning one fresh payload to everything the insert touches.
pub fn assign(p: NonNull<Probe>) -> impl FnMut(Option<NonNull<Probe>>, u32) -> NonNull<Probe> {
    move |old, _refs| {
        assert!(old.is_none(), "assign used over pre-existing payloads");
        unsafe { p.as_ref() }.use_refs(1);
        p
    }
}
