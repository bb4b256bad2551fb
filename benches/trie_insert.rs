use std::cell::Cell;
use std::ptr::NonNull;
use std::sync::atomic::{AtomicI32, Ordering};

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use factdb_dsa::{IdRange, RefCounted, TrieArray};

struct Payload {
    refs: AtomicI32,
    link: Cell<*mut ()>,
}

impl Payload {
    fn alloc() -> NonNull<Payload> {
        NonNull::from(Box::leak(Box::new(Payload {
            refs: AtomicI32::new(0),
            link: Cell::new(std::ptr::null_mut()),
        })))
    }
}

impl RefCounted for Payload {
    fn use_refs(&self, delta: i32) {
        self.refs.fetch_add(delta, Ordering::Relaxed);
    }
    fn link(&self) -> *mut () {
        self.link.get()
    }
    fn set_link(&self, link: *mut ()) {
        self.link.set(link);
    }
}

fn bench_ownership_trie(c: &mut Criterion) {
    let mut group = c.benchmark_group("ownership_trie");

    let ranges: Vec<IdRange> = (0..1000u64)
        .map(|i| IdRange::new(i * 64, i * 64 + 31))
        .collect();

    group.bench_function("insert_1k_ranges", |b| {
        b.iter(|| {
            let mut trie = TrieArray::new();
            let payload = Payload::alloc();
            trie.insert(black_box(&ranges), |_, _| {
                unsafe { payload.as_ref() }.use_refs(1);
                payload
            });
            black_box(trie.forests())
        })
    });

    group.bench_function("flatten_64k_span", |b| {
        b.iter(|| {
            let mut trie = TrieArray::new();
            let payload = Payload::alloc();
            trie.insert(black_box(&ranges), |_, _| {
                unsafe { payload.as_ref() }.use_refs(1);
                payload
            });
            let flat = trie.flatten(0, 65_536);
            black_box(flat.dense.len())
        })
    });

    group.finish();
}

criterion_group!(benches, bench_ownership_trie);
criterion_main!(benches);
