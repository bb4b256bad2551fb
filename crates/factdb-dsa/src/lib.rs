#![no_std]
extern crate alloc;

pub mod pool;
pub mod trie;

pub use trie::{Flattened, IdRange, RefCounted, TrieArray};
