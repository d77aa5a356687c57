use std::{
    ptr,
    sync::atomic::{AtomicPtr, Ordering},
};

struct Node<K, V> {
    key: K,
    value: V,
    next: *mut Node<K, V>,
}

/// A micro-cache: an append-only linked list whose head pointer is swapped
/// atomically. Suitable when the number of entries is controllable (one per
/// entity or conditions type) and values are never changed once published.
///
/// Readers walk an immutable chain and never block. Writers race on a single
/// compare-and-swap; a losing writer discards its freshly built value and
/// adopts the winner's, so at most one value is ever visible per key.
///
/// Keys are small `Copy` types (typically `TypeId`) compared by `Eq`, the
/// referentially-stable analogue of caching per type descriptor.
pub struct Link<K, V> {
    head: AtomicPtr<Node<K, V>>,
}

impl<K: Copy + Eq, V: Clone> Link<K, V> {
    pub const fn new() -> Self {
        Self {
            head: AtomicPtr::new(ptr::null_mut()),
        }
    }

    pub fn get(&self, key: K) -> Option<V> {
        Self::find(self.head.load(Ordering::Acquire), key)
    }

    /// Publish `value` under `key` unless some other thread got there first;
    /// either way, return the value that ended up in the cache.
    pub fn insert(&self, key: K, value: V) -> V {
        let node = Box::into_raw(Box::new(Node {
            key,
            value,
            next: ptr::null_mut(),
        }));
        loop {
            let snapshot = self.head.load(Ordering::Acquire);
            if let Some(found) = Self::find(snapshot, key) {
                // Existing match: drop our freshly built node, adopt the winner.
                drop(unsafe { Box::from_raw(node) });
                return found;
            }
            unsafe { (*node).next = snapshot };
            if self
                .head
                .compare_exchange(snapshot, node, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                return unsafe { (*node).value.clone() };
            }
        }
    }

    fn find(mut node: *mut Node<K, V>, key: K) -> Option<V> {
        // Nodes are only ever prepended and never freed while the cache is
        // alive, so walking a snapshot is safe.
        while !node.is_null() {
            let current = unsafe { &*node };
            if current.key == key {
                return Some(current.value.clone());
            }
            node = current.next;
        }
        None
    }
}

impl<K: Copy + Eq, V: Clone> Default for Link<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Drop for Link<K, V> {
    fn drop(&mut self) {
        let mut node = *self.head.get_mut();
        while !node.is_null() {
            let boxed = unsafe { Box::from_raw(node) };
            node = boxed.next;
        }
    }
}

unsafe impl<K: Send, V: Send> Send for Link<K, V> {}
unsafe impl<K: Send + Sync, V: Send + Sync> Sync for Link<K, V> {}
