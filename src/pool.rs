/*
 * // Copyright (c) Radzivon Bartoshyk 9/2025. All rights reserved.
 * //
 * // Redistribution and use in source and binary forms, with or without modification,
 * // are permitted provided that the following conditions are met:
 * //
 * // 1.  Redistributions of source code must retain the above copyright notice, this
 * // list of conditions and the following disclaimer.
 * //
 * // 2.  Redistributions in binary form must reproduce the above copyright notice,
 * // this list of conditions and the following disclaimer in the documentation
 * // and/or other materials provided with the distribution.
 * //
 * // 3.  Neither the name of the copyright holder nor the names of its
 * // contributors may be used to endorse or promote products derived from
 * // this software without specific prior written permission.
 * //
 * // THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
 * // AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
 * // IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
 * // DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
 * // FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
 * // DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
 * // SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
 * // CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
 * // OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
 * // OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.
 */
use crate::align::{AlignedBuffer, alloc_aligned};
use crate::err::try_vec;
use crate::{FftSample, TukeyError};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Something a [`SizedPool`] can hand out and take back.
pub trait PoolItem: Send + Sized {
    /// Fresh item of exactly `len` elements, `None` for `len == 0`.
    fn allocate(len: usize) -> Result<Option<Self>, TukeyError>;

    fn item_len(&self) -> usize;
}

impl<T: FftSample> PoolItem for AlignedBuffer<T> {
    fn allocate(len: usize) -> Result<Option<Self>, TukeyError> {
        alloc_aligned::<T>(len)
    }

    fn item_len(&self) -> usize {
        self.len()
    }
}

impl PoolItem for Vec<usize> {
    fn allocate(len: usize) -> Result<Option<Self>, TukeyError> {
        if len == 0 {
            return Ok(None);
        }
        Ok(Some(try_vec![0usize; len]))
    }

    fn item_len(&self) -> usize {
        self.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub hits: u64,
    pub misses: u64,
    pub released: u64,
    pub rejected: u64,
    /// `(element count, idle items)` per size class, ascending.
    pub classes: Vec<(usize, usize)>,
}

type FreeList<V> = Arc<Mutex<Vec<V>>>;

/// Free-lists of reusable items, one per exact element count.
///
/// Size classes are created on first use and live as long as the pool.
/// `acquire` and `release` take `&self` and may be called from any number of
/// threads; an acquired item is owned by its caller until released.
pub struct SizedPool<V: PoolItem> {
    classes: RwLock<HashMap<usize, FreeList<V>>>,
    max_per_class: Option<usize>,
    hits: AtomicU64,
    misses: AtomicU64,
    released: AtomicU64,
    rejected: AtomicU64,
}

/// Pool of 32-byte aligned sample buffers.
pub type BufferPool<T> = SizedPool<AlignedBuffer<T>>;

/// Pool of permutation index buffers.
pub type IndexPool = SizedPool<Vec<usize>>;

impl<V: PoolItem> Default for SizedPool<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: PoolItem> SizedPool<V> {
    pub fn new() -> Self {
        SizedPool {
            classes: RwLock::new(HashMap::new()),
            max_per_class: None,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            released: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
        }
    }

    /// Keeps at most `max` idle items per size class; extra releases are dropped.
    pub fn with_max_per_class(max: usize) -> Self {
        SizedPool {
            max_per_class: Some(max),
            ..Self::new()
        }
    }

    fn free_list(&self, size: usize) -> FreeList<V> {
        if let Some(list) = self.classes.read().get(&size) {
            return list.clone();
        }
        self.classes
            .write()
            .entry(size)
            .or_insert_with(|| Arc::new(Mutex::new(Vec::new())))
            .clone()
    }

    /// Takes an idle item of exactly `size` elements or allocates a new one.
    ///
    /// Reused items keep whatever contents they were released with.
    pub fn acquire(&self, size: usize) -> Result<Option<V>, TukeyError> {
        if size == 0 {
            return Ok(None);
        }
        let reused = self.free_list(size).lock().pop();
        if let Some(item) = reused {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(size, "pool hit");
            return Ok(Some(item));
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(size, "pool miss");
        V::allocate(size)
    }

    /// Returns `item` to the `size` class.
    ///
    /// An item whose length differs from `size` is not pooled and is simply
    /// dropped; the pool's state is unaffected.
    pub fn release(&self, size: usize, item: V) {
        if size == 0 || item.item_len() != size {
            self.rejected.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(size, len = item.item_len(), "pool release rejected");
            return;
        }
        let list = self.free_list(size);
        let mut list = list.lock();
        if let Some(max) = self.max_per_class {
            if list.len() >= max {
                self.rejected.fetch_add(1, Ordering::Relaxed);
                return;
            }
        }
        list.push(item);
        self.released.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of idle items currently held for `size`.
    pub fn idle(&self, size: usize) -> usize {
        self.classes
            .read()
            .get(&size)
            .map(|list| list.lock().len())
            .unwrap_or(0)
    }

    pub fn stats(&self) -> PoolStats {
        let mut classes: Vec<(usize, usize)> = self
            .classes
            .read()
            .iter()
            .map(|(&size, list)| (size, list.lock().len()))
            .collect();
        classes.sort_unstable();
        PoolStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            released: self.released.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            classes,
        }
    }
}
