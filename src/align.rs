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
use crate::{FftSample, TukeyError};
use num_complex::Complex;
use std::fmt::{Debug, Formatter};
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;

/// Byte alignment of every buffer handed to a kernel.
///
/// 32 bytes covers a full 256-bit vector load of either precision.
pub const ALIGNMENT: usize = 32;

/// Rounds `ptr` up to the next multiple of `alignment`.
///
/// `alignment` must be a power of two. The result `r` satisfies
/// `r >= ptr`, `r % alignment == 0` and `r - ptr < alignment`.
#[inline]
pub const fn align(ptr: usize, alignment: usize) -> usize {
    debug_assert!(alignment.is_power_of_two());
    ptr.div_ceil(alignment) * alignment
}

#[inline]
pub fn is_aligned<T>(ptr: *const T, alignment: usize) -> bool {
    (ptr as usize).is_multiple_of(alignment)
}

/// Raw block backing an [`AlignedBuffer`].
///
/// Over-allocated by `ALIGNMENT - 1` bytes so that an aligned window of the
/// requested size always fits.
pub struct RawAllocation {
    storage: Vec<u8>,
    offset: usize,
}

impl RawAllocation {
    /// Total bytes reserved, padding included.
    pub fn capacity_bytes(&self) -> usize {
        self.storage.len()
    }

    /// Distance from the start of the block to the aligned view.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn base_address(&self) -> usize {
        self.storage.as_ptr() as usize
    }
}

/// Zero-initialised run of complex samples whose first element sits on an
/// [`ALIGNMENT`] byte boundary.
///
/// The view borrows from the [`RawAllocation`] it owns, so the backing memory
/// is released exactly when the buffer is dropped.
pub struct AlignedBuffer<T> {
    ptr: NonNull<Complex<T>>,
    len: usize,
    backing: RawAllocation,
}

// The buffer uniquely owns its backing block; no interior sharing.
unsafe impl<T: Send> Send for AlignedBuffer<T> {}
unsafe impl<T: Sync> Sync for AlignedBuffer<T> {}

impl<T> AlignedBuffer<T> {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn backing(&self) -> &RawAllocation {
        &self.backing
    }

    pub fn as_slice(&self) -> &[Complex<T>] {
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [Complex<T>] {
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl<T> Deref for AlignedBuffer<T> {
    type Target = [Complex<T>];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T> DerefMut for AlignedBuffer<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<T> Debug for AlignedBuffer<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlignedBuffer")
            .field("len", &self.len)
            .field("ptr", &self.ptr)
            .field("capacity_bytes", &self.backing.capacity_bytes())
            .finish()
    }
}

/// Allocates `len` zeroed samples aligned to [`ALIGNMENT`] bytes.
///
/// A zero `len` is the defined empty case and yields `Ok(None)`: no view and
/// no backing block are created.
pub fn alloc_aligned<T: FftSample>(len: usize) -> Result<Option<AlignedBuffer<T>>, TukeyError> {
    if len == 0 {
        return Ok(None);
    }

    let payload = len
        .checked_mul(size_of::<Complex<T>>())
        .ok_or(TukeyError::OutOfMemory(usize::MAX))?;
    let total = payload
        .checked_add(ALIGNMENT - 1)
        .ok_or(TukeyError::OutOfMemory(usize::MAX))?;

    let mut storage: Vec<u8> = Vec::new();
    storage
        .try_reserve_exact(total)
        .map_err(|_| TukeyError::OutOfMemory(total))?;
    storage.resize(total, 0);

    let base = storage.as_mut_ptr();
    let offset = align(base as usize, ALIGNMENT) - base as usize;
    debug_assert!(offset + payload <= total);

    // All-zero bytes are a valid `Complex<f32>` / `Complex<f64>`.
    let ptr = NonNull::new(unsafe { base.add(offset) }.cast::<Complex<T>>())
        .ok_or(TukeyError::OutOfMemory(total))?;

    tracing::trace!(len, total, offset, "aligned allocation");

    Ok(Some(AlignedBuffer {
        ptr,
        len,
        backing: RawAllocation { storage, offset },
    }))
}
