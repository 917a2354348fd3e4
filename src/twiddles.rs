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
use crate::permutation::Factorization;
use crate::pool::BufferPool;
use crate::{FftSample, TukeyError};
use num_complex::Complex;
use std::f64::consts::PI;

/// Number of master factors stored for a length `n` transform.
#[inline]
pub fn master_len(n: usize) -> usize {
    n.div_ceil(2)
}

fn fill_twiddles<T: FftSample>(n: usize, out: &mut [Complex<T>]) {
    for (k, dst) in out.iter_mut().enumerate() {
        let angle = -2. * PI * k as f64 / n as f64;
        let (v_sin, v_cos) = angle.sin_cos();
        *dst = Complex {
            re: T::from_f64(v_cos),
            im: T::from_f64(v_sin),
        };
    }
}

/// Forward factors `W_n^k = exp(-2πik/n)` for `k` in `[0, ceil(n/2))`.
///
/// Trigonometry runs in `f64` and is narrowed afterwards.
pub fn compute_twiddles<T: FftSample>(n: usize) -> Result<Vec<Complex<T>>, TukeyError> {
    let mut twiddles = try_vec![Complex::<T>::default(); master_len(n)];
    fill_twiddles(n, &mut twiddles);
    Ok(twiddles)
}

/// `W_n^e` recovered from the half-length master table.
#[inline]
fn lookup<T: FftSample>(master: &[Complex<T>], n: usize, exponent: usize) -> Complex<T> {
    let e = exponent % n;
    if n % 2 == 0 {
        let half = n / 2;
        if e < half { master[e] } else { -master[e - half] }
    } else if e <= (n - 1) / 2 {
        master[e]
    } else {
        master[n - e].conj()
    }
}

#[derive(Debug, Copy, Clone)]
struct StageLayout {
    radix: usize,
    sub_len: usize,
    factor_offset: usize,
    root_offset: usize,
}

/// Twiddles consumed by one butterfly stage.
///
/// `factors` is `(radix - 1) * sub_len` long and laid out by branch:
/// `factors[(j - 1) * sub_len + k] = W_{radix * sub_len}^{j k}`.
/// `roots[m] = W_radix^m` for `m` in `[0, radix)`.
#[derive(Debug, Copy, Clone)]
pub struct StageTwiddles<'a, T> {
    pub radix: usize,
    pub sub_len: usize,
    pub factors: &'a [Complex<T>],
    pub roots: &'a [Complex<T>],
}

/// Immutable twiddle storage for one factorization.
///
/// Every factor is derived from the master table, so all stages share the
/// same rounding.
pub struct TwiddleTable<T> {
    factorization: Factorization,
    master: Option<AlignedBuffer<T>>,
    factors: Option<AlignedBuffer<T>>,
    roots: Option<AlignedBuffer<T>>,
    layout: Vec<StageLayout>,
}

impl<T: FftSample> TwiddleTable<T> {
    pub fn new(factorization: Factorization) -> Result<TwiddleTable<T>, TukeyError> {
        TwiddleTable::build(factorization, alloc_aligned::<T>)
    }

    /// Same as [`TwiddleTable::new`] with storage taken from `pool`.
    pub fn new_pooled(
        factorization: Factorization,
        pool: &BufferPool<T>,
    ) -> Result<TwiddleTable<T>, TukeyError> {
        TwiddleTable::build(factorization, |len| pool.acquire(len))
    }

    fn build(
        factorization: Factorization,
        mut acquire: impl FnMut(usize) -> Result<Option<AlignedBuffer<T>>, TukeyError>,
    ) -> Result<TwiddleTable<T>, TukeyError> {
        let n = factorization.length();

        let mut layout = Vec::with_capacity(factorization.radices().len());
        let mut factor_total = 0usize;
        let mut root_total = 0usize;
        for (radix, sub_len) in factorization.stages() {
            layout.push(StageLayout {
                radix,
                sub_len,
                factor_offset: factor_total,
                root_offset: root_total,
            });
            factor_total += (radix - 1) * sub_len;
            root_total += radix;
        }

        let mut master = acquire(master_len(n))?;
        if let Some(master) = master.as_mut() {
            fill_twiddles(n, master);
        }
        let master_view: &[Complex<T>] = master.as_deref().unwrap_or(&[]);

        let mut factors = acquire(factor_total)?;
        let mut roots = acquire(root_total)?;
        for stage in layout.iter() {
            let span = stage.radix * stage.sub_len;
            let step = n / span;
            if let Some(factors) = factors.as_mut() {
                let dst = &mut factors[stage.factor_offset..][..(stage.radix - 1) * stage.sub_len];
                for (j, row) in dst.chunks_exact_mut(stage.sub_len).enumerate() {
                    let branch = j + 1;
                    for (k, w) in row.iter_mut().enumerate() {
                        *w = lookup(master_view, n, branch * k * step);
                    }
                }
            }
            if let Some(roots) = roots.as_mut() {
                let root_step = n / stage.radix;
                for (m, w) in roots[stage.root_offset..][..stage.radix]
                    .iter_mut()
                    .enumerate()
                {
                    *w = lookup(master_view, n, m * root_step);
                }
            }
        }

        tracing::debug!(
            n,
            scheme = factorization.scheme().name(),
            stages = layout.len(),
            factor_total,
            "twiddle table"
        );

        Ok(TwiddleTable {
            factorization,
            master,
            factors,
            roots,
            layout,
        })
    }
}

impl<T> TwiddleTable<T> {
    pub fn factorization(&self) -> &Factorization {
        &self.factorization
    }

    /// Transform length the table was built for.
    pub fn len(&self) -> usize {
        self.factorization.length()
    }

    pub fn is_empty(&self) -> bool {
        self.factorization.length() == 0
    }

    pub fn master(&self) -> &[Complex<T>] {
        self.master.as_deref().unwrap_or(&[])
    }

    pub fn stage_count(&self) -> usize {
        self.layout.len()
    }

    pub fn stage(&self, index: usize) -> StageTwiddles<'_, T> {
        let stage = self.layout[index];
        let factors = self.factors.as_deref().unwrap_or(&[]);
        let roots = self.roots.as_deref().unwrap_or(&[]);
        StageTwiddles {
            radix: stage.radix,
            sub_len: stage.sub_len,
            factors: &factors[stage.factor_offset..][..(stage.radix - 1) * stage.sub_len],
            roots: &roots[stage.root_offset..][..stage.radix],
        }
    }

    pub fn stages(&self) -> impl Iterator<Item = StageTwiddles<'_, T>> + '_ {
        (0..self.layout.len()).map(move |index| self.stage(index))
    }

    /// Hands back the aligned storage so it can be returned to a pool.
    pub fn into_buffers(self) -> Vec<AlignedBuffer<T>> {
        [self.master, self.factors, self.roots]
            .into_iter()
            .flatten()
            .collect()
    }
}
