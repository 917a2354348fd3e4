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
//! Mixed-radix Cooley–Tukey FFT with runtime kernel dispatch.
//!
//! A [`Planner`] factors the transform length into radix-2, radix-4, radix-8
//! or general odd prime stages, precomputes twiddle and permutation tables
//! once, and picks the widest vector kernel the CPU supports, falling back to
//! narrower kernels and finally to the portable scalar one.
//!
//! Transforms are unnormalised in both directions, so
//! `inverse(forward(x)) == N * x`.
//!
//! ```
//! use num_complex::Complex;
//! use tukey::Tukey;
//!
//! let plan = Tukey::make_plan_f64(8).unwrap();
//! let src = vec![Complex::new(1.0, 0.0); 8];
//! let mut spectrum = vec![Complex::new(0.0, 0.0); 8];
//! plan.forward(&mut spectrum, &src).unwrap();
//! assert!((spectrum[0].re - 8.0).abs() < 1e-12);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
mod align;
#[cfg(all(target_arch = "x86_64", feature = "avx"))]
mod avx;
mod combine;
mod complex_fma;
mod dispatch;
mod err;
mod features;
mod kernel;
#[cfg(all(target_arch = "aarch64", feature = "neon"))]
mod neon;
#[cfg(test)]
mod oracle;
mod permutation;
mod plan;
mod pool;
#[cfg(all(target_arch = "x86_64", feature = "sse"))]
mod sse;
mod traits;
mod twiddles;

pub use align::{ALIGNMENT, AlignedBuffer, RawAllocation, align, alloc_aligned, is_aligned};
pub use combine::{combine_general, combine_radix2, combine_radix4, combine_radix8};
pub use dispatch::{BoxedKernel, KernelFactory, select_kernels};
pub use err::TukeyError;
pub use features::{FeatureSet, NO_SIMD_ENV};
pub use kernel::{FftKernel, KernelIsa, ScalarKernel, scratch_length};
pub use permutation::{Factorization, PermutationScheme, PermutationTable, compute_permutation};
pub use plan::{FftPlan, PlanOptions, Planner};
pub use pool::{BufferPool, IndexPool, PoolItem, PoolStats, SizedPool};
pub use traits::{FftSample, Precision};
pub use twiddles::{StageTwiddles, TwiddleTable, compute_twiddles, master_len};

#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub enum FftDirection {
    Forward,
    Inverse,
}

pub struct Tukey {}

impl Tukey {
    /// Plan on a fresh [`Planner`] over the detected CPU features.
    pub fn make_plan_f32(n: usize) -> Result<FftPlan<f32>, TukeyError> {
        Planner::<f32>::new().plan(n)
    }

    pub fn make_plan_f64(n: usize) -> Result<FftPlan<f64>, TukeyError> {
        Planner::<f64>::new().plan(n)
    }
}
