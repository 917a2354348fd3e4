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
use crate::combine::{combine_stage, radix2_columns, radix4_columns};
use crate::features::{FeatureSet, has_valid_sse};
use crate::kernel::{FftKernel, KernelIsa, supports_radix_2_4};
use crate::permutation::Factorization;
use crate::sse::util::{_mm_mul_complex_pd, _mm_mul_complex_ps, _mm_rotate90_pd, _mm_rotate90_ps};
use crate::twiddles::{StageTwiddles, TwiddleTable};
use num_complex::Complex;
use std::arch::x86_64::*;
use std::marker::PhantomData;

/// 128-bit kernel: one `f64` or two `f32` samples per register.
pub(crate) struct SseKernel<T> {
    phantom: PhantomData<T>,
}

impl<T> SseKernel<T> {
    pub(crate) fn new(features: &FeatureSet) -> Option<SseKernel<T>> {
        if features.sse4_2 && has_valid_sse() {
            Some(SseKernel {
                phantom: PhantomData,
            })
        } else {
            None
        }
    }
}

impl FftKernel<f64> for SseKernel<f64> {
    fn isa(&self) -> KernelIsa {
        KernelIsa::Sse42
    }

    fn supports(&self, factorization: &Factorization) -> bool {
        supports_radix_2_4(factorization)
    }

    fn butterflies(
        &self,
        data: &mut [Complex<f64>],
        twiddles: &TwiddleTable<f64>,
        scratch: &mut [Complex<f64>],
    ) {
        for stage in twiddles.stages() {
            // `new` checked SSE4.2 on the running CPU.
            unsafe {
                match stage.radix {
                    2 => radix2_f64(data, &stage),
                    4 => radix4_f64(data, &stage),
                    _ => combine_stage(&stage, data, scratch),
                }
            }
        }
    }
}

impl FftKernel<f32> for SseKernel<f32> {
    fn isa(&self) -> KernelIsa {
        KernelIsa::Sse42
    }

    fn supports(&self, factorization: &Factorization) -> bool {
        supports_radix_2_4(factorization)
    }

    fn butterflies(
        &self,
        data: &mut [Complex<f32>],
        twiddles: &TwiddleTable<f32>,
        scratch: &mut [Complex<f32>],
    ) {
        for stage in twiddles.stages() {
            unsafe {
                match stage.radix {
                    2 => radix2_f32(data, &stage),
                    4 => radix4_f32(data, &stage),
                    _ => combine_stage(&stage, data, scratch),
                }
            }
        }
    }
}

#[target_feature(enable = "sse4.2")]
unsafe fn radix2_f64(data: &mut [Complex<f64>], stage: &StageTwiddles<'_, f64>) {
    let half = stage.sub_len;
    let twiddles = stage.factors;
    unsafe {
        for block in data.chunks_exact_mut(2 * half) {
            let mut j = 0usize;
            while j < half {
                let a = _mm_loadu_pd(block.get_unchecked(j..).as_ptr().cast());
                let b = _mm_loadu_pd(block.get_unchecked(j + half..).as_ptr().cast());
                let w = _mm_loadu_pd(twiddles.get_unchecked(j..).as_ptr().cast());
                let t = _mm_mul_complex_pd(b, w);
                _mm_storeu_pd(
                    block.get_unchecked_mut(j..).as_mut_ptr().cast(),
                    _mm_add_pd(a, t),
                );
                _mm_storeu_pd(
                    block.get_unchecked_mut(j + half..).as_mut_ptr().cast(),
                    _mm_sub_pd(a, t),
                );
                j += 1;
            }
            radix2_columns(block, twiddles, j);
        }
    }
}

#[target_feature(enable = "sse4.2")]
unsafe fn radix4_f64(data: &mut [Complex<f64>], stage: &StageTwiddles<'_, f64>) {
    let quarter = stage.sub_len;
    let twiddles = stage.factors;
    unsafe {
        for block in data.chunks_exact_mut(4 * quarter) {
            let mut j = 0usize;
            while j < quarter {
                let a = _mm_loadu_pd(block.get_unchecked(j..).as_ptr().cast());
                let b = _mm_loadu_pd(block.get_unchecked(j + quarter..).as_ptr().cast());
                let c = _mm_loadu_pd(block.get_unchecked(j + 2 * quarter..).as_ptr().cast());
                let d = _mm_loadu_pd(block.get_unchecked(j + 3 * quarter..).as_ptr().cast());

                let w1 = _mm_loadu_pd(twiddles.get_unchecked(j..).as_ptr().cast());
                let w2 = _mm_loadu_pd(twiddles.get_unchecked(j + quarter..).as_ptr().cast());
                let w3 =
                    _mm_loadu_pd(twiddles.get_unchecked(j + 2 * quarter..).as_ptr().cast());

                let b = _mm_mul_complex_pd(b, w1);
                let c = _mm_mul_complex_pd(c, w2);
                let d = _mm_mul_complex_pd(d, w3);

                let t0 = _mm_add_pd(a, c);
                let t1 = _mm_sub_pd(a, c);
                let t2 = _mm_add_pd(b, d);
                let t3 = _mm_rotate90_pd(_mm_sub_pd(b, d));

                _mm_storeu_pd(
                    block.get_unchecked_mut(j..).as_mut_ptr().cast(),
                    _mm_add_pd(t0, t2),
                );
                _mm_storeu_pd(
                    block.get_unchecked_mut(j + quarter..).as_mut_ptr().cast(),
                    _mm_add_pd(t1, t3),
                );
                _mm_storeu_pd(
                    block.get_unchecked_mut(j + 2 * quarter..).as_mut_ptr().cast(),
                    _mm_sub_pd(t0, t2),
                );
                _mm_storeu_pd(
                    block.get_unchecked_mut(j + 3 * quarter..).as_mut_ptr().cast(),
                    _mm_sub_pd(t1, t3),
                );
                j += 1;
            }
            radix4_columns(block, twiddles, j);
        }
    }
}

#[target_feature(enable = "sse4.2")]
unsafe fn radix2_f32(data: &mut [Complex<f32>], stage: &StageTwiddles<'_, f32>) {
    let half = stage.sub_len;
    let twiddles = stage.factors;
    unsafe {
        for block in data.chunks_exact_mut(2 * half) {
            let mut j = 0usize;
            while j + 2 <= half {
                let a = _mm_loadu_ps(block.get_unchecked(j..).as_ptr().cast());
                let b = _mm_loadu_ps(block.get_unchecked(j + half..).as_ptr().cast());
                let w = _mm_loadu_ps(twiddles.get_unchecked(j..).as_ptr().cast());
                let t = _mm_mul_complex_ps(b, w);
                _mm_storeu_ps(
                    block.get_unchecked_mut(j..).as_mut_ptr().cast(),
                    _mm_add_ps(a, t),
                );
                _mm_storeu_ps(
                    block.get_unchecked_mut(j + half..).as_mut_ptr().cast(),
                    _mm_sub_ps(a, t),
                );
                j += 2;
            }
            radix2_columns(block, twiddles, j);
        }
    }
}

#[target_feature(enable = "sse4.2")]
unsafe fn radix4_f32(data: &mut [Complex<f32>], stage: &StageTwiddles<'_, f32>) {
    let quarter = stage.sub_len;
    let twiddles = stage.factors;
    unsafe {
        for block in data.chunks_exact_mut(4 * quarter) {
            let mut j = 0usize;
            while j + 2 <= quarter {
                let a = _mm_loadu_ps(block.get_unchecked(j..).as_ptr().cast());
                let b = _mm_loadu_ps(block.get_unchecked(j + quarter..).as_ptr().cast());
                let c = _mm_loadu_ps(block.get_unchecked(j + 2 * quarter..).as_ptr().cast());
                let d = _mm_loadu_ps(block.get_unchecked(j + 3 * quarter..).as_ptr().cast());

                let w1 = _mm_loadu_ps(twiddles.get_unchecked(j..).as_ptr().cast());
                let w2 = _mm_loadu_ps(twiddles.get_unchecked(j + quarter..).as_ptr().cast());
                let w3 =
                    _mm_loadu_ps(twiddles.get_unchecked(j + 2 * quarter..).as_ptr().cast());

                let b = _mm_mul_complex_ps(b, w1);
                let c = _mm_mul_complex_ps(c, w2);
                let d = _mm_mul_complex_ps(d, w3);

                let t0 = _mm_add_ps(a, c);
                let t1 = _mm_sub_ps(a, c);
                let t2 = _mm_add_ps(b, d);
                let t3 = _mm_rotate90_ps(_mm_sub_ps(b, d));

                _mm_storeu_ps(
                    block.get_unchecked_mut(j..).as_mut_ptr().cast(),
                    _mm_add_ps(t0, t2),
                );
                _mm_storeu_ps(
                    block.get_unchecked_mut(j + quarter..).as_mut_ptr().cast(),
                    _mm_add_ps(t1, t3),
                );
                _mm_storeu_ps(
                    block.get_unchecked_mut(j + 2 * quarter..).as_mut_ptr().cast(),
                    _mm_sub_ps(t0, t2),
                );
                _mm_storeu_ps(
                    block.get_unchecked_mut(j + 3 * quarter..).as_mut_ptr().cast(),
                    _mm_sub_ps(t1, t3),
                );
                j += 2;
            }
            radix4_columns(block, twiddles, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::tests::check_vector_kernel;

    #[test]
    fn test_sse_kernel_f64() {
        let Some(kernel) = SseKernel::<f64>::new(&FeatureSet::detect()) else {
            return;
        };
        check_vector_kernel::<f64>(&kernel, 1e-10);
    }

    #[test]
    fn test_sse_kernel_f32() {
        let Some(kernel) = SseKernel::<f32>::new(&FeatureSet::detect()) else {
            return;
        };
        check_vector_kernel::<f32>(&kernel, 1e-4);
    }

    #[test]
    fn test_sse_kernel_requires_features() {
        assert!(SseKernel::<f32>::new(&FeatureSet::scalar_only()).is_none());
        let avx_only = FeatureSet {
            avx2: true,
            fma: true,
            ..FeatureSet::scalar_only()
        };
        assert!(SseKernel::<f64>::new(&avx_only).is_none());
    }
}
