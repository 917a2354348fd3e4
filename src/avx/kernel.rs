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
use crate::avx::util::{
    _mm256_fcmul_pd, _mm256_fcmul_ps, _mm256_rotate90_pd, _mm256_rotate90_ps,
};
use crate::combine::{combine_stage, radix2_columns, radix4_columns};
use crate::features::{FeatureSet, has_valid_avx};
use crate::kernel::{FftKernel, KernelIsa, supports_radix_2_4};
use crate::permutation::Factorization;
use crate::twiddles::{StageTwiddles, TwiddleTable};
use num_complex::Complex;
use std::arch::x86_64::*;
use std::marker::PhantomData;

/// 256-bit kernel: two `f64` or four `f32` samples per register.
pub(crate) struct AvxFmaKernel<T> {
    phantom: PhantomData<T>,
}

impl<T> AvxFmaKernel<T> {
    pub(crate) fn new(features: &FeatureSet) -> Option<AvxFmaKernel<T>> {
        if features.has_avx2_fma() && has_valid_avx() {
            Some(AvxFmaKernel {
                phantom: PhantomData,
            })
        } else {
            None
        }
    }
}

impl FftKernel<f64> for AvxFmaKernel<f64> {
    fn isa(&self) -> KernelIsa {
        KernelIsa::Avx2Fma
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
            // `new` checked AVX2 and FMA on the running CPU.
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

impl FftKernel<f32> for AvxFmaKernel<f32> {
    fn isa(&self) -> KernelIsa {
        KernelIsa::Avx2Fma
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

#[target_feature(enable = "avx2", enable = "fma")]
unsafe fn radix2_f64(data: &mut [Complex<f64>], stage: &StageTwiddles<'_, f64>) {
    let half = stage.sub_len;
    let twiddles = stage.factors;
    unsafe {
        for block in data.chunks_exact_mut(2 * half) {
            let mut j = 0usize;
            while j + 2 <= half {
                let a = _mm256_loadu_pd(block.get_unchecked(j..).as_ptr().cast());
                let b = _mm256_loadu_pd(block.get_unchecked(j + half..).as_ptr().cast());
                let w = _mm256_loadu_pd(twiddles.get_unchecked(j..).as_ptr().cast());
                let t = _mm256_fcmul_pd(b, w);
                _mm256_storeu_pd(
                    block.get_unchecked_mut(j..).as_mut_ptr().cast(),
                    _mm256_add_pd(a, t),
                );
                _mm256_storeu_pd(
                    block.get_unchecked_mut(j + half..).as_mut_ptr().cast(),
                    _mm256_sub_pd(a, t),
                );
                j += 2;
            }
            radix2_columns(block, twiddles, j);
        }
    }
}

#[target_feature(enable = "avx2", enable = "fma")]
unsafe fn radix4_f64(data: &mut [Complex<f64>], stage: &StageTwiddles<'_, f64>) {
    let quarter = stage.sub_len;
    let twiddles = stage.factors;
    unsafe {
        for block in data.chunks_exact_mut(4 * quarter) {
            let mut j = 0usize;
            while j + 2 <= quarter {
                let a = _mm256_loadu_pd(block.get_unchecked(j..).as_ptr().cast());
                let b = _mm256_loadu_pd(block.get_unchecked(j + quarter..).as_ptr().cast());
                let c = _mm256_loadu_pd(block.get_unchecked(j + 2 * quarter..).as_ptr().cast());
                let d = _mm256_loadu_pd(block.get_unchecked(j + 3 * quarter..).as_ptr().cast());

                let w1 = _mm256_loadu_pd(twiddles.get_unchecked(j..).as_ptr().cast());
                let w2 = _mm256_loadu_pd(twiddles.get_unchecked(j + quarter..).as_ptr().cast());
                let w3 =
                    _mm256_loadu_pd(twiddles.get_unchecked(j + 2 * quarter..).as_ptr().cast());

                let b = _mm256_fcmul_pd(b, w1);
                let c = _mm256_fcmul_pd(c, w2);
                let d = _mm256_fcmul_pd(d, w3);

                let t0 = _mm256_add_pd(a, c);
                let t1 = _mm256_sub_pd(a, c);
                let t2 = _mm256_add_pd(b, d);
                let t3 = _mm256_rotate90_pd(_mm256_sub_pd(b, d));

                _mm256_storeu_pd(
                    block.get_unchecked_mut(j..).as_mut_ptr().cast(),
                    _mm256_add_pd(t0, t2),
                );
                _mm256_storeu_pd(
                    block.get_unchecked_mut(j + quarter..).as_mut_ptr().cast(),
                    _mm256_add_pd(t1, t3),
                );
                _mm256_storeu_pd(
                    block.get_unchecked_mut(j + 2 * quarter..).as_mut_ptr().cast(),
                    _mm256_sub_pd(t0, t2),
                );
                _mm256_storeu_pd(
                    block.get_unchecked_mut(j + 3 * quarter..).as_mut_ptr().cast(),
                    _mm256_sub_pd(t1, t3),
                );
                j += 2;
            }
            radix4_columns(block, twiddles, j);
        }
    }
}

#[target_feature(enable = "avx2", enable = "fma")]
unsafe fn radix2_f32(data: &mut [Complex<f32>], stage: &StageTwiddles<'_, f32>) {
    let half = stage.sub_len;
    let twiddles = stage.factors;
    unsafe {
        for block in data.chunks_exact_mut(2 * half) {
            let mut j = 0usize;
            while j + 4 <= half {
                let a = _mm256_loadu_ps(block.get_unchecked(j..).as_ptr().cast());
                let b = _mm256_loadu_ps(block.get_unchecked(j + half..).as_ptr().cast());
                let w = _mm256_loadu_ps(twiddles.get_unchecked(j..).as_ptr().cast());
                let t = _mm256_fcmul_ps(b, w);
                _mm256_storeu_ps(
                    block.get_unchecked_mut(j..).as_mut_ptr().cast(),
                    _mm256_add_ps(a, t),
                );
                _mm256_storeu_ps(
                    block.get_unchecked_mut(j + half..).as_mut_ptr().cast(),
                    _mm256_sub_ps(a, t),
                );
                j += 4;
            }
            radix2_columns(block, twiddles, j);
        }
    }
}

#[target_feature(enable = "avx2", enable = "fma")]
unsafe fn radix4_f32(data: &mut [Complex<f32>], stage: &StageTwiddles<'_, f32>) {
    let quarter = stage.sub_len;
    let twiddles = stage.factors;
    unsafe {
        for block in data.chunks_exact_mut(4 * quarter) {
            let mut j = 0usize;
            while j + 4 <= quarter {
                let a = _mm256_loadu_ps(block.get_unchecked(j..).as_ptr().cast());
                let b = _mm256_loadu_ps(block.get_unchecked(j + quarter..).as_ptr().cast());
                let c = _mm256_loadu_ps(block.get_unchecked(j + 2 * quarter..).as_ptr().cast());
                let d = _mm256_loadu_ps(block.get_unchecked(j + 3 * quarter..).as_ptr().cast());

                let w1 = _mm256_loadu_ps(twiddles.get_unchecked(j..).as_ptr().cast());
                let w2 = _mm256_loadu_ps(twiddles.get_unchecked(j + quarter..).as_ptr().cast());
                let w3 =
                    _mm256_loadu_ps(twiddles.get_unchecked(j + 2 * quarter..).as_ptr().cast());

                let b = _mm256_fcmul_ps(b, w1);
                let c = _mm256_fcmul_ps(c, w2);
                let d = _mm256_fcmul_ps(d, w3);

                let t0 = _mm256_add_ps(a, c);
                let t1 = _mm256_sub_ps(a, c);
                let t2 = _mm256_add_ps(b, d);
                let t3 = _mm256_rotate90_ps(_mm256_sub_ps(b, d));

                _mm256_storeu_ps(
                    block.get_unchecked_mut(j..).as_mut_ptr().cast(),
                    _mm256_add_ps(t0, t2),
                );
                _mm256_storeu_ps(
                    block.get_unchecked_mut(j + quarter..).as_mut_ptr().cast(),
                    _mm256_add_ps(t1, t3),
                );
                _mm256_storeu_ps(
                    block.get_unchecked_mut(j + 2 * quarter..).as_mut_ptr().cast(),
                    _mm256_sub_ps(t0, t2),
                );
                _mm256_storeu_ps(
                    block.get_unchecked_mut(j + 3 * quarter..).as_mut_ptr().cast(),
                    _mm256_sub_ps(t1, t3),
                );
                j += 4;
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
    fn test_avx_kernel_f64() {
        let Some(kernel) = AvxFmaKernel::<f64>::new(&FeatureSet::detect()) else {
            return;
        };
        check_vector_kernel::<f64>(&kernel, 1e-10);
    }

    #[test]
    fn test_avx_kernel_f32() {
        let Some(kernel) = AvxFmaKernel::<f32>::new(&FeatureSet::detect()) else {
            return;
        };
        check_vector_kernel::<f32>(&kernel, 1e-4);
    }

    #[test]
    fn test_avx_kernel_requires_features() {
        assert!(AvxFmaKernel::<f32>::new(&FeatureSet::scalar_only()).is_none());
        let sse_only = FeatureSet {
            sse4_2: true,
            ..FeatureSet::scalar_only()
        };
        assert!(AvxFmaKernel::<f64>::new(&sse_only).is_none());
    }
}
