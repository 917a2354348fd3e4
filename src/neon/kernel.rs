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
use crate::features::{FeatureSet, has_valid_neon};
use crate::kernel::{FftKernel, KernelIsa, supports_radix_2_4};
use crate::neon::util::{mul_complex_f32, mul_complex_f64, v_rotate90_f32, v_rotate90_f64};
use crate::permutation::Factorization;
use crate::twiddles::{StageTwiddles, TwiddleTable};
use num_complex::Complex;
use std::arch::aarch64::*;
use std::marker::PhantomData;

/// 128-bit kernel: one `f64` or two `f32` samples per register.
pub(crate) struct NeonKernel<T> {
    phantom: PhantomData<T>,
}

impl<T> NeonKernel<T> {
    pub(crate) fn new(features: &FeatureSet) -> Option<NeonKernel<T>> {
        if features.neon && has_valid_neon() {
            Some(NeonKernel {
                phantom: PhantomData,
            })
        } else {
            None
        }
    }
}

impl FftKernel<f64> for NeonKernel<f64> {
    fn isa(&self) -> KernelIsa {
        KernelIsa::Neon
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
            // `new` checked NEON on the running CPU.
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

impl FftKernel<f32> for NeonKernel<f32> {
    fn isa(&self) -> KernelIsa {
        KernelIsa::Neon
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

#[target_feature(enable = "neon")]
unsafe fn radix2_f64(data: &mut [Complex<f64>], stage: &StageTwiddles<'_, f64>) {
    let half = stage.sub_len;
    let twiddles = stage.factors;
    unsafe {
        for block in data.chunks_exact_mut(2 * half) {
            let mut j = 0usize;
            while j < half {
                let a = vld1q_f64(block.get_unchecked(j..).as_ptr().cast());
                let b = vld1q_f64(block.get_unchecked(j + half..).as_ptr().cast());
                let w = vld1q_f64(twiddles.get_unchecked(j..).as_ptr().cast());
                let t = mul_complex_f64(b, w);
                vst1q_f64(
                    block.get_unchecked_mut(j..).as_mut_ptr().cast(),
                    vaddq_f64(a, t),
                );
                vst1q_f64(
                    block.get_unchecked_mut(j + half..).as_mut_ptr().cast(),
                    vsubq_f64(a, t),
                );
                j += 1;
            }
            radix2_columns(block, twiddles, j);
        }
    }
}

#[target_feature(enable = "neon")]
unsafe fn radix4_f64(data: &mut [Complex<f64>], stage: &StageTwiddles<'_, f64>) {
    let quarter = stage.sub_len;
    let twiddles = stage.factors;
    unsafe {
        let rot_sign = vld1q_f64([0.0f64, -0.0].as_ptr());
        for block in data.chunks_exact_mut(4 * quarter) {
            let mut j = 0usize;
            while j < quarter {
                let a = vld1q_f64(block.get_unchecked(j..).as_ptr().cast());
                let b = vld1q_f64(block.get_unchecked(j + quarter..).as_ptr().cast());
                let c = vld1q_f64(block.get_unchecked(j + 2 * quarter..).as_ptr().cast());
                let d = vld1q_f64(block.get_unchecked(j + 3 * quarter..).as_ptr().cast());

                let w1 = vld1q_f64(twiddles.get_unchecked(j..).as_ptr().cast());
                let w2 = vld1q_f64(twiddles.get_unchecked(j + quarter..).as_ptr().cast());
                let w3 =
                    vld1q_f64(twiddles.get_unchecked(j + 2 * quarter..).as_ptr().cast());

                let b = mul_complex_f64(b, w1);
                let c = mul_complex_f64(c, w2);
                let d = mul_complex_f64(d, w3);

                let t0 = vaddq_f64(a, c);
                let t1 = vsubq_f64(a, c);
                let t2 = vaddq_f64(b, d);
                let t3 = v_rotate90_f64(vsubq_f64(b, d), rot_sign);

                vst1q_f64(
                    block.get_unchecked_mut(j..).as_mut_ptr().cast(),
                    vaddq_f64(t0, t2),
                );
                vst1q_f64(
                    block.get_unchecked_mut(j + quarter..).as_mut_ptr().cast(),
                    vaddq_f64(t1, t3),
                );
                vst1q_f64(
                    block.get_unchecked_mut(j + 2 * quarter..).as_mut_ptr().cast(),
                    vsubq_f64(t0, t2),
                );
                vst1q_f64(
                    block.get_unchecked_mut(j + 3 * quarter..).as_mut_ptr().cast(),
                    vsubq_f64(t1, t3),
                );
                j += 1;
            }
            radix4_columns(block, twiddles, j);
        }
    }
}

#[target_feature(enable = "neon")]
unsafe fn radix2_f32(data: &mut [Complex<f32>], stage: &StageTwiddles<'_, f32>) {
    let half = stage.sub_len;
    let twiddles = stage.factors;
    unsafe {
        for block in data.chunks_exact_mut(2 * half) {
            let mut j = 0usize;
            while j + 2 <= half {
                let a = vld1q_f32(block.get_unchecked(j..).as_ptr().cast());
                let b = vld1q_f32(block.get_unchecked(j + half..).as_ptr().cast());
                let w = vld1q_f32(twiddles.get_unchecked(j..).as_ptr().cast());
                let t = mul_complex_f32(b, w);
                vst1q_f32(
                    block.get_unchecked_mut(j..).as_mut_ptr().cast(),
                    vaddq_f32(a, t),
                );
                vst1q_f32(
                    block.get_unchecked_mut(j + half..).as_mut_ptr().cast(),
                    vsubq_f32(a, t),
                );
                j += 2;
            }
            radix2_columns(block, twiddles, j);
        }
    }
}

#[target_feature(enable = "neon")]
unsafe fn radix4_f32(data: &mut [Complex<f32>], stage: &StageTwiddles<'_, f32>) {
    let quarter = stage.sub_len;
    let twiddles = stage.factors;
    unsafe {
        let rot_sign = vld1q_f32([0.0f32, -0.0, 0.0, -0.0].as_ptr());
        for block in data.chunks_exact_mut(4 * quarter) {
            let mut j = 0usize;
            while j + 2 <= quarter {
                let a = vld1q_f32(block.get_unchecked(j..).as_ptr().cast());
                let b = vld1q_f32(block.get_unchecked(j + quarter..).as_ptr().cast());
                let c = vld1q_f32(block.get_unchecked(j + 2 * quarter..).as_ptr().cast());
                let d = vld1q_f32(block.get_unchecked(j + 3 * quarter..).as_ptr().cast());

                let w1 = vld1q_f32(twiddles.get_unchecked(j..).as_ptr().cast());
                let w2 = vld1q_f32(twiddles.get_unchecked(j + quarter..).as_ptr().cast());
                let w3 =
                    vld1q_f32(twiddles.get_unchecked(j + 2 * quarter..).as_ptr().cast());

                let b = mul_complex_f32(b, w1);
                let c = mul_complex_f32(c, w2);
                let d = mul_complex_f32(d, w3);

                let t0 = vaddq_f32(a, c);
                let t1 = vsubq_f32(a, c);
                let t2 = vaddq_f32(b, d);
                let t3 = v_rotate90_f32(vsubq_f32(b, d), rot_sign);

                vst1q_f32(
                    block.get_unchecked_mut(j..).as_mut_ptr().cast(),
                    vaddq_f32(t0, t2),
                );
                vst1q_f32(
                    block.get_unchecked_mut(j + quarter..).as_mut_ptr().cast(),
                    vaddq_f32(t1, t3),
                );
                vst1q_f32(
                    block.get_unchecked_mut(j + 2 * quarter..).as_mut_ptr().cast(),
                    vsubq_f32(t0, t2),
                );
                vst1q_f32(
                    block.get_unchecked_mut(j + 3 * quarter..).as_mut_ptr().cast(),
                    vsubq_f32(t1, t3),
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
    fn test_neon_kernel_f64() {
        let Some(kernel) = NeonKernel::<f64>::new(&FeatureSet::detect()) else {
            return;
        };
        check_vector_kernel::<f64>(&kernel, 1e-10);
    }

    #[test]
    fn test_neon_kernel_f32() {
        let Some(kernel) = NeonKernel::<f32>::new(&FeatureSet::detect()) else {
            return;
        };
        check_vector_kernel::<f32>(&kernel, 1e-4);
    }

    #[test]
    fn test_neon_kernel_requires_features() {
        assert!(NeonKernel::<f32>::new(&FeatureSet::scalar_only()).is_none());
        let x86_only = FeatureSet {
            sse4_2: true,
            avx2: true,
            fma: true,
            ..FeatureSet::scalar_only()
        };
        assert!(NeonKernel::<f64>::new(&x86_only).is_none());
    }
}
