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
use std::arch::x86_64::*;

#[inline]
#[target_feature(enable = "avx2", enable = "fma")]
pub(crate) unsafe fn _mm256_fcmul_pd(a: __m256d, b: __m256d) -> __m256d {
    // Swap real and imaginary parts of 'a' for FMA
    let a_yx = _mm256_permute_pd::<0b0101>(a); // [a_im, a_re, b_im, b_re]

    // Duplicate real and imaginary parts of 'b'
    let b_xx = _mm256_permute_pd::<0b0000>(b); // [c_re, c_re, d_re, d_re]
    let b_yy = _mm256_permute_pd::<0b1111>(b); // [c_im, c_im, d_im, d_im]

    // Compute (a_re*b_re - a_im*b_im) + i(a_re*b_im + a_im*b_re)
    _mm256_fmaddsub_pd(a, b_xx, _mm256_mul_pd(a_yx, b_yy))
}

#[inline]
#[target_feature(enable = "avx2", enable = "fma")]
pub(crate) unsafe fn _mm256_fcmul_ps(a: __m256, b: __m256) -> __m256 {
    let b_re = _mm256_moveldup_ps(b);
    let b_im = _mm256_movehdup_ps(b);
    let a_swap = _mm256_permute_ps::<0b10110001>(a); // [im, re, im, re, ...]

    // re = ar*br - ai*bi
    // im = ai*br + ar*bi
    _mm256_fmaddsub_ps(a, b_re, _mm256_mul_ps(a_swap, b_im))
}

/// Multiplies every complex lane by `-i`.
#[inline]
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn _mm256_rotate90_pd(v: __m256d) -> __m256d {
    let sign = _mm256_setr_pd(0.0, -0.0, 0.0, -0.0);
    _mm256_xor_pd(_mm256_permute_pd::<0b0101>(v), sign)
}

/// Multiplies every complex lane by `-i`.
#[inline]
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn _mm256_rotate90_ps(v: __m256) -> __m256 {
    let sign = _mm256_setr_ps(0.0, -0.0, 0.0, -0.0, 0.0, -0.0, 0.0, -0.0);
    _mm256_xor_ps(_mm256_permute_ps::<0b10110001>(v), sign)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureSet;
    use num_complex::Complex;

    #[test]
    fn test_fcmul_matches_scalar() {
        if !FeatureSet::detect().has_avx2_fma() {
            return;
        }
        let a = [Complex::new(1.5f64, -2.), Complex::new(0.25, 3.)];
        let b = [Complex::new(-0.5f64, 1.), Complex::new(2., 0.5)];
        let mut out = [Complex::<f64>::default(); 2];
        unsafe {
            let r = _mm256_fcmul_pd(
                _mm256_loadu_pd(a.as_ptr().cast()),
                _mm256_loadu_pd(b.as_ptr().cast()),
            );
            _mm256_storeu_pd(out.as_mut_ptr().cast(), r);
        }
        for i in 0..2 {
            assert!((out[i] - a[i] * b[i]).norm() < 1e-14);
        }

        let a = [
            Complex::new(1.5f32, -2.),
            Complex::new(0.25, 3.),
            Complex::new(-1., 1.),
            Complex::new(4., 0.),
        ];
        let mut out = [Complex::<f32>::default(); 4];
        unsafe {
            let r = _mm256_rotate90_ps(_mm256_loadu_ps(a.as_ptr().cast()));
            _mm256_storeu_ps(out.as_mut_ptr().cast(), r);
        }
        for i in 0..4 {
            assert_eq!(out[i], a[i] * Complex::new(0., -1.));
        }
    }
}
