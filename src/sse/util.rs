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
#[target_feature(enable = "sse4.2")]
pub(crate) unsafe fn _mm_mul_complex_pd(a: __m128d, b: __m128d) -> __m128d {
    let b_re = _mm_unpacklo_pd(b, b);
    let b_im = _mm_unpackhi_pd(b, b);
    let a_swap = _mm_shuffle_pd::<0b01>(a, a);
    // [ar*br - ai*bi, ai*br + ar*bi]
    _mm_addsub_pd(_mm_mul_pd(a, b_re), _mm_mul_pd(a_swap, b_im))
}

#[inline]
#[target_feature(enable = "sse4.2")]
pub(crate) unsafe fn _mm_mul_complex_ps(a: __m128, b: __m128) -> __m128 {
    let b_re = _mm_moveldup_ps(b);
    let b_im = _mm_movehdup_ps(b);
    let a_swap = _mm_shuffle_ps::<0xB1>(a, a);
    _mm_addsub_ps(_mm_mul_ps(a, b_re), _mm_mul_ps(a_swap, b_im))
}

/// Multiplies every complex lane by `-i`.
#[inline]
#[target_feature(enable = "sse4.2")]
pub(crate) unsafe fn _mm_rotate90_pd(v: __m128d) -> __m128d {
    _mm_xor_pd(_mm_shuffle_pd::<0b01>(v, v), _mm_setr_pd(0.0, -0.0))
}

/// Multiplies every complex lane by `-i`.
#[inline]
#[target_feature(enable = "sse4.2")]
pub(crate) unsafe fn _mm_rotate90_ps(v: __m128) -> __m128 {
    _mm_xor_ps(
        _mm_shuffle_ps::<0xB1>(v, v),
        _mm_setr_ps(0.0, -0.0, 0.0, -0.0),
    )
}
