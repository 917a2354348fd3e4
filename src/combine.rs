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
use crate::FftSample;
use crate::complex_fma::{c_mul_add_fast, c_mul_fast, rotate_90};
use crate::twiddles::StageTwiddles;
use num_complex::Complex;
use num_traits::Zero;

/// Radix-2 columns `from..L` of a block holding two length-`L` sub-results.
#[inline(always)]
pub(crate) fn radix2_columns<T: FftSample>(
    data: &mut [Complex<T>],
    twiddles: &[Complex<T>],
    from: usize,
) {
    let half = data.len() / 2;
    let (lo, hi) = data.split_at_mut(half);
    for ((a, b), &w) in lo[from..]
        .iter_mut()
        .zip(hi[from..].iter_mut())
        .zip(twiddles[from..half].iter())
    {
        let t = c_mul_fast(*b, w);
        let u = *a;
        *a = u + t;
        *b = u - t;
    }
}

/// Radix-4 columns `from..L` of a block holding four length-`L` sub-results.
#[inline(always)]
pub(crate) fn radix4_columns<T: FftSample>(
    data: &mut [Complex<T>],
    twiddles: &[Complex<T>],
    from: usize,
) {
    let quarter = data.len() / 4;
    unsafe {
        for j in from..quarter {
            let a = *data.get_unchecked(j);
            let b = c_mul_fast(*data.get_unchecked(j + quarter), *twiddles.get_unchecked(j));
            let c = c_mul_fast(
                *data.get_unchecked(j + 2 * quarter),
                *twiddles.get_unchecked(j + quarter),
            );
            let d = c_mul_fast(
                *data.get_unchecked(j + 3 * quarter),
                *twiddles.get_unchecked(j + 2 * quarter),
            );

            let t0 = a + c;
            let t1 = a - c;
            let t2 = b + d;
            let t3 = rotate_90(b - d);

            *data.get_unchecked_mut(j) = t0 + t2;
            *data.get_unchecked_mut(j + quarter) = t1 + t3;
            *data.get_unchecked_mut(j + 2 * quarter) = t0 - t2;
            *data.get_unchecked_mut(j + 3 * quarter) = t1 - t3;
        }
    }
}

/// Merges two length-`L` sub-transforms: `t = W^k sub1[k]`,
/// `out[k] = sub0[k] + t`, `out[k + L] = sub0[k] - t`.
///
/// `data` holds `2L` samples, `twiddles` holds `L` factors.
pub fn combine_radix2<T: FftSample>(data: &mut [Complex<T>], twiddles: &[Complex<T>]) {
    assert_eq!(data.len(), 2 * twiddles.len());
    radix2_columns(data, twiddles, 0);
}

/// Merges four length-`L` sub-transforms with the closed-form four point
/// butterfly.
///
/// `twiddles` holds `3L` factors: `W^k`, `W^{2k}` and `W^{3k}` rows.
pub fn combine_radix4<T: FftSample>(data: &mut [Complex<T>], twiddles: &[Complex<T>]) {
    assert_eq!(data.len() % 4, 0);
    assert_eq!(twiddles.len(), 3 * (data.len() / 4));
    radix4_columns(data, twiddles, 0);
}

/// Merges eight length-`L` sub-transforms by a direct eight point DFT of the
/// twiddled column.
pub fn combine_radix8<T: FftSample>(
    data: &mut [Complex<T>],
    twiddles: &[Complex<T>],
    roots: &[Complex<T>],
) {
    assert_eq!(data.len() % 8, 0);
    let sub_len = data.len() / 8;
    assert_eq!(twiddles.len(), 7 * sub_len);
    assert_eq!(roots.len(), 8);
    let mut column = [Complex::<T>::zero(); 8];
    for k in 0..sub_len {
        dft_column(data, twiddles, roots, &mut column, sub_len, k);
    }
}

/// Merges `radix` length-`L` sub-transforms by a direct DFT per column,
/// `O(radix²)` per column.
///
/// `scratch` must hold at least `radix` samples.
pub fn combine_general<T: FftSample>(
    radix: usize,
    data: &mut [Complex<T>],
    twiddles: &[Complex<T>],
    roots: &[Complex<T>],
    scratch: &mut [Complex<T>],
) {
    assert!(radix >= 2);
    assert_eq!(data.len() % radix, 0);
    let sub_len = data.len() / radix;
    assert_eq!(twiddles.len(), (radix - 1) * sub_len);
    assert_eq!(roots.len(), radix);
    let column = &mut scratch[..radix];
    for k in 0..sub_len {
        dft_column(data, twiddles, roots, column, sub_len, k);
    }
}

#[inline(always)]
fn dft_column<T: FftSample>(
    data: &mut [Complex<T>],
    twiddles: &[Complex<T>],
    roots: &[Complex<T>],
    column: &mut [Complex<T>],
    sub_len: usize,
    k: usize,
) {
    let radix = column.len();
    column[0] = data[k];
    for j in 1..radix {
        column[j] = c_mul_fast(data[j * sub_len + k], twiddles[(j - 1) * sub_len + k]);
    }
    for q in 0..radix {
        let mut acc = column[0];
        let mut root = 0usize;
        for &value in column[1..].iter() {
            root += q;
            if root >= radix {
                root -= radix;
            }
            acc = c_mul_add_fast(value, roots[root], acc);
        }
        data[q * sub_len + k] = acc;
    }
}

/// Applies one stage to every `radix * sub_len` block of `data`.
pub(crate) fn combine_stage<T: FftSample>(
    stage: &StageTwiddles<'_, T>,
    data: &mut [Complex<T>],
    scratch: &mut [Complex<T>],
) {
    let span = stage.radix * stage.sub_len;
    for block in data.chunks_exact_mut(span) {
        match stage.radix {
            2 => combine_radix2(block, stage.factors),
            4 => combine_radix4(block, stage.factors),
            8 => combine_radix8(block, stage.factors, stage.roots),
            radix => combine_general(radix, block, stage.factors, stage.roots, scratch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::dft;
    use crate::permutation::{Factorization, PermutationScheme, compute_permutation};
    use crate::twiddles::TwiddleTable;
    use rand::Rng;

    fn random_signal(n: usize) -> Vec<Complex<f64>> {
        (0..n)
            .map(|_| Complex {
                re: rand::rng().random(),
                im: rand::rng().random(),
            })
            .collect()
    }

    fn run_stages(n: usize, scheme: PermutationScheme, input: &[Complex<f64>]) -> Vec<Complex<f64>> {
        let f = Factorization::new(n, scheme).unwrap();
        let table = TwiddleTable::<f64>::new(f.clone()).unwrap();
        let perm = compute_permutation(n, scheme).unwrap();
        let mut data: Vec<Complex<f64>> = perm.iter().map(|&i| input[i]).collect();
        let mut scratch = vec![Complex::zero(); f.max_radix()];
        for stage in table.stages() {
            combine_stage(&stage, &mut data, &mut scratch);
        }
        data
    }

    fn assert_close(a: &[Complex<f64>], b: &[Complex<f64>], tolerance: f64) {
        assert_eq!(a.len(), b.len());
        for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
            assert!(
                (x.re - y.re).abs() < tolerance && (x.im - y.im).abs() < tolerance,
                "mismatch at {i}: {x} vs {y}"
            );
        }
    }

    #[test]
    fn test_radix2_single_column() {
        let mut data = vec![Complex::new(1f64, 2.), Complex::new(3., -1.)];
        combine_radix2(&mut data, &[Complex::new(1., 0.)]);
        assert_eq!(data, vec![Complex::new(4., 1.), Complex::new(-2., 3.)]);
    }

    #[test]
    fn test_radix4_impulse() {
        let mut data = vec![
            Complex::new(1f64, 0.),
            Complex::zero(),
            Complex::zero(),
            Complex::zero(),
        ];
        combine_radix4(&mut data, &[Complex::new(1., 0.); 3]);
        assert_eq!(data, vec![Complex::new(1., 0.); 4]);
    }

    #[test]
    fn test_radix4_matches_dft() {
        let input = random_signal(4);
        let mut data = vec![input[0], input[1], input[2], input[3]];
        combine_radix4(&mut data, &[Complex::new(1., 0.); 3]);
        assert_close(&data, &dft(&input), 1e-12);
    }

    #[test]
    fn test_radix8_matches_oracle() {
        let input = random_signal(8);
        let table = TwiddleTable::<f64>::new(Factorization::for_length(8).unwrap()).unwrap();
        let stage = table.stage(0);
        assert_eq!(stage.radix, 8);
        let mut data = input.clone();
        combine_radix8(&mut data, stage.factors, stage.roots);
        assert_close(&data, &dft(&input), 1e-10);
    }

    #[test]
    fn test_general_matches_oracle() {
        for radix in [3usize, 5, 7, 11] {
            let input = random_signal(radix);
            let table =
                TwiddleTable::<f64>::new(Factorization::for_length(radix).unwrap()).unwrap();
            let stage = table.stage(0);
            let mut data = input.clone();
            let mut scratch = vec![Complex::zero(); radix];
            combine_general(radix, &mut data, stage.factors, stage.roots, &mut scratch);
            assert_close(&data, &dft(&input), 1e-10);
        }
    }

    #[test]
    fn test_stage_sequences_match_oracle() {
        let cases = [
            (2usize, PermutationScheme::Radix2),
            (64, PermutationScheme::Radix2),
            (256, PermutationScheme::Radix4),
            (128, PermutationScheme::Mixed24),
            (64, PermutationScheme::Radix8),
            (360, PermutationScheme::MixedRadix),
            (49, PermutationScheme::MixedRadix),
            (26, PermutationScheme::MixedRadix),
        ];
        for (n, scheme) in cases {
            let input = random_signal(n);
            let result = run_stages(n, scheme, &input);
            assert_close(&result, &dft(&input), 1e-9);
        }
    }
}
