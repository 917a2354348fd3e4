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
use crate::combine::combine_stage;
use crate::permutation::{Factorization, PermutationTable};
use crate::twiddles::TwiddleTable;
use crate::{FftDirection, FftSample};
use num_complex::Complex;

/// Instruction family a kernel is built on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub enum KernelIsa {
    Scalar,
    Sse42,
    Neon,
    Avx2Fma,
}

impl KernelIsa {
    pub fn name(&self) -> &'static str {
        match self {
            KernelIsa::Scalar => "scalar",
            KernelIsa::Sse42 => "sse4.2",
            KernelIsa::Neon => "neon",
            KernelIsa::Avx2Fma => "avx2+fma",
        }
    }
}

/// Scratch samples a kernel needs for a transform of `factorization`.
///
/// The first `length()` samples hold the input copy of in-place calls, the
/// rest serves the general radix combine.
pub fn scratch_length(factorization: &Factorization) -> usize {
    factorization.length() + factorization.max_radix()
}

/// Stage radices the vector kernels accelerate.
#[allow(dead_code)]
pub(crate) fn supports_radix_2_4(factorization: &Factorization) -> bool {
    factorization
        .radices()
        .iter()
        .all(|&radix| radix == 2 || radix == 4)
}

/// One complete transform of a fixed length.
///
/// All kernels are interchangeable: for identical inputs they agree to within
/// rounding, and a kernel that cannot handle its inputs returns `false`
/// without touching the destination.
pub trait FftKernel<T: FftSample>: Send + Sync {
    fn isa(&self) -> KernelIsa;

    /// Whether every stage radix of `factorization` is handled.
    fn supports(&self, factorization: &Factorization) -> bool;

    /// Runs all butterfly stages over data already in permuted order.
    fn butterflies(
        &self,
        data: &mut [Complex<T>],
        twiddles: &TwiddleTable<T>,
        scratch: &mut [Complex<T>],
    );

    fn forward(
        &self,
        dst: &mut [Complex<T>],
        src: &[Complex<T>],
        twiddles: &TwiddleTable<T>,
        scratch: &mut [Complex<T>],
        permutation: &PermutationTable,
    ) -> bool {
        execute_kernel(
            self,
            FftDirection::Forward,
            dst,
            src,
            twiddles,
            scratch,
            permutation,
        )
    }

    fn inverse(
        &self,
        dst: &mut [Complex<T>],
        src: &[Complex<T>],
        twiddles: &TwiddleTable<T>,
        scratch: &mut [Complex<T>],
        permutation: &PermutationTable,
    ) -> bool {
        execute_kernel(
            self,
            FftDirection::Inverse,
            dst,
            src,
            twiddles,
            scratch,
            permutation,
        )
    }

    fn forward_in_place(
        &self,
        data: &mut [Complex<T>],
        twiddles: &TwiddleTable<T>,
        scratch: &mut [Complex<T>],
        permutation: &PermutationTable,
    ) -> bool {
        execute_kernel_in_place(
            self,
            FftDirection::Forward,
            data,
            twiddles,
            scratch,
            permutation,
        )
    }

    fn inverse_in_place(
        &self,
        data: &mut [Complex<T>],
        twiddles: &TwiddleTable<T>,
        scratch: &mut [Complex<T>],
        permutation: &PermutationTable,
    ) -> bool {
        execute_kernel_in_place(
            self,
            FftDirection::Inverse,
            data,
            twiddles,
            scratch,
            permutation,
        )
    }
}

fn accepts<T: FftSample, K: FftKernel<T> + ?Sized>(
    kernel: &K,
    n: usize,
    twiddles: &TwiddleTable<T>,
    permutation: &PermutationTable,
) -> bool {
    twiddles.len() == n
        && permutation.len() == n
        && permutation.factorization() == twiddles.factorization()
        && kernel.supports(twiddles.factorization())
}

/// Gather, stages, and the conjugation pair that turns the forward table
/// into an inverse transform.
pub(crate) fn execute_kernel<T: FftSample, K: FftKernel<T> + ?Sized>(
    kernel: &K,
    direction: FftDirection,
    dst: &mut [Complex<T>],
    src: &[Complex<T>],
    twiddles: &TwiddleTable<T>,
    scratch: &mut [Complex<T>],
    permutation: &PermutationTable,
) -> bool {
    let n = src.len();
    if dst.len() != n
        || scratch.len() < twiddles.factorization().max_radix()
        || !accepts(kernel, n, twiddles, permutation)
    {
        return false;
    }

    match direction {
        FftDirection::Forward => {
            for (dst, &index) in dst.iter_mut().zip(permutation.indices()) {
                *dst = src[index];
            }
        }
        FftDirection::Inverse => {
            for (dst, &index) in dst.iter_mut().zip(permutation.indices()) {
                *dst = src[index].conj();
            }
        }
    }

    kernel.butterflies(dst, twiddles, scratch);

    if direction == FftDirection::Inverse {
        for value in dst.iter_mut() {
            *value = value.conj();
        }
    }
    true
}

pub(crate) fn execute_kernel_in_place<T: FftSample, K: FftKernel<T> + ?Sized>(
    kernel: &K,
    direction: FftDirection,
    data: &mut [Complex<T>],
    twiddles: &TwiddleTable<T>,
    scratch: &mut [Complex<T>],
    permutation: &PermutationTable,
) -> bool {
    let n = data.len();
    if scratch.len() < scratch_length(twiddles.factorization())
        || !accepts(kernel, n, twiddles, permutation)
    {
        return false;
    }
    let (copy, rest) = scratch.split_at_mut(n);
    copy.copy_from_slice(data);
    execute_kernel(kernel, direction, data, copy, twiddles, rest, permutation)
}

/// Portable kernel; handles every factorization.
#[derive(Debug, Default, Copy, Clone)]
pub struct ScalarKernel;

impl<T: FftSample> FftKernel<T> for ScalarKernel {
    fn isa(&self) -> KernelIsa {
        KernelIsa::Scalar
    }

    fn supports(&self, _: &Factorization) -> bool {
        true
    }

    fn butterflies(
        &self,
        data: &mut [Complex<T>],
        twiddles: &TwiddleTable<T>,
        scratch: &mut [Complex<T>],
    ) {
        for stage in twiddles.stages() {
            combine_stage(&stage, data, scratch);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::oracle::{dft, widen};
    use crate::permutation::PermutationScheme;
    use num_traits::Zero;
    use rand::Rng;

    pub(crate) fn random_signal<T: FftSample>(n: usize) -> Vec<Complex<T>> {
        (0..n)
            .map(|_| Complex {
                re: T::from_f64(rand::rng().random::<f64>() - 0.5),
                im: T::from_f64(rand::rng().random::<f64>() - 0.5),
            })
            .collect()
    }

    pub(crate) fn tables<T: FftSample>(
        n: usize,
        scheme: PermutationScheme,
    ) -> (TwiddleTable<T>, PermutationTable) {
        let f = Factorization::new(n, scheme).unwrap();
        (
            TwiddleTable::new(f.clone()).unwrap(),
            PermutationTable::new(f).unwrap(),
        )
    }

    /// Checks forward against the oracle, round trip, and in-place agreement.
    pub(crate) fn check_kernel<T: FftSample>(
        kernel: &dyn FftKernel<T>,
        n: usize,
        scheme: PermutationScheme,
        tolerance: f64,
    ) {
        let (twiddles, permutation) = tables::<T>(n, scheme);
        let mut scratch = vec![Complex::<T>::zero(); scratch_length(twiddles.factorization())];
        let src = random_signal::<T>(n);
        let mut spectrum = vec![Complex::<T>::zero(); n];
        assert!(kernel.forward(&mut spectrum, &src, &twiddles, &mut scratch, &permutation));

        let expected = dft(&widen(&src));
        let scale = (n as f64).sqrt().max(1.);
        for (i, (a, b)) in widen(&spectrum).iter().zip(expected.iter()).enumerate() {
            assert!(
                (a - b).norm() < tolerance * scale,
                "{} forward mismatch at {i} for n {n} {scheme:?}: {a} vs {b}",
                kernel.isa().name()
            );
        }

        let mut restored = vec![Complex::<T>::zero(); n];
        assert!(kernel.inverse(&mut restored, &spectrum, &twiddles, &mut scratch, &permutation));
        for (i, (a, b)) in widen(&restored).iter().zip(widen(&src).iter()).enumerate() {
            assert!(
                (a / n as f64 - b).norm() < tolerance,
                "{} round trip mismatch at {i} for n {n} {scheme:?}",
                kernel.isa().name()
            );
        }

        let mut in_place = src.clone();
        assert!(kernel.forward_in_place(&mut in_place, &twiddles, &mut scratch, &permutation));
        assert_eq!(in_place, spectrum);
        assert!(kernel.inverse_in_place(&mut in_place, &twiddles, &mut scratch, &permutation));
        assert_eq!(in_place, restored);
    }

    /// Power-of-two coverage for kernels restricted to radix-2 and radix-4.
    #[allow(dead_code)]
    pub(crate) fn check_vector_kernel<T: FftSample>(kernel: &dyn FftKernel<T>, tolerance: f64) {
        for bits in 0..12 {
            let n = 1usize << bits;
            check_kernel(kernel, n, PermutationScheme::Radix2, tolerance);
            check_kernel(kernel, n, PermutationScheme::Mixed24, tolerance);
            if bits % 2 == 0 {
                check_kernel(kernel, n, PermutationScheme::Radix4, tolerance);
            }
        }

        for (n, scheme) in [
            (64usize, PermutationScheme::Radix8),
            (12, PermutationScheme::MixedRadix),
            (45, PermutationScheme::MixedRadix),
        ] {
            let (twiddles, permutation) = tables::<T>(n, scheme);
            assert!(!kernel.supports(twiddles.factorization()));
            let src = random_signal::<T>(n);
            let mut dst = vec![Complex::<T>::zero(); n];
            let mut scratch = vec![Complex::<T>::zero(); 2 * n];
            assert!(!kernel.forward(&mut dst, &src, &twiddles, &mut scratch, &permutation));
            assert!(dst.iter().all(|x| x.is_zero()));
        }
    }

    #[test]
    fn test_scalar_kernel_all_schemes() {
        let kernel = ScalarKernel;
        for bits in 0..11 {
            let n = 1usize << bits;
            check_kernel::<f64>(&kernel, n, PermutationScheme::Radix2, 1e-10);
            check_kernel::<f32>(&kernel, n, PermutationScheme::Mixed24, 1e-4);
        }
        for n in [1usize, 4, 16, 256, 1024] {
            check_kernel::<f64>(&kernel, n, PermutationScheme::Radix4, 1e-10);
        }
        for n in [1usize, 8, 64, 512] {
            check_kernel::<f64>(&kernel, n, PermutationScheme::Radix8, 1e-10);
            check_kernel::<f32>(&kernel, n, PermutationScheme::Radix8, 1e-4);
        }
        for n in [3usize, 6, 10, 12, 15, 30, 97, 100, 360] {
            check_kernel::<f64>(&kernel, n, PermutationScheme::MixedRadix, 1e-10);
            check_kernel::<f32>(&kernel, n, PermutationScheme::MixedRadix, 1e-4);
        }
    }

    #[test]
    fn test_impulse_n4() {
        let (twiddles, permutation) = tables::<f64>(4, PermutationScheme::Radix4);
        let mut scratch = vec![Complex::zero(); 8];
        let src: Vec<Complex<f64>> = vec![
            Complex::new(1., 0.),
            Complex::zero(),
            Complex::zero(),
            Complex::zero(),
        ];
        let mut dst = vec![Complex::<f64>::zero(); 4];
        assert!(ScalarKernel.forward(&mut dst, &src, &twiddles, &mut scratch, &permutation));
        for value in dst {
            assert!((value - Complex::new(1., 0.)).norm() < 1e-15);
        }
    }

    #[test]
    fn test_declines_mismatched_inputs() {
        let (twiddles, permutation) = tables::<f32>(16, PermutationScheme::Radix4);
        let (_, other_permutation) = tables::<f32>(16, PermutationScheme::Radix2);
        let src = random_signal::<f32>(16);
        let mut scratch = vec![Complex::zero(); 32];

        let mut short = vec![Complex::zero(); 15];
        assert!(!ScalarKernel.forward(&mut short, &src, &twiddles, &mut scratch, &permutation));

        let mut dst = vec![Complex::zero(); 16];
        assert!(!ScalarKernel.forward(&mut dst, &src, &twiddles, &mut scratch, &other_permutation));
        assert!(dst.iter().all(|x| x.is_zero()));

        let mut tiny_scratch = vec![Complex::zero(); 4];
        let mut data = src.clone();
        assert!(!ScalarKernel.forward_in_place(
            &mut data,
            &twiddles,
            &mut tiny_scratch,
            &permutation
        ));
        assert_eq!(data, src);
    }
}
