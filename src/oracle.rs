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
//! Naive `O(N²)` transforms used to check every kernel.

use num_complex::Complex;
use std::f64::consts::PI;

fn naive(input: &[Complex<f64>], sign: f64) -> Vec<Complex<f64>> {
    let n = input.len();
    (0..n)
        .map(|k| {
            input
                .iter()
                .enumerate()
                .fold(Complex::new(0., 0.), |acc, (j, &x)| {
                    let angle = sign * 2. * PI * ((j * k) % n) as f64 / n as f64;
                    acc + x * Complex::new(angle.cos(), angle.sin())
                })
        })
        .collect()
}

/// Unnormalised forward DFT.
pub(crate) fn dft(input: &[Complex<f64>]) -> Vec<Complex<f64>> {
    naive(input, -1.)
}

/// Unnormalised inverse DFT.
pub(crate) fn idft(input: &[Complex<f64>]) -> Vec<Complex<f64>> {
    naive(input, 1.)
}

pub(crate) fn widen<T: crate::FftSample>(input: &[Complex<T>]) -> Vec<Complex<f64>> {
    input
        .iter()
        .map(|x| Complex::new(x.re.widen(), x.im.widen()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oracle_round_trip() {
        let input: Vec<Complex<f64>> = (0..12)
            .map(|i| Complex::new(i as f64, -(i as f64) * 0.5))
            .collect();
        let back = idft(&dft(&input));
        for (a, b) in back.iter().zip(input.iter()) {
            assert!((a / 12. - b).norm() < 1e-12);
        }
    }
}
