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
use num_traits::{AsPrimitive, Float, MulAdd, Num};
use std::fmt::Debug;
use std::ops::Neg;

/// Component precision of a complex sample.
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub enum Precision {
    /// `f32` components, 8 byte samples.
    Single,
    /// `f64` components, 16 byte samples.
    Double,
}

/// Scalar component type a transform operates on.
///
/// Implemented for `f32` and `f64` only; trigonometry is always evaluated in
/// `f64` and narrowed with [`FftSample::from_f64`].
pub trait FftSample:
    Float
    + Num
    + Neg<Output = Self>
    + MulAdd<Self, Output = Self>
    + AsPrimitive<f64>
    + Default
    + Debug
    + Send
    + Sync
    + 'static
{
    const PRECISION: Precision;

    fn from_f64(value: f64) -> Self;

    #[inline(always)]
    fn widen(self) -> f64 {
        self.as_()
    }
}

impl FftSample for f32 {
    const PRECISION: Precision = Precision::Single;

    #[inline(always)]
    fn from_f64(value: f64) -> Self {
        value as f32
    }
}

impl FftSample for f64 {
    const PRECISION: Precision = Precision::Double;

    #[inline(always)]
    fn from_f64(value: f64) -> Self {
        value
    }
}
