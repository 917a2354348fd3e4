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
use crate::features::FeatureSet;
use crate::kernel::{FftKernel, ScalarKernel};
use crate::permutation::Factorization;

pub type BoxedKernel<T> = Box<dyn FftKernel<T> + Send + Sync>;

/// Per-precision source of vector kernels.
pub trait KernelFactory: FftSample {
    /// Vector kernels usable under `features`, widest register first.
    fn vector_kernels(features: &FeatureSet) -> Vec<BoxedKernel<Self>>;
}

macro_rules! impl_kernel_factory {
    ($t:ty) => {
        impl KernelFactory for $t {
            #[allow(unused_variables, unused_mut)]
            fn vector_kernels(features: &FeatureSet) -> Vec<BoxedKernel<$t>> {
                let mut kernels: Vec<BoxedKernel<$t>> = Vec::new();
                #[cfg(all(target_arch = "x86_64", feature = "avx"))]
                if let Some(kernel) = crate::avx::AvxFmaKernel::<$t>::new(features) {
                    kernels.push(Box::new(kernel));
                }
                #[cfg(all(target_arch = "x86_64", feature = "sse"))]
                if let Some(kernel) = crate::sse::SseKernel::<$t>::new(features) {
                    kernels.push(Box::new(kernel));
                }
                #[cfg(all(target_arch = "aarch64", feature = "neon"))]
                if let Some(kernel) = crate::neon::NeonKernel::<$t>::new(features) {
                    kernels.push(Box::new(kernel));
                }
                kernels
            }
        }
    };
}

impl_kernel_factory!(f32);
impl_kernel_factory!(f64);

/// Ordered candidates for `factorization`: every vector kernel that supports
/// it, widest first, then the scalar kernel which supports everything.
pub fn select_kernels<T: KernelFactory>(
    factorization: &Factorization,
    features: &FeatureSet,
) -> Vec<BoxedKernel<T>> {
    let mut selected: Vec<BoxedKernel<T>> = T::vector_kernels(features)
        .into_iter()
        .filter(|kernel| {
            let accepted = kernel.supports(factorization);
            if !accepted {
                tracing::debug!(
                    n = factorization.length(),
                    scheme = factorization.scheme().name(),
                    isa = kernel.isa().name(),
                    "kernel does not support factorization"
                );
            }
            accepted
        })
        .collect();
    selected.push(Box::new(ScalarKernel));
    let candidates: Vec<&'static str> = selected.iter().map(|k| k.isa().name()).collect();
    tracing::debug!(
        n = factorization.length(),
        precision = ?T::PRECISION,
        ?candidates,
        "kernels selected"
    );
    selected
}
