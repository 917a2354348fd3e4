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
use std::sync::OnceLock;

/// Environment switch that forces [`FeatureSet::current`] to scalar only.
pub const NO_SIMD_ENV: &str = "TUKEY_NO_SIMD";

/// Vector extensions available to the kernels.
///
/// Fields can be set directly to restrict dispatch, e.g. in tests or to pin a
/// deployment to a known instruction set.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct FeatureSet {
    pub sse4_2: bool,
    pub avx2: bool,
    pub fma: bool,
    pub neon: bool,
}

static CURRENT: OnceLock<FeatureSet> = OnceLock::new();

/// Whether the running CPU executes the AVX2+FMA kernels, whatever a
/// caller-built [`FeatureSet`] claims.
#[cfg(all(target_arch = "x86_64", feature = "avx"))]
pub(crate) fn has_valid_avx() -> bool {
    std::arch::is_x86_feature_detected!("avx2") && std::arch::is_x86_feature_detected!("fma")
}

#[cfg(all(target_arch = "x86_64", feature = "sse"))]
pub(crate) fn has_valid_sse() -> bool {
    std::arch::is_x86_feature_detected!("sse4.2")
}

#[cfg(all(target_arch = "aarch64", feature = "neon"))]
pub(crate) fn has_valid_neon() -> bool {
    std::arch::is_aarch64_feature_detected!("neon")
}

impl FeatureSet {
    pub const fn scalar_only() -> FeatureSet {
        FeatureSet {
            sse4_2: false,
            avx2: false,
            fma: false,
            neon: false,
        }
    }

    /// Queries the running CPU. Extensions whose cargo feature is disabled are
    /// reported as absent.
    pub fn detect() -> FeatureSet {
        #[allow(unused_mut)]
        let mut features = FeatureSet::scalar_only();
        #[cfg(all(target_arch = "x86_64", feature = "sse"))]
        {
            features.sse4_2 = has_valid_sse();
        }
        #[cfg(all(target_arch = "x86_64", feature = "avx"))]
        {
            features.avx2 = std::arch::is_x86_feature_detected!("avx2");
            features.fma = std::arch::is_x86_feature_detected!("fma");
        }
        #[cfg(all(target_arch = "aarch64", feature = "neon"))]
        {
            features.neon = has_valid_neon();
        }
        features
    }

    /// Process-wide snapshot, detected on first use.
    ///
    /// Setting `TUKEY_NO_SIMD` to anything but `0` or an empty string before
    /// the first call pins the snapshot to [`FeatureSet::scalar_only`].
    pub fn current() -> FeatureSet {
        *CURRENT.get_or_init(|| {
            let disabled = std::env::var(NO_SIMD_ENV)
                .map(|v| !v.is_empty() && v != "0")
                .unwrap_or(false);
            let features = if disabled {
                FeatureSet::scalar_only()
            } else {
                FeatureSet::detect()
            };
            tracing::debug!(?features, disabled, "cpu features");
            features
        })
    }

    pub fn has_avx2_fma(&self) -> bool {
        self.avx2 && self.fma
    }

    pub fn is_scalar_only(&self) -> bool {
        !(self.sse4_2 || self.avx2 || self.fma || self.neon)
    }
}
