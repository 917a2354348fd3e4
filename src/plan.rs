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
use crate::dispatch::{BoxedKernel, KernelFactory, select_kernels};
use crate::features::FeatureSet;
use crate::kernel::{KernelIsa, scratch_length};
use crate::permutation::{Factorization, PermutationScheme, PermutationTable};
use crate::pool::{BufferPool, IndexPool};
use crate::twiddles::TwiddleTable;
use crate::{FftDirection, FftSample, TukeyError};
use num_complex::Complex;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Knobs for [`Planner::plan_with_options`].
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct PlanOptions {
    /// Radix scheme to decompose with; `None` picks
    /// [`PermutationScheme::default_for`].
    pub scheme: Option<PermutationScheme>,
}

impl PlanOptions {
    pub fn with_scheme(scheme: PermutationScheme) -> PlanOptions {
        PlanOptions {
            scheme: Some(scheme),
        }
    }
}

type SharedTables<T> = (Arc<TwiddleTable<T>>, Arc<PermutationTable>);

/// Builds plans and shares their precomputed tables.
///
/// Twiddle and permutation tables are cached per factorization, so every plan
/// of the same length and scheme reads the same immutable tables. Table
/// storage and execution scratch come from the planner's pools.
pub struct Planner<T: KernelFactory> {
    features: FeatureSet,
    pool: Arc<BufferPool<T>>,
    index_pool: Arc<IndexPool>,
    cache: Mutex<HashMap<Factorization, SharedTables<T>>>,
}

impl<T: KernelFactory> Default for Planner<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: KernelFactory> Planner<T> {
    /// Planner over the process-wide [`FeatureSet::current`] snapshot.
    pub fn new() -> Planner<T> {
        Planner::with_features(FeatureSet::current())
    }

    pub fn with_features(features: FeatureSet) -> Planner<T> {
        Planner::with_pool(features, Arc::new(BufferPool::new()))
    }

    /// Planner drawing buffers from a pool shared with other planners.
    pub fn with_pool(features: FeatureSet, pool: Arc<BufferPool<T>>) -> Planner<T> {
        Planner {
            features,
            pool,
            index_pool: Arc::new(IndexPool::new()),
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn features(&self) -> FeatureSet {
        self.features
    }

    pub fn pool(&self) -> &Arc<BufferPool<T>> {
        &self.pool
    }

    pub fn index_pool(&self) -> &Arc<IndexPool> {
        &self.index_pool
    }

    pub fn plan(&self, n: usize) -> Result<FftPlan<T>, TukeyError> {
        self.plan_with_options(n, PlanOptions::default())
    }

    pub fn plan_with_options(
        &self,
        n: usize,
        options: PlanOptions,
    ) -> Result<FftPlan<T>, TukeyError> {
        if n == 0 {
            return Err(TukeyError::ZeroSizedFft);
        }
        let scheme = options
            .scheme
            .unwrap_or_else(|| PermutationScheme::default_for(n));
        let factorization = Factorization::new(n, scheme)?;
        let (twiddles, permutation) = self.tables(&factorization)?;
        let kernels = select_kernels::<T>(&factorization, &self.features);

        tracing::debug!(
            n,
            scheme = scheme.name(),
            radices = ?factorization.radices(),
            isa = kernels[0].isa().name(),
            "plan created"
        );

        Ok(FftPlan {
            factorization,
            kernels,
            twiddles,
            permutation,
            pool: self.pool.clone(),
        })
    }

    fn tables(&self, factorization: &Factorization) -> Result<SharedTables<T>, TukeyError> {
        let mut cache = self.cache.lock();
        if let Some((twiddles, permutation)) = cache.get(factorization) {
            return Ok((twiddles.clone(), permutation.clone()));
        }
        let twiddles = Arc::new(TwiddleTable::new_pooled(
            factorization.clone(),
            &self.pool,
        )?);
        let indices = self
            .index_pool
            .acquire(factorization.length())?
            .unwrap_or_default();
        let permutation = Arc::new(PermutationTable::with_storage(
            factorization.clone(),
            indices,
        ));
        cache.insert(
            factorization.clone(),
            (twiddles.clone(), permutation.clone()),
        );
        Ok((twiddles, permutation))
    }

    /// Number of factorizations with cached tables.
    pub fn cached_tables(&self) -> usize {
        self.cache.lock().len()
    }

    /// Drops the table cache. Tables no live plan still holds go back to the
    /// pools.
    pub fn clear_cache(&self) {
        let drained: Vec<SharedTables<T>> = self.cache.lock().drain().map(|(_, v)| v).collect();
        for (twiddles, permutation) in drained {
            if let Ok(table) = Arc::try_unwrap(twiddles) {
                for buffer in table.into_buffers() {
                    self.pool.release(buffer.len(), buffer);
                }
            }
            if let Ok(table) = Arc::try_unwrap(permutation) {
                let indices = table.into_indices();
                self.index_pool.release(indices.len(), indices);
            }
        }
    }
}

/// Prepared transform of one length.
///
/// Holds its candidate kernels in preference order together with shared,
/// read-only tables; a plan can be used from many threads at once.
pub struct FftPlan<T: FftSample> {
    factorization: Factorization,
    kernels: Vec<BoxedKernel<T>>,
    twiddles: Arc<TwiddleTable<T>>,
    permutation: Arc<PermutationTable>,
    pool: Arc<BufferPool<T>>,
}

impl<T: FftSample> FftPlan<T> {
    pub fn length(&self) -> usize {
        self.factorization.length()
    }

    pub fn scheme(&self) -> PermutationScheme {
        self.factorization.scheme()
    }

    pub fn factorization(&self) -> &Factorization {
        &self.factorization
    }

    /// Family of the preferred kernel.
    pub fn kernel_isa(&self) -> KernelIsa {
        self.kernels
            .first()
            .map(|kernel| kernel.isa())
            .unwrap_or(KernelIsa::Scalar)
    }

    /// Every candidate, in the order they are tried.
    pub fn kernel_isas(&self) -> Vec<KernelIsa> {
        self.kernels.iter().map(|kernel| kernel.isa()).collect()
    }

    /// Scratch samples the `*_with_scratch` entry points require.
    pub fn scratch_length(&self) -> usize {
        scratch_length(&self.factorization)
    }

    /// Unnormalised forward transform; `src.len()` may be any multiple of the
    /// plan length and each chunk is transformed on its own.
    pub fn forward(&self, dst: &mut [Complex<T>], src: &[Complex<T>]) -> Result<(), TukeyError> {
        self.execute_pooled(FftDirection::Forward, |plan, scratch| {
            plan.execute(FftDirection::Forward, dst, src, scratch)
        })
    }

    /// Unnormalised inverse transform: `inverse(forward(x)) == N * x`.
    pub fn inverse(&self, dst: &mut [Complex<T>], src: &[Complex<T>]) -> Result<(), TukeyError> {
        self.execute_pooled(FftDirection::Inverse, |plan, scratch| {
            plan.execute(FftDirection::Inverse, dst, src, scratch)
        })
    }

    pub fn forward_with_scratch(
        &self,
        dst: &mut [Complex<T>],
        src: &[Complex<T>],
        scratch: &mut [Complex<T>],
    ) -> Result<(), TukeyError> {
        self.execute(FftDirection::Forward, dst, src, scratch)
    }

    pub fn inverse_with_scratch(
        &self,
        dst: &mut [Complex<T>],
        src: &[Complex<T>],
        scratch: &mut [Complex<T>],
    ) -> Result<(), TukeyError> {
        self.execute(FftDirection::Inverse, dst, src, scratch)
    }

    pub fn forward_in_place(&self, data: &mut [Complex<T>]) -> Result<(), TukeyError> {
        self.execute_pooled(FftDirection::Forward, |plan, scratch| {
            plan.execute_in_place(FftDirection::Forward, data, scratch)
        })
    }

    pub fn inverse_in_place(&self, data: &mut [Complex<T>]) -> Result<(), TukeyError> {
        self.execute_pooled(FftDirection::Inverse, |plan, scratch| {
            plan.execute_in_place(FftDirection::Inverse, data, scratch)
        })
    }

    pub fn forward_in_place_with_scratch(
        &self,
        data: &mut [Complex<T>],
        scratch: &mut [Complex<T>],
    ) -> Result<(), TukeyError> {
        self.execute_in_place(FftDirection::Forward, data, scratch)
    }

    pub fn inverse_in_place_with_scratch(
        &self,
        data: &mut [Complex<T>],
        scratch: &mut [Complex<T>],
    ) -> Result<(), TukeyError> {
        self.execute_in_place(FftDirection::Inverse, data, scratch)
    }

    fn execute_pooled(
        &self,
        direction: FftDirection,
        run: impl FnOnce(&Self, &mut [Complex<T>]) -> Result<(), TukeyError>,
    ) -> Result<(), TukeyError> {
        let required = self.scratch_length();
        let Some(mut scratch) = self.pool.acquire(required)? else {
            return Err(TukeyError::OutOfMemory(required));
        };
        tracing::trace!(n = self.length(), ?direction, required, "pooled scratch");
        let result = run(self, scratch.as_mut_slice());
        self.pool.release(required, scratch);
        result
    }

    fn check_lengths(&self, dst_len: usize, src_len: usize) -> Result<(), TukeyError> {
        let n = self.length();
        if src_len == 0 || src_len % n != 0 {
            return Err(TukeyError::InvalidSizeMultiplier(src_len, n));
        }
        if dst_len != src_len {
            return Err(TukeyError::BufferLengthMismatch(src_len, dst_len));
        }
        Ok(())
    }

    fn check_scratch(&self, scratch: &[Complex<T>]) -> Result<(), TukeyError> {
        let required = self.scratch_length();
        if scratch.len() < required {
            return Err(TukeyError::ScratchBufferIsTooSmall(scratch.len(), required));
        }
        Ok(())
    }

    fn execute(
        &self,
        direction: FftDirection,
        dst: &mut [Complex<T>],
        src: &[Complex<T>],
        scratch: &mut [Complex<T>],
    ) -> Result<(), TukeyError> {
        self.check_lengths(dst.len(), src.len())?;
        self.check_scratch(scratch)?;
        let n = self.length();
        for (dst, src) in dst.chunks_exact_mut(n).zip(src.chunks_exact(n)) {
            self.dispatch(direction, |kernel| match direction {
                FftDirection::Forward => {
                    kernel.forward(dst, src, &self.twiddles, scratch, &self.permutation)
                }
                FftDirection::Inverse => {
                    kernel.inverse(dst, src, &self.twiddles, scratch, &self.permutation)
                }
            })?;
        }
        Ok(())
    }

    fn execute_in_place(
        &self,
        direction: FftDirection,
        data: &mut [Complex<T>],
        scratch: &mut [Complex<T>],
    ) -> Result<(), TukeyError> {
        self.check_lengths(data.len(), data.len())?;
        self.check_scratch(scratch)?;
        let n = self.length();
        for chunk in data.chunks_exact_mut(n) {
            self.dispatch(direction, |kernel| match direction {
                FftDirection::Forward => {
                    kernel.forward_in_place(chunk, &self.twiddles, scratch, &self.permutation)
                }
                FftDirection::Inverse => {
                    kernel.inverse_in_place(chunk, &self.twiddles, scratch, &self.permutation)
                }
            })?;
        }
        Ok(())
    }

    /// Offers the chunk to each kernel in turn until one accepts it.
    fn dispatch(
        &self,
        direction: FftDirection,
        mut attempt: impl FnMut(&BoxedKernel<T>) -> bool,
    ) -> Result<(), TukeyError> {
        for kernel in self.kernels.iter() {
            if attempt(kernel) {
                return Ok(());
            }
            tracing::debug!(
                n = self.length(),
                ?direction,
                isa = kernel.isa().name(),
                "kernel declined, falling back"
            );
        }
        Err(TukeyError::NoKernelAccepted(self.length()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::tests::random_signal;
    use crate::kernel::{FftKernel, ScalarKernel};
    use crate::Tukey;
    use crate::oracle::{dft, widen};
    use num_traits::Zero;

    fn assert_round_trip<T: FftSample>(plan: &FftPlan<T>, tolerance: f64) {
        let n = plan.length();
        let src = random_signal::<T>(n);
        let mut spectrum = vec![Complex::<T>::zero(); n];
        let mut restored = vec![Complex::<T>::zero(); n];
        plan.forward(&mut spectrum, &src).unwrap();
        plan.inverse(&mut restored, &spectrum).unwrap();
        for (i, (a, b)) in widen(&restored).iter().zip(widen(&src).iter()).enumerate() {
            assert!(
                (a - b * n as f64).norm() < tolerance * n as f64,
                "round trip mismatch at {i} for n {n}: {a} vs {}",
                b * n as f64
            );
        }
    }

    #[test]
    fn test_round_trip_f32_and_f64() {
        let planner32 = Planner::<f32>::new();
        let planner64 = Planner::<f64>::new();
        let sizes = (1..=64usize).chain([96, 100, 128, 243, 256, 360, 512, 1000, 1024, 4096]);
        for n in sizes {
            assert_round_trip(&planner32.plan(n).unwrap(), 1e-5);
            assert_round_trip(&planner64.plan(n).unwrap(), 1e-10);
        }
    }

    #[test]
    fn test_forward_matches_oracle() {
        let planner = Planner::<f64>::new();
        for n in [1usize, 2, 3, 4, 5, 8, 16, 27, 32, 60, 64, 210, 256] {
            let plan = planner.plan(n).unwrap();
            let src = random_signal::<f64>(n);
            let mut dst = vec![Complex::zero(); n];
            plan.forward(&mut dst, &src).unwrap();
            let expected = dft(&src);
            for (a, b) in dst.iter().zip(expected.iter()) {
                assert!((a - b).norm() < 1e-10, "n {n}: {a} vs {b}");
            }
        }
    }

    #[test]
    fn test_impulse_spectrum() {
        let plan = Tukey::make_plan_f32(4).unwrap();
        let src = [
            Complex::new(1f32, 0.),
            Complex::zero(),
            Complex::zero(),
            Complex::zero(),
        ];
        let mut dst = [Complex::<f32>::zero(); 4];
        plan.forward(&mut dst, &src).unwrap();
        for value in dst {
            assert!((value - Complex::new(1., 0.)).norm() < 1e-7);
        }
    }

    #[test]
    fn test_all_kernels_agree() {
        let scalar = Planner::<f32>::with_features(FeatureSet::scalar_only());
        let narrower = FeatureSet {
            sse4_2: true,
            neon: true,
            ..FeatureSet::scalar_only()
        };
        for features in [FeatureSet::detect(), narrower] {
            let vector = Planner::<f32>::with_features(features);
            for n in [2usize, 4, 8, 16, 32, 64, 128, 256, 1024, 2048] {
                let a = scalar.plan(n).unwrap();
                let b = vector.plan(n).unwrap();
                assert_eq!(a.kernel_isa(), KernelIsa::Scalar);
                if !features.has_avx2_fma() {
                    assert_ne!(b.kernel_isa(), KernelIsa::Avx2Fma);
                }
                let src = random_signal::<f32>(n);
                let mut out_a = vec![Complex::zero(); n];
                let mut out_b = vec![Complex::zero(); n];
                a.forward(&mut out_a, &src).unwrap();
                b.forward(&mut out_b, &src).unwrap();
                let scale = (n as f32).sqrt();
                for (x, y) in out_a.iter().zip(out_b.iter()) {
                    assert!((x - y).norm() < 1e-5 * scale, "n {n} {:?}", b.kernel_isa());
                }
            }
        }
    }

    #[test]
    fn test_injected_features_cannot_exceed_cpu() {
        let claimed = FeatureSet {
            sse4_2: true,
            avx2: true,
            fma: true,
            neon: true,
        };
        let detected = FeatureSet::detect();
        let planner = Planner::<f64>::with_features(claimed);
        for n in [16usize, 64, 1024] {
            let plan = planner.plan(n).unwrap();
            for isa in plan.kernel_isas() {
                let available = match isa {
                    KernelIsa::Avx2Fma => detected.has_avx2_fma(),
                    KernelIsa::Sse42 => detected.sse4_2,
                    KernelIsa::Neon => detected.neon,
                    KernelIsa::Scalar => true,
                };
                assert!(available, "{isa:?} planned on a CPU without it");
            }
            assert_round_trip(&plan, 1e-10);
        }
    }

    #[test]
    fn test_in_place_matches_out_of_place() {
        let planner = Planner::<f64>::new();
        for n in [1usize, 6, 8, 16, 64, 100, 128, 1024] {
            let plan = planner.plan(n).unwrap();
            let src = random_signal::<f64>(3 * n);
            let mut out = vec![Complex::zero(); 3 * n];
            plan.forward(&mut out, &src).unwrap();
            let mut data = src.clone();
            plan.forward_in_place(&mut data).unwrap();
            assert_eq!(data, out);

            let mut back = vec![Complex::zero(); 3 * n];
            plan.inverse(&mut back, &out).unwrap();
            plan.inverse_in_place(&mut data).unwrap();
            assert_eq!(data, back);
        }
    }

    #[test]
    fn test_batched_chunks_are_independent() {
        let plan = Tukey::make_plan_f64(16).unwrap();
        let src = random_signal::<f64>(64);
        let mut batched = vec![Complex::zero(); 64];
        plan.forward(&mut batched, &src).unwrap();
        for (chunk_src, chunk_dst) in src.chunks_exact(16).zip(batched.chunks_exact(16)) {
            let mut single = vec![Complex::zero(); 16];
            plan.forward(&mut single, chunk_src).unwrap();
            assert_eq!(single.as_slice(), chunk_dst);
        }
    }

    #[test]
    fn test_length_errors() {
        let plan = Tukey::make_plan_f32(8).unwrap();
        let src = vec![Complex::<f32>::zero(); 12];
        let mut dst = vec![Complex::<f32>::zero(); 12];
        assert_eq!(
            plan.forward(&mut dst, &src),
            Err(TukeyError::InvalidSizeMultiplier(12, 8))
        );
        let src = vec![Complex::<f32>::zero(); 16];
        assert_eq!(
            plan.forward(&mut dst, &src),
            Err(TukeyError::BufferLengthMismatch(16, 12))
        );
        assert_eq!(
            plan.inverse_in_place(&mut []),
            Err(TukeyError::InvalidSizeMultiplier(0, 8))
        );
        let mut dst = vec![Complex::<f32>::zero(); 16];
        let mut scratch = vec![Complex::<f32>::zero(); 3];
        assert_eq!(
            plan.forward_with_scratch(&mut dst, &src, &mut scratch),
            Err(TukeyError::ScratchBufferIsTooSmall(3, plan.scratch_length()))
        );
        assert!(matches!(
            Planner::<f64>::new().plan(0),
            Err(TukeyError::ZeroSizedFft)
        ));
    }

    #[test]
    fn test_explicit_schemes() {
        let planner = Planner::<f64>::new();
        for scheme in [
            PermutationScheme::Radix2,
            PermutationScheme::Radix4,
            PermutationScheme::Mixed24,
            PermutationScheme::MixedRadix,
        ] {
            let plan = planner
                .plan_with_options(256, PlanOptions::with_scheme(scheme))
                .unwrap();
            assert_eq!(plan.scheme(), scheme);
            assert_round_trip(&plan, 1e-10);
        }
        let plan = planner
            .plan_with_options(512, PlanOptions::with_scheme(PermutationScheme::Radix8))
            .unwrap();
        assert_eq!(plan.kernel_isa(), KernelIsa::Scalar);
        assert_round_trip(&plan, 1e-10);
        assert!(matches!(
            planner.plan_with_options(100, PlanOptions::with_scheme(PermutationScheme::Radix2)),
            Err(TukeyError::SchemeMismatch(100, "radix-2"))
        ));
    }

    #[test]
    fn test_tables_are_shared_and_recycled() {
        let planner = Planner::<f32>::with_features(FeatureSet::scalar_only());
        let a = planner.plan(64).unwrap();
        let b = planner.plan(64).unwrap();
        assert!(Arc::ptr_eq(&a.twiddles, &b.twiddles));
        assert!(Arc::ptr_eq(&a.permutation, &b.permutation));
        assert_eq!(planner.cached_tables(), 1);

        drop(a);
        drop(b);
        planner.clear_cache();
        assert_eq!(planner.cached_tables(), 0);
        assert_eq!(planner.index_pool().idle(64), 1);
        assert!(planner.pool().idle(32) >= 1);

        let misses = planner.pool().stats().misses;
        let c = planner.plan(64).unwrap();
        assert_eq!(planner.pool().stats().misses, misses);
        assert_round_trip(&c, 1e-5);
    }

    #[test]
    fn test_scratch_is_pooled() {
        let planner = Planner::<f64>::new();
        let plan = planner.plan(128).unwrap();
        let src = random_signal::<f64>(128);
        let mut dst = vec![Complex::zero(); 128];
        for _ in 0..10 {
            plan.forward(&mut dst, &src).unwrap();
        }
        assert_eq!(planner.pool().idle(plan.scratch_length()), 1);
    }

    struct Declining;

    impl FftKernel<f64> for Declining {
        fn isa(&self) -> KernelIsa {
            KernelIsa::Avx2Fma
        }

        fn supports(&self, _: &Factorization) -> bool {
            false
        }

        fn butterflies(&self, _: &mut [Complex<f64>], _: &TwiddleTable<f64>, _: &mut [Complex<f64>]) {}
    }

    fn plan_with_kernels(n: usize, kernels: Vec<BoxedKernel<f64>>) -> FftPlan<f64> {
        let factorization = Factorization::for_length(n).unwrap();
        FftPlan {
            twiddles: Arc::new(TwiddleTable::new(factorization.clone()).unwrap()),
            permutation: Arc::new(PermutationTable::new(factorization.clone()).unwrap()),
            factorization,
            kernels,
            pool: Arc::new(BufferPool::new()),
        }
    }

    #[test]
    fn test_falls_back_when_kernel_declines() {
        let kernels: Vec<BoxedKernel<f64>> = vec![Box::new(Declining), Box::new(ScalarKernel)];
        let plan = plan_with_kernels(32, kernels);
        assert_eq!(plan.kernel_isas(), vec![KernelIsa::Avx2Fma, KernelIsa::Scalar]);
        assert_round_trip(&plan, 1e-10);
    }

    #[test]
    fn test_no_kernel_accepted() {
        let kernels: Vec<BoxedKernel<f64>> = vec![Box::new(Declining)];
        let plan = plan_with_kernels(32, kernels);
        let src = random_signal::<f64>(32);
        let mut dst = vec![Complex::zero(); 32];
        assert_eq!(
            plan.forward(&mut dst, &src),
            Err(TukeyError::NoKernelAccepted(32))
        );
    }

    #[test]
    fn test_plan_shared_across_threads() {
        let plan = Arc::new(Tukey::make_plan_f32(256).unwrap());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let plan = plan.clone();
                std::thread::spawn(move || {
                    for _ in 0..20 {
                        assert_round_trip(&plan, 1e-5);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    }
}
