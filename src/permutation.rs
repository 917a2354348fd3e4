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
use crate::TukeyError;
use crate::err::try_vec;
use num_integer::Integer;

/// Digit-reversal family used to order the input before the butterfly stages.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub enum PermutationScheme {
    /// Bit reversal, every stage radix-2.
    Radix2,
    /// Base-4 digit reversal, every stage radix-4.
    Radix4,
    /// Power of two: one leading radix-2 stage when needed, then radix-4.
    Mixed24,
    /// Base-8 digit reversal, every stage radix-8.
    Radix8,
    /// Any length: radix-4 stages, at most one radix-2, then odd primes.
    MixedRadix,
}

impl PermutationScheme {
    pub fn name(&self) -> &'static str {
        match self {
            PermutationScheme::Radix2 => "radix-2",
            PermutationScheme::Radix4 => "radix-4",
            PermutationScheme::Mixed24 => "mixed radix-2/4",
            PermutationScheme::Radix8 => "radix-8",
            PermutationScheme::MixedRadix => "mixed radix",
        }
    }

    /// Scheme picked when the caller does not ask for one.
    pub fn default_for(n: usize) -> PermutationScheme {
        if n == 8 {
            PermutationScheme::Radix8
        } else if n.is_power_of_two() && n.trailing_zeros() % 2 == 0 {
            PermutationScheme::Radix4
        } else if n.is_power_of_two() {
            PermutationScheme::Mixed24
        } else {
            PermutationScheme::MixedRadix
        }
    }
}

/// Ordered stage radices of a transform length under one scheme.
///
/// `radices()[0]` is the first butterfly stage, merging single samples; the
/// product of all radices equals `length()`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Factorization {
    length: usize,
    scheme: PermutationScheme,
    radices: Vec<usize>,
}

fn log_exact(n: usize, base: usize) -> Option<usize> {
    let mut value = n;
    let mut exponent = 0;
    while value > 1 {
        let (q, r) = value.div_rem(&base);
        if r != 0 {
            return None;
        }
        value = q;
        exponent += 1;
    }
    Some(exponent)
}

fn mixed_radices(n: usize) -> Vec<usize> {
    let mut radices = Vec::new();
    let mut rem = n;
    while rem.is_multiple_of(4) {
        radices.push(4);
        rem /= 4;
    }
    if rem.is_multiple_of(2) {
        radices.push(2);
        rem /= 2;
    }
    let mut p = 3;
    while rem > 1 {
        if p * p > rem {
            radices.push(rem);
            break;
        }
        let (q, r) = rem.div_rem(&p);
        if r == 0 {
            radices.push(p);
            rem = q;
        } else {
            p += 2;
        }
    }
    radices
}

impl Factorization {
    pub fn new(n: usize, scheme: PermutationScheme) -> Result<Factorization, TukeyError> {
        if n == 0 {
            return Err(TukeyError::ZeroSizedFft);
        }
        let mismatch = TukeyError::SchemeMismatch(n, scheme.name());
        let radices = match scheme {
            PermutationScheme::Radix2 => vec![2; log_exact(n, 2).ok_or(mismatch)?],
            PermutationScheme::Radix4 => vec![4; log_exact(n, 4).ok_or(mismatch)?],
            PermutationScheme::Radix8 => vec![8; log_exact(n, 8).ok_or(mismatch)?],
            PermutationScheme::Mixed24 => {
                let bits = log_exact(n, 2).ok_or(mismatch)?;
                let mut radices = Vec::with_capacity(bits / 2 + 1);
                if bits % 2 == 1 {
                    radices.push(2);
                }
                radices.extend(std::iter::repeat_n(4, bits / 2));
                radices
            }
            PermutationScheme::MixedRadix => mixed_radices(n),
        };
        Ok(Factorization {
            length: n,
            scheme,
            radices,
        })
    }

    /// Factorization under [`PermutationScheme::default_for`].
    pub fn for_length(n: usize) -> Result<Factorization, TukeyError> {
        Factorization::new(n, PermutationScheme::default_for(n))
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn scheme(&self) -> PermutationScheme {
        self.scheme
    }

    pub fn radices(&self) -> &[usize] {
        &self.radices
    }

    /// Largest stage radix, 1 for the trivial length.
    pub fn max_radix(&self) -> usize {
        self.radices.iter().copied().max().unwrap_or(1)
    }

    /// Yields `(radix, sub_len)` for every stage in execution order.
    pub fn stages(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.radices.iter().scan(1usize, |sub_len, &radix| {
            let current = *sub_len;
            *sub_len *= radix;
            Some((radix, current))
        })
    }
}

/// Writes the gather order for `factorization` into `indices`.
///
/// After the gather `dst[i] = src[indices[i]]`, every stage finds its
/// sub-transforms stored contiguously.
pub(crate) fn fill_permutation(factorization: &Factorization, indices: &mut [usize]) {
    let n = factorization.length();
    assert_eq!(indices.len(), n);
    for source in 0..n {
        let mut rem = source;
        let mut stride = n;
        let mut position = 0;
        for &radix in factorization.radices().iter().rev() {
            stride /= radix;
            let (q, r) = rem.div_rem(&radix);
            position += r * stride;
            rem = q;
        }
        indices[position] = source;
    }
}

/// Permutation for `n` samples under `scheme`.
pub fn compute_permutation(n: usize, scheme: PermutationScheme) -> Result<Vec<usize>, TukeyError> {
    let factorization = Factorization::new(n, scheme)?;
    let mut indices = try_vec![0usize; n];
    fill_permutation(&factorization, &mut indices);
    Ok(indices)
}

/// Gather order tagged with the factorization it was generated for.
#[derive(Debug)]
pub struct PermutationTable {
    factorization: Factorization,
    indices: Vec<usize>,
}

impl PermutationTable {
    pub fn new(factorization: Factorization) -> Result<PermutationTable, TukeyError> {
        let indices = try_vec![0usize; factorization.length()];
        Ok(PermutationTable::with_storage(factorization, indices))
    }

    /// Builds the table into caller-provided storage of exactly `length()`
    /// elements, typically taken from an index pool.
    pub fn with_storage(factorization: Factorization, mut indices: Vec<usize>) -> PermutationTable {
        indices.resize(factorization.length(), 0);
        fill_permutation(&factorization, &mut indices);
        PermutationTable {
            factorization,
            indices,
        }
    }

    pub fn factorization(&self) -> &Factorization {
        &self.factorization
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn into_indices(self) -> Vec<usize> {
        self.indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bit_reverse_indices(n: usize) -> Vec<usize> {
        let bits = n.trailing_zeros();
        (0..n)
            .map(|i| i.reverse_bits() >> (usize::BITS - bits))
            .collect()
    }

    fn digit_reverse_indices(n: usize, radix: usize) -> Vec<usize> {
        let digits = log_exact(n, radix).unwrap();
        (0..n)
            .map(|i| {
                let mut x = i;
                let mut rev = 0;
                for _ in 0..digits {
                    rev = rev * radix + x % radix;
                    x /= radix;
                }
                rev
            })
            .collect()
    }

    fn assert_bijection(indices: &[usize]) {
        let mut seen = vec![false; indices.len()];
        for &i in indices {
            assert!(i < indices.len());
            assert!(!seen[i], "index {i} appears twice");
            seen[i] = true;
        }
    }

    #[test]
    fn test_default_schemes() {
        assert_eq!(PermutationScheme::default_for(8), PermutationScheme::Radix8);
        assert_eq!(PermutationScheme::default_for(64), PermutationScheme::Radix4);
        assert_eq!(PermutationScheme::default_for(1), PermutationScheme::Radix4);
        assert_eq!(PermutationScheme::default_for(32), PermutationScheme::Mixed24);
        assert_eq!(PermutationScheme::default_for(2), PermutationScheme::Mixed24);
        assert_eq!(PermutationScheme::default_for(12), PermutationScheme::MixedRadix);
    }

    #[test]
    fn test_factorizations() {
        let f = Factorization::new(32, PermutationScheme::Mixed24).unwrap();
        assert_eq!(f.radices(), &[2, 4, 4]);
        let f = Factorization::new(360, PermutationScheme::MixedRadix).unwrap();
        assert_eq!(f.radices(), &[4, 2, 3, 3, 5]);
        let f = Factorization::new(97, PermutationScheme::MixedRadix).unwrap();
        assert_eq!(f.radices(), &[97]);
        let f = Factorization::new(1, PermutationScheme::Radix2).unwrap();
        assert!(f.radices().is_empty());
        assert_eq!(f.max_radix(), 1);
        let f = Factorization::new(512, PermutationScheme::Radix8).unwrap();
        assert_eq!(f.stages().collect::<Vec<_>>(), vec![(8, 1), (8, 8), (8, 64)]);
        for n in 1..300usize {
            let f = Factorization::for_length(n).unwrap();
            assert_eq!(f.radices().iter().product::<usize>(), n);
        }
    }

    #[test]
    fn test_scheme_mismatch() {
        assert_eq!(
            Factorization::new(12, PermutationScheme::Radix2),
            Err(TukeyError::SchemeMismatch(12, "radix-2"))
        );
        assert!(Factorization::new(32, PermutationScheme::Radix4).is_err());
        assert!(Factorization::new(16, PermutationScheme::Radix8).is_err());
        assert_eq!(
            Factorization::new(0, PermutationScheme::MixedRadix),
            Err(TukeyError::ZeroSizedFft)
        );
    }

    #[test]
    fn test_matches_digit_reversal() {
        for bits in 1..12 {
            let n = 1usize << bits;
            assert_eq!(
                compute_permutation(n, PermutationScheme::Radix2).unwrap(),
                bit_reverse_indices(n),
                "radix-2 {n}"
            );
        }
        for p in 0..6 {
            let n = 4usize.pow(p);
            assert_eq!(
                compute_permutation(n, PermutationScheme::Radix4).unwrap(),
                digit_reverse_indices(n, 4),
                "radix-4 {n}"
            );
        }
        for p in 0..4 {
            let n = 8usize.pow(p);
            assert_eq!(
                compute_permutation(n, PermutationScheme::Radix8).unwrap(),
                digit_reverse_indices(n, 8),
                "radix-8 {n}"
            );
        }
    }

    #[test]
    fn test_bijection() {
        for n in 1..400usize {
            let indices = compute_permutation(n, PermutationScheme::MixedRadix).unwrap();
            assert_bijection(&indices);
        }
        for bits in 0..14 {
            let indices = compute_permutation(1 << bits, PermutationScheme::Mixed24).unwrap();
            assert_bijection(&indices);
        }
    }

    #[test]
    fn test_table_with_pooled_storage() {
        let f = Factorization::new(16, PermutationScheme::Radix4).unwrap();
        let table = PermutationTable::with_storage(f.clone(), vec![7usize; 3]);
        assert_eq!(table.len(), 16);
        assert_eq!(table.factorization(), &f);
        assert_eq!(table.indices(), digit_reverse_indices(16, 4).as_slice());
        let owned = PermutationTable::new(f).unwrap();
        assert_eq!(owned.indices(), table.indices());
    }
}
