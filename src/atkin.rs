// Copyright 2022, 2023 Rémy Oudompheng. All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! The Sieve of Atkin.
//!
//! A squarefree integer n coprime to 60 is prime if and only if
//! the number of positive solutions of:
//! - 4x²+y² = n is odd, when n % 60 is 1, 13, 17, 29, 37, 41, 49 or 53
//! - 3x²+y² = n is odd, when n % 60 is 7, 19, 31 or 43
//! - 3x²-y² = n (x > y) is odd, when n % 60 is 11, 23, 47 or 59
//!
//! The sieve flips a flag for each solution, then clears multiples
//! of squares of the primes found. Multiples of 2, 3, 5 never belong
//! to the residue classes so these 3 primes are added explicitly.
//!
//! The quadratic form phase can be split into disjoint segments
//! of the flag array, which are processed independently
//! (possibly by several threads).

use rayon::prelude::*;

use crate::arith::isqrt;
use crate::params::{self, Bound};
use crate::params::{in_residue_class, FORM_A_MASK, FORM_B_MASK, FORM_C_MASK};
use crate::params::{max_x_diff, max_x_sum, y_range_diff, y_range_sum};
use crate::{Error, Result};

/// A completed sieve: flags[n] is true if and only if n is prime.
#[derive(Clone, Debug)]
pub struct AtkinSieve {
    bound: Bound,
    flags: Vec<bool>,
}

impl AtkinSieve {
    /// Returns all primes p such that 2 <= p <= limit, in increasing order.
    pub fn compute(limit: u64) -> Result<Vec<u64>> {
        let bound = Bound::new(limit)?;
        Ok(Self::new(bound)?.into_primes())
    }

    pub fn new(bound: Bound) -> Result<Self> {
        let mut flags = alloc_flags(bound)?;
        mark_segment(&mut flags, 0);
        Ok(Self::finish(bound, flags))
    }

    /// Same as `new` but the quadratic form phase runs
    /// on the threads of the given pool.
    pub fn new_parallel(bound: Bound, pool: &rayon::ThreadPool) -> Result<Self> {
        let mut flags = alloc_flags(bound)?;
        let seg = params::segment_size(bound, pool.current_num_threads());
        mark_parallel(&mut flags, seg, pool);
        Ok(Self::finish(bound, flags))
    }

    fn finish(bound: Bound, mut flags: Vec<bool>) -> Self {
        set_base_primes(&mut flags);
        eliminate_squares(&mut flags);
        AtkinSieve { bound, flags }
    }

    pub fn limit(&self) -> u64 {
        self.bound.get()
    }

    pub fn is_prime(&self, n: u64) -> bool {
        n <= self.limit() && self.flags[n as usize]
    }

    pub fn count(&self) -> usize {
        self.flags.iter().filter(|&&f| f).count()
    }

    pub fn primes(&self) -> impl Iterator<Item = u64> + '_ {
        self.flags
            .iter()
            .enumerate()
            .filter(|&(_, &f)| f)
            .map(|(n, _)| n as u64)
    }

    pub fn into_primes(self) -> Vec<u64> {
        self.primes().collect()
    }
}

fn alloc_flags(bound: Bound) -> Result<Vec<bool>> {
    let len = bound.flags();
    let mut flags = Vec::new();
    flags
        .try_reserve_exact(len)
        .map_err(|_| Error::AllocationFailure { flags: len })?;
    flags.resize(len, false);
    Ok(flags)
}

/// Toggles flags of segment [lo, lo+len) for each
/// representation by the quadratic forms.
fn mark_segment(seg: &mut [bool], lo: u64) {
    if seg.is_empty() {
        return;
    }
    let hi = lo + seg.len() as u64 - 1;
    let mut toggle = |n: u64, mask: u64| {
        if in_residue_class(mask, n) {
            let idx = (n - lo) as usize;
            seg[idx] = !seg[idx];
        }
    };
    for x in 1..=max_x_sum(4, hi) {
        let base = 4 * x * x;
        for y in y_range_sum(4, x, lo, hi) {
            toggle(base + y * y, FORM_A_MASK);
        }
    }
    for x in 1..=max_x_sum(3, hi) {
        let base = 3 * x * x;
        for y in y_range_sum(3, x, lo, hi) {
            toggle(base + y * y, FORM_B_MASK);
        }
    }
    for x in 2..=max_x_diff(hi) {
        let base = 3 * x * x;
        for y in y_range_diff(x, lo, hi) {
            toggle(base - y * y, FORM_C_MASK);
        }
    }
}

/// Segments are disjoint so no synchronization is needed.
fn mark_parallel(flags: &mut [bool], seg: usize, pool: &rayon::ThreadPool) {
    pool.install(|| {
        flags
            .par_chunks_mut(seg)
            .enumerate()
            .for_each(|(i, chunk)| mark_segment(chunk, (i * seg) as u64));
    });
}

fn set_base_primes(flags: &mut [bool]) {
    for n in [0, 1] {
        if n < flags.len() {
            flags[n] = false;
        }
    }
    for p in [2, 3, 5] {
        if p < flags.len() {
            flags[p] = true;
        }
    }
}

/// Clears multiples of p² for primes 7 <= p <= sqrt(limit).
/// Flags below p² are final when p is reached.
fn eliminate_squares(flags: &mut [bool]) {
    let len = flags.len();
    let root = isqrt(len as u64 - 1) as usize;
    for p in 7..=root {
        if flags[p] {
            let sq = p * p;
            let mut k = sq;
            while k < len {
                flags[k] = false;
                k += sq;
            }
        }
    }
}

#[cfg(test)]
use crate::arith::is_prime_trial;

#[test]
fn test_small_limits() {
    for limit in 0..2 {
        assert_eq!(AtkinSieve::compute(limit).unwrap(), Vec::<u64>::new());
    }
    assert_eq!(AtkinSieve::compute(2).unwrap(), vec![2]);
    assert_eq!(AtkinSieve::compute(3).unwrap(), vec![2, 3]);
    assert_eq!(AtkinSieve::compute(4).unwrap(), vec![2, 3]);
    assert_eq!(AtkinSieve::compute(5).unwrap(), vec![2, 3, 5]);
    assert_eq!(AtkinSieve::compute(10).unwrap(), vec![2, 3, 5, 7]);
    assert_eq!(
        AtkinSieve::compute(20).unwrap(),
        vec![2, 3, 5, 7, 11, 13, 17, 19]
    );
    assert_eq!(
        AtkinSieve::compute(40).unwrap(),
        vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37]
    );
    // Inclusive bound.
    assert_eq!(AtkinSieve::compute(37).unwrap().last(), Some(&37));
    assert_eq!(AtkinSieve::compute(36).unwrap().last(), Some(&31));
}

#[test]
fn test_prime_counts() {
    assert_eq!(AtkinSieve::compute(100_000).unwrap().len(), 9592);
    assert_eq!(AtkinSieve::compute(200_000).unwrap().len(), 17984);
    let b = Bound::new(1_000_000).unwrap();
    assert_eq!(AtkinSieve::new(b).unwrap().count(), 78498);
}

#[test]
fn test_against_eratosthenes() {
    for limit in 0..1500 {
        assert_eq!(
            AtkinSieve::compute(limit).unwrap(),
            crate::eratosthenes::primes_up_to(limit),
            "limit={limit}"
        );
    }
    for limit in [3599, 3600, 3601, 65536, 123_457] {
        assert_eq!(
            AtkinSieve::compute(limit).unwrap(),
            crate::eratosthenes::primes_up_to(limit),
            "limit={limit}"
        );
    }
}

#[test]
fn test_properties() {
    let a = AtkinSieve::compute(30_000).unwrap();
    let b = AtkinSieve::compute(30_000).unwrap();
    assert_eq!(a, b);
    // Strictly increasing.
    assert!(a.windows(2).all(|w| w[0] < w[1]));
    // Monotonic containment.
    let small = AtkinSieve::compute(12_345).unwrap();
    assert_eq!(&a[..small.len()], &small[..]);
    // Every element is a prime.
    assert!(a.iter().all(|&p| is_prime_trial(p)));
}

#[test]
fn test_random_samples() {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    let sieve = AtkinSieve::new(Bound::new(2_000_000).unwrap()).unwrap();
    for _ in 0..2000 {
        let n: u64 = rng.gen_range(0..=2_000_000);
        assert_eq!(sieve.is_prime(n), is_prime_trial(n), "n={n}");
    }
    assert!(!sieve.is_prime(2_000_003));
}

#[test]
fn test_phase1_parity() {
    // After the quadratic form phase, flag[n] is the parity
    // of the number of admissible representations.
    const LIMIT: u64 = 3000;
    let mut flags = vec![false; LIMIT as usize + 1];
    mark_segment(&mut flags, 0);
    let mut counts = vec![0_u32; LIMIT as usize + 1];
    // 3x²-y² >= 2x²+2x-1 > LIMIT for x > 40.
    for x in 1..=100 {
        for y in 1..=100 {
            let n = 4 * x * x + y * y;
            if n <= LIMIT && in_residue_class(FORM_A_MASK, n) {
                counts[n as usize] += 1;
            }
            let n = 3 * x * x + y * y;
            if n <= LIMIT && in_residue_class(FORM_B_MASK, n) {
                counts[n as usize] += 1;
            }
            if x > y {
                let n = 3 * x * x - y * y;
                if n <= LIMIT && in_residue_class(FORM_C_MASK, n) {
                    counts[n as usize] += 1;
                }
            }
        }
    }
    for n in 0..=LIMIT as usize {
        assert_eq!(flags[n], counts[n] % 2 == 1, "n={n}");
    }
}

#[test]
fn test_parallel() {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(4)
        .build()
        .unwrap();
    for limit in [0, 1, 2, 7, 60, 1000, 4097, 20_000] {
        let mut seq = vec![false; limit + 1];
        mark_segment(&mut seq, 0);
        for seg in [1, 7, 64, 1000, 1 << 16] {
            let mut par = vec![false; limit + 1];
            mark_parallel(&mut par, seg, &pool);
            assert_eq!(par, seq, "limit={limit} seg={seg}");
        }
    }
    let b = Bound::new(1_000_003).unwrap();
    let par = AtkinSieve::new_parallel(b, &pool).unwrap();
    let seq = AtkinSieve::new(b).unwrap();
    // 1000003 is prime.
    assert_eq!(par.count(), 78499);
    assert_eq!(par.into_primes(), seq.into_primes());
}

#[test]
fn test_sieve_api() {
    let sieve = AtkinSieve::new(Bound::new(100).unwrap()).unwrap();
    assert_eq!(sieve.limit(), 100);
    assert_eq!(sieve.count(), 25);
    assert!(sieve.is_prime(97));
    assert!(!sieve.is_prime(91));
    assert!(!sieve.is_prime(0));
    assert!(!sieve.is_prime(1));
    // Out of range.
    assert!(!sieve.is_prime(101));
    assert_eq!(sieve.primes().take(4).collect::<Vec<_>>(), vec![2, 3, 5, 7]);
}

#[test]
fn test_errors() {
    assert!(matches!(
        AtkinSieve::compute(u64::MAX),
        Err(Error::InvalidBound(_))
    ));
    // Valid bound but no memory for it.
    let huge = Bound::new(params::MAX_LIMIT).unwrap();
    assert!(matches!(
        AtkinSieve::new(huge),
        Err(Error::AllocationFailure { .. })
    ));
}
