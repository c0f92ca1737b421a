// Copyright 2022, 2023 Rémy Oudompheng. All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Bounds and loop parameters for the Sieve of Atkin.
//!
//! The quadratic forms 4x²+y², 3x²+y² and 3x²-y² are enumerated
//! over exact ranges: for a target interval [lo, hi] of the sieve,
//! each x gets the interval of y whose form value lands in [lo, hi].

use std::cmp::{max, min};
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::arith::{ceil_sqrt, isqrt};
use crate::{Error, Result};

/// Largest accepted bound. It must be possible to allocate
/// limit+1 flags and 3x² must not overflow for any x
/// visited by the sieve.
pub const MAX_LIMIT: u64 = if (usize::MAX as u64) - 1 < u64::MAX / 4 {
    usize::MAX as u64 - 1
} else {
    u64::MAX / 4
};

/// Default bound for command line programs.
pub const DEFAULT_LIMIT: u64 = 10_000;

/// A validated inclusive upper bound for prime search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Bound(u64);

impl Bound {
    pub fn new(limit: u64) -> Result<Self> {
        if limit > MAX_LIMIT {
            return Err(Error::InvalidBound(format!(
                "{limit} exceeds maximum {MAX_LIMIT}"
            )));
        }
        Ok(Bound(limit))
    }

    pub fn get(&self) -> u64 {
        self.0
    }

    /// Number of flags needed to sieve up to the bound (inclusive).
    pub fn flags(&self) -> usize {
        self.0 as usize + 1
    }
}

impl TryFrom<i64> for Bound {
    type Error = Error;

    fn try_from(limit: i64) -> Result<Self> {
        if limit < 0 {
            return Err(Error::InvalidBound(format!("negative bound {limit}")));
        }
        Bound::new(limit as u64)
    }
}

impl FromStr for Bound {
    type Err = Error;

    /// Parses a decimal bound. Underscores are accepted
    /// as digit separators (100_000).
    fn from_str(s: &str) -> Result<Self> {
        let digits: String = s.trim().chars().filter(|&c| c != '_').collect();
        if let Some(abs) = digits.strip_prefix('-') {
            if !abs.is_empty() && abs.bytes().all(|b| b.is_ascii_digit()) {
                if abs.bytes().all(|b| b == b'0') {
                    return Ok(Bound(0));
                }
                return Err(Error::InvalidBound(format!("negative bound {s}")));
            }
        }
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidBound(format!("not a number: {s:?}")));
        }
        // Only overflow can fail now.
        match u64::from_str(&digits) {
            Ok(n) => Bound::new(n),
            Err(_) => Err(Error::InvalidBound(format!(
                "{s} exceeds maximum {MAX_LIMIT}"
            ))),
        }
    }
}

impl std::fmt::Display for Bound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Residue classes modulo 60 for each quadratic form,
// as bitmasks over n % 60.

const fn residue_mask(residues: &[u64]) -> u64 {
    let mut mask = 0;
    let mut i = 0;
    while i < residues.len() {
        mask |= 1 << residues[i];
        i += 1;
    }
    mask
}

/// Residues of 4x²+y² (numbers 1 mod 4).
pub const FORM_A_MASK: u64 = residue_mask(&[1, 13, 17, 29, 37, 41, 49, 53]);
/// Residues of 3x²+y² (numbers 1 mod 6).
pub const FORM_B_MASK: u64 = residue_mask(&[7, 19, 31, 43]);
/// Residues of 3x²-y² (numbers 11 mod 12).
pub const FORM_C_MASK: u64 = residue_mask(&[11, 23, 47, 59]);

#[inline]
pub fn in_residue_class(mask: u64, n: u64) -> bool {
    (mask >> (n % 60)) & 1 == 1
}

const EMPTY: RangeInclusive<u64> = 1..=0;

/// Largest x >= 0 such that k x² + 1 <= hi.
pub fn max_x_sum(k: u64, hi: u64) -> u64 {
    if hi == 0 {
        return 0;
    }
    isqrt((hi - 1) / k)
}

/// Values of y >= 1 such that k x² + y² lies in [lo, hi].
pub fn y_range_sum(k: u64, x: u64, lo: u64, hi: u64) -> RangeInclusive<u64> {
    let base = k * x * x;
    if base >= hi {
        return EMPTY;
    }
    let ymin = if lo > base { max(1, ceil_sqrt(lo - base)) } else { 1 };
    ymin..=isqrt(hi - base)
}

/// Largest x such that 3x²-y² <= hi for some 0 < y < x.
/// The smallest form value for a given x is 2x²+2x-1 (y = x-1).
pub fn max_x_diff(hi: u64) -> u64 {
    let mut x = isqrt(hi / 2 + 1);
    while x > 0 && 2 * x * x + 2 * x - 1 > hi {
        x -= 1;
    }
    x
}

/// Values of 0 < y < x such that 3x²-y² lies in [lo, hi].
pub fn y_range_diff(x: u64, lo: u64, hi: u64) -> RangeInclusive<u64> {
    let base = 3 * x * x;
    // y >= 1 requires 3x²-1 >= lo.
    if x < 2 || base <= lo {
        return EMPTY;
    }
    let ymin = if base > hi { max(1, ceil_sqrt(base - hi)) } else { 1 };
    let ymax = min(x - 1, isqrt(base - lo));
    ymin..=ymax
}

/// Minimal number of flags handled by a parallel task.
const SEGMENT_MIN: usize = 1 << 12;
/// A segment should fit in L2 cache.
const SEGMENT_MAX: usize = 1 << 20;

/// Size of segments for the parallel quadratic form phase:
/// about 8 segments per thread, within cache-friendly limits.
pub fn segment_size(bound: Bound, threads: usize) -> usize {
    let target = bound.flags() / (8 * max(threads, 1));
    target.clamp(SEGMENT_MIN, SEGMENT_MAX)
}

#[test]
fn test_bound_parse() {
    assert_eq!(Bound::from_str("10000").unwrap().get(), 10000);
    assert_eq!(Bound::from_str(" 100_000 ").unwrap().get(), 100_000);
    assert_eq!(Bound::from_str("0").unwrap().get(), 0);
    assert!(matches!(
        Bound::from_str("-5"),
        Err(Error::InvalidBound(msg)) if msg.contains("negative")
    ));
    assert_eq!(Bound::from_str("-0").unwrap().get(), 0);
    assert_eq!(Bound::from_str("-000").unwrap().get(), 0);
    assert!(matches!(
        Bound::from_str("-01"),
        Err(Error::InvalidBound(msg)) if msg.contains("negative")
    ));
    assert!(Bound::from_str("").is_err());
    assert!(Bound::from_str("12a").is_err());
    assert!(Bound::from_str("-").is_err());
    assert!(Bound::from_str("99999999999999999999999").is_err());
    assert!(Bound::try_from(-1_i64).is_err());
    assert_eq!(Bound::try_from(40_i64).unwrap().get(), 40);
    assert!(Bound::new(MAX_LIMIT).is_ok());
    assert!(Bound::new(MAX_LIMIT + 1).is_err());
    assert!(Bound::new(u64::MAX).is_err());
}

#[test]
fn test_residue_masks() {
    for n in 0..60 {
        assert_eq!(
            in_residue_class(FORM_A_MASK, n),
            [1, 13, 17, 29, 37, 41, 49, 53].contains(&n)
        );
        assert_eq!(
            in_residue_class(FORM_B_MASK, n + 60),
            [7, 19, 31, 43].contains(&n)
        );
        assert_eq!(
            in_residue_class(FORM_C_MASK, n + 120),
            [11, 23, 47, 59].contains(&n)
        );
    }
    // No residue class contains multiples of 2, 3 or 5.
    for n in 0..60 {
        if n % 2 == 0 || n % 3 == 0 || n % 5 == 0 {
            let all = FORM_A_MASK | FORM_B_MASK | FORM_C_MASK;
            assert!(!in_residue_class(all, n));
        }
    }
}

#[test]
fn test_form_ranges() {
    // Compare with brute force enumeration of form values in [lo, hi].
    for (lo, hi) in [(0, 0), (0, 1), (0, 5), (0, 100), (37, 211), (500, 1000), (999, 999)] {
        let mut expect = vec![];
        let mut got = vec![];
        for x in 1..40_u64 {
            for y in 1..40_u64 {
                for (k, name) in [(4, 'a'), (3, 'b')] {
                    let n = k * x * x + y * y;
                    if lo <= n && n <= hi {
                        expect.push((name, x, y));
                    }
                }
                if x > y {
                    let n = 3 * x * x - y * y;
                    if lo <= n && n <= hi {
                        expect.push(('c', x, y));
                    }
                }
            }
        }
        for x in 1..=max_x_sum(4, hi) {
            for y in y_range_sum(4, x, lo, hi) {
                got.push(('a', x, y));
            }
        }
        for x in 1..=max_x_sum(3, hi) {
            for y in y_range_sum(3, x, lo, hi) {
                got.push(('b', x, y));
            }
        }
        for x in 1..=max_x_diff(hi) {
            for y in y_range_diff(x, lo, hi) {
                got.push(('c', x, y));
            }
        }
        expect.sort();
        got.sort();
        assert_eq!(got, expect, "interval [{lo}, {hi}]");
    }
}

#[test]
fn test_max_x() {
    assert_eq!(max_x_sum(4, 0), 0);
    assert_eq!(max_x_sum(4, 4), 0);
    assert_eq!(max_x_sum(4, 5), 1);
    assert_eq!(max_x_sum(3, 4), 1);
    assert_eq!(max_x_diff(10), 1);
    // 3*2²-1² = 11
    assert_eq!(max_x_diff(11), 2);
    for hi in 0..5000_u64 {
        let x = max_x_diff(hi);
        let next = x + 1;
        assert!(2 * next * next + 2 * next - 1 > hi);
        assert!(x == 0 || 2 * x * x + 2 * x - 1 <= hi);
    }
}

#[test]
fn test_segment_size() {
    let b = Bound::new(1_000_000_000).unwrap();
    assert_eq!(segment_size(b, 1), SEGMENT_MAX);
    let b = Bound::new(1000).unwrap();
    assert_eq!(segment_size(b, 8), SEGMENT_MIN);
    let b = Bound::new(8 * 4 * 10_000 - 1).unwrap();
    assert_eq!(segment_size(b, 4), 10_000);
}
