// Copyright 2022 Rémy Oudompheng. All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use num_integer::Roots;

/// Largest r such that r*r <= n.
pub fn isqrt(n: u64) -> u64 {
    Roots::sqrt(&n)
}

/// Smallest r such that r*r >= n.
pub fn ceil_sqrt(n: u64) -> u64 {
    let r = isqrt(n);
    if r * r < n {
        r + 1
    } else {
        r
    }
}

/// Primality by trial division.
/// Only meant for cross-checks on moderate inputs.
pub fn is_prime_trial(n: u64) -> bool {
    if n < 4 {
        return n >= 2;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }
    // Remaining divisors are of the form 6k±1.
    let mut d = 5;
    // d*d may overflow for n close to u64::MAX.
    while d <= n / d {
        if n % d == 0 || n % (d + 2) == 0 {
            return false;
        }
        d += 6;
    }
    true
}

#[test]
fn test_isqrt() {
    for n in 1..1000_u64 {
        assert_eq!(isqrt(n * n), n);
        assert_eq!(isqrt(n * n + 1), n);
        assert_eq!(isqrt(n * n - 1), n - 1);
        assert_eq!(ceil_sqrt(n * n), n);
        assert_eq!(ceil_sqrt(n * n + 1), n + 1);
    }
    assert_eq!(isqrt(0), 0);
    assert_eq!(ceil_sqrt(0), 0);
    assert_eq!(isqrt(u64::MAX), u32::MAX as u64);
}

#[test]
fn test_is_prime_trial() {
    let small: Vec<u64> = (0..50).filter(|&n| is_prime_trial(n)).collect();
    assert_eq!(
        small,
        vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47]
    );
    assert!(is_prime_trial(1_000_003));
    // 1009 * 1013
    assert!(!is_prime_trial(1_022_117));
    // 7^2, 11*13
    assert!(!is_prime_trial(49));
    assert!(!is_prime_trial(143));
}

#[test]
fn test_is_prime_trial_large() {
    assert!(!is_prime_trial(u64::MAX));
    assert!(!is_prime_trial(u64::MAX - 1));
    assert!(is_prime_trial(18446688733531));
    // 1000003 * 18446688733531
    assert!(!is_prime_trial(18446744073597200593));
}

#[test]
#[ignore]
fn test_is_prime_trial_max() {
    // Slow: divisors up to 2^32 are tested.
    // Run with cargo test --release -- --ignored
    assert!(is_prime_trial(18446744073709551557));
}
