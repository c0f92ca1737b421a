// Copyright 2022, 2023 Rémy Oudompheng. All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! A plain Sieve of Eratosthenes over odd numbers.
//!
//! It is used as a reference to cross-check the Sieve of Atkin
//! and as a baseline in benchmarks.

/// Returns all primes p such that 2 <= p <= limit.
pub fn primes_up_to(limit: u64) -> Vec<u64> {
    if limit < 2 {
        return vec![];
    }
    let limit = limit as usize;
    // sieve[i] says that 2i+1 is composite
    let mut sieve = vec![false; limit / 2 + 1];
    let mut primes = vec![2];
    for i in 1..sieve.len() {
        let p = 2 * i + 1;
        if p > limit {
            break;
        }
        if !sieve[i] {
            primes.push(p as u64);
            // No need to sieve numbers above sqrt(limit)
            if p * p > limit {
                continue;
            }
            // First odd multiple to consider is p².
            let mut k = p * p / 2;
            while k < sieve.len() {
                sieve[k] = true;
                k += p
            }
        }
    }
    primes
}

#[test]
fn test_eratosthenes() {
    assert_eq!(primes_up_to(0), Vec::<u64>::new());
    assert_eq!(primes_up_to(1), Vec::<u64>::new());
    assert_eq!(primes_up_to(2), vec![2]);
    assert_eq!(primes_up_to(3), vec![2, 3]);
    assert_eq!(primes_up_to(9), vec![2, 3, 5, 7]);
    assert_eq!(primes_up_to(11), vec![2, 3, 5, 7, 11]);
    assert_eq!(primes_up_to(100_000).len(), 9592);
    for n in 0..2000 {
        let expect: Vec<u64> = (0..=n).filter(|&k| crate::arith::is_prime_trial(k)).collect();
        assert_eq!(primes_up_to(n), expect, "limit={n}");
    }
}
