// Copyright 2022 Rémy Oudompheng. All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Prime numbers up to a bound using the Sieve of Atkin.
//!
//! Bibliography:
//!
//! A.O.L. Atkin, D.J. Bernstein, Prime sieves using binary quadratic forms
//! https://cr.yp.to/papers/primesieves.pdf
//!
//! https://en.wikipedia.org/wiki/Sieve_of_Atkin

pub mod arith;
pub mod atkin;
pub mod eratosthenes;
pub mod error;
pub mod params;

pub use atkin::AtkinSieve;
pub use error::{Error, Result};
pub use params::Bound;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Silent,
    Info,
    Verbose,
    Debug,
}

impl std::str::FromStr for Verbosity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "silent" => Ok(Self::Silent),
            "info" => Ok(Self::Info),
            "verbose" => Ok(Self::Verbose),
            "debug" => Ok(Self::Debug),
            _ => Err(Error::InvalidArgument(format!("unknown verbosity {s:?}"))),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Preferences {
    pub verbosity: Verbosity,
    // Number of worker threads for the quadratic form phase.
    // None means the calling thread does all the work.
    pub threads: Option<usize>,
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            verbosity: Verbosity::Info,
            threads: None,
        }
    }
}

/// Returns all primes p such that 2 <= p <= limit, in increasing order.
///
/// If `prefs.threads` is set, the quadratic form phase is split
/// into segments processed by a dedicated thread pool.
pub fn primes_up_to(limit: u64, prefs: &Preferences) -> Result<Vec<u64>> {
    let bound = Bound::new(limit)?;
    let start = std::time::Instant::now();
    let sieve = match prefs.threads {
        Some(t) if t > 1 => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(t)
                .build()
                .map_err(|e| Error::ThreadPool(e.to_string()))?;
            if prefs.verbosity >= Verbosity::Verbose {
                eprintln!("Using a pool of {t} threads");
            }
            AtkinSieve::new_parallel(bound, &pool)?
        }
        _ => AtkinSieve::new(bound)?,
    };
    let primes = sieve.into_primes();
    if prefs.verbosity >= Verbosity::Verbose {
        let ms = start.elapsed().as_secs_f64() * 1000.0;
        eprintln!("Found {} primes up to {limit} in {ms:.3}ms", primes.len());
    }
    Ok(primes)
}

#[test]
fn test_primes_up_to() {
    let prefs = Preferences {
        verbosity: Verbosity::Silent,
        threads: None,
    };
    assert_eq!(primes_up_to(40, &prefs).unwrap().len(), 12);
    let prefs = Preferences {
        verbosity: Verbosity::Silent,
        threads: Some(4),
    };
    assert_eq!(primes_up_to(100_000, &prefs).unwrap().len(), 9592);
    assert!(primes_up_to(u64::MAX, &prefs).is_err());
}

#[test]
fn test_verbosity_order() {
    assert!(Verbosity::Silent < Verbosity::Info);
    assert!(Verbosity::Info < Verbosity::Verbose);
    assert!(Verbosity::Verbose < Verbosity::Debug);
    assert_eq!("debug".parse::<Verbosity>().unwrap(), Verbosity::Debug);
    assert!("loud".parse::<Verbosity>().is_err());
}
