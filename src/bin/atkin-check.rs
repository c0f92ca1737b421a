// Copyright 2022, 2023 Rémy Oudompheng. All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Random Atkin sieve testing.
//!
//! This program selects random bounds for the requested bit length
//! and compares the Sieve of Atkin with a plain Sieve of Eratosthenes
//! and trial division.

use std::str::FromStr;
use std::time::Instant;

use arguments::Arguments;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use atkin::arith::is_prime_trial;
use atkin::eratosthenes;
use atkin::{AtkinSieve, Bound};

fn main() {
    let arg = match arguments::parse(std::env::args()) {
        Ok(arg) => arg,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    if arg.get::<String>("help").is_some() || !arg.orphans.is_empty() {
        eprintln!("Usage: atkin-check [OPTIONS]");
        eprintln!("");
        eprintln!("Options:");
        eprintln!("  --help                    show this help");
        eprintln!("  --bits B                  bounds are chosen below 2^B (default 20)");
        eprintln!("  --rounds R                number of random bounds (default 100)");
        eprintln!("  --seed S                  random seed");
        eprintln!("  --threads N               also check the parallel sieve with N threads");
        return;
    }
    let bits = value::<u32>(&arg, "bits").unwrap_or(20);
    let rounds = value::<usize>(&arg, "rounds").unwrap_or(100);
    if !(2..=32).contains(&bits) {
        eprintln!("--bits must be between 2 and 32");
        std::process::exit(1);
    }
    let mut rng = match value::<u64>(&arg, "seed") {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    let tpool: Option<rayon::ThreadPool> = value::<usize>(&arg, "threads").map(|t| {
        eprintln!("Using a pool of {} threads", t);
        rayon::ThreadPoolBuilder::new()
            .num_threads(t)
            .build()
            .expect("cannot create thread pool")
    });
    let t0 = Instant::now();
    for i in 0..rounds {
        let limit: u64 = rng.gen_range(0..1_u64 << bits);
        let bound = Bound::new(limit).unwrap();
        let sieve = AtkinSieve::new(bound).unwrap();
        let primes: Vec<u64> = sieve.primes().collect();
        let expect = eratosthenes::primes_up_to(limit);
        if primes != expect {
            eprintln!(
                "ERROR limit={limit}: Atkin found {} primes, Eratosthenes found {}",
                primes.len(),
                expect.len()
            );
            std::process::exit(1);
        }
        // Spot checks against trial division.
        for _ in 0..100 {
            let n = rng.gen_range(0..=limit);
            if sieve.is_prime(n) != is_prime_trial(n) {
                eprintln!("ERROR limit={limit}: wrong primality for {n}");
                std::process::exit(1);
            }
        }
        if let Some(pool) = tpool.as_ref() {
            let par = AtkinSieve::new_parallel(bound, pool).unwrap();
            if !par.primes().eq(primes.iter().copied()) {
                eprintln!("ERROR limit={limit}: parallel sieve mismatch");
                std::process::exit(1);
            }
        }
        let elapsed = t0.elapsed().as_secs_f64();
        eprintln!(
            "Round {} limit={limit} primes={} OK ({:.3}s elapsed)",
            i + 1,
            primes.len(),
            elapsed
        );
    }
}

// Exits if the option is present with an invalid value.
fn value<T: FromStr>(arg: &Arguments, name: &str) -> Option<T> {
    let raw = arg.get::<String>(name)?;
    match T::from_str(&raw) {
        Ok(v) => Some(v),
        Err(_) => {
            eprintln!("invalid value {raw:?} for --{name}");
            std::process::exit(1);
        }
    }
}
