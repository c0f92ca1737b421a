use brunch::Bench;
use std::time::Duration;
use atkin::{eratosthenes, AtkinSieve, Bound};

brunch::benches! {
    // Sieve of Atkin
    Bench::new("atkin 10^4")
    .run_seeded(10_000, AtkinSieve::compute),
    Bench::new("atkin 10^5")
    .run_seeded(100_000, AtkinSieve::compute),
    Bench::new("atkin 10^6")
    .with_timeout(Duration::from_secs(2))
    .run_seeded(1_000_000, AtkinSieve::compute),
    // Reference Eratosthenes sieve
    Bench::new("eratosthenes 10^4")
    .run_seeded(10_000, eratosthenes::primes_up_to),
    Bench::new("eratosthenes 10^5")
    .run_seeded(100_000, eratosthenes::primes_up_to),
    Bench::new("eratosthenes 10^6")
    .with_timeout(Duration::from_secs(2))
    .run_seeded(1_000_000, eratosthenes::primes_up_to),
    // Parallel quadratic form phase
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(4)
            .build()
            .unwrap();
        let bound = Bound::new(1_000_000).unwrap();
        Bench::new("atkin 10^6 (4 threads)")
        .with_timeout(Duration::from_secs(2))
        .run_seeded(bound, |b| AtkinSieve::new_parallel(b, &pool).map(|s| s.count()))
    },
}
