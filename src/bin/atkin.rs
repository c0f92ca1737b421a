// Copyright 2022 Rémy Oudompheng. All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Prints the primes up to a given bound, or their count.

use std::io::{BufWriter, Write};
use std::str::FromStr;
use std::time::Instant;

use arguments::Arguments;

use atkin::params::{Bound, DEFAULT_LIMIT};
use atkin::{primes_up_to, Error, Preferences, Result, Verbosity};

const USAGE: &str = "Usage: atkin [OPTIONS] [LIMIT]

Prints the number of primes up to LIMIT (default 10000).

Options:
  --help                    show this help
  --list [true|false]       print all primes, one per line
  --threads N               sieve using N threads
  --silent                  no timing report
  --verbose LEVEL           verbosity level (silent, info, verbose, debug)";

#[derive(Debug)]
struct Options {
    help: bool,
    list: bool,
    bound: Bound,
    prefs: Preferences,
}

fn main() {
    let opts = match parse_args(std::env::args()) {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
    };
    if opts.help {
        eprintln!("{USAGE}");
        return;
    }
    let prefs = &opts.prefs;
    let bound = opts.bound;
    let start = Instant::now();
    let primes = match primes_up_to(bound.get(), prefs) {
        Ok(ps) => ps,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    if prefs.verbosity >= Verbosity::Info {
        let elapsed = start.elapsed().as_secs_f64();
        eprintln!("Sieved up to {bound} in {:.3}ms", elapsed * 1000.0);
    }
    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let res = if opts.list {
        primes.iter().try_for_each(|p| writeln!(out, "{p}"))
    } else {
        writeln!(out, "{}", primes.len())
    };
    if let Err(e) = res.and_then(|_| out.flush()) {
        eprintln!("cannot write output: {e}");
        std::process::exit(1);
    }
}

fn parse_args<I: Iterator<Item = String>>(args: I) -> Result<Options> {
    let arg = arguments::parse(args).map_err(|e| Error::InvalidArgument(e.to_string()))?;
    let mut orphans = arg.orphans.clone();
    let help = flag(&arg, "help", &mut orphans);
    let list = flag(&arg, "list", &mut orphans);
    let silent = flag(&arg, "silent", &mut orphans);
    let mut prefs = Preferences::default();
    prefs.threads = value::<usize>(&arg, "threads")?;
    if let Some(v) = value::<Verbosity>(&arg, "verbose")? {
        prefs.verbosity = v;
    }
    if silent {
        prefs.verbosity = Verbosity::Silent;
    }
    let bound = match &orphans[..] {
        [] => Bound::new(DEFAULT_LIMIT)?,
        [s] => Bound::from_str(s)?,
        _ => {
            return Err(Error::InvalidArgument(format!(
                "expected a single limit, got {orphans:?}"
            )))
        }
    };
    Ok(Options {
        help,
        list,
        bound,
        prefs,
    })
}

/// Reads a boolean flag. The parser attaches the following word to
/// the flag, so a non-boolean word is given back as an orphan
/// (`--list 10` means `--list true 10`).
fn flag(arg: &Arguments, name: &str, orphans: &mut Vec<String>) -> bool {
    match arg.get::<String>(name) {
        None => false,
        Some(raw) => match bool::from_str(&raw) {
            Ok(b) => b,
            Err(_) => {
                orphans.push(raw);
                true
            }
        },
    }
}

/// Reads an option value, failing if it is present but invalid.
fn value<T: FromStr>(arg: &Arguments, name: &str) -> Result<Option<T>> {
    match arg.get::<String>(name) {
        None => Ok(None),
        Some(raw) => match T::from_str(&raw) {
            Ok(v) => Ok(Some(v)),
            Err(_) => Err(Error::InvalidArgument(format!(
                "invalid value {raw:?} for --{name}"
            ))),
        },
    }
}

#[cfg(test)]
fn parse(args: &[&str]) -> Result<Options> {
    let all = std::iter::once("atkin").chain(args.iter().copied());
    parse_args(all.map(String::from))
}

#[test]
fn test_parse_list() {
    for args in [
        &["--list", "10"][..],
        &["10", "--list"],
        &["--list", "true", "10"],
        &["--verbose", "silent", "--list", "10"],
    ] {
        let opts = parse(args).unwrap();
        assert!(opts.list, "{args:?}");
        assert_eq!(opts.bound.get(), 10, "{args:?}");
    }
    let opts = parse(&["--list", "false", "20"]).unwrap();
    assert!(!opts.list);
    assert_eq!(opts.bound.get(), 20);
    let opts = parse(&["--no-list", "20"]).unwrap();
    assert!(!opts.list);
    // The limit is never silently replaced by the default.
    assert!(parse(&["30", "--list", "20"]).is_err());
}

#[test]
fn test_parse_defaults() {
    let opts = parse(&[]).unwrap();
    assert!(!opts.help);
    assert!(!opts.list);
    assert_eq!(opts.bound.get(), DEFAULT_LIMIT);
    assert_eq!(opts.prefs.verbosity, Verbosity::Info);
    assert_eq!(opts.prefs.threads, None);
}

#[test]
fn test_parse_verbosity() {
    let opts = parse(&["--silent", "10"]).unwrap();
    assert_eq!(opts.prefs.verbosity, Verbosity::Silent);
    assert_eq!(opts.bound.get(), 10);
    let opts = parse(&["--verbose", "debug", "--threads", "4", "50"]).unwrap();
    assert_eq!(opts.prefs.verbosity, Verbosity::Debug);
    assert_eq!(opts.prefs.threads, Some(4));
    assert_eq!(opts.bound.get(), 50);
    // A limit swallowed by a valued option is an error.
    assert!(parse(&["--verbose", "10"]).is_err());
    assert!(parse(&["--threads", "--list", "10"]).is_err());
}

#[test]
fn test_parse_errors() {
    assert!(matches!(
        parse(&["--", "-5"]),
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(parse(&["-5"]), Err(Error::InvalidBound(_))));
    assert!(matches!(parse(&["ten"]), Err(Error::InvalidBound(_))));
    assert!(parse(&["10", "20"]).is_err());
    assert!(parse(&["--help"]).unwrap().help);
}
