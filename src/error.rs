// Copyright 2022 Rémy Oudompheng. All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Error types for sieve construction.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The bound is negative, not a number, or too large
    /// to index a flag array.
    #[error("invalid bound: {0}")]
    InvalidBound(String),

    /// The flag array of the given size could not be allocated.
    #[error("cannot allocate sieve of {flags} flags")]
    AllocationFailure { flags: usize },

    #[error("cannot create thread pool: {0}")]
    ThreadPool(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, Error>;
