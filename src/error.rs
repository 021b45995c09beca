//! Error values.
//
// Copyright (c) 2016 Ivan Nejgebauer <inejge@gmail.com>
//
// Licensed under the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>. This file may not be copied,
// modified, or distributed except according to the terms of this
// license.
//!
//! Errors can only arise while building a salt string, and always before
//! the hash primitive is called. Hashing itself reports failure through
//! an empty result instead.
use thiserror::Error;

/// Possible errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A rounds value which is not an integer.
    #[error("{0}")]
    InvalidArgumentType(String),
    /// The rounds value is outside the range the method accepts.
    #[error("{0}")]
    InvalidRange(String),
    /// A rounds value was given for a method without a cost parameter.
    #[error("{0}")]
    UnsupportedParameter(String),
}
