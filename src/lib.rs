//! Salt construction and method negotiation for Unix __crypt__(3) hashes.
//
// Copyright (c) 2016 Ivan Nejgebauer <inejge@gmail.com>
//
// Licensed under the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>. This file may not be copied,
// modified, or distributed except according to the terms of this
// license.
//!
//! The hash functions of the __crypt__(3) family are selected and
//! parametrized by the salt string: a marker identifies the method,
//! an optional clause sets its cost, and the rest is random salt. This
//! crate builds such salt strings, finds out which methods the system's
//! hash function actually supports, and calls the hash function.
//!
//! # Getting Started
//!
//! Add the following to the `[dependencies]` section of your `Cargo.toml`:
//!
//! ```toml
//! mkcrypt = "0.1"
//! ```
//!
//! # Examples
//!
//! To hash a password with the strongest available method:
//!
//! ```
//! let h = mkcrypt::crypt("password", None::<mkcrypt::Method>).unwrap();
//! ```
//!
//! To check a password against a stored hash, hash it again with the
//! stored hash as the salt, and compare:
//!
//! ```
//! let h = mkcrypt::crypt("password", None::<mkcrypt::Method>).unwrap();
//! assert_eq!(mkcrypt::crypt("password", &h), Some(h));
//! ```
//!
//! To choose the cost:
//!
//! ```
//! use mkcrypt::{mksalt, METHOD_SHA512};
//!
//! let salt = mksalt(Some(METHOD_SHA512), Some(10_000u32.into())).unwrap();
//! assert!(salt.starts_with("$6$rounds=10000$"));
//! ```
//!
//! # Methods
//!
//! From the weakest to the strongest: traditional DES-based
//! [`METHOD_CRYPT`](constant.METHOD_CRYPT.html), [`METHOD_MD5`](constant.METHOD_MD5.html),
//! Blowfish ([`METHOD_BLOWFISH`](constant.METHOD_BLOWFISH.html)),
//! [`METHOD_SHA256`](constant.METHOD_SHA256.html), and
//! [`METHOD_SHA512`](constant.METHOD_SHA512.html). The list of methods the
//! system supports is returned by [`methods`](fn.methods.html); the last one
//! is the default.
//!
//! # Backends
//!
//! The crate-level functions use the system's __crypt_r__(3) on Linux, and
//! the pure Rust implementations of the `pwhash` crate elsewhere. A
//! [`Crypter`](crypter/struct.Crypter.html) can be made for any backend.

#![warn(missing_docs)]

pub mod error;
mod enc_dec;
mod parse;
pub mod method;
pub mod salt;
pub mod backend;
#[cfg(target_os = "linux")]
mod host_crypt;
mod portable_crypt;
pub mod probe;
pub mod crypter;

use lazy_static::lazy_static;

pub use crate::backend::{CryptBackend, DefaultBackend, PortableCrypt};
#[cfg(target_os = "linux")]
pub use crate::backend::HostCrypt;
pub use crate::crypter::{Crypter, IntoSalt};
pub use crate::enc_dec::SALT_CHARS;
pub use crate::error::Error;
pub use crate::method::{BlowfishVariant, Method, CATALOG,
    METHOD_BLOWFISH, METHOD_CRYPT, METHOD_MD5, METHOD_SHA256, METHOD_SHA512};
pub use crate::probe::Capabilities;
pub use crate::salt::{identify, ParsedSalt, RoundsValue};

/// Type alias for the Result type.
pub type Result<T> = std::result::Result<T, error::Error>;

/// A trait for extracting a NUL-terminated subslice from a slice.
///
/// The system hash functions expect passwords to be NUL-terminated C strings,
/// while Rust strings and byte vectors can contain NUL bytes. Every password
/// is cut at its first NUL byte before hashing, with every backend, so that
/// a hash doesn't depend on the backend which computed it.
pub trait FindNul {
    /// Subslice extraction function.
    ///
    /// Given a slice, find and return the subslice before the first NUL byte, or the original
    /// slice if no NUL byte is found. The returned slice consists of raw bytes.
    fn nul_terminated_subslice(&self) -> &[u8];
}

impl FindNul for str {
    fn nul_terminated_subslice(&self) -> &[u8] {
	self.as_bytes().nul_terminated_subslice()
    }
}

impl FindNul for [u8] {
    fn nul_terminated_subslice(&self) -> &[u8] {
	let nul_pos = self.iter().position(|&b| b == 0).unwrap_or(self.len());
	&self[..nul_pos]
    }
}

mod random {
    use rand::Rng;
    use rand::rngs::OsRng;
    use crate::enc_dec::hash64_encode;

    /// Draw `chars` salt characters from the system entropy source.
    pub fn gen_salt_str(chars: usize) -> String {
	let mut bytes = vec![0u8; ((chars + 3) / 4) * 3];
	OsRng.fill(&mut bytes[..]);
	let mut sstr = hash64_encode(&bytes);
	sstr.truncate(chars);
	sstr
    }

}

lazy_static! {
    static ref SYSTEM: Crypter<DefaultBackend> = Crypter::new(DefaultBackend::default());
}

/// Hash a password.
///
/// The second argument can be:
///
/// * a salt string, as returned by [`mksalt`](fn.mksalt.html);
///
/// * a complete hash, whose salt and parameters are reused. If the password
///   is the same as the one the hash was made from, the result is equal to
///   the hash;
///
/// * a [`Method`](method/enum.Method.html), for which a salt is generated
///   with default parameters;
///
/// * `None::<Method>`, which means the strongest supported method.
///
/// Returns `None` if the hash can't be computed, e.g. because the system
/// doesn't support the method, or the salt is malformed.
pub fn crypt<'a, P, S>(pass: P, salt: S) -> Option<String>
    where P: AsRef<[u8]>, S: IntoSalt<'a>
{
    SYSTEM.crypt(pass, salt)
}

/// Build a salt string for `method`, with random salt characters.
///
/// Without a method, the strongest supported one is used. Rounds can only
/// be given for methods with a cost parameter: SHA-256 and SHA-512 accept
/// 1000 to 999999999 rounds, Blowfish a power of two between 2<sup>4</sup>
/// and 2<sup>31</sup>. Errors, checked in this order:
///
/// * `UnsupportedParameter` if the method doesn't have a cost parameter;
///
/// * `InvalidArgumentType` if rounds aren't an integer;
///
/// * `InvalidRange` if rounds are out of range, or not a power of two for
///   Blowfish.
pub fn mksalt(method: Option<Method>, rounds: Option<RoundsValue>) -> Result<String> {
    SYSTEM.mksalt(method, rounds)
}

/// The methods the system supports, weakest first.
///
/// Probed once per process, on first use.
pub fn methods() -> &'static [Method] {
    SYSTEM.methods()
}

/// The methods the system supports, with lookup functions.
pub fn capabilities() -> &'static Capabilities {
    SYSTEM.capabilities()
}
