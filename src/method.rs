//! Catalog of known hashing methods.
//
// Copyright (c) 2016 Ivan Nejgebauer <inejge@gmail.com>
//
// Licensed under the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>. This file may not be copied,
// modified, or distributed except according to the terms of this
// license.
//!
//! Each [`Method`](enum.Method.html) describes one __crypt__(3) scheme:
//! the marker (_ident_) it puts in front of the salt, the number of
//! random salt characters it needs, the length of a finished hash, and
//! the bounds of its cost parameter, if it has one.
//!
//! The [`CATALOG`](constant.CATALOG.html) lists every method this crate
//! knows about, ordered from the weakest to the strongest. Whether a
//! method can actually be used depends on the hashing backend; see
//! [`Capabilities`](../probe/struct.Capabilities.html).

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Default rounds for SHA-2 methods, used when no rounds clause is present.
pub const SHA2_DEFAULT_ROUNDS: u32 = 5000;
/// Minimum rounds for SHA-2 methods.
pub const SHA2_MIN_ROUNDS: u32 = 1000;
/// Maximum rounds for SHA-2 methods.
pub const SHA2_MAX_ROUNDS: u32 = 999_999_999;
/// Minimum Blowfish cost (base-2 logarithm of rounds).
pub const BLOWFISH_MIN_COST: u32 = 4;
/// Maximum Blowfish cost.
pub const BLOWFISH_MAX_COST: u32 = 31;
/// Blowfish cost used when rounds aren't specified.
pub const BLOWFISH_DEFAULT_COST: u32 = 12;

/// Revisions of the Blowfish scheme, identified by their marker.
///
/// The computation is essentially the same for all of them; they differ in
/// bug fixes made over the years to the reference implementations, and
/// backends may recognize only some of them. From oldest to newest:
///
/// * **2** is the original OpenBSD version.
///
/// * **2a** fixed the handling of repeated strings in passwords.
///
/// * **2y** is Openwall's fix for a sign-extension bug with high-bit-set
/// characters.
///
/// * **2b** is OpenBSD's fix for a length wraparound bug, and the variant
/// most systems produce today.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BlowfishVariant {
    /// Original OpenBSD variant.
    V2,
    /// Second OpenBSD variant, fixed repeated string hashing.
    V2a,
    /// Openwall variant, fixed a sign extension bug.
    V2y,
    /// Third OpenBSD variant, fixed a wraparound bug.
    V2b,
}

impl BlowfishVariant {
    /// Variants in the order a backend should be asked about them, newest first.
    pub const PREFERENCE: [BlowfishVariant; 4] =
	[BlowfishVariant::V2b, BlowfishVariant::V2y, BlowfishVariant::V2a, BlowfishVariant::V2];

    /// The marker of this variant.
    pub fn ident(self) -> &'static str {
	match self {
	    BlowfishVariant::V2 => "2",
	    BlowfishVariant::V2a => "2a",
	    BlowfishVariant::V2y => "2y",
	    BlowfishVariant::V2b => "2b",
	}
    }
}

impl fmt::Display for BlowfishVariant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
	f.write_str(self.ident())
    }
}

/// A hashing method.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    /// Traditional DES-based hash. Has no marker.
    Crypt,
    /// MD5-based hash.
    Md5,
    /// Blowfish-based adaptive hash (bcrypt).
    Blowfish(BlowfishVariant),
    /// SHA-256-based hash with variable rounds.
    Sha256,
    /// SHA-512-based hash with variable rounds.
    Sha512,
}

/// Traditional DES-based method.
pub const METHOD_CRYPT: Method = Method::Crypt;
/// MD5-based method.
pub const METHOD_MD5: Method = Method::Md5;
/// Blowfish-based method, current (**2b**) revision.
///
/// Backends may accept only an older revision. Use
/// [`Capabilities::by_name`](../probe/struct.Capabilities.html#method.by_name)
/// with `"BLOWFISH"` to check for Blowfish support, rather than looking
/// for this constant. Salts requested for it are made with the revision
/// the backend accepts.
pub const METHOD_BLOWFISH: Method = Method::Blowfish(BlowfishVariant::V2b);
/// SHA-256-based method.
pub const METHOD_SHA256: Method = Method::Sha256;
/// SHA-512-based method.
pub const METHOD_SHA512: Method = Method::Sha512;

/// Every known method, weakest first.
pub const CATALOG: [Method; 8] = [
    Method::Crypt,
    Method::Md5,
    Method::Blowfish(BlowfishVariant::V2),
    Method::Blowfish(BlowfishVariant::V2a),
    Method::Blowfish(BlowfishVariant::V2y),
    Method::Blowfish(BlowfishVariant::V2b),
    Method::Sha256,
    Method::Sha512,
];

impl Method {
    /// Method name. All Blowfish variants share one name.
    pub fn name(self) -> &'static str {
	match self {
	    Method::Crypt => "CRYPT",
	    Method::Md5 => "MD5",
	    Method::Blowfish(_) => "BLOWFISH",
	    Method::Sha256 => "SHA256",
	    Method::Sha512 => "SHA512",
	}
    }

    /// The marker which identifies the method in a salt string, without the
    /// surrounding `$` characters. The traditional method has none.
    pub fn ident(self) -> Option<&'static str> {
	match self {
	    Method::Crypt => None,
	    Method::Md5 => Some("1"),
	    Method::Blowfish(v) => Some(v.ident()),
	    Method::Sha256 => Some("5"),
	    Method::Sha512 => Some("6"),
	}
    }

    /// Number of random salt characters.
    pub fn salt_chars(self) -> usize {
	match self {
	    Method::Crypt => 2,
	    Method::Md5 => 8,
	    Method::Blowfish(_) => 22,
	    Method::Sha256 | Method::Sha512 => 16,
	}
    }

    /// Length of a complete hash made with the default parameters.
    pub fn total_size(self) -> usize {
	match self {
	    Method::Crypt => 13,
	    Method::Md5 => 34,
	    Method::Blowfish(v) => 58 + v.ident().len(),
	    Method::Sha256 => 63,
	    Method::Sha512 => 106,
	}
    }

    /// Whether the method has a cost parameter.
    pub fn supports_rounds(self) -> bool {
	self.rounds_bounds().is_some()
    }

    /// Rounds used when none are given.
    ///
    /// For SHA-2 this is the backend's implicit default, which is not
    /// written into the salt.
    pub fn default_rounds(self) -> Option<u32> {
	match self {
	    Method::Blowfish(_) => Some(1u32 << BLOWFISH_DEFAULT_COST),
	    Method::Sha256 | Method::Sha512 => Some(SHA2_DEFAULT_ROUNDS),
	    _ => None,
	}
    }

    /// Smallest accepted rounds value.
    pub fn min_rounds(self) -> Option<u32> {
	self.rounds_bounds().map(|(min, _)| min)
    }

    /// Largest accepted rounds value.
    pub fn max_rounds(self) -> Option<u32> {
	self.rounds_bounds().map(|(_, max)| max)
    }

    fn rounds_bounds(self) -> Option<(u32, u32)> {
	match self {
	    Method::Blowfish(_) => Some((1u32 << BLOWFISH_MIN_COST, 1u32 << BLOWFISH_MAX_COST)),
	    Method::Sha256 | Method::Sha512 => Some((SHA2_MIN_ROUNDS, SHA2_MAX_ROUNDS)),
	    _ => None,
	}
    }

    /// Look up a method by its marker. `None` selects the traditional method.
    pub fn from_ident(ident: Option<&str>) -> Option<Method> {
	CATALOG.iter().copied().find(|m| m.ident() == ident)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
	write!(f, "METHOD_{}", self.name())
    }
}

/// Unknown method name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown method: {0}")]
pub struct UnknownMethod(pub String);

impl FromStr for Method {
    type Err = UnknownMethod;

    /// Parses a method name, case-insensitively, with or without the
    /// `METHOD_` prefix. `BLOWFISH` stands for the current revision.
    fn from_str(s: &str) -> Result<Method, UnknownMethod> {
	let upper = s.to_ascii_uppercase();
	let name = upper.strip_prefix("METHOD_").unwrap_or(&upper);
	match name {
	    "CRYPT" => Ok(METHOD_CRYPT),
	    "MD5" => Ok(METHOD_MD5),
	    "BLOWFISH" => Ok(METHOD_BLOWFISH),
	    "SHA256" => Ok(METHOD_SHA256),
	    "SHA512" => Ok(METHOD_SHA512),
	    _ => Err(UnknownMethod(s.to_owned())),
	}
    }
}
