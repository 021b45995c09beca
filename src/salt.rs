//! Salt string construction and decoding.
//
// Copyright (c) 2016 Ivan Nejgebauer <inejge@gmail.com>
//
// Licensed under the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>. This file may not be copied,
// modified, or distributed except according to the terms of this
// license.
//!
//! # Salt Format
//!
//! * Traditional: two salt characters, no marker.
//!
//! * MD5: __`$1$`__*`{salt}`*, with up to 8 salt characters.
//!
//! * SHA-256 and SHA-512: __`$5$`__ or __`$6$`__, an optional
//!   __`rounds=`__*`{rounds}`*__`$`__ clause, and up to 16 salt
//!   characters. Without the clause, the backend uses 5000 rounds.
//!
//! * Blowfish: __`$`__*`{variant}`*__`$`__*`{cost}`*__`$`__*`{salt}`*,
//!   where *`{cost}`* is the base-2 logarithm of rounds written as two
//!   digits, and *`{salt}`* is exactly 22 characters.
//!
//! A complete hash is the salt string followed by the checksum, separated
//! by `$` except for the traditional and Blowfish formats, where the
//! checksum follows the salt directly.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use super::Result;
use crate::enc_dec::is_salt_str;
use crate::error::Error;
use crate::method::{Method, BLOWFISH_DEFAULT_COST, BLOWFISH_MAX_COST, BLOWFISH_MIN_COST};
use crate::parse::HashSlice;
use crate::random;

/// A rounds argument, as supplied by the caller.
///
/// Only integers are acceptable rounds values, but the argument may come
/// from a source which doesn't guarantee that, like a configuration file or
/// the command line. Converting from a number keeps its kind; converting
/// from a `&str` with `From` always produces `Text`, while `parse` (via
/// `FromStr`) recognizes numbers in the string.
#[derive(Clone, Debug, PartialEq)]
pub enum RoundsValue {
    /// An integer.
    Int(i128),
    /// A floating point number, even if it has no fractional part.
    Float(f64),
    /// Anything else.
    Text(String),
}

impl RoundsValue {
    fn kind(&self) -> &'static str {
	match self {
	    RoundsValue::Int(_) => "integer",
	    RoundsValue::Float(_) => "float",
	    RoundsValue::Text(_) => "string",
	}
    }
}

macro_rules! rounds_from_int {
    ($($t:ty),*) => {
	$(impl From<$t> for RoundsValue {
	    fn from(v: $t) -> RoundsValue {
		RoundsValue::Int(v as i128)
	    }
	})*
    }
}

rounds_from_int!(i8, i16, i32, i64, i128, u8, u16, u32, u64, usize, isize);

impl From<f64> for RoundsValue {
    fn from(v: f64) -> RoundsValue {
	RoundsValue::Float(v)
    }
}

impl From<f32> for RoundsValue {
    fn from(v: f32) -> RoundsValue {
	RoundsValue::Float(v as f64)
    }
}

impl From<&str> for RoundsValue {
    fn from(v: &str) -> RoundsValue {
	RoundsValue::Text(v.to_owned())
    }
}

impl From<String> for RoundsValue {
    fn from(v: String) -> RoundsValue {
	RoundsValue::Text(v)
    }
}

impl FromStr for RoundsValue {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<RoundsValue, Infallible> {
	let t = s.trim();
	if let Ok(i) = t.parse::<i128>() {
	    return Ok(RoundsValue::Int(i));
	}
	let digits = t.strip_prefix(&['-', '+'][..]).unwrap_or(t);
	if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
	    // Too large for i128; keep it an integer so that it's rejected as out of range.
	    return Ok(RoundsValue::Int(if t.starts_with('-') { i128::MIN } else { i128::MAX }));
	}
	if let Ok(f) = t.parse::<f64>() {
	    return Ok(RoundsValue::Float(f));
	}
	Ok(RoundsValue::Text(s.to_owned()))
    }
}

impl fmt::Display for RoundsValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
	match self {
	    RoundsValue::Int(i) => write!(f, "{}", i),
	    RoundsValue::Float(x) => write!(f, "{:?}", x),
	    RoundsValue::Text(s) => write!(f, "{:?}", s),
	}
    }
}

fn check_rounds(method: Method, rounds: Option<&RoundsValue>) -> Result<Option<u32>> {
    let value = match rounds {
	Some(value) => value,
	None => return Ok(None),
    };
    let (min, max) = match (method.min_rounds(), method.max_rounds()) {
	(Some(min), Some(max)) => (i128::from(min), i128::from(max)),
	_ => return Err(Error::UnsupportedParameter(
		format!("{} doesn't support the rounds argument", method))),
    };
    let r = match *value {
	RoundsValue::Int(r) => r,
	ref other => return Err(Error::InvalidArgumentType(
		format!("{} {} cannot be interpreted as an integer", other.kind(), other))),
    };
    if r <= 0 {
	return Err(Error::InvalidRange(format!("rounds must be positive, got {}", r)));
    }
    if let Method::Blowfish(_) = method {
	if r & (r - 1) != 0 {
	    return Err(Error::InvalidRange("rounds must be a power of 2".into()));
	}
	if r < min || r > max {
	    return Err(Error::InvalidRange(format!("rounds out of the range 2**{} to 2**{}",
		BLOWFISH_MIN_COST, BLOWFISH_MAX_COST)));
	}
    } else if r < min || r > max {
	return Err(Error::InvalidRange(format!("rounds out of the range {} to {}", min, max)));
    }
    Ok(Some(r as u32))
}

/// Build a salt string for `method` with fresh random salt characters.
///
/// The rounds argument is validated before anything else is done.
pub fn make_salt(method: Method, rounds: Option<&RoundsValue>) -> Result<String> {
    let rounds = check_rounds(method, rounds)?;
    tracing::trace!(method = %method, rounds = ?rounds, "building salt");
    let mut s = String::with_capacity(method.total_size());
    if let Some(ident) = method.ident() {
	s.push('$');
	s.push_str(ident);
	s.push('$');
    }
    match method {
	Method::Blowfish(_) => {
	    let cost = rounds.map_or(BLOWFISH_DEFAULT_COST, u32::trailing_zeros);
	    s.push_str(&format!("{:02}$", cost));
	},
	Method::Sha256 | Method::Sha512 => if let Some(r) = rounds {
	    s.push_str(&format!("rounds={}$", r));
	},
	Method::Crypt | Method::Md5 => (),
    }
    s.push_str(&random::gen_salt_str(method.salt_chars()));
    Ok(s)
}

/// The components of a salt string or a complete hash.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParsedSalt<'a> {
    /// The method named by the marker.
    pub method: Method,
    /// Rounds, if given in the string. For Blowfish, this is the number of
    /// rounds, not the cost.
    pub rounds: Option<u32>,
    /// Salt characters.
    pub salt: &'a str,
    /// Checksum, if the string is a complete hash.
    pub checksum: Option<&'a str>,
}

impl<'a> ParsedSalt<'a> {
    /// Decode a salt string or a complete hash.
    ///
    /// Returns `None` if the string doesn't follow the format of any known
    /// method. SHA-2 rounds are reported as written, even if the backend
    /// would clamp them; values that don't fit a `u32` saturate to
    /// `u32::MAX`.
    pub fn parse(s: &'a str) -> Option<ParsedSalt<'a>> {
	let mut hs = HashSlice::new(s);
	if !s.starts_with('$') {
	    let salt = hs.take(2)?;
	    if !is_salt_str(salt) {
		return None;
	    }
	    return Some(ParsedSalt { method: Method::Crypt, rounds: None, salt, checksum: checksum(hs.rest())? });
	}
	hs.take(1)?;
	let method = Method::from_ident(Some(hs.take_until(b'$')?))?;
	let (rounds, salt) = match method {
	    Method::Blowfish(_) => {
		let cost = hs.take_until(b'$')?;
		if cost.len() != 2 || !cost.bytes().all(|b| b.is_ascii_digit()) {
		    return None;
		}
		let cost = cost.parse::<u32>().ok()?;
		if cost < BLOWFISH_MIN_COST || cost > BLOWFISH_MAX_COST {
		    return None;
		}
		(Some(1u32 << cost), hs.take(method.salt_chars())?)
	    },
	    Method::Sha256 | Method::Sha512 => {
		let field = hs.take_field(b'$');
		match field.strip_prefix("rounds=") {
		    Some(r) => {
			if r.is_empty() || !r.bytes().all(|b| b.is_ascii_digit()) {
			    return None;
			}
			// Digits only, so parsing can fail only by overflow.
			(Some(r.parse::<u32>().unwrap_or(u32::MAX)), hs.take_field(b'$'))
		    },
		    None => (None, field),
		}
	    },
	    Method::Md5 => (None, hs.take_field(b'$')),
	    Method::Crypt => return None,
	};
	if salt.len() > method.salt_chars() || !is_salt_str(salt) {
	    return None;
	}
	Some(ParsedSalt { method, rounds, salt, checksum: checksum(hs.rest())? })
    }
}

// Outer None: invalid characters. Inner None: no checksum.
fn checksum(rest: &str) -> Option<Option<&str>> {
    if rest.is_empty() {
	Some(None)
    } else if is_salt_str(rest) {
	Some(Some(rest))
    } else {
	None
    }
}

impl fmt::Display for ParsedSalt<'_> {
    /// Writes the salt string, without the checksum.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
	if let Some(ident) = self.method.ident() {
	    write!(f, "${}$", ident)?;
	}
	match (self.method, self.rounds) {
	    (Method::Blowfish(_), Some(r)) => write!(f, "{:02}$", r.trailing_zeros())?,
	    (Method::Sha256, Some(r)) | (Method::Sha512, Some(r)) => write!(f, "rounds={}$", r)?,
	    _ => (),
	}
	f.write_str(self.salt)
    }
}

/// Recognize the method of a salt string or hash by its marker.
///
/// Only the prefix is examined. A string without a marker is taken to be
/// traditional if it starts with two salt characters.
pub fn identify(hash: &str) -> Option<Method> {
    let mut hs = HashSlice::new(hash);
    if hash.starts_with('$') {
	hs.take(1)?;
	Method::from_ident(Some(hs.take_until(b'$')?))
    } else {
	hs.take(2).filter(|s| is_salt_str(s)).map(|_| Method::Crypt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::*;

    fn rounds_len(salt: &str, method: Method) -> usize {
	salt.len() - method.salt_chars()
    }

    #[test]
    fn plain_salts() {
	let s = make_salt(METHOD_CRYPT, None).unwrap();
	assert_eq!(s.len(), 2);
	assert!(is_salt_str(&s));
	let s = make_salt(METHOD_MD5, None).unwrap();
	assert!(s.starts_with("$1$"));
	assert_eq!(rounds_len(&s, METHOD_MD5), 3);
	let s = make_salt(METHOD_SHA512, None).unwrap();
	assert!(s.starts_with("$6$"));
	assert_eq!(s.len(), 3 + 16);
    }

    #[test]
    fn salts_differ() {
	let a = make_salt(METHOD_SHA256, None).unwrap();
	let b = make_salt(METHOD_SHA256, None).unwrap();
	assert_ne!(a, b);
    }

    #[test]
    fn salt_shorter_than_hash() {
	for &m in CATALOG.iter() {
	    let s = make_salt(m, None).unwrap();
	    assert!(s.len() <= m.total_size());
	    assert_eq!(identify(&s), Some(m));
	}
    }

    #[test]
    fn sha2_rounds() {
	for &m in &[METHOD_SHA256, METHOD_SHA512] {
	    for &r in &[1000u32, 5000, 10_000, 100_000, 999_999_999] {
		let s = make_salt(m, Some(&r.into())).unwrap();
		assert!(s.contains(&format!("$rounds={}$", r)));
		assert_eq!(rounds_len(&s, m), 11 + r.to_string().len());
		assert_eq!(ParsedSalt::parse(&s).unwrap().rounds, Some(r));
	    }
	}
    }

    #[test]
    fn blowfish_rounds() {
	for log_rounds in 4..=11 {
	    let r = 1u32 << log_rounds;
	    let s = make_salt(METHOD_BLOWFISH, Some(&r.into())).unwrap();
	    assert!(s.contains(&format!("${:02}$", log_rounds)));
	    assert_eq!(rounds_len(&s, METHOD_BLOWFISH), 7);
	    assert_eq!(ParsedSalt::parse(&s).unwrap().rounds, Some(r));
	}
	let s = make_salt(Method::Blowfish(BlowfishVariant::V2), Some(&16i32.into())).unwrap();
	assert!(s.starts_with("$2$04$"));
	assert_eq!(rounds_len(&s, METHOD_BLOWFISH), 6);
	let s = make_salt(METHOD_BLOWFISH, None).unwrap();
	assert!(s.starts_with("$2b$12$"));
	let s = make_salt(METHOD_BLOWFISH, Some(&RoundsValue::from(1u64 << 31))).unwrap();
	assert!(s.starts_with("$2b$31$"));
    }

    #[test]
    fn invalid_rounds() {
	for &m in &[METHOD_SHA256, METHOD_SHA512, METHOD_BLOWFISH] {
	    assert!(matches!(make_salt(m, Some(&"4096".into())), Err(Error::InvalidArgumentType(_))));
	    assert!(matches!(make_salt(m, Some(&4096.0f64.into())), Err(Error::InvalidArgumentType(_))));
	    for r in &[RoundsValue::Int(0), 1i32.into(), (-1i32).into(), "1".repeat(400).parse().unwrap()] {
		assert!(matches!(make_salt(m, Some(r)), Err(Error::InvalidRange(_))), "{} {}", m, r);
	    }
	}
	assert!(matches!(make_salt(METHOD_BLOWFISH, Some(&1000i32.into())), Err(Error::InvalidRange(_))));
	assert!(matches!(make_salt(METHOD_BLOWFISH, Some(&8i32.into())), Err(Error::InvalidRange(_))));
	assert!(matches!(make_salt(METHOD_SHA256, Some(&999i32.into())), Err(Error::InvalidRange(_))));
	assert!(matches!(make_salt(METHOD_SHA256, Some(&1_000_000_000i64.into())), Err(Error::InvalidRange(_))));
	for &m in &[METHOD_CRYPT, METHOD_MD5] {
	    match make_salt(m, Some(&4096i32.into())) {
		Err(Error::UnsupportedParameter(msg)) => assert!(msg.contains("support")),
		other => panic!("unexpected {:?}", other),
	    }
	}
    }

    #[test]
    fn unsupported_checked_first() {
	assert!(matches!(make_salt(METHOD_MD5, Some(&"x".into())), Err(Error::UnsupportedParameter(_))));
	assert!(matches!(make_salt(METHOD_CRYPT, Some(&(-5i32).into())), Err(Error::UnsupportedParameter(_))));
	assert!(matches!(make_salt(METHOD_SHA512, Some(&(-5.5f64).into())), Err(Error::InvalidArgumentType(_))));
    }

    #[test]
    fn rounds_from_str() {
	assert_eq!("4096".parse::<RoundsValue>().unwrap(), RoundsValue::Int(4096));
	assert_eq!(" -3 ".parse::<RoundsValue>().unwrap(), RoundsValue::Int(-3));
	assert_eq!("4096.0".parse::<RoundsValue>().unwrap(), RoundsValue::Float(4096.0));
	assert_eq!("lots".parse::<RoundsValue>().unwrap(), RoundsValue::Text("lots".into()));
	assert_eq!("9".repeat(50).parse::<RoundsValue>().unwrap(), RoundsValue::Int(i128::MAX));
    }

    #[test]
    fn parse_hashes() {
	let p = ParsedSalt::parse("$5$rounds=11858$WH1ABM5sKhxbkgCK$aTQsjPkz0rBsH3lQlJxw9HDTDXPKBxC0LlVeV69P.t1").unwrap();
	assert_eq!(p.method, METHOD_SHA256);
	assert_eq!(p.rounds, Some(11858));
	assert_eq!(p.salt, "WH1ABM5sKhxbkgCK");
	assert_eq!(p.checksum, Some("aTQsjPkz0rBsH3lQlJxw9HDTDXPKBxC0LlVeV69P.t1"));
	assert_eq!(p.to_string(), "$5$rounds=11858$WH1ABM5sKhxbkgCK");

	let p = ParsedSalt::parse("$2y$05$bvIG6Nmid91Mu9RcmmWZfO5HJIMCT8riNW0hEp8f6/FuA2/mHZFpe").unwrap();
	assert_eq!(p.method, Method::Blowfish(BlowfishVariant::V2y));
	assert_eq!(p.rounds, Some(32));
	assert_eq!(p.salt, "bvIG6Nmid91Mu9RcmmWZfO");
	assert_eq!(p.to_string(), "$2y$05$bvIG6Nmid91Mu9RcmmWZfO");

	let p = ParsedSalt::parse("aZGJuE6EXrjEE").unwrap();
	assert_eq!(p.method, METHOD_CRYPT);
	assert_eq!(p.salt, "aZ");
	assert_eq!(p.checksum, Some("GJuE6EXrjEE"));

	let p = ParsedSalt::parse("$1$5pZSV9va").unwrap();
	assert_eq!(p.method, METHOD_MD5);
	assert_eq!(p.salt, "5pZSV9va");
	assert_eq!(p.checksum, None);
    }

    #[test]
    fn parse_huge_sha2_rounds() {
	let s = "$5$rounds=99999999999$abc";
	let p = ParsedSalt::parse(s).unwrap();
	assert_eq!(p.method, METHOD_SHA256);
	assert_eq!(p.rounds, Some(u32::MAX));
	assert_eq!(p.salt, "abc");
	assert_eq!(identify(s), Some(METHOD_SHA256));
    }

    #[test]
    fn parse_rejects() {
	for bad in &["", "a", "!!", "_J9..CCCC", "$3$abc", "$$abc", "$1$toolongsalt", "$1$ab!d",
		     "$2b$4$bvIG6Nmid91Mu9RcmmWZfO", "$2b$03$bvIG6Nmid91Mu9RcmmWZfO",
		     "$2b$05$short", "$5$rounds=$abc", "$5$rounds=x1$abc", "$6$abc$bad!"] {
	    assert_eq!(ParsedSalt::parse(bad), None, "{}", bad);
	}
    }

    #[test]
    fn parse_own_salts() {
	for &m in CATALOG.iter() {
	    let s = make_salt(m, None).unwrap();
	    let p = ParsedSalt::parse(&s).unwrap();
	    assert_eq!(p.method, m);
	    assert_eq!(p.salt.len(), m.salt_chars());
	    assert_eq!(p.to_string(), s);
	}
    }

    #[test]
    fn identify_prefix() {
	assert_eq!(identify("$6$whatever"), Some(METHOD_SHA512));
	assert_eq!(identify("$2a$"), Some(Method::Blowfish(BlowfishVariant::V2a)));
	assert_eq!(identify("ab"), Some(METHOD_CRYPT));
	assert_eq!(identify("$7$abc"), None);
	assert_eq!(identify("$6"), None);
	assert_eq!(identify("a"), None);
    }
}
