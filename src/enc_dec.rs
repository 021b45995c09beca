// Salt alphabet encoding.
//
// Copyright (c) 2016 Ivan Nejgebauer <inejge@gmail.com>
//
// Licensed under the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>. This file may not be copied,
// modified, or distributed except according to the terms of this
// license.

/// The 64 characters which may appear in a salt.
pub const SALT_CHARS: &str = "./0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

const SALT_CHARS_BYTES: &[u8] = SALT_CHARS.as_bytes();

// Reverse map of SALT_CHARS, indexed from 0x20. 0x40 marks a byte outside the alphabet.
const SALT_CHARS_DEC_MAP: &[u8] = b"\x40\x40\x40\x40\x40\x40\x40\x40\x40\x40\x40\x40\x40\x40\x00\x01\
				    \x02\x03\x04\x05\x06\x07\x08\x09\x0a\x0b\x40\x40\x40\x40\x40\x40\
				    \x40\x0c\x0d\x0e\x0f\x10\x11\x12\x13\x14\x15\x16\x17\x18\x19\x1a\
				    \x1b\x1c\x1d\x1e\x1f\x20\x21\x22\x23\x24\x25\x40\x40\x40\x40\x40\
				    \x40\x26\x27\x28\x29\x2a\x2b\x2c\x2d\x2e\x2f\x30\x31\x32\x33\x34\
				    \x35\x36\x37\x38\x39\x3a\x3b\x3c\x3d\x3e\x3f\x40\x40\x40\x40\x40";

/// Position of `b` in the salt alphabet.
pub fn salt_char_value(b: u8) -> Option<u8> {
    let idx = b.checked_sub(0x20)? as usize;
    match SALT_CHARS_DEC_MAP.get(idx) {
	Some(&dec) if dec < 64 => Some(dec),
	_ => None,
    }
}

pub fn is_salt_str(s: &str) -> bool {
    s.bytes().all(|b| salt_char_value(b).is_some())
}

/// Render bytes as salt characters, six bits per character, most
/// significant bits first.
///
/// A trailing partial group is padded with zero bits: one byte yields two
/// characters, two bytes yield three. The last character then carries
/// only the remaining bits of input.
pub fn hash64_encode(bs: &[u8]) -> String {
    let ngroups = (bs.len() + 2) / 3;
    let mut out = String::with_capacity(ngroups * 4);
    for group in bs.chunks(3) {
	let mut enc = 0u32;
	for i in 0..3 {
	    enc <<= 8;
	    enc |= *group.get(i).unwrap_or(&0) as u32;
	}
	for _ in 0..4 {
	    out.push(SALT_CHARS_BYTES[((enc >> 18) & 0x3F) as usize] as char);
	    enc <<= 6;
	}
    }
    match bs.len() % 3 {
	1 => { out.pop(); out.pop(); },
	2 => { out.pop(); },
	_ => (),
    }
    out
}
