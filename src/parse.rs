// Salt string traversal.
//
// Copyright (c) 2016 Ivan Nejgebauer <inejge@gmail.com>
//
// Licensed under the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>. This file may not be copied,
// modified, or distributed except according to the terms of this
// license.

/// A cursor over a salt or hash string.
///
/// Salt strings are a concatenation of fields, some of fixed width and
/// some terminated by `$`. The cursor hands out those fields in order.
/// All salt grammar is ASCII, so a field boundary that would split a
/// multi-byte character makes the field unavailable.
pub struct HashSlice<'a> {
    s: &'a str,
    pos: usize,
}

impl<'a> HashSlice<'a> {
    pub fn new(s: &'a str) -> HashSlice<'a> {
	HashSlice { s, pos: 0 }
    }

    /// Take exactly `n` bytes. Returns `None`, without advancing, if fewer remain.
    pub fn take(&mut self, n: usize) -> Option<&'a str> {
	let end = self.pos.checked_add(n)?;
	let field = self.s.get(self.pos..end)?;
	self.pos = end;
	Some(field)
    }

    /// Take bytes up to the next `delim`, and skip the delimiter. Returns
    /// `None`, without advancing, if there is no delimiter.
    pub fn take_until(&mut self, delim: u8) -> Option<&'a str> {
	let rest = &self.s.as_bytes()[self.pos..];
	let off = rest.iter().position(|&b| b == delim)?;
	let field = self.s.get(self.pos..self.pos + off)?;
	self.pos += off + 1;
	Some(field)
    }

    /// Take a `delim`-terminated field if there is one, otherwise the rest of the string.
    pub fn take_field(&mut self, delim: u8) -> &'a str {
	match self.take_until(delim) {
	    Some(field) => field,
	    None => self.rest(),
	}
    }

    /// Take everything that's left.
    pub fn rest(&mut self) -> &'a str {
	let rest = self.s.get(self.pos..).unwrap_or("");
	self.pos = self.s.len();
	rest
    }

    #[cfg(test)]
    pub fn at_end(&self) -> bool {
	self.pos >= self.s.len()
    }
}

#[cfg(test)]
mod tests {
    use super::HashSlice;

    #[test]
    fn drain_string() {
	let mut hs = HashSlice::new("$2y$05$bvIG6Nmid91Mu9RcmmWZfO5HJIMCT8riNW0hEp8f6/FuA2/mHZFpe");
	assert_eq!(hs.take(1), Some("$"));
	assert_eq!(hs.take_until(b'$'), Some("2y"));
	assert_eq!(hs.take_until(b'$'), Some("05"));
	assert_eq!(hs.take(22), Some("bvIG6Nmid91Mu9RcmmWZfO"));
	assert_eq!(hs.take_until(b'$'), None);
	assert_eq!(hs.rest(), "5HJIMCT8riNW0hEp8f6/FuA2/mHZFpe");
	assert!(hs.at_end());
	assert_eq!(hs.take(1), None);
    }

    #[test]
    fn fields() {
	let mut hs = HashSlice::new("rounds=1000$salt");
	assert_eq!(hs.take_field(b'$'), "rounds=1000");
	assert_eq!(hs.take_field(b'$'), "salt");
	assert!(hs.at_end());
	assert_eq!(hs.take_field(b'$'), "");
    }

    #[test]
    fn short_take() {
	let mut hs = HashSlice::new("ab");
	assert_eq!(hs.take(3), None);
	assert_eq!(hs.take(2), Some("ab"));
	assert_eq!(hs.take(0), Some(""));
    }

    #[test]
    fn non_ascii() {
	let mut hs = HashSlice::new("aé");
	assert_eq!(hs.take(2), None);
	assert_eq!(hs.take(1), Some("a"));
	assert_eq!(hs.rest(), "é");
    }
}
