// Pure Rust backend.
//
// Copyright (c) 2016 Ivan Nejgebauer <inejge@gmail.com>
//
// Licensed under the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>. This file may not be copied,
// modified, or distributed except according to the terms of this
// license.

use crate::backend::CryptBackend;

/// Hashing with the `pwhash` crate.
///
/// Supports the traditional, MD5, SHA-256 and SHA-512 methods, and the
/// **2a**, **2b** and **2y** Blowfish revisions. Doesn't depend on the
/// system, so it's usable where `libcrypt` isn't, and gives the same
/// results everywhere.
#[derive(Clone, Copy, Debug, Default)]
pub struct PortableCrypt;

impl CryptBackend for PortableCrypt {
    fn crypt(&self, pass: &[u8], setting: &str) -> Option<String> {
	pwhash::unix::crypt(pass, setting).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::PortableCrypt;
    use crate::backend::CryptBackend;

    #[test]
    fn known_hashes() {
	for &(pass, hash) in &[
	    ("test", "aZGJuE6EXrjEE"),
	    ("password", "$1$5pZSV9va$azfrPr6af3Fc7dLblQXVa0"),
	    ("test", "$5$rounds=11858$WH1ABM5sKhxbkgCK$aTQsjPkz0rBsH3lQlJxw9HDTDXPKBxC0LlVeV69P.t1"),
	    ("test", "$5$WH1ABM5sKhxbkgCK$sOnTVjQn1Y3EWibd8gWqqJqjH.KaFrxJE5rijqxcPp7"),
	    ("password", "$2y$05$bvIG6Nmid91Mu9RcmmWZfO5HJIMCT8riNW0hEp8f6/FuA2/mHZFpe"),
	] {
	    assert_eq!(PortableCrypt.crypt(pass.as_bytes(), hash).as_deref(), Some(hash));
	}
    }

    #[test]
    fn salt_only() {
	let h = PortableCrypt.crypt(b"test", "$5$rounds=11858$WH1ABM5sKhxbkgCK").unwrap();
	assert_eq!(h, "$5$rounds=11858$WH1ABM5sKhxbkgCK$aTQsjPkz0rBsH3lQlJxw9HDTDXPKBxC0LlVeV69P.t1");
	assert_eq!(PortableCrypt.crypt(b"test", "aZ").unwrap(), "aZGJuE6EXrjEE");
    }

    #[test]
    fn unknown_setting() {
	assert_eq!(PortableCrypt.crypt(b"test", "$9$nonsense"), None);
	assert_eq!(PortableCrypt.crypt(b"test", "$2$04$bvIG6Nmid91Mu9RcmmWZfO"), None);
    }
}
