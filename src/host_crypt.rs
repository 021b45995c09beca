// System crypt_r(3) binding.
//
// Copyright (c) 2016 Ivan Nejgebauer <inejge@gmail.com>
//
// Licensed under the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>. This file may not be copied,
// modified, or distributed except according to the terms of this
// license.

use std::ffi::{CStr, CString};

use libc::{c_char, c_void};
use zeroize::Zeroizing;

use crate::backend::CryptBackend;

// Large enough for struct crypt_data of both libxcrypt (32 KiB) and
// historical glibc (about 128 KiB). Allocated as u64 for alignment.
const CRYPT_DATA_WORDS: usize = (256 * 1024) / 8;

#[link(name = "crypt")]
extern "C" {
    fn crypt_r(phrase: *const c_char, setting: *const c_char, data: *mut c_void) -> *mut c_char;
}

/// The host's __crypt_r__(3).
///
/// Every call uses its own zeroed work area, which is wiped afterwards,
/// so calls from different threads don't interfere. The set of methods
/// depends on how the system library was built.
#[derive(Clone, Copy, Debug, Default)]
pub struct HostCrypt;

impl CryptBackend for HostCrypt {
    fn crypt(&self, pass: &[u8], setting: &str) -> Option<String> {
	let phrase = Zeroizing::new(CString::new(pass).ok()?);
	let setting = CString::new(setting).ok()?;
	let mut data = Zeroizing::new(vec![0u64; CRYPT_DATA_WORDS]);
	// SAFETY: both strings are NUL-terminated and outlive the call; the
	// work area is zeroed, suitably aligned, and at least as large as
	// struct crypt_data. The result points into the work area, and is
	// copied out before the area is dropped.
	let hash = unsafe {
	    let res = crypt_r(phrase.as_ptr(), setting.as_ptr(), data.as_mut_ptr() as *mut c_void);
	    if res.is_null() {
		return None;
	    }
	    CStr::from_ptr(res).to_str().ok()?.to_owned()
	};
	// libxcrypt reports failure with a token starting with '*'.
	if hash.is_empty() || hash.starts_with('*') {
	    return None;
	}
	Some(hash)
    }
}
