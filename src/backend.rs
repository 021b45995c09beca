//! Hash primitives.
//
// Copyright (c) 2016 Ivan Nejgebauer <inejge@gmail.com>
//
// Licensed under the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>. This file may not be copied,
// modified, or distributed except according to the terms of this
// license.
//!
//! This crate doesn't compute hashes itself. A backend is a
//! __crypt__(3)-style function which takes a password and a salt string
//! (or a complete hash, which embeds its salt) and returns the hash.
//!
//! * [`HostCrypt`](struct.HostCrypt.html) calls __crypt_r__(3) from the
//!   system's `libcrypt`. Available on Linux.
//!
//! * [`PortableCrypt`](struct.PortableCrypt.html) uses the pure Rust
//!   implementations from the `pwhash` crate.
//!
//! [`DefaultBackend`](type.DefaultBackend.html) is the former where
//! available, and the latter otherwise.

#[cfg(target_os = "linux")]
pub use crate::host_crypt::HostCrypt;
pub use crate::portable_crypt::PortableCrypt;

/// The backend used by the crate-level functions.
#[cfg(target_os = "linux")]
pub type DefaultBackend = HostCrypt;
/// The backend used by the crate-level functions.
#[cfg(not(target_os = "linux"))]
pub type DefaultBackend = PortableCrypt;

/// A password hashing primitive.
pub trait CryptBackend: Send + Sync {
    /// Hash `pass` using the method, parameters and salt given by `setting`.
    ///
    /// The password never contains a NUL byte. Returns `None` if the hash
    /// can't be computed, for whatever reason.
    fn crypt(&self, pass: &[u8], setting: &str) -> Option<String>;
}

impl<T: CryptBackend + ?Sized> CryptBackend for &T {
    fn crypt(&self, pass: &[u8], setting: &str) -> Option<String> {
	(**self).crypt(pass, setting)
    }
}

impl<T: CryptBackend + ?Sized> CryptBackend for Box<T> {
    fn crypt(&self, pass: &[u8], setting: &str) -> Option<String> {
	(**self).crypt(pass, setting)
    }
}
