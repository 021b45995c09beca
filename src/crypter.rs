//! Hashing with a particular backend.
//
// Copyright (c) 2016 Ivan Nejgebauer <inejge@gmail.com>
//
// Licensed under the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>. This file may not be copied,
// modified, or distributed except according to the terms of this
// license.
//!
//! A [`Crypter`](struct.Crypter.html) pairs a backend with the list of
//! methods it supports. The list is computed when first needed, exactly
//! once; callers racing to be first wait for the single probe to finish.

use std::borrow::Cow;
use std::sync::OnceLock;

use super::{FindNul, Result};
use crate::backend::CryptBackend;
use crate::method::Method;
use crate::probe::{detect_supported, Capabilities};
use crate::salt::{make_salt, RoundsValue};

/// A backend and its supported methods.
pub struct Crypter<B> {
    backend: B,
    capabilities: OnceLock<Capabilities>,
}

impl<B: CryptBackend> Crypter<B> {
    /// Wrap a backend. Nothing is probed until the methods are needed.
    pub fn new(backend: B) -> Crypter<B> {
	Crypter { backend, capabilities: OnceLock::new() }
    }

    /// The wrapped backend.
    pub fn backend(&self) -> &B {
	&self.backend
    }

    /// Supported methods, probing the backend on first use.
    pub fn capabilities(&self) -> &Capabilities {
	self.capabilities.get_or_init(|| detect_supported(&self.backend))
    }

    /// Supported methods, weakest first.
    pub fn methods(&self) -> &[Method] {
	self.capabilities().as_slice()
    }

    /// Build a salt string.
    ///
    /// Without a method, the strongest supported one is used. A Blowfish
    /// revision the backend doesn't accept is replaced by the one it does,
    /// if any. Without rounds, the method's default applies. See
    /// [`mksalt`](../fn.mksalt.html) for the possible errors.
    pub fn mksalt(&self, method: Option<Method>, rounds: Option<RoundsValue>) -> Result<String> {
	let method = match method {
	    Some(Method::Blowfish(v)) => {
		let caps = self.capabilities();
		let requested = Method::Blowfish(v);
		if caps.contains(requested) {
		    requested
		} else {
		    caps.by_name("BLOWFISH").unwrap_or(requested)
		}
	    },
	    Some(method) => method,
	    None => self.capabilities().strongest(),
	};
	make_salt(method, rounds.as_ref())
    }

    /// Hash a password.
    ///
    /// The password is truncated at the first NUL byte, if any. Returns
    /// `None` if the backend can't compute the hash. See
    /// [`crypt`](../fn.crypt.html).
    pub fn crypt<'a, P, S>(&self, pass: P, salt: S) -> Option<String>
	where P: AsRef<[u8]>, S: IntoSalt<'a>
    {
	let setting = salt.into_salt(self)?;
	self.backend.crypt(pass.as_ref().nul_terminated_subslice(), &setting)
    }
}

impl<B: CryptBackend + Default> Default for Crypter<B> {
    fn default() -> Self {
	Crypter::new(B::default())
    }
}

/// A trait for converting a type into a salt string.
///
/// Implemented for salt strings and complete hashes (`&str`, `&String`),
/// which are used as they are, and for methods (`Method`,
/// `Option<Method>`), for which a new salt is generated. `None` stands
/// for the strongest supported method.
pub trait IntoSalt<'a> {
    /// The conversion function. Returns `None` if no salt can be made.
    fn into_salt<B: CryptBackend>(self, crypter: &Crypter<B>) -> Option<Cow<'a, str>>;
}

impl<'a> IntoSalt<'a> for &'a str {
    fn into_salt<B: CryptBackend>(self, _crypter: &Crypter<B>) -> Option<Cow<'a, str>> {
	Some(Cow::Borrowed(self))
    }
}

impl<'a> IntoSalt<'a> for &'a String {
    fn into_salt<B: CryptBackend>(self, _crypter: &Crypter<B>) -> Option<Cow<'a, str>> {
	Some(Cow::Borrowed(self.as_str()))
    }
}

impl<'a> IntoSalt<'a> for Method {
    fn into_salt<B: CryptBackend>(self, crypter: &Crypter<B>) -> Option<Cow<'a, str>> {
	crypter.mksalt(Some(self), None).ok().map(Cow::Owned)
    }
}

impl<'a> IntoSalt<'a> for Option<Method> {
    fn into_salt<B: CryptBackend>(self, crypter: &Crypter<B>) -> Option<Cow<'a, str>> {
	crypter.mksalt(self, None).ok().map(Cow::Owned)
    }
}
