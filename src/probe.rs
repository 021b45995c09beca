//! Detection of the methods a backend supports.
//
// Copyright (c) 2016 Ivan Nejgebauer <inejge@gmail.com>
//
// Licensed under the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>. This file may not be copied,
// modified, or distributed except according to the terms of this
// license.
//!
//! A backend is asked to hash an empty password with a minimal salt for
//! each method in the catalog. The method is accepted if the result has
//! the expected length and still carries the method's marker; some
//! systems quietly fall back to the traditional method when they don't
//! recognize a marker.

use std::slice;

use crate::backend::CryptBackend;
use crate::method::{BlowfishVariant, Method, CATALOG, BLOWFISH_MIN_COST};
use crate::salt::{make_salt, RoundsValue};

const PROBE_PASSWORD: &[u8] = b"";

/// Methods usable with a particular backend, weakest first.
///
/// The traditional method is always included.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Capabilities {
    methods: Vec<Method>,
}

impl Capabilities {
    /// The methods, weakest first.
    pub fn as_slice(&self) -> &[Method] {
	&self.methods
    }

    /// Iterate over the methods, weakest first.
    pub fn iter(&self) -> slice::Iter<'_, Method> {
	self.methods.iter()
    }

    /// Number of supported methods.
    pub fn len(&self) -> usize {
	self.methods.len()
    }

    /// Always false, but provided for completeness.
    pub fn is_empty(&self) -> bool {
	self.methods.is_empty()
    }

    /// Whether `method` is supported. Blowfish revisions are distinct methods.
    pub fn contains(&self, method: Method) -> bool {
	self.methods.contains(&method)
    }

    /// The strongest supported method, the default for new hashes.
    pub fn strongest(&self) -> Method {
	self.methods.last().copied().unwrap_or(Method::Crypt)
    }

    /// Find a supported method by name, e.g. `"BLOWFISH"`, which yields the
    /// Blowfish revision the backend accepts.
    pub fn by_name(&self, name: &str) -> Option<Method> {
	let name = name.to_ascii_uppercase();
	let name = name.strip_prefix("METHOD_").unwrap_or(&name);
	self.methods.iter().copied().find(|m| m.name() == name)
    }
}

impl<'a> IntoIterator for &'a Capabilities {
    type Item = &'a Method;
    type IntoIter = slice::Iter<'a, Method>;

    fn into_iter(self) -> Self::IntoIter {
	self.methods.iter()
    }
}

fn probe_salt(method: Method) -> Option<String> {
    let rounds: Option<RoundsValue> = match method {
	Method::Blowfish(_) => Some((1u32 << BLOWFISH_MIN_COST).into()),
	_ => None,
    };
    make_salt(method, rounds.as_ref()).ok()
}

fn probe<B: CryptBackend + ?Sized>(backend: &B, method: Method) -> bool {
    let setting = match probe_salt(method) {
	Some(setting) => setting,
	None => return false,
    };
    let supported = match backend.crypt(PROBE_PASSWORD, &setting) {
	Some(hash) => hash.len() == method.total_size()
	    && method.ident().map_or(true, |ident| hash.starts_with(&format!("${}$", ident))),
	None => false,
    };
    tracing::debug!(method = %method, ident = ?method.ident(), supported, "probed method");
    supported
}

/// Ask `backend` which catalog methods it supports.
///
/// Of the Blowfish revisions, only the newest supported one is kept. The
/// traditional method is added even if the probe rejects it.
pub fn detect_supported<B: CryptBackend + ?Sized>(backend: &B) -> Capabilities {
    let blowfish = BlowfishVariant::PREFERENCE.iter()
	.map(|&v| Method::Blowfish(v))
	.find(|&m| probe(backend, m));
    let mut methods = CATALOG.iter().copied()
	.filter(|&m| match m {
	    Method::Blowfish(_) => Some(m) == blowfish,
	    _ => probe(backend, m),
	})
	.collect::<Vec<_>>();
    if methods.first() != Some(&Method::Crypt) {
	tracing::warn!("backend rejected the traditional method; keeping it anyway");
	methods.insert(0, Method::Crypt);
    }
    tracing::info!(methods = ?methods.iter().map(|m| m.to_string()).collect::<Vec<_>>(), "detected crypt methods");
    Capabilities { methods }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::backend::PortableCrypt;
    use crate::method::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fails everything.
    pub struct NoCrypt;

    impl CryptBackend for NoCrypt {
	fn crypt(&self, _pass: &[u8], _setting: &str) -> Option<String> {
	    None
	}
    }

    /// Ignores markers and always produces a traditional hash, like some
    /// old C libraries.
    pub struct DesOnly;

    impl CryptBackend for DesOnly {
	fn crypt(&self, pass: &[u8], setting: &str) -> Option<String> {
	    let salt = if setting.starts_with('$') { "$1" } else { setting };
	    Some(format!("{:.2}{:011}", salt, pass.len()))
	}
    }

    /// Counts calls to the wrapped backend.
    #[derive(Default)]
    pub struct Counting<B> {
	pub inner: B,
	pub calls: AtomicUsize,
    }

    impl<B: CryptBackend> CryptBackend for Counting<B> {
	fn crypt(&self, pass: &[u8], setting: &str) -> Option<String> {
	    self.calls.fetch_add(1, Ordering::SeqCst);
	    self.inner.crypt(pass, setting)
	}
    }

    /// Knows only the 2y Blowfish revision.
    pub struct Only2y;

    impl CryptBackend for Only2y {
	fn crypt(&self, pass: &[u8], setting: &str) -> Option<String> {
	    if setting.starts_with("$2y$") || !setting.starts_with('$') {
		PortableCrypt.crypt(pass, setting)
	    } else {
		None
	    }
	}
    }

    #[test]
    fn portable() {
	let caps = detect_supported(&PortableCrypt);
	assert_eq!(caps.as_slice(), &[METHOD_CRYPT, METHOD_MD5, METHOD_BLOWFISH, METHOD_SHA256, METHOD_SHA512]);
	assert_eq!(caps.strongest(), METHOD_SHA512);
	assert_eq!(caps.by_name("blowfish"), Some(METHOD_BLOWFISH));
	assert_eq!(caps.by_name("METHOD_MD5"), Some(METHOD_MD5));
    }

    #[test]
    fn nothing_works() {
	let caps = detect_supported(&NoCrypt);
	assert_eq!(caps.as_slice(), &[METHOD_CRYPT]);
	assert_eq!(caps.strongest(), METHOD_CRYPT);
	assert!(!caps.is_empty());
    }

    #[test]
    fn marker_ignored() {
	let caps = detect_supported(&DesOnly);
	assert_eq!(caps.as_slice(), &[METHOD_CRYPT]);
	assert_eq!(caps.by_name("SHA512"), None);
    }

    #[test]
    fn older_blowfish() {
	let caps = detect_supported(&Only2y);
	assert_eq!(caps.as_slice(), &[METHOD_CRYPT, Method::Blowfish(BlowfishVariant::V2y)]);
	assert!(!caps.contains(METHOD_BLOWFISH));
	assert_eq!(caps.by_name("BLOWFISH"), Some(Method::Blowfish(BlowfishVariant::V2y)));
    }

    #[test]
    fn probe_calls() {
	let backend = Counting { inner: PortableCrypt, calls: AtomicUsize::new(0) };
	detect_supported(&backend);
	// Crypt, MD5, SHA256, SHA512, and Blowfish stops at 2b.
	assert_eq!(backend.calls.load(Ordering::SeqCst), 5);
    }
}
