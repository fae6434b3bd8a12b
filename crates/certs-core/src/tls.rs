// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Secret data key holding the CA certificate.
pub const CA_KEY: &str = "ca";
/// Secret data key holding the certificate.
pub const CRT_KEY: &str = "crt";
/// Secret data key holding the private key.
pub const KEY_KEY: &str = "key";

/// Private key bytes.
///
/// Zeroized on drop and redacted from `Debug`; call [`PrivateKey::expose`]
/// to read the bytes.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
	inner: Vec<u8>,
}

impl PrivateKey {
	pub fn new(bytes: Vec<u8>) -> Self {
		Self { inner: bytes }
	}

	pub fn expose(&self) -> &[u8] {
		&self.inner
	}

	pub fn len(&self) -> usize {
		self.inner.len()
	}

	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}
}

impl fmt::Debug for PrivateKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("PrivateKey([REDACTED])")
	}
}

impl PartialEq for PrivateKey {
	fn eq(&self, other: &Self) -> bool {
		self.inner == other.inner
	}
}

impl Eq for PrivateKey {}

impl From<Vec<u8>> for PrivateKey {
	fn from(bytes: Vec<u8>) -> Self {
		Self::new(bytes)
	}
}

/// Decoded material of one certificate secret.
///
/// Only ever built from a secret carrying all three data keys, so every
/// field is populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsBundle {
	pub ca: Vec<u8>,
	pub crt: Vec<u8>,
	pub key: PrivateKey,
}

impl TlsBundle {
	pub fn new(ca: Vec<u8>, crt: Vec<u8>, key: impl Into<PrivateKey>) -> Self {
		Self {
			ca,
			crt,
			key: key.into(),
		}
	}
}
