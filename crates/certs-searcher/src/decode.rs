// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::collections::BTreeMap;

use certs_core::{Cert, TlsBundle, CA_KEY, CERTIFICATE_LABEL, CLUSTER_ID_LABEL, CRT_KEY, KEY_KEY};
use certs_k8s::{ByteString, Secret};

use crate::error::InvalidSecretError;

/// Validate that `secret` holds `cert` for `cluster_id` and decode its
/// material.
///
/// The cluster-ID and certificate labels must equal the requested values and
/// the `ca`, `crt` and `key` data keys must all be present.
pub fn tls_from_secret(
	secret: Secret,
	cluster_id: &str,
	cert: Cert,
) -> Result<TlsBundle, InvalidSecretError> {
	let labels = secret.metadata.labels.unwrap_or_default();
	expect_label(&labels, CLUSTER_ID_LABEL, cluster_id)?;
	expect_label(&labels, CERTIFICATE_LABEL, cert.as_str())?;

	let mut data = secret.data.unwrap_or_default();
	let ca = take_key(&mut data, CA_KEY)?;
	let crt = take_key(&mut data, CRT_KEY)?;
	let key = take_key(&mut data, KEY_KEY)?;

	Ok(TlsBundle::new(ca, crt, key))
}

fn expect_label(
	labels: &BTreeMap<String, String>,
	label: &'static str,
	expected: &str,
) -> Result<(), InvalidSecretError> {
	let actual = labels.get(label);
	if actual.map(String::as_str) == Some(expected) {
		return Ok(());
	}
	Err(InvalidSecretError::LabelMismatch {
		label,
		expected: expected.to_string(),
		actual: actual.cloned(),
	})
}

fn take_key(
	data: &mut BTreeMap<String, ByteString>,
	key: &'static str,
) -> Result<Vec<u8>, InvalidSecretError> {
	data
		.remove(key)
		.map(|ByteString(bytes)| bytes)
		.ok_or(InvalidSecretError::MissingKey { key })
}

#[cfg(test)]
mod tests {
	use super::*;
	use certs_core::secret_labels;
	use certs_k8s::ObjectMeta;

	fn secret(labels: BTreeMap<String, String>, keys: &[&str]) -> Secret {
		Secret {
			metadata: ObjectMeta {
				labels: Some(labels),
				..Default::default()
			},
			data: Some(
				keys
					.iter()
					.map(|k| (k.to_string(), ByteString(format!("{k}-bytes").into_bytes())))
					.collect(),
			),
			..Default::default()
		}
	}

	#[test]
	fn decodes_all_three_keys() {
		let s = secret(secret_labels("c-1", Cert::Api), &["ca", "crt", "key"]);

		let tls = tls_from_secret(s, "c-1", Cert::Api).unwrap();

		assert_eq!(tls.ca, b"ca-bytes");
		assert_eq!(tls.crt, b"crt-bytes");
		assert_eq!(tls.key.expose(), b"key-bytes");
	}

	#[test]
	fn extra_data_keys_are_ignored() {
		let s = secret(secret_labels("c-1", Cert::Api), &["ca", "crt", "key", "ca.pem"]);
		assert!(tls_from_secret(s, "c-1", Cert::Api).is_ok());
	}

	#[test]
	fn cluster_label_mismatch_is_rejected() {
		let s = secret(secret_labels("c-2", Cert::Api), &["ca", "crt", "key"]);

		let err = tls_from_secret(s, "c-1", Cert::Api).unwrap_err();

		assert_eq!(
			err,
			InvalidSecretError::LabelMismatch {
				label: CLUSTER_ID_LABEL,
				expected: "c-1".to_string(),
				actual: Some("c-2".to_string()),
			}
		);
	}

	#[test]
	fn certificate_label_mismatch_is_rejected() {
		let s = secret(secret_labels("c-1", Cert::Etcd), &["ca", "crt", "key"]);

		let err = tls_from_secret(s, "c-1", Cert::Api).unwrap_err();

		assert!(matches!(
			err,
			InvalidSecretError::LabelMismatch { label: CERTIFICATE_LABEL, .. }
		));
	}

	#[test]
	fn missing_labels_are_rejected() {
		let s = Secret::default();
		let err = tls_from_secret(s, "c-1", Cert::Api).unwrap_err();
		assert!(matches!(
			err,
			InvalidSecretError::LabelMismatch { actual: None, .. }
		));
	}

	#[test]
	fn each_missing_key_is_named() {
		for missing in ["ca", "crt", "key"] {
			let keys: Vec<&str> = ["ca", "crt", "key"]
				.into_iter()
				.filter(|k| *k != missing)
				.collect();
			let s = secret(secret_labels("c-1", Cert::Worker), &keys);

			let err = tls_from_secret(s, "c-1", Cert::Worker).unwrap_err();

			assert_eq!(err, InvalidSecretError::MissingKey { key: missing });
		}
	}

	#[test]
	fn secret_without_data_is_missing_ca() {
		let s = Secret {
			metadata: ObjectMeta {
				labels: Some(secret_labels("c-1", Cert::Worker)),
				..Default::default()
			},
			..Default::default()
		};
		let err = tls_from_secret(s, "c-1", Cert::Worker).unwrap_err();
		assert_eq!(err, InvalidSecretError::MissingKey { key: "ca" });
	}
}
