// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Writing found certificate material to disk or stdout.

use std::path::{Path, PathBuf};

use anyhow::Context;
use certs_core::{Cert, TlsBundle};
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tracing::info;

pub const CA_FILE: &str = "ca.pem";
pub const CRT_FILE: &str = "crt.pem";
pub const KEY_FILE: &str = "key.pem";

/// Printable description of a found bundle. Never carries key material.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct BundleSummary {
	pub cert: Cert,
	pub ca_bytes: usize,
	pub crt_bytes: usize,
	pub key_bytes: usize,
}

impl BundleSummary {
	pub fn new(cert: Cert, bundle: &TlsBundle) -> Self {
		Self {
			cert,
			ca_bytes: bundle.ca.len(),
			crt_bytes: bundle.crt.len(),
			key_bytes: bundle.key.len(),
		}
	}
}

/// Write each bundle to `<out_dir>/<cert>/` and return the directories written.
pub async fn write_bundles(
	out_dir: &Path,
	members: &[(Cert, &TlsBundle)],
) -> anyhow::Result<Vec<PathBuf>> {
	let mut written = Vec::with_capacity(members.len());
	for (cert, bundle) in members {
		written.push(write_bundle(out_dir, *cert, bundle).await?);
	}
	Ok(written)
}

async fn write_bundle(out_dir: &Path, cert: Cert, bundle: &TlsBundle) -> anyhow::Result<PathBuf> {
	let dir = out_dir.join(cert.as_str());
	tokio::fs::create_dir_all(&dir)
		.await
		.with_context(|| format!("creating {}", dir.display()))?;

	write_file(&dir.join(CA_FILE), &bundle.ca, 0o644).await?;
	write_file(&dir.join(CRT_FILE), &bundle.crt, 0o644).await?;
	write_file(&dir.join(KEY_FILE), bundle.key.expose(), 0o600).await?;

	info!(cert = %cert, dir = %dir.display(), "wrote certificate bundle");
	Ok(dir)
}

#[cfg_attr(not(unix), allow(unused_variables))]
async fn write_file(path: &Path, contents: &[u8], mode: u32) -> anyhow::Result<()> {
	let mut options = tokio::fs::OpenOptions::new();
	options.write(true).create(true).truncate(true);
	#[cfg(unix)]
	options.mode(mode);

	let mut file = options
		.open(path)
		.await
		.with_context(|| format!("opening {}", path.display()))?;

	// An existing file keeps its old mode; tighten it explicitly.
	#[cfg(unix)]
	{
		use std::os::unix::fs::PermissionsExt;
		file.set_permissions(std::fs::Permissions::from_mode(mode))
			.await
			.with_context(|| format!("setting permissions on {}", path.display()))?;
	}

	file.write_all(contents)
		.await
		.with_context(|| format!("writing {}", path.display()))?;
	file.flush().await?;
	Ok(())
}

/// JSON summary of `members` for stdout.
pub fn summary_json(members: &[(Cert, &TlsBundle)]) -> serde_json::Result<String> {
	let summaries: Vec<BundleSummary> = members
		.iter()
		.map(|(cert, bundle)| BundleSummary::new(*cert, bundle))
		.collect();
	serde_json::to_string_pretty(&summaries)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn bundle() -> TlsBundle {
		TlsBundle::new(b"CA==".to_vec(), b"CRT==".to_vec(), b"KEY==".to_vec())
	}

	#[tokio::test]
	async fn writes_one_directory_per_cert() {
		let out = tempfile::tempdir().unwrap();
		let api = bundle();
		let etcd = bundle();

		let dirs = write_bundles(out.path(), &[(Cert::Api, &api), (Cert::Etcd, &etcd)])
			.await
			.unwrap();

		assert_eq!(dirs, vec![out.path().join("api"), out.path().join("etcd")]);
		let dir = out.path().join("api");
		assert_eq!(tokio::fs::read(dir.join(CA_FILE)).await.unwrap(), b"CA==");
		assert_eq!(tokio::fs::read(dir.join(CRT_FILE)).await.unwrap(), b"CRT==");
		assert_eq!(tokio::fs::read(dir.join(KEY_FILE)).await.unwrap(), b"KEY==");
	}

	#[cfg(unix)]
	#[tokio::test]
	async fn key_file_is_owner_only() {
		use std::os::unix::fs::PermissionsExt;

		let out = tempfile::tempdir().unwrap();
		let dir = out.path().join("prometheus");
		std::fs::create_dir_all(&dir).unwrap();
		std::fs::write(dir.join(KEY_FILE), b"old").unwrap();
		std::fs::set_permissions(dir.join(KEY_FILE), std::fs::Permissions::from_mode(0o644))
			.unwrap();

		let b = bundle();
		write_bundles(out.path(), &[(Cert::Prometheus, &b)])
			.await
			.unwrap();

		let mode = std::fs::metadata(dir.join(KEY_FILE))
			.unwrap()
			.permissions()
			.mode();
		assert_eq!(mode & 0o777, 0o600);
		assert_eq!(std::fs::read(dir.join(KEY_FILE)).unwrap(), b"KEY==");
	}

	#[test]
	fn summary_omits_key_bytes() {
		let b = bundle();
		let json = summary_json(&[(Cert::NodeOperator, &b)]).unwrap();

		assert!(json.contains("\"node-operator\""));
		assert!(json.contains("\"key_bytes\": 5"));
		assert!(!json.contains("KEY=="));
	}
}
