// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared vocabulary for locating TLS certificate secrets.
//!
//! This crate provides:
//! - [`Cert`], the closed set of certificate kinds the issuing operator produces
//! - The label catalog: label keys, the secret namespace, deterministic secret
//!   names and label sets, and the selector the searcher watches with
//! - [`TlsBundle`], the decoded CA/certificate/private-key triple
//! - Bundle groups: the fixed certificate sets each consumer needs
//!
//! Producers of secrets and the searcher both depend on this crate so that
//! naming and labelling can never drift between them.

mod bundle;
mod cert;
mod labels;
mod tls;

pub use bundle::{AppOperator, BundleGroup, ClusterOperator, Draining, Monitoring};
pub use cert::{Cert, ParseCertError};
pub use labels::{
	label_selector, secret_labels, secret_name, CERTIFICATE_LABEL, CLUSTER_ID_LABEL,
	LEGACY_CERTIFICATE_LABEL, LEGACY_CLUSTER_ID_LABEL, SECRET_NAMESPACE,
};
pub use tls::{PrivateKey, TlsBundle, CA_KEY, CRT_KEY, KEY_KEY};
