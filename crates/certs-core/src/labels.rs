// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Label catalog for certificate secrets.
//!
//! A certificate secret is named `<cluster-id>-<cert>` and carries the
//! cluster ID and certificate kind under both the current and the legacy
//! label keys. The searcher filters on the current keys only.

use std::collections::BTreeMap;

use crate::cert::Cert;

/// Label carrying the certificate kind.
pub const CERTIFICATE_LABEL: &str = "giantswarm.io/certificate";
/// Label carrying the cluster ID.
pub const CLUSTER_ID_LABEL: &str = "giantswarm.io/cluster-id";

// Still written so older consumers keep finding secrets.
pub const LEGACY_CERTIFICATE_LABEL: &str = "clusterComponent";
pub const LEGACY_CLUSTER_ID_LABEL: &str = "clusterID";

/// Namespace all certificate secrets live in.
pub const SECRET_NAMESPACE: &str = "default";

/// Name of the secret holding `cert` for the cluster `cluster_id`.
pub fn secret_name(cluster_id: &str, cert: Cert) -> String {
	format!("{cluster_id}-{cert}")
}

/// Full label set a secret holding `cert` for `cluster_id` must carry.
pub fn secret_labels(cluster_id: &str, cert: Cert) -> BTreeMap<String, String> {
	BTreeMap::from([
		(CERTIFICATE_LABEL.to_string(), cert.to_string()),
		(CLUSTER_ID_LABEL.to_string(), cluster_id.to_string()),
		(LEGACY_CERTIFICATE_LABEL.to_string(), cert.to_string()),
		(LEGACY_CLUSTER_ID_LABEL.to_string(), cluster_id.to_string()),
	])
}

/// Equality selector matching the secret holding `cert` for `cluster_id`.
pub fn label_selector(cluster_id: &str, cert: Cert) -> String {
	format!("{CERTIFICATE_LABEL}={cert},{CLUSTER_ID_LABEL}={cluster_id}")
}
