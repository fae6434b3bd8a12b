// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A certificate kind, as written in the certificate label of a secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cert {
	Api,
	AppOperatorApi,
	Calico,
	CalicoEtcdClient,
	ClusterOperatorApi,
	Etcd,
	FlanneldEtcdClient,
	NodeOperator,
	Prometheus,
	ServiceAccount,
	Worker,
}

impl Cert {
	/// Every certificate kind the issuing operator can create.
	pub const ALL: [Cert; 11] = [
		Cert::Api,
		Cert::AppOperatorApi,
		Cert::Calico,
		Cert::CalicoEtcdClient,
		Cert::ClusterOperatorApi,
		Cert::Etcd,
		Cert::FlanneldEtcdClient,
		Cert::NodeOperator,
		Cert::Prometheus,
		Cert::ServiceAccount,
		Cert::Worker,
	];

	/// The label value identifying this kind.
	pub const fn as_str(&self) -> &'static str {
		match self {
			Cert::Api => "api",
			Cert::AppOperatorApi => "app-operator-api",
			Cert::Calico => "calico",
			Cert::CalicoEtcdClient => "calico-etcd-client",
			Cert::ClusterOperatorApi => "cluster-operator-api",
			Cert::Etcd => "etcd",
			Cert::FlanneldEtcdClient => "flanneld-etcd-client",
			Cert::NodeOperator => "node-operator",
			Cert::Prometheus => "prometheus",
			Cert::ServiceAccount => "service-account",
			Cert::Worker => "worker",
		}
	}
}

impl fmt::Display for Cert {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Returned when a string names no known certificate kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown certificate kind: {0:?}")]
pub struct ParseCertError(pub String);

impl FromStr for Cert {
	type Err = ParseCertError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Cert::ALL
			.into_iter()
			.find(|cert| cert.as_str() == s)
			.ok_or_else(|| ParseCertError(s.to_string()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn as_str_round_trips_through_from_str() {
		for cert in Cert::ALL {
			assert_eq!(cert.as_str().parse::<Cert>(), Ok(cert));
		}
	}

	#[test]
	fn all_has_no_duplicates() {
		let mut names: Vec<&str> = Cert::ALL.iter().map(Cert::as_str).collect();
		names.sort_unstable();
		names.dedup();
		assert_eq!(names.len(), Cert::ALL.len());
	}

	#[test]
	fn unknown_kind_is_rejected() {
		let err = "kube-scheduler".parse::<Cert>().unwrap_err();
		assert_eq!(err, ParseCertError("kube-scheduler".to_string()));
		assert!(err.to_string().contains("kube-scheduler"));
	}

	#[test]
	fn parsing_is_case_sensitive() {
		assert!("Prometheus".parse::<Cert>().is_err());
	}

	#[test]
	fn serde_uses_label_values() {
		for cert in Cert::ALL {
			let json = serde_json::to_string(&cert).unwrap();
			assert_eq!(json, format!("\"{}\"", cert.as_str()));
			let parsed: Cert = serde_json::from_str(&json).unwrap();
			assert_eq!(parsed, cert);
		}
	}

	#[test]
	fn display_matches_label_value() {
		assert_eq!(Cert::ClusterOperatorApi.to_string(), "cluster-operator-api");
		assert_eq!(Cert::CalicoEtcdClient.to_string(), "calico-etcd-client");
	}
}
