// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Bundle groups: the fixed set of certificates one consumer needs together.

use crate::cert::Cert;
use crate::tls::TlsBundle;

/// A fixed set of certificate kinds searched for and returned together.
pub trait BundleGroup: Sized + Send {
	/// Human readable name used in logs and errors.
	const NAME: &'static str;

	/// Certificate kinds making up the group, in field order.
	const MEMBERS: &'static [Cert];

	/// Builds the group from one decoded bundle per member, in
	/// [`Self::MEMBERS`] order. Returns `None` unless exactly one bundle per
	/// member is given.
	fn assemble(members: Vec<TlsBundle>) -> Option<Self>;

	/// The group's bundles paired with the kind each was decoded from.
	fn members(&self) -> Vec<(Cert, &TlsBundle)>;
}

macro_rules! bundle_group {
	(
		$(#[$meta:meta])*
		$name:ident, $label:literal { $($field:ident => $cert:expr),+ $(,)? }
	) => {
		$(#[$meta])*
		#[derive(Debug, Clone, PartialEq, Eq)]
		pub struct $name {
			$(pub $field: TlsBundle,)+
		}

		impl BundleGroup for $name {
			const NAME: &'static str = $label;
			const MEMBERS: &'static [Cert] = &[$($cert),+];

			fn assemble(members: Vec<TlsBundle>) -> Option<Self> {
				let mut members = members.into_iter();
				let group = Self {
					$($field: members.next()?,)+
				};
				members.next().is_none().then_some(group)
			}

			fn members(&self) -> Vec<(Cert, &TlsBundle)> {
				vec![$(($cert, &self.$field)),+]
			}
		}
	};
}

bundle_group! {
	/// Certificates the app operator uses to reach tenant cluster API servers.
	AppOperator, "app-operator" { api_server => Cert::AppOperatorApi }
}

bundle_group! {
	/// Certificates the cluster operator uses to reach tenant cluster API servers.
	ClusterOperator, "cluster-operator" { api_server => Cert::ClusterOperatorApi }
}

bundle_group! {
	/// Certificates the node draining operator uses.
	Draining, "draining" { node_operator => Cert::NodeOperator }
}

bundle_group! {
	/// Certificates the monitoring stack scrapes tenant clusters with.
	Monitoring, "monitoring" { prometheus => Cert::Prometheus }
}
