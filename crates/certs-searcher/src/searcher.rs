// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Watch based certificate secret search.

use std::sync::Arc;
use std::time::Duration;

use certs_core::{
	label_selector, AppOperator, BundleGroup, Cert, ClusterOperator, Draining, Monitoring,
	TlsBundle, SECRET_NAMESPACE,
};
use certs_k8s::{K8sError, Secret, SecretEvent, SecretStore};
use futures::StreamExt;
use tracing::{debug, instrument, warn};

use crate::config::{SearcherConfig, DEFAULT_WATCH_TIMEOUT};
use crate::decode::tls_from_secret;
use crate::error::SearchError;

/// Finds certificate secrets for clusters and decodes them into TLS bundles.
///
/// Every search opens its own watch and releases it before returning; the
/// searcher keeps no state between calls and can be shared freely.
pub struct Searcher {
	store: Arc<dyn SecretStore>,
	namespace: String,
	watch_timeout: Duration,
}

impl Searcher {
	/// Create a searcher, failing if the store is missing or the namespace
	/// is empty.
	pub fn new(config: SearcherConfig) -> Result<Self, SearchError> {
		let store = config.store.ok_or_else(|| {
			SearchError::InvalidConfig("SearcherConfig.store must not be empty".to_string())
		})?;

		let namespace = config
			.namespace
			.unwrap_or_else(|| SECRET_NAMESPACE.to_string());
		if namespace.is_empty() {
			return Err(SearchError::InvalidConfig(
				"SearcherConfig.namespace must not be empty".to_string(),
			));
		}

		let watch_timeout = config
			.watch_timeout
			.filter(|t| !t.is_zero())
			.unwrap_or(DEFAULT_WATCH_TIMEOUT);

		Ok(Self {
			store,
			namespace,
			watch_timeout,
		})
	}

	pub fn namespace(&self) -> &str {
		&self.namespace
	}

	pub fn watch_timeout(&self) -> Duration {
		self.watch_timeout
	}

	/// Certificates the app operator needs.
	pub async fn search_app_operator(&self, cluster_id: &str) -> Result<AppOperator, SearchError> {
		self.search_bundle(cluster_id).await
	}

	/// Certificates the cluster operator needs.
	pub async fn search_cluster_operator(
		&self,
		cluster_id: &str,
	) -> Result<ClusterOperator, SearchError> {
		self.search_bundle(cluster_id).await
	}

	/// Certificates the node draining operator needs.
	pub async fn search_draining(&self, cluster_id: &str) -> Result<Draining, SearchError> {
		self.search_bundle(cluster_id).await
	}

	/// Certificates the monitoring stack needs.
	pub async fn search_monitoring(&self, cluster_id: &str) -> Result<Monitoring, SearchError> {
		self.search_bundle(cluster_id).await
	}

	/// Search every member of bundle `B` concurrently.
	///
	/// The first member search to fail fails the bundle: its error is returned
	/// and the remaining searches are dropped, releasing their watches.
	#[instrument(skip(self), fields(bundle = B::NAME))]
	pub async fn search_bundle<B: BundleGroup>(&self, cluster_id: &str) -> Result<B, SearchError> {
		let searches = B::MEMBERS
			.iter()
			.map(|&cert| self.search_tls(cluster_id, cert));
		let members = futures::future::try_join_all(searches).await?;
		let bundle = B::assemble(members).ok_or(SearchError::IncompleteBundle { bundle: B::NAME })?;

		debug!("bundle found");
		Ok(bundle)
	}

	/// Search and decode the secret holding `cert` for `cluster_id`.
	#[instrument(skip(self, cert), fields(cert = %cert))]
	pub async fn search_tls(&self, cluster_id: &str, cert: Cert) -> Result<TlsBundle, SearchError> {
		let selector = label_selector(cluster_id, cert);
		let secret = self.search(&selector).await?;

		tls_from_secret(secret, cluster_id, cert).map_err(|source| {
			warn!(selector = %selector, error = %source, "rejecting invalid certificate secret");
			SearchError::InvalidSecret { selector, source }
		})
	}

	/// Wait for the first secret added under `selector`.
	///
	/// The watch stream is owned by this call and dropped, releasing the
	/// watch, on every return path.
	async fn search(&self, selector: &str) -> Result<Secret, SearchError> {
		let mut events = self
			.store
			.watch_secrets(&self.namespace, selector)
			.await
			.map_err(|source| SearchError::Backend {
				selector: selector.to_string(),
				source,
			})?;
		debug!(selector, namespace = %self.namespace, "watching secrets");

		let deadline = tokio::time::sleep(self.watch_timeout);
		tokio::pin!(deadline);

		loop {
			tokio::select! {
				event = events.next() => match event {
					Some(SecretEvent::Added(secret)) => return Ok(secret),
					Some(SecretEvent::Deleted(_)) => {
						// Deletions are the certificate operator's concern.
						debug!(selector, "ignoring deleted secret");
					}
					Some(SecretEvent::Modified(_)) | Some(SecretEvent::Bookmark) => {}
					Some(SecretEvent::Error { code, message }) => {
						return Err(SearchError::Backend {
							selector: selector.to_string(),
							source: K8sError::WatchError { code, message },
						});
					}
					Some(SecretEvent::Malformed { message }) => {
						return Err(SearchError::WrongType {
							selector: selector.to_string(),
							message,
						});
					}
					None => {
						return Err(SearchError::ChannelClosed {
							selector: selector.to_string(),
						});
					}
				},
				_ = &mut deadline => {
					return Err(SearchError::Timeout {
						selector: selector.to_string(),
						timeout: self.watch_timeout,
					});
				}
			}
		}
	}
}
