// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use certs_k8s::SecretStore;

/// How long a single search waits for a matching secret before giving up.
pub const DEFAULT_WATCH_TIMEOUT: Duration = Duration::from_secs(3);

/// Construction parameters for a [`Searcher`](crate::Searcher).
///
/// `store` is required. A missing or zero `watch_timeout` falls back to
/// [`DEFAULT_WATCH_TIMEOUT`]; a missing namespace falls back to
/// [`certs_core::SECRET_NAMESPACE`].
#[derive(Clone, Default)]
pub struct SearcherConfig {
	pub store: Option<Arc<dyn SecretStore>>,
	pub namespace: Option<String>,
	pub watch_timeout: Option<Duration>,
}

impl SearcherConfig {
	pub fn new(store: Arc<dyn SecretStore>) -> Self {
		Self {
			store: Some(store),
			..Default::default()
		}
	}

	pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
		self.namespace = Some(namespace.into());
		self
	}

	pub fn with_watch_timeout(mut self, timeout: Duration) -> Self {
		self.watch_timeout = Some(timeout);
		self
	}
}

impl fmt::Debug for SearcherConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SearcherConfig")
			.field("store", &self.store.as_ref().map(|_| "<secret store>"))
			.field("namespace", &self.namespace)
			.field("watch_timeout", &self.watch_timeout)
			.finish()
	}
}
