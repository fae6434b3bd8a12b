// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use async_trait::async_trait;

use crate::error::K8sResult;
use crate::types::SecretEventStream;

/// Trait for secret store operations.
///
/// This abstraction allows for easy mocking in tests while providing
/// the one query primitive the certificate searcher relies on.
#[async_trait]
pub trait SecretStore: Send + Sync {
	/// Watch secrets in `namespace` matching `label_selector`.
	///
	/// Secrets that already match must be delivered as
	/// [`SecretEvent::Added`](crate::SecretEvent::Added) before any later
	/// change. The selector is a comma separated list of `key=value` clauses.
	async fn watch_secrets(
		&self,
		namespace: &str,
		label_selector: &str,
	) -> K8sResult<SecretEventStream>;
}
