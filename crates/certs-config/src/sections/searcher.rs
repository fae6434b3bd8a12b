// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Searcher configuration section.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const DEFAULT_WATCH_TIMEOUT_MS: u64 = 3000;

fn default_namespace() -> String {
	certs_core::SECRET_NAMESPACE.to_string()
}

/// Searcher configuration layer (for merging).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearcherConfigLayer {
	pub namespace: Option<String>,
	pub watch_timeout_ms: Option<u64>,
}

impl SearcherConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.namespace.is_some() {
			self.namespace = other.namespace;
		}
		if other.watch_timeout_ms.is_some() {
			self.watch_timeout_ms = other.watch_timeout_ms;
		}
	}

	pub fn finalize(self) -> SearcherSettings {
		SearcherSettings {
			namespace: self.namespace.unwrap_or_else(default_namespace),
			watch_timeout_ms: self.watch_timeout_ms.unwrap_or(DEFAULT_WATCH_TIMEOUT_MS),
		}
	}
}

/// Searcher configuration (runtime).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearcherSettings {
	/// Namespace holding certificate secrets
	pub namespace: String,
	/// How long one search waits for its secret
	pub watch_timeout_ms: u64,
}

impl SearcherSettings {
	pub fn watch_timeout(&self) -> Duration {
		Duration::from_millis(self.watch_timeout_ms)
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.namespace.trim().is_empty() {
			return Err(ConfigError::Validation(
				"searcher namespace must not be empty".to_string(),
			));
		}
		if self.watch_timeout_ms == 0 {
			return Err(ConfigError::Validation(
				"searcher watch_timeout_ms must be greater than zero".to_string(),
			));
		}
		Ok(())
	}
}

impl Default for SearcherSettings {
	fn default() -> Self {
		SearcherConfigLayer::default().finalize()
	}
}
