// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Searcher error types.

use std::time::Duration;

use certs_k8s::K8sError;

/// Errors that can occur while searching for certificate secrets.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
	/// A required construction parameter is missing or invalid
	#[error("Invalid searcher config: {0}")]
	InvalidConfig(String),

	/// The watch could not be opened or reported an error
	#[error("Watching secrets failed, selector = {selector:?}: {source}")]
	Backend {
		selector: String,
		#[source]
		source: K8sError,
	},

	/// No matching secret appeared in time
	#[error("Timed out after {timeout:?} waiting for secrets, selector = {selector:?}")]
	Timeout { selector: String, timeout: Duration },

	/// The event stream ended without a match or an error
	#[error("Watching secrets, selector = {selector:?}: unexpected closed channel")]
	ChannelClosed { selector: String },

	/// A delivered secret failed validation
	#[error("Invalid secret, selector = {selector:?}: {source}")]
	InvalidSecret {
		selector: String,
		#[source]
		source: InvalidSecretError,
	},

	/// A delivered event did not carry a secret
	#[error("Expected a Secret, selector = {selector:?}: {message}")]
	WrongType { selector: String, message: String },

	/// The decoded members did not fit the bundle's member table
	#[error("Bundle {bundle} could not be assembled from its members")]
	IncompleteBundle { bundle: &'static str },
}

impl SearchError {
	pub fn is_invalid_config(&self) -> bool {
		matches!(self, SearchError::InvalidConfig(_))
	}

	pub fn is_backend(&self) -> bool {
		matches!(self, SearchError::Backend { .. })
	}

	pub fn is_timeout(&self) -> bool {
		matches!(self, SearchError::Timeout { .. })
	}

	/// Also returned when the caller's watch was cancelled and the store
	/// closed the stream.
	pub fn is_channel_closed(&self) -> bool {
		matches!(self, SearchError::ChannelClosed { .. })
	}

	pub fn is_invalid_secret(&self) -> bool {
		matches!(self, SearchError::InvalidSecret { .. })
	}

	pub fn is_wrong_type(&self) -> bool {
		matches!(self, SearchError::WrongType { .. })
	}
}

/// Why a delivered secret was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidSecretError {
	#[error("expected {label} = {expected:?}, got {actual:?}")]
	LabelMismatch {
		label: &'static str,
		expected: String,
		actual: Option<String>,
	},

	#[error("{key:?} key missing")]
	MissingKey { key: &'static str },
}
