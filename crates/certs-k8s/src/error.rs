// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use thiserror::Error;

/// Result type alias for secret store operations.
pub type K8sResult<T> = Result<T, K8sError>;

/// Errors that can occur talking to the secret store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum K8sError {
	#[error("K8s API error: {message}")]
	ApiError { message: String },

	#[error("Watch error ({code}): {message}")]
	WatchError { code: u16, message: String },

	#[error("Invalid label selector {selector:?}: {message}")]
	InvalidSelector { selector: String, message: String },
}

impl From<kube::Error> for K8sError {
	fn from(err: kube::Error) -> Self {
		match err {
			kube::Error::Api(resp) => K8sError::WatchError {
				code: resp.code,
				message: resp.message,
			},
			other => K8sError::ApiError {
				message: other.to_string(),
			},
		}
	}
}
