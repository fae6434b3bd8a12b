// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use futures::StreamExt;
use kube::{
	api::{Api, WatchEvent, WatchParams},
	Client,
};
use tracing::{debug, instrument};

use crate::client::SecretStore;
use crate::error::{K8sError, K8sResult};
use crate::types::{Secret, SecretEvent, SecretEventStream};

/// Resource version that makes the API server replay existing objects as
/// `ADDED` events before streaming changes.
const INITIAL_SYNC_VERSION: &str = "0";

/// Production secret store implementation using the kube crate.
#[derive(Clone)]
pub struct KubeSecretStore {
	client: Client,
}

impl KubeSecretStore {
	/// Create a new KubeSecretStore that auto-discovers cluster configuration.
	///
	/// This will attempt to load config from:
	/// 1. In-cluster service account (when running in K8s)
	/// 2. KUBECONFIG environment variable
	/// 3. ~/.kube/config
	pub async fn new() -> K8sResult<Self> {
		let client = Client::try_default().await?;
		debug!("K8s client initialized");
		Ok(Self { client })
	}

	pub fn from_client(client: Client) -> Self {
		Self { client }
	}
}

#[async_trait]
impl SecretStore for KubeSecretStore {
	#[instrument(skip(self))]
	async fn watch_secrets(
		&self,
		namespace: &str,
		label_selector: &str,
	) -> K8sResult<SecretEventStream> {
		let secrets: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
		let wp = WatchParams::default().labels(label_selector);

		let stream = secrets.watch(&wp, INITIAL_SYNC_VERSION).await?;
		debug!("secret watch opened");

		Ok(Box::pin(stream.map(into_secret_event)))
	}
}

fn into_secret_event(item: Result<WatchEvent<Secret>, kube::Error>) -> SecretEvent {
	match item {
		Ok(WatchEvent::Added(secret)) => SecretEvent::Added(secret),
		Ok(WatchEvent::Modified(secret)) => SecretEvent::Modified(secret),
		Ok(WatchEvent::Deleted(secret)) => SecretEvent::Deleted(secret),
		Ok(WatchEvent::Bookmark(_)) => SecretEvent::Bookmark,
		Ok(WatchEvent::Error(resp)) => SecretEvent::Error {
			code: resp.code,
			message: resp.message,
		},
		Err(kube::Error::SerdeError(err)) => SecretEvent::Malformed {
			message: err.to_string(),
		},
		Err(err) => match K8sError::from(err) {
			K8sError::WatchError { code, message } => SecretEvent::Error { code, message },
			other => SecretEvent::Error {
				code: 0,
				message: other.to_string(),
			},
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use kube::core::ErrorResponse;

	#[test]
	fn watch_events_map_to_secret_events() {
		let secret = Secret::default();

		assert!(matches!(
			into_secret_event(Ok(WatchEvent::Added(secret.clone()))),
			SecretEvent::Added(_)
		));
		assert!(matches!(
			into_secret_event(Ok(WatchEvent::Modified(secret.clone()))),
			SecretEvent::Modified(_)
		));
		assert!(matches!(
			into_secret_event(Ok(WatchEvent::Deleted(secret))),
			SecretEvent::Deleted(_)
		));
	}

	#[test]
	fn error_event_keeps_code_and_message() {
		let resp = ErrorResponse {
			status: "Failure".to_string(),
			message: "too old resource version".to_string(),
			reason: "Expired".to_string(),
			code: 410,
		};

		match into_secret_event(Ok(WatchEvent::Error(resp))) {
			SecretEvent::Error { code, message } => {
				assert_eq!(code, 410);
				assert_eq!(message, "too old resource version");
			}
			other => panic!("expected error event, got {other:?}"),
		}
	}

	#[test]
	fn undecodable_payload_is_malformed() {
		let err = serde_json::from_str::<Secret>("[1, 2, 3]").unwrap_err();
		assert!(matches!(
			into_secret_event(Err(kube::Error::SerdeError(err))),
			SecretEvent::Malformed { .. }
		));
	}
}
