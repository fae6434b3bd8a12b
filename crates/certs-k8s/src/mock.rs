// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::debug;

use crate::client::SecretStore;
use crate::error::{K8sError, K8sResult};
use crate::selector::LabelSelector;
use crate::types::{Secret, SecretEvent, SecretEventStream};

/// An in-memory secret store that can be used for testing searches.
///
/// Stored secrets matching a watch are replayed as `Added` events when the
/// watch opens; later inserts and deletes are broadcast to live watches.
/// Failures, raw events and closed channels can be injected, and the number
/// of open watch sessions is tracked so tests can check they are released.
#[derive(Clone, Default)]
pub struct MockSecretStore {
	state: Arc<Mutex<MockState>>,
	open_watches: Arc<AtomicUsize>,
}

#[derive(Default)]
struct MockState {
	secrets: Vec<(String, Secret)>,
	watchers: Vec<Watcher>,
	watch_failures: VecDeque<K8sError>,
	selectors: Vec<String>,
}

struct Watcher {
	namespace: String,
	selector: LabelSelector,
	tx: mpsc::UnboundedSender<SecretEvent>,
}

impl Watcher {
	fn wants(&self, namespace: &str, secret: &Secret) -> bool {
		self.namespace == namespace && self.selector.matches(labels_of(secret))
	}
}

struct OpenWatchGuard(Arc<AtomicUsize>);

impl Drop for OpenWatchGuard {
	fn drop(&mut self) {
		self.0.fetch_sub(1, Ordering::SeqCst);
	}
}

fn labels_of(secret: &Secret) -> &std::collections::BTreeMap<String, String> {
	static EMPTY: std::collections::BTreeMap<String, String> = std::collections::BTreeMap::new();
	secret.metadata.labels.as_ref().unwrap_or(&EMPTY)
}

impl MockSecretStore {
	/// Create a new empty store.
	pub fn new() -> Self {
		Self::default()
	}

	fn state(&self) -> MutexGuard<'_, MockState> {
		self.state.lock().unwrap_or_else(PoisonError::into_inner)
	}

	/// Store a secret, replacing one with the same name, and notify live
	/// watches whose selector matches it.
	pub fn insert_secret(&self, namespace: &str, secret: Secret) {
		let mut state = self.state();
		state
			.secrets
			.retain(|(ns, s)| !(ns == namespace && s.metadata.name == secret.metadata.name));
		state.secrets.push((namespace.to_string(), secret.clone()));
		state.watchers.retain(|w| {
			!w.wants(namespace, &secret) || w.tx.send(SecretEvent::Added(secret.clone())).is_ok()
		});
	}

	/// Remove a secret by name and notify live watches whose selector matched it.
	pub fn delete_secret(&self, namespace: &str, name: &str) -> Option<Secret> {
		let mut state = self.state();
		let index = state
			.secrets
			.iter()
			.position(|(ns, s)| ns == namespace && s.metadata.name.as_deref() == Some(name))?;
		let (_, secret) = state.secrets.remove(index);
		state.watchers.retain(|w| {
			!w.wants(namespace, &secret) || w.tx.send(SecretEvent::Deleted(secret.clone())).is_ok()
		});
		Some(secret)
	}

	/// Send an event to every live watch, regardless of selector.
	pub fn inject(&self, event: SecretEvent) {
		self
			.state()
			.watchers
			.retain(|w| w.tx.send(event.clone()).is_ok());
	}

	/// Make the next `watch_secrets` call fail with `err`.
	pub fn fail_next_watch(&self, err: K8sError) {
		self.state().watch_failures.push_back(err);
	}

	/// End every live watch stream, as the store does when it drops a watch.
	pub fn close_watches(&self) {
		self.state().watchers.clear();
	}

	/// Number of watch sessions that have not been released yet.
	pub fn open_watches(&self) -> usize {
		self.open_watches.load(Ordering::SeqCst)
	}

	/// Every selector a watch was requested with, in call order.
	pub fn selectors(&self) -> Vec<String> {
		self.state().selectors.clone()
	}

	/// Wait until at least `count` watch sessions are open.
	pub async fn wait_for_watches(&self, count: usize) {
		while self.open_watches() < count {
			tokio::time::sleep(Duration::from_millis(5)).await;
		}
	}
}

#[async_trait]
impl SecretStore for MockSecretStore {
	async fn watch_secrets(
		&self,
		namespace: &str,
		label_selector: &str,
	) -> K8sResult<SecretEventStream> {
		let mut state = self.state();
		state.selectors.push(label_selector.to_string());

		if let Some(err) = state.watch_failures.pop_front() {
			return Err(err);
		}

		let selector = LabelSelector::parse(label_selector)?;
		let (tx, rx) = mpsc::unbounded_channel();

		for (ns, secret) in &state.secrets {
			if ns == namespace && selector.matches(labels_of(secret)) {
				// The receiver is held below, so this cannot fail.
				let _ = tx.send(SecretEvent::Added(secret.clone()));
			}
		}

		state.watchers.push(Watcher {
			namespace: namespace.to_string(),
			selector,
			tx,
		});
		drop(state);

		self.open_watches.fetch_add(1, Ordering::SeqCst);
		let guard = OpenWatchGuard(Arc::clone(&self.open_watches));
		debug!(namespace, label_selector, "mock secret watch opened");

		let stream = futures::stream::unfold((rx, guard), |(mut rx, guard)| async move {
			let event = rx.recv().await?;
			Some((event, (rx, guard)))
		});
		Ok(Box::pin(stream))
	}
}
