// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::pin::Pin;

use futures::Stream;

pub use k8s_openapi::api::core::v1::Secret;
pub use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
pub use k8s_openapi::ByteString;

/// A change notification from a secret watch.
#[derive(Debug, Clone)]
pub enum SecretEvent {
	/// A matching secret exists, either from the initial sync or newly created.
	Added(Secret),
	Modified(Secret),
	Deleted(Secret),
	/// Resource version checkpoint; carries no object.
	Bookmark,
	/// The store reported an error on the watch.
	Error { code: u16, message: String },
	/// The event payload could not be decoded as a secret.
	Malformed { message: String },
}

/// Event stream of one watch session. The session ends when the stream is
/// dropped; the stream ending on its own means the store closed it.
pub type SecretEventStream = Pin<Box<dyn Stream<Item = SecretEvent> + Send>>;
