// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Secret store abstraction for certificate searches.
//!
//! This crate provides:
//! - A trait-based secret store abstraction for testability
//! - Production implementation using the kube crate
//! - An in-memory store for tests
//! - Equality label selector parsing and matching

mod client;
mod error;
mod kube_client;
mod mock;
mod selector;
mod types;

pub use client::SecretStore;
pub use error::{K8sError, K8sResult};
pub use kube_client::KubeSecretStore;
pub use mock::MockSecretStore;
pub use selector::LabelSelector;
pub use types::{ByteString, ObjectMeta, Secret, SecretEvent, SecretEventStream};
