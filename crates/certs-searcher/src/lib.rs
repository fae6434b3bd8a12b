// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Certificate secret searcher.
//!
//! The [`Searcher`] watches the secret store for the secret holding one
//! certificate kind of one cluster, waits for it up to a bounded timeout,
//! validates it and decodes it into a [`TlsBundle`]. Bundle searches run one
//! such search per member kind concurrently and return either every member or
//! the first failure.

mod config;
mod decode;
mod error;
mod searcher;

pub use config::{SearcherConfig, DEFAULT_WATCH_TIMEOUT};
pub use decode::tls_from_secret;
pub use error::{InvalidSecretError, SearchError};
pub use searcher::Searcher;

pub use certs_core::{
	AppOperator, BundleGroup, Cert, ClusterOperator, Draining, Monitoring, PrivateKey, TlsBundle,
};
