// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Configuration sections.

mod logging;
mod searcher;

pub use logging::{LoggingConfig, LoggingConfigLayer};
pub use searcher::{SearcherConfigLayer, SearcherSettings};
