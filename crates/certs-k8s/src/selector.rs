// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::collections::BTreeMap;

use crate::error::K8sError;

/// An equality-based label selector such as `app=web,tier=frontend`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSelector {
	requirements: Vec<(String, String)>,
}

impl LabelSelector {
	/// Parse comma separated `key=value` (or `key==value`) clauses.
	/// Whitespace around keys and values is ignored.
	pub fn parse(selector: &str) -> Result<Self, K8sError> {
		let invalid = |message: String| K8sError::InvalidSelector {
			selector: selector.to_string(),
			message,
		};

		let mut requirements = Vec::new();
		for clause in selector.split(',') {
			let clause = clause.trim();
			if clause.is_empty() {
				continue;
			}
			if clause.contains("!=") {
				return Err(invalid(format!("only equality clauses are supported: {clause:?}")));
			}
			let (key, value) = clause
				.split_once("==")
				.or_else(|| clause.split_once('='))
				.ok_or_else(|| invalid(format!("missing '=' in clause {clause:?}")))?;

			let key = key.trim();
			if key.is_empty() {
				return Err(invalid(format!("empty key in clause {clause:?}")));
			}
			requirements.push((key.to_string(), value.trim().to_string()));
		}

		Ok(Self { requirements })
	}

	/// Whether `labels` satisfies every clause. An empty selector matches everything.
	pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
		self
			.requirements
			.iter()
			.all(|(key, value)| labels.get(key) == Some(value))
	}

	pub fn requirements(&self) -> &[(String, String)] {
		&self.requirements
	}
}
