// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Configuration for the certificate searcher.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`CERTS_*`)
//!
//! # Usage
//!
//! ```ignore
//! use certs_config::load_config;
//!
//! let config = load_config()?;
//! println!("watching {} for {:?}", config.searcher.namespace, config.searcher.watch_timeout());
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::CertsConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::{debug, info};

/// Fully resolved configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CertsConfig {
	pub searcher: SearcherSettings,
	pub logging: LoggingConfig,
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`CERTS_*`)
/// 2. Config file (`/etc/certs/searcher.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<CertsConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource::process()),
	])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<CertsConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource::process()),
	])
}

/// Merge `sources` in precedence order and finalize the result.
pub fn load_from_sources(
	mut sources: Vec<Box<dyn ConfigSource>>,
) -> Result<CertsConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = CertsConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
fn finalize(layer: CertsConfigLayer) -> Result<CertsConfig, ConfigError> {
	let searcher = layer.searcher.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();

	searcher.validate()?;

	info!(
		namespace = %searcher.namespace,
		watch_timeout_ms = searcher.watch_timeout_ms,
		log_level = %logging.level,
		"Searcher configuration loaded"
	);

	Ok(CertsConfig { searcher, logging })
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;
	use std::io::Write;

	fn env(pairs: &[(&str, &str)]) -> EnvSource {
		let vars: HashMap<String, String> = pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();
		EnvSource::from_lookup(move |name| vars.get(name).cloned())
	}

	#[test]
	fn defaults_only() {
		let config = load_from_sources(vec![Box::new(DefaultsSource)]).unwrap();
		assert_eq!(config, CertsConfig::default());
		assert_eq!(config.searcher.namespace, "default");
		assert_eq!(config.searcher.watch_timeout_ms, 3000);
	}

	#[test]
	fn env_overrides_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(
			file,
			"[searcher]\nnamespace = \"from-file\"\nwatch_timeout_ms = 1500\n\n[logging]\nlevel = \"debug\""
		)
		.unwrap();

		let config = load_from_sources(vec![
			Box::new(env(&[("CERTS_SEARCHER_NAMESPACE", "from-env")])),
			Box::new(TomlSource::new(file.path())),
			Box::new(DefaultsSource),
		])
		.unwrap();

		assert_eq!(config.searcher.namespace, "from-env");
		assert_eq!(config.searcher.watch_timeout_ms, 1500);
		assert_eq!(config.logging.level, "debug");
	}

	#[test]
	fn missing_file_is_skipped() {
		let dir = tempfile::tempdir().unwrap();
		let config = load_config_from(dir.path().join("absent.toml"));
		assert_eq!(config.unwrap().searcher.namespace, "default");
	}

	fn load_config_from(path: std::path::PathBuf) -> Result<CertsConfig, ConfigError> {
		load_from_sources(vec![Box::new(DefaultsSource), Box::new(TomlSource::new(path))])
	}

	#[test]
	fn zero_timeout_is_rejected() {
		let result = load_from_sources(vec![Box::new(env(&[(
			"CERTS_SEARCHER_WATCH_TIMEOUT_MS",
			"0",
		)]))]);
		assert!(matches!(result, Err(ConfigError::Validation(_))));
	}

	#[test]
	fn invalid_toml_reports_path() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "[searcher\nnamespace = 1").unwrap();

		let err = load_config_from(file.path().to_path_buf()).unwrap_err();

		assert!(matches!(err, ConfigError::TomlParse { .. }));
		assert!(err.to_string().contains(&file.path().display().to_string()));
	}
}
