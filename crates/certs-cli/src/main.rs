// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Certificate secret search binary.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use certs_config::{CertsConfig, LoggingConfig};
use certs_core::{secret_labels, secret_name, BundleGroup, Cert, TlsBundle};
use certs_k8s::KubeSecretStore;
use certs_searcher::{Searcher, SearcherConfig};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod output;

/// certs-search - find cluster certificate secrets.
#[derive(Parser, Debug)]
#[command(
	name = "certs-search",
	about = "Find and decode cluster certificate secrets",
	version
)]
struct Args {
	/// Config file (defaults to /etc/certs/searcher.toml)
	#[arg(long, global = true)]
	config: Option<PathBuf>,

	/// Namespace holding certificate secrets
	#[arg(long, global = true)]
	namespace: Option<String>,

	/// How long each search waits for its secret, in milliseconds
	#[arg(long, global = true)]
	timeout_ms: Option<u64>,

	/// Emit logs as JSON lines
	#[arg(long, global = true)]
	json_logs: bool,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Search the secret holding one certificate kind
	Tls {
		#[arg(long)]
		cluster_id: String,
		#[arg(long)]
		cert: Cert,
		/// Write PEM files here instead of printing a summary
		#[arg(long)]
		out_dir: Option<PathBuf>,
	},
	/// Search every certificate one consumer needs
	Bundle {
		#[arg(value_enum)]
		group: BundleArg,
		#[arg(long)]
		cluster_id: String,
		/// Write PEM files here instead of printing a summary
		#[arg(long)]
		out_dir: Option<PathBuf>,
	},
	/// Print the name of a certificate secret
	Name {
		#[arg(long)]
		cluster_id: String,
		#[arg(long)]
		cert: Cert,
	},
	/// Print the labels a certificate secret carries, as JSON
	Labels {
		#[arg(long)]
		cluster_id: String,
		#[arg(long)]
		cert: Cert,
	},
	/// List every certificate kind
	Certs,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum BundleArg {
	AppOperator,
	ClusterOperator,
	Draining,
	Monitoring,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let args = Args::parse();

	// Naming helpers need neither config nor a cluster connection.
	match &args.command {
		Command::Name { cluster_id, cert } => {
			println!("{}", secret_name(cluster_id, *cert));
			return Ok(());
		}
		Command::Labels { cluster_id, cert } => {
			println!(
				"{}",
				serde_json::to_string_pretty(&secret_labels(cluster_id, *cert))?
			);
			return Ok(());
		}
		Command::Certs => {
			for cert in Cert::ALL {
				println!("{cert}");
			}
			return Ok(());
		}
		Command::Tls { .. } | Command::Bundle { .. } => {}
	}

	let config = load_config(&args)?;
	init_tracing(&config.logging);

	tracing::info!(
		namespace = %config.searcher.namespace,
		watch_timeout_ms = config.searcher.watch_timeout_ms,
		"starting certs-search"
	);

	let store = KubeSecretStore::new()
		.await
		.context("connecting to the cluster")?;
	let searcher = Searcher::new(
		SearcherConfig::new(Arc::new(store))
			.with_namespace(config.searcher.namespace.clone())
			.with_watch_timeout(config.searcher.watch_timeout()),
	)?;

	until_interrupted(run(&searcher, args.command), tokio::signal::ctrl_c()).await
}

/// Drive `work` unless `interrupt` resolves first, in which case `work` is
/// dropped and the run fails.
async fn until_interrupted<W, I, T>(work: W, interrupt: I) -> anyhow::Result<()>
where
	W: Future<Output = anyhow::Result<()>>,
	I: Future<Output = T>,
{
	tokio::select! {
		result = work => result,
		_ = interrupt => {
			tracing::warn!("interrupted, abandoning search");
			Err(anyhow::anyhow!("interrupted"))
		}
	}
}

/// Load layered configuration and apply command line overrides.
fn load_config(args: &Args) -> anyhow::Result<CertsConfig> {
	let mut config = match &args.config {
		Some(path) => certs_config::load_config_with_file(path),
		None => certs_config::load_config(),
	}?;

	if let Some(namespace) = &args.namespace {
		config.searcher.namespace = namespace.clone();
	}
	if let Some(timeout_ms) = args.timeout_ms {
		config.searcher.watch_timeout_ms = timeout_ms;
	}
	if args.json_logs {
		config.logging.json = true;
	}
	config.searcher.validate()?;

	Ok(config)
}

fn init_tracing(logging: &LoggingConfig) {
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

	// Logs go to stderr so stdout stays machine readable.
	if logging.json {
		tracing_subscriber::registry()
			.with(filter)
			.with(fmt::layer().json().with_writer(std::io::stderr))
			.init();
	} else {
		tracing_subscriber::registry()
			.with(filter)
			.with(fmt::layer().with_writer(std::io::stderr))
			.init();
	}
}

async fn run(searcher: &Searcher, command: Command) -> anyhow::Result<()> {
	match command {
		Command::Tls {
			cluster_id,
			cert,
			out_dir,
		} => {
			let bundle = searcher.search_tls(&cluster_id, cert).await?;
			emit(&[(cert, &bundle)], out_dir.as_deref()).await
		}
		Command::Bundle {
			group,
			cluster_id,
			out_dir,
		} => {
			let out_dir = out_dir.as_deref();
			match group {
				BundleArg::AppOperator => {
					emit_group(&searcher.search_app_operator(&cluster_id).await?, out_dir).await
				}
				BundleArg::ClusterOperator => {
					emit_group(&searcher.search_cluster_operator(&cluster_id).await?, out_dir).await
				}
				BundleArg::Draining => {
					emit_group(&searcher.search_draining(&cluster_id).await?, out_dir).await
				}
				BundleArg::Monitoring => {
					emit_group(&searcher.search_monitoring(&cluster_id).await?, out_dir).await
				}
			}
		}
		Command::Name { .. } | Command::Labels { .. } | Command::Certs => Ok(()),
	}
}

async fn emit_group<B: BundleGroup>(group: &B, out_dir: Option<&Path>) -> anyhow::Result<()> {
	emit(&group.members(), out_dir).await
}

async fn emit(members: &[(Cert, &TlsBundle)], out_dir: Option<&Path>) -> anyhow::Result<()> {
	match out_dir {
		Some(dir) => {
			for written in output::write_bundles(dir, members).await? {
				println!("{}", written.display());
			}
		}
		None => println!("{}", output::summary_json(members)?),
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use clap::CommandFactory;

	#[test]
	fn verify_args() {
		Args::command().debug_assert();
	}

	#[test]
	fn parses_tls_with_global_flags() {
		let args = Args::try_parse_from([
			"certs-search",
			"tls",
			"--cluster-id",
			"c-abc12",
			"--cert",
			"calico-etcd-client",
			"--timeout-ms",
			"500",
			"--namespace",
			"certs",
		])
		.unwrap();

		assert_eq!(args.timeout_ms, Some(500));
		assert_eq!(args.namespace.as_deref(), Some("certs"));
		match args.command {
			Command::Tls {
				cluster_id,
				cert,
				out_dir,
			} => {
				assert_eq!(cluster_id, "c-abc12");
				assert_eq!(cert, Cert::CalicoEtcdClient);
				assert!(out_dir.is_none());
			}
			other => panic!("unexpected command: {other:?}"),
		}
	}

	#[test]
	fn parses_bundle_group() {
		let args = Args::try_parse_from([
			"certs-search",
			"bundle",
			"cluster-operator",
			"--cluster-id",
			"c-abc12",
			"--out-dir",
			"/tmp/certs",
		])
		.unwrap();

		match args.command {
			Command::Bundle {
				group,
				out_dir,
				..
			} => {
				assert_eq!(group, BundleArg::ClusterOperator);
				assert_eq!(out_dir, Some(PathBuf::from("/tmp/certs")));
			}
			other => panic!("unexpected command: {other:?}"),
		}
	}

	#[test]
	fn rejects_unknown_cert() {
		let result = Args::try_parse_from([
			"certs-search",
			"name",
			"--cluster-id",
			"c-abc12",
			"--cert",
			"kube-scheduler",
		]);
		assert!(result.is_err());
	}

	#[test]
	fn overrides_apply_on_top_of_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("searcher.toml");
		std::fs::write(&path, "[searcher]\nnamespace = \"from-file\"\nwatch_timeout_ms = 900\n")
			.unwrap();

		let args = Args::try_parse_from([
			"certs-search",
			"--config",
			path.to_str().unwrap(),
			"--timeout-ms",
			"250",
			"--json-logs",
			"certs",
		])
		.unwrap();
		let config = load_config(&args).unwrap();

		assert_eq!(config.searcher.watch_timeout_ms, 250);
		assert!(config.logging.json);
		// Only holds when the environment does not set a namespace.
		if std::env::var("CERTS_SEARCHER_NAMESPACE").is_err() {
			assert_eq!(config.searcher.namespace, "from-file");
		}
	}

	#[tokio::test]
	async fn interrupt_fails_the_run() {
		let result = until_interrupted(std::future::pending(), async {}).await;

		let err = result.unwrap_err();
		assert_eq!(err.to_string(), "interrupted");
	}

	#[tokio::test]
	async fn finished_work_wins_over_pending_interrupt() {
		let result = until_interrupted(async { Ok(()) }, std::future::pending::<()>()).await;
		assert!(result.is_ok());
	}

	#[test]
	fn zero_timeout_override_is_rejected() {
		let args =
			Args::try_parse_from(["certs-search", "--timeout-ms", "0", "certs"]).unwrap();
		let dir = tempfile::tempdir().unwrap();
		let args = Args {
			config: Some(dir.path().join("absent.toml")),
			..args
		};
		assert!(load_config(&args).is_err());
	}
}
