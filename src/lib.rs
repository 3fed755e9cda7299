// src/lib.rs

pub mod backend;
pub mod cli;
pub mod config;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod types;
pub mod watch;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::backend::NotifyBackend;
use crate::cli::CliArgs;
use crate::config::{ConfigFile, resolve_config};
use crate::fs::RealFileSystem;
use crate::watch::{GlobIgnore, IgnoreFilter, WatchOptions, Watcher};

pub use crate::types::{Event, EventKind};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (file + CLI overrides)
/// - the ignore globs
/// - the notify backend and the watcher
/// - Ctrl-C handling (fires the session's cancellation token)
///
/// Events are printed to stdout, one per line.
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = resolve_config(args.config.as_deref().map(Path::new))?;

    let mut patterns = cfg.ignore_section().patterns.clone();
    patterns.extend(args.ignore.iter().cloned());

    let mut options = cfg.watch_options();
    if let Some(n) = args.backend_buffer {
        options = options.with_backend_buffer(n);
    }
    let recursive = cfg.watch_section().recursive && !args.no_recursive;

    if args.dry_run {
        print_dry_run(&args, &cfg, &patterns, options, recursive);
        return Ok(());
    }

    let filter: Arc<dyn IgnoreFilter> = Arc::new(GlobIgnore::new(patterns.as_slice())?);
    let backend = NotifyBackend::new().with_rename_capability(cfg.watch_section().rename);
    let watcher = Watcher::with_parts(
        &args.root,
        Arc::new(RealFileSystem),
        Arc::new(backend),
        options,
    )?;

    let cancel = CancellationToken::new();

    // Ctrl-C → cancel the session.
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            info!("Ctrl+C received; stopping");
            cancel.cancel();
        });
    }

    let mut stream = watcher.watch(&args.subpath, filter, cancel, recursive)?;
    while let Some(event) = stream.recv().await {
        println!("{event}");
        if event.is_root() {
            // Whoever reads stdout rescans on the root line; pick up
            // per-path events again right away.
            stream.reset_overflow();
        }
    }

    stream.join().await.context("watch session failed")?;
    debug!("event stream ended");
    Ok(())
}

fn print_dry_run(
    args: &CliArgs,
    cfg: &ConfigFile,
    patterns: &[String],
    options: WatchOptions,
    recursive: bool,
) {
    println!("treewatch dry-run");
    println!("  root = {}", args.root);
    println!("  subpath = {}", args.subpath);
    println!("  recursive = {recursive}");
    println!("  backend_buffer = {}", options.backend_buffer);
    println!("  output_buffer = {}", options.output_buffer);
    println!("  rename = {:?}", cfg.watch_section().rename);
    if patterns.is_empty() {
        println!("  ignore = (none)");
    } else {
        println!("  ignore:");
        for pattern in patterns {
            println!("    - {pattern}");
        }
    }

    debug!("dry-run complete (no watching)");
}
