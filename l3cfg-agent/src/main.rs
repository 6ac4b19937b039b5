//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

mod config;

use std::sync::Arc;
use std::time::Duration;

use clap::{App, Arg};
use config::{Config, LoggingFileRotation, LoggingFmtStyle};
use l3cfg_asr1k::driver::RoutingDriver;
use l3cfg_asr1k::intent::Intent;
use l3cfg_asr1k::region::MultiRegion;
use l3cfg_asr1k::session::DryRunSession;
use l3cfg_asr1k::snippets::SnippetCatalog;
use tokio::signal::unix::{SignalKind, signal};
use tracing::level_filters::LevelFilter;
use tracing::{Instrument, debug_span, error, info};
use tracing_appender::rolling;
use tracing_subscriber::Layer;
use tracing_subscriber::prelude::*;

fn init_tracing(config: &config::Logging) {
    // Enable logging to a file.
    let file = config.file.enabled.then(|| {
        let file_appender = match config.file.rotation {
            LoggingFileRotation::Never => {
                rolling::never(&config.file.dir, &config.file.name)
            }
            LoggingFileRotation::Hourly => {
                rolling::hourly(&config.file.dir, &config.file.name)
            }
            LoggingFileRotation::Daily => {
                rolling::daily(&config.file.dir, &config.file.name)
            }
        };

        let log_level_filter = LevelFilter::from_level(tracing::Level::TRACE);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(file_appender)
            .with_target(false)
            .with_thread_ids(config.file.fmt.show_thread_id)
            .with_file(config.file.fmt.show_source)
            .with_line_number(config.file.fmt.show_source)
            .with_ansi(config.file.fmt.colors);
        let layer = match config.file.fmt.style {
            LoggingFmtStyle::Compact => layer.compact().boxed(),
            LoggingFmtStyle::Full => layer.boxed(),
            LoggingFmtStyle::Json => layer.json().boxed(),
            LoggingFmtStyle::Pretty => layer.pretty().boxed(),
        };
        layer.with_filter(log_level_filter)
    });

    // Enable logging to stdout.
    let stdout = config.stdout.enabled.then(|| {
        let log_level_filter = LevelFilter::from_level(tracing::Level::TRACE);
        let layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_ids(config.stdout.fmt.show_thread_id)
            .with_file(config.stdout.fmt.show_source)
            .with_line_number(config.stdout.fmt.show_source)
            .with_ansi(config.stdout.fmt.colors);
        let layer = match config.stdout.fmt.style {
            LoggingFmtStyle::Compact => layer.compact().boxed(),
            LoggingFmtStyle::Full => layer.boxed(),
            LoggingFmtStyle::Json => layer.json().boxed(),
            LoggingFmtStyle::Pretty => layer.pretty().boxed(),
        };
        layer.with_filter(log_level_filter)
    });

    let env_filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive("l3cfg=debug".parse().unwrap())
        .from_env_lossy();
    tracing_subscriber::registry()
        .with(env_filter)
        .with(file)
        .with(stdout)
        .init();
}

fn init_driver(config: &Config) -> RoutingDriver {
    let catalog = match SnippetCatalog::with_overrides(&config.snippets) {
        Ok(catalog) => catalog,
        Err(error) => {
            error!(%error, "invalid template override");
            std::process::exit(1);
        }
    };
    let session =
        DryRunSession::new(config.device.capabilities.iter().cloned());

    let driver = RoutingDriver::new(
        config.device.id.clone(),
        Arc::new(session),
        Arc::new(catalog),
    );
    match config.device.timeout {
        0 => driver,
        timeout => driver.with_timeout(Duration::from_secs(timeout)),
    }
}

// Replays the intents of a record file, one JSON document per line.
async fn replay(driver: &RoutingDriver, region: &MultiRegion, filename: &str) {
    let records = match std::fs::read_to_string(filename) {
        Ok(records) => records,
        Err(error) => {
            error!(%filename, %error, "failed to read record file");
            std::process::exit(1);
        }
    };

    let (mut applied, mut failed) = (0, 0);
    for (lineno, line) in records.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let span = debug_span!("intent", lineno = lineno + 1);
        let intent = match serde_json::from_str::<Intent>(line) {
            Ok(intent) => intent,
            Err(error) => {
                span.in_scope(|| error!(%error, "failed to parse intent"));
                failed += 1;
                continue;
            }
        };

        let result = driver
            .process_intent(region, &intent)
            .instrument(span.clone())
            .await;
        match result {
            Ok(()) => applied += 1,
            Err(error) => {
                span.in_scope(|| error.log());
                failed += 1;
            }
        }
    }

    info!(%applied, %failed, "replay finished");
}

// ===== main =====

fn main() {
    // Parse command-line parameters.
    let matches = App::new("ASR1k L3 configuration agent")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("file")
                .help("Specify an alternative configuration file."),
        )
        .arg(
            Arg::with_name("FILENAME")
                .help("Intents file path (one JSON intent per line)")
                .required(true)
                .index(1),
        )
        .get_matches();

    // Read configuration file.
    let config_file = matches.value_of("config");
    let config = match Config::load(config_file) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("Failed to parse configuration file: {error}");
            std::process::exit(1);
        }
    };
    let Some(filename) = matches.value_of("FILENAME") else {
        eprintln!("missing intents file");
        std::process::exit(1);
    };

    // Initialize tracing.
    init_tracing(&config.logging);

    // We're ready to go!
    info!(device = %config.device.id, "starting up");

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(error) => {
            error!(%error, "failed to create async runtime");
            std::process::exit(1);
        }
    };
    runtime.block_on(async {
        let driver = init_driver(&config);
        let mut sigint = match signal(SignalKind::interrupt()) {
            Ok(sigint) => sigint,
            Err(error) => {
                error!(%error, "failed to install signal handler");
                std::process::exit(1);
            }
        };

        tokio::select! {
            _ = replay(&driver, &config.multi_region, filename) => {},
            _ = sigint.recv() => {
                info!("received SIGINT");
            }
        }
    });

    info!("exiting");
}
