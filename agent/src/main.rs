//! cloudlink - Entry Point
//!
//! Keeps CatGenie litter box and SwitchBot vacuum state fresh from their
//! clouds and serves it to the local host.

use std::collections::HashMap;
use std::env;

use cloudlink::app::options::AppOptions;
use cloudlink::app::run::{run, LifecycleEvent};
use cloudlink::filesys::file::File;
use cloudlink::logs::{init_logging, LogOptions};
use cloudlink::storage::layout::StorageLayout;
use cloudlink::storage::settings::Settings;
use cloudlink::utils::{run_diagnostic, version_info};

use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut cli_args: HashMap<String, String> = HashMap::new();

    for arg in args.iter().skip(1) {
        if let Some((key, value)) = arg.split_once('=') {
            // Handle --key=value format
            let clean_key = key.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), value.to_string());
        } else if arg.starts_with("--") {
            // Handle standalone flags like --version
            let clean_key = arg.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), "true".to_string());
        }
    }

    // Print version and exit
    let version = version_info();
    if cli_args.contains_key("version") {
        match serde_json::to_string_pretty(&version) {
            Ok(json) => println!("{}", json),
            Err(_) => println!("{}", version.version),
        }
        return;
    }

    let layout = StorageLayout::default();
    let settings_file = match cli_args.get("config") {
        Some(path) => File::new(path),
        None => layout.settings_file(),
    };

    // Run diagnostics
    if cli_args.contains_key("diagnostic") || cli_args.contains_key("diag") {
        run_diagnostic(&settings_file).await;
        return;
    }

    // Retrieve the settings file
    let settings = match Settings::load(&settings_file).await {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}", e);
            return;
        }
    };

    // Initialize logging, keeping the file writer alive until exit
    let log_options = LogOptions {
        log_level: settings.log_level.clone(),
        log_dir: settings.logging.log_dir.clone(),
        json_format: settings.logging.json,
        ..Default::default()
    };
    let _log_guard = match init_logging(log_options) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            None
        }
    };

    let (events_tx, events_rx) = mpsc::channel(4);
    tokio::spawn(forward_signals(events_tx));

    info!(
        "Running cloudlink {} with settings from {}",
        version.version,
        settings_file.path().display()
    );
    drop(settings);

    let settings_file = &settings_file;
    let result = run(
        move || async move { Settings::load(settings_file).await.map(AppOptions::from) },
        events_rx,
    )
    .await;
    if let Err(e) = result {
        error!("Failed to run cloudlink: {e}");
        std::process::exit(1);
    }
}

/// Turn process signals into lifecycle events
///
/// SIGTERM and SIGINT request a shutdown, SIGHUP a reload.
async fn forward_signals(events_tx: mpsc::Sender<LifecycleEvent>) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let signals = (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
            signal(SignalKind::hangup()),
        );
        let (mut sigterm, mut sigint, mut sighup) = match signals {
            (Ok(term), Ok(int), Ok(hup)) => (term, int, hup),
            _ => {
                error!("Unable to install signal handlers, falling back to Ctrl+C");
                let _ = tokio::signal::ctrl_c().await;
                let _ = events_tx.send(LifecycleEvent::Shutdown).await;
                return;
            }
        };

        loop {
            let event = tokio::select! {
                _ = sigterm.recv() => {
                    info!("SIGTERM received, shutting down...");
                    LifecycleEvent::Shutdown
                }
                _ = sigint.recv() => {
                    info!("SIGINT received, shutting down...");
                    LifecycleEvent::Shutdown
                }
                _ = sighup.recv() => {
                    info!("SIGHUP received, reloading...");
                    LifecycleEvent::Reload
                }
            };

            if events_tx.send(event).await.is_err() || event == LifecycleEvent::Shutdown {
                return;
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
        }
        info!("Ctrl+C received, shutting down...");
        let _ = events_tx.send(LifecycleEvent::Shutdown).await;
    }
}
