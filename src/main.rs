//! DAQ Chassis Console - Main Entry Point
//!
//! Starts the live console: loads configuration, selects the chassis
//! driver, and hands both to the eframe frontend. Acquisition threads are
//! spawned per run by the session controller, not here.

use std::sync::Arc;

use daqview_rs::config::AppConfig;
use daqview_rs::frontend::DaqConsoleApp;
use daqview_rs::hardware::{Chassis, SerialChassis};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,daqview_rs=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting DAQ Chassis Console");

    let config = match AppConfig::load_or_default() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Falling back to default configuration: {e}");
            AppConfig::default()
        }
    };

    let chassis = build_chassis(&config);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([850.0, 650.0])
            .with_min_inner_size([700.0, 500.0])
            .with_title("DAQ Chassis Console"),
        ..Default::default()
    };

    eframe::run_native(
        "DAQ Chassis Console",
        native_options,
        Box::new(|_cc| Ok(Box::new(DaqConsoleApp::new(chassis, config)))),
    )
}

#[cfg(feature = "mock-chassis")]
fn build_chassis(config: &AppConfig) -> Arc<dyn Chassis> {
    if config.transport.simulate {
        tracing::info!("Using simulated chassis");
        Arc::new(daqview_rs::hardware::SimChassis::new())
    } else {
        Arc::new(SerialChassis::new(&config.transport))
    }
}

#[cfg(not(feature = "mock-chassis"))]
fn build_chassis(config: &AppConfig) -> Arc<dyn Chassis> {
    if config.transport.simulate {
        tracing::warn!("simulate = true requires the mock-chassis feature; using serial transport");
    }
    Arc::new(SerialChassis::new(&config.transport))
}
