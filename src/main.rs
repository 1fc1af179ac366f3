/*
 *  main.rs
 *
 *  vfdclock - time on glass
 *  (c) 2020-26 Stuart Hunter
 *
 *  Standalone host: loads configuration, runs the clock plugin until a
 *  termination signal arrives, then cleans up
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{error, info, warn};
use tokio::signal::unix::{signal, SignalKind};

use vfdclock::config::{self, Cli, Config};
use vfdclock::plugin::{Plugin, StopToken, ThreadHost, VfdClockPlugin};
use vfdclock::transport::{scan_bus, I2cTransport, LinuxI2c, MockTransport};
use vfdclock::vfd::{DEFAULT_ADDRESS, DEFAULT_BUS};

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// Buses enumerated by --scan when the config names none
const DEFAULT_SCAN_BUSES: [u8; 2] = [0, 1];

/// Waits for SIGINT, SIGTERM or SIGHUP and returns once any arrives.
async fn signal_handler() -> Result<()> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sighup = signal(SignalKind::hangup())?;

    tokio::select! {
        _ = sigint.recv() => {
            info!("SIGINT received. Initiating graceful shutdown.");
        }
        _ = sigterm.recv() => {
            info!("SIGTERM received. Initiating graceful shutdown.");
        }
        _ = sighup.recv() => {
            info!("SIGHUP received. Initiating graceful shutdown.");
        }
    }
    Ok(())
}

/// Drive the plugin through init -> run -> cleanup.
///
/// `run` blocks, so it gets a blocking thread; the signal task flips the
/// stop token and the loop notices at its next poll.
async fn host_plugin<T>(mut plugin: VfdClockPlugin<T>) -> Result<()>
where
    T: I2cTransport + Send + 'static,
    T::Device: Send,
{
    let token = StopToken::new();
    let host = ThreadHost::new(token.clone());

    let meta = plugin.info().clone();
    info!("Hosting {} v{} ({}) by {}", meta.name, meta.version, meta.slug, meta.author);

    if let Err(e) = plugin.init(&host) {
        error!("{} init failed (code {}): {}", meta.slug, e.code(), e);
        return Err(e.into());
    }

    let signal_token = token.clone();
    let signals = tokio::spawn(async move {
        if let Err(e) = signal_handler().await {
            warn!("Signal handling failed, stopping anyway: {}", e);
        }
        signal_token.request_stop();
    });

    let service_host = host.clone();
    let mut plugin = tokio::task::spawn_blocking(move || {
        plugin.run(&service_host);
        plugin
    })
    .await
    .context("clock service thread failed")?;
    signals.abort();

    plugin.cleanup(&host);
    Ok(())
}

fn scan<T: I2cTransport>(transport: &mut T, cfg: &Config) {
    let buses = cfg.vfd().scan_buses.unwrap_or_else(|| DEFAULT_SCAN_BUSES.to_vec());
    for bus in buses {
        let found = scan_bus(transport, bus);
        if found.is_empty() {
            info!("  Bus {}: no devices", bus);
        }
    }
}

/// Mock bus with the configured tube answering probes
fn emulated_bus(cfg: &Config) -> MockTransport {
    let vfd = cfg.vfd();
    let mut transport = MockTransport::new();
    transport.respond_at(vfd.bus.unwrap_or(DEFAULT_BUS), vfd.address.unwrap_or(DEFAULT_ADDRESS));
    transport
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli).context("loading configuration")?;

    if cli.dump_config {
        // Pretty YAML of effective config (nice for debugging)
        print!("{}", serde_yaml::to_string(&cfg)?);
        return Ok(());
    }

    let level = cfg.log_level.clone().unwrap_or_else(|| "info".to_string());
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();

    info!("{} v.{} built {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), BUILD_DATE);

    if cli.scan {
        if cli.emulate {
            scan(&mut emulated_bus(&cfg), &cfg);
        } else {
            scan(&mut LinuxI2c::new(), &cfg);
        }
        return Ok(());
    }

    if cli.emulate {
        info!("Emulation mode enabled - frames go to the debug log");
        host_plugin(VfdClockPlugin::new(emulated_bus(&cfg), &cfg)).await
    } else {
        host_plugin(VfdClockPlugin::new(LinuxI2c::new(), &cfg)).await
    }
}
