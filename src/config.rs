/*
 *  config.rs
 *
 *  vfdclock - time on glass
 *  (c) 2020-26 Stuart Hunter
 *
 *  YAML configuration with command line overrides
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

use clap::{ArgAction, Parser, ValueHint};
use dirs_next::home_dir;
use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}};
use thiserror::Error;

/// Lowest and highest non-reserved 7-bit addresses
const MIN_ADDRESS: u8 = 0x08;
const MAX_ADDRESS: u8 = 0x77;

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Top-level app configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub log_level: Option<String>,  // e.g., "info" | "debug"
    pub vfd: Option<VfdConfig>,
    pub clock: Option<ClockConfig>,
}

/// Tube wiring and power settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VfdConfig {
    pub bus: Option<u8>,              // /dev/i2c-N
    pub address: Option<u8>,          // 7-bit
    pub speed_hz: Option<u32>,
    pub brightness: Option<u8>,       // 0-255
    pub scan_buses: Option<Vec<u8>>,  // logged at init, diagnostic only
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClockConfig {
    pub refresh_ms: Option<u64>,
}

impl Config {
    pub fn vfd(&self) -> VfdConfig {
        self.vfd.clone().unwrap_or_default()
    }

    pub fn clock(&self) -> ClockConfig {
        self.clock.clone().unwrap_or_default()
    }
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone, Default)]
#[command(name = "vfdclock", about = "Wall clock on an I2C VFD", version)]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub log_level: Option<String>,
    /// shorthand for --log-level debug
    #[arg(short, long, action = ArgAction::SetTrue)]
    pub debug: bool,
    /// I2C bus number (/dev/i2c-N)
    #[arg(long)]
    pub bus: Option<u8>,
    /// 7-bit device address, decimal or 0x prefixed hex
    #[arg(long, value_parser = parse_address)]
    pub address: Option<u8>,
    #[arg(long)]
    pub brightness: Option<u8>,
    #[arg(long)]
    pub refresh_ms: Option<u64>,
    /// scan the configured buses (default 0 and 1), report devices and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub scan: bool,
    /// run against a mock bus and log the frames instead of driving hardware
    #[arg(long, action = ArgAction::SetTrue)]
    pub emulate: bool,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

/// Accepts "16", "0x10" or "0X10"
pub fn parse_address(s: &str) -> Result<u8, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse::<u8>(),
    };
    parsed.map_err(|e| format!("invalid I2C address '{}': {}", s, e))
}

/// Public entry point: read YAML, merge CLI, validate.
pub fn load(cli: &Cli) -> Result<Config, ConfigError> {
    // 1) defaults (from `Default` impl)
    let mut cfg = Config::default();

    // 2) YAML file (explicit path or search)
    if let Some(p) = cli.config.as_ref() {
        if p.exists() {
            let y = read_yaml(p)?;
            merge(&mut cfg, y);
        } else {
            return Err(ConfigError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
    } else if let Some(p) = find_config_file() {
        let y = read_yaml(&p)?;
        merge(&mut cfg, y);
    }

    // 3) CLI overrides (highest precedence)
    apply_cli_overrides(&mut cfg, cli);

    // 4) Validate
    validate(&cfg)?;

    Ok(cfg)
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    // XDG-style: ~/.config/vfdclock/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/vfdclock/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/vfdclock.yaml");
        if p.exists() { return Some(p) }
    }
    // project local
    for candidate in &["vfdclock.yaml", "config.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    parse_yaml(&s)
}

pub fn parse_yaml(s: &str) -> Result<Config, ConfigError> {
    let cfg: Config = serde_yaml::from_str(s)?;
    Ok(cfg)
}

/// Shallow merge `src` into `dst`, Option-by-Option.
fn merge(dst: &mut Config, src: Config) {
    if src.log_level.is_some() { dst.log_level = src.log_level; }
    match (&mut dst.vfd, src.vfd) {
        (None, Some(c)) => dst.vfd = Some(c),
        (Some(d), Some(s)) => merge_vfd(d, s),
        _ => {}
    }
    match (&mut dst.clock, src.clock) {
        (None, Some(c)) => dst.clock = Some(c),
        (Some(d), Some(s)) => {
            if s.refresh_ms.is_some() { d.refresh_ms = s.refresh_ms; }
        }
        _ => {}
    }
}

fn merge_vfd(dst: &mut VfdConfig, src: VfdConfig) {
    if src.bus.is_some()        { dst.bus = src.bus; }
    if src.address.is_some()    { dst.address = src.address; }
    if src.speed_hz.is_some()   { dst.speed_hz = src.speed_hz; }
    if src.brightness.is_some() { dst.brightness = src.brightness; }
    if src.scan_buses.is_some() { dst.scan_buses = src.scan_buses; }
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.log_level.is_some() { cfg.log_level = cli.log_level.clone(); }
    if cli.debug { cfg.log_level = Some("debug".to_string()); }

    let any_vfd = cli.bus.is_some() || cli.address.is_some() || cli.brightness.is_some();
    if any_vfd && cfg.vfd.is_none() {
        cfg.vfd = Some(VfdConfig::default());
    }
    if let Some(vfd) = cfg.vfd.as_mut() {
        if cli.bus.is_some()        { vfd.bus = cli.bus; }
        if cli.address.is_some()    { vfd.address = cli.address; }
        if cli.brightness.is_some() { vfd.brightness = cli.brightness; }
    }

    if cli.refresh_ms.is_some() {
        cfg.clock.get_or_insert_with(ClockConfig::default).refresh_ms = cli.refresh_ms;
    }
}

/// Put any invariants here (required fields, ranges, etc.)
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if let Some(vfd) = cfg.vfd.as_ref() {
        if let Some(address) = vfd.address {
            if !(MIN_ADDRESS..=MAX_ADDRESS).contains(&address) {
                return Err(ConfigError::Validation(format!(
                    "vfd address 0x{:02X} outside 0x{:02X}..=0x{:02X}",
                    address, MIN_ADDRESS, MAX_ADDRESS
                )));
            }
        }
        if vfd.speed_hz == Some(0) {
            return Err(ConfigError::Validation("vfd speed_hz must be > 0".into()));
        }
    }
    if let Some(clock) = cfg.clock.as_ref() {
        if clock.refresh_ms == Some(0) {
            return Err(ConfigError::Validation("clock refresh_ms must be > 0".into()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml() {
        let cfg = parse_yaml(
            "log_level: debug\n\
             vfd:\n  bus: 0\n  address: 0x11\n  brightness: 80\n  scan_buses: [0, 1]\n\
             clock:\n  refresh_ms: 250\n",
        )
        .unwrap();

        let vfd = cfg.vfd();
        assert_eq!(cfg.log_level.as_deref(), Some("debug"));
        assert_eq!(vfd.bus, Some(0));
        assert_eq!(vfd.address, Some(0x11));
        assert_eq!(vfd.brightness, Some(80));
        assert_eq!(vfd.speed_hz, None);
        assert_eq!(vfd.scan_buses, Some(vec![0, 1]));
        assert_eq!(cfg.clock().refresh_ms, Some(250));
    }

    #[test]
    fn test_parse_yaml_rejects_garbage() {
        assert!(matches!(parse_yaml("vfd: [1, 2"), Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_merge_is_option_by_option() {
        let mut dst = parse_yaml("vfd:\n  bus: 1\n  brightness: 90\n").unwrap();
        let src = parse_yaml("vfd:\n  brightness: 60\nclock:\n  refresh_ms: 1000\n").unwrap();
        merge(&mut dst, src);

        assert_eq!(dst.vfd().bus, Some(1));
        assert_eq!(dst.vfd().brightness, Some(60));
        assert_eq!(dst.clock().refresh_ms, Some(1000));
    }

    #[test]
    fn test_cli_overrides_win() {
        let mut cfg = parse_yaml("log_level: warn\nvfd:\n  address: 0x20\n").unwrap();
        let cli = Cli::parse_from(["vfdclock", "--address", "0x10", "--refresh-ms", "750", "--debug"]);
        apply_cli_overrides(&mut cfg, &cli);

        assert_eq!(cfg.log_level.as_deref(), Some("debug"));
        assert_eq!(cfg.vfd().address, Some(0x10));
        assert_eq!(cfg.clock().refresh_ms, Some(750));
    }

    #[test]
    fn test_cli_creates_vfd_section() {
        let mut cfg = Config::default();
        let cli = Cli::parse_from(["vfdclock", "--bus", "0"]);
        apply_cli_overrides(&mut cfg, &cli);

        assert_eq!(cfg.vfd().bus, Some(0));
    }

    #[test]
    fn test_parse_address() {
        assert_eq!(parse_address("0x10"), Ok(0x10));
        assert_eq!(parse_address("0X3c"), Ok(0x3C));
        assert_eq!(parse_address("16"), Ok(16));
        assert!(parse_address("0xZZ").is_err());
        assert!(parse_address("300").is_err());
    }

    #[test]
    fn test_validate() {
        assert!(validate(&Config::default()).is_ok());
        assert!(validate(&parse_yaml("vfd:\n  address: 0x10\n").unwrap()).is_ok());
        assert!(validate(&parse_yaml("vfd:\n  address: 0x03\n").unwrap()).is_err());
        assert!(validate(&parse_yaml("vfd:\n  address: 0x78\n").unwrap()).is_err());
        assert!(validate(&parse_yaml("vfd:\n  speed_hz: 0\n").unwrap()).is_err());
        assert!(validate(&parse_yaml("clock:\n  refresh_ms: 0\n").unwrap()).is_err());
        // too bright is logged by the driver, not rejected
        assert!(validate(&parse_yaml("vfd:\n  brightness: 255\n").unwrap()).is_ok());
    }

    #[test]
    fn test_missing_explicit_config_file() {
        let cli = Cli {
            config: Some(PathBuf::from("/nonexistent/vfdclock.yaml")),
            ..Default::default()
        };
        assert!(matches!(load(&cli), Err(ConfigError::Validation(_))));
    }
}
