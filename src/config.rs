/*
 * This file is part of ev3port.
 *
 * Copyright (C) 2025 ev3port contributors
 *
 * ev3port is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * ev3port is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with ev3port. If not, see <https://www.gnu.org/licenses/>.
 */

//! Platform layout and reset timing
//!
//! Defaults match a stock ev3dev kernel. A JSON file can override them when a
//! kernel exposes a different layout.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{enumeration, paths, reset};
use crate::error::{IoOp, Result, SensorError};

/// Environment variable naming an alternative config file
pub const CONFIG_ENV: &str = "EV3PORT_CONFIG";

fn default_sensor_root() -> PathBuf { PathBuf::from(paths::SENSOR_ROOT) }
fn default_port_root() -> PathBuf { PathBuf::from(paths::PORT_ROOT) }
fn default_non_device_entries() -> usize { enumeration::NON_DEVICE_ENTRIES }
fn default_initial_settle_ms() -> u64 { reset::INITIAL_SETTLE_MS }
fn default_poll_interval_ms() -> u64 { reset::POLL_INTERVAL_MS }
fn default_timeout_ms() -> u64 { reset::TIMEOUT_MS }
fn default_post_settle_ms() -> u64 { reset::POST_SETTLE_MS }

/// Waits used by the reset protocol, in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResetTiming {
    #[serde(default = "default_initial_settle_ms")]
    pub initial_settle_ms: u64,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_post_settle_ms")]
    pub post_settle_ms: u64,
}

impl ResetTiming {
    pub fn initial_settle(&self) -> Duration { Duration::from_millis(self.initial_settle_ms) }
    pub fn poll_interval(&self) -> Duration { Duration::from_millis(self.poll_interval_ms) }
    pub fn timeout(&self) -> Duration { Duration::from_millis(self.timeout_ms) }
    pub fn post_settle(&self) -> Duration { Duration::from_millis(self.post_settle_ms) }
}

impl Default for ResetTiming {
    fn default() -> Self {
        Self {
            initial_settle_ms: reset::INITIAL_SETTLE_MS,
            poll_interval_ms: reset::POLL_INTERVAL_MS,
            timeout_ms: reset::TIMEOUT_MS,
            post_settle_ms: reset::POST_SETTLE_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlatformConfig {
    /// Directory holding one subdirectory per attached sensor
    #[serde(default = "default_sensor_root")]
    pub sensor_root: PathBuf,
    /// Directory holding one subdirectory per physical port
    #[serde(default = "default_port_root")]
    pub port_root: PathBuf,
    /// Entries under `sensor_root` that are never sensors
    #[serde(default = "default_non_device_entries")]
    pub non_device_entries: usize,
    #[serde(default)]
    pub reset: ResetTiming,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            sensor_root: default_sensor_root(),
            port_root: default_port_root(),
            non_device_entries: default_non_device_entries(),
            reset: ResetTiming::default(),
        }
    }
}

impl PlatformConfig {
    /// Config rooted somewhere other than `/sys/class`, e.g. a test tree
    pub fn with_roots(sensor_root: impl Into<PathBuf>, port_root: impl Into<PathBuf>) -> Self {
        Self {
            sensor_root: sensor_root.into(),
            port_root: port_root.into(),
            ..Self::default()
        }
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path).map_err(|e| SensorError::io(IoOp::Read, path, e))?;
        let cfg: PlatformConfig = serde_json::from_str(&data)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Like [`load`](Self::load), but a missing file yields the defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match fs::metadata(path) {
            Ok(_) => Self::load(path),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(SensorError::io(IoOp::Read, path, e)),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| SensorError::io(IoOp::Write, parent, e))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|e| SensorError::io(IoOp::Write, path, e))
    }

    pub fn validate(&self) -> Result<()> {
        if self.sensor_root.as_os_str().is_empty() {
            return Err(SensorError::invalid_config("sensor_root", "must not be empty"));
        }
        if self.port_root.as_os_str().is_empty() {
            return Err(SensorError::invalid_config("port_root", "must not be empty"));
        }
        if self.reset.poll_interval_ms == 0 {
            return Err(SensorError::invalid_config("reset.poll_interval_ms", "must be > 0"));
        }
        if self.reset.timeout_ms < self.reset.poll_interval_ms {
            return Err(SensorError::invalid_config(
                "reset.timeout_ms",
                format!("{} is shorter than the poll interval", self.reset.timeout_ms),
            ));
        }
        Ok(())
    }
}

/// `$EV3PORT_CONFIG`, or `/etc/ev3port/platform.json`
pub fn config_path() -> PathBuf {
    if let Ok(p) = env::var(CONFIG_ENV) {
        return PathBuf::from(p);
    }
    PathBuf::from("/etc/ev3port/platform.json")
}
