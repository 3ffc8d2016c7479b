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

//! Sensor binding: open handles, mode control, value reads and reset
//!
//! A [`SensorBinding`] owns the open `mode` handle and the `valueN` handles of
//! one resolved sensor directory. Its states are:
//!
//! - **Unbound**: created with [`SensorBinding::new`], nothing opened yet
//! - **Open**: [`open`](SensorBinding::open) resolved the device and opened
//!   every handle
//! - **Closed**: [`close`](SensorBinding::close) dropped every handle, or a
//!   reset timed out
//!
//! [`reset`](SensorBinding::reset) moves Open to Closed and back to Open.
//!
//! # Threading
//!
//! Every operation takes `&mut self`, so one binding is used by one caller at
//! a time. To share a binding across threads, wrap it in a mutex. Nothing is
//! locked internally, which keeps [`read_value`](SensorBinding::read_value)
//! a single seek and read.
//!
//! # Reset limits
//!
//! Reset waits for the number of attached sensors to return to what it was
//! before the port was re-probed. That count cannot tell a swapped sensor
//! from the one that was there. The reopen that follows re-resolves the port by
//! address and driver name, so a different sensor type on the port fails with
//! `DeviceNotFound` instead of binding silently.

use std::path::{Path, PathBuf};

use serde_json::json;
use tracing::{debug, info, trace, warn};

use crate::attr::Attribute;
use crate::clock::{Clock, SystemClock};
use crate::config::{config_path, PlatformConfig};
use crate::constants::{attr, port};
use crate::devices::count_devices;
use crate::error::{IoOp, Result, SensorError};
use crate::logger;
use crate::port::Port;
use crate::profile::{SensorProfile, SensorSpec};
use crate::resolver::resolve;
use crate::sysfs::{RealSysfs, Sysfs};

/// Handles of an opened sensor directory
struct OpenDevice<H> {
    path: PathBuf,
    mode: Attribute<H>,
    values: Vec<Attribute<H>>,
    /// Always the last mode read from or written to `mode`
    current_mode: String,
}

pub struct SensorBinding<S: Sysfs = RealSysfs, C: Clock = SystemClock> {
    sysfs: S,
    clock: C,
    config: PlatformConfig,
    port: Port,
    spec: SensorSpec,
    device: Option<OpenDevice<S::Handle>>,
}

impl SensorBinding {
    /// Open a sensor on the real sysfs tree.
    ///
    /// The platform config is read from [`config_path`] when present.
    pub fn connect<P: SensorProfile + ?Sized>(port: Port, profile: &P) -> Result<Self> {
        let config = PlatformConfig::load_or_default(&config_path())?;
        let mut binding = Self::new(RealSysfs, SystemClock, config, port, profile)?;
        binding.open()?;
        Ok(binding)
    }
}

impl<S: Sysfs, C: Clock> SensorBinding<S, C> {
    /// Create an unbound binding. No file is touched until [`open`](Self::open).
    pub fn new<P: SensorProfile + ?Sized>(
        sysfs: S,
        clock: C,
        config: PlatformConfig,
        port: Port,
        profile: &P,
    ) -> Result<Self> {
        let spec = SensorSpec::from_profile(profile);
        spec.validate()?;
        config.validate()?;
        Ok(Self {
            sysfs,
            clock,
            config,
            port,
            spec,
            device: None,
        })
    }

    pub fn port(&self) -> Port {
        self.port
    }

    pub fn spec(&self) -> &SensorSpec {
        &self.spec
    }

    pub fn is_open(&self) -> bool {
        self.device.is_some()
    }

    /// Sensor directory currently bound, if open
    pub fn path(&self) -> Option<&Path> {
        self.device.as_ref().map(|d| d.path.as_path())
    }

    /// Mode currently applied to the sensor, if open
    pub fn mode(&self) -> Option<&str> {
        self.device.as_ref().map(|d| d.current_mode.as_str())
    }

    /// Resolve the sensor, open its handles and apply the default mode.
    ///
    /// Any handles from a previous open are closed first. On failure nothing
    /// stays open.
    pub fn open(&mut self) -> Result<()> {
        self.close();
        let device = self.open_device()?;
        debug!(
            port = %self.port,
            path = ?device.path,
            mode = %device.current_mode,
            values = device.values.len(),
            "Opened sensor"
        );
        self.device = Some(device);

        if let Some(mode) = self.spec.default_mode.clone() {
            if let Err(e) = self.set_mode(&mode) {
                self.close();
                return Err(e);
            }
        }
        Ok(())
    }

    // Handles opened before a failure are dropped on return.
    fn open_device(&self) -> Result<OpenDevice<S::Handle>> {
        let path = resolve(&self.sysfs, &self.config.sensor_root, self.port, &self.spec.driver_name)?;
        let mut mode = Attribute::open_read_write(&self.sysfs, path.join(attr::MODE))?;
        let values = (0..self.spec.value_count)
            .map(|k| {
                Attribute::open_read(&self.sysfs, path.join(format!("{}{}", attr::VALUE_PREFIX, k)))
            })
            .collect::<Result<Vec<_>>>()?;
        let current_mode = mode.read_str()?;
        Ok(OpenDevice {
            path,
            mode,
            values,
            current_mode,
        })
    }

    /// Drop every handle. Closing a closed binding does nothing.
    pub fn close(&mut self) {
        if let Some(device) = self.device.take() {
            debug!(port = %self.port, path = ?device.path, "Closed sensor");
        }
    }

    fn device_mut(&mut self) -> Result<&mut OpenDevice<S::Handle>> {
        let port = self.port.number();
        self.device.as_mut().ok_or(SensorError::NotOpen { port })
    }

    /// Switch the sensor mode.
    ///
    /// Writing the mode restarts sampling, so asking for the mode already
    /// applied writes nothing. A failed write leaves the cached mode as it was.
    pub fn set_mode(&mut self, mode: &str) -> Result<()> {
        let port = self.port;
        let device = self.device_mut()?;
        if device.current_mode == mode {
            trace!(port = %port, mode = %mode, "Mode already set");
            return Ok(());
        }
        device.mode.write_str(mode)?;
        debug!(port = %port, from = %device.current_mode, to = %mode, "Changed sensor mode");
        device.current_mode = mode.to_string();
        Ok(())
    }

    /// Raw integer on value channel `index`, unscaled
    pub fn read_value(&mut self, index: usize) -> Result<i64> {
        let device = self.device_mut()?;
        let count = device.values.len();
        device
            .values
            .get_mut(index)
            .ok_or(SensorError::ValueIndexOutOfRange { index, count })?
            .read_int()
    }

    /// Every value channel, in index order
    pub fn read_values(&mut self) -> Result<Vec<i64>> {
        self.device_mut()?
            .values
            .iter_mut()
            .map(Attribute::read_int)
            .collect()
    }

    /// Force the kernel to re-probe the sensor, as if it were unplugged and
    /// plugged back in, then reopen it.
    ///
    /// Blocks for at least the initial plus post settle time (1.5 s by
    /// default). If the sensor count does not recover within the timeout, this
    /// fails with `ResetTimeout` and the binding stays closed.
    pub fn reset(&mut self) -> Result<()> {
        let timing = self.config.reset.clone();
        let port_number = self.port.number();

        let expected = count_devices(&self.sysfs, &self.config)?;
        info!(port = %self.port, sensors = expected, "Resetting sensor");
        logger::log_event(
            "sensor_reset",
            json!({
                "port": port_number,
                "driver": self.spec.driver_name,
                "sensors": expected,
            }),
        );

        self.close();

        let port_mode = self.port.port_mode_path(&self.config.port_root);
        self.sysfs
            .write_once(&port_mode, port::MODE_AUTO)
            .map_err(|e| SensorError::io(IoOp::Write, &port_mode, e))?;

        self.clock.sleep(timing.initial_settle());

        let started = self.clock.now();
        loop {
            let found = count_devices(&self.sysfs, &self.config)?;
            if found == expected {
                break;
            }
            self.clock.sleep(timing.poll_interval());
            let waited = self.clock.now().saturating_duration_since(started);
            if waited > timing.timeout() {
                warn!(
                    port = %self.port,
                    expected,
                    found,
                    waited_ms = waited.as_millis() as u64,
                    "Sensor did not come back after reset"
                );
                logger::log_event(
                    "sensor_reset_timeout",
                    json!({
                        "port": port_number,
                        "expected": expected,
                        "found": found,
                        "waited_ms": waited.as_millis() as u64,
                    }),
                );
                return Err(SensorError::ResetTimeout {
                    port: port_number,
                    expected,
                    found,
                    waited,
                });
            }
        }
        let waited = self.clock.now().saturating_duration_since(started);

        self.clock.sleep(timing.post_settle());
        self.open()?;

        info!(port = %self.port, waited_ms = waited.as_millis() as u64, "Sensor reset complete");
        logger::log_event(
            "sensor_reset_ok",
            json!({ "port": port_number, "waited_ms": waited.as_millis() as u64 }),
        );
        Ok(())
    }
}
