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

//! Resolve a port and driver name to a sensor directory

use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::constants::attr;
use crate::devices::list_devices;
use crate::error::{IoOp, Result, SensorError};
use crate::port::Port;
use crate::sysfs::Sysfs;

/// Find the sensor directory plugged into `port` whose driver matches.
///
/// Both checks are substring matches: the address must contain the port's
/// token (`in2`) and `driver_name` must contain `driver_name`, so driver
/// suffixes from different kernels still match. The first match wins.
/// Entries without an `address` attribute are not sensors and are skipped.
pub fn resolve<S: Sysfs>(
    sysfs: &S,
    sensor_root: &Path,
    port: Port,
    driver_name: &str,
) -> Result<PathBuf> {
    let token = port.address_token();

    for device in list_devices(sysfs, sensor_root)? {
        let dir = sensor_root.join(&device);
        let address_path = dir.join(attr::ADDRESS);
        if !sysfs.exists(&address_path) {
            trace!(entry = %device, "Skipping non-device entry");
            continue;
        }

        let address = sysfs
            .read_to_string(&address_path)
            .map_err(|e| SensorError::io(IoOp::Read, &address_path, e))?;
        if !address.contains(token.as_str()) {
            continue;
        }

        let driver_path = dir.join(attr::DRIVER_NAME);
        let driver = sysfs
            .read_to_string(&driver_path)
            .map_err(|e| SensorError::io(IoOp::Read, &driver_path, e))?;
        if driver.contains(driver_name) {
            debug!(port = %port, driver = %driver.trim(), path = ?dir, "Resolved sensor");
            return Ok(dir);
        }
        trace!(port = %port, found = %driver.trim(), wanted = %driver_name, "Driver mismatch");
    }

    Err(SensorError::DeviceNotFound { port: port.number() })
}
