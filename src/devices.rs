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

//! Sensor device enumeration
//!
//! The sensor root lists one directory per attached sensor plus a fixed number
//! of kernel entries that are not sensors. Listing order is whatever the OS
//! yields; nothing here sorts or caches it.

use std::path::Path;

use tracing::trace;

use crate::config::PlatformConfig;
use crate::error::{IoOp, Result, SensorError};
use crate::sysfs::Sysfs;

/// Names of every entry under `sensor_root`, non-device entries included
pub fn list_devices<S: Sysfs>(sysfs: &S, sensor_root: &Path) -> Result<Vec<String>> {
    sysfs
        .read_dir_names(sensor_root)
        .map_err(|e| SensorError::io(IoOp::List, sensor_root, e))
}

/// Number of attached sensors.
///
/// This is the raw entry count minus `config.non_device_entries`. It is only a
/// population signal: it cannot tell which sensors are present.
pub fn count_devices<S: Sysfs>(sysfs: &S, config: &PlatformConfig) -> Result<usize> {
    let entries = list_devices(sysfs, &config.sensor_root)?.len();
    let count = entries.saturating_sub(config.non_device_entries);
    trace!(entries, count, "Counted sensor devices");
    Ok(count)
}
