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

//! Constants and defaults for ev3port
//!
//! Every sysfs path, attribute name and timing value lives here.

/// Sysfs locations exposed by the ev3dev kernel drivers
pub mod paths {
    /// One directory per attached sensor (`sensor0`, `sensor1`, ...)
    pub const SENSOR_ROOT: &str = "/sys/class/lego-sensor";

    /// One directory per physical input/output port (`port0`, `port1`, ...)
    pub const PORT_ROOT: &str = "/sys/class/lego-port";

    /// Default location of the JSON-lines event log
    pub const EVENT_LOG: &str = "/var/log/ev3port/events.json";

    /// Used when the default event log cannot be opened
    pub const EVENT_LOG_FALLBACK: &str = "/tmp/ev3port_events.json";
}

/// Attribute file names inside a sensor or port directory
pub mod attr {
    pub const ADDRESS: &str = "address";
    pub const DRIVER_NAME: &str = "driver_name";
    pub const MODE: &str = "mode";
    /// Value channels are `value0`, `value1`, ...
    pub const VALUE_PREFIX: &str = "value";
}

/// Physical input ports
pub mod port {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 4;

    /// Prefix of the address token a sensor reports (`in1` .. `in4`)
    pub const ADDRESS_PREFIX: &str = "in";

    /// Port directories are numbered one below the sensor port number
    pub const PORT_DIR_OFFSET: u8 = 1;

    /// Prefix of a port directory under the port root
    pub const PORT_DIR_PREFIX: &str = "port";

    /// Writing this to a port's mode forces the kernel to re-probe it
    pub const MODE_AUTO: &str = "auto";
}

/// Sensor enumeration
pub mod enumeration {
    /// Entries in the sensor root that are not sensor devices.
    /// Verify against the target kernel before relying on it.
    pub const NON_DEVICE_ENTRIES: usize = 2;
}

/// Reset protocol timing
pub mod reset {
    /// Minimum wait before the kernel starts re-enumerating
    pub const INITIAL_SETTLE_MS: u64 = 1000;
    /// Interval between device-count checks
    pub const POLL_INTERVAL_MS: u64 = 100;
    /// Budget for the device count to recover
    pub const TIMEOUT_MS: u64 = 4000;
    /// Extra margin after the count recovers, before reopening
    pub const POST_SETTLE_MS: u64 = 500;
}
