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

//! ev3port - ev3dev sensor binding and recovery over sysfs
//!
//! Resolves a sensor on an input port to its `/sys/class/lego-sensor`
//! directory, keeps its `mode` and `valueN` attributes open, switches modes
//! without redundant writes, and recovers a wedged sensor by re-probing its
//! port and polling until it is enumerated again.
//!
//! # Example
//!
//! ```no_run
//! use ev3port::{Ev3Sensor, Port, SensorBinding};
//!
//! let mut sonar = SensorBinding::connect(Port::S2, &Ev3Sensor::Ultrasonic)?;
//! let distance = sonar.read_value(0)?;
//! if distance == 0 {
//!     sonar.reset()?;
//! }
//! # Ok::<(), ev3port::SensorError>(())
//! ```

pub mod attr;
pub mod binding;
pub mod clock;
pub mod config;
pub mod constants;
pub mod devices;
pub mod logger;
pub mod port;
pub mod profile;
pub mod resolver;
pub mod sysfs;
pub mod tree;

/// Error types, re-exported from `ep-error`
pub mod error {
    pub use ep_error::{ErrorKind, IoOp, Result, SensorError};
}

#[cfg(test)]
pub mod test_utils;

pub use attr::Attribute;
pub use binding::SensorBinding;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{PlatformConfig, ResetTiming};
pub use devices::{count_devices, list_devices};
pub use error::{ErrorKind, Result, SensorError};
pub use port::Port;
pub use profile::{Ev3Sensor, SensorProfile, SensorSpec};
pub use resolver::resolve;
pub use sysfs::{RealSysfs, Sysfs};
pub use tree::flatten_tree;
