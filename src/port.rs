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

//! Logical input ports and their sysfs naming

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{attr, port};
use crate::error::{Result, SensorError};

/// A physical sensor input port, `S1` through `S4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Port(u8);

impl Port {
    pub const S1: Port = Port(1);
    pub const S2: Port = Port(2);
    pub const S3: Port = Port(3);
    pub const S4: Port = Port(4);

    /// Validate a port number. Anything outside 1-4 is a configuration error.
    pub fn new(number: u8) -> Result<Self> {
        if !(port::MIN..=port::MAX).contains(&number) {
            return Err(SensorError::InvalidPort(number));
        }
        Ok(Port(number))
    }

    pub fn all() -> [Port; 4] {
        [Port::S1, Port::S2, Port::S3, Port::S4]
    }

    pub fn number(self) -> u8 {
        self.0
    }

    /// Token a sensor on this port reports in its `address` attribute, e.g. `in2`
    pub fn address_token(self) -> String {
        format!("{}{}", port::ADDRESS_PREFIX, self.0)
    }

    /// Directory name of this port under the port root.
    ///
    /// Port directories are numbered one below sensor ports: `S2` is `port1`.
    pub fn port_dir_name(self) -> String {
        format!("{}{}", port::PORT_DIR_PREFIX, self.0 - port::PORT_DIR_OFFSET)
    }

    /// Path of the attribute that re-probes this port when written
    pub fn port_mode_path(self, port_root: &Path) -> PathBuf {
        port_root.join(self.port_dir_name()).join(attr::MODE)
    }
}

impl TryFrom<u8> for Port {
    type Error = SensorError;

    fn try_from(number: u8) -> Result<Self> {
        Port::new(number)
    }
}

impl From<Port> for u8 {
    fn from(port: Port) -> u8 {
        port.0
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_valid_ports() {
        for n in 1..=4 {
            assert_eq!(Port::new(n).unwrap().number(), n);
        }
        assert_eq!(Port::all().len(), 4);
    }

    #[test]
    fn test_invalid_ports() {
        for n in [0u8, 5, 49, 255] {
            let err = Port::new(n).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Configuration);
            assert!(matches!(err, SensorError::InvalidPort(m) if m == n));
        }
    }

    #[test]
    fn test_address_token_and_port_dir_offset() {
        assert_eq!(Port::S1.address_token(), "in1");
        assert_eq!(Port::S4.address_token(), "in4");
        assert_eq!(Port::S1.port_dir_name(), "port0");
        assert_eq!(Port::S2.port_dir_name(), "port1");
        assert_eq!(Port::S4.port_dir_name(), "port3");
        assert_eq!(
            Port::S3.port_mode_path(Path::new("/sys/class/lego-port")),
            PathBuf::from("/sys/class/lego-port/port2/mode")
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Port::S2.to_string(), "S2");
    }

    #[test]
    fn test_serde_validates() {
        let port: Port = serde_json::from_str("3").unwrap();
        assert_eq!(port, Port::S3);
        assert_eq!(serde_json::to_string(&Port::S1).unwrap(), "1");
        assert!(serde_json::from_str::<Port>("9").is_err());
    }
}
