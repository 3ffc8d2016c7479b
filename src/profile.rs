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

//! What a sensor type needs from the binding
//!
//! A sensor type contributes data only: the driver it expects, how many value
//! channels it reads and the mode to select on open. [`SensorSpec`] is the
//! explicit record the binding stores; anything implementing [`SensorProfile`]
//! can produce one.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SensorError};

pub trait SensorProfile {
    /// Kernel driver expected on the port, matched as a substring
    fn driver_name(&self) -> &str;

    /// Number of `valueN` channels to bind
    fn value_count(&self) -> usize;

    /// Mode applied whenever the sensor is opened
    fn default_mode(&self) -> Option<&str>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SensorSpec {
    pub driver_name: String,
    pub value_count: usize,
    #[serde(default)]
    pub default_mode: Option<String>,
}

impl SensorSpec {
    pub fn new(driver_name: impl Into<String>, value_count: usize, default_mode: Option<&str>) -> Self {
        Self {
            driver_name: driver_name.into(),
            value_count,
            default_mode: default_mode.map(str::to_string),
        }
    }

    pub fn from_profile<P: SensorProfile + ?Sized>(profile: &P) -> Self {
        Self::new(profile.driver_name(), profile.value_count(), profile.default_mode())
    }

    pub fn validate(&self) -> Result<()> {
        if self.driver_name.trim().is_empty() {
            return Err(SensorError::invalid_config("driver_name", "must not be empty"));
        }
        if self.value_count == 0 {
            return Err(SensorError::invalid_config("value_count", "must be at least 1"));
        }
        if let Some(mode) = &self.default_mode {
            if mode.trim().is_empty() {
                return Err(SensorError::invalid_config("default_mode", "must not be blank"));
            }
        }
        Ok(())
    }
}

impl SensorProfile for SensorSpec {
    fn driver_name(&self) -> &str {
        &self.driver_name
    }

    fn value_count(&self) -> usize {
        self.value_count
    }

    fn default_mode(&self) -> Option<&str> {
        self.default_mode.as_deref()
    }
}

/// The EV3 sensors shipped with the kit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ev3Sensor {
    Touch,
    Color,
    Ultrasonic,
    Gyro,
    Infrared,
}

impl SensorProfile for Ev3Sensor {
    fn driver_name(&self) -> &str {
        match self {
            Ev3Sensor::Touch => "lego-ev3-touch",
            Ev3Sensor::Color => "lego-ev3-color",
            Ev3Sensor::Ultrasonic => "lego-ev3-us",
            Ev3Sensor::Gyro => "lego-ev3-gyro",
            Ev3Sensor::Infrared => "lego-ev3-ir",
        }
    }

    fn value_count(&self) -> usize {
        match self {
            Ev3Sensor::Touch | Ev3Sensor::Ultrasonic => 1,
            Ev3Sensor::Gyro => 2,
            // RGB-RAW
            Ev3Sensor::Color => 3,
            // IR-SEEK reports heading and distance for four channels
            Ev3Sensor::Infrared => 8,
        }
    }

    fn default_mode(&self) -> Option<&str> {
        match self {
            Ev3Sensor::Touch => Some("TOUCH"),
            Ev3Sensor::Color => None,
            Ev3Sensor::Ultrasonic => Some("US-DIST-CM"),
            Ev3Sensor::Gyro => Some("GYRO-G&A"),
            Ev3Sensor::Infrared => Some("IR-PROX"),
        }
    }
}
