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

//! Typed reads and writes on already-open sysfs attributes
//!
//! Sysfs regenerates an attribute's content on every read from offset zero,
//! so each read rewinds first. None of these helpers open or close anything.

use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::PathBuf;

use crate::error::{IoOp, Result, SensorError};
use crate::sysfs::Sysfs;

/// An open attribute handle together with its path, for error context.
#[derive(Debug)]
pub struct Attribute<H> {
    path: PathBuf,
    handle: H,
}

impl<H: Read + Write + Seek> Attribute<H> {
    pub fn new(path: impl Into<PathBuf>, handle: H) -> Self {
        Self {
            path: path.into(),
            handle,
        }
    }

    /// Open `path` read-only through `sysfs`
    pub fn open_read<S>(sysfs: &S, path: PathBuf) -> Result<Self>
    where
        S: Sysfs<Handle = H>,
    {
        let handle = sysfs
            .open_read(&path)
            .map_err(|e| SensorError::io(IoOp::Open, &path, e))?;
        Ok(Self::new(path, handle))
    }

    /// Open `path` read-write through `sysfs`
    pub fn open_read_write<S>(sysfs: &S, path: PathBuf) -> Result<Self>
    where
        S: Sysfs<Handle = H>,
    {
        let handle = sysfs
            .open_read_write(&path)
            .map_err(|e| SensorError::io(IoOp::Open, &path, e))?;
        Ok(Self::new(path, handle))
    }

    /// Read the whole attribute as trimmed text
    pub fn read_str(&mut self) -> Result<String> {
        self.handle
            .seek(SeekFrom::Start(0))
            .map_err(|e| SensorError::io(IoOp::Seek, &self.path, e))?;
        let mut buf = Vec::new();
        self.handle
            .read_to_end(&mut buf)
            .map_err(|e| SensorError::io(IoOp::Read, &self.path, e))?;
        let text = String::from_utf8(buf).map_err(|e| {
            SensorError::io(IoOp::Read, &self.path, io::Error::new(io::ErrorKind::InvalidData, e))
        })?;
        Ok(text.trim().to_string())
    }

    /// Read the attribute as a base-10 integer
    pub fn read_int(&mut self) -> Result<i64> {
        let content = self.read_str()?;
        content.parse::<i64>().map_err(|source| SensorError::Parse {
            path: self.path.clone(),
            content,
            source,
        })
    }

    /// Write `value` in a single write and flush it to the driver.
    ///
    /// A short write is an error; it is not retried.
    pub fn write_str(&mut self, value: &str) -> Result<()> {
        self.handle
            .seek(SeekFrom::Start(0))
            .map_err(|e| SensorError::io(IoOp::Seek, &self.path, e))?;
        let written = self
            .handle
            .write(value.as_bytes())
            .map_err(|e| SensorError::io(IoOp::Write, &self.path, e))?;
        if written != value.len() {
            return Err(SensorError::io(
                IoOp::Write,
                &self.path,
                io::Error::new(
                    io::ErrorKind::WriteZero,
                    format!("short write: {} of {} bytes", written, value.len()),
                ),
            ));
        }
        self.handle
            .flush()
            .map_err(|e| SensorError::io(IoOp::Flush, &self.path, e))
    }

    pub fn write_int(&mut self, value: i64) -> Result<()> {
        self.write_str(&value.to_string())
    }
}
