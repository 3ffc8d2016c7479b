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

//! Filesystem seam over the kernel's sysfs tree
//!
//! Everything that touches `/sys` goes through [`Sysfs`], so the binding and
//! reset logic can run against an in-memory tree in tests. An open handle is
//! closed by dropping it.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, Write};
use std::path::Path;

/// File and directory primitives the sensor core needs from the OS.
pub trait Sysfs {
    type Handle: Read + Write + Seek;

    /// Open an attribute for reading
    fn open_read(&self, path: &Path) -> io::Result<Self::Handle>;

    /// Open an attribute for reading and writing
    fn open_read_write(&self, path: &Path) -> io::Result<Self::Handle>;

    /// Names of the entries in a directory, in the order the OS yields them
    fn read_dir_names(&self, path: &Path) -> io::Result<Vec<String>>;

    fn exists(&self, path: &Path) -> bool;

    /// Open, read fully and close an attribute
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Open, write and close an existing attribute
    fn write_once(&self, path: &Path, contents: &str) -> io::Result<()>;
}

/// [`Sysfs`] backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealSysfs;

impl Sysfs for RealSysfs {
    type Handle = File;

    fn open_read(&self, path: &Path) -> io::Result<File> {
        File::open(path)
    }

    fn open_read_write(&self, path: &Path) -> io::Result<File> {
        OpenOptions::new().read(true).write(true).open(path)
    }

    fn read_dir_names(&self, path: &Path) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(path)? {
            names.push(entry?.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let mut s = String::new();
        File::open(path)?.read_to_string(&mut s)?;
        Ok(s)
    }

    fn write_once(&self, path: &Path, contents: &str) -> io::Result<()> {
        // No create: a missing attribute means the port is gone
        let mut file = OpenOptions::new().write(true).open(path)?;
        file.write_all(contents.as_bytes())?;
        file.flush()
    }
}
