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

//! Flat name-to-path map of a two-level asset folder
//!
//! Folders such as sound or image libraries are laid out as
//! `<folder>/<category>/<name>.<ext>`. [`flatten_tree`] turns that into one
//! lookup table keyed by file stem.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{IoOp, Result, SensorError};

/// Map every `<category>/<file>` under `folder` to its full path, keyed by
/// the file stem.
///
/// Categories are visited in sorted order and a later category wins on a
/// duplicate stem. Plain files directly under `folder` are ignored.
pub fn flatten_tree(folder: &Path) -> Result<BTreeMap<String, PathBuf>> {
    let mut categories = read_entries(folder)?;
    categories.retain(|p| p.is_dir());
    categories.sort();

    let mut tree = BTreeMap::new();
    for category in categories {
        for file in read_entries(&category)? {
            if let Some(stem) = file.file_stem().and_then(|s| s.to_str()) {
                tree.insert(stem.to_string(), file.clone());
            }
        }
    }
    debug!(folder = ?folder, entries = tree.len(), "Flattened asset tree");
    Ok(tree)
}

fn read_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| SensorError::io(IoOp::List, dir, e))?;
    let mut paths = Vec::new();
    for entry in entries {
        paths.push(entry.map_err(|e| SensorError::io(IoOp::List, dir, e))?.path());
    }
    Ok(paths)
}
