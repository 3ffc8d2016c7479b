/*
 * Test utilities and fakes for ev3port
 *
 * FakeSysfs is an in-memory sensor tree. It counts open handles and writes,
 * and can make a device disappear when its port is re-probed.
 */

#[cfg(test)]
pub mod fake_sysfs {
    use std::collections::{BTreeMap, BTreeSet};
    use std::io::{self, Read, Seek, SeekFrom, Write};
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    use parking_lot::Mutex;

    use crate::config::PlatformConfig;
    use crate::constants::port;
    use crate::sysfs::Sysfs;

    pub const SENSOR_ROOT: &str = "/sys/class/lego-sensor";
    pub const PORT_ROOT: &str = "/sys/class/lego-port";

    /// What happens to a device when its port is re-probed
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum ResetBehavior {
        /// Nothing visible changes
        Stable,
        /// The device vanishes and is back after this many root listings
        Reappear { after_lists: usize },
        /// The device vanishes for good
        Vanish,
    }

    #[derive(Debug)]
    struct FakeTree {
        files: BTreeMap<PathBuf, String>,
        open_handles: usize,
        writes: Vec<(PathBuf, String)>,
        failing_writes: BTreeSet<PathBuf>,
        failing_flushes: BTreeSet<PathBuf>,
        flushes: Vec<PathBuf>,
        mode_effects: BTreeMap<(PathBuf, String), Vec<(String, String)>>,
        reset_target: Option<(PathBuf, ResetBehavior)>,
        hidden: Vec<(PathBuf, String)>,
        lists_until_return: Option<usize>,
    }

    impl FakeTree {
        fn has_children(&self, dir: &Path) -> bool {
            self.files.keys().any(|p| p != dir && p.starts_with(dir))
        }

        fn record_write(&mut self, path: &Path, contents: &str) -> io::Result<()> {
            if self.failing_writes.contains(path) {
                return Err(io::Error::new(io::ErrorKind::Other, "injected write failure"));
            }
            if !self.files.contains_key(path) {
                return Err(io::Error::from(io::ErrorKind::NotFound));
            }
            self.writes.push((path.to_path_buf(), contents.to_string()));
            self.files.insert(path.to_path_buf(), contents.to_string());

            // Mode writes may switch what the value channels report
            if let Some(dir) = path.parent() {
                let key = (dir.to_path_buf(), contents.to_string());
                if let Some(effects) = self.mode_effects.get(&key).cloned() {
                    for (file, content) in effects {
                        self.files.insert(dir.join(file), content);
                    }
                }
            }

            if contents == port::MODE_AUTO {
                self.trigger_reset();
            }
            Ok(())
        }

        fn trigger_reset(&mut self) {
            let Some((device, behavior)) = self.reset_target.clone() else { return };
            if behavior == ResetBehavior::Stable {
                return;
            }
            let gone: Vec<PathBuf> = self
                .files
                .keys()
                .filter(|p| p.starts_with(&device))
                .cloned()
                .collect();
            for path in gone {
                if let Some(content) = self.files.remove(&path) {
                    self.hidden.push((path, content));
                }
            }
            self.lists_until_return = match behavior {
                ResetBehavior::Reappear { after_lists } => Some(after_lists),
                _ => None,
            };
        }

        fn on_list(&mut self) {
            if let Some(remaining) = self.lists_until_return {
                if remaining == 0 {
                    for (path, content) in self.hidden.drain(..) {
                        self.files.insert(path, content);
                    }
                    self.lists_until_return = None;
                } else {
                    self.lists_until_return = Some(remaining - 1);
                }
            }
        }
    }

    /// In-memory sysfs. Clones share the same tree.
    #[derive(Debug, Clone)]
    pub struct FakeSysfs {
        tree: Arc<Mutex<FakeTree>>,
    }

    impl FakeSysfs {
        /// Empty sensor and port roots, with the two non-device entries every
        /// ev3dev sensor root carries
        pub fn new() -> Self {
            let fake = Self {
                tree: Arc::new(Mutex::new(FakeTree {
                    files: BTreeMap::new(),
                    open_handles: 0,
                    writes: Vec::new(),
                    failing_writes: BTreeSet::new(),
                    failing_flushes: BTreeSet::new(),
                    flushes: Vec::new(),
                    mode_effects: BTreeMap::new(),
                    reset_target: None,
                    hidden: Vec::new(),
                    lists_until_return: None,
                })),
            };
            fake.add_file(Path::new(SENSOR_ROOT).join("power/async"), "disabled");
            fake.add_file(Path::new(SENSOR_ROOT).join("uevent"), "");
            for idx in 0..4 {
                fake.add_file(Path::new(PORT_ROOT).join(format!("port{idx}/mode")), "auto");
            }
            fake
        }

        pub fn config() -> PlatformConfig {
            PlatformConfig::with_roots(SENSOR_ROOT, PORT_ROOT)
        }

        pub fn add_file(&self, path: impl Into<PathBuf>, content: &str) {
            self.tree.lock().files.insert(path.into(), content.to_string());
        }

        /// Add `<root>/<dir>` with address, driver_name, mode and valueK files
        pub fn add_sensor(
            &self,
            dir: &str,
            address: &str,
            driver: &str,
            mode: &str,
            values: &[i64],
        ) -> PathBuf {
            let base = Path::new(SENSOR_ROOT).join(dir);
            self.add_file(base.join("address"), &format!("{address}\n"));
            self.add_file(base.join("driver_name"), &format!("{driver}\n"));
            self.add_file(base.join("mode"), &format!("{mode}\n"));
            for (k, v) in values.iter().enumerate() {
                self.add_file(base.join(format!("value{k}")), &format!("{v}\n"));
            }
            base
        }

        pub fn content(&self, path: &Path) -> Option<String> {
            self.tree.lock().files.get(path).cloned()
        }

        pub fn remove_file(&self, path: &Path) {
            self.tree.lock().files.remove(path);
        }

        pub fn open_handles(&self) -> usize {
            self.tree.lock().open_handles
        }

        pub fn writes(&self) -> Vec<(PathBuf, String)> {
            self.tree.lock().writes.clone()
        }

        pub fn writes_to(&self, path: &Path) -> usize {
            self.tree.lock().writes.iter().filter(|(p, _)| p == path).count()
        }

        pub fn fail_writes_to(&self, path: &Path, fail: bool) {
            let mut tree = self.tree.lock();
            if fail {
                tree.failing_writes.insert(path.to_path_buf());
            } else {
                tree.failing_writes.remove(path);
            }
        }

        /// The write itself lands, but flushing it reports an error
        pub fn fail_flushes_to(&self, path: &Path, fail: bool) {
            let mut tree = self.tree.lock();
            if fail {
                tree.failing_flushes.insert(path.to_path_buf());
            } else {
                tree.failing_flushes.remove(path);
            }
        }

        pub fn flushes_to(&self, path: &Path) -> usize {
            self.tree.lock().flushes.iter().filter(|p| *p == path).count()
        }

        /// Writing `mode` to `<device>/mode` also sets these value files
        pub fn on_mode(&self, device: &Path, mode: &str, effects: &[(&str, &str)]) {
            self.tree.lock().mode_effects.insert(
                (device.to_path_buf(), mode.to_string()),
                effects.iter().map(|(f, c)| (f.to_string(), c.to_string())).collect(),
            );
        }

        pub fn set_reset_behavior(&self, device: &Path, behavior: ResetBehavior) {
            self.tree.lock().reset_target = Some((device.to_path_buf(), behavior));
        }
    }

    impl Default for FakeSysfs {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Sysfs for FakeSysfs {
        type Handle = FakeHandle;

        fn open_read(&self, path: &Path) -> io::Result<FakeHandle> {
            self.open(path, false)
        }

        fn open_read_write(&self, path: &Path) -> io::Result<FakeHandle> {
            self.open(path, true)
        }

        fn read_dir_names(&self, path: &Path) -> io::Result<Vec<String>> {
            let mut tree = self.tree.lock();
            tree.on_list();
            if !tree.has_children(path) {
                return Err(io::Error::from(io::ErrorKind::NotFound));
            }
            let mut names: Vec<String> = Vec::new();
            for file in tree.files.keys() {
                if let Ok(rest) = file.strip_prefix(path) {
                    if let Some(first) = rest.components().next() {
                        let name = first.as_os_str().to_string_lossy().into_owned();
                        if !names.contains(&name) {
                            names.push(name);
                        }
                    }
                }
            }
            Ok(names)
        }

        fn exists(&self, path: &Path) -> bool {
            let tree = self.tree.lock();
            tree.files.contains_key(path) || tree.has_children(path)
        }

        fn read_to_string(&self, path: &Path) -> io::Result<String> {
            self.tree
                .lock()
                .files
                .get(path)
                .cloned()
                .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
        }

        fn write_once(&self, path: &Path, contents: &str) -> io::Result<()> {
            self.tree.lock().record_write(path, contents)
        }
    }

    impl FakeSysfs {
        fn open(&self, path: &Path, writable: bool) -> io::Result<FakeHandle> {
            let mut tree = self.tree.lock();
            if !tree.files.contains_key(path) {
                return Err(io::Error::from(io::ErrorKind::NotFound));
            }
            tree.open_handles += 1;
            Ok(FakeHandle {
                tree: Arc::clone(&self.tree),
                path: path.to_path_buf(),
                pos: 0,
                writable,
            })
        }
    }

    /// Open attribute in a [`FakeSysfs`]. Each write replaces the whole
    /// attribute, the way a sysfs store does.
    #[derive(Debug)]
    pub struct FakeHandle {
        tree: Arc<Mutex<FakeTree>>,
        path: PathBuf,
        pos: u64,
        writable: bool,
    }

    impl Read for FakeHandle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let tree = self.tree.lock();
            let content = tree
                .files
                .get(&self.path)
                .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))?;
            let bytes = content.as_bytes();
            let start = (self.pos as usize).min(bytes.len());
            let n = buf.len().min(bytes.len() - start);
            buf[..n].copy_from_slice(&bytes[start..start + n]);
            self.pos += n as u64;
            Ok(n)
        }
    }

    impl Write for FakeHandle {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if !self.writable {
                return Err(io::Error::from(io::ErrorKind::PermissionDenied));
            }
            let contents = String::from_utf8_lossy(buf).into_owned();
            self.tree.lock().record_write(&self.path, &contents)?;
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            let mut tree = self.tree.lock();
            tree.flushes.push(self.path.clone());
            if tree.failing_flushes.contains(&self.path) {
                return Err(io::Error::new(io::ErrorKind::Other, "injected flush failure"));
            }
            Ok(())
        }
    }

    impl Seek for FakeHandle {
        fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
            let len = self
                .tree
                .lock()
                .files
                .get(&self.path)
                .map(|c| c.len() as i64)
                .unwrap_or(0);
            let target = match pos {
                SeekFrom::Start(p) => p as i64,
                SeekFrom::Current(d) => self.pos as i64 + d,
                SeekFrom::End(d) => len + d,
            };
            if target < 0 {
                return Err(io::Error::from(io::ErrorKind::InvalidInput));
            }
            self.pos = target as u64;
            Ok(self.pos)
        }
    }

    impl Drop for FakeHandle {
        fn drop(&mut self) {
            self.tree.lock().open_handles -= 1;
        }
    }
}
