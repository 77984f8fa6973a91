//! Archiving log file writer.
//!
//! The active file is `<directory>/<prefix><date><suffix>`, where the date
//! part is present only with [`RotationFlags::DATE`] and is resolved once
//! when the writer opens. With [`RotationFlags::SIZE`] the writer counts the
//! bytes it appends; once the count reaches `max_size` the file is renamed to
//! `<prefix><date>.<n><suffix>`, `n` being the smallest positive index not
//! already taken, and a fresh file is opened at the original path.
//!
//! ```rust,no_run
//! use ses_archiver::logging::{ArchiveWriter, ArchiverConfig, LogEvent, Priority, RotationFlags};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ArchiverConfig::builder("/var/log/app")
//!     .prefix("app-")
//!     .flags(RotationFlags::DATE | RotationFlags::SIZE)
//!     .max_size(1024 * 1024)
//!     .build()?;
//!
//! let mut writer = ArchiveWriter::open(config)?;
//! writer.write_event(&LogEvent::new(Priority::Info, "started"))?;
//! # Ok(())
//! # }
//! ```

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::ops::BitOr;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{LogError, LogEvent, LogSink};

/// Default file suffix.
pub const DEFAULT_SUFFIX: &str = ".log";

/// Default `strftime` mask for the date part of the file name.
pub const DEFAULT_DATE_MASK: &str = "%Y-%m-%d";

/// Default rotation threshold: 10 MiB.
pub const DEFAULT_MAX_SIZE: u64 = 10 * 1024 * 1024;

/// Highest archive index probed before falling back to a timestamp suffix.
pub const DEFAULT_MAX_ARCHIVE_INDEX: u32 = 10_000;

/// Which parts of the naming and rotation scheme are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RotationFlags(u8);

impl RotationFlags {
    /// Append the formatted date to the file name.
    pub const DATE: RotationFlags = RotationFlags(0x1);
    /// Rotate when the file reaches the size limit.
    pub const SIZE: RotationFlags = RotationFlags(0x2);

    /// No flag set.
    pub const fn empty() -> Self {
        RotationFlags(0)
    }

    /// True when every flag in `other` is set.
    pub const fn contains(self, other: RotationFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Raw bit value.
    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl Default for RotationFlags {
    fn default() -> Self {
        RotationFlags::DATE
    }
}

impl BitOr for RotationFlags {
    type Output = RotationFlags;

    fn bitor(self, rhs: RotationFlags) -> RotationFlags {
        RotationFlags(self.0 | rhs.0)
    }
}

/// Options of an [`ArchiveWriter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiverConfig {
    /// Directory holding the log files. Must exist.
    pub directory: PathBuf,
    /// File name prefix.
    pub prefix: String,
    /// File name suffix.
    pub suffix: String,
    /// Naming and rotation flags.
    pub flags: RotationFlags,
    /// `strftime` mask for the date part.
    pub date_mask: String,
    /// Rotation threshold in bytes.
    pub max_size: u64,
    /// Highest archive index to probe.
    pub max_archive_index: u32,
}

impl ArchiverConfig {
    /// Create a configuration with default options.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            prefix: String::new(),
            suffix: DEFAULT_SUFFIX.to_string(),
            flags: RotationFlags::default(),
            date_mask: DEFAULT_DATE_MASK.to_string(),
            max_size: DEFAULT_MAX_SIZE,
            max_archive_index: DEFAULT_MAX_ARCHIVE_INDEX,
        }
    }

    /// Create a configuration builder.
    pub fn builder(directory: impl Into<PathBuf>) -> ArchiverConfigBuilder {
        ArchiverConfigBuilder {
            config: Self::new(directory),
        }
    }

    /// File name without suffix: prefix plus the date when enabled.
    pub fn base_name(&self, now: &DateTime<Local>) -> Result<String, LogError> {
        let mut name = self.prefix.clone();
        if self.flags.contains(RotationFlags::DATE) {
            let items = parse_date_mask(&self.date_mask)?;
            name.push_str(&now.format_with_items(items.iter()).to_string());
        }
        Ok(name)
    }

    /// Check the options that can be checked without touching the clock.
    pub fn validate(&self) -> Result<(), LogError> {
        if !self.directory.is_dir() {
            return Err(LogError::MissingDirectory {
                path: self.directory.clone(),
            });
        }
        if self.flags.contains(RotationFlags::SIZE)
            && !self.flags.contains(RotationFlags::DATE)
            && self.prefix.is_empty()
        {
            return Err(LogError::MissingPrefix);
        }
        if self.flags.contains(RotationFlags::DATE) {
            parse_date_mask(&self.date_mask)?;
        }
        Ok(())
    }
}

/// Parse a `strftime` mask, rejecting unknown specifiers.
fn parse_date_mask(mask: &str) -> Result<Vec<Item<'_>>, LogError> {
    let items: Vec<Item<'_>> = StrftimeItems::new(mask).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(LogError::InvalidDateMask {
            mask: mask.to_string(),
        });
    }
    Ok(items)
}

/// Builder for [`ArchiverConfig`].
#[derive(Debug, Clone)]
pub struct ArchiverConfigBuilder {
    config: ArchiverConfig,
}

impl ArchiverConfigBuilder {
    /// Set the file name prefix.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.prefix = prefix.into();
        self
    }

    /// Set the file name suffix.
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.suffix = suffix.into();
        self
    }

    /// Set the naming and rotation flags.
    pub fn flags(mut self, flags: RotationFlags) -> Self {
        self.config.flags = flags;
        self
    }

    /// Set the `strftime` mask of the date part.
    pub fn date_mask(mut self, mask: impl Into<String>) -> Self {
        self.config.date_mask = mask.into();
        self
    }

    /// Set the rotation threshold in bytes.
    pub fn max_size(mut self, bytes: u64) -> Self {
        self.config.max_size = bytes;
        self
    }

    /// Set the highest archive index to probe.
    pub fn max_archive_index(mut self, index: u32) -> Self {
        self.config.max_archive_index = index;
        self
    }

    /// Validate and build the configuration.
    pub fn build(self) -> Result<ArchiverConfig, LogError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Append-only log file writer with size-based archiving.
///
/// Single writer per file: rotation is not coordinated across processes.
#[derive(Debug)]
pub struct ArchiveWriter {
    config: ArchiverConfig,
    base_name: String,
    path: PathBuf,
    file: Option<File>,
    current_size: u64,
    deferred: Option<LogError>,
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

impl ArchiveWriter {
    /// Open the writer, resolving the date part from the local clock.
    pub fn open(config: ArchiverConfig) -> Result<Self, LogError> {
        Self::open_at(config, Local::now())
    }

    /// Open the writer with the date part resolved from `now`.
    ///
    /// # Errors
    ///
    /// - `MissingDirectory` if the directory does not exist
    /// - `MissingPrefix` if size rotation is on and the base name is empty
    /// - `InvalidDateMask` if the date mask has an unknown specifier
    /// - `Io` if an oversized existing file cannot be archived or the file
    ///   cannot be opened
    pub fn open_at(config: ArchiverConfig, now: DateTime<Local>) -> Result<Self, LogError> {
        if !config.directory.is_dir() {
            return Err(LogError::MissingDirectory {
                path: config.directory.clone(),
            });
        }

        let base_name = config.base_name(&now)?;
        let rotating = config.flags.contains(RotationFlags::SIZE);
        if rotating && base_name.is_empty() {
            return Err(LogError::MissingPrefix);
        }

        let path = config
            .directory
            .join(format!("{}{}", base_name, config.suffix));
        let current_size = match fs::metadata(&path) {
            Ok(metadata) => metadata.len(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => 0,
            Err(e) => return Err(LogError::io(&path, e)),
        };

        let mut writer = Self {
            config,
            base_name,
            path,
            file: None,
            current_size,
            deferred: None,
        };

        if rotating {
            writer.check_size()?;
        }

        let file = open_append(&writer.path).map_err(|e| LogError::io(&writer.path, e))?;
        writer.file = Some(file);

        debug!(path = %writer.path.display(), size = writer.current_size, "Log file opened");
        Ok(writer)
    }

    /// The active log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes counted towards the rotation threshold.
    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    /// The writer options.
    pub fn config(&self) -> &ArchiverConfig {
        &self.config
    }

    /// Append `bytes`, then rotate if the threshold was reached.
    ///
    /// Returns the archive path when the write triggered a rotation.
    pub fn append_bytes(&mut self, bytes: &[u8]) -> Result<Option<PathBuf>, LogError> {
        self.persist(bytes)?;
        self.check_size()
    }

    fn persist(&mut self, bytes: &[u8]) -> Result<(), LogError> {
        if self.file.is_none() {
            let file = open_append(&self.path).map_err(|e| LogError::io(&self.path, e))?;
            self.file = Some(file);
        }
        if let Some(file) = self.file.as_mut() {
            file.write_all(bytes)
                .map_err(|e| LogError::io(&self.path, e))?;
        }

        self.current_size += bytes.len() as u64;
        Ok(())
    }

    /// Rotate when size rotation is on, the file exists and the counted
    /// size has reached the threshold.
    fn check_size(&mut self) -> Result<Option<PathBuf>, LogError> {
        if !self.config.flags.contains(RotationFlags::SIZE)
            || self.current_size < self.config.max_size
            || !self.path.exists()
        {
            return Ok(None);
        }
        self.rotate().map(Some)
    }

    /// Archive the active file now and start a fresh one.
    ///
    /// Returns the archive path. Nothing is logged here, since the writer
    /// may itself be the output of the active `tracing` subscriber.
    ///
    /// # Errors
    ///
    /// `Io` if the rename fails, `Reopen` if the fresh file cannot be opened.
    pub fn rotate(&mut self) -> Result<PathBuf, LogError> {
        let reopen = self.file.take().is_some();
        let archive = self.next_archive_path();

        fs::rename(&self.path, &archive).map_err(|e| LogError::io(&self.path, e))?;
        self.current_size = 0;

        if reopen {
            let file = open_append(&self.path).map_err(|source| LogError::Reopen {
                path: self.path.clone(),
                source,
            })?;
            self.file = Some(file);
        }

        Ok(archive)
    }

    /// Path the active file would be archived to.
    ///
    /// Probes `.1`, `.2`, ... up to `max_archive_index`; past that a
    /// timestamp suffix is used, with nanoseconds appended if it is taken.
    pub fn next_archive_path(&self) -> PathBuf {
        let candidate = |tag: &str| {
            self.config
                .directory
                .join(format!("{}.{}{}", self.base_name, tag, self.config.suffix))
        };

        for index in 1..=self.config.max_archive_index {
            let path = candidate(&index.to_string());
            if !path.exists() {
                return path;
            }
        }

        let now = Local::now();
        let stamp = now.format("%Y%m%d%H%M%S").to_string();
        let path = candidate(&stamp);
        if !path.exists() {
            return path;
        }
        candidate(&format!("{}.{:09}", stamp, now.timestamp_subsec_nanos()))
    }
}

impl LogSink for ArchiveWriter {
    fn append(&mut self, bytes: &[u8]) -> Result<(), LogError> {
        self.append_bytes(bytes).map(|_| ())
    }
}

// Once `buf` is on disk the write reports success. A rotation failure after
// that is returned by the next `write` or `flush`, so `write_all` never
// repeats a line.
impl Write for ArchiveWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(err) = self.deferred.take() {
            return Err(err.into());
        }
        self.persist(buf)?;
        if let Err(err) = self.check_size() {
            self.deferred = Some(err);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(err) = self.deferred.take() {
            return Err(err.into());
        }
        match self.file {
            Some(ref mut file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl ArchiveWriter {
    /// Append a formatted event.
    pub fn write_event(&mut self, event: &LogEvent) -> Result<(), LogError> {
        LogSink::write_event(self, event)
    }
}
