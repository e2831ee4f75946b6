//! Log file rotation and cleanup
//!
//! Provides a file writer that rotates on:
//! - File size limits
//! - Fixed intervals
//! - A daily wall-clock time
//!
//! Rotated files are renamed with timestamps for archival, optionally
//! gzipped, then pruned by count or age.

use chrono::{DateTime, Duration, Local, NaiveTime, TimeZone};
use flate2::write::GzEncoder;
use regex::Regex;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::config::{Compression, Retention, Rotation, TIME_TOKEN};

/// Archives a log file and prunes older archives.
///
/// Never emits tracing events: it runs inside the sink's writer, so any
/// record it produced would be routed straight back into that writer.
#[derive(Debug, Clone, Default)]
pub struct LogRotator {
    retention: Option<Retention>,
    compression: Option<Compression>,
    family: Option<Regex>,
}

impl LogRotator {
    pub const fn new(retention: Option<Retention>, compression: Option<Compression>) -> Self {
        Self {
            retention,
            compression,
            family: None,
        }
    }

    /// Also treat files matching `template` as archives of the live file.
    ///
    /// A `{time}` in the file name stands for any stamp, so logs opened by
    /// earlier runs (and their rotated copies) count toward retention.
    pub fn with_path_template(mut self, template: &str) -> Self {
        self.family = family_pattern(template);
        self
    }

    /// `<dir>/<name>.<YYYYmmdd_HHMMSS>`, suffixed `.N` if already taken.
    pub fn rotated_path(log_path: &Path, now: DateTime<Local>) -> PathBuf {
        let base = format!("{}.{}", log_path.display(), now.format("%Y%m%d_%H%M%S"));
        let mut candidate = PathBuf::from(&base);
        let mut n = 1;
        while candidate.exists() || with_gz(&candidate).exists() {
            candidate = PathBuf::from(format!("{base}.{n}"));
            n += 1;
        }
        candidate
    }

    /// Move `log_path` aside, compress it if configured, then apply retention.
    ///
    /// Returns the final archive path.
    pub fn rotate(&self, log_path: &Path, now: DateTime<Local>) -> io::Result<PathBuf> {
        let rotated = Self::rotated_path(log_path, now);
        fs::rename(log_path, &rotated)?;

        let archived = match self.compression {
            Some(Compression::Gzip) => gzip(&rotated)?,
            None => rotated,
        };

        self.cleanup_old_logs(log_path, now)?;
        Ok(archived)
    }

    /// Delete archives of `log_path` beyond the retention policy.
    ///
    /// Returns the number of files deleted.
    pub fn cleanup_old_logs(&self, log_path: &Path, now: DateTime<Local>) -> io::Result<usize> {
        let Some(retention) = self.retention else {
            return Ok(0);
        };

        let mut archives = archives_of(log_path, self.family.as_ref())?;
        // Newest first.
        archives.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| b.0.cmp(&a.0)));

        let expired: Vec<_> = match retention {
            Retention::Count(keep) => archives.into_iter().skip(keep).collect(),
            Retention::Age(max_age) => {
                let cutoff = now - max_age;
                archives
                    .into_iter()
                    .filter(|(_, modified)| *modified < cutoff)
                    .collect()
            }
        };

        let mut deleted = 0;
        for (path, _) in expired {
            fs::remove_file(&path)?;
            deleted += 1;
        }
        Ok(deleted)
    }
}

fn with_gz(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(Compression::Gzip.extension());
    PathBuf::from(name)
}

fn gzip(path: &Path) -> io::Result<PathBuf> {
    let target = with_gz(path);
    let mut input = File::open(path)?;
    let mut encoder = GzEncoder::new(File::create(&target)?, flate2::Compression::default());
    io::copy(&mut input, &mut encoder)?;
    encoder.finish()?.sync_all()?;
    fs::remove_file(path)?;
    Ok(target)
}

fn family_pattern(template: &str) -> Option<Regex> {
    let file_name = Path::new(template).file_name()?.to_str()?;
    let (before, after) = file_name.split_once(TIME_TOKEN)?;
    let after = after.replace(TIME_TOKEN, "");
    Regex::new(&format!(
        r"^{}.+{}(\..+)?$",
        regex::escape(before),
        regex::escape(&after)
    ))
    .ok()
}

/// Sibling files named `<log file name>.<anything>`, plus any matching
/// `family`, with their mtimes. The live file itself is never included.
fn archives_of(
    log_path: &Path,
    family: Option<&Regex>,
) -> io::Result<Vec<(PathBuf, DateTime<Local>)>> {
    let Some(file_name) = log_path.file_name().and_then(|n| n.to_str()) else {
        return Ok(Vec::new());
    };
    let prefix = format!("{file_name}.");
    let dir = match log_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut archives = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        let in_family = family.is_some_and(|re| re.is_match(name));
        if name == file_name || !(name.starts_with(&prefix) || in_family) {
            continue;
        }
        let modified: DateTime<Local> = entry.metadata()?.modified()?.into();
        archives.push((entry.path(), modified));
    }
    Ok(archives)
}

/// Next local instant strictly after `now` at wall-clock `at`.
fn next_daily(now: DateTime<Local>, at: NaiveTime) -> DateTime<Local> {
    let mut day = now.date_naive();
    loop {
        if let Some(candidate) = Local.from_local_datetime(&day.and_time(at)).earliest() {
            if candidate > now {
                return candidate;
            }
        }
        match day.succ_opt() {
            Some(next) => day = next,
            None => return now + Duration::days(1),
        }
    }
}

/// Append-only file writer that rotates according to a [`Rotation`].
///
/// One instance owns the file; wrap it in a non-blocking writer so all
/// threads funnel through a single appender.
#[derive(Debug)]
pub struct RotatingFileWriter {
    path: PathBuf,
    file: File,
    written: u64,
    rotation: Option<Rotation>,
    next_rotation: Option<DateTime<Local>>,
    rotator: LogRotator,
}

impl RotatingFileWriter {
    /// Open (creating parent directories) in append mode.
    pub fn open(
        path: impl Into<PathBuf>,
        rotation: Option<Rotation>,
        rotator: LogRotator,
    ) -> io::Result<Self> {
        let path = path.into();
        let file = open_append(&path)?;
        let written = file.metadata()?.len();
        let next_rotation = Self::schedule(rotation, Local::now());

        Ok(Self {
            path,
            file,
            written,
            rotation,
            next_rotation,
            rotator,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn schedule(rotation: Option<Rotation>, from: DateTime<Local>) -> Option<DateTime<Local>> {
        match rotation? {
            Rotation::Size(_) => None,
            Rotation::Every(interval) => Some(from + interval),
            Rotation::DailyAt(at) => Some(next_daily(from, at)),
        }
    }

    fn should_rotate(&self, incoming: usize, now: DateTime<Local>) -> bool {
        match self.rotation {
            Some(Rotation::Size(max)) => {
                self.written > 0 && self.written.saturating_add(incoming as u64) > max
            }
            Some(_) => self.next_rotation.is_some_and(|at| now >= at),
            None => false,
        }
    }

    /// Rotate immediately, regardless of policy.
    pub fn roll(&mut self, now: DateTime<Local>) -> io::Result<PathBuf> {
        self.file.flush()?;
        let archived = self.rotator.rotate(&self.path, now)?;
        self.file = open_append(&self.path)?;
        self.written = 0;
        self.next_rotation = Self::schedule(self.rotation, now);
        Ok(archived)
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    OpenOptions::new().create(true).append(true).open(path)
}

impl Write for RotatingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let now = Local::now();
        if self.should_rotate(buf.len(), now) {
            if let Err(e) = self.roll(now) {
                // Keep appending to the current file rather than losing records.
                eprintln!("log rotation failed for {}: {e}", self.path.display());
                self.next_rotation = Self::schedule(self.rotation, now);
            }
        }
        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}
