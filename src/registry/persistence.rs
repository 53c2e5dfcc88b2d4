//! Persistence backends for the identity registry

use crate::error::RegistryError;
use crate::registry::{RegistryBackend, RegistryRecord};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Line-oriented registry file (`guids.lst`)
///
/// The file is opened for each append and closed again; it is never
/// rewritten. Concurrent runs against the same file are not supported.
pub struct FileRegistryBackend {
    path: PathBuf,
}

impl FileRegistryBackend {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RegistryBackend for FileRegistryBackend {
    fn load(&self) -> Result<Vec<RegistryRecord>, RegistryError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(RegistryError::Read {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };
        parse_lines(&self.path, contents.lines())
    }

    fn append(&mut self, record: &RegistryRecord) -> Result<(), RegistryError> {
        let write_err = |e| RegistryError::Write {
            path: self.path.clone(),
            source: e,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(write_err)?;
        writeln!(file, "{}", record.to_line()).map_err(write_err)?;
        file.sync_data().map_err(write_err)?;
        Ok(())
    }
}

/// In-memory registry, used by tests and dry runs
#[derive(Debug, Default, Clone)]
pub struct MemoryRegistryBackend {
    lines: Vec<String>,
}

impl MemoryRegistryBackend {
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl RegistryBackend for MemoryRegistryBackend {
    fn load(&self) -> Result<Vec<RegistryRecord>, RegistryError> {
        parse_lines(Path::new("<memory>"), self.lines.iter().map(String::as_str))
    }

    fn append(&mut self, record: &RegistryRecord) -> Result<(), RegistryError> {
        self.lines.push(record.to_line());
        Ok(())
    }
}

fn parse_lines<'a>(
    path: &Path,
    lines: impl Iterator<Item = &'a str>,
) -> Result<Vec<RegistryRecord>, RegistryError> {
    let mut records = Vec::new();
    for (index, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record = RegistryRecord::parse(line).ok_or_else(|| RegistryError::Malformed {
            path: path.to_path_buf(),
            line: index + 1,
        })?;
        records.push(record);
    }
    Ok(records)
}
