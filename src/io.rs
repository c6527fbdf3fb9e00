use crate::error::Result;
use log::{debug, warn};
use memmap::Mmap;
use std::fs::{self, File};
use std::io::Write;
use std::ops::Deref;
use std::path::Path;
use tempfile::NamedTempFile;

/// A read-only view of a whole input file.
pub enum InputBuffer {
    Mapped(Mmap),
    /// `mmap` refuses zero-length files
    Empty,
}

impl InputBuffer {
    pub fn from_file(file: File) -> Result<Self> {
        if file.metadata()?.len() == 0 {
            return Ok(InputBuffer::Empty);
        }

        let mmap = unsafe { Mmap::map(&file)? };
        Ok(InputBuffer::Mapped(mmap))
    }

    pub fn from_file_path<P: AsRef<Path>>(file_path: P) -> Result<Self> {
        let file = File::open(file_path.as_ref())?;
        debug!("mapping {}", file_path.as_ref().display());
        InputBuffer::from_file(file)
    }
}

impl Deref for InputBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            InputBuffer::Mapped(mmap) => &mmap[..],
            InputBuffer::Empty => &[],
        }
    }
}

/// Writes `bytes` to `path` through a sibling temporary file, so a failure
/// never leaves a partial file behind.
pub fn write_atomic<P: AsRef<Path>>(path: P, bytes: &[u8]) -> Result<()> {
    write_all_atomic(&[(path.as_ref(), bytes)])
}

/// Writes every output or none of them.
///
/// All temporary files are written before any is renamed into place. If a
/// rename fails, outputs already renamed by this call are removed again.
pub fn write_all_atomic(outputs: &[(&Path, &[u8])]) -> Result<()> {
    let mut staged = Vec::with_capacity(outputs.len());
    for &(path, bytes) in outputs {
        staged.push((path, stage(path, bytes)?));
    }

    let mut persisted: Vec<&Path> = Vec::with_capacity(staged.len());
    for (path, file) in staged {
        if let Err(e) = file.persist(path) {
            for done in persisted {
                if let Err(remove) = fs::remove_file(done) {
                    warn!("failed to remove {}: {}", done.display(), remove);
                }
            }
            return Err(e.error.into());
        }

        persisted.push(path);
    }

    for (path, bytes) in outputs {
        debug!("wrote {} bytes to {}", bytes.len(), path.display());
    }
    Ok(())
}

fn stage(path: &Path, bytes: &[u8]) -> Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    Ok(file)
}
