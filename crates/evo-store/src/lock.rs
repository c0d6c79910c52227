use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use anyhow::Context;
use fs2::FileExt;

/// Opens `path` (creating it if absent) and takes an advisory exclusive
/// lock for the duration the returned guard is held, so concurrent
/// writers/readers of the same generation or stats file serialize on the
/// OS lock rather than corrupting each other's writes. Grounded on the
/// `fs2`-based advisory locking convention in `other_examples`'
/// `danielmriley-aigent` manifest.
pub struct LockedFile {
    file: File,
}

impl LockedFile {
    pub fn open_exclusive(path: &Path) -> anyhow::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(path)
            .with_context(|| format!("opening {}", path.display()))?;
        file.lock_exclusive()
            .with_context(|| format!("locking {}", path.display()))?;
        Ok(Self { file })
    }

    pub fn read_to_string(&mut self) -> anyhow::Result<String> {
        self.file.seek(SeekFrom::Start(0))?;
        let mut contents = String::new();
        self.file.read_to_string(&mut contents)?;
        Ok(contents)
    }

    /// Overwrites the file's full contents with `data`.
    pub fn write_all_truncated(&mut self, data: &[u8]) -> anyhow::Result<()> {
        self.file.seek(SeekFrom::Start(0))?;
        self.file.set_len(0)?;
        self.file.write_all(data)?;
        self.file.sync_all()?;
        Ok(())
    }

    /// Positions the cursor at end-of-file, for append-only writes.
    pub fn seek_to_end(&mut self) -> anyhow::Result<()> {
        self.file.seek(SeekFrom::End(0))?;
        Ok(())
    }
}

impl std::io::Write for LockedFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.file.flush()
    }
}

impl Drop for LockedFile {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}
