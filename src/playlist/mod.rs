use anyhow::Context;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only playlist file: one track path per line.
#[derive(Debug, Clone)]
pub struct PlaylistStore {
    path: PathBuf,
}

impl PlaylistStore {
    /// Open the playlist file, creating it (and its directory) if absent.
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("create dir {}", parent.display()))?;
        }

        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("open {}", path.display()))?;

        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, track: &Path) -> anyhow::Result<()> {
        self.append_many(std::slice::from_ref(&track))
    }

    pub fn append_many<P: AsRef<Path>>(&self, tracks: &[P]) -> anyhow::Result<()> {
        if tracks.is_empty() {
            return Ok(());
        }

        let mut buf = String::new();
        for t in tracks {
            buf.push_str(&t.as_ref().to_string_lossy());
            buf.push('\n');
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("open {}", self.path.display()))?;
        file.write_all(buf.as_bytes())
            .with_context(|| format!("append to {}", self.path.display()))?;
        Ok(())
    }

    /// All stored paths in file order, skipping blank lines.
    pub fn load_all(&self) -> anyhow::Result<Vec<String>> {
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("read {}", self.path.display()))?;
        Ok(raw
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }
}
