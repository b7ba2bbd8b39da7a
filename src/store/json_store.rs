use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::passage::Library;
use crate::store::schema::LibraryData;

/// Reads and writes the library as one JSON document.
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the library. A missing file is an empty library; a file that
    /// cannot be read or parsed is an error.
    pub fn load(&self, today: NaiveDate) -> Result<Library> {
        if !self.path.exists() {
            log::debug!("no library at {}; starting empty", self.path.display());
            return Ok(Library::new());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        let data: LibraryData = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        let library = data.into_library(today)?;
        log::debug!(
            "loaded {} passage(s) from {}",
            library.len(),
            self.path.display()
        );
        Ok(library)
    }

    /// Replace the file atomically: write a sibling .tmp, sync, rename over.
    pub fn save(&self, library: &Library) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let tmp_path = self.path.with_extension("json.tmp");

        let json = serde_json::to_string_pretty(&LibraryData::from_library(library))?;
        let write_tmp = || -> Result<()> {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
            Ok(())
        };
        if let Err(e) = write_tmp() {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.context(format!("writing {}", tmp_path.display())));
        }

        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("replacing {}", self.path.display()))?;
        log::debug!(
            "saved {} passage(s) to {}",
            library.len(),
            self.path.display()
        );
        Ok(())
    }
}
