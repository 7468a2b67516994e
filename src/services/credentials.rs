// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Credential persistence on the local filesystem.

use crate::error::{AppError, Result};
use crate::models::Credential;
use std::fs;
use std::path::{Path, PathBuf};

/// Create `path` (and its parents) if missing. Creating twice is a no-op.
pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    if !path.is_dir() {
        fs::create_dir_all(path)?;
        tracing::info!(path = %path.display(), "Created folder");
    }
    Ok(())
}

/// Write `contents` to a sibling temp file, then rename it over `target`.
///
/// A concurrent reader sees either the old file or the complete new one.
pub fn write_atomic<P: AsRef<Path>>(target: P, contents: &[u8]) -> Result<()> {
    let target = target.as_ref();
    let file_name = target
        .file_name()
        .ok_or_else(|| AppError::BadRequest(format!("Not a file path: {}", target.display())))?;

    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    let tmp = target.with_file_name(tmp_name);

    fs::write(&tmp, contents)?;
    if let Err(e) = fs::rename(&tmp, target) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}

/// Credential file at `<dir>/<file_name>`.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    dir: PathBuf,
    file_name: String,
}

impl CredentialStore {
    pub fn new(dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            file_name: file_name.into(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }

    pub fn exists(&self) -> bool {
        self.path().is_file()
    }

    /// Read the stored credential. Never touches the network.
    pub fn load(&self) -> Result<Credential> {
        let path = self.path();
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AppError::NotFound(format!(
                    "Credential file {}",
                    path.display()
                )))
            }
            Err(e) => return Err(e.into()),
        };

        Credential::from_json(&json).map_err(|e| {
            AppError::Parse(format!("credential file {}: {}", path.display(), e))
        })
    }

    /// Persist `credential`, replacing any previous file in one step.
    pub fn save(&self, credential: &Credential) -> Result<()> {
        ensure_dir(&self.dir)?;
        let path = self.path();
        write_atomic(&path, credential.to_json()?.as_bytes())?;
        tracing::info!(path = %path.display(), "Strava credentials saved");
        Ok(())
    }
}
