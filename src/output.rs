use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
};

use crate::errors::GenError;

/// Writes one `<table>.go` file per model into a directory.
pub struct ModelWriter {
    dir: PathBuf,
}

impl ModelWriter {
    /// Creates `dir` (and parents) if missing.
    pub fn create(dir: &Path) -> Result<Self, GenError> {
        fs::create_dir_all(dir).map_err(|e| {
            GenError::Output(format!("cannot create {}: {}", dir.display(), e))
        })?;

        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn path_for(&self, table: &str) -> PathBuf {
        self.dir.join(format!("{}.go", table))
    }

    pub fn write(&self, table: &str, source: &str) -> Result<PathBuf, GenError> {
        let path = self.path_for(table);
        fs::write(&path, source)
            .map_err(|e| GenError::Output(format!("cannot write {}: {}", path.display(), e)))?;
        Ok(path)
    }
}

/// Rewrites a generated file in place with an external tool (`gofmt -w`).
pub struct Formatter {
    program: String,
}

impl Formatter {
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
        }
    }

    pub fn format(&self, path: &Path) -> Result<(), GenError> {
        let output = Command::new(&self.program)
            .arg("-w")
            .arg(path)
            .output()
            .map_err(|e| GenError::Format(format!("cannot run {}: {}", self.program, e)))?;

        if !output.status.success() {
            return Err(GenError::Format(format!(
                "{} failed on {}: {}",
                self.program,
                path.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }
}
