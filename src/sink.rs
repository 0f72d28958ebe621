//! Writes rendered artifact pairs to disk.
//!
//! Both files of a pair are staged as temp files in the destination directory
//! and only renamed into place once both were written, so a failed run never
//! leaves a fresh header next to a stale source.
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::codegen::Artifacts;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to create output directory {}", path.display())]
    CreateDir { path: PathBuf, source: std::io::Error },
    #[error("failed to stage {}", path.display())]
    Stage { path: PathBuf, source: std::io::Error },
    #[error("failed to move {} into place", path.display())]
    Persist { path: PathBuf, source: std::io::Error },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// Same bytes were already on disk; the file was left alone.
    Unchanged,
}

struct Staged {
    dest: PathBuf,
    file: Option<NamedTempFile>,
}

fn stage(dir: &Path, relative: &str, contents: &str) -> Result<Staged, SinkError> {
    let dest = dir.join(relative);
    if std::fs::read(&dest).is_ok_and(|existing| existing == contents.as_bytes()) {
        return Ok(Staged { dest, file: None });
    }
    let stage_err = |source| SinkError::Stage { path: dest.clone(), source };
    let mut file = NamedTempFile::new_in(dir).map_err(stage_err)?;
    file.write_all(contents.as_bytes()).map_err(stage_err)?;
    file.as_file().sync_all().map_err(stage_err)?;
    Ok(Staged { dest, file: Some(file) })
}

fn persist(staged: Staged) -> Result<(PathBuf, WriteOutcome), SinkError> {
    let Staged { dest, file } = staged;
    match file {
        None => {
            tracing::debug!(path = %dest.display(), "unchanged");
            Ok((dest, WriteOutcome::Unchanged))
        }
        Some(file) => {
            file.persist(&dest)
                .map_err(|e| SinkError::Persist { path: dest.clone(), source: e.error })?;
            tracing::info!(path = %dest.display(), "wrote");
            Ok((dest, WriteOutcome::Written))
        }
    }
}

/// Write one header/source pair into `dir` (created if missing).
pub fn write_artifacts(dir: &Path, artifacts: &Artifacts) -> Result<Vec<(PathBuf, WriteOutcome)>, SinkError> {
    std::fs::create_dir_all(dir).map_err(|source| SinkError::CreateDir { path: dir.to_path_buf(), source })?;

    // stage both before touching either destination
    let header = stage(dir, &artifacts.header_path, &artifacts.header)?;
    let source = stage(dir, &artifacts.source_path, &artifacts.source)?;

    Ok(vec![persist(header)?, persist(source)?])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> Artifacts {
        Artifacts {
            name: "E".into(),
            header_path: "E.hpp".into(),
            header: "// header\n".into(),
            source_path: "E.cpp".into(),
            source: "// source\n".into(),
        }
    }

    #[test]
    fn writes_both_files_then_skips_identical() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/out");

        let first = write_artifacts(&out, &pair()).unwrap();
        assert!(first.iter().all(|(_, o)| *o == WriteOutcome::Written));
        assert_eq!(std::fs::read_to_string(out.join("E.hpp")).unwrap(), "// header\n");
        assert_eq!(std::fs::read_to_string(out.join("E.cpp")).unwrap(), "// source\n");

        let second = write_artifacts(&out, &pair()).unwrap();
        assert!(second.iter().all(|(_, o)| *o == WriteOutcome::Unchanged));
    }

    #[test]
    fn no_temp_files_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(dir.path(), &pair()).unwrap();
        let mut names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        assert_eq!(names, vec!["E.cpp", "E.hpp"]);
    }
}
