//! JSON definition files → `EnumDefinition`s.
//!
//! ```json
//! { "enums": [
//!     { "name": "Color", "namespace": "gfx::palette", "values": ["RED", "GREEN", "BLUE"] },
//!     { "name": "Level", "storage": "std::uint8_t", "values": { "LOW": 1, "HIGH": 10 } }
//! ] }
//! ```
//!
//! Plain data only; nothing in a definition file is ever executed.
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::batch::Batch;
use crate::ir::EnumDefinition;
use crate::path_de::{from_slice_with_path, PathError};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefinitionFile {
    #[serde(default)]
    pub enums: Vec<EnumDefinition>,
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {}", path.display())]
    Read { path: PathBuf, source: std::io::Error },
    #[error("failed to parse {}", path.display())]
    Parse { path: PathBuf, source: PathError },
}

pub fn parse_definitions(bytes: &[u8]) -> Result<Vec<EnumDefinition>, PathError> {
    let file: DefinitionFile = from_slice_with_path(bytes)?;
    Ok(file.enums)
}

pub fn load_file(path: &Path) -> Result<Vec<EnumDefinition>, SourceError> {
    let bytes = std::fs::read(path).map_err(|source| SourceError::Read { path: path.to_path_buf(), source })?;
    let enums = parse_definitions(&bytes).map_err(|source| SourceError::Parse { path: path.to_path_buf(), source })?;
    tracing::debug!(path = %path.display(), count = enums.len(), "loaded definition file");
    Ok(enums)
}

/// Every file contributes its definitions, in argument order, to one batch.
pub fn load_batch<I, P>(paths: I) -> Result<Batch, SourceError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut batch = Batch::default();
    for path in paths {
        batch.extend(load_file(path.as_ref())?);
    }
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{RawValue, RawValues};

    #[test]
    fn parses_both_value_forms() {
        let enums = parse_definitions(br#"{ "enums": [
            { "name": "Color", "namespace": "gfx::palette", "file": "color", "values": ["RED", "GREEN"] },
            { "name": "Grade", "values": { "A": "a", "B": "b" }, "interface_includes": ["<vector>"] }
        ] }"#).unwrap();
        assert_eq!(enums.len(), 2);
        assert_eq!(enums[0].file_stem(), "color");
        assert_eq!(enums[0].values, Some(RawValues::Names(vec!["RED".into(), "GREEN".into()])));
        assert_eq!(
            enums[1].values,
            Some(RawValues::Mapping(vec![
                ("A".into(), RawValue::Text("a".into())),
                ("B".into(), RawValue::Text("b".into())),
            ]))
        );
        assert_eq!(enums[1].interface_includes, vec!["<vector>"]);
    }

    #[test]
    fn bad_value_type_reports_path() {
        let err = parse_definitions(br#"{ "enums": [ { "name": "E", "values": { "A": 1.5 } } ] }"#).unwrap_err();
        assert!(err.path.starts_with("enums[0].values"), "path was {}", err.path);
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = load_file(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, SourceError::Read { .. }));
        // the io error is the source, not part of the message
        let message = format!("{:#}", anyhow::Error::from(err));
        assert_eq!(message.matches("No such file").count(), 1, "{message}");
        assert!(message.starts_with("failed to read /definitely/not/here.json: "), "{message}");
    }
}
