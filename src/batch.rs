//! Batch pipeline: one independent normalize → validate → tables → render run
//! per definition.
use std::collections::BTreeMap;

use rayon::prelude::*;
use thiserror::Error;

use crate::codegen::{render, Artifacts, RenderError, RenderOptions};
use crate::ir::EnumDefinition;
use crate::validate::{validate, ValidationError};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// Ordered set of definitions generated together. Passed around by value;
/// there is no process-wide registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    pub definitions: Vec<EnumDefinition>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BatchMode {
    /// Stop at the first failing definition (in input order).
    #[default]
    FailFast,
    /// Generate everything that can be generated, report every failure.
    KeepGoing,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateErrorKind {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// A failure of one definition, tagged with which one. The cause is part of
/// the message, so it is not chained as a source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{name}: {kind}")]
pub struct GenerateError {
    pub name: String,
    pub kind: GenerateErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchError {
    #[error("`{first}` and `{second}` would both write {path}")]
    StemCollision { path: String, first: String, second: String },
    #[error(transparent)]
    Generate(#[from] GenerateError),
}

/// Result of a keep-going run: every success and every failure, input order.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub artifacts: Vec<Artifacts>,
    pub failures: Vec<GenerateError>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Batch {
    pub fn new(definitions: Vec<EnumDefinition>) -> Self {
        Self { definitions }
    }

    pub fn extend(&mut self, more: impl IntoIterator<Item = EnumDefinition>) {
        self.definitions.extend(more);
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Two definitions sharing an output file is a configuration error. Checked
    /// on the file names themselves, so a header of one colliding with the
    /// source of another (odd extension choices) is caught as well.
    pub fn check_stems(&self, options: &RenderOptions) -> Result<(), BatchError> {
        let mut owners = BTreeMap::<String, &str>::new();
        for def in &self.definitions {
            let stem = def.file_stem();
            let mut files = vec![options.header_file(stem), options.source_file(stem)];
            files.dedup();
            for path in files {
                if let Some(first) = owners.insert(path.clone(), def.name.as_str()) {
                    return Err(BatchError::StemCollision {
                        path,
                        first: first.to_string(),
                        second: def.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Fresh pipeline per definition, in parallel, results in input order.
    pub fn generate(&self, options: &RenderOptions, mode: BatchMode) -> Result<BatchReport, BatchError> {
        self.check_stems(options)?;

        let results: Vec<Result<Artifacts, GenerateError>> = self
            .definitions
            .par_iter()
            .map(|def| generate_one(def, options))
            .collect();

        let mut report = BatchReport::default();
        for result in results {
            match result {
                Ok(artifacts) => report.artifacts.push(artifacts),
                Err(error) => match mode {
                    BatchMode::FailFast => return Err(error.into()),
                    BatchMode::KeepGoing => {
                        tracing::warn!(%error, "definition skipped");
                        report.failures.push(error);
                    }
                },
            }
        }
        tracing::debug!(
            generated = report.artifacts.len(),
            failed = report.failures.len(),
            "batch generated"
        );
        Ok(report)
    }
}

impl FromIterator<EnumDefinition> for Batch {
    fn from_iter<T: IntoIterator<Item = EnumDefinition>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

pub fn generate_one(definition: &EnumDefinition, options: &RenderOptions) -> Result<Artifacts, GenerateError> {
    let tag = |kind: GenerateErrorKind| GenerateError { name: definition.qualified_name(), kind };
    let validated = validate(definition).map_err(|e| tag(e.into()))?;
    render(&validated, options).map_err(|e| tag(e.into()))
}
