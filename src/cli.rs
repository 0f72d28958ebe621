//! CLI: definition files → (generate | check | print)
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use colored::Colorize;

use crate::batch::{Batch, BatchMode, BatchReport};
use crate::codegen::RenderOptions;
use crate::definitions::load_batch;
use crate::sink::{write_artifacts, WriteOutcome};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate C++ enumeration types (header + source) from JSON definition files
#[derive(Parser, Debug)]
#[command(name = "enumgen", version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,

    /// more log output (-v info, -vv debug); ENUMGEN_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// validate, render and write every definition
    Generate(GenerateOut),
    /// validate and render in memory, write nothing
    Check(CheckOut),
    /// render and print to stdout (header, then source)
    Print(PrintOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// One or more definition files. May be literal paths or quoted glob patterns
    #[arg(num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(Args, Debug, Clone)]
struct RenderSettings {
    /// header file extension
    #[arg(long, default_value = "hpp")]
    header_ext: String,

    /// source file extension
    #[arg(long, default_value = "cpp")]
    source_ext: String,
}

#[derive(clap::Parser, Debug)]
struct GenerateOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    render_settings: RenderSettings,

    /// output directory (current directory if omitted)
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// keep generating the other definitions when one fails
    #[arg(long, default_value_t = false)]
    keep_going: bool,
}

#[derive(clap::Parser, Debug)]
struct CheckOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    render_settings: RenderSettings,
}

#[derive(clap::Parser, Debug)]
struct PrintOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    render_settings: RenderSettings,

    /// only print the definition with this (possibly qualified) name
    #[arg(long)]
    name: Option<String>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_batch(&self) -> Result<Batch> {
        let source_paths = resolve_file_path_patterns(&self.input)
            .context("failed to resolve input file paths")?;
        let batch = load_batch(&source_paths)?;
        tracing::info!(files = source_paths.len(), definitions = batch.len(), "loaded definitions");
        Ok(batch)
    }
}

impl RenderSettings {
    fn options(&self) -> RenderOptions {
        RenderOptions {
            header_extension: self.header_ext.trim_start_matches('.').to_string(),
            source_extension: self.source_ext.trim_start_matches('.').to_string(),
        }
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn verbosity(&self) -> u8 {
        self.verbose
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Generate(target) => {
                let batch = target.input_settings.load_batch()?;
                let options = target.render_settings.options();
                let mode = if target.keep_going { BatchMode::KeepGoing } else { BatchMode::FailFast };

                let report = batch.generate(&options, mode)?;
                let mut written = 0usize;
                for artifacts in &report.artifacts {
                    let outcomes = write_artifacts(&target.out_dir, artifacts)
                        .with_context(|| format!("failed to write {}", artifacts.name))?;
                    written += outcomes.iter().filter(|(_, o)| *o == WriteOutcome::Written).count();
                }
                tracing::info!(files = written, out_dir = %target.out_dir.display(), "generation done");
                finish(&report)
            }
            Command::Check(target) => {
                let batch = target.input_settings.load_batch()?;
                let report = batch.generate(&target.render_settings.options(), BatchMode::KeepGoing)?;
                for artifacts in &report.artifacts {
                    println!("{} {}", "ok".green(), artifacts.name);
                }
                finish(&report)
            }
            Command::Print(target) => {
                let mut batch = target.input_settings.load_batch()?;
                if let Some(name) = target.name.as_deref() {
                    batch.definitions.retain(|d| d.name == name || d.qualified_name() == name);
                    if batch.is_empty() {
                        bail!("no definition named `{name}`");
                    }
                }
                let report = batch.generate(&target.render_settings.options(), BatchMode::FailFast)?;
                for artifacts in &report.artifacts {
                    println!("// ---- {} ----", artifacts.header_path);
                    print!("{}", artifacts.header);
                    println!("// ---- {} ----", artifacts.source_path);
                    print!("{}", artifacts.source);
                }
                Ok(())
            }
        }
    }
}

/// Report keep-going failures on stderr; any failure makes the run fail.
fn finish(report: &BatchReport) -> Result<()> {
    for failure in &report.failures {
        eprintln!("{} {failure}", "error:".red().bold());
    }
    if report.is_success() {
        Ok(())
    } else {
        bail!("{} definition(s) failed", report.failures.len())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            // Treat as a glob pattern; sorted so batch order does not depend on the file system
            let mut matched = Vec::new();
            for entry in glob::glob(pattern)? {
                matched.push(entry?);
            }
            if matched.is_empty() {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                bail!("glob pattern matched no files: {pattern}");
            }
            matched.sort();
            out.extend(matched);
        } else {
            // Treat as a literal path
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_generate_flags() {
        let cli = CommandLineInterface::try_parse_from([
            "enumgen", "generate", "-vv", "--out-dir", "gen", "--keep-going", "--header-ext", ".h", "a.json", "b.json",
        ]).unwrap();
        assert_eq!(cli.verbosity(), 2);
        let Command::Generate(target) = &cli.cmd else { panic!("expected generate") };
        assert_eq!(target.input_settings.input, vec!["a.json", "b.json"]);
        assert_eq!(target.out_dir, PathBuf::from("gen"));
        assert!(target.keep_going);
        assert_eq!(target.render_settings.options().header_extension, "h");
        assert_eq!(target.render_settings.options().source_extension, "cpp");
    }

    #[test]
    fn inputs_are_required() {
        assert!(CommandLineInterface::try_parse_from(["enumgen", "check"]).is_err());
    }

    #[test]
    fn glob_patterns_resolve_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.json", "a.json", "c.txt"] {
            std::fs::write(dir.path().join(name), "{}").unwrap();
        }
        let pattern = format!("{}/*.json", dir.path().display());
        let paths = resolve_file_path_patterns([pattern]).unwrap();
        let names: Vec<_> = paths.iter().map(|p| p.file_name().unwrap().to_string_lossy().to_string()).collect();
        assert_eq!(names, vec!["a.json", "b.json"]);
    }

    #[test]
    fn empty_glob_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = format!("{}/*.json", dir.path().display());
        assert!(resolve_file_path_patterns([pattern]).is_err());
    }
}
