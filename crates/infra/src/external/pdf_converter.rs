//! Out-of-process PDF-to-table conversion.
//!
//! The converter is any program that takes a PDF path as its last argument
//! and prints the extracted table as a JSON array of rows (each row an array
//! of cell values) on stdout.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::Value as JsonValue;
use thiserror::Error;
use tracing::{info, warn};

use vintrade_import::Table;

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("no PDF converter is configured")]
    NotConfigured,

    #[error("failed to run PDF converter `{program}`: {message}")]
    Spawn { program: String, message: String },

    #[error("failed to stage upload {file}: {message}")]
    Upload { file: String, message: String },

    #[error("PDF conversion of {file} failed: {diagnostics}")]
    Failed { file: String, diagnostics: String },
}

/// Converter command line: program, fixed args, then the input path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfTableConverter {
    program: String,
    args: Vec<String>,
}

impl PdfTableConverter {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Parse `"program arg1 arg2"`; `None` for a blank command line.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self::new(program, parts.collect()))
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run the converter on the staged `input`. `file_name` is the name the
    /// operator uploaded and is what logs and errors report.
    pub fn convert(&self, input: &Path, file_name: &str) -> Result<Table, ConversionError> {
        let file = file_name.to_string();

        info!(program = %self.program, file = %file, "converting PDF price list");

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(input)
            .output()
            .map_err(|e| ConversionError::Spawn {
                program: self.program.clone(),
                message: e.to_string(),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let failed = |diagnostics: String| {
            warn!(file = %file, diagnostics = %diagnostics, "PDF conversion failed");
            ConversionError::Failed {
                file: file.clone(),
                diagnostics,
            }
        };

        if !output.status.success() {
            return Err(failed(diagnostics(&output.status.to_string(), &stderr, &stdout)));
        }
        if stdout.trim().is_empty() {
            return Err(failed(diagnostics("converter printed nothing", &stderr, "")));
        }

        let rows: Vec<Vec<JsonValue>> = serde_json::from_str(stdout.trim()).map_err(|e| {
            failed(diagnostics(
                &format!("output is not a JSON array of rows: {e}"),
                &stderr,
                &stdout,
            ))
        })?;
        if rows.is_empty() {
            return Err(failed(diagnostics("converter returned no rows", &stderr, "")));
        }

        Ok(Table::from_json_rows(rows))
    }
}

fn diagnostics(summary: &str, stderr: &str, stdout: &str) -> String {
    let mut out = summary.to_string();
    for (label, text) in [("stderr", stderr.trim()), ("stdout", stdout.trim())] {
        if !text.is_empty() {
            out.push_str(&format!("\n{label}: {text}"));
        }
    }
    out
}

/// An uploaded file on disk, removed when the guard is dropped.
#[derive(Debug)]
pub struct UploadGuard {
    path: PathBuf,
}

impl UploadGuard {
    /// Write `bytes` to a fresh file in `dir`.
    pub fn write(dir: &Path, original_name: &str, bytes: &[u8]) -> std::io::Result<Self> {
        fs::create_dir_all(dir)?;
        let stem: String = original_name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
            .collect();
        let path = dir.join(format!("{}-{}", uuid::Uuid::now_v7(), stem));
        fs::write(&path, bytes)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for UploadGuard {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), error = %e, "failed to remove uploaded file");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vintrade_import::Cell;

    #[test]
    fn command_line_splits_program_and_args() {
        let c = PdfTableConverter::from_command_line("  python3 convert.py --json ").unwrap();
        assert_eq!(c.program(), "python3");
        assert_eq!(c.args, vec!["convert.py", "--json"]);
        assert!(PdfTableConverter::from_command_line("   ").is_none());
    }

    #[test]
    fn upload_guard_removes_file_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = {
            let guard = UploadGuard::write(dir.path(), "acme list.pdf", b"%PDF").unwrap();
            assert!(guard.path().exists());
            assert!(guard.path().to_string_lossy().ends_with("acmelist.pdf"));
            guard.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let c = PdfTableConverter::new("vintrade-no-such-converter", vec![]);
        let err = c.convert(Path::new("x.pdf"), "x.pdf").unwrap_err();
        assert!(matches!(err, ConversionError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn parses_json_rows_from_stdout() {
        let script = r#"printf '[["Producer","Wine","FOB"],["Acme","Red",120]]'"#;
        let c = PdfTableConverter::new("sh", vec!["-c".into(), script.into(), "sh".into()]);
        let table = c.convert(Path::new("list.pdf"), "list.pdf").unwrap();
        assert_eq!(table.headers(), vec!["Producer", "Wine", "FOB"]);
        assert_eq!(table.rows[1][2], Cell::Number(120.0));
    }

    #[cfg(unix)]
    #[test]
    fn failure_carries_stderr() {
        let c = PdfTableConverter::new(
            "sh",
            vec!["-c".into(), "echo 'no tables found' >&2; exit 3".into(), "sh".into()],
        );
        match c.convert(Path::new("broken.pdf"), "broken.pdf").unwrap_err() {
            ConversionError::Failed { file, diagnostics } => {
                assert_eq!(file, "broken.pdf");
                assert!(diagnostics.contains("no tables found"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn failure_names_the_uploaded_file_not_the_staged_one() {
        let dir = tempfile::tempdir().unwrap();
        let upload = UploadGuard::write(dir.path(), "Acme List.pdf", b"%PDF").unwrap();
        let c = PdfTableConverter::new("sh", vec!["-c".into(), "exit 1".into(), "sh".into()]);

        let err = c.convert(upload.path(), "Acme List.pdf").unwrap_err();
        assert!(matches!(&err, ConversionError::Failed { file, .. } if file == "Acme List.pdf"));
        assert!(err.to_string().starts_with("PDF conversion of Acme List.pdf failed"));
    }

    #[cfg(unix)]
    #[test]
    fn empty_output_is_a_failure() {
        let c = PdfTableConverter::new("sh", vec!["-c".into(), "true".into(), "sh".into()]);
        assert!(matches!(
            c.convert(Path::new("empty.pdf"), "empty.pdf"),
            Err(ConversionError::Failed { .. })
        ));
    }
}
