//! Application error type.
//!
//! Every failure surfaces to the caller with the step that failed and the
//! offending path. The binary maps each variant to a distinct exit code.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

#[derive(Clone, PartialEq)]
pub enum AppError {
    /// Invalid or inconsistent run configuration.
    Config { message: String },
    /// A required directory of the input tree is missing.
    Structural { path: PathBuf, message: String },
    /// A metric file's date or value column could not be parsed.
    Parse {
        path: PathBuf,
        line: Option<usize>,
        message: String,
    },
    /// The PR and GHI files of a pair disagree on their dates or row counts.
    Alignment {
        pr_path: PathBuf,
        ghi_path: PathBuf,
        row: usize,
        pr_date: Option<NaiveDate>,
        ghi_date: Option<NaiveDate>,
    },
    /// Nothing left to evaluate after filtering.
    EmptyInput { message: String },
    /// Filesystem read/write failure outside of parsing.
    Io { path: PathBuf, message: String },
    /// The chart backend failed.
    Render { message: String },
}

impl AppError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn structural(path: &Path, message: impl Into<String>) -> Self {
        Self::Structural {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    pub fn parse(path: &Path, line: Option<usize>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.to_path_buf(),
            line,
            message: message.into(),
        }
    }

    pub fn empty_input(message: impl Into<String>) -> Self {
        Self::EmptyInput {
            message: message.into(),
        }
    }

    pub fn io(path: &Path, message: impl Into<String>) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    pub fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Config { .. } => 2,
            AppError::Structural { .. } | AppError::Io { .. } => 3,
            AppError::Parse { .. } | AppError::Alignment { .. } => 4,
            AppError::EmptyInput { .. } => 5,
            AppError::Render { .. } => 6,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Config { message } => write!(f, "Invalid configuration: {message}"),
            AppError::Structural { path, message } => {
                write!(f, "Structural error at '{}': {message}", path.display())
            }
            AppError::Parse {
                path,
                line: Some(line),
                message,
            } => write!(f, "Parse error in '{}' (line {line}): {message}", path.display()),
            AppError::Parse {
                path,
                line: None,
                message,
            } => write!(f, "Parse error in '{}': {message}", path.display()),
            AppError::Alignment {
                pr_path,
                ghi_path,
                row,
                pr_date,
                ghi_date,
            } => write!(
                f,
                "Alignment error between '{}' and '{}' at data row {row}: PR date {} vs GHI date {}",
                pr_path.display(),
                ghi_path.display(),
                fmt_opt_date(*pr_date),
                fmt_opt_date(*ghi_date),
            ),
            AppError::EmptyInput { message } => write!(f, "Empty input: {message}"),
            AppError::Io { path, message } => write!(f, "I/O error at '{}': {message}", path.display()),
            AppError::Render { message } => write!(f, "Chart rendering failed: {message}"),
        }
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code())
            .field("message", &self.to_string())
            .finish()
    }
}

impl std::error::Error for AppError {}

fn fmt_opt_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_else(|| "<missing>".to_string())
}
