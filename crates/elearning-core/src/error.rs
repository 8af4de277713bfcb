//! Error taxonomy for the parsing pipeline.
//!
//! Validation findings are never exceptions -- see [`crate::diagnostics`] for
//! those. The types here cover everything that stops a parse before a
//! [`crate::parser::ParseResult`] can be produced: missing files, malformed
//! XML, undecodable bytes, unrecognized package layouts.

use std::path::PathBuf;

/// Failures reported by a [`crate::fs::FileAccess`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum FileAccessError {
    #[error("no entry matching `{path}` under {root}")]
    NotFound { root: String, path: String },

    #[error("I/O error reading `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("stream for `{path}` used after its FileAccess was closed")]
    Closed { path: String },
}

/// Crate-wide error type returned by detection and parsing entry points.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error(transparent)]
    FileAccess(#[from] FileAccessError),

    #[error("malformed XML in {path}: {source}")]
    XmlMalformed {
        path: String,
        #[source]
        source: roxmltree::Error,
    },

    #[error("could not decode {field} in {path}: {reason}")]
    XmlScalarDecode {
        path: String,
        field: &'static str,
        reason: String,
    },

    #[error(
        "declared encoding `{declared}` for {path} does not match its byte content \
         (detected {effective} instead)"
    )]
    XmlEncodingMismatch {
        path: String,
        declared: String,
        effective: String,
    },

    #[error("failed to parse {module_type} manifest\n{issues}")]
    ManifestParse {
        module_type: String,
        issues: String,
        #[source]
        source: Option<Box<CoreError>>,
    },

    #[error("schema validation failed for {path}: {detail}")]
    ManifestSchemaValidation { path: String, detail: String },

    #[error("could not load external metadata at {path}: {reason}")]
    MetadataLoad { path: PathBuf, reason: String },

    #[error("no registered detector recognized the package at {root}")]
    DetectionUnknown { root: String },
}

pub type CoreResult<T> = Result<T, CoreError>;
