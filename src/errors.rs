/*!
 * Error types for the translation queue.
 *
 * Each component boundary gets its own error enum, built with thiserror.
 * `AppError` wraps all of them for the binary entry point.
 */

use thiserror::Error;

/// Errors raised by the vendor gateway
#[derive(Error, Debug)]
pub enum VendorError {
    /// The response envelope carried a code other than the expected one
    #[error("Vendor responded to {endpoint} with code {code}: {raw}")]
    Protocol {
        /// Endpoint path that was called
        endpoint: String,
        /// Envelope code (e.g. VALIDATION_ERROR)
        code: String,
        /// Raw envelope body, kept for logging
        raw: String,
    },

    /// Non-2xx response without a usable envelope
    #[error("Vendor HTTP error on {endpoint}: {status} - {body}")]
    Http {
        /// Endpoint path that was called
        endpoint: String,
        /// HTTP status code
        status: u16,
        /// Response body text
        body: String,
    },

    /// The request never produced a response
    #[error("Vendor request failed: {0}")]
    RequestFailed(String),

    /// The response body could not be decoded
    #[error("Failed to parse vendor response: {0}")]
    ParseError(String),

    /// No vendor locale is mapped for an internal locale code
    #[error("No vendor locale mapped for '{0}'")]
    UnknownLocale(String),
}

impl From<reqwest::Error> for VendorError {
    fn from(error: reqwest::Error) -> Self {
        Self::RequestFailed(error.to_string())
    }
}

/// Errors found while validating configuration at startup
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    /// A required setting is empty or absent
    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    /// A setting is present but unusable
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Errors raised while loading queued documents
#[derive(Error, Debug)]
pub enum LoadError {
    /// Reading the source document failed
    #[error("Failed to read {slug}: {source}")]
    Io {
        /// Queued slug
        slug: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The renderer rejected the document
    #[error("Failed to render {slug}: {message}")]
    Render {
        /// Queued slug
        slug: String,
        /// Renderer message
        message: String,
    },
}

/// Errors raised while advancing local records after an upload
#[derive(Error, Debug)]
pub enum ReconcileError {
    /// A vendor identifier has no matching local record
    #[error("No local record for batch {batch_uid} ({slug}); local store and vendor are out of sync")]
    DataConsistency {
        /// Vendor batch identifier from the upload outcome
        batch_uid: String,
        /// File URI from the upload outcome
        slug: String,
    },

    /// The persistence layer failed
    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the vendor gateway
    #[error("Vendor error: {0}")]
    Vendor(#[from] VendorError),

    /// Error from configuration
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Error from content loading
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// Error from status reconciliation
    #[error("Reconcile error: {0}")]
    Reconcile(#[from] ReconcileError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
