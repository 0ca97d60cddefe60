/*!
 * Database entity models and DTOs.
 *
 * These structures map directly to database tables and provide
 * type-safe access to persisted data.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a translation request and of the vendor job carrying it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TranslationStatus {
    /// Queued, not yet accepted by the vendor
    Pending,
    /// Uploaded and accepted by the vendor
    InProgress,
    /// Translation delivered
    Complete,
    /// Translation abandoned
    Failed,
}

impl TranslationStatus {
    /// Position in the PENDING -> IN_PROGRESS -> {COMPLETE, FAILED} order
    fn rank(self) -> u8 {
        match self {
            TranslationStatus::Pending => 0,
            TranslationStatus::InProgress => 1,
            TranslationStatus::Complete | TranslationStatus::Failed => 2,
        }
    }

    /// Whether moving from `self` to `next` is the next forward step
    pub fn can_transition_to(self, next: TranslationStatus) -> bool {
        next.rank() == self.rank() + 1
    }

    /// Whether no further transition is possible
    pub fn is_terminal(self) -> bool {
        self.rank() == 2
    }
}

impl fmt::Display for TranslationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslationStatus::Pending => write!(f, "PENDING"),
            TranslationStatus::InProgress => write!(f, "IN_PROGRESS"),
            TranslationStatus::Complete => write!(f, "COMPLETE"),
            TranslationStatus::Failed => write!(f, "FAILED"),
        }
    }
}

impl std::str::FromStr for TranslationStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace('-', "_").as_str() {
            "PENDING" => Ok(TranslationStatus::Pending),
            "IN_PROGRESS" => Ok(TranslationStatus::InProgress),
            "COMPLETE" => Ok(TranslationStatus::Complete),
            "FAILED" => Ok(TranslationStatus::Failed),
            _ => Err(anyhow::anyhow!("Invalid translation status: {}", s)),
        }
    }
}

/// Translation request record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranslationRecord {
    /// Row id
    pub id: i64,
    /// Internal locale code (e.g. `jp`)
    pub locale: String,
    /// Source document path, relative to the project root
    pub slug: String,
    /// Current status
    pub status: TranslationStatus,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
    /// Last update timestamp (RFC 3339)
    pub updated_at: String,
}

/// Vendor job record; `batch_uid` is set once the job's batch exists
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobRecord {
    /// Row id
    pub id: i64,
    /// Vendor-issued job identifier
    pub job_uid: String,
    /// Vendor-issued batch identifier
    pub batch_uid: Option<String>,
    /// Internal locale code the job targets
    pub locale: String,
    /// Current status
    pub status: TranslationStatus,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
    /// Last update timestamp (RFC 3339)
    pub updated_at: String,
}

/// Link between a translation request and the job carrying it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranslationJobRecord {
    pub id: i64,
    pub translation_id: i64,
    pub job_id: i64,
}

/// Filter for translation queries; unset fields match everything
#[derive(Debug, Clone, Default)]
pub struct TranslationFilter {
    pub status: Option<TranslationStatus>,
    pub locale: Option<String>,
}

impl TranslationFilter {
    pub fn status(status: TranslationStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

/// Filter for job queries; unset fields match everything
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub job_uid: Option<String>,
    pub batch_uid: Option<String>,
}

impl JobFilter {
    pub fn batch_uid(batch_uid: impl Into<String>) -> Self {
        Self {
            batch_uid: Some(batch_uid.into()),
            ..Default::default()
        }
    }

    pub fn job_uid(job_uid: impl Into<String>) -> Self {
        Self {
            job_uid: Some(job_uid.into()),
            ..Default::default()
        }
    }
}
