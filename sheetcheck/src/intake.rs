//! Intake gate between uploads and the processing pipeline
//!
//! The validator itself knows nothing about job tracking or storage. Services
//! that do (a status table, the copy into the processing bucket) are passed
//! in as trait objects so the gate can be exercised with in-memory fakes.

use crate::validator::Validator;
use hashbrown::HashMap;
use sheetcheck_core::ValidationResult;
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;
use tracing::{info, warn};

/// Longest status detail written to a store, in characters
pub const DETAIL_LIMIT: usize = 500;

/// Per-map status as kept by the tracking store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum MapStatus {
    Queued,
    Processing,
    Completed,
    Failed,
    PartialSuccess,
}

impl MapStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            MapStatus::Queued => "QUEUED",
            MapStatus::Processing => "PROCESSING",
            MapStatus::Completed => "COMPLETED",
            MapStatus::Failed => "FAILED",
            MapStatus::PartialSuccess => "PARTIAL_SUCCESS",
        }
    }
}

impl std::fmt::Display for MapStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Durable per-map status tracking
pub trait StatusStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Record the latest status of a map, with an optional human-readable detail
    fn record(
        &self,
        map_id: &str,
        map_name: &str,
        status: MapStatus,
        detail: Option<&str>,
    ) -> Result<(), Self::Error>;
}

/// Hand-off of an accepted archive to the downstream copy/processing stage
pub trait Admission {
    type Error: std::error::Error + Send + Sync + 'static;

    fn admit(&self, map_id: &str, archive: &Path, map_name: &str) -> Result<(), Self::Error>;
}

/// Failures of the collaborators around validation
///
/// A rejected upload is not an error here; it comes back as an invalid
/// [`ValidationResult`].
#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("status store rejected update for map {map_id}: {source}")]
    Store {
        map_id: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("admission of map {map_id} failed: {source}")]
    Admission {
        map_id: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// One submitted map
#[derive(Debug, Clone, Copy)]
pub struct IntakeRequest<'a> {
    pub map_id: &'a str,
    /// Name as submitted, checked by the filename grammar
    pub map_name: &'a str,
    pub archive: &'a Path,
}

/// Cut `detail` to [`DETAIL_LIMIT`] characters
pub fn truncate_detail(detail: &str) -> String {
    detail.chars().take(DETAIL_LIMIT).collect()
}

/// Validates submissions and reports the outcome to the collaborators
pub struct IntakeGate<S, A> {
    validator: Validator,
    store: S,
    admission: A,
}

impl<S: StatusStore, A: Admission> IntakeGate<S, A> {
    pub fn new(validator: Validator, store: S, admission: A) -> Self {
        Self {
            validator,
            store,
            admission,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn admission(&self) -> &A {
        &self.admission
    }

    fn record(
        &self,
        request: &IntakeRequest<'_>,
        status: MapStatus,
        detail: Option<&str>,
    ) -> Result<(), IntakeError> {
        let detail = detail.map(truncate_detail);
        self.store
            .record(request.map_id, request.map_name, status, detail.as_deref())
            .map_err(|err| IntakeError::Store {
                map_id: request.map_id.to_owned(),
                source: Box::new(err),
            })
    }

    /// Validate one submission
    ///
    /// The map is marked `PROCESSING` first. A valid archive is admitted and
    /// marked `QUEUED` (with any warning as detail); an invalid one is marked
    /// `FAILED` with the validation error. A failed admission also marks the
    /// map `FAILED` before the error is returned.
    pub fn submit(&self, request: &IntakeRequest<'_>) -> Result<ValidationResult, IntakeError> {
        self.record(request, MapStatus::Processing, None)?;

        let result = self
            .validator
            .validate(request.archive, Some(request.map_name));

        if !result.valid {
            self.record(request, MapStatus::Failed, result.error.as_deref())?;
            return Ok(result);
        }

        if let Err(err) = self
            .admission
            .admit(request.map_id, request.archive, request.map_name)
        {
            warn!(map_id = request.map_id, error = %err, "admission failed");
            self.record(request, MapStatus::Failed, Some(&err.to_string()))?;
            return Err(IntakeError::Admission {
                map_id: request.map_id.to_owned(),
                source: Box::new(err),
            });
        }

        info!(map_id = request.map_id, map_name = request.map_name, "map admitted");
        self.record(request, MapStatus::Queued, result.warning.as_deref())?;
        Ok(result)
    }
}

/// A status write kept by [`MemoryStatusStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRecord {
    pub map_name: String,
    pub status: MapStatus,
    pub detail: Option<String>,
}

/// In-memory [`StatusStore`] keeping the full history per map id
#[derive(Debug, Default)]
pub struct MemoryStatusStore {
    history: Mutex<HashMap<String, Vec<StatusRecord>>>,
}

impl MemoryStatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every status written for `map_id`, oldest first
    pub fn history(&self, map_id: &str) -> Vec<StatusRecord> {
        let history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        history.get(map_id).cloned().unwrap_or_default()
    }

    /// Most recent status for `map_id`
    pub fn latest(&self, map_id: &str) -> Option<StatusRecord> {
        self.history(map_id).pop()
    }
}

impl StatusStore for MemoryStatusStore {
    type Error = std::convert::Infallible;

    fn record(
        &self,
        map_id: &str,
        map_name: &str,
        status: MapStatus,
        detail: Option<&str>,
    ) -> Result<(), Self::Error> {
        let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        history
            .entry(map_id.to_owned())
            .or_default()
            .push(StatusRecord {
                map_name: map_name.to_owned(),
                status,
                detail: detail.map(str::to_owned),
            });
        Ok(())
    }
}
