//! Read-only access to the upstream units API.

mod client;
mod models;

pub use client::HttpUnitSource;
pub use models::{
    parse_date, ReceptionInfo, Schedule, UnitDetail, UnitPage, UnitSummary,
};

use crate::listings::FilterSelection;
use async_trait::async_trait;

/// Source of listing data, so pages can be rendered against a stub in tests.
#[async_trait]
pub trait UnitSource: Send + Sync {
    async fn fetch_units(
        &self,
        selection: &FilterSelection,
        page_size: u32,
    ) -> Result<UnitPage, FetchError>;

    async fn fetch_unit(&self, unit_id: u64) -> Result<UnitDetail, FetchError>;
}

/// The single failure a caller sees when the units API cannot answer. The
/// variants only differ in what gets logged.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("failed to fetch {resource}: upstream responded {status}")]
    Status { resource: String, status: u16 },
    #[error("failed to fetch {resource}: {message}")]
    Transport { resource: String, message: String },
    #[error("failed to fetch {resource}: unreadable response ({message})")]
    Decode { resource: String, message: String },
}

impl FetchError {
    pub fn resource(&self) -> &str {
        match self {
            FetchError::Status { resource, .. }
            | FetchError::Transport { resource, .. }
            | FetchError::Decode { resource, .. } => resource,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::Status { status: 404, .. })
    }
}
