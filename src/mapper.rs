//! Record → view-model projection, one mapper per entity kind.
//!
//! [`RecordMapper`] links a record type to its display projection at compile
//! time, so each list aggregator is bound to exactly one entity kind — no
//! runtime downcasting anywhere in the pipeline.
//!
//! Mapping is infallible by design. The one genuinely fallible step — parsing
//! a record's canonical `url` back into a request for later navigation — is
//! carried as an `Option<ApiRequest>` on the view model instead of dropping
//! the row. A row with an unparseable URL still renders; it just cannot be
//! opened. This keeps the aggregator's positional 1:1 invariant independent
//! of upstream data quality.

use serde::de::DeserializeOwned;

use crate::models::{Character, Episode, Location};
use crate::request::ApiRequest;

/// Binds one record kind to its view model.
pub trait RecordMapper: Send + Sync {
    type Record: DeserializeOwned + Clone + Send + Sync + 'static;
    type ViewModel: Clone + PartialEq + Send + Sync + 'static;

    /// Project one record into its display row. Pure and order-independent.
    fn map(&self, record: &Self::Record) -> Self::ViewModel;

    /// Project a batch, preserving order, one output per input.
    fn map_all(&self, records: &[Self::Record]) -> Vec<Self::ViewModel> {
        records.iter().map(|r| self.map(r)).collect()
    }
}

/// Display row for a character list.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterRow {
    pub id: u64,
    pub name: String,
    /// `"{status} · {species}"`, e.g. `"Alive · Human"`.
    pub status_line: String,
    pub image_url: String,
    /// Request for the character's own resource URL, when it parses.
    pub detail: Option<ApiRequest>,
}

/// Display row for a location list.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationRow {
    pub id: u64,
    pub name: String,
    /// `"{type} · {dimension}"`.
    pub summary: String,
    pub resident_count: usize,
    pub detail: Option<ApiRequest>,
}

/// Display row for an episode list.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeRow {
    pub id: u64,
    pub name: String,
    /// `"{code} · {air_date}"`, e.g. `"S01E01 · December 2, 2013"`.
    pub subtitle: String,
    pub character_count: usize,
    pub detail: Option<ApiRequest>,
}

pub struct CharacterMapper;

impl RecordMapper for CharacterMapper {
    type Record = Character;
    type ViewModel = CharacterRow;

    fn map(&self, record: &Character) -> CharacterRow {
        CharacterRow {
            id: record.id,
            name: record.name.clone(),
            status_line: format!("{} · {}", record.status, record.species),
            image_url: record.image.clone(),
            detail: ApiRequest::parse(&record.url),
        }
    }
}

pub struct LocationMapper;

impl RecordMapper for LocationMapper {
    type Record = Location;
    type ViewModel = LocationRow;

    fn map(&self, record: &Location) -> LocationRow {
        LocationRow {
            id: record.id,
            name: record.name.clone(),
            summary: format!("{} · {}", record.kind, record.dimension),
            resident_count: record.residents.len(),
            detail: ApiRequest::parse(&record.url),
        }
    }
}

pub struct EpisodeMapper;

impl RecordMapper for EpisodeMapper {
    type Record = Episode;
    type ViewModel = EpisodeRow;

    fn map(&self, record: &Episode) -> EpisodeRow {
        EpisodeRow {
            id: record.id,
            name: record.name.clone(),
            subtitle: format!("{} · {}", record.code, record.air_date),
            character_count: record.characters.len(),
            detail: ApiRequest::parse(&record.url),
        }
    }
}
