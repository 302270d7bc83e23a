//! Decoded API response shapes.
//!
//! Every list endpoint answers with the same envelope — `{ info, results }` —
//! parametrized only by the record type, so [`PageEnvelope`] is generic over
//! its results. Fetching a resource URL directly (e.g. `/character/1`) yields
//! a bare record instead.
//!
//! Records never link to each other directly: cross-references are URL
//! strings (`origin.url`, `episode[..]`, `residents[..]`) that parse back
//! into requests via [`crate::request::ApiRequest::parse`].

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Pagination metadata attached to every list response.
///
/// `count` and `pages` are server-reported totals and advisory only — never
/// used to pre-size anything, and tolerated when absent or stale. `next` and
/// `prev` are nullable absolute URLs driving cursor pagination.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PageInfo {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub pages: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub prev: Option<String>,
}

/// The `{info, results}` shape shared by all three list endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct PageEnvelope<R> {
    pub info: PageInfo,
    pub results: Vec<R>,
}

/// A name + cross-reference URL pair, used for a character's origin and
/// last-known location. The URL may be empty ("unknown" origin).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResourceRef {
    pub name: String,
    pub url: String,
}

/// A character record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Character {
    pub id: u64,
    pub name: String,
    pub status: String,
    pub species: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub gender: String,
    pub origin: ResourceRef,
    pub location: ResourceRef,
    pub image: String,
    /// URLs of the episodes this character appears in.
    pub episode: Vec<String>,
    pub url: String,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

/// A location record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Location {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub dimension: String,
    /// URLs of the characters last seen at this location.
    pub residents: Vec<String>,
    pub url: String,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

/// An episode record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Episode {
    pub id: u64,
    pub name: String,
    pub air_date: String,
    /// Episode code, e.g. `"S01E01"`.
    #[serde(rename = "episode")]
    pub code: String,
    /// URLs of the characters appearing in this episode.
    pub characters: Vec<String>,
    pub url: String,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}
