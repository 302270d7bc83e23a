//! The three top-level API collections.
//!
//! An [`Endpoint`] names both a URL path segment (`/character`, `/location`,
//! `/episode`) and a cache partition key — every cached response body lives
//! under exactly one endpoint.

use std::fmt;
use std::str::FromStr;

/// One of the API's three resource collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Character,
    Location,
    Episode,
}

impl Endpoint {
    /// All endpoints, in the order the API documents them.
    pub const ALL: [Endpoint; 3] = [Endpoint::Character, Endpoint::Location, Endpoint::Episode];

    /// The path segment this endpoint occupies in a request URL.
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Character => "character",
            Endpoint::Location => "location",
            Endpoint::Episode => "episode",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Endpoint {
    type Err = ();

    /// Case-sensitive: the API's path segments are lowercase and so is the
    /// token we accept.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "character" => Ok(Endpoint::Character),
            "location" => Ok(Endpoint::Location),
            "episode" => Ok(Endpoint::Episode),
            _ => Err(()),
        }
    }
}
