//! Canonical API request construction and URL parsing.
//!
//! An [`ApiRequest`] is a value object: an [`Endpoint`], an ordered list of
//! path segments, and an ordered list of query parameters. It derives its URL
//! deterministically, so two equivalent requests always produce identical
//! strings — which is what makes the URL usable as a cache key.
//!
//! Parsing goes the other way: the API hands back absolute URLs (a page
//! cursor's `next`, a record's cross-reference) and [`ApiRequest::parse`]
//! turns those back into requests. Parsing fails *softly* — a URL outside the
//! API base, an unknown collection token, or a malformed query pair yields
//! `None`, never an error.

use crate::endpoint::Endpoint;

/// Base URL of the API. Everything the client touches lives under this root.
pub const BASE_URL: &str = "https://rickandmortyapi.com/api";

/// A read-only (GET) request against one API collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    endpoint: Endpoint,
    path_segments: Vec<String>,
    query_params: Vec<(String, String)>,
}

impl ApiRequest {
    /// Build a request from its parts. Always succeeds; segment and parameter
    /// order is preserved exactly as supplied.
    pub fn new(
        endpoint: Endpoint,
        path_segments: Vec<String>,
        query_params: Vec<(String, String)>,
    ) -> Self {
        Self {
            endpoint,
            path_segments,
            query_params,
        }
    }

    /// A request for the bare collection root, e.g. `GET /api/character` —
    /// the first page of a list.
    pub fn collection(endpoint: Endpoint) -> Self {
        Self::new(endpoint, Vec::new(), Vec::new())
    }

    /// A request for a single record by id, e.g. `GET /api/episode/28`.
    pub fn record(endpoint: Endpoint, id: u64) -> Self {
        Self::new(endpoint, vec![id.to_string()], Vec::new())
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    pub fn path_segments(&self) -> &[String] {
        &self.path_segments
    }

    pub fn query_params(&self) -> &[(String, String)] {
        &self.query_params
    }

    /// Derive the canonical URL string:
    /// `{base}/{endpoint}[/seg1/seg2...][?k1=v1&k2=v2...]`.
    pub fn url(&self) -> String {
        let mut url = format!("{}/{}", BASE_URL, self.endpoint);
        for segment in &self.path_segments {
            url.push('/');
            url.push_str(segment);
        }
        if !self.query_params.is_empty() {
            url.push('?');
            let joined = self
                .query_params
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join("&");
            url.push_str(&joined);
        }
        url
    }

    /// Parse an absolute URL back into a request.
    ///
    /// Returns `None` (not an error) when:
    /// - the URL does not start with [`BASE_URL`];
    /// - the first path segment is not a known collection token
    ///   (case-sensitive);
    /// - any query pair lacks an `=`.
    pub fn parse(url: &str) -> Option<ApiRequest> {
        let remainder = url.strip_prefix(BASE_URL)?;
        let remainder = remainder.strip_prefix('/').unwrap_or(remainder);
        if remainder.is_empty() {
            return None;
        }

        let (path_part, query_part) = match remainder.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (remainder, None),
        };

        let mut segments = path_part.split('/').filter(|s| !s.is_empty());
        let endpoint: Endpoint = segments.next()?.parse().ok()?;
        let path_segments: Vec<String> = segments.map(str::to_string).collect();

        let mut query_params = Vec::new();
        if let Some(query) = query_part {
            for pair in query.split('&').filter(|p| !p.is_empty()) {
                let (k, v) = pair.split_once('=')?;
                query_params.push((k.to_string(), v.to_string()));
            }
        }

        Some(ApiRequest::new(endpoint, path_segments, query_params))
    }
}
