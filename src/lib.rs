//! # Portal Client
//!
//! A paginated fetch-and-cache data layer for the Rick and Morty REST API.
//!
//! Portal Client covers the data side of a list-driven client: it builds
//! canonical API requests, executes them through a cache-first service,
//! merges incoming pages into an append-only, order-preserving list model,
//! and reports the exact index range of newly appended items so a UI can
//! insert rows incrementally. The UI itself is out of scope — the entire
//! presentation boundary is the [`controller::ListEvents`] trait.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   ┌───────────────┐   ┌────────────────┐
//! │ ScrollTrig │──▶│ ListController│──▶│   ApiService   │
//! │ (debounce) │   │ Idle→Ready⇄…  │   │ cache → GET    │
//! └────────────┘   └──────┬────────┘   └───┬────────┬───┘
//!                         ▼                ▼        ▼
//!                  ┌─────────────┐  ┌──────────┐ ┌─────────┐
//!                  │ Aggregator  │  │ Response │ │  HTTP   │
//!                  │ items + VMs │  │  Cache   │ │ (reqwest)│
//!                  └─────────────┘  └──────────┘ └─────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use portal_client::controller::ListController;
//! use portal_client::service::ApiService;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let service = Arc::new(ApiService::new(Duration::from_secs(30))?);
//! let characters = ListController::characters(service);
//! characters.fetch_first().await;
//! for row in characters.view_models() {
//!     println!("{} — {}", row.name, row.status_line);
//! }
//! characters.fetch_more(None).await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`endpoint`] | The three API collections |
//! | [`request`] | Request building and URL parsing |
//! | [`models`] | Decoded envelope and record shapes |
//! | [`cache`] | Session-scoped response body cache |
//! | [`service`] | Cache-first request execution |
//! | [`mapper`] | Record → view-model projection |
//! | [`aggregator`] | Append-only page accumulation |
//! | [`controller`] | Pagination state machine |
//! | [`trigger`] | Scroll threshold + debounce gate |
//! | [`config`] | TOML configuration parsing |

pub mod aggregator;
pub mod cache;
pub mod config;
pub mod controller;
pub mod endpoint;
pub mod mapper;
pub mod models;
pub mod request;
pub mod service;
pub mod trigger;
