//! # accredo-directory — Directory Access for Accredo Verification
//!
//! Everything that touches an accreditation body's public directory lives
//! here: the scraping-proxy HTTP client and its fetch policy, the search
//! URL builders, and the per-body HTML result extractors.
//!
//! ## Architecture
//!
//! The [`DirectoryFetcher`] trait is the seam between orchestration and the
//! network. Production code uses [`DirectoryClient`] (a `reqwest` client
//! routed through a scraping proxy); tests use [`StubFetcher`] with canned
//! HTML. This separation keeps the verification pipeline testable without
//! touching real directories — which block programmatic access and change
//! markup without notice.
//!
//! ## Best-effort extraction
//!
//! The directories are web pages, not APIs. Extraction is heuristic and the
//! accepted failure mode is "no candidates found", never a panic: malformed
//! HTML and zero matches both produce an empty candidate list.

pub mod client;
pub mod error;
pub mod extract;
pub mod fetcher;

pub use client::{DirectoryClient, ProxyConfig};
pub use error::DirectoryError;
pub use extract::Candidate;
pub use fetcher::{DirectoryFetcher, StubFetcher};
