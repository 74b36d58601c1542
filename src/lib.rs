//! # statbunker-tap
//!
//! Extracts football seasons, match results and match reports from
//! Statbunker pages and emits them as Singer records.
//!
//! ## Architecture
//!
//! ```text
//! TapConfig → ConfigResolver → StreamEngine ⇄ PageSession
//!                                   ↓
//!                       validate → extract → RecordSink
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! # Print the stream catalog
//! statbunker-tap discover
//!
//! # Extract every stream of a competition as Singer messages
//! statbunker-tap run --config tap.toml
//!
//! # Only the results, over plain HTTP, into SQLite
//! statbunker-tap run --config tap.toml --stream matches --backend http --db tap.db
//! statbunker-tap show --db tap.db --stream matches
//! ```

/// Run context and error type.
///
/// [`AppContext`](app::AppContext) resolves the selected streams and drives
/// each through a [`StreamEngine`](engine::StreamEngine).
pub mod app;

/// Command-line interface using clap.
///
/// - `run --config <path>` - Extract the configured streams
/// - `discover` - Print the catalog
/// - `show --stream <name>` - Print stored records
pub mod cli;

/// Tap configuration.
///
/// Loaded from TOML or JSON. Holds the stream options plus the `[browser]`
/// and `[retry]` tables; [`ConfigResolver`](config::ConfigResolver) turns it
/// into the first page request of each stream.
pub mod config;

/// Record types: [`Season`](domain::Season), [`Match`](domain::Match) and
/// [`MatchDetails`](domain::MatchDetails).
pub mod domain;

/// Page-by-page extraction loop with retry and pagination.
pub mod engine;

/// Page sessions.
///
/// - [`PageSession`](fetcher::PageSession): Async trait for a live browsing context
/// - [`ChromeSession`](fetcher::ChromeSession): headless Chrome via chromiumoxide
/// - [`HttpSession`](fetcher::HttpSession): reqwest-based implementation
pub mod fetcher;

/// Record sinks: Singer output, SQLite, in-memory.
pub mod sink;

/// SQLite persistence layer.
///
/// - [`Store`](store::Store): Trait defining storage operations
/// - [`SqliteStore`](store::SqliteStore): SQLite implementation
pub mod store;

/// Per-stream validation and extraction rules.
pub mod streams;
