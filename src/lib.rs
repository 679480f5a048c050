//! Structured CPU/GPU records from the TechPowerUp specs database.
//!
//! [`SpecsScraper`] discovers the filter vocabulary of a category, turns a
//! filtered listing into [`ComponentRecord`]s and pulls typed attributes out
//! of detail pages. Fetching and persistence sit behind [`PageFetcher`] and
//! [`FilterStore`].

pub mod config;
pub mod error;
pub mod models;
pub mod parsers;
pub mod scrapers;
pub mod storage;
pub mod utils;

pub use config::Config;
pub use error::{ExtractError, Result};
pub use models::*;
pub use scrapers::{socket_name, SpecsScraper};
pub use storage::{FilterStore, SqliteStorage};
pub use utils::http::{FetchError, HttpFetcher, PageFetcher};
