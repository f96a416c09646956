//! # sheetgate-check
//!
//! The checking pipeline: candidate selection, the content-hash cache, the
//! per-file checker and the bounded batch runner that fans it out.

pub mod cache;
pub mod candidates;
pub mod checker;
pub mod runner;

pub use cache::{CacheError, HashCache, content_hash};
pub use candidates::{Candidate, CandidateSelection, explicit_files, scan_directory, staged_files};
pub use checker::{CacheUpdate, FileChecker, FileReport};
pub use runner::{BatchObserver, BatchReport, BatchRunner, SilentObserver};
