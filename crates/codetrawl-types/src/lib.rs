//! # codetrawl-types
//!
//! Shared domain types for the codetrawl indexing engine.
//!
//! This crate defines the data structures that cross crate boundaries:
//! - `CodeDocument`: a parsed source file pending indexing
//! - `CodeRow` / `CodeStore`: the relational contract behind the
//!   secondary full-table reindex job
//! - `Settings` / `SettingsStore`: operator-tunable configuration
//!
//! ## Usage
//!
//! ```rust
//! use codetrawl_types::CodeDocument;
//!
//! let doc = CodeDocument::new(
//!     "./repo/acme/src/main.rs",
//!     "acme",
//!     "main.rs",
//!     "src",
//!     "src/main.rs",
//! );
//! assert_eq!(doc.path, "./repo/acme/src/main.rs");
//! ```

pub mod code;
pub mod config;
pub mod document;
pub mod error;

pub use code::{CodeRow, CodeStore};
pub use config::{FileSettingsStore, Settings, SettingsStore};
pub use document::CodeDocument;
pub use error::TypesError;
