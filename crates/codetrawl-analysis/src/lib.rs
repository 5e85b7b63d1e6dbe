//! # codetrawl-analysis
//!
//! Text processing for source code before it reaches the index.
//!
//! The indexing pipeline never looks at raw file contents directly; it
//! asks this crate for searchable tokens instead:
//!
//! - [`split_keywords`]: identifier-aware token split, including
//!   camelCase and snake_case expansion
//! - [`code_clean_pipeline`]: strips punctuation noise so `foo();`
//!   indexes as `foo`
//! - [`find_interesting_keywords`]: rescues terms a plain tokenizer
//!   mangles, such as `c++` or `c#`
//! - [`SpellingCorrector`]: word-frequency learner that feeds query-time
//!   suggestions
//!
//! All functions are pure over their input; only the spelling corrector
//! carries state.

pub mod lexer;
pub mod spelling;

pub use lexer::{code_clean_pipeline, find_interesting_keywords, split_keywords};
pub use spelling::SpellingCorrector;
