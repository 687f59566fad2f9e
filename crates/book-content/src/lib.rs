//! Bundled reference content for the book companion.
//!
//! This crate ships the chapters, book prompts, structured exercises, and
//! prompt-library templates as validated JSON. It is deliberately independent
//! of the companion domain types; the companion maps these records into its
//! own catalogue when it needs a local fallback or when seeding the backend.
//!
//! # Example
//!
//! ```
//! use book_content::ContentBundle;
//!
//! let bundle = ContentBundle::bundled().expect("embedded bundle is valid");
//! let first = bundle.find_chapter(1).expect("chapter one exists");
//! assert_eq!(first.number, 1);
//! ```

mod bundle;
mod error;
mod seed;
mod validation;

pub use bundle::ContentBundle;
pub use error::ContentError;
pub use seed::{ChapterSeed, ExerciseSeed, FieldKindSeed, FieldSeed, PromptSeed, TemplateSeed};
pub use validation::check_field;
