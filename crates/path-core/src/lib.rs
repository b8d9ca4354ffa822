//! Core of the learning path service: the document model, lenient parsing of
//! model output, and enrichment of suggested resources with verified links.
//!
//! Network access lives behind [`PathGenerator`] and [`ResourceResolver`];
//! this crate has no transport code of its own.

pub mod enrich;
pub mod errors;
pub mod extract;
pub mod generator;
pub mod model;
pub mod prompt;
pub mod resolver;
pub mod service;

pub use enrich::{EnrichmentReport, TreeEnricher, DEFAULT_BOOK_QUALIFIER};
pub use errors::{PathError, PathResult};
pub use extract::{extract_structured, parse_learning_path};
pub use generator::{PathGenerator, StaticGenerator};
pub use model::{
    LearningNode, LearningPath, Lenient, ResourceBundle, ResourceRef, ResourceSlot,
    SuggestedResource,
};
pub use prompt::PromptBuilder;
pub use resolver::{ResourceResolver, SearchHit, StaticResolver};
pub use service::{PathOutcome, PathService};
