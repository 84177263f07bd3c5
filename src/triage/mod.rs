//! Ticket triage: answer cache lookup -> LLM classification -> persistence

pub mod classifier;
pub mod lookup;
pub mod pipeline;

pub use classifier::parse_classification;
pub use classifier::Classifier;
pub use lookup::LookupOutcome;
pub use lookup::SimilarityLookup;
pub use pipeline::TriageService;

/// Default maximum distance for treating two tickets as the same question
pub const DEFAULT_MATCH_THRESHOLD: f32 = 0.2;
