//! `platelunch-dedup`: record normalization and duplicate classification.
//!
//! Pure engine crate: receives pre-loaded records, returns cleaned records
//! plus annotations. No CLI or IO dependencies.

pub mod classify;
pub mod links;
pub mod model;
pub mod normalize;
pub mod phones;
pub mod session;

pub use classify::{classify, PartialMarks};
pub use links::{build_search_link, generate_links, LinkTemplate};
pub use model::{Classification, DuplicateAnnotation, ExactGroup, NormalizedKey, Record};
pub use normalize::{classify_phone, normalize_name, normalize_name_opt, normalize_phone, PhoneOutcome};
pub use phones::{format_phones, PhoneStats};
pub use session::{Session, SessionSummary, Step, StepReport};
