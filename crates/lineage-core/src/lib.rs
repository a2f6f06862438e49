//! Lineage Core - Family dataset model and analysis
//!
//! This crate provides the person record types, the family dataset, and the
//! pure analysis passes run over it: relationship resolution, generation
//! inference, consistency validation, statistics, and the renderer view model.

pub mod dataset;
pub mod error;
pub mod generation;
pub mod interchange;
pub mod limits;
pub mod person;
pub mod query;
pub mod render;
pub mod resolver;
pub mod stats;
pub mod tree;
pub mod validation;

pub use dataset::FamilyDataset;
pub use error::{Error, Result};
pub use generation::{
    infer_generations, GenerationMode, GenerationOptions, GenerationOutcome, GenerationReport,
    ParentCycle,
};
pub use interchange::{Format, ImportReport, SkippedRow};
pub use person::{Gender, PersonRecord, Year};
pub use query::{PaginatedResults, Pagination, PaginationInfo, PersonQuery, SearchMode};
pub use render::{ColorBy, EdgeKind, EdgeView, NodeShape, NodeView, RenderOptions, TreeView};
pub use resolver::Relationships;
pub use stats::{descendant_counts, DatasetStatistics, GenerationSummary, LineageSummary};
pub use tree::{FamilyTree, TreeId};
pub use validation::{
    validate, Severity, ValidationConfig, ValidationReport, Violation, ViolationCategory,
};
