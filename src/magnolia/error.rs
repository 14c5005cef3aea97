use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MagnoliaError {
    #[error("dataset contains no nodes")]
    EmptyDataset,

    #[error("cyclic hierarchy: node `{id}` is its own ancestor")]
    CyclicHierarchy { id: String },

    #[error("invalid layout configuration: {0}")]
    InvalidLayoutConfig(String),
}
