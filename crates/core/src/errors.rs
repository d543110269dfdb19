use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

/// A generated record failed its structural, enum, or derived-field checks.
///
/// This always points at a defect in a distribution or formula; generation
/// stops at the first one.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{entity} `{id}` violates schema at `{field}`: {reason}")]
pub struct SchemaViolation {
    pub entity: &'static str,
    pub id: String,
    pub field: &'static str,
    pub reason: String,
}

impl SchemaViolation {
    pub fn new(
        entity: &'static str,
        id: impl Into<String>,
        field: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self { entity, id: id.into(), field, reason: reason.into() }
    }
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation precondition failed: {0}")]
    Precondition(String),
    #[error(transparent)]
    Schema(#[from] SchemaViolation),
    #[error("could not write `{path}`: {source}")]
    Output { path: PathBuf, source: std::io::Error },
    #[error("could not serialize collection `{collection}`: {source}")]
    Serialize { collection: &'static str, source: serde_json::Error },
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("could not read dataset `{path}`: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("could not parse dataset `{path}`: {source}")]
    Parse { path: PathBuf, source: serde_json::Error },
}

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

impl ApplicationError {
    /// Stable label surfaced in structured command output.
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "config_validation",
            Self::Generation(GenerationError::Precondition(_)) => "generation_precondition",
            Self::Generation(GenerationError::Schema(_)) => "schema_violation",
            Self::Generation(GenerationError::Output { .. })
            | Self::Generation(GenerationError::Serialize { .. }) => "output",
            Self::Dataset(DatasetError::Read { .. }) => "dataset_read",
            Self::Dataset(DatasetError::Parse { .. }) => "dataset_parse",
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Configuration(_) => 2,
            Self::Generation(GenerationError::Precondition(_))
            | Self::Generation(GenerationError::Schema(_)) => 3,
            Self::Generation(_) => 4,
            Self::Dataset(_) => 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::ConfigError;
    use crate::errors::{ApplicationError, GenerationError, SchemaViolation};

    #[test]
    fn schema_violation_maps_to_generation_class() {
        let error = ApplicationError::from(GenerationError::from(SchemaViolation::new(
            "sale",
            "SL000001",
            "total",
            "expected 10.00",
        )));

        assert_eq!(error.error_class(), "schema_violation");
        assert_eq!(error.exit_code(), 3);
        assert_eq!(
            error.to_string(),
            "sale `SL000001` violates schema at `total`: expected 10.00"
        );
    }

    #[test]
    fn configuration_errors_use_config_exit_code() {
        let error = ApplicationError::from(ConfigError::Validation("bad".to_string()));
        assert_eq!(error.error_class(), "config_validation");
        assert_eq!(error.exit_code(), 2);
    }
}
