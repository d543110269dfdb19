pub mod alerts;
pub mod config;
pub mod domain;
pub mod errors;
pub mod fixtures;
pub mod generator;
pub mod selectors;
pub mod state;

pub use alerts::{Alert, AlertKind, Severity};
pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};
pub use domain::dataset::{Dataset, DatasetMetadata};
pub use domain::integrity::{verify, IntegrityReport};
pub use errors::{ApplicationError, DatasetError, GenerationError, SchemaViolation};
pub use generator::{CollectionSink, DatasetGenerator, DatasetWriter, NullSink};
pub use selectors::{DateRange, FilterSpec, FilterUpdate, KpiSummary, Selectors};
pub use state::{DashboardState, DashboardStore};
