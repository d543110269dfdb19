//! Where generated collections go: per-collection files plus the merged dataset.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::domain::dataset::Dataset;
use crate::errors::GenerationError;

pub const MOCK_DIR: &str = "mock";
pub const MERGED_FILE: &str = "mockData.json";

/// Receives each collection as soon as it is generated, then the merged dataset.
pub trait CollectionSink {
    fn write_collection(&mut self, name: &'static str, payload: &[u8])
        -> Result<(), GenerationError>;

    fn write_dataset(&mut self, payload: &[u8]) -> Result<(), GenerationError>;

    /// Sinks that drop everything let the generator skip serialization.
    fn discards(&self) -> bool {
        false
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl CollectionSink for NullSink {
    fn write_collection(&mut self, _: &'static str, _: &[u8]) -> Result<(), GenerationError> {
        Ok(())
    }

    fn write_dataset(&mut self, _: &[u8]) -> Result<(), GenerationError> {
        Ok(())
    }

    fn discards(&self) -> bool {
        true
    }
}

/// Writes `<root>/mock/<collection>.json` and `<root>/mockData.json`.
#[derive(Clone, Debug)]
pub struct DatasetWriter {
    root: PathBuf,
    written: Vec<PathBuf>,
}

impl DatasetWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), written: Vec::new() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn merged_path(&self) -> PathBuf {
        self.root.join(MERGED_FILE)
    }

    pub fn collection_path(&self, name: &str) -> PathBuf {
        self.root.join(MOCK_DIR).join(format!("{name}.json"))
    }

    /// Every file written so far, in write order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn write(&mut self, path: PathBuf, payload: &[u8]) -> Result<(), GenerationError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|source| GenerationError::Output { path: parent.to_path_buf(), source })?;
        }
        fs::write(&path, payload)
            .map_err(|source| GenerationError::Output { path: path.clone(), source })?;
        info!(
            event_name = "generator.output.written",
            path = %path.display(),
            bytes = payload.len(),
            "wrote generated output"
        );
        self.written.push(path);
        Ok(())
    }
}

impl CollectionSink for DatasetWriter {
    fn write_collection(
        &mut self,
        name: &'static str,
        payload: &[u8],
    ) -> Result<(), GenerationError> {
        let path = self.collection_path(name);
        self.write(path, payload)
    }

    fn write_dataset(&mut self, payload: &[u8]) -> Result<(), GenerationError> {
        let path = self.merged_path();
        self.write(path, payload)
    }
}

pub(crate) fn pretty_json<T: Serialize + ?Sized>(
    collection: &'static str,
    value: &T,
) -> Result<Vec<u8>, GenerationError> {
    serde_json::to_vec_pretty(value)
        .map_err(|source| GenerationError::Serialize { collection, source })
}

pub(crate) fn emit<T: Serialize>(
    sink: &mut dyn CollectionSink,
    name: &'static str,
    records: &[T],
) -> Result<(), GenerationError> {
    if sink.discards() {
        return Ok(());
    }
    let payload = pretty_json(name, records)?;
    sink.write_collection(name, &payload)
}

pub(crate) fn emit_dataset(
    sink: &mut dyn CollectionSink,
    dataset: &Dataset,
) -> Result<(), GenerationError> {
    if sink.discards() {
        return Ok(());
    }
    let payload = pretty_json("dataset", dataset)?;
    sink.write_dataset(&payload)
}
