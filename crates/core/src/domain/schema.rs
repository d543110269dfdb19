//! Structural, enum, and derived-field checks for generated records.

use std::fmt::Display;

use crate::errors::SchemaViolation;

pub trait Schema {
    const ENTITY: &'static str;

    fn record_id(&self) -> &str;

    fn validate(&self) -> Result<(), SchemaViolation>;
}

/// Check context bound to one record, so every failure names the entity and id.
pub(crate) struct Check<'a> {
    entity: &'static str,
    id: &'a str,
}

impl<'a> Check<'a> {
    pub(crate) fn new(entity: &'static str, id: &'a str) -> Self {
        Self { entity, id }
    }

    pub(crate) fn ensure(
        &self,
        condition: bool,
        field: &'static str,
        reason: impl FnOnce() -> String,
    ) -> Result<(), SchemaViolation> {
        if condition {
            Ok(())
        } else {
            Err(SchemaViolation::new(self.entity, self.id, field, reason()))
        }
    }

    pub(crate) fn id(&self, field: &'static str, well_formed: bool) -> Result<(), SchemaViolation> {
        self.ensure(well_formed, field, || "identifier is not prefix + zero-padded digits".into())
    }

    pub(crate) fn non_empty(
        &self,
        field: &'static str,
        value: &str,
    ) -> Result<(), SchemaViolation> {
        self.ensure(!value.trim().is_empty(), field, || "must not be empty".into())
    }

    pub(crate) fn in_range<T>(
        &self,
        field: &'static str,
        value: T,
        min: T,
        max: T,
    ) -> Result<(), SchemaViolation>
    where
        T: PartialOrd + Display + Copy,
    {
        self.ensure(value >= min && value <= max, field, || {
            format!("{value} is outside {min}..={max}")
        })
    }

    pub(crate) fn derived(
        &self,
        field: &'static str,
        actual: f64,
        expected: f64,
    ) -> Result<(), SchemaViolation> {
        self.ensure(actual == expected, field, || {
            format!("stored {actual} does not match recomputed {expected}")
        })
    }
}
