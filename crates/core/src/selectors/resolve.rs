//! Foreign-key resolution and what happens when a key does not resolve.

use std::collections::HashMap;
use std::hash::Hash;

use crate::domain::catalog::{Product, Supplier};
use crate::domain::dataset::Dataset;
use crate::domain::ids::{ProductId, StoreId, SupplierId};
use crate::domain::schema::Schema;
use crate::domain::store::Store;

pub const UNKNOWN_LABEL: &str = "Unknown";

/// Treatment of a row whose foreign key points at nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnresolvedPolicy {
    /// Drop the row.
    Exclude,
    /// Keep the row under [`UNKNOWN_LABEL`] with zero-valued metrics.
    Sentinel,
}

/// Category-filtered sales drop sales whose product cannot be found.
pub const CATEGORY_FILTER_POLICY: UnresolvedPolicy = UnresolvedPolicy::Exclude;

/// Rankings and rollups keep such rows under the sentinel label.
pub const ROLLUP_POLICY: UnresolvedPolicy = UnresolvedPolicy::Sentinel;

impl UnresolvedPolicy {
    pub fn keeps_unresolved(self) -> bool {
        matches!(self, Self::Sentinel)
    }

    /// The label a row is reported under, or `None` when the row is dropped.
    pub fn label<'a>(self, resolved: Option<&'a str>) -> Option<&'a str> {
        match resolved {
            Some(label) => Some(label),
            None if self.keeps_unresolved() => Some(UNKNOWN_LABEL),
            None => None,
        }
    }
}

/// Label for a joined field in a ranking or rollup.
pub fn rollup_label(resolved: Option<&str>) -> &str {
    ROLLUP_POLICY.label(resolved).unwrap_or(UNKNOWN_LABEL)
}

/// Id indexes over the parent collections, built once per selector context.
/// Duplicate ids resolve to their first occurrence.
#[derive(Debug, Default)]
pub struct Lookup<'a> {
    products: HashMap<&'a str, &'a Product>,
    stores: HashMap<&'a str, &'a Store>,
    suppliers: HashMap<&'a str, &'a Supplier>,
}

impl<'a> Lookup<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self {
            products: index(&dataset.products),
            stores: index(&dataset.stores),
            suppliers: index(&dataset.suppliers),
        }
    }

    pub fn product(&self, id: &ProductId) -> Option<&'a Product> {
        self.products.get(id.as_str()).copied()
    }

    pub fn store(&self, id: &StoreId) -> Option<&'a Store> {
        self.stores.get(id.as_str()).copied()
    }

    pub fn supplier(&self, id: &SupplierId) -> Option<&'a Supplier> {
        self.suppliers.get(id.as_str()).copied()
    }
}

fn index<T: Schema>(records: &[T]) -> HashMap<&str, &T> {
    let mut index = HashMap::with_capacity(records.len());
    for record in records {
        index.entry(record.record_id()).or_insert(record);
    }
    index
}

/// Group-by that remembers the order in which keys first appeared.
#[derive(Debug)]
pub(crate) struct OrderedGroups<K, V> {
    positions: HashMap<K, usize>,
    groups: Vec<V>,
}

impl<K: Eq + Hash, V> OrderedGroups<K, V> {
    pub(crate) fn new() -> Self {
        Self { positions: HashMap::new(), groups: Vec::new() }
    }

    pub(crate) fn entry(&mut self, key: K, init: impl FnOnce() -> V) -> &mut V {
        let position = match self.positions.get(&key) {
            Some(position) => *position,
            None => {
                self.groups.push(init());
                let position = self.groups.len() - 1;
                self.positions.insert(key, position);
                position
            }
        };
        &mut self.groups[position]
    }

    pub(crate) fn into_values(self) -> Vec<V> {
        self.groups
    }
}
