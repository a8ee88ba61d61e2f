//! Typed access to the persisted collections.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use vintrade_catalog::{DiscontinuedEntry, Product};
use vintrade_core::ExpectedVersion;
use vintrade_import::MappingTemplates;
use vintrade_pricing::FormulaSet;
use vintrade_sales::{Order, SpecialOrderList};

use crate::store::{BlobStore, BlobWrite, StoreError};

pub mod keys {
    pub const ACTIVE_CATALOG: &str = "catalog.active";
    pub const DISCONTINUED: &str = "catalog.discontinued";
    pub const MAPPING_TEMPLATES: &str = "catalog.mapping_templates";
    pub const ORDERS: &str = "sales.orders";
    pub const SPECIAL_ORDERS: &str = "sales.special_orders";
    pub const FORMULAS: &str = "pricing.formulas";
}

/// A collection as read, with the revision to write it back against.
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    pub key: &'static str,
    pub version: Option<u64>,
    pub value: T,
}

impl<T: Serialize> Snapshot<T> {
    /// Stage a write of the current value, expecting no one else wrote since
    /// the read.
    pub fn to_write(&self) -> Result<BlobWrite, StoreError> {
        Ok(BlobWrite::new(
            self.key,
            ExpectedVersion::from_read(self.version),
            serde_json::to_value(&self.value)?,
        ))
    }
}

#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn BlobStore>,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository").finish_non_exhaustive()
    }
}

impl Repository {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self { store }
    }

    /// Missing keys read as `T::default()`.
    pub fn load<T>(&self, key: &'static str) -> Result<Snapshot<T>, StoreError>
    where
        T: DeserializeOwned + Default,
    {
        match self.store.get(key)? {
            Some(v) => Ok(Snapshot {
                key,
                version: Some(v.version),
                value: serde_json::from_value(v.value)
                    .map_err(|e| StoreError::Serialization(format!("{key}: {e}")))?,
            }),
            None => Ok(Snapshot {
                key,
                version: None,
                value: T::default(),
            }),
        }
    }

    pub fn active(&self) -> Result<Snapshot<Vec<Product>>, StoreError> {
        self.load(keys::ACTIVE_CATALOG)
    }

    pub fn discontinued(&self) -> Result<Snapshot<Vec<DiscontinuedEntry>>, StoreError> {
        self.load(keys::DISCONTINUED)
    }

    pub fn templates(&self) -> Result<Snapshot<MappingTemplates>, StoreError> {
        self.load(keys::MAPPING_TEMPLATES)
    }

    pub fn orders(&self) -> Result<Snapshot<Vec<Order>>, StoreError> {
        self.load(keys::ORDERS)
    }

    pub fn special_orders(&self) -> Result<Snapshot<Vec<SpecialOrderList>>, StoreError> {
        self.load(keys::SPECIAL_ORDERS)
    }

    pub fn formulas(&self) -> Result<Snapshot<FormulaSet>, StoreError> {
        self.load(keys::FORMULAS)
    }

    pub fn commit(&self, writes: Vec<BlobWrite>) -> Result<Vec<u64>, StoreError> {
        self.store.commit(writes)
    }
}
