//! In-memory record store, the single source of truth for a session
//!
//! Rows keep insertion order. Every mutation reports a [`Change`] so the
//! caller can decide whether a view needs refreshing.

use miette::Diagnostic;
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::{debug, info};

use crate::core::item::{today, Item, NewItem};

/// What a store operation did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// A row was added, or replaced an existing row with the same sku
    Added { sku: String, replaced: bool },
    /// Quantity of an existing row changed
    Adjusted { sku: String, from: u32, to: u32 },
    /// A row was deleted
    Removed { sku: String },
    /// A batch was merged by key
    Merged { inserted: usize, updated: usize },
    /// The whole table was replaced
    Replaced { count: usize },
    /// Nothing changed
    Unchanged { sku: String },
}

impl Change {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Change::Unchanged { .. })
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("'{field}' must not be empty")]
    #[diagnostic(
        code(stk::store::validation),
        help("Both sku and name are required to register an item")
    )]
    Validation { field: &'static str },

    #[error("No item with sku '{sku}'")]
    #[diagnostic(
        code(stk::store::not_found),
        help("Use `stk list` to see the registered skus")
    )]
    NotFound { sku: String },
}

/// Authoritative table of items for one session
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    items: Vec<Item>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from rows, keeping the last row seen for each sku
    pub fn from_items(items: Vec<Item>) -> Self {
        let mut store = Self::new();
        store.replace_all(items);
        store
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, sku: &str) -> Option<&Item> {
        self.position(sku).map(|idx| &self.items[idx])
    }

    /// Sum of system quantities across all rows
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    fn position(&self, sku: &str) -> Option<usize> {
        self.items.iter().position(|i| i.sku == sku)
    }

    fn locate(&mut self, sku: &str) -> Result<&mut Item, StoreError> {
        let idx = self.position(sku).ok_or_else(|| StoreError::NotFound {
            sku: sku.to_string(),
        })?;
        Ok(&mut self.items[idx])
    }

    /// Register an item from the form; an existing sku is overwritten in place
    pub fn add(&mut self, new: NewItem) -> Result<Change, StoreError> {
        let sku = new.sku.trim();
        let name = new.name.trim();
        if sku.is_empty() {
            return Err(StoreError::Validation { field: "sku" });
        }
        if name.is_empty() {
            return Err(StoreError::Validation { field: "name" });
        }

        let item = Item {
            sku: sku.to_string(),
            name: name.to_string(),
            image_url: new.image_url.unwrap_or_default().trim().to_string(),
            quantity: new.quantity,
            last_modified: today(),
        };
        let sku = item.sku.clone();

        let replaced = match self.position(&sku) {
            Some(idx) => {
                self.items[idx] = item;
                true
            }
            None => {
                self.items.push(item);
                false
            }
        };
        debug!(%sku, replaced, "item registered");
        Ok(Change::Added { sku, replaced })
    }

    pub fn increment(&mut self, sku: &str) -> Result<Change, StoreError> {
        let item = self.locate(sku)?;
        let from = item.quantity;
        let to = from.saturating_add(1);
        Ok(Self::apply_quantity(item, from, to))
    }

    /// Decrease by one; a row already at zero stays at zero
    pub fn decrement(&mut self, sku: &str) -> Result<Change, StoreError> {
        let item = self.locate(sku)?;
        let from = item.quantity;
        let to = from.saturating_sub(1);
        Ok(Self::apply_quantity(item, from, to))
    }

    /// Overwrite the quantity, only touching the row when the value differs
    pub fn set_quantity(&mut self, sku: &str, quantity: u32) -> Result<Change, StoreError> {
        let item = self.locate(sku)?;
        let from = item.quantity;
        Ok(Self::apply_quantity(item, from, quantity))
    }

    fn apply_quantity(item: &mut Item, from: u32, to: u32) -> Change {
        if from == to {
            return Change::Unchanged {
                sku: item.sku.clone(),
            };
        }
        item.quantity = to;
        item.last_modified = today();
        Change::Adjusted {
            sku: item.sku.clone(),
            from,
            to,
        }
    }

    pub fn remove(&mut self, sku: &str) -> Result<Change, StoreError> {
        let idx = self.position(sku).ok_or_else(|| StoreError::NotFound {
            sku: sku.to_string(),
        })?;
        let item = self.items.remove(idx);
        Ok(Change::Removed { sku: item.sku })
    }

    /// Merge rows by sku: incoming rows win, other existing rows are kept
    pub fn merge(&mut self, incoming: Vec<Item>) -> Change {
        let mut index: HashMap<String, usize> = self
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| (item.sku.clone(), i))
            .collect();
        let before = self.items.len();
        let mut updated: HashSet<usize> = HashSet::new();

        for item in incoming {
            match index.get(&item.sku) {
                Some(&idx) => {
                    // Rows added earlier in this batch count as inserts, not updates
                    if idx < before {
                        updated.insert(idx);
                    }
                    self.items[idx] = item;
                }
                None => {
                    index.insert(item.sku.clone(), self.items.len());
                    self.items.push(item);
                }
            }
        }

        let inserted = self.items.len() - before;
        let updated = updated.len();
        info!(inserted, updated, total = self.items.len(), "merged import batch");
        Change::Merged { inserted, updated }
    }

    /// Whole-table replace, keeping the last row seen for each sku
    pub fn replace_all(&mut self, items: Vec<Item>) -> Change {
        self.items.clear();
        let mut index: HashMap<String, usize> = HashMap::new();
        for item in items {
            match index.get(&item.sku) {
                Some(&idx) => self.items[idx] = item,
                None => {
                    index.insert(item.sku.clone(), self.items.len());
                    self.items.push(item);
                }
            }
        }
        Change::Replaced {
            count: self.items.len(),
        }
    }

    /// Case-insensitive substring match on name or sku
    pub fn search(&self, query: &str) -> Vec<&Item> {
        if query.is_empty() {
            return self.items.iter().collect();
        }
        let needle = query.to_lowercase();
        self.items
            .iter()
            .filter(|item| {
                item.name.to_lowercase().contains(&needle)
                    || item.sku.to_lowercase().contains(&needle)
            })
            .collect()
    }
}
