use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::{BookingError, BookingResult};

/// A table in the dining room. The identifier is the table number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub id: u32,
    pub capacity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Table {
    pub fn new(id: u32, capacity: u32) -> Self {
        Self {
            id,
            capacity,
            label: None,
        }
    }

    pub fn seats(&self, party_size: u32) -> bool {
        self.capacity >= party_size
    }
}

/// Read-only set of tables, ordered by identifier.
#[derive(Debug, Clone, Default)]
pub struct TableCatalog {
    tables: BTreeMap<u32, Table>,
}

impl TableCatalog {
    /// Builds a catalog, rejecting duplicate identifiers and empty tables.
    pub fn new(tables: impl IntoIterator<Item = Table>) -> BookingResult<Self> {
        let mut by_id = BTreeMap::new();
        for table in tables {
            if table.capacity == 0 {
                return Err(BookingError::Validation(format!(
                    "Table {} must seat at least one guest",
                    table.id
                )));
            }
            let id = table.id;
            if by_id.insert(id, table).is_some() {
                return Err(BookingError::Validation(format!(
                    "Table {} appears more than once in the catalog",
                    id
                )));
            }
        }
        Ok(Self { tables: by_id })
    }

    pub fn get(&self, id: u32) -> Option<&Table> {
        self.tables.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn max_capacity(&self) -> Option<u32> {
        self.tables.values().map(|t| t.capacity).max()
    }

    pub fn to_vec(&self) -> Vec<Table> {
        self.tables.values().cloned().collect()
    }
}
