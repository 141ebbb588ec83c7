//! Sled-backed persistence for address records.

use std::path::Path;

use sled::transaction::{ConflictableTransactionError, TransactionError, Transactional};
use sled::{Db, Tree};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::models::AddressRecord;

const RECORDS_TREE: &str = "addresses";
const QUERY_INDEX_TREE: &str = "address_by_query";

/// Errors produced by the address store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage failure: {0}")]
    Db(#[from] sled::Error),

    #[error("record encoding failure: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Persistent store for address records.
///
/// Records live in one tree keyed by id, serialized as JSON documents. A
/// second tree maps a record's `query` to its id so distance upserts can
/// find existing rows by their natural key.
#[derive(Clone)]
pub struct AddressStore {
    db: Db,
    records: Tree,
    by_query: Tree,
}

impl AddressStore {
    /// Open (or create) a store at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path)?;
        let records = db.open_tree(RECORDS_TREE)?;
        let by_query = db.open_tree(QUERY_INDEX_TREE)?;

        Ok(Self {
            db,
            records,
            by_query,
        })
    }

    /// Insert a new record row.
    ///
    /// Geocode and reverse-geocode paths always create; there is no
    /// deduplication by address text.
    pub fn create(&self, record: AddressRecord) -> Result<AddressRecord, StoreError> {
        let encoded = serde_json::to_vec(&record)?;
        self.records.insert(record.id.as_bytes(), encoded)?;
        self.db.flush()?;

        debug!(id = %record.id, query = %record.query, "Created record");
        Ok(record)
    }

    /// Find-or-create the record for a distance query key and set its
    /// distance, as a single atomic transaction across both trees.
    ///
    /// Repeated requests for the same key overwrite the prior distance on the
    /// same row (last-write-wins); concurrent identical requests cannot
    /// produce duplicate rows.
    pub fn upsert_distance(
        &self,
        query: &str,
        distance_km: f64,
    ) -> Result<AddressRecord, StoreError> {
        let seed = AddressRecord::new_distance(query);

        let result: Result<AddressRecord, TransactionError<StoreError>> =
            (&self.records, &self.by_query).transaction(|(records, by_query)| {
                let mut record = match by_query.get(query.as_bytes())? {
                    Some(id) => match records.get(&id)? {
                        Some(raw) => decode(&raw)?,
                        None => seed.clone(),
                    },
                    None => seed.clone(),
                };

                record.distance_km = Some(distance_km);

                let encoded = encode(&record)?;
                records.insert(record.id.as_bytes().to_vec(), encoded)?;
                by_query.insert(query.as_bytes().to_vec(), record.id.as_bytes().to_vec())?;

                Ok(record)
            });

        let record = result.map_err(flatten_txn)?;
        self.db.flush()?;

        debug!(id = %record.id, query = %record.query, distance_km, "Upserted distance record");
        Ok(record)
    }

    /// Fetch a record by id.
    pub fn get(&self, id: Uuid) -> Result<Option<AddressRecord>, StoreError> {
        match self.records.get(id.as_bytes())? {
            Some(raw) => Ok(Some(serde_json::from_slice(&raw)?)),
            None => Ok(None),
        }
    }

    /// Fetch the record stored under a distance query key.
    pub fn find_by_query(&self, query: &str) -> Result<Option<AddressRecord>, StoreError> {
        let Some(id) = self.by_query.get(query.as_bytes())? else {
            return Ok(None);
        };

        match self.records.get(&id)? {
            Some(raw) => Ok(Some(serde_json::from_slice(&raw)?)),
            None => Ok(None),
        }
    }

    /// Number of stored records.
    pub fn count(&self) -> usize {
        self.records.len()
    }
}

fn encode(
    record: &AddressRecord,
) -> Result<Vec<u8>, ConflictableTransactionError<StoreError>> {
    serde_json::to_vec(record).map_err(|e| ConflictableTransactionError::Abort(StoreError::Codec(e)))
}

fn decode(raw: &[u8]) -> Result<AddressRecord, ConflictableTransactionError<StoreError>> {
    serde_json::from_slice(raw)
        .map_err(|e| ConflictableTransactionError::Abort(StoreError::Codec(e)))
}

fn flatten_txn(err: TransactionError<StoreError>) -> StoreError {
    match err {
        TransactionError::Abort(e) => e,
        TransactionError::Storage(e) => StoreError::Db(e),
    }
}
