//! Batch CRUD over one collection.

use super::DocResult;
use log::{debug, error, log, Level};
use mongodb::bson::{Bson, Document};
use mongodb::sync::{Collection, Cursor};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::borrow::Borrow;
use std::time::Instant;

/// Builds `{ field: value }`. Dotted paths such as `account.type` address
/// nested fields.
pub fn field_filter(field: &str, value: impl Into<Bson>) -> Document {
    let mut filter = Document::new();
    filter.insert(field, value.into());
    filter
}

/// Result of [`DocumentCollection::insert_many`].
#[derive(Debug, Clone, PartialEq)]
pub struct InsertOutcome {
    /// Generated `_id` values in the order the records were supplied.
    pub inserted_ids: Vec<Bson>,
}

impl InsertOutcome {
    pub fn count(&self) -> usize {
        self.inserted_ids.len()
    }
}

/// Lazy, single-pass stream of query results.
///
/// Records are fetched from the server in batches as the iterator advances.
/// Once exhausted it cannot be restarted; run the query again instead.
pub struct DocumentCursor<T>
where
    T: Send + Sync,
{
    inner: Cursor<T>,
}

impl<T> Iterator for DocumentCursor<T>
where
    T: DeserializeOwned + Unpin + Send + Sync,
{
    type Item = DocResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|item| item.map_err(Into::into))
    }
}

/// Handle to one collection holding records of shape `T`.
pub struct DocumentCollection<T = Document>
where
    T: Send + Sync,
{
    inner: Collection<T>,
}

impl<T> DocumentCollection<T>
where
    T: Send + Sync,
{
    pub(super) fn new(inner: Collection<T>) -> Self {
        Self { inner }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Number of records currently stored.
    pub fn count(&self) -> DocResult<u64> {
        let started_at = Instant::now();
        let result = self.inner.count_documents(Document::new()).run();
        self.log_outcome(
            Level::Debug,
            "doc_count",
            started_at,
            result.as_ref().copied(),
        );
        Ok(result?)
    }

    /// Deletes the records where `field == value`. Others are left intact.
    pub fn delete_matching(&self, field: &str, value: impl Into<Bson>) -> DocResult<u64> {
        self.delete_many_with("doc_delete_matching", field_filter(field, value))
    }

    /// Deletes every record in the collection.
    pub fn delete_all(&self) -> DocResult<u64> {
        self.delete_many_with("doc_delete_all", Document::new())
    }

    /// Deletes at most one record where `field == value`. Returns 0 or 1.
    pub fn delete_one_by_field(&self, field: &str, value: impl Into<Bson>) -> DocResult<u64> {
        let started_at = Instant::now();
        let result = self.inner.delete_one(field_filter(field, value)).run();
        self.log_outcome(
            Level::Info,
            "doc_delete_one",
            started_at,
            result.as_ref().map(|r| r.deleted_count),
        );
        Ok(result?.deleted_count)
    }

    fn delete_many_with(&self, event: &str, filter: Document) -> DocResult<u64> {
        let started_at = Instant::now();
        let result = self.inner.delete_many(filter).run();
        self.log_outcome(
            Level::Info,
            event,
            started_at,
            result.as_ref().map(|r| r.deleted_count),
        );
        Ok(result?.deleted_count)
    }

    fn log_outcome<E: std::fmt::Display>(
        &self,
        level: Level,
        event: &str,
        started_at: Instant,
        outcome: Result<u64, &E>,
    ) {
        match outcome {
            Ok(count) => log!(
                level,
                "event={} module=docstore status=ok collection={} count={} duration_ms={}",
                event,
                self.inner.name(),
                count,
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event={} module=docstore status=error collection={} duration_ms={} error={}",
                event,
                self.inner.name(),
                started_at.elapsed().as_millis(),
                err
            ),
        }
    }
}

impl<T> DocumentCollection<T>
where
    T: Serialize + Send + Sync,
{
    /// Inserts all records as one batch.
    ///
    /// The batch is rejected as a whole when the server refuses any record.
    pub fn insert_many<I>(&self, records: I) -> DocResult<InsertOutcome>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        let started_at = Instant::now();
        let result = self.inner.insert_many(records).run();
        self.log_outcome(
            Level::Info,
            "doc_insert_many",
            started_at,
            result.as_ref().map(|r| r.inserted_ids.len() as u64),
        );

        let mut indexed: Vec<(usize, Bson)> = result?.inserted_ids.into_iter().collect();
        indexed.sort_by_key(|(index, _)| *index);
        Ok(InsertOutcome {
            inserted_ids: indexed.into_iter().map(|(_, id)| id).collect(),
        })
    }
}

impl<T> DocumentCollection<T>
where
    T: DeserializeOwned + Unpin + Send + Sync,
{
    /// Lazily streams records where `field == value`.
    ///
    /// No match yields an empty cursor, not an error.
    pub fn find_by_field(
        &self,
        field: &str,
        value: impl Into<Bson>,
    ) -> DocResult<DocumentCursor<T>> {
        self.find_with(field_filter(field, value))
    }

    /// Lazily streams every record in the collection.
    pub fn find_all(&self) -> DocResult<DocumentCursor<T>> {
        self.find_with(Document::new())
    }

    fn find_with(&self, filter: Document) -> DocResult<DocumentCursor<T>> {
        let started_at = Instant::now();
        let filter_keys = filter.keys().cloned().collect::<Vec<_>>().join(",");
        match self.inner.find(filter).run() {
            Ok(inner) => {
                debug!(
                    "event=doc_find module=docstore status=ok collection={} filter_keys={} duration_ms={}",
                    self.inner.name(),
                    filter_keys,
                    started_at.elapsed().as_millis()
                );
                Ok(DocumentCursor { inner })
            }
            Err(err) => {
                error!(
                    "event=doc_find module=docstore status=error collection={} filter_keys={} duration_ms={} error={}",
                    self.inner.name(),
                    filter_keys,
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::field_filter;
    use mongodb::bson::{doc, Bson};

    #[test]
    fn field_filter_keeps_dotted_path_as_single_key() {
        let filter = field_filter("account.type", "Savings");
        assert_eq!(filter, doc! { "account.type": "Savings" });
        assert_eq!(filter.len(), 1);
    }

    #[test]
    fn field_filter_preserves_value_type() {
        let filter = field_filter("account.number", 3_i64);
        assert_eq!(filter.get("account.number"), Some(&Bson::Int64(3)));
    }
}
