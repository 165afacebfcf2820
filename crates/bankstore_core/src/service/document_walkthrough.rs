//! Insert → query → delete pass over the document collection.

use super::{ServiceResult, SEPARATOR};
use crate::docstore::DocumentCollection;
use crate::model::document::ClientDocument;
use crate::sample;
use std::io::Write;

const LOOKUP_NAME: &str = "Naruto Uzumaki";
const LOOKUP_ACCOUNT_TYPE: &str = "Savings";
const REMOVED_NAME: &str = "Luffy Monkey D.";

/// Seeds the sample clients into a collection, queries them and then empties
/// the collection again.
pub struct DocumentWalkthrough<'a> {
    collection: &'a DocumentCollection<ClientDocument>,
}

impl<'a> DocumentWalkthrough<'a> {
    pub fn new(collection: &'a DocumentCollection<ClientDocument>) -> Self {
        Self { collection }
    }

    /// Runs every step once, writing one line per result to `out`.
    pub fn run(&self, out: &mut impl Write) -> ServiceResult<()> {
        let outcome = self.collection.insert_many(sample::documents())?;
        let ids = outcome
            .inserted_ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(out, "{} documents inserted: [{}]", outcome.count(), ids)?;

        writeln!(out, "Clients named {LOOKUP_NAME}:")?;
        for client in self.collection.find_by_field("name", LOOKUP_NAME)? {
            writeln!(out, "{}", client?)?;
        }

        writeln!(out, "Clients with {LOOKUP_ACCOUNT_TYPE} accounts:")?;
        for client in self
            .collection
            .find_by_field("account.type", LOOKUP_ACCOUNT_TYPE)?
        {
            writeln!(out, "{}", client?)?;
        }

        writeln!(out, "{SEPARATOR}")?;
        for client in self.collection.find_all()? {
            writeln!(out, "{}", client?)?;
        }
        writeln!(out, "{SEPARATOR}")?;

        let removed = self.collection.delete_one_by_field("name", REMOVED_NAME)?;
        writeln!(out, "{removed} document deleted: {REMOVED_NAME}")?;

        let cleared = self.collection.delete_all()?;
        writeln!(out, "{cleared} documents deleted")?;
        Ok(())
    }
}
