//! Scripted walkthroughs over each store.
//!
//! # Responsibility
//! - Seed sample data, query it and report each step as a text line.
//! - Keep all seeding out of module load; callers pick the moment and sink.
//!
//! # Invariants
//! - Store errors end the walkthrough and are returned unchanged.

use crate::db::DbError;
use crate::docstore::DocStoreError;
use crate::repo::bank_repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod document_walkthrough;
mod relational_walkthrough;

pub use document_walkthrough::DocumentWalkthrough;
pub use relational_walkthrough::RelationalWalkthrough;

const SEPARATOR: &str = "---------------------------------------------------------";

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug)]
pub enum ServiceError {
    Output(std::io::Error),
    Document(DocStoreError),
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Output(err) => write!(f, "failed to write walkthrough output: {err}"),
            Self::Document(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Output(err) => Some(err),
            Self::Document(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(value: std::io::Error) -> Self {
        Self::Output(value)
    }
}

impl From<DocStoreError> for ServiceError {
    fn from(value: DocStoreError) -> Self {
        Self::Document(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<DbError> for ServiceError {
    fn from(value: DbError) -> Self {
        Self::Repo(RepoError::Db(value))
    }
}
