//! Client and database handles.

use super::collection::DocumentCollection;
use super::{DocResult, DocStoreError};
use crate::config::DocumentStoreConfig;
use log::{error, info};
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::sync::{Client, Database};
use std::time::Instant;

const APP_NAME: &str = "bankstore";

/// Owned connection to a MongoDB deployment.
///
/// Released by [`DocumentStore::close`] or on drop.
pub struct DocumentStore {
    client: Client,
}

impl DocumentStore {
    /// Connects with default settings and a reachability ping.
    ///
    /// # Errors
    /// - `DocStoreError::Connection` when the string is malformed or no server
    ///   answers within the server-selection timeout.
    pub fn connect(uri: &str) -> DocResult<Self> {
        Self::connect_with(&DocumentStoreConfig::with_uri(uri))
    }

    /// Connects using every setting in `config`.
    pub fn connect_with(config: &DocumentStoreConfig) -> DocResult<Self> {
        let started_at = Instant::now();
        info!(
            "event=doc_connect module=docstore status=start ping={}",
            config.ping_on_connect
        );

        match open_client(config) {
            Ok(client) => {
                info!(
                    "event=doc_connect module=docstore status=ok duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(Self { client })
            }
            Err(err) => {
                error!(
                    "event=doc_connect module=docstore status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(DocStoreError::Connection(err))
            }
        }
    }

    /// Database handle by name. Never fails; nothing is sent to the server.
    pub fn database(&self, name: &str) -> DocumentDatabase {
        DocumentDatabase {
            inner: self.client.database(name),
        }
    }

    /// Releases the connection pool.
    pub fn close(self) {
        info!("event=doc_close module=docstore status=ok");
        drop(self.client);
    }
}

fn open_client(config: &DocumentStoreConfig) -> mongodb::error::Result<Client> {
    let mut options = ClientOptions::parse(config.uri.as_str()).run()?;
    options.server_selection_timeout = Some(config.server_selection_timeout);
    if options.app_name.is_none() {
        options.app_name = Some(APP_NAME.to_string());
    }

    let client = Client::with_options(options)?;
    if config.ping_on_connect {
        client.database("admin").run_command(doc! { "ping": 1 }).run()?;
    }
    Ok(client)
}

/// Named database within a [`DocumentStore`].
#[derive(Clone)]
pub struct DocumentDatabase {
    inner: Database,
}

impl DocumentDatabase {
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Collection handle by name, typed by record shape `T`.
    ///
    /// Like [`DocumentStore::database`], this is a pure lookup.
    pub fn collection<T>(&self, name: &str) -> DocumentCollection<T>
    where
        T: Send + Sync,
    {
        DocumentCollection::new(self.inner.collection::<T>(name))
    }
}
