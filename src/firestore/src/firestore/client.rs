// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::client_builder::ClientBuilder;
use super::get_all::GetAll;
use super::stub::Stub;
use super::transport::Transport;
use crate::model::ReadOptions;
use crate::{CollectionReference, DatabaseName, DocumentReference};
use gax::client_builder::Result as BuilderResult;
use std::sync::Arc;

/// A client for the [Cloud Firestore] API.
///
/// Use this client to create references to documents and collections, and to
/// read many documents in a single request.
///
/// # Example
/// ```
/// # use google_cloud_firestore::client::Firestore;
/// # async fn sample() -> anyhow::Result<()> {
/// let client = Firestore::builder().with_project_id("my-project").build().await?;
/// let snapshots = client
///     .get_all([client.doc("cities/SF"), client.doc("cities/LA")])
///     .send()
///     .await?;
/// println!("{snapshots:?}");
/// # Ok(()) }
/// ```
///
/// # Configuration
///
/// To configure a `Firestore` client use the `with_*` methods in the type
/// returned by [builder()][Firestore::builder]. The default configuration
/// should work for most applications. Common configuration changes include:
///
/// * [with_database_id()]: by default this client reads from the `(default)`
///   database.
/// * [with_endpoint()]: by default this client uses the global default
///   endpoint (`https://firestore.googleapis.com`).
/// * [with_credentials()]: by default this client uses
///   [Application Default Credentials]. Applications using custom
///   authentication may need to override this default.
///
/// # Pooling and Cloning
///
/// `Firestore` holds a connection pool internally, it is advised to
/// create one and then reuse it.  You do not need to wrap `Firestore` in
/// an [Rc](std::rc::Rc) or [Arc] to reuse it, because it already uses an `Arc`
/// internally.
///
/// [application default credentials]: https://cloud.google.com/docs/authentication#adc
/// [cloud firestore]: https://cloud.google.com/firestore
/// [with_database_id()]: ClientBuilder::with_database_id
/// [with_endpoint()]: ClientBuilder::with_endpoint
/// [with_credentials()]: ClientBuilder::with_credentials
#[derive(Clone, Debug)]
pub struct Firestore {
    inner: Arc<dyn Stub>,
    database: Arc<DatabaseName>,
    read_options: Option<ReadOptions>,
    uses_emulator: bool,
}

impl Firestore {
    /// Returns a builder for [Firestore].
    ///
    /// # Example
    /// ```
    /// # use google_cloud_firestore::client::Firestore;
    /// # async fn sample() -> anyhow::Result<()> {
    /// let client = Firestore::builder().with_project_id("my-project").build().await?;
    /// # Ok(()) }
    /// ```
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub(crate) async fn new(mut builder: ClientBuilder) -> BuilderResult<Self> {
        let (database, uses_emulator) = builder.resolve();
        let transport = Transport::new(builder.config, &database, crate::DEFAULT_HOST).await?;
        tracing::debug!("created Firestore client for {database}");
        Ok(Self {
            inner: Arc::new(transport),
            database: Arc::new(database),
            read_options: None,
            uses_emulator,
        })
    }

    #[cfg(test)]
    pub(crate) fn from_stub<T>(stub: T, database: DatabaseName) -> Self
    where
        T: Stub + 'static,
    {
        Self {
            inner: Arc::new(stub),
            database: Arc::new(database),
            read_options: None,
            uses_emulator: false,
        }
    }

    /// The database used by this client.
    pub fn database(&self) -> &DatabaseName {
        &self.database
    }

    /// Returns true if this client connects to the Firestore emulator.
    pub fn uses_emulator(&self) -> bool {
        self.uses_emulator
    }

    /// Returns a copy of this client where reads use `options` by default.
    ///
    /// Individual requests can override this value.
    ///
    /// # Example
    /// ```
    /// # use google_cloud_firestore::client::Firestore;
    /// # use google_cloud_firestore::model::ReadOptions;
    /// # fn sample(client: &Firestore) {
    /// let read_time = wkt::Timestamp::clamp(1_700_000_000, 0);
    /// let snapshot_client = client.with_read_options(ReadOptions::ReadTime(read_time));
    /// # }
    /// ```
    pub fn with_read_options(&self, options: ReadOptions) -> Self {
        Self {
            read_options: Some(options),
            ..self.clone()
        }
    }

    pub(crate) fn read_options(&self) -> Option<&ReadOptions> {
        self.read_options.as_ref()
    }

    pub(crate) fn stub(&self) -> Arc<dyn Stub> {
        self.inner.clone()
    }

    pub(crate) fn database_arc(&self) -> Arc<DatabaseName> {
        self.database.clone()
    }

    /// Returns a reference to the collection at `path`, relative to the
    /// database root.
    ///
    /// Returns `None` if `path` does not name a collection, that is, if it is
    /// empty, contains empty segments, or has an even number of segments.
    pub fn collection<T: AsRef<[u8]>>(&self, path: T) -> Option<CollectionReference> {
        CollectionReference::new(self.database.clone(), path.as_ref())
    }

    /// Returns a reference to the document at `path`, relative to the
    /// database root.
    ///
    /// Returns `None` if `path` does not name a document, that is, if it is
    /// empty, contains empty segments, or has an odd number of segments.
    pub fn doc<T: AsRef<[u8]>>(&self, path: T) -> Option<DocumentReference> {
        DocumentReference::new(self.database.clone(), path.as_ref())
    }

    /// Reads many documents in a single request.
    ///
    /// The result contains one [DocumentSnapshot][crate::DocumentSnapshot]
    /// per input reference, in the same order, including repeated
    /// references. Documents that do not exist produce snapshots where
    /// [exists()][crate::DocumentSnapshot::exists] is `false`.
    ///
    /// A `None` reference fails the request before anything is sent.
    ///
    /// # Example
    /// ```
    /// # use google_cloud_firestore::client::Firestore;
    /// # async fn sample(client: &Firestore) -> anyhow::Result<()> {
    /// let cities = client.collection("cities").expect("valid collection path");
    /// let snapshots = client
    ///     .get_all([cities.doc("SF"), cities.doc("LA"), cities.doc("SF")])
    ///     .send()
    ///     .await?;
    /// assert_eq!(snapshots.len(), 3);
    /// # Ok(()) }
    /// ```
    pub fn get_all<I, D>(&self, references: I) -> GetAll
    where
        I: IntoIterator<Item = D>,
        D: Into<Option<DocumentReference>>,
    {
        GetAll::new(self, references.into_iter().map(Into::into).collect())
    }
}
