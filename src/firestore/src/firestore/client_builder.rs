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

use super::client::Firestore;
use super::transport::ClientConfig;
use crate::DatabaseName;
use crate::EMULATOR_HOST_ENV;
use gax::client_builder::Result as BuilderResult;
use google_cloud_auth::credentials::Credentials;

/// The environment variable consulted when no project id is configured.
const PROJECT_ENV: &str = "GOOGLE_CLOUD_PROJECT";

/// A builder for [Firestore].
///
/// # Example
/// ```
/// # use google_cloud_firestore::client::Firestore;
/// # async fn sample() -> anyhow::Result<()> {
/// let builder = Firestore::builder();
/// let client = builder
///     .with_project_id("my-project")
///     .with_endpoint("https://firestore.googleapis.com")
///     .build()
///     .await?;
/// # Ok(()) }
/// ```
pub struct ClientBuilder {
    pub(crate) config: ClientConfig,
    pub(crate) project_id: Option<String>,
    pub(crate) database_id: Option<String>,
}

impl ClientBuilder {
    pub(crate) fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            project_id: None,
            database_id: None,
        }
    }

    /// Creates a new client.
    ///
    /// If the `FIRESTORE_EMULATOR_HOST` environment variable is set the client
    /// connects to the emulator at that address, using plaintext and anonymous
    /// credentials. The endpoint and credentials configured in this builder
    /// are ignored in that case.
    ///
    /// # Example
    /// ```
    /// # use google_cloud_firestore::client::Firestore;
    /// # async fn sample() -> anyhow::Result<()> {
    /// let client = Firestore::builder().with_project_id("my-project").build().await?;
    /// # Ok(()) }
    /// ```
    pub async fn build(self) -> BuilderResult<Firestore> {
        Firestore::new(self).await
    }

    /// Sets the project id.
    ///
    /// Defaults to the value of the `GOOGLE_CLOUD_PROJECT` environment
    /// variable. Building a client without a project id fails.
    pub fn with_project_id<V: Into<String>>(mut self, v: V) -> Self {
        self.project_id = Some(v.into());
        self
    }

    /// Sets the database id, the default is `(default)`.
    ///
    /// # Example
    /// ```
    /// # use google_cloud_firestore::client::Firestore;
    /// # async fn sample() -> anyhow::Result<()> {
    /// let client = Firestore::builder()
    ///     .with_project_id("my-project")
    ///     .with_database_id("my-database")
    ///     .build()
    ///     .await?;
    /// # Ok(()) }
    /// ```
    pub fn with_database_id<V: Into<String>>(mut self, v: V) -> Self {
        self.database_id = Some(v.into());
        self
    }

    /// Sets the endpoint.
    ///
    /// Endpoints starting with `http://` use plaintext connections.
    ///
    /// # Example
    /// ```
    /// # use google_cloud_firestore::client::Firestore;
    /// # async fn sample() -> anyhow::Result<()> {
    /// let client = Firestore::builder()
    ///     .with_project_id("my-project")
    ///     .with_endpoint("https://private.googleapis.com")
    ///     .build()
    ///     .await?;
    /// # Ok(()) }
    /// ```
    pub fn with_endpoint<V: Into<String>>(mut self, v: V) -> Self {
        self.config.endpoint = Some(v.into());
        self
    }

    /// Configures the authentication credentials.
    ///
    /// More information about valid credentials types can be found in the
    /// [google-cloud-auth] crate documentation.
    ///
    /// # Example
    /// ```
    /// # use google_cloud_firestore::client::Firestore;
    /// # async fn sample() -> anyhow::Result<()> {
    /// use google_cloud_auth::credentials::anonymous;
    /// let client = Firestore::builder()
    ///     .with_project_id("my-project")
    ///     .with_credentials(anonymous::Builder::new().build())
    ///     .build()
    ///     .await?;
    /// # Ok(()) }
    /// ```
    ///
    /// [google-cloud-auth]: https://docs.rs/google-cloud-auth
    pub fn with_credentials<V: Into<Credentials>>(mut self, v: V) -> Self {
        self.config.cred = Some(v.into());
        self
    }

    /// Returns the database name and whether the emulator is in use.
    ///
    /// Applies the emulator overrides to the configuration.
    pub(crate) fn resolve(&mut self) -> (DatabaseName, bool) {
        let project_id = self
            .project_id
            .take()
            .or_else(|| std::env::var(PROJECT_ENV).ok())
            .unwrap_or_default();
        let database_id = self
            .database_id
            .take()
            .unwrap_or_else(|| DatabaseName::DEFAULT_DATABASE_ID.to_string());
        let emulator = std::env::var(EMULATOR_HOST_ENV)
            .ok()
            .filter(|host| !host.is_empty());
        let uses_emulator = emulator.is_some();
        if let Some(host) = emulator {
            tracing::debug!("using the Firestore emulator at {host}");
            self.config.endpoint = Some(format!("http://{host}"));
            self.config.cred =
                Some(google_cloud_auth::credentials::anonymous::Builder::new().build());
        }
        (DatabaseName::new(project_id, database_id), uses_emulator)
    }
}
