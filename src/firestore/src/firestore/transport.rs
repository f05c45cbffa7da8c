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

use super::from_status::to_gax_error;
use super::stub::{BatchGetStream, Stub};
use crate::error::ConfigError;
use crate::google::firestore::v1::{BatchGetDocumentsRequest, BatchGetDocumentsResponse};
use crate::{DatabaseName, Error, Result};
use futures::StreamExt;
use gax::client_builder::Error as BuilderError;
use gax::client_builder::Result as BuilderResult;
use google_cloud_auth::credentials::{CacheableResource, Credentials};
use http::HeaderMap;
use http::header::{HeaderName, HeaderValue};
use tonic_prost::ProstCodec;

pub(crate) type ClientConfig = gax::client_builder::internal::ClientConfig<Credentials>;
type InnerClient = tonic::client::Grpc<tonic::transport::Channel>;

/// Sends `BatchGetDocuments` requests over gRPC.
#[derive(Clone, Debug)]
pub(crate) struct Transport {
    inner: InnerClient,
    credentials: Credentials,
    request_params: HeaderValue,
}

impl Transport {
    pub(crate) async fn new(
        config: ClientConfig,
        database: &DatabaseName,
        default_endpoint: &str,
    ) -> BuilderResult<Self> {
        if database.project_id().is_empty() {
            return Err(BuilderError::transport(ConfigError::EmptyProjectId));
        }
        if database.database_id().is_empty() {
            return Err(BuilderError::transport(ConfigError::EmptyDatabaseId));
        }
        let credentials = match config.cred {
            Some(c) => c,
            None => google_cloud_auth::credentials::Builder::default()
                .build()
                .map_err(BuilderError::cred)?,
        };
        let inner = Self::make_inner(config.endpoint, default_endpoint)?;
        let request_params = HeaderValue::from_str(&format!("database={database}"))
            .map_err(BuilderError::transport)?;
        Ok(Self {
            inner,
            credentials,
            request_params,
        })
    }

    fn make_inner(endpoint: Option<String>, default_endpoint: &str) -> BuilderResult<InnerClient> {
        use tonic::transport::{ClientTlsConfig, Endpoint};
        let endpoint = endpoint.unwrap_or_else(|| default_endpoint.to_string());
        let secure = endpoint.starts_with("https://");
        let mut endpoint = Endpoint::from_shared(endpoint).map_err(BuilderError::transport)?;
        if secure {
            endpoint = endpoint
                .tls_config(ClientTlsConfig::new().with_enabled_roots())
                .map_err(BuilderError::transport)?;
        }
        // Connect on first use, building a client does not need the network.
        Ok(tonic::client::Grpc::new(endpoint.connect_lazy()))
    }

    async fn make_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.append(
            HeaderName::from_static("x-goog-api-client"),
            HeaderValue::from_static(&crate::info::X_GOOG_API_CLIENT_HEADER),
        );
        headers.append(
            HeaderName::from_static("x-goog-request-params"),
            self.request_params.clone(),
        );
        let auth_headers = match self
            .credentials
            .headers(http::Extensions::new())
            .await
            .map_err(Error::authentication)?
        {
            CacheableResource::New { data, .. } => data,
            CacheableResource::NotModified => {
                unreachable!("headers are not cached");
            }
        };
        for (key, value) in auth_headers.into_iter() {
            if let Some(key) = key {
                headers.append(key, value);
            }
        }
        Ok(headers)
    }
}

#[async_trait::async_trait]
impl Stub for Transport {
    async fn batch_get_documents(
        &self,
        req: BatchGetDocumentsRequest,
        options: gax::options::RequestOptions,
    ) -> Result<BatchGetStream> {
        let headers = self.make_headers().await?;
        let extensions = {
            let mut e = tonic::Extensions::new();
            e.insert(tonic::GrpcMethod::new(
                "google.firestore.v1.Firestore",
                "BatchGetDocuments",
            ));
            e
        };
        let metadata = tonic::metadata::MetadataMap::from_headers(headers);
        let mut request = tonic::Request::from_parts(metadata, extensions, req);
        if let Some(timeout) = options.attempt_timeout() {
            request.set_timeout(*timeout);
        }
        let path = http::uri::PathAndQuery::from_static(
            "/google.firestore.v1.Firestore/BatchGetDocuments",
        );
        let codec = ProstCodec::<BatchGetDocumentsRequest, BatchGetDocumentsResponse>::default();
        let mut inner = self.inner.clone();
        inner.ready().await.map_err(Error::io)?;
        let response = inner
            .server_streaming(request, path, codec)
            .await
            .map_err(to_gax_error)?;
        Ok(response.into_inner().boxed())
    }
}
