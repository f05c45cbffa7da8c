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

use crate::Result;
use crate::google::firestore::v1::{BatchGetDocumentsRequest, BatchGetDocumentsResponse};
use futures::stream::BoxStream;

/// The responses of a `BatchGetDocuments` RPC, in the order the service sends them.
pub(crate) type BatchGetStream = BoxStream<'static, tonic::Result<BatchGetDocumentsResponse>>;

/// An internal trait for mocking the transport layer.
#[async_trait::async_trait]
pub(crate) trait Stub: std::fmt::Debug + Send + Sync {
    async fn batch_get_documents(
        &self,
        req: BatchGetDocumentsRequest,
        options: gax::options::RequestOptions,
    ) -> Result<BatchGetStream>;
}
