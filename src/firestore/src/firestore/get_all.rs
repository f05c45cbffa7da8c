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
use super::from_status::{cancelled, to_gax_error};
use super::stub::{BatchGetStream, Stub};
use crate::convert::{FromProto, ToProto};
use crate::error::GetAllError;
use crate::google::firestore::v1::batch_get_documents_response::Result as BatchGetResult;
use crate::google::firestore::v1::{BatchGetDocumentsRequest, DocumentMask};
use crate::model::{Document, ReadOptions};
use crate::{DatabaseName, DocumentReference, DocumentSnapshot, Error, Result};
use futures::StreamExt;
use gax::options::RequestOptions;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// A request builder for [Firestore::get_all].
///
/// # Example
/// ```
/// # use google_cloud_firestore::client::Firestore;
/// # async fn sample(client: &Firestore) -> anyhow::Result<()> {
/// use std::time::Duration;
/// let snapshots = client
///     .get_all([client.doc("cities/SF"), client.doc("cities/LA")])
///     .with_field_mask(["name", "population"])
///     .with_attempt_timeout(Duration::from_secs(10))
///     .send()
///     .await?;
/// # Ok(()) }
/// ```
#[derive(Debug)]
pub struct GetAll {
    inner: Arc<dyn Stub>,
    database: Arc<DatabaseName>,
    references: Vec<Option<DocumentReference>>,
    read_options: Option<ReadOptions>,
    mask: Option<Vec<String>>,
    cancellation: Option<CancellationToken>,
    options: RequestOptions,
}

impl GetAll {
    pub(crate) fn new(client: &Firestore, references: Vec<Option<DocumentReference>>) -> Self {
        Self {
            inner: client.stub(),
            database: client.database_arc(),
            references,
            read_options: client.read_options().cloned(),
            mask: None,
            cancellation: None,
            options: RequestOptions::default(),
        }
    }

    /// Reads the documents at a fixed time, or within a transaction.
    ///
    /// Overrides any read options configured in the client.
    pub fn with_read_options(mut self, v: ReadOptions) -> Self {
        self.read_options = Some(v);
        self
    }

    /// Only return the given fields of each document.
    pub fn with_field_mask<I, V>(mut self, v: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.mask = Some(v.into_iter().map(Into::into).collect());
        self
    }

    /// Abandon the request when `token` is cancelled.
    ///
    /// A cancelled request fails with a service error with code `CANCELLED`.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Limits the time spent on the request, including reading all the
    /// responses.
    ///
    /// Requests that exceed this time fail with a timeout error.
    pub fn with_attempt_timeout<V: Into<Duration>>(mut self, v: V) -> Self {
        self.options.set_attempt_timeout(v);
        self
    }

    /// Sends the request.
    ///
    /// Returns one snapshot per input reference, in input order.
    pub async fn send(self) -> Result<Vec<DocumentSnapshot>> {
        let plan = Plan::new(self.references).map_err(GetAllError::into_error)?;
        if plan.paths.is_empty() {
            return Ok(Vec::new());
        }
        let request = BatchGetDocumentsRequest {
            database: self.database.to_string(),
            documents: plan.paths.clone(),
            mask: self.mask.map(|field_paths| DocumentMask { field_paths }),
            consistency_selector: self.read_options.map(ToProto::to_proto),
            ..Default::default()
        };
        tracing::debug!(
            requested = plan.references.len(),
            unique = plan.paths.len(),
            "sending BatchGetDocuments request for {}",
            self.database
        );

        let timeout = *self.options.attempt_timeout();
        let inner = self.inner;
        let options = self.options;
        let attempt = async move {
            let stream = inner.batch_get_documents(request, options).await?;
            plan.resolve(stream).await
        };
        let attempt = async move {
            match timeout {
                None => attempt.await,
                Some(t) => tokio::time::timeout(t, attempt)
                    .await
                    .map_err(Error::timeout)?,
            }
        };
        let token = self.cancellation.unwrap_or_default();
        tokio::select! {
            biased;
            _ = token.cancelled() => Err(cancelled()),
            r = attempt => r,
        }
    }
}

/// The validated references and the unique paths sent to the service.
#[derive(Debug)]
struct Plan {
    references: Vec<DocumentReference>,
    // The full resource names, without duplicates, in first-seen order.
    paths: Vec<String>,
    // For each reference, the index of its path in `paths`.
    slots: Vec<usize>,
}

#[derive(Debug)]
enum Resolution {
    Found(Arc<Document>, Option<wkt::Timestamp>),
    Missing(Option<wkt::Timestamp>),
}

impl Plan {
    fn new(references: Vec<Option<DocumentReference>>) -> std::result::Result<Self, GetAllError> {
        let mut index = HashMap::new();
        let mut paths = Vec::new();
        let mut slots = Vec::with_capacity(references.len());
        let references = references
            .into_iter()
            .enumerate()
            .map(|(position, r)| {
                let r = r.ok_or(GetAllError::NilReference { position })?;
                let path = r
                    .checked_path()
                    .map_err(|_| GetAllError::InvalidUtf8 { position })?;
                let slot = *index.entry(path).or_insert_with_key(|path: &String| {
                    paths.push(path.clone());
                    paths.len() - 1
                });
                slots.push(slot);
                Ok(r)
            })
            .collect::<std::result::Result<Vec<_>, GetAllError>>()?;
        Ok(Self {
            references,
            paths,
            slots,
        })
    }

    /// Consumes the response stream and builds the snapshots in input order.
    async fn resolve(self, mut stream: BatchGetStream) -> Result<Vec<DocumentSnapshot>> {
        let index: HashMap<&str, usize> = self
            .paths
            .iter()
            .enumerate()
            .map(|(i, p)| (p.as_str(), i))
            .collect();
        let mut resolved: Vec<Option<Resolution>> = self.paths.iter().map(|_| None).collect();
        while let Some(response) = stream.next().await {
            let response = response.map_err(to_gax_error)?;
            let read_time = response
                .read_time
                .map(FromProto::cnv)
                .transpose()
                .map_err(Error::deser)?;
            let (path, resolution) = match response.result {
                Some(BatchGetResult::Found(document)) => {
                    let path = document.name.clone();
                    let document: Document = document.cnv().map_err(Error::deser)?;
                    (path, Resolution::Found(Arc::new(document), read_time))
                }
                Some(BatchGetResult::Missing(path)) => (path, Resolution::Missing(read_time)),
                None => return Err(integrity(GetAllError::EmptyResult)),
            };
            let Some(&slot) = index.get(path.as_str()) else {
                return Err(integrity(GetAllError::Unexpected { path }));
            };
            match (&resolved[slot], &resolution) {
                (None, _) => resolved[slot] = Some(resolution),
                (Some(Resolution::Found(..)), Resolution::Missing(_))
                | (Some(Resolution::Missing(_)), Resolution::Found(..)) => {
                    return Err(integrity(GetAllError::Conflict { path }));
                }
                (Some(_), _) => return Err(integrity(GetAllError::Duplicate { path })),
            }
        }

        let resolved = resolved
            .into_iter()
            .zip(self.paths.iter())
            .map(|(r, path)| {
                r.ok_or_else(|| GetAllError::Unresolved { path: path.clone() })
            })
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(integrity)?;

        let snapshots = self
            .references
            .into_iter()
            .zip(self.slots)
            .map(|(reference, slot)| match &resolved[slot] {
                Resolution::Found(document, read_time) => {
                    DocumentSnapshot::found(reference, document.clone(), read_time.clone())
                }
                Resolution::Missing(read_time) => {
                    DocumentSnapshot::missing(reference, read_time.clone())
                }
            })
            .collect();
        Ok(snapshots)
    }
}

fn integrity(e: GetAllError) -> Error {
    tracing::warn!("inconsistent BatchGetDocuments response: {e}");
    e.into_error()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::firestore::stub::tests::MockStub;
    use crate::google::firestore::v1 as pb;
    use crate::google::firestore::v1::BatchGetDocumentsResponse;
    use crate::google::firestore::v1::batch_get_documents_request::ConsistencySelector;
    use crate::model::Value;
    use gax::error::rpc::Code;
    use pretty_assertions::assert_eq;

    const DB: &str = "projects/projectID/databases/(default)";

    fn test_client(stub: MockStub) -> Firestore {
        Firestore::from_stub(stub, DatabaseName::new("projectID", "(default)"))
    }

    fn name(short: &str) -> String {
        format!("{DB}/documents/{short}")
    }

    fn timestamp(seconds: i64) -> prost_types::Timestamp {
        prost_types::Timestamp { seconds, nanos: 0 }
    }

    /// A response with the document at `short`, read at `read_time` seconds.
    fn found(short: &str, f: i64, read_time: i64) -> tonic::Result<BatchGetDocumentsResponse> {
        let document = pb::Document {
            name: name(short),
            fields: [(
                "f".to_string(),
                pb::Value {
                    value_type: Some(pb::value::ValueType::IntegerValue(f)),
                },
            )]
            .into(),
            create_time: Some(timestamp(read_time)),
            update_time: Some(timestamp(read_time)),
        };
        Ok(BatchGetDocumentsResponse {
            result: Some(BatchGetResult::Found(document)),
            read_time: Some(timestamp(read_time)),
            ..Default::default()
        })
    }

    fn missing(short: &str, read_time: i64) -> tonic::Result<BatchGetDocumentsResponse> {
        Ok(BatchGetDocumentsResponse {
            result: Some(BatchGetResult::Missing(name(short))),
            read_time: Some(timestamp(read_time)),
            ..Default::default()
        })
    }

    fn stream(items: Vec<tonic::Result<BatchGetDocumentsResponse>>) -> BatchGetStream {
        futures::stream::iter(items).boxed()
    }

    fn pending() -> BatchGetStream {
        futures::stream::pending().boxed()
    }

    fn expect_documents(
        stub: &mut MockStub,
        want: &[&str],
        items: Vec<tonic::Result<BatchGetDocumentsResponse>>,
    ) {
        let want: Vec<String> = want.iter().map(|s| name(s)).collect();
        stub.expect_batch_get_documents()
            .withf(move |req, _| req.database == DB && req.documents == want)
            .times(1)
            .return_once(move |_, _| Ok(stream(items)));
    }

    fn get_all_error(error: &Error) -> Option<&GetAllError> {
        GetAllError::from_error(error)
    }

    /// Summarizes each snapshot as its id, whether it exists, and the
    /// seconds of its read time.
    fn summary(snapshots: &[DocumentSnapshot]) -> Vec<(String, bool, Option<i64>)> {
        snapshots
            .iter()
            .map(|s| {
                (
                    s.reference().id().into_owned(),
                    s.exists(),
                    s.read_time().map(wkt::Timestamp::seconds),
                )
            })
            .collect()
    }

    fn want(items: &[(&str, bool, i64)]) -> Vec<(String, bool, Option<i64>)> {
        items
            .iter()
            .map(|(id, exists, seconds)| (id.to_string(), *exists, Some(*seconds)))
            .collect()
    }

    #[tokio::test]
    async fn out_of_order_with_missing() -> anyhow::Result<()> {
        let mut stub = MockStub::new();
        expect_documents(
            &mut stub,
            &["C/a", "C/b", "C/c"],
            vec![found("C/b", 2, 20), missing("C/c", 30), found("C/a", 1, 10)],
        );
        let client = test_client(stub);
        let snapshots = client
            .get_all([client.doc("C/a"), client.doc("C/b"), client.doc("C/c")])
            .send()
            .await?;

        assert_eq!(
            summary(&snapshots),
            want(&[("a", true, 10), ("b", true, 20), ("c", false, 30)])
        );
        assert_eq!(snapshots[0].get("f"), Some(&Value::Integer(1)));
        assert_eq!(snapshots[1].get("f"), Some(&Value::Integer(2)));
        assert_eq!(snapshots[2].get("f"), None);
        Ok(())
    }

    #[tokio::test]
    async fn repeated_references() -> anyhow::Result<()> {
        let mut stub = MockStub::new();
        expect_documents(
            &mut stub,
            &["C/a", "C/c", "C/b"],
            vec![found("C/c", 3, 3), found("C/a", 1, 1), missing("C/b", 2)],
        );
        let client = test_client(stub);
        let refs = ["C/a", "C/a", "C/c", "C/a", "C/b", "C/c", "C/b"].map(|p| client.doc(p));
        let snapshots = client.get_all(refs).send().await?;

        assert_eq!(
            summary(&snapshots),
            want(&[
                ("a", true, 1),
                ("a", true, 1),
                ("c", true, 3),
                ("a", true, 1),
                ("b", false, 2),
                ("c", true, 3),
                ("b", false, 2),
            ])
        );
        assert_eq!(snapshots[0].get("f"), Some(&Value::Integer(1)));
        assert_eq!(snapshots[2].get("f"), Some(&Value::Integer(3)));
        assert_eq!(snapshots[0], snapshots[1]);
        assert_eq!(snapshots[0], snapshots[3]);
        assert_eq!(snapshots[2], snapshots[5]);
        assert_eq!(snapshots[4], snapshots[6]);
        Ok(())
    }

    #[tokio::test]
    async fn nil_reference() {
        let mut stub = MockStub::new();
        stub.expect_batch_get_documents().never();
        let client = test_client(stub);
        let err = client
            .get_all([client.doc("C/a"), None, client.doc("C/c")])
            .send()
            .await
            .unwrap_err();
        assert!(err.is_binding(), "{err:?}");
        assert_eq!(
            get_all_error(&err),
            Some(&GetAllError::NilReference { position: 1 })
        );
    }

    #[tokio::test]
    async fn invalid_utf8() {
        let mut stub = MockStub::new();
        stub.expect_batch_get_documents().never();
        let client = test_client(stub);
        let bad = client.collection("C").and_then(|c| c.doc(b"Mayag\xcfez"));
        assert!(bad.is_some());
        let err = client
            .get_all([client.doc("C/a"), bad])
            .send()
            .await
            .unwrap_err();
        assert!(err.is_binding(), "{err:?}");
        assert_eq!(
            get_all_error(&err),
            Some(&GetAllError::InvalidUtf8 { position: 1 })
        );
    }

    #[tokio::test]
    async fn empty_input() -> anyhow::Result<()> {
        let mut stub = MockStub::new();
        stub.expect_batch_get_documents().never();
        let client = test_client(stub);
        let snapshots = client.get_all(Vec::<DocumentReference>::new()).send().await?;
        assert!(snapshots.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn service_error_in_stream() {
        let mut stub = MockStub::new();
        expect_documents(
            &mut stub,
            &["C/a", "C/b"],
            vec![found("C/a", 1, 1), Err(tonic::Status::internal("test-only"))],
        );
        let client = test_client(stub);
        let err = client
            .get_all([client.doc("C/a"), client.doc("C/b")])
            .send()
            .await
            .unwrap_err();
        assert_eq!(
            err.status().map(|s| s.code),
            Some(Code::Internal),
            "{err:?}"
        );
        assert!(get_all_error(&err).is_none(), "{err:?}");
    }

    #[tokio::test]
    async fn service_error_on_start() {
        let mut stub = MockStub::new();
        stub.expect_batch_get_documents().return_once(|_, _| {
            Err(Error::service(
                gax::error::rpc::Status::default()
                    .set_code(Code::Unavailable)
                    .set_message("try again"),
            ))
        });
        let client = test_client(stub);
        let err = client
            .get_all([client.doc("C/a")])
            .send()
            .await
            .unwrap_err();
        assert_eq!(
            err.status().map(|s| s.code),
            Some(Code::Unavailable),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn conflict() {
        let mut stub = MockStub::new();
        expect_documents(
            &mut stub,
            &["C/a", "C/b"],
            vec![found("C/a", 1, 1), missing("C/a", 1), found("C/b", 2, 1)],
        );
        let client = test_client(stub);
        let err = client
            .get_all([client.doc("C/a"), client.doc("C/b")])
            .send()
            .await
            .unwrap_err();
        assert!(err.is_deserialization(), "{err:?}");
        assert_eq!(
            get_all_error(&err),
            Some(&GetAllError::Conflict { path: name("C/a") })
        );
    }

    #[tokio::test]
    async fn duplicate() {
        let mut stub = MockStub::new();
        expect_documents(
            &mut stub,
            &["C/a"],
            vec![missing("C/a", 1), missing("C/a", 1)],
        );
        let client = test_client(stub);
        let err = client
            .get_all([client.doc("C/a")])
            .send()
            .await
            .unwrap_err();
        assert!(err.is_deserialization(), "{err:?}");
        assert_eq!(
            get_all_error(&err),
            Some(&GetAllError::Duplicate { path: name("C/a") })
        );
    }

    #[tokio::test]
    async fn unexpected() {
        let mut stub = MockStub::new();
        expect_documents(
            &mut stub,
            &["C/a"],
            vec![found("C/a", 1, 1), found("C/z", 26, 1)],
        );
        let client = test_client(stub);
        let err = client
            .get_all([client.doc("C/a")])
            .send()
            .await
            .unwrap_err();
        assert!(err.is_deserialization(), "{err:?}");
        assert_eq!(
            get_all_error(&err),
            Some(&GetAllError::Unexpected { path: name("C/z") })
        );
    }

    #[tokio::test]
    async fn unresolved() {
        let mut stub = MockStub::new();
        expect_documents(&mut stub, &["C/a", "C/b"], vec![found("C/a", 1, 1)]);
        let client = test_client(stub);
        let err = client
            .get_all([client.doc("C/a"), client.doc("C/b")])
            .send()
            .await
            .unwrap_err();
        assert!(err.is_deserialization(), "{err:?}");
        assert_eq!(
            get_all_error(&err),
            Some(&GetAllError::Unresolved { path: name("C/b") })
        );
    }

    #[tokio::test]
    async fn empty_result() {
        let mut stub = MockStub::new();
        let empty = BatchGetDocumentsResponse::default();
        expect_documents(&mut stub, &["C/a"], vec![Ok(empty)]);
        let client = test_client(stub);
        let err = client
            .get_all([client.doc("C/a")])
            .send()
            .await
            .unwrap_err();
        assert!(err.is_deserialization(), "{err:?}");
        assert_eq!(get_all_error(&err), Some(&GetAllError::EmptyResult));
    }

    #[tokio::test]
    async fn read_options() -> anyhow::Result<()> {
        let mut stub = MockStub::new();
        stub.expect_batch_get_documents()
            .withf(|req, _| {
                req.consistency_selector
                    == Some(ConsistencySelector::ReadTime(prost_types::Timestamp {
                        seconds: 42,
                        nanos: 7,
                    }))
            })
            .times(1)
            .return_once(|_, _| Ok(stream(vec![missing("C/a", 1)])));
        stub.expect_batch_get_documents()
            .withf(|req, _| {
                req.consistency_selector == Some(ConsistencySelector::Transaction(b"txn".to_vec()))
            })
            .times(1)
            .return_once(|_, _| Ok(stream(vec![missing("C/a", 1)])));
        let client = test_client(stub)
            .with_read_options(ReadOptions::ReadTime(wkt::Timestamp::clamp(42, 7)));

        let _ = client.get_all([client.doc("C/a")]).send().await?;
        let _ = client
            .get_all([client.doc("C/a")])
            .with_read_options(ReadOptions::Transaction(bytes::Bytes::from_static(b"txn")))
            .send()
            .await?;
        Ok(())
    }

    #[tokio::test]
    async fn field_mask() -> anyhow::Result<()> {
        let mut stub = MockStub::new();
        stub.expect_batch_get_documents()
            .withf(|req, _| {
                req.mask
                    == Some(DocumentMask {
                        field_paths: vec!["name".to_string(), "population".to_string()],
                    })
                    && req.consistency_selector.is_none()
            })
            .times(1)
            .return_once(|_, _| Ok(stream(vec![missing("C/a", 1)])));
        let client = test_client(stub);
        let _ = client
            .get_all([client.doc("C/a")])
            .with_field_mask(["name", "population"])
            .send()
            .await?;
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation() {
        let mut stub = MockStub::new();
        stub.expect_batch_get_documents()
            .return_once(|_, _| Ok(pending()));
        let client = test_client(stub);
        let token = CancellationToken::new();
        let cancel = token.clone();
        let _task = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            cancel.cancel();
        });
        let err = client
            .get_all([client.doc("C/a")])
            .with_cancellation(token)
            .send()
            .await
            .unwrap_err();
        assert_eq!(
            err.status().map(|s| s.code),
            Some(Code::Cancelled),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn cancelled_before_send() {
        let stub = MockStub::new();
        let client = test_client(stub);
        let token = CancellationToken::new();
        token.cancel();
        let err = client
            .get_all([client.doc("C/a")])
            .with_cancellation(token)
            .send()
            .await
            .unwrap_err();
        assert_eq!(
            err.status().map(|s| s.code),
            Some(Code::Cancelled),
            "{err:?}"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn timeout() {
        let mut stub = MockStub::new();
        stub.expect_batch_get_documents()
            .withf(|_, options| *options.attempt_timeout() == Some(Duration::from_secs(5)))
            .return_once(|_, _| Ok(pending()));
        let client = test_client(stub);
        let err = client
            .get_all([client.doc("C/a")])
            .with_attempt_timeout(Duration::from_secs(5))
            .send()
            .await
            .unwrap_err();
        assert!(err.is_timeout(), "{err:?}");
    }
}
