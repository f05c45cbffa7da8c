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

use crate::Error;
use crate::as_inner::as_inner;
use gax::error::rpc::{Code, Status};

/// Converts a gRPC status into the error type used by the client libraries.
///
/// Timeouts, connection failures, and transport failures keep their own
/// error kinds. All other statuses become service errors, with the response
/// metadata as headers and the original status as the source.
pub(crate) fn to_gax_error(status: tonic::Status) -> Error {
    if as_inner::<tonic::TimeoutExpired, _>(&status).is_some() {
        return Error::timeout(status);
    }
    if as_inner::<tonic::ConnectError, _>(&status).is_some() {
        return Error::connect(status);
    }
    let headers = status.metadata().clone().into_headers();
    if as_inner::<tonic::transport::Error, _>(&status).is_some() {
        return Error::transport(headers, status);
    }
    let content_type = headers.get("content-type").map(|v| v.as_bytes());
    if content_type.is_some_and(|v| !v.starts_with(b"application/grpc")) {
        return Error::transport(headers, NotGrpc(status));
    }
    let gax_status = to_gax_status(&status);
    Error::service_full(gax_status, None, Some(headers), Some(Box::new(status)))
}

/// The endpoint answered, but not with a gRPC response.
#[derive(Debug, thiserror::Error)]
#[error("the response content-type is not application/grpc, check the endpoint")]
struct NotGrpc(#[source] tonic::Status);

pub(crate) fn to_gax_status(status: &tonic::Status) -> Status {
    Status::default()
        .set_code(status.code() as i32)
        .set_message(status.message())
}

/// The error returned when the application cancels a request.
pub(crate) fn cancelled() -> Error {
    Error::service(
        Status::default()
            .set_code(Code::Cancelled)
            .set_message("the request was cancelled by the application"),
    )
}
