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

//! Custom errors for the Cloud Firestore client.
//!
//! The Firestore client defines additional error types. These are returned as
//! the `source()` of an [Error][crate::Error].
//!
//! # Example
//! ```
//! # use google_cloud_firestore::error::GetAllError;
//! fn describe(e: &google_cloud_firestore::Error) -> &'static str {
//!     match GetAllError::from_error(e) {
//!         Some(e) if e.is_validation() => "bad input",
//!         Some(_) => "inconsistent response from the service",
//!         None => "transport or service error",
//!     }
//! }
//! ```

use crate::Error;
use crate::as_inner::as_inner;

/// Represents an error reading documents with `Firestore::get_all()`.
///
/// Validation errors are detected before any RPC is made. The remaining
/// variants report responses that do not match the request, they are returned
/// as [deserialization][crate::Error::is_deserialization] errors.
#[derive(thiserror::Error, Debug, PartialEq)]
#[non_exhaustive]
pub enum GetAllError {
    /// The document reference at `position` was absent, typically because its
    /// path was malformed.
    #[error("the document reference at position {position} is missing")]
    NilReference { position: usize },

    /// The path of the document reference at `position` is not valid UTF-8.
    #[error("the path of the document reference at position {position} is not valid UTF-8")]
    InvalidUtf8 { position: usize },

    /// The service reported the same document as both found and missing.
    #[error("the service reported {path} as both found and missing")]
    Conflict { path: String },

    /// The service reported the same document more than once.
    #[error("the service reported {path} more than once")]
    Duplicate { path: String },

    /// The service returned a document that was not requested.
    #[error("the service returned {path}, which was not requested")]
    Unexpected { path: String },

    /// The stream closed before the service returned a requested document.
    #[error("the stream closed before the service returned {path}")]
    Unresolved { path: String },

    /// A response had neither a found document nor a missing document name.
    #[error("the service returned a response without a result")]
    EmptyResult,
}

impl GetAllError {
    /// Returns true if the error was detected before making any RPCs.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::NilReference { .. } | Self::InvalidUtf8 { .. })
    }

    /// Returns true if the service response is inconsistent with the request.
    pub fn is_integrity(&self) -> bool {
        !self.is_validation()
    }

    /// Finds a [GetAllError] in the `source()` chain of `error`.
    pub fn from_error(error: &Error) -> Option<&GetAllError> {
        as_inner::<GetAllError, _>(error)
    }

    pub(crate) fn into_error(self) -> Error {
        if self.is_validation() {
            Error::binding(self)
        } else {
            Error::deser(self)
        }
    }
}

/// Represents an error creating a [Firestore][crate::client::Firestore] client.
#[derive(thiserror::Error, Debug, PartialEq)]
#[non_exhaustive]
pub enum ConfigError {
    /// The project id is required and cannot be empty.
    #[error("the project id is empty")]
    EmptyProjectId,

    /// The database id, if set, cannot be empty.
    #[error("the database id is empty")]
    EmptyDatabaseId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(GetAllError::NilReference { position: 0 }, true)]
    #[test_case(GetAllError::InvalidUtf8 { position: 1 }, true)]
    #[test_case(GetAllError::Conflict { path: "p".into() }, false)]
    #[test_case(GetAllError::Duplicate { path: "p".into() }, false)]
    #[test_case(GetAllError::Unexpected { path: "p".into() }, false)]
    #[test_case(GetAllError::Unresolved { path: "p".into() }, false)]
    #[test_case(GetAllError::EmptyResult, false)]
    fn classification(input: GetAllError, validation: bool) {
        assert_eq!(input.is_validation(), validation, "{input:?}");
        assert_eq!(input.is_integrity(), !validation, "{input:?}");
        let error = input.into_error();
        assert_eq!(error.is_binding(), validation, "{error:?}");
        assert_eq!(error.is_deserialization(), !validation, "{error:?}");
    }

    #[test]
    fn from_error() {
        let error = GetAllError::Conflict {
            path: "projects/p/databases/d/documents/C/a".into(),
        }
        .into_error();
        let got = GetAllError::from_error(&error);
        assert!(
            matches!(got, Some(GetAllError::Conflict { path }) if path.ends_with("C/a")),
            "{got:?}"
        );

        let error = Error::io("uh-oh");
        assert_eq!(GetAllError::from_error(&error), None);
    }
}
