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

use crate::DocumentReference;
use crate::model::{Document, Value};
use std::sync::Arc;

/// The contents of a document at a point in time.
///
/// A snapshot is returned for each requested document, even if the document
/// does not exist. Use [exists()][DocumentSnapshot::exists] to tell them apart.
///
/// # Example
/// ```
/// # use google_cloud_firestore::DocumentSnapshot;
/// fn print(snapshot: &DocumentSnapshot) {
///     match snapshot.get("population") {
///         Some(v) => println!("{} has population {v:?}", snapshot.reference()),
///         None if snapshot.exists() => println!("{} has no population", snapshot.reference()),
///         None => println!("{} does not exist", snapshot.reference()),
///     }
/// }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct DocumentSnapshot {
    reference: DocumentReference,
    // Shared by the snapshots of duplicate references.
    document: Option<Arc<Document>>,
    read_time: Option<wkt::Timestamp>,
}

impl DocumentSnapshot {
    pub(crate) fn found(
        reference: DocumentReference,
        document: Arc<Document>,
        read_time: Option<wkt::Timestamp>,
    ) -> Self {
        Self {
            reference,
            document: Some(document),
            read_time,
        }
    }

    pub(crate) fn missing(reference: DocumentReference, read_time: Option<wkt::Timestamp>) -> Self {
        Self {
            reference,
            document: None,
            read_time,
        }
    }

    /// The reference used to request this snapshot.
    pub fn reference(&self) -> &DocumentReference {
        &self.reference
    }

    /// Returns true if the document existed at [read_time][Self::read_time].
    pub fn exists(&self) -> bool {
        self.document.is_some()
    }

    /// The document contents, `None` if the document does not exist.
    pub fn document(&self) -> Option<&Document> {
        self.document.as_deref()
    }

    /// Returns the value of a top-level field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.document.as_ref()?.fields.get(field)
    }

    pub fn create_time(&self) -> Option<&wkt::Timestamp> {
        self.document.as_ref()?.create_time.as_ref()
    }

    pub fn update_time(&self) -> Option<&wkt::Timestamp> {
        self.document.as_ref()?.update_time.as_ref()
    }

    /// The time at which the service read the document.
    pub fn read_time(&self) -> Option<&wkt::Timestamp> {
        self.read_time.as_ref()
    }
}
