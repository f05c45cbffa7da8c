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

//! The Firestore data model.

use std::collections::BTreeMap;

/// A Firestore document.
///
/// # Example
/// ```
/// # use google_cloud_firestore::model::{Document, Value};
/// let doc = Document::new()
///     .set_name("projects/p/databases/(default)/documents/cities/SF")
///     .set_fields([("population", Value::Integer(870_000))]);
/// assert_eq!(doc.fields.get("population"), Some(&Value::Integer(870_000)));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct Document {
    /// The full resource name, e.g.
    /// `projects/{project_id}/databases/{database_id}/documents/{document_path}`.
    pub name: String,

    /// The document fields.
    pub fields: BTreeMap<String, Value>,

    /// The time at which the document was created.
    pub create_time: Option<wkt::Timestamp>,

    /// The time at which the document was last changed.
    pub update_time: Option<wkt::Timestamp>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of [name][Document::name].
    pub fn set_name<T: Into<String>>(mut self, v: T) -> Self {
        self.name = v.into();
        self
    }

    /// Sets the value of [fields][Document::fields].
    pub fn set_fields<T, K, V>(mut self, v: T) -> Self
    where
        T: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.fields = v.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self
    }

    /// Sets the value of [create_time][Document::create_time].
    pub fn set_create_time<T: Into<wkt::Timestamp>>(mut self, v: T) -> Self {
        self.create_time = Some(v.into());
        self
    }

    /// Sets the value of [update_time][Document::update_time].
    pub fn set_update_time<T: Into<wkt::Timestamp>>(mut self, v: T) -> Self {
        self.update_time = Some(v.into());
        self
    }
}

/// A value stored in a document field.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Double(f64),
    /// Timestamps are stored with microsecond precision.
    Timestamp(wkt::Timestamp),
    String(String),
    Bytes(bytes::Bytes),
    /// The resource name of another document.
    Reference(String),
    GeoPoint(LatLng),
    /// An array cannot directly contain another array.
    Array(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<wkt::Timestamp> for Value {
    fn from(v: wkt::Timestamp) -> Self {
        Self::Timestamp(v)
    }
}

impl From<LatLng> for Value {
    fn from(v: LatLng) -> Self {
        Self::GeoPoint(v)
    }
}

/// A latitude/longitude pair, in degrees, using the WGS84 standard.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

impl LatLng {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Controls the consistency of reads.
///
/// By default reads return the most recent version of each document. Use
/// these options to read at a fixed time, or as part of a transaction.
///
/// # Example
/// ```
/// # use google_cloud_firestore::model::ReadOptions;
/// let options = ReadOptions::ReadTime(wkt::Timestamp::clamp(1_613_779_200, 0));
/// ```
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum ReadOptions {
    /// Read documents as they were at the given time.
    ///
    /// This must be a microsecond precision timestamp within the past hour,
    /// or a whole minute timestamp within the past 7 days if point-in-time
    /// recovery is enabled.
    ReadTime(wkt::Timestamp),

    /// Read documents in an already active transaction.
    Transaction(bytes::Bytes),
}
