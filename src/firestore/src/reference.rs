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

use bytes::{BufMut, Bytes, BytesMut};
use std::borrow::Cow;
use std::sync::Arc;

const SEPARATOR: u8 = b'/';

/// Identifies a Firestore database.
///
/// # Example
/// ```
/// # use google_cloud_firestore::DatabaseName;
/// let db = DatabaseName::new("my-project", "(default)");
/// assert_eq!(db.to_string(), "projects/my-project/databases/(default)");
/// assert_eq!(db.documents_path(), "projects/my-project/databases/(default)/documents");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DatabaseName {
    project_id: String,
    database_id: String,
}

impl DatabaseName {
    /// The id of the default database in each project.
    pub const DEFAULT_DATABASE_ID: &'static str = "(default)";

    pub fn new<P: Into<String>, D: Into<String>>(project_id: P, database_id: D) -> Self {
        Self {
            project_id: project_id.into(),
            database_id: database_id.into(),
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn database_id(&self) -> &str {
        &self.database_id
    }

    /// The parent of all documents and collections in the database.
    pub fn documents_path(&self) -> String {
        format!("{self}/documents")
    }
}

impl std::fmt::Display for DatabaseName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "projects/{}/databases/{}",
            self.project_id, self.database_id
        )
    }
}

/// A reference to a collection in a Firestore database.
///
/// Obtain instances via [Firestore::collection][crate::client::Firestore::collection]
/// or [DocumentReference::collection].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CollectionReference {
    database: Arc<DatabaseName>,
    // The path relative to the database documents, e.g. `users/alice/posts`.
    path: Bytes,
}

/// A reference to a document in a Firestore database.
///
/// Two references are equal if they name the same document in the same
/// database, regardless of how they were constructed.
///
/// The path is kept as raw bytes. The client validates the encoding when the
/// reference is used in a request.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DocumentReference {
    database: Arc<DatabaseName>,
    // The path relative to the database documents, e.g. `users/alice`.
    path: Bytes,
}

/// Counts the segments in `path`, rejecting empty segments.
fn segment_count(path: &[u8]) -> Option<usize> {
    if path.is_empty() {
        return None;
    }
    let mut count = 0;
    for segment in path.split(|b| *b == SEPARATOR) {
        if segment.is_empty() {
            return None;
        }
        count += 1;
    }
    Some(count)
}

fn is_valid_id(id: &[u8]) -> bool {
    !id.is_empty() && !id.contains(&SEPARATOR)
}

fn join(parent: &[u8], id: &[u8]) -> Bytes {
    let mut path = BytesMut::with_capacity(parent.len() + 1 + id.len());
    path.put_slice(parent);
    path.put_u8(SEPARATOR);
    path.put_slice(id);
    path.freeze()
}

fn last_segment(path: &[u8]) -> &[u8] {
    path.rsplit(|b| *b == SEPARATOR).next().unwrap_or(path)
}

fn parent_path(path: &[u8]) -> Option<&[u8]> {
    path.iter()
        .rposition(|b| *b == SEPARATOR)
        .map(|i| &path[..i])
}

impl CollectionReference {
    /// Creates a reference from a path with an odd number of segments.
    pub(crate) fn new(database: Arc<DatabaseName>, path: &[u8]) -> Option<Self> {
        match segment_count(path)? {
            n if n % 2 == 1 => Some(Self {
                database,
                path: Bytes::copy_from_slice(path),
            }),
            _ => None,
        }
    }

    /// The last segment of the collection path.
    pub fn id(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(last_segment(&self.path))
    }

    /// The path relative to the database root, e.g. `users/alice/posts`.
    pub fn short_path(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.path)
    }

    /// The full resource name of the collection.
    pub fn path(&self) -> String {
        format!("{}/{}", self.database.documents_path(), self.short_path())
    }

    pub fn database(&self) -> &DatabaseName {
        &self.database
    }

    /// The document containing this collection, `None` for root collections.
    pub fn parent(&self) -> Option<DocumentReference> {
        parent_path(&self.path).map(|p| DocumentReference {
            database: self.database.clone(),
            path: self.path.slice_ref(p),
        })
    }

    /// Returns a reference to the document `id` in this collection.
    ///
    /// Returns `None` if `id` is empty or contains a `/`.
    ///
    /// # Example
    /// ```
    /// # use google_cloud_firestore::client::Firestore;
    /// # fn sample(client: &Firestore) {
    /// let cities = client.collection("cities").unwrap();
    /// let sf = cities.doc("SF").unwrap();
    /// assert_eq!(sf.short_path(), "cities/SF");
    /// assert!(cities.doc("SF/oops").is_none());
    /// # }
    /// ```
    pub fn doc<T: AsRef<[u8]>>(&self, id: T) -> Option<DocumentReference> {
        let id = id.as_ref();
        if !is_valid_id(id) {
            return None;
        }
        Some(DocumentReference {
            database: self.database.clone(),
            path: join(&self.path, id),
        })
    }
}

impl DocumentReference {
    /// Creates a reference from a path with an even number of segments.
    pub(crate) fn new(database: Arc<DatabaseName>, path: &[u8]) -> Option<Self> {
        match segment_count(path)? {
            n if n % 2 == 0 => Some(Self {
                database,
                path: Bytes::copy_from_slice(path),
            }),
            _ => None,
        }
    }

    /// The last segment of the document path.
    pub fn id(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(last_segment(&self.path))
    }

    /// The path relative to the database root, e.g. `users/alice`.
    pub fn short_path(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.path)
    }

    /// The full resource name of the document.
    ///
    /// Invalid UTF-8 sequences are replaced with `U+FFFD`.
    pub fn path(&self) -> String {
        format!("{}/{}", self.database.documents_path(), self.short_path())
    }

    pub fn database(&self) -> &DatabaseName {
        &self.database
    }

    /// The collection containing this document.
    pub fn parent(&self) -> CollectionReference {
        let path = parent_path(&self.path)
            .map(|p| self.path.slice_ref(p))
            .unwrap_or_default();
        CollectionReference {
            database: self.database.clone(),
            path,
        }
    }

    /// Returns a reference to the sub-collection `id` of this document.
    ///
    /// Returns `None` if `id` is empty or contains a `/`.
    pub fn collection<T: AsRef<[u8]>>(&self, id: T) -> Option<CollectionReference> {
        let id = id.as_ref();
        if !is_valid_id(id) {
            return None;
        }
        Some(CollectionReference {
            database: self.database.clone(),
            path: join(&self.path, id),
        })
    }

    /// The full resource name, failing if the path is not valid UTF-8.
    pub(crate) fn checked_path(&self) -> Result<String, std::str::Utf8Error> {
        let short = std::str::from_utf8(&self.path)?;
        Ok(format!("{}/{short}", self.database.documents_path()))
    }
}

impl std::fmt::Display for DocumentReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}
