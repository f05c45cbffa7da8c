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

//! Google Cloud Client Libraries for Rust - Cloud Firestore API
//!
//! **WARNING:** this crate is under active development. We expect multiple
//! breaking changes in the upcoming releases. Testing is also incomplete, we do
//! **not** recommend that you use this crate in production. We welcome feedback
//! about the APIs, documentation, missing features, bugs, etc.
//!
//! This crate contains traits, types, and functions to read documents from
//! [Firestore]. Most applications will use the [Firestore][client::Firestore]
//! client:
//!
//! ```no_run
//! # use google_cloud_firestore::client::Firestore;
//! # async fn sample() -> anyhow::Result<()> {
//! let client = Firestore::builder()
//!     .with_project_id("my-project")
//!     .build()
//!     .await?;
//! let cities = client.collection("cities").expect("valid collection path");
//! let snapshots = client
//!     .get_all([cities.doc("SF"), cities.doc("LA")])
//!     .send()
//!     .await?;
//! for s in snapshots {
//!     println!("{} exists={}", s.reference().id(), s.exists());
//! }
//! # Ok(()) }
//! ```
//!
//! [firestore]: https://cloud.google.com/firestore

pub use gax::Result;
pub use gax::error::Error;

pub(crate) mod as_inner;
pub(crate) mod convert;
pub mod error;
pub(crate) mod firestore;
pub mod model;
pub(crate) mod reference;
pub(crate) mod snapshot;

pub mod client {
    pub use crate::firestore::client::Firestore;
}
pub mod builder {
    pub use crate::firestore::client_builder::ClientBuilder;
    pub use crate::firestore::get_all::GetAll;
}
pub use reference::{CollectionReference, DatabaseName, DocumentReference};
pub use snapshot::DocumentSnapshot;

const DEFAULT_HOST: &str = "https://firestore.googleapis.com";

/// The environment variable naming the Firestore emulator, e.g. `localhost:8080`.
pub const EMULATOR_HOST_ENV: &str = "FIRESTORE_EMULATOR_HOST";

mod info {
    const NAME: &str = env!("CARGO_PKG_NAME");
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    lazy_static::lazy_static! {
        /// The value of the `x-goog-api-client` header.
        pub(crate) static ref X_GOOG_API_CLIENT_HEADER: String = format!(
            "gl-rust/{} grpc/tonic gccl/{VERSION} {NAME}",
            rustc_version_runtime::version()
        );
    }

}

#[allow(dead_code)]
pub(crate) mod google {
    pub mod firestore {
        #[allow(clippy::enum_variant_names)]
        #[allow(clippy::large_enum_variant)]
        pub mod v1 {
            include!("generated/protos/firestore/google.firestore.v1.rs");
        }
    }
    pub mod r#type {
        include!("generated/protos/firestore/google.r#type.rs");
    }
}
