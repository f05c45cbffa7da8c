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

//! Google Cloud Client Libraries for Rust - Cloud Spanner
//!
//! **WARNING:** this crate is under active development. We expect multiple
//! breaking changes in the upcoming releases. Testing is also incomplete, we do
//! **not** recommend that you use this crate in production. We welcome feedback
//! about the APIs, documentation, missing features, bugs, etc.
//!
//! This crate contains the built-in client-side metrics for [Spanner]. The
//! metrics record the latency and number of operations and RPC attempts, and
//! are exported through [OpenTelemetry].
//!
//! ```
//! # use google_cloud_spanner::metrics::{BuiltinMetrics, CallLabels, MetricsProvider};
//! # use opentelemetry_sdk::metrics::SdkMeterProvider;
//! # fn sample(provider: SdkMeterProvider) -> anyhow::Result<()> {
//! let metrics = BuiltinMetrics::new(
//!     "my-project",
//!     "my-instance",
//!     "regional-us-central1",
//!     MetricsProvider::custom(provider),
//! );
//! let labels = CallLabels::new()
//!     .set_method("Spanner.ExecuteSql")
//!     .set_database("my-database");
//! metrics.record_operation(&labels, std::time::Duration::from_millis(12));
//! metrics.shutdown()?;
//! # Ok(()) }
//! ```
//!
//! [opentelemetry]: https://opentelemetry.io
//! [spanner]: https://cloud.google.com/spanner

pub mod metrics;
