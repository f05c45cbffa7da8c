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

//! Built-in client metrics.
//!
//! The client records four metrics for each call:
//!
//! * `operation_latencies`: the total time until the operation succeeds or
//!   fails, including retries and backoff.
//! * `attempt_latencies`: the latency of each RPC attempt.
//! * `operation_count`: the number of operations.
//! * `attempt_count`: the number of RPC attempts.
//!
//! All metrics names start with [METRICS_PREFIX].

use gax::error::rpc::Code;
use opentelemetry::metrics::{Counter, Histogram, Meter, MeterProvider as _};
use opentelemetry::{InstrumentationScope, KeyValue};
use opentelemetry_sdk::metrics::exporter::PushMetricExporter;
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};
use std::time::Duration;

const METER_NAME: &str = env!("CARGO_PKG_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The value of the `client_name` label.
pub const CLIENT_NAME: &str = concat!("rust-spanner v", env!("CARGO_PKG_VERSION"));

/// The prefix for all the built-in metric names.
pub const METRICS_PREFIX: &str = "spanner.googleapis.com/internal/client/";

/// Built-in metrics are disabled when this environment variable is set.
pub const EMULATOR_HOST_ENV: &str = "SPANNER_EMULATOR_HOST";

/// The interval between two exports of the built-in provider.
pub const DEFAULT_SAMPLE_PERIOD: Duration = Duration::from_secs(5 * 60);

pub const OPERATION_LATENCIES: &str = "operation_latencies";
pub const ATTEMPT_LATENCIES: &str = "attempt_latencies";
pub const OPERATION_COUNT: &str = "operation_count";
pub const ATTEMPT_COUNT: &str = "attempt_count";

/// The label keys attached to the built-in metrics.
pub mod labels {
    // Monitored resource labels.
    pub const PROJECT: &str = "project_id";
    pub const INSTANCE: &str = "instance_id";
    pub const INSTANCE_CONFIG: &str = "instance_config";
    pub const LOCATION: &str = "location";

    // Metric labels.
    pub const DATABASE: &str = "database";
    pub const CLIENT_UID: &str = "client_uid";
    pub const CLIENT_NAME: &str = "client_name";
    pub const METHOD: &str = "method";
    pub const STATUS: &str = "status";
    pub const DIRECTPATH_ENABLED: &str = "directpath_enabled";
    pub const DIRECTPATH_USED: &str = "directpath_used";
}

// Latency buckets, in milliseconds.
const BUCKET_BOUNDS: [f64; 41] = [
    0.0, 0.5, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 8.0, 10.0, 13.0, 16.0, 20.0, 25.0, 30.0, 40.0, 50.0,
    65.0, 80.0, 100.0, 130.0, 160.0, 200.0, 250.0, 300.0, 400.0, 500.0, 650.0, 800.0, 1000.0,
    2000.0, 5000.0, 10000.0, 20000.0, 50000.0, 100000.0, 200000.0, 400000.0, 800000.0,
    1600000.0, 3200000.0,
];

/// Errors in the built-in metrics.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum MetricsError {
    /// The local hostname, used in the client UID, is not available.
    #[error("cannot determine the hostname: {0}")]
    Hostname(#[source] std::io::Error),

    /// The built-in meter provider failed to flush or shut down.
    #[error("cannot shut down the meter provider: {0}")]
    Shutdown(#[source] opentelemetry_sdk::error::OTelSdkError),
}

/// Configures where the built-in metrics go.
///
/// # Example
/// ```
/// # use google_cloud_spanner::metrics::MetricsProvider;
/// # use opentelemetry_sdk::metrics::SdkMeterProvider;
/// let disabled = MetricsProvider::noop();
/// let custom = MetricsProvider::custom(SdkMeterProvider::builder().build());
/// ```
#[derive(Clone, Debug)]
pub struct MetricsProvider(ProviderKind);

#[derive(Clone, Debug)]
enum ProviderKind {
    Noop,
    // Owned by the application, never shut down by the client.
    Custom(SdkMeterProvider),
    // Created by the client, shut down with the client.
    Builtin(SdkMeterProvider),
}

impl MetricsProvider {
    /// Disables the built-in metrics.
    pub fn noop() -> Self {
        Self(ProviderKind::Noop)
    }

    /// Records the built-in metrics in an application provided meter provider.
    ///
    /// The application is responsible for flushing and shutting down the
    /// provider.
    pub fn custom(provider: SdkMeterProvider) -> Self {
        Self(ProviderKind::Custom(provider))
    }

    /// Exports the built-in metrics to `exporter` every
    /// [DEFAULT_SAMPLE_PERIOD].
    pub fn periodic<E>(exporter: E) -> Self
    where
        E: PushMetricExporter,
    {
        Self::periodic_with_interval(exporter, DEFAULT_SAMPLE_PERIOD)
    }

    /// Exports the built-in metrics to `exporter` every `interval`.
    pub fn periodic_with_interval<E>(exporter: E, interval: Duration) -> Self
    where
        E: PushMetricExporter,
    {
        let reader = PeriodicReader::builder(exporter)
            .with_interval(interval)
            .build();
        let provider = SdkMeterProvider::builder().with_reader(reader).build();
        Self(ProviderKind::Builtin(provider))
    }
}

/// The per-call labels of a metric observation.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct CallLabels {
    /// The RPC name, for example `Spanner.ExecuteSql`.
    pub method: String,
    pub database: String,
    /// Defaults to `global`.
    pub location: String,
    pub status: Code,
    pub directpath_enabled: bool,
    pub directpath_used: bool,
}

impl CallLabels {
    pub fn new() -> Self {
        Self {
            method: String::new(),
            database: String::new(),
            location: "global".to_string(),
            status: Code::Ok,
            directpath_enabled: false,
            directpath_used: false,
        }
    }

    pub fn set_method<V: Into<String>>(mut self, v: V) -> Self {
        self.method = v.into();
        self
    }

    pub fn set_database<V: Into<String>>(mut self, v: V) -> Self {
        self.database = v.into();
        self
    }

    pub fn set_location<V: Into<String>>(mut self, v: V) -> Self {
        self.location = v.into();
        self
    }

    pub fn set_status<V: Into<Code>>(mut self, v: V) -> Self {
        self.status = v.into();
        self
    }

    pub fn set_directpath_enabled(mut self, v: bool) -> Self {
        self.directpath_enabled = v;
        self
    }

    pub fn set_directpath_used(mut self, v: bool) -> Self {
        self.directpath_used = v;
        self
    }

    fn key_values(&self) -> impl Iterator<Item = KeyValue> {
        [
            KeyValue::new(labels::METHOD, self.method.clone()),
            KeyValue::new(labels::DATABASE, self.database.clone()),
            KeyValue::new(labels::LOCATION, self.location.clone()),
            KeyValue::new(labels::STATUS, self.status.name().to_string()),
            KeyValue::new(labels::DIRECTPATH_ENABLED, self.directpath_enabled.to_string()),
            KeyValue::new(labels::DIRECTPATH_USED, self.directpath_used.to_string()),
        ]
        .into_iter()
    }
}

impl Default for CallLabels {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
struct Instruments {
    operation_latencies: Histogram<f64>,
    attempt_latencies: Histogram<f64>,
    operation_count: Counter<u64>,
    attempt_count: Counter<u64>,
}

impl Instruments {
    fn new(meter: &Meter) -> Self {
        let name = |n: &str| format!("{METRICS_PREFIX}{n}");
        Self {
            operation_latencies: meter
                .f64_histogram(name(OPERATION_LATENCIES))
                .with_description(
                    "Total time until final operation success or failure, including retries and backoff.",
                )
                .with_unit("ms")
                .with_boundaries(BUCKET_BOUNDS.to_vec())
                .build(),
            attempt_latencies: meter
                .f64_histogram(name(ATTEMPT_LATENCIES))
                .with_description("Client observed latency per RPC attempt.")
                .with_unit("ms")
                .with_boundaries(BUCKET_BOUNDS.to_vec())
                .build(),
            operation_count: meter
                .u64_counter(name(OPERATION_COUNT))
                .with_description(
                    "The number of RPC that represents a single method invocation. The method might require multiple attempts/rpcs and backoff logic to complete",
                )
                .build(),
            attempt_count: meter
                .u64_counter(name(ATTEMPT_COUNT))
                .with_description("The number of additional RPCs sent after the initial attempt.")
                .build(),
        }
    }
}

/// Records the built-in metrics of a Spanner client.
///
/// Cloning a `BuiltinMetrics` is cheap, the clones share the instruments.
#[derive(Clone, Debug)]
pub struct BuiltinMetrics {
    // Labels that do not change across calls on the same client.
    client_attributes: Vec<KeyValue>,
    instruments: Option<Instruments>,
    owned_provider: Option<SdkMeterProvider>,
}

impl BuiltinMetrics {
    /// Creates the metrics for a client of `instance` in `project`.
    ///
    /// Metrics are disabled if the `SPANNER_EMULATOR_HOST` environment
    /// variable is set.
    pub fn new<P, I, C>(
        project: P,
        instance: I,
        instance_config: C,
        provider: MetricsProvider,
    ) -> Self
    where
        P: Into<String>,
        I: Into<String>,
        C: Into<String>,
    {
        Self::with_client_uid(
            project.into(),
            instance.into(),
            instance_config.into(),
            provider,
            generate_client_uid(),
        )
    }

    fn with_client_uid(
        project: String,
        instance: String,
        instance_config: String,
        provider: MetricsProvider,
        client_uid: Result<String, MetricsError>,
    ) -> Self {
        let client_uid = client_uid.unwrap_or_else(|e| {
            tracing::warn!(
                "built-in metrics: cannot generate the client UID, using an empty `{}` label: {e}",
                labels::CLIENT_UID
            );
            String::new()
        });
        let client_attributes = vec![
            KeyValue::new(labels::PROJECT, project),
            KeyValue::new(labels::INSTANCE, instance),
            KeyValue::new(labels::INSTANCE_CONFIG, instance_config),
            KeyValue::new(labels::CLIENT_UID, client_uid),
            KeyValue::new(labels::CLIENT_NAME, CLIENT_NAME),
        ];
        let disabled = Self {
            client_attributes,
            instruments: None,
            owned_provider: None,
        };

        if std::env::var(EMULATOR_HOST_ENV).is_ok_and(|v| !v.is_empty()) {
            tracing::debug!("built-in metrics are disabled when using the Spanner emulator");
            return disabled;
        }
        let (provider, owned_provider) = match provider.0 {
            ProviderKind::Noop => return disabled,
            ProviderKind::Custom(p) => (p, None),
            ProviderKind::Builtin(p) => (p.clone(), Some(p)),
        };
        let scope = InstrumentationScope::builder(METER_NAME)
            .with_version(VERSION)
            .build();
        let meter = provider.meter_with_scope(scope);
        Self {
            instruments: Some(Instruments::new(&meter)),
            owned_provider,
            ..disabled
        }
    }

    /// Returns true if the metrics are recorded.
    pub fn is_enabled(&self) -> bool {
        self.instruments.is_some()
    }

    /// Records the latency of a complete operation, including all attempts.
    pub fn record_operation(&self, call: &CallLabels, latency: Duration) {
        if let Some(i) = &self.instruments {
            let attributes = self.attributes(call);
            i.operation_latencies.record(as_millis(latency), &attributes);
            i.operation_count.add(1, &attributes);
        }
    }

    /// Records the latency of a single RPC attempt.
    pub fn record_attempt(&self, call: &CallLabels, latency: Duration) {
        if let Some(i) = &self.instruments {
            let attributes = self.attributes(call);
            i.attempt_latencies.record(as_millis(latency), &attributes);
            i.attempt_count.add(1, &attributes);
        }
    }

    /// Flushes and shuts down the meter provider, if it was created by
    /// [MetricsProvider::periodic].
    ///
    /// Application provided meter providers are not affected.
    pub fn shutdown(&self) -> Result<(), MetricsError> {
        match &self.owned_provider {
            None => Ok(()),
            Some(p) => p.shutdown().map_err(MetricsError::Shutdown),
        }
    }

    fn attributes(&self, call: &CallLabels) -> Vec<KeyValue> {
        self.client_attributes
            .iter()
            .cloned()
            .chain(call.key_values())
            .collect()
    }
}

fn as_millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Generates a unique id for this client: `rust-{uuid}@{hostname}-{pid}`.
pub fn generate_client_uid() -> Result<String, MetricsError> {
    client_uid(hostname::get())
}

fn client_uid(hostname: std::io::Result<std::ffi::OsString>) -> Result<String, MetricsError> {
    let hostname = hostname.map_err(MetricsError::Hostname)?;
    Ok(format!(
        "rust-{}@{}-{}",
        uuid::Uuid::new_v4(),
        hostname.to_string_lossy(),
        std::process::id()
    ))
}
