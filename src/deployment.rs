// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Deployment request and its resolved form.
//!
//! [`DeploymentSpec`] is what a caller writes: every field is optional and an
//! empty string, zero or empty list means "use the organization default".
//! [`ResolvedSpec`] is what [`crate::resolver::Resolver`] returns once defaults
//! are merged and every required field has been checked.

use crate::constants::{MEMORY_HEADROOM_PERCENT, PLACEHOLDER_VALUE};
use crate::identity::{instance_name, Identity};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use k8s_openapi::api::autoscaling::v2::{HorizontalPodAutoscalerBehavior, MetricSpec};
use k8s_openapi::api::core::v1::{Affinity, Toleration, TopologySpreadConstraint};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Caller-supplied deployment request.
///
/// Lists are substituted as a whole: supplying one topology constraint replaces
/// the default list rather than extending it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DeploymentSpec {
    /// Container image repository without tag (e.g. "ghcr.io/org/cartservice").
    ///
    /// Defaults to the project URL's host and path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,

    /// Image tag. Defaults to the application version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_tag: Option<String>,

    /// Runtime environment name (e.g. "dev", "prod"). Required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_env: Option<String>,

    /// OTLP collector endpoint URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otel_endpoint: Option<String>,

    /// OTLP payload compression (e.g. "gzip").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otel_compression: Option<String>,

    /// Semantic version. Defaults to the most recent repository tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,

    /// Application name. Defaults to the repository name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,

    /// Higher-level system the application belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_namespace: Option<String>,

    /// Architectural component (e.g. "api", "worker").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_component: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_unit_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_center: Option<String>,

    /// Team accountable for the workload's spend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_allocation_owner: Option<String>,

    /// Team on call for the workload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operations_owner: Option<String>,

    /// Recovery point objective as a human-readable duration (e.g. "24h", "15m").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpo: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_classification: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance_framework: Option<String>,

    /// RFC 3339 timestamp after which the workload may be torn down.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<String>,

    /// Canonical project URL. Defaults to the repository's https URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_url: Option<String>,

    /// Dashboard URL for the workload. Required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitoring_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_read_timeout_secs: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_write_timeout_secs: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_idle_timeout_secs: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics_export_interval_secs: Option<u32>,

    /// Fraction of traces sampled, within (0, 1].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_sample_ratio: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_request_millicpu: Option<u32>,

    /// Optional CPU limit. When set, a concurrency hint is emitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_limit_millicpu: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_request_mib: Option<u32>,

    /// Optional memory limit. When set, a memory headroom hint is emitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_limit_mib: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_replicas: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_replicas: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress_deadline_secs: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_pull_policy: Option<String>,

    /// Linux capabilities added back after dropping ALL (e.g. "NET_BIND_SERVICE").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_capabilities: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_class_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topology_spread_constraints: Option<Vec<TopologySpreadConstraint>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerations: Option<Vec<Toleration>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_selector: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affinity: Option<Affinity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hpa_behavior: Option<HorizontalPodAutoscalerBehavior>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hpa_metrics: Option<Vec<MetricSpec>>,

    /// Hostnames the route answers on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_hostnames: Option<Vec<String>>,

    /// Path prefix matched by the route. Defaults to `/{appName}/v{major}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_path_prefix: Option<String>,

    /// Settings that only apply in the development environment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev: Option<DevSpec>,
}

/// Development environment overrides.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DevSpec {
    /// Extra DNS nameservers for pods.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nameservers: Option<Vec<String>>,

    /// Where the code checkout is mounted in the container.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_mount_path: Option<String>,

    /// Node directory holding the code checkout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_code_path: Option<String>,

    /// Token written to a `.netrc` so the workload can fetch private modules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_token: Option<String>,
}

impl DeploymentSpec {
    /// Loads a request from a YAML (or JSON) file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not match the schema.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read deployment spec {}", path.display()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("Failed to parse deployment spec {}", path.display()))
    }

    /// Parses a request from YAML (JSON is valid YAML).
    ///
    /// # Errors
    ///
    /// Returns an error on malformed YAML or unknown fields.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        // An empty document is an empty request.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }
}

/// Development environment settings after defaults are applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DevSettings {
    pub nameservers: Vec<String>,
    pub volume_mount_path: String,
    pub host_code_path: String,
    pub git_token: Option<String>,
}

/// A fully defaulted, validated deployment.
///
/// Guarantees, established by the resolver:
/// - no required field is empty or zero
/// - no ownership field holds the template placeholder
/// - `0 < trace_sample_ratio <= 1` and `min_replicas <= max_replicas`
///
/// Only the resolver can construct one. Fields stay public for reading; the
/// assembler re-checks the guarantees before use.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct ResolvedSpec {
    pub image_ref: String,
    pub image_tag: String,
    pub runtime_env: String,
    pub otel_endpoint: Url,
    pub otel_compression: String,
    pub app_version: semver::Version,
    pub app_name: String,
    pub app_namespace: String,
    pub app_component: String,
    pub business_unit_id: String,
    pub customer_id: String,
    pub cost_center: String,
    pub cost_allocation_owner: String,
    pub operations_owner: String,
    pub rpo: Duration,
    pub data_classification: String,
    pub compliance_framework: String,
    pub expiration: Option<DateTime<Utc>>,
    pub project_url: Url,
    pub monitoring_url: Url,
    pub port: u16,
    pub http_read_timeout_secs: u32,
    pub http_write_timeout_secs: u32,
    pub http_idle_timeout_secs: u32,
    pub metrics_export_interval_secs: u32,
    pub trace_sample_ratio: f64,
    pub cpu_request_millicpu: u32,
    pub cpu_limit_millicpu: Option<u32>,
    pub memory_request_mib: u32,
    pub memory_limit_mib: Option<u32>,
    pub min_replicas: i32,
    pub max_replicas: i32,
    pub progress_deadline_secs: i32,
    pub image_pull_policy: String,
    pub added_capabilities: Vec<String>,
    pub priority_class_name: String,
    pub topology_spread_constraints: Vec<TopologySpreadConstraint>,
    pub tolerations: Vec<Toleration>,
    pub node_selector: BTreeMap<String, String>,
    pub affinity: Option<Affinity>,
    pub hpa_behavior: HorizontalPodAutoscalerBehavior,
    pub hpa_metrics: Vec<MetricSpec>,
    pub route_hostnames: Vec<String>,
    pub route_path_prefix: String,
    /// Present only when running in the development environment.
    pub dev: Option<DevSettings>,
}

impl ResolvedSpec {
    /// `{app_name}-{runtime_env}`: the name of every generated object.
    #[must_use]
    pub fn instance(&self) -> String {
        instance_name(&self.app_name, &self.runtime_env)
    }

    /// Full image reference, `{image_ref}:{image_tag}`.
    #[must_use]
    pub fn image(&self) -> String {
        format!("{}:{}", self.image_ref, self.image_tag)
    }

    #[must_use]
    pub fn is_dev(&self) -> bool {
        self.dev.is_some()
    }

    /// Labels shared by every object of this deployment.
    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity::derive(
            &self.app_name,
            &self.instance(),
            &self.app_version.to_string(),
            &self.app_component,
            &self.app_namespace,
        )
    }

    /// Number of OS threads the runtime should use.
    ///
    /// `max(1, limit / 1000, 2 * request / 1000)`, floored. `None` without a CPU limit.
    #[must_use]
    pub fn concurrency_hint(&self) -> Option<u32> {
        self.cpu_limit_millicpu
            .filter(|limit| *limit > 0)
            .map(|limit| {
                let from_limit = limit / 1000;
                let from_request = self.cpu_request_millicpu.saturating_mul(2) / 1000;
                from_limit.max(from_request).max(1)
            })
    }

    /// Soft memory limit for the runtime, in MiB: 95% of the limit, floored.
    /// `None` without a memory limit.
    #[must_use]
    pub fn memory_headroom_mib(&self) -> Option<u32> {
        self.memory_limit_mib
            .filter(|limit| *limit > 0)
            .map(|limit| {
                let headroom = u64::from(limit) * u64::from(MEMORY_HEADROOM_PERCENT) / 100;
                u32::try_from(headroom).unwrap_or(u32::MAX)
            })
    }

    /// Ownership and identity fields checked against the template placeholder.
    #[must_use]
    pub fn ownership_fields(&self) -> [(&'static str, &str); 10] {
        [
            ("appName", &self.app_name),
            ("appNamespace", &self.app_namespace),
            ("appComponent", &self.app_component),
            ("businessUnitId", &self.business_unit_id),
            ("customerId", &self.customer_id),
            ("costCenter", &self.cost_center),
            ("costAllocationOwner", &self.cost_allocation_owner),
            ("operationsOwner", &self.operations_owner),
            ("dataClassification", &self.data_classification),
            ("complianceFramework", &self.compliance_framework),
        ]
    }

    /// Names of ownership fields still set to the template placeholder.
    #[must_use]
    pub fn placeholder_fields(&self) -> Vec<&'static str> {
        self.ownership_fields()
            .into_iter()
            .filter(|(_, value)| value.eq_ignore_ascii_case(PLACEHOLDER_VALUE))
            .map(|(field, _)| field)
            .collect()
    }
}
