// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Organization-wide defaults injected into the resolver.
//!
//! [`Defaults::default`] reproduces the organization's conventions. A YAML file
//! can override any subset of them; keys left out keep their default.

use crate::constants::{
    DEFAULT_COMPLIANCE_FRAMEWORK, DEFAULT_CPU_REQUEST_MILLICPU, DEFAULT_DATA_CLASSIFICATION,
    DEFAULT_HTTP_IDLE_TIMEOUT_SECS, DEFAULT_HTTP_PORT, DEFAULT_HTTP_READ_TIMEOUT_SECS,
    DEFAULT_HTTP_WRITE_TIMEOUT_SECS, DEFAULT_IMAGE_PULL_POLICY, DEFAULT_MAX_REPLICAS,
    DEFAULT_MEMORY_REQUEST_MIB, DEFAULT_METRICS_EXPORT_INTERVAL_SECS, DEFAULT_MIN_REPLICAS,
    DEFAULT_OTEL_COMPRESSION, DEFAULT_OTEL_ENDPOINT, DEFAULT_PRIORITY_CLASS,
    DEFAULT_PROGRESS_DEADLINE_SECS, DEFAULT_ROUTE_HOSTNAME, DEFAULT_TRACE_SAMPLE_RATIO,
    DEV_DEFAULT_HOST_CODE_PATH, DEV_DEFAULT_NAMESERVER, DEV_DEFAULT_VOLUME_MOUNT_PATH,
    HPA_CPU_UTILIZATION_PERCENT, HPA_SCALE_PERCENT, HPA_SCALE_PERIOD_SECS, RUNTIME_ENV_DEV,
};
use crate::errors::ConfigError;
use crate::scheduling::{
    standard_tolerations, standard_topology_keys, validate_tolerations, validate_topology_keys,
    PriorityClassTable, PriorityTier,
};
use anyhow::{Context, Result};
use k8s_openapi::api::autoscaling::v2::{
    HPAScalingPolicy, HPAScalingRules, HorizontalPodAutoscalerBehavior, MetricSpec, MetricTarget,
    ResourceMetricSource,
};
use k8s_openapi::api::core::v1::Toleration;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Defaults applied to every field a caller leaves empty.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Defaults {
    pub otel_endpoint: String,
    pub otel_compression: String,
    pub data_classification: String,
    pub compliance_framework: String,
    pub port: u16,
    pub http_read_timeout_secs: u32,
    pub http_write_timeout_secs: u32,
    pub http_idle_timeout_secs: u32,
    pub metrics_export_interval_secs: u32,
    pub trace_sample_ratio: f64,
    pub cpu_request_millicpu: u32,
    pub memory_request_mib: u32,
    pub min_replicas: i32,
    pub max_replicas: i32,
    pub progress_deadline_secs: i32,
    pub image_pull_policy: String,
    pub priority_class_name: String,
    /// Topology dimensions a workload spreads across, widest first
    pub topology_keys: Vec<String>,
    pub tolerations: Vec<Toleration>,
    pub hpa_behavior: HorizontalPodAutoscalerBehavior,
    pub hpa_metrics: Vec<MetricSpec>,
    pub route_hostnames: Vec<String>,
    /// Runtime environment treated as local development
    pub dev_runtime_env: String,
    pub dev: DevDefaults,
    pub priority_classes: Vec<PriorityTier>,
}

/// Development environment defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct DevDefaults {
    pub nameservers: Vec<String>,
    pub volume_mount_path: String,
    pub host_code_path: String,
}

impl Default for DevDefaults {
    fn default() -> Self {
        Self {
            nameservers: vec![DEV_DEFAULT_NAMESERVER.to_string()],
            volume_mount_path: DEV_DEFAULT_VOLUME_MOUNT_PATH.to_string(),
            host_code_path: DEV_DEFAULT_HOST_CODE_PATH.to_string(),
        }
    }
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            otel_endpoint: DEFAULT_OTEL_ENDPOINT.to_string(),
            otel_compression: DEFAULT_OTEL_COMPRESSION.to_string(),
            data_classification: DEFAULT_DATA_CLASSIFICATION.to_string(),
            compliance_framework: DEFAULT_COMPLIANCE_FRAMEWORK.to_string(),
            port: DEFAULT_HTTP_PORT,
            http_read_timeout_secs: DEFAULT_HTTP_READ_TIMEOUT_SECS,
            http_write_timeout_secs: DEFAULT_HTTP_WRITE_TIMEOUT_SECS,
            http_idle_timeout_secs: DEFAULT_HTTP_IDLE_TIMEOUT_SECS,
            metrics_export_interval_secs: DEFAULT_METRICS_EXPORT_INTERVAL_SECS,
            trace_sample_ratio: DEFAULT_TRACE_SAMPLE_RATIO,
            cpu_request_millicpu: DEFAULT_CPU_REQUEST_MILLICPU,
            memory_request_mib: DEFAULT_MEMORY_REQUEST_MIB,
            min_replicas: DEFAULT_MIN_REPLICAS,
            max_replicas: DEFAULT_MAX_REPLICAS,
            progress_deadline_secs: DEFAULT_PROGRESS_DEADLINE_SECS,
            image_pull_policy: DEFAULT_IMAGE_PULL_POLICY.to_string(),
            priority_class_name: DEFAULT_PRIORITY_CLASS.to_string(),
            topology_keys: standard_topology_keys(),
            tolerations: standard_tolerations(),
            hpa_behavior: standard_hpa_behavior(),
            hpa_metrics: standard_hpa_metrics(),
            route_hostnames: vec![DEFAULT_ROUTE_HOSTNAME.to_string()],
            dev_runtime_env: RUNTIME_ENV_DEV.to_string(),
            dev: DevDefaults::default(),
            priority_classes: PriorityClassTable::standard().iter().cloned().collect(),
        }
    }
}

impl Defaults {
    /// Loads defaults from a YAML file, keeping built-in values for absent keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the tables
    /// it defines fail [`Defaults::validate`].
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read defaults file {}", path.display()))?;
        let defaults: Self = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse defaults file {}", path.display()))?
        };
        defaults
            .validate()
            .with_context(|| format!("Invalid defaults in {}", path.display()))?;
        Ok(defaults)
    }

    /// Checks the static tables for duplicate keys.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_topology_keys(&self.topology_keys)?;
        validate_tolerations(&self.tolerations)?;
        self.priority_class_table()?;
        Ok(())
    }

    /// Priority tiers as a validated table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on duplicate names, values or global defaults.
    pub fn priority_class_table(&self) -> Result<PriorityClassTable, ConfigError> {
        PriorityClassTable::new(self.priority_classes.clone())
    }
}

/// Scale by at most 30% of current replicas per minute in both directions,
/// picking the most conservative policy down and the most aggressive up.
#[must_use]
pub fn standard_hpa_behavior() -> HorizontalPodAutoscalerBehavior {
    let rules = |select_policy: &str| HPAScalingRules {
        policies: Some(vec![HPAScalingPolicy {
            type_: "Percent".to_string(),
            value: HPA_SCALE_PERCENT,
            period_seconds: HPA_SCALE_PERIOD_SECS,
        }]),
        select_policy: Some(select_policy.to_string()),
        ..Default::default()
    };

    HorizontalPodAutoscalerBehavior {
        scale_down: Some(rules("Min")),
        scale_up: Some(rules("Max")),
    }
}

/// Target 70% average CPU utilization.
#[must_use]
pub fn standard_hpa_metrics() -> Vec<MetricSpec> {
    vec![MetricSpec {
        type_: "Resource".to_string(),
        resource: Some(ResourceMetricSource {
            name: "cpu".to_string(),
            target: MetricTarget {
                type_: "Utilization".to_string(),
                average_utilization: Some(HPA_CPU_UTILIZATION_PERCENT),
                ..Default::default()
            },
        }),
        ..Default::default()
    }]
}
