// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Parameter resolution: merge a [`DeploymentSpec`] with defaults and validate it.
//!
//! Merging is first-non-empty-wins. A caller value is used when it is present and
//! not empty or zero; otherwise the default is used. Lists and nested structures
//! are replaced as a whole, never merged element by element.
//!
//! Validation walks a fixed checklist in order and stops at the first field that
//! is still empty, zero or unparsable, naming it in the error. A final guard
//! rejects ownership fields left at the template placeholder.

use crate::constants::PLACEHOLDER_VALUE;
use crate::defaults::Defaults;
use crate::deployment::{DeploymentSpec, DevSettings, DevSpec, ResolvedSpec};
use crate::errors::{ConfigError, ResolveError, ValidationError};
use crate::identity::instance_name;
use crate::ownership::is_known_business_unit;
use crate::scheduling::{topology_spread_constraints, PriorityClassTable};
use crate::vcs::{self, RepoInfo, VcsMetadata};
use chrono::{DateTime, Utc};
use k8s_openapi::api::autoscaling::v2::HorizontalPodAutoscalerBehavior;
use k8s_openapi::api::core::v1::Affinity;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Turns partial deployment requests into [`ResolvedSpec`]s.
///
/// Holds only immutable configuration, so one resolver can serve concurrent
/// callers.
#[derive(Clone)]
pub struct Resolver {
    defaults: Defaults,
    priority_classes: PriorityClassTable,
    vcs: Arc<dyn VcsMetadata>,
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("defaults", &self.defaults)
            .field("priority_classes", &self.priority_classes)
            .finish_non_exhaustive()
    }
}

impl Resolver {
    /// Creates a resolver with the given defaults and repository metadata source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the defaults contain duplicate table entries.
    pub fn new(defaults: Defaults, vcs: Arc<dyn VcsMetadata>) -> Result<Self, ConfigError> {
        defaults.validate()?;
        let priority_classes = defaults.priority_class_table()?;
        Ok(Self {
            defaults,
            priority_classes,
            vcs,
        })
    }

    #[must_use]
    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    /// Resolves a partial request into a complete, validated spec.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::Vcs`] if the repository remote or tag is missing or malformed
    /// - [`ResolveError::Validation`] naming the first field that fails the checklist
    /// - [`ResolveError::PlaceholderValues`] listing every ownership field left at the placeholder
    pub fn resolve(&self, partial: &DeploymentSpec) -> Result<ResolvedSpec, ResolveError> {
        let repo = vcs::repo_info(self.vcs.as_ref())?;
        let repo_version = vcs::app_version(self.vcs.as_ref())?;

        debug!(
            app_name = %repo.app_name,
            version = %repo_version,
            "Resolving deployment spec"
        );

        let resolved = self.merge_and_validate(partial, &repo, &repo_version)?;

        let placeholders = resolved.placeholder_fields();
        if !placeholders.is_empty() {
            return Err(ResolveError::PlaceholderValues {
                placeholder: PLACEHOLDER_VALUE,
                fields: placeholders,
            });
        }

        if !self.priority_classes.contains(&resolved.priority_class_name) {
            warn!(
                priority_class = %resolved.priority_class_name,
                "Priority class is not part of the standard table"
            );
        }
        if !is_known_business_unit(&resolved.business_unit_id) {
            warn!(business_unit = %resolved.business_unit_id, "Unknown business unit");
        }

        info!(
            instance = %resolved.instance(),
            version = %resolved.app_version,
            image = %resolved.image(),
            "Resolved deployment spec"
        );
        Ok(resolved)
    }

    // Validation checklist. When adding a field, add it here too, commented out
    // if it is optional, so every field is visibly accounted for.
    #[allow(clippy::too_many_lines)]
    fn merge_and_validate(
        &self,
        p: &DeploymentSpec,
        repo: &RepoInfo,
        repo_version: &semver::Version,
    ) -> Result<ResolvedSpec, ValidationError> {
        let d = &self.defaults;

        let app_version_raw = pick(&p.app_version, repo_version.to_string());
        let app_name_raw = pick(&p.app_name, repo.app_name.clone());
        let runtime_env_raw = pick(&p.runtime_env, String::new());

        let image_ref = non_empty("imageRef", pick(&p.image_ref, default_image_ref(repo)))?;
        let image_tag = non_empty("imageTag", pick(&p.image_tag, app_version_raw.clone()))?;
        let runtime_env = non_empty("runtimeEnv", runtime_env_raw)?;
        let otel_endpoint = url_field("otelEndpoint", pick(&p.otel_endpoint, d.otel_endpoint.clone()))?;
        let otel_compression =
            non_empty("otelCompression", pick(&p.otel_compression, d.otel_compression.clone()))?;
        let app_version = version_field("appVersion", app_version_raw)?;
        let app_name = non_empty("appName", app_name_raw)?;
        let app_namespace = non_empty("appNamespace", pick(&p.app_namespace, String::new()))?;
        let app_component = non_empty("appComponent", pick(&p.app_component, String::new()))?;
        let business_unit_id =
            non_empty("businessUnitId", pick(&p.business_unit_id, String::new()))?;
        let customer_id = non_empty("customerId", pick(&p.customer_id, String::new()))?;
        let cost_center = non_empty("costCenter", pick(&p.cost_center, String::new()))?;
        let cost_allocation_owner = non_empty(
            "costAllocationOwner",
            pick(&p.cost_allocation_owner, String::new()),
        )?;
        let operations_owner =
            non_empty("operationsOwner", pick(&p.operations_owner, String::new()))?;
        let rpo = duration_field("rpo", pick(&p.rpo, String::new()))?;
        let data_classification = non_empty(
            "dataClassification",
            pick(&p.data_classification, d.data_classification.clone()),
        )?;
        let compliance_framework = non_empty(
            "complianceFramework",
            pick(&p.compliance_framework, d.compliance_framework.clone()),
        )?;
        // Optional: expiration
        let expiration = given(&p.expiration)
            .map(|raw| timestamp_field("expiration", raw))
            .transpose()?;
        let project_url =
            url_field("projectUrl", pick(&p.project_url, repo.project_url.to_string()))?;
        let monitoring_url = url_field("monitoringUrl", pick(&p.monitoring_url, String::new()))?;
        let port = non_zero("port", pick(&p.port, d.port))?;
        let http_read_timeout_secs = non_zero(
            "httpReadTimeoutSecs",
            pick(&p.http_read_timeout_secs, d.http_read_timeout_secs),
        )?;
        let http_write_timeout_secs = non_zero(
            "httpWriteTimeoutSecs",
            pick(&p.http_write_timeout_secs, d.http_write_timeout_secs),
        )?;
        let http_idle_timeout_secs = non_zero(
            "httpIdleTimeoutSecs",
            pick(&p.http_idle_timeout_secs, d.http_idle_timeout_secs),
        )?;
        let metrics_export_interval_secs = non_zero(
            "metricsExportIntervalSecs",
            pick(&p.metrics_export_interval_secs, d.metrics_export_interval_secs),
        )?;
        let trace_sample_ratio = sample_ratio(pick(&p.trace_sample_ratio, d.trace_sample_ratio))?;
        let cpu_request_millicpu = non_zero(
            "cpuRequestMillicpu",
            pick(&p.cpu_request_millicpu, d.cpu_request_millicpu),
        )?;
        // Optional: cpuLimitMillicpu
        let cpu_limit_millicpu = given(&p.cpu_limit_millicpu);
        let memory_request_mib = non_zero(
            "memoryRequestMib",
            pick(&p.memory_request_mib, d.memory_request_mib),
        )?;
        // Optional: memoryLimitMib
        let memory_limit_mib = given(&p.memory_limit_mib);
        let min_replicas = positive("minReplicas", pick(&p.min_replicas, d.min_replicas))?;
        let max_replicas = positive("maxReplicas", pick(&p.max_replicas, d.max_replicas))?;
        if min_replicas > max_replicas {
            return Err(ValidationError::ReplicaBoundsInverted {
                min: min_replicas,
                max: max_replicas,
            });
        }
        let progress_deadline_secs = positive(
            "progressDeadlineSecs",
            pick(&p.progress_deadline_secs, d.progress_deadline_secs),
        )?;
        let image_pull_policy = non_empty(
            "imagePullPolicy",
            pick(&p.image_pull_policy, d.image_pull_policy.clone()),
        )?;
        // Optional: addedCapabilities
        let added_capabilities = pick(&p.added_capabilities, Vec::new());
        // Optional: affinity
        let affinity = given(&p.affinity);
        // Optional: nodeSelector
        let node_selector = pick(&p.node_selector, BTreeMap::new());
        let priority_class_name = non_empty(
            "priorityClassName",
            pick(&p.priority_class_name, d.priority_class_name.clone()),
        )?;
        let instance = instance_name(&app_name, &runtime_env);
        let topology_spread_constraints = non_empty_list(
            "topologySpreadConstraints",
            pick_with(&p.topology_spread_constraints, || {
                topology_spread_constraints(&instance, &d.topology_keys)
            }),
        )?;
        // Optional: tolerations (an empty default table is allowed)
        let tolerations = pick(&p.tolerations, d.tolerations.clone());
        let hpa_behavior = pick(&p.hpa_behavior, d.hpa_behavior.clone());
        if hpa_behavior.is_unset() {
            return Err(ValidationError::Empty {
                field: "hpaBehavior",
            });
        }
        let hpa_metrics = non_empty_list("hpaMetrics", pick(&p.hpa_metrics, d.hpa_metrics.clone()))?;
        // Optional: routeHostnames (an empty list matches every gateway listener)
        let route_hostnames = pick(&p.route_hostnames, d.route_hostnames.clone());
        let route_path_prefix = path_prefix(pick_with(&p.route_path_prefix, || {
            format!("/{app_name}/v{}", app_version.major)
        }))?;

        let dev = if runtime_env == d.dev_runtime_env {
            Some(self.dev_settings(p.dev.as_ref())?)
        } else {
            None
        };

        Ok(ResolvedSpec {
            image_ref,
            image_tag,
            runtime_env,
            otel_endpoint,
            otel_compression,
            app_version,
            app_name,
            app_namespace,
            app_component,
            business_unit_id,
            customer_id,
            cost_center,
            cost_allocation_owner,
            operations_owner,
            rpo,
            data_classification,
            compliance_framework,
            expiration,
            project_url,
            monitoring_url,
            port,
            http_read_timeout_secs,
            http_write_timeout_secs,
            http_idle_timeout_secs,
            metrics_export_interval_secs,
            trace_sample_ratio,
            cpu_request_millicpu,
            cpu_limit_millicpu,
            memory_request_mib,
            memory_limit_mib,
            min_replicas,
            max_replicas,
            progress_deadline_secs,
            image_pull_policy,
            added_capabilities,
            priority_class_name,
            topology_spread_constraints,
            tolerations,
            node_selector,
            affinity,
            hpa_behavior,
            hpa_metrics,
            route_hostnames,
            route_path_prefix,
            dev,
        })
    }

    fn dev_settings(&self, dev: Option<&DevSpec>) -> Result<DevSettings, ValidationError> {
        let defaults = &self.defaults.dev;
        let empty = DevSpec::default();
        let dev = dev.unwrap_or(&empty);

        Ok(DevSettings {
            // Optional: nameservers
            nameservers: pick(&dev.nameservers, defaults.nameservers.clone()),
            volume_mount_path: non_empty(
                "dev.volumeMountPath",
                pick(&dev.volume_mount_path, defaults.volume_mount_path.clone()),
            )?,
            host_code_path: non_empty(
                "dev.hostCodePath",
                pick(&dev.host_code_path, defaults.host_code_path.clone()),
            )?,
            // Optional: gitToken
            git_token: given(&dev.git_token),
        })
    }
}

// ============================================================================
// Merge helpers
// ============================================================================

/// Zero-value detection used by the merge: empty and zero mean "not supplied".
trait Unset {
    fn is_unset(&self) -> bool;
}

impl Unset for String {
    fn is_unset(&self) -> bool {
        self.is_empty()
    }
}

macro_rules! impl_unset_for_numbers {
    ($($t:ty),*) => {
        $(impl Unset for $t {
            fn is_unset(&self) -> bool {
                *self == 0
            }
        })*
    };
}

impl_unset_for_numbers!(u16, u32, i32);

impl Unset for f64 {
    fn is_unset(&self) -> bool {
        *self == 0.0
    }
}

impl<T> Unset for Vec<T> {
    fn is_unset(&self) -> bool {
        self.is_empty()
    }
}

impl<K, V> Unset for BTreeMap<K, V> {
    fn is_unset(&self) -> bool {
        self.is_empty()
    }
}

impl Unset for HorizontalPodAutoscalerBehavior {
    fn is_unset(&self) -> bool {
        self.scale_down.is_none() && self.scale_up.is_none()
    }
}

impl Unset for Affinity {
    fn is_unset(&self) -> bool {
        self.node_affinity.is_none()
            && self.pod_affinity.is_none()
            && self.pod_anti_affinity.is_none()
    }
}

/// The caller's value when it is present and set.
fn given<T: Unset + Clone>(value: &Option<T>) -> Option<T> {
    value.as_ref().filter(|v| !v.is_unset()).cloned()
}

fn pick<T: Unset + Clone>(value: &Option<T>, default: T) -> T {
    given(value).unwrap_or(default)
}

fn pick_with<T: Unset + Clone>(value: &Option<T>, default: impl FnOnce() -> T) -> T {
    given(value).unwrap_or_else(default)
}

fn default_image_ref(repo: &RepoInfo) -> String {
    let host = repo.project_url.host_str().unwrap_or_default();
    format!("{host}{}", repo.project_url.path())
}

// ============================================================================
// Checklist helpers
// ============================================================================

fn non_empty(field: &'static str, value: String) -> Result<String, ValidationError> {
    if value.is_empty() {
        Err(ValidationError::Empty { field })
    } else {
        Ok(value)
    }
}

fn non_zero<T: Unset>(field: &'static str, value: T) -> Result<T, ValidationError> {
    if value.is_unset() {
        Err(ValidationError::Zero { field })
    } else {
        Ok(value)
    }
}

fn positive(field: &'static str, value: i32) -> Result<i32, ValidationError> {
    match value {
        0 => Err(ValidationError::Zero { field }),
        v if v < 0 => Err(ValidationError::Malformed {
            field,
            value: v.to_string(),
            reason: "must be positive".to_string(),
        }),
        v => Ok(v),
    }
}

fn non_empty_list<T>(field: &'static str, value: Vec<T>) -> Result<Vec<T>, ValidationError> {
    if value.is_empty() {
        Err(ValidationError::Empty { field })
    } else {
        Ok(value)
    }
}

fn url_field(field: &'static str, value: String) -> Result<Url, ValidationError> {
    let value = non_empty(field, value)?;
    Url::parse(&value).map_err(|e| ValidationError::Malformed {
        field,
        value,
        reason: e.to_string(),
    })
}

fn version_field(field: &'static str, value: String) -> Result<semver::Version, ValidationError> {
    let value = non_empty(field, value)?;
    let bare = value.strip_prefix('v').unwrap_or(&value);
    semver::Version::parse(bare).map_err(|e| ValidationError::Malformed {
        field,
        value: value.clone(),
        reason: e.to_string(),
    })
}

fn duration_field(field: &'static str, value: String) -> Result<Duration, ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Zero { field });
    }
    let duration = humantime::parse_duration(&value).map_err(|e| ValidationError::Malformed {
        field,
        value: value.clone(),
        reason: e.to_string(),
    })?;
    if duration.is_zero() {
        return Err(ValidationError::Zero { field });
    }
    Ok(duration)
}

fn timestamp_field(field: &'static str, value: String) -> Result<DateTime<Utc>, ValidationError> {
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ValidationError::Malformed {
            field,
            value,
            reason: e.to_string(),
        })
}

fn sample_ratio(ratio: f64) -> Result<f64, ValidationError> {
    if ratio > 0.0 && ratio <= 1.0 {
        Ok(ratio)
    } else {
        Err(ValidationError::SampleRatioOutOfRange { ratio })
    }
}

fn path_prefix(value: String) -> Result<String, ValidationError> {
    if value.starts_with('/') {
        Ok(value)
    } else {
        Err(ValidationError::Malformed {
            field: "routePathPrefix",
            value,
            reason: "must start with '/'".to_string(),
        })
    }
}
