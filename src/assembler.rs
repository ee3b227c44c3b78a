// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Kubernetes resource builders for an HTTP workload.
//!
//! [`Assembler::assemble`] turns a [`ResolvedSpec`] into a [`ResourceGraph`] in
//! dependency order: namespace, config, (dev secret), workload, autoscaler,
//! service, route. Every `build_*` function is pure; names that one object uses
//! to reference another are read from the already-built object.

use crate::constants::{
    ENV_APP_NAME, ENV_APP_NAMESPACE, ENV_APP_VERSION, ENV_BUSINESS_UNIT_ID,
    ENV_COMPLIANCE_FRAMEWORK, ENV_COST_ALLOCATION_OWNER, ENV_COST_CENTER, ENV_CUSTOMER_ID,
    ENV_DATA_CLASSIFICATION, ENV_EXPIRATION, ENV_HTTP_IDLE_TIMEOUT, ENV_HTTP_PORT,
    ENV_HTTP_READ_TIMEOUT, ENV_HTTP_WRITE_TIMEOUT, ENV_MAX_PROCS, ENV_MEMORY_LIMIT,
    ENV_METRICS_EXPORT_INTERVAL, ENV_MONITORING_URL, ENV_OPERATIONS_OWNER, ENV_OTEL_COMPRESSION,
    ENV_OTEL_ENDPOINT, ENV_PROJECT_URL, ENV_RPO, ENV_RUNTIME_ENV, ENV_TRACE_SAMPLE_RATIO,
    HTTP_PORT_NAME, LIVENESS_INITIAL_DELAY_SECS, LIVENESS_PATH, NETRC_FILE_NAME, NONROOT_HOME,
    READINESS_PATH, SERVICE_APP_PROTOCOL, SERVICE_TRAFFIC_DISTRIBUTION, SHARED_GATEWAY_NAME,
    SHARED_GATEWAY_NAMESPACE,
};
use crate::deployment::{DevSettings, ResolvedSpec};
use crate::errors::AssemblyError;
use crate::gateway_api::{
    HTTPRoute, HTTPRouteRule, HTTPRouteSpec, ParentReference, GATEWAY_API_GROUP, KIND_GATEWAY,
};
use crate::graph::{GraphObject, ResourceGraph};
use crate::identity::{is_dns_label, Identity};
use crate::labels::{
    CONFIG_CHECKSUM_ANNOTATION, POD_SECURITY_AUDIT, POD_SECURITY_AUDIT_VERSION,
    POD_SECURITY_ENFORCE, POD_SECURITY_ENFORCE_VERSION, POD_SECURITY_LEVEL_PRIVILEGED,
    POD_SECURITY_LEVEL_RESTRICTED, POD_SECURITY_VERSION_LATEST, POD_SECURITY_WARN,
    POD_SECURITY_WARN_VERSION, SHARED_GATEWAY_ACCESS_ENABLED, SHARED_GATEWAY_ACCESS_LABEL,
};
use chrono::SecondsFormat;
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::autoscaling::v2::{
    CrossVersionObjectReference, HorizontalPodAutoscaler, HorizontalPodAutoscalerSpec,
};
use k8s_openapi::api::core::v1::{
    Capabilities, ConfigMap, ConfigMapEnvSource, Container, ContainerPort, EnvFromSource,
    HTTPGetAction, HostPathVolumeSource, KeyToPath, Namespace, PodDNSConfig, PodSpec,
    PodTemplateSpec, Probe, ProjectedVolumeSource, ResourceRequirements, SeccompProfile, Secret,
    SecretProjection, SecurityContext, Service, ServicePort, ServiceSpec, Volume, VolumeMount,
    VolumeProjection,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use k8s_openapi::Resource;
use kube::ResourceExt;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Fixed settings of the assembler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssemblerConfig {
    /// Gateway every route attaches to
    pub gateway_name: String,
    pub gateway_namespace: String,
    pub liveness_path: String,
    pub readiness_path: String,
    pub liveness_initial_delay_secs: i32,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            gateway_name: SHARED_GATEWAY_NAME.to_string(),
            gateway_namespace: SHARED_GATEWAY_NAMESPACE.to_string(),
            liveness_path: LIVENESS_PATH.to_string(),
            readiness_path: READINESS_PATH.to_string(),
            liveness_initial_delay_secs: LIVENESS_INITIAL_DELAY_SECS,
        }
    }
}

/// Builds the resource graph of a resolved deployment.
#[derive(Clone, Debug, Default)]
pub struct Assembler {
    config: AssemblerConfig,
}

impl Assembler {
    #[must_use]
    pub fn new(config: AssemblerConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &AssemblerConfig {
        &self.config
    }

    /// Builds every object of the deployment, in dependency order.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError`] if `spec` breaks a resolver guarantee or does
    /// not belong to `identity`. Both indicate a bug upstream, not bad input.
    pub fn assemble(
        &self,
        spec: &ResolvedSpec,
        identity: &Identity,
    ) -> Result<ResourceGraph, AssemblyError> {
        check_invariants(spec, identity)?;

        let namespace = build_namespace(spec, identity);
        let ns = namespace.name_any();

        let configmap = build_configmap(&ns, spec, identity);
        let git_secret = spec.dev.as_ref().and_then(|dev| {
            dev.git_token
                .as_deref()
                .map(|token| build_git_secret(&ns, spec, identity, token))
        });
        let deployment = build_deployment(
            &ns,
            spec,
            identity,
            &configmap,
            git_secret.as_ref(),
            &self.config,
        );
        let hpa = build_hpa(&ns, spec, identity, &deployment);
        let service = build_service(&ns, spec, identity);
        let route = build_http_route(&ns, spec, identity, &service, &self.config);

        let mut graph = ResourceGraph::new();
        graph.push(GraphObject::Namespace(namespace))?;
        graph.push(GraphObject::ConfigMap(configmap))?;
        if let Some(secret) = git_secret {
            graph.push(GraphObject::Secret(secret))?;
        }
        graph.push(GraphObject::Deployment(deployment))?;
        graph.push(GraphObject::HorizontalPodAutoscaler(hpa))?;
        graph.push(GraphObject::Service(service))?;
        graph.push(GraphObject::HttpRoute(route))?;

        info!(
            instance = %identity.instance,
            objects = graph.len(),
            "Assembled resource graph"
        );
        Ok(graph)
    }
}

/// Re-checks the guarantees [`crate::resolver::Resolver`] establishes.
///
/// # Errors
///
/// Returns [`AssemblyError::InvariantViolation`] naming the first broken field.
pub fn check_invariants(spec: &ResolvedSpec, identity: &Identity) -> Result<(), AssemblyError> {
    let violation = |field: &'static str, reason: &str| -> Result<(), AssemblyError> {
        Err(AssemblyError::InvariantViolation {
            field,
            reason: reason.to_string(),
        })
    };

    for (field, value) in [
        ("imageRef", spec.image_ref.as_str()),
        ("imageTag", spec.image_tag.as_str()),
        ("runtimeEnv", spec.runtime_env.as_str()),
        ("otelCompression", spec.otel_compression.as_str()),
        ("imagePullPolicy", spec.image_pull_policy.as_str()),
        ("priorityClassName", spec.priority_class_name.as_str()),
    ]
    .into_iter()
    .chain(spec.ownership_fields())
    {
        if value.is_empty() {
            return violation(field, "is empty");
        }
    }
    if let Some(&field) = spec.placeholder_fields().first() {
        return violation(field, "holds the template placeholder");
    }
    if identity.instance != spec.instance() {
        return violation("instance", "identity does not belong to this spec");
    }
    if !is_dns_label(&identity.instance) {
        return violation(
            "instance",
            "must be a DNS label: lowercase alphanumerics and '-', starting with a letter, at most 63 characters",
        );
    }
    if spec.port == 0 {
        return violation("port", "is zero");
    }
    if spec.cpu_request_millicpu == 0 || spec.memory_request_mib == 0 {
        return violation("resources", "requests must be non-zero");
    }
    if spec.min_replicas < 1 || spec.min_replicas > spec.max_replicas {
        return violation("replicas", "bounds must satisfy 1 <= min <= max");
    }
    if spec.progress_deadline_secs < 1 {
        return violation("progressDeadlineSecs", "must be positive");
    }
    if !(spec.trace_sample_ratio > 0.0 && spec.trace_sample_ratio <= 1.0) {
        return violation("traceSampleRatio", "must be within (0, 1]");
    }
    if spec.topology_spread_constraints.is_empty() {
        return violation("topologySpreadConstraints", "is empty");
    }
    if spec.hpa_metrics.is_empty() {
        return violation("hpaMetrics", "is empty");
    }
    if !spec.route_path_prefix.starts_with('/') {
        return violation("routePathPrefix", "must start with '/'");
    }
    Ok(())
}

// ============================================================================
// Namespace
// ============================================================================

/// Builds the application namespace.
///
/// Pod security is enforced at `restricted` except in the development
/// environment, which needs host path volumes. Audit and warn stay `restricted`
/// everywhere so dev still reports what production would reject.
#[must_use]
pub fn build_namespace(spec: &ResolvedSpec, identity: &Identity) -> Namespace {
    let name = identity.instance.clone();
    debug!(name = %name, "Building Namespace");

    let enforce = if spec.is_dev() {
        POD_SECURITY_LEVEL_PRIVILEGED
    } else {
        POD_SECURITY_LEVEL_RESTRICTED
    };

    let mut labels = identity.labels();
    labels.insert(POD_SECURITY_ENFORCE.into(), enforce.into());
    labels.insert(
        POD_SECURITY_ENFORCE_VERSION.into(),
        POD_SECURITY_VERSION_LATEST.into(),
    );
    labels.insert(POD_SECURITY_AUDIT.into(), POD_SECURITY_LEVEL_RESTRICTED.into());
    labels.insert(
        POD_SECURITY_AUDIT_VERSION.into(),
        POD_SECURITY_VERSION_LATEST.into(),
    );
    labels.insert(POD_SECURITY_WARN.into(), POD_SECURITY_LEVEL_RESTRICTED.into());
    labels.insert(
        POD_SECURITY_WARN_VERSION.into(),
        POD_SECURITY_VERSION_LATEST.into(),
    );
    labels.insert(
        SHARED_GATEWAY_ACCESS_LABEL.into(),
        SHARED_GATEWAY_ACCESS_ENABLED.into(),
    );

    Namespace {
        metadata: ObjectMeta {
            name: Some(name),
            labels: Some(labels),
            ..Default::default()
        },
        ..Default::default()
    }
}

// ============================================================================
// ConfigMap
// ============================================================================

/// Environment entries handed to the application.
///
/// Expiration and the concurrency and memory hints are only present when the
/// corresponding value is set.
#[must_use]
pub fn build_env_data(spec: &ResolvedSpec) -> BTreeMap<String, String> {
    let mut data = BTreeMap::new();
    let mut put = |key: &str, value: String| {
        data.insert(key.to_string(), value);
    };

    put(ENV_RUNTIME_ENV, spec.runtime_env.clone());
    put(ENV_APP_VERSION, spec.app_version.to_string());
    put(ENV_APP_NAME, spec.instance());
    put(ENV_APP_NAMESPACE, spec.app_namespace.clone());
    put(ENV_OTEL_ENDPOINT, url_string(&spec.otel_endpoint));
    put(ENV_OTEL_COMPRESSION, spec.otel_compression.clone());
    put(ENV_HTTP_PORT, spec.port.to_string());
    put(ENV_HTTP_READ_TIMEOUT, spec.http_read_timeout_secs.to_string());
    put(ENV_HTTP_WRITE_TIMEOUT, spec.http_write_timeout_secs.to_string());
    put(ENV_HTTP_IDLE_TIMEOUT, spec.http_idle_timeout_secs.to_string());
    put(
        ENV_METRICS_EXPORT_INTERVAL,
        spec.metrics_export_interval_secs.to_string(),
    );
    put(ENV_TRACE_SAMPLE_RATIO, spec.trace_sample_ratio.to_string());
    put(ENV_BUSINESS_UNIT_ID, spec.business_unit_id.clone());
    put(ENV_CUSTOMER_ID, spec.customer_id.clone());
    put(ENV_COST_CENTER, spec.cost_center.clone());
    put(ENV_COST_ALLOCATION_OWNER, spec.cost_allocation_owner.clone());
    put(ENV_OPERATIONS_OWNER, spec.operations_owner.clone());
    put(ENV_RPO, duration_string(spec.rpo));
    put(ENV_DATA_CLASSIFICATION, spec.data_classification.clone());
    put(ENV_COMPLIANCE_FRAMEWORK, spec.compliance_framework.clone());
    put(ENV_PROJECT_URL, url_string(&spec.project_url));
    put(ENV_MONITORING_URL, url_string(&spec.monitoring_url));

    if let Some(expiration) = spec.expiration {
        put(
            ENV_EXPIRATION,
            expiration.to_rfc3339_opts(SecondsFormat::Secs, true),
        );
    }
    if let Some(procs) = spec.concurrency_hint() {
        put(ENV_MAX_PROCS, procs.to_string());
    }
    if let Some(mib) = spec.memory_headroom_mib() {
        put(ENV_MEMORY_LIMIT, format!("{mib}MiB"));
    }

    data
}

/// Builds the `ConfigMap` consumed by the workload through `envFrom`.
#[must_use]
pub fn build_configmap(namespace: &str, spec: &ResolvedSpec, identity: &Identity) -> ConfigMap {
    let name = identity.instance.clone();
    debug!(name = %name, namespace = %namespace, "Building ConfigMap");

    ConfigMap {
        metadata: ObjectMeta {
            name: Some(name),
            namespace: Some(namespace.into()),
            labels: Some(identity.labels()),
            ..Default::default()
        },
        data: Some(build_env_data(spec)),
        ..Default::default()
    }
}

/// SHA-256 over the sorted entries of a config data map, hex encoded.
#[must_use]
pub fn calculate_config_hash(data: &BTreeMap<String, String>) -> String {
    let mut hasher = Sha256::new();
    for (key, value) in data {
        hasher.update(key.as_bytes());
        hasher.update(b"=");
        hasher.update(value.as_bytes());
        hasher.update(b"\n");
    }
    format!("{:x}", hasher.finalize())
}

// ============================================================================
// Development Secret
// ============================================================================

/// Builds the `.netrc` secret mounted into development pods.
#[must_use]
pub fn build_git_secret(
    namespace: &str,
    spec: &ResolvedSpec,
    identity: &Identity,
    token: &str,
) -> Secret {
    let name = git_secret_name(&identity.instance);
    debug!(name = %name, namespace = %namespace, "Building git credentials Secret");

    let host = spec.project_url.host_str().unwrap_or_default();
    let netrc = format!("machine {host}\nlogin git\npassword {token}\n");

    Secret {
        metadata: ObjectMeta {
            name: Some(name),
            namespace: Some(namespace.into()),
            labels: Some(identity.labels()),
            ..Default::default()
        },
        type_: Some("Opaque".into()),
        string_data: Some(BTreeMap::from([(NETRC_FILE_NAME.to_string(), netrc)])),
        ..Default::default()
    }
}

#[must_use]
pub fn git_secret_name(instance: &str) -> String {
    format!("{instance}-git-secret")
}

// ============================================================================
// Deployment
// ============================================================================

/// Builds the `Deployment` running the application container.
///
/// # Arguments
///
/// * `namespace` - Namespace built for this instance
/// * `spec` - Resolved deployment
/// * `identity` - Labels shared by every object
/// * `configmap` - Config map the container reads its environment from
/// * `git_secret` - Dev-only `.netrc` secret to project into the container
/// * `config` - Probe settings
#[must_use]
pub fn build_deployment(
    namespace: &str,
    spec: &ResolvedSpec,
    identity: &Identity,
    configmap: &ConfigMap,
    git_secret: Option<&Secret>,
    config: &AssemblerConfig,
) -> Deployment {
    let name = identity.instance.clone();
    debug!(name = %name, namespace = %namespace, "Building Deployment");

    let checksum = calculate_config_hash(configmap.data.as_ref().unwrap_or(&BTreeMap::new()));

    Deployment {
        metadata: ObjectMeta {
            name: Some(name.clone()),
            namespace: Some(namespace.into()),
            labels: Some(identity.labels()),
            ..Default::default()
        },
        spec: Some(DeploymentSpec {
            selector: LabelSelector {
                match_labels: Some(identity.selector()),
                ..Default::default()
            },
            progress_deadline_seconds: Some(spec.progress_deadline_secs),
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(identity.labels()),
                    annotations: Some(BTreeMap::from([(
                        CONFIG_CHECKSUM_ANNOTATION.to_string(),
                        checksum,
                    )])),
                    ..Default::default()
                }),
                spec: Some(build_pod_spec(spec, identity, configmap, git_secret, config)),
            },
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Builds the pod spec: one hardened container plus scheduling hints.
#[must_use]
pub fn build_pod_spec(
    spec: &ResolvedSpec,
    identity: &Identity,
    configmap: &ConfigMap,
    git_secret: Option<&Secret>,
    config: &AssemblerConfig,
) -> PodSpec {
    let mut container = build_container(spec, identity, configmap, config);
    let mut volumes = None;
    let mut dns_config = None;

    if let Some(dev) = &spec.dev {
        let (dev_volumes, dev_mounts) = build_dev_volumes(spec, identity, dev, git_secret);
        container.volume_mounts = Some(dev_mounts);
        volumes = Some(dev_volumes);
        if !dev.nameservers.is_empty() {
            dns_config = Some(PodDNSConfig {
                nameservers: Some(dev.nameservers.clone()),
                ..Default::default()
            });
        }
    }

    PodSpec {
        containers: vec![container],
        priority_class_name: Some(spec.priority_class_name.clone()),
        topology_spread_constraints: Some(spec.topology_spread_constraints.clone()),
        tolerations: (!spec.tolerations.is_empty()).then(|| spec.tolerations.clone()),
        node_selector: (!spec.node_selector.is_empty()).then(|| spec.node_selector.clone()),
        affinity: spec.affinity.clone(),
        dns_config,
        volumes,
        ..Default::default()
    }
}

fn build_container(
    spec: &ResolvedSpec,
    identity: &Identity,
    configmap: &ConfigMap,
    config: &AssemblerConfig,
) -> Container {
    let port = i32::from(spec.port);
    let dev = spec.dev.as_ref();

    // Dev runs a file watcher that restarts the process; probes would kill it mid-rebuild.
    let (liveness_probe, readiness_probe) = if dev.is_some() {
        (None, None)
    } else {
        (
            Some(Probe {
                http_get: Some(http_get(&config.liveness_path, port)),
                initial_delay_seconds: Some(config.liveness_initial_delay_secs),
                ..Default::default()
            }),
            Some(Probe {
                http_get: Some(http_get(&config.readiness_path, port)),
                ..Default::default()
            }),
        )
    };

    Container {
        name: identity.instance.clone(),
        image: Some(spec.image()),
        image_pull_policy: Some(spec.image_pull_policy.clone()),
        ports: Some(vec![ContainerPort {
            name: Some(HTTP_PORT_NAME.into()),
            container_port: port,
            protocol: Some("TCP".into()),
            ..Default::default()
        }]),
        env_from: Some(vec![EnvFromSource {
            config_map_ref: Some(ConfigMapEnvSource {
                name: configmap.name_any(),
                ..Default::default()
            }),
            ..Default::default()
        }]),
        liveness_probe,
        readiness_probe,
        security_context: Some(build_security_context(&spec.added_capabilities)),
        resources: Some(build_resources(spec)),
        stdin: dev.map(|_| true),
        tty: dev.map(|_| true),
        working_dir: dev.map(|d| format!("{}/{}", d.volume_mount_path, spec.app_name)),
        ..Default::default()
    }
}

fn http_get(path: &str, port: i32) -> HTTPGetAction {
    HTTPGetAction {
        path: Some(path.to_string()),
        port: IntOrString::Int(port),
        ..Default::default()
    }
}

/// Restricted-profile security context: non-root, no privilege escalation,
/// default seccomp profile, every capability dropped except `added`.
#[must_use]
pub fn build_security_context(added: &[String]) -> SecurityContext {
    SecurityContext {
        allow_privilege_escalation: Some(false),
        run_as_non_root: Some(true),
        seccomp_profile: Some(SeccompProfile {
            type_: "RuntimeDefault".into(),
            ..Default::default()
        }),
        capabilities: Some(Capabilities {
            drop: Some(vec!["ALL".into()]),
            add: (!added.is_empty()).then(|| added.to_vec()),
        }),
        ..Default::default()
    }
}

/// Requests are always set; limits only when configured.
#[must_use]
pub fn build_resources(spec: &ResolvedSpec) -> ResourceRequirements {
    let requests = BTreeMap::from([
        (
            "cpu".to_string(),
            Quantity(format!("{}m", spec.cpu_request_millicpu)),
        ),
        (
            "memory".to_string(),
            Quantity(format!("{}Mi", spec.memory_request_mib)),
        ),
    ]);

    let mut limits = BTreeMap::new();
    if let Some(cpu) = spec.cpu_limit_millicpu {
        limits.insert("cpu".to_string(), Quantity(format!("{cpu}m")));
    }
    if let Some(memory) = spec.memory_limit_mib {
        limits.insert("memory".to_string(), Quantity(format!("{memory}Mi")));
    }

    ResourceRequirements {
        requests: Some(requests),
        limits: (!limits.is_empty()).then_some(limits),
        ..Default::default()
    }
}

fn build_dev_volumes(
    spec: &ResolvedSpec,
    identity: &Identity,
    dev: &DevSettings,
    git_secret: Option<&Secret>,
) -> (Vec<Volume>, Vec<VolumeMount>) {
    let code_volume = identity.instance.clone();
    let mut volumes = vec![Volume {
        name: code_volume.clone(),
        host_path: Some(HostPathVolumeSource {
            path: dev.host_code_path.clone(),
            type_: Some("Directory".into()),
        }),
        ..Default::default()
    }];
    let mut mounts = vec![VolumeMount {
        name: code_volume,
        mount_path: dev.volume_mount_path.clone(),
        ..Default::default()
    }];

    if let Some(secret) = git_secret {
        let secret_name = secret.name_any();
        volumes.push(Volume {
            name: secret_name.clone(),
            projected: Some(ProjectedVolumeSource {
                sources: Some(vec![VolumeProjection {
                    secret: Some(SecretProjection {
                        name: secret_name.clone(),
                        items: Some(vec![KeyToPath {
                            key: NETRC_FILE_NAME.into(),
                            path: NETRC_FILE_NAME.into(),
                            ..Default::default()
                        }]),
                        ..Default::default()
                    }),
                    ..Default::default()
                }]),
                ..Default::default()
            }),
            ..Default::default()
        });
        mounts.push(VolumeMount {
            name: secret_name,
            mount_path: format!("{NONROOT_HOME}/{NETRC_FILE_NAME}"),
            sub_path: Some(NETRC_FILE_NAME.into()),
            read_only: Some(true),
            ..Default::default()
        });
    }

    debug!(
        instance = %identity.instance,
        app = %spec.app_name,
        volumes = volumes.len(),
        "Added development volumes"
    );
    (volumes, mounts)
}

// ============================================================================
// HorizontalPodAutoscaler
// ============================================================================

/// Builds the autoscaler, targeting `deployment` by its built name.
#[must_use]
pub fn build_hpa(
    namespace: &str,
    spec: &ResolvedSpec,
    identity: &Identity,
    deployment: &Deployment,
) -> HorizontalPodAutoscaler {
    let name = identity.instance.clone();
    debug!(name = %name, namespace = %namespace, "Building HorizontalPodAutoscaler");

    HorizontalPodAutoscaler {
        metadata: ObjectMeta {
            name: Some(name),
            namespace: Some(namespace.into()),
            labels: Some(identity.labels()),
            ..Default::default()
        },
        spec: Some(HorizontalPodAutoscalerSpec {
            scale_target_ref: CrossVersionObjectReference {
                api_version: Some(Deployment::API_VERSION.to_string()),
                kind: Deployment::KIND.to_string(),
                name: deployment.name_any(),
            },
            min_replicas: Some(spec.min_replicas),
            max_replicas: spec.max_replicas,
            behavior: Some(spec.hpa_behavior.clone()),
            metrics: Some(spec.hpa_metrics.clone()),
        }),
        ..Default::default()
    }
}

// ============================================================================
// Service
// ============================================================================

/// Builds the `Service` selecting the instance's pods.
#[must_use]
pub fn build_service(namespace: &str, spec: &ResolvedSpec, identity: &Identity) -> Service {
    let name = identity.instance.clone();
    debug!(name = %name, namespace = %namespace, "Building Service");

    let port = i32::from(spec.port);
    Service {
        metadata: ObjectMeta {
            name: Some(name),
            namespace: Some(namespace.into()),
            labels: Some(identity.labels()),
            ..Default::default()
        },
        spec: Some(ServiceSpec {
            selector: Some(identity.selector()),
            ports: Some(vec![ServicePort {
                name: Some(HTTP_PORT_NAME.into()),
                app_protocol: Some(SERVICE_APP_PROTOCOL.into()),
                port,
                target_port: Some(IntOrString::Int(port)),
                protocol: Some("TCP".into()),
                ..Default::default()
            }]),
            traffic_distribution: Some(SERVICE_TRAFFIC_DISTRIBUTION.into()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

// ============================================================================
// HTTPRoute
// ============================================================================

/// Builds the route attaching the service to the shared gateway.
///
/// Requests under the route's path prefix are forwarded with the prefix
/// rewritten to `/`, so the application serves from its root.
#[must_use]
pub fn build_http_route(
    namespace: &str,
    spec: &ResolvedSpec,
    identity: &Identity,
    service: &Service,
    config: &AssemblerConfig,
) -> HTTPRoute {
    let name = identity.instance.clone();
    debug!(
        name = %name,
        namespace = %namespace,
        prefix = %spec.route_path_prefix,
        "Building HTTPRoute"
    );

    let mut route = HTTPRoute::new(
        &name,
        HTTPRouteSpec {
            parent_refs: vec![ParentReference {
                group: Some(GATEWAY_API_GROUP.into()),
                kind: Some(KIND_GATEWAY.into()),
                name: config.gateway_name.clone(),
                namespace: Some(config.gateway_namespace.clone()),
                section_name: None,
            }],
            hostnames: spec.route_hostnames.clone(),
            rules: vec![HTTPRouteRule::prefix_rewrite_to_service(
                &spec.route_path_prefix,
                &service.name_any(),
                i32::from(spec.port),
            )],
        },
    );
    route.metadata.namespace = Some(namespace.into());
    route.metadata.labels = Some(identity.labels());
    route
}

// `Url` always renders an empty path as "/"; drop it so endpoints read as written.
fn url_string(url: &Url) -> String {
    let rendered = url.as_str();
    if url.path() == "/" && url.query().is_none() && url.fragment().is_none() {
        rendered.trim_end_matches('/').to_string()
    } else {
        rendered.to_string()
    }
}

/// Renders a duration as `[Nh][Nm]N[.F]s`, or `N[.F]ms`, `µs`, `ns` below one
/// second (`24h0m0s`, `1h30m0s`, `1.5s`, `250ms`).
///
/// Hours are the largest unit so the value parses back with Go-style duration
/// parsers, which have no day unit.
#[must_use]
pub fn duration_string(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }
    if nanos < 1_000 {
        return format!("{nanos}ns");
    }
    if nanos < 1_000_000 {
        return format!("{}µs", fixed_point(nanos, 1_000));
    }
    if nanos < 1_000_000_000 {
        return format!("{}ms", fixed_point(nanos, 1_000_000));
    }

    let total_secs = duration.as_secs();
    let (hours, minutes) = (total_secs / 3600, total_secs / 60 % 60);
    let seconds = fixed_point(
        u128::from(total_secs % 60) * 1_000_000_000 + u128::from(duration.subsec_nanos()),
        1_000_000_000,
    );

    match (hours, minutes) {
        (0, 0) => format!("{seconds}s"),
        (0, m) => format!("{m}m{seconds}s"),
        (h, m) => format!("{h}h{m}m{seconds}s"),
    }
}

// `value / scale` with trailing zeros of the fraction dropped.
fn fixed_point(value: u128, scale: u128) -> String {
    let whole = value / scale;
    let fraction = value % scale;
    if fraction == 0 {
        return whole.to_string();
    }
    let width = scale.ilog10() as usize;
    let digits = format!("{fraction:0width$}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}
