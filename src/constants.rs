// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for appstack.
//!
//! Organization-wide defaults, environment variable keys and fixed paths.
//! Values that a caller may override are copied into [`crate::defaults::Defaults`]
//! at construction time; nothing reads them as mutable global state.

// ============================================================================
// Runtime Environments
// ============================================================================

/// Name of the local development environment
pub const RUNTIME_ENV_DEV: &str = "dev";

/// Literal left behind by deployment templates. Never allowed in a resolved spec.
pub const PLACEHOLDER_VALUE: &str = "changeme";

// ============================================================================
// Version Control Constants
// ============================================================================

/// Remote whose URL defines the application name and project URL
pub const VCS_REMOTE_NAME: &str = "origin";

/// Scheme used when turning a remote base path into a project URL
pub const PROJECT_URL_SCHEME: &str = "https";

// ============================================================================
// Telemetry Defaults
// ============================================================================

/// Default OTLP collector endpoint
pub const DEFAULT_OTEL_ENDPOINT: &str = "http://otel-collector.observability.svc:4317";

/// Default OTLP payload compression
pub const DEFAULT_OTEL_COMPRESSION: &str = "gzip";

/// Default metrics export interval (30 seconds)
pub const DEFAULT_METRICS_EXPORT_INTERVAL_SECS: u32 = 30;

/// Default trace sampling ratio (sample everything)
pub const DEFAULT_TRACE_SAMPLE_RATIO: f64 = 1.0;

// ============================================================================
// HTTP Server Defaults
// ============================================================================

/// Default container port for the HTTP server
pub const DEFAULT_HTTP_PORT: u16 = 8080;

pub const DEFAULT_HTTP_READ_TIMEOUT_SECS: u32 = 5;
pub const DEFAULT_HTTP_WRITE_TIMEOUT_SECS: u32 = 10;
pub const DEFAULT_HTTP_IDLE_TIMEOUT_SECS: u32 = 30;

/// Application protocol advertised on the Service port (cleartext HTTP/2)
pub const SERVICE_APP_PROTOCOL: &str = "kubernetes.io/h2c";

/// Name of the single Service and container port
pub const HTTP_PORT_NAME: &str = "http";

/// Prefer endpoints topologically close to the client
pub const SERVICE_TRAFFIC_DISTRIBUTION: &str = "PreferClose";

// ============================================================================
// Kubernetes Health Check Constants
// ============================================================================

pub const LIVENESS_PATH: &str = "/healthz";
pub const READINESS_PATH: &str = "/readyz";

/// Liveness probe initial delay (10 seconds)
pub const LIVENESS_INITIAL_DELAY_SECS: i32 = 10;

// ============================================================================
// Resource and Scaling Defaults
// ============================================================================

pub const DEFAULT_CPU_REQUEST_MILLICPU: u32 = 500;
pub const DEFAULT_MEMORY_REQUEST_MIB: u32 = 500;
pub const DEFAULT_MIN_REPLICAS: i32 = 1;
pub const DEFAULT_MAX_REPLICAS: i32 = 10;

/// Deployment progress deadline (3 minutes)
pub const DEFAULT_PROGRESS_DEADLINE_SECS: i32 = 180;

pub const DEFAULT_IMAGE_PULL_POLICY: &str = "IfNotPresent";

/// Percentage of current replicas the autoscaler may add or remove per period
pub const HPA_SCALE_PERCENT: i32 = 30;

/// Autoscaler policy period (1 minute)
pub const HPA_SCALE_PERIOD_SECS: i32 = 60;

/// Target average CPU utilization, in percent of the request
pub const HPA_CPU_UTILIZATION_PERCENT: i32 = 70;

/// Share of the memory limit handed to the runtime as a soft limit, in percent
pub const MEMORY_HEADROOM_PERCENT: u32 = 95;

// ============================================================================
// Ownership Defaults
// ============================================================================

pub const DEFAULT_DATA_CLASSIFICATION: &str = crate::ownership::DATA_CLASSIFICATION_NONE;
pub const DEFAULT_COMPLIANCE_FRAMEWORK: &str = crate::ownership::COMPLIANCE_FRAMEWORK_NONE;

// ============================================================================
// Gateway Constants
// ============================================================================

/// Name of the Gateway shared by every application route
pub const SHARED_GATEWAY_NAME: &str = "shared-gateway";

/// Namespace holding the shared Gateway
pub const SHARED_GATEWAY_NAMESPACE: &str = "shared-gateway";

/// Host on which the conventional `/{service}/v{major}/` API paths are served
pub const DEFAULT_ROUTE_HOSTNAME: &str = "api.kema.internal";

// ============================================================================
// Development Environment Constants
// ============================================================================

/// Public resolver added to pods in dev so module downloads work behind kind's DNS
pub const DEV_DEFAULT_NAMESERVER: &str = "1.1.1.1";

/// Where the organization's code checkout is mounted inside the container
pub const DEV_DEFAULT_VOLUME_MOUNT_PATH: &str = "/app";

/// Node directory holding the organization's code checkout
pub const DEV_DEFAULT_HOST_CODE_PATH: &str = "/git-vcs-org";

/// File name of the git credentials projected into dev pods
pub const NETRC_FILE_NAME: &str = ".netrc";

/// Home directory of the non-root user in the runtime image
pub const NONROOT_HOME: &str = "/home/nonroot";

// ============================================================================
// Priority Class Constants
// ============================================================================

pub const PRIORITY_CLASS_EVENTUAL: &str = "eventual";
pub const PRIORITY_CLASS_LOW: &str = "low";
pub const PRIORITY_CLASS_DEFAULT: &str = "default";
pub const PRIORITY_CLASS_NORMAL: &str = "normal";
pub const PRIORITY_CLASS_MODERATE: &str = "moderate";
pub const PRIORITY_CLASS_HIGH: &str = "high";

/// Priority class applied to application workloads unless overridden
pub const DEFAULT_PRIORITY_CLASS: &str = PRIORITY_CLASS_NORMAL;

/// Toleration window for not-ready and unreachable nodes (5 minutes)
pub const NODE_FAILURE_TOLERATION_SECS: i64 = 300;

// ============================================================================
// Environment Variable Keys
// ============================================================================

pub const ENV_RUNTIME_ENV: &str = "RUNTIME_ENV";
pub const ENV_APP_VERSION: &str = "APP_VERSION";
pub const ENV_APP_NAME: &str = "APP_NAME";
pub const ENV_APP_NAMESPACE: &str = "APP_NAMESPACE";
pub const ENV_OTEL_ENDPOINT: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";
pub const ENV_OTEL_COMPRESSION: &str = "OTEL_EXPORTER_OTLP_COMPRESSION";
pub const ENV_HTTP_PORT: &str = "HTTP_SERVE_PORT";
pub const ENV_HTTP_READ_TIMEOUT: &str = "HTTP_READ_TIMEOUT";
pub const ENV_HTTP_WRITE_TIMEOUT: &str = "HTTP_WRITE_TIMEOUT";
pub const ENV_HTTP_IDLE_TIMEOUT: &str = "HTTP_IDLE_TIMEOUT";
pub const ENV_METRICS_EXPORT_INTERVAL: &str = "METRICS_EXPORT_INTERVAL";
pub const ENV_TRACE_SAMPLE_RATIO: &str = "TRACE_SAMPLE_RATIO";
pub const ENV_BUSINESS_UNIT_ID: &str = "BUSINESS_UNIT_ID";
pub const ENV_CUSTOMER_ID: &str = "CUSTOMER_ID";
pub const ENV_COST_CENTER: &str = "COST_CENTER";
pub const ENV_COST_ALLOCATION_OWNER: &str = "COST_ALLOCATION_OWNER";
pub const ENV_OPERATIONS_OWNER: &str = "OPERATIONS_OWNER";
pub const ENV_RPO: &str = "RPO";
pub const ENV_DATA_CLASSIFICATION: &str = "DATA_CLASSIFICATION";
pub const ENV_COMPLIANCE_FRAMEWORK: &str = "COMPLIANCE_FRAMEWORK";
pub const ENV_EXPIRATION: &str = "EXPIRATION";
pub const ENV_PROJECT_URL: &str = "PROJECT_URL";
pub const ENV_MONITORING_URL: &str = "MONITORING_URL";

/// Concurrency hint, only emitted when a CPU limit is set
pub const ENV_MAX_PROCS: &str = "MAX_PROCS";

/// Memory soft limit hint, only emitted when a memory limit is set
pub const ENV_MEMORY_LIMIT: &str = "MEMORY_LIMIT";
