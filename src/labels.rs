// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Label, annotation, topology and taint keys used across every generated resource.
//!
//! Keeping the keys here guarantees that selectors built by one builder match the
//! labels stamped by another.

// ============================================================================
// Kubernetes Standard Labels
// https://kubernetes.io/docs/concepts/overview/working-with-objects/common-labels/
// ============================================================================

/// Standard label for the name of the application (e.g., "cartservice")
pub const K8S_NAME: &str = "app.kubernetes.io/name";

/// Standard label for a unique name identifying the instance of an application
pub const K8S_INSTANCE: &str = "app.kubernetes.io/instance";

/// Standard label for the current version of the application
pub const K8S_VERSION: &str = "app.kubernetes.io/version";

/// Standard label for the component name within the architecture (e.g., "api")
pub const K8S_COMPONENT: &str = "app.kubernetes.io/component";

/// Standard label for the name of a higher-level application this one is part of
pub const K8S_PART_OF: &str = "app.kubernetes.io/part-of";

/// Standard label for the tool being used to manage the operation of an application
pub const K8S_MANAGED_BY: &str = "app.kubernetes.io/managed-by";

/// Value for `app.kubernetes.io/managed-by` on everything this crate generates
pub const MANAGED_BY_APPSTACK: &str = "appstack";

// ============================================================================
// Pod Security Admission
// https://kubernetes.io/docs/concepts/security/pod-security-admission/
// ============================================================================

pub const POD_SECURITY_ENFORCE: &str = "pod-security.kubernetes.io/enforce";
pub const POD_SECURITY_ENFORCE_VERSION: &str = "pod-security.kubernetes.io/enforce-version";
pub const POD_SECURITY_AUDIT: &str = "pod-security.kubernetes.io/audit";
pub const POD_SECURITY_AUDIT_VERSION: &str = "pod-security.kubernetes.io/audit-version";
pub const POD_SECURITY_WARN: &str = "pod-security.kubernetes.io/warn";
pub const POD_SECURITY_WARN_VERSION: &str = "pod-security.kubernetes.io/warn-version";

/// Most permissive pod security level, reserved for local development
pub const POD_SECURITY_LEVEL_PRIVILEGED: &str = "privileged";

/// Hardened pod security level applied everywhere else
pub const POD_SECURITY_LEVEL_RESTRICTED: &str = "restricted";

/// Track the policy of the running Kubernetes minor version
pub const POD_SECURITY_VERSION_LATEST: &str = "latest";

// ============================================================================
// Gateway Access
// ============================================================================

/// Namespace label the shared gateway uses to admit routes from a namespace
pub const SHARED_GATEWAY_ACCESS_LABEL: &str = "shared-gateway-access";

/// Value opting a namespace into the shared gateway
pub const SHARED_GATEWAY_ACCESS_ENABLED: &str = "true";

// ============================================================================
// Annotations
// ============================================================================

/// Pod template annotation holding the SHA-256 of the mounted config data.
/// Changing the config changes the template, which rolls the pods.
pub const CONFIG_CHECKSUM_ANNOTATION: &str = "checksum/config";

// ============================================================================
// Topology Keys
// ============================================================================

pub const TOPOLOGY_REGION: &str = "topology.kubernetes.io/region";
pub const TOPOLOGY_ZONE: &str = "topology.kubernetes.io/zone";
pub const TOPOLOGY_DATACENTER: &str = "topology.kema.dev/dc";
pub const TOPOLOGY_DATACENTER_ZONE: &str = "topology.kema.dev/dc-zone";
pub const TOPOLOGY_DATACENTER_AISLE: &str = "topology.kema.dev/dc-aisle";
pub const TOPOLOGY_DATACENTER_RACK: &str = "topology.kema.dev/dc-rack";
pub const TOPOLOGY_HOSTNAME: &str = "kubernetes.io/hostname";

/// Label added by the Deployment controller to every pod of a `ReplicaSet`
pub const POD_TEMPLATE_HASH: &str = "pod-template-hash";

// ============================================================================
// Node Taints
// https://kubernetes.io/docs/reference/labels-annotations-taints/
// ============================================================================

pub const TAINT_NOT_READY: &str = "node.kubernetes.io/not-ready";
pub const TAINT_UNREACHABLE: &str = "node.kubernetes.io/unreachable";
pub const TAINT_DISK_PRESSURE: &str = "node.kubernetes.io/disk-pressure";
pub const TAINT_MEMORY_PRESSURE: &str = "node.kubernetes.io/memory-pressure";
pub const TAINT_PID_PRESSURE: &str = "node.kubernetes.io/pid-pressure";
pub const TAINT_UNSCHEDULABLE: &str = "node.kubernetes.io/unschedulable";
pub const TAINT_NETWORK_UNAVAILABLE: &str = "node.kubernetes.io/network-unavailable";
pub const TAINT_UNINITIALIZED: &str = "node.cloudprovider.kubernetes.io/uninitialized";
pub const TAINT_CONTROL_PLANE: &str = "node-role.kubernetes.io/control-plane";

/// Taint effect: do not schedule new pods
pub const EFFECT_NO_SCHEDULE: &str = "NoSchedule";

/// Taint effect: evict running pods that do not tolerate the taint
pub const EFFECT_NO_EXECUTE: &str = "NoExecute";
