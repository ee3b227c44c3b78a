// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Canonical ownership and selection labels for an application instance.

use crate::labels::{
    K8S_COMPONENT, K8S_INSTANCE, K8S_MANAGED_BY, K8S_NAME, K8S_PART_OF, K8S_VERSION,
    MANAGED_BY_APPSTACK,
};
use std::collections::BTreeMap;

/// Read-only label set shared by every object of one application instance.
///
/// `instance` already encodes the runtime environment (`{name}-{env}`), so two
/// environments of the same application never select each other's pods.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Identity {
    pub name: String,
    pub instance: String,
    pub version: String,
    pub component: String,
    pub group: String,
    pub managed_by: String,
}

impl Identity {
    /// Derives the identity of an application instance.
    ///
    /// Pure and total: no input is rejected. The caller is responsible for
    /// disambiguating `instance` per environment (see [`instance_name`]).
    ///
    /// # Arguments
    ///
    /// * `name` - Application name (e.g., "cartservice")
    /// * `instance` - Environment-qualified instance name (e.g., "cartservice-dev")
    /// * `version` - Application version, stamped on the version label
    /// * `component` - Architectural component (e.g., "api")
    /// * `group` - Higher-level system the application is part of
    #[must_use]
    pub fn derive(name: &str, instance: &str, version: &str, component: &str, group: &str) -> Self {
        Self {
            name: name.to_string(),
            instance: instance.to_string(),
            version: label_safe_version(version),
            component: component.to_string(),
            group: group.to_string(),
            managed_by: MANAGED_BY_APPSTACK.to_string(),
        }
    }

    /// Full label set stamped on every generated object.
    #[must_use]
    pub fn labels(&self) -> BTreeMap<String, String> {
        let mut labels = BTreeMap::new();
        labels.insert(K8S_NAME.into(), self.name.clone());
        labels.insert(K8S_INSTANCE.into(), self.instance.clone());
        labels.insert(K8S_VERSION.into(), self.version.clone());
        labels.insert(K8S_COMPONENT.into(), self.component.clone());
        labels.insert(K8S_PART_OF.into(), self.group.clone());
        labels.insert(K8S_MANAGED_BY.into(), self.managed_by.clone());
        labels
    }

    /// Minimal selector matching the pods of this instance only.
    ///
    /// Deliberately excludes the version label so that a rollout keeps
    /// matching pods of the previous version.
    #[must_use]
    pub fn selector(&self) -> BTreeMap<String, String> {
        BTreeMap::from([(K8S_INSTANCE.to_string(), self.instance.clone())])
    }
}

/// Joins an application name and runtime environment into an instance name.
#[must_use]
pub fn instance_name(app_name: &str, runtime_env: &str) -> String {
    format!("{app_name}-{runtime_env}")
}

/// Maximum length of a DNS label
pub const DNS_LABEL_MAX_LEN: usize = 63;

/// Returns `true` if `name` is an RFC 1035 DNS label.
///
/// Services require this form, and it is also a valid RFC 1123 label for
/// namespaces and deployments: lowercase alphanumerics and '-', starting with a
/// letter, ending with an alphanumeric, at most 63 characters.
#[must_use]
pub fn is_dns_label(name: &str) -> bool {
    let bytes = name.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(first), Some(last)) => {
            bytes.len() <= DNS_LABEL_MAX_LEN
                && first.is_ascii_lowercase()
                && (last.is_ascii_lowercase() || last.is_ascii_digit())
                && bytes
                    .iter()
                    .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-')
        }
        _ => false,
    }
}

// Label values only allow alphanumerics, '-', '_' and '.'; semver build metadata uses '+'.
fn label_safe_version(version: &str) -> String {
    version.replace('+', "_")
}
