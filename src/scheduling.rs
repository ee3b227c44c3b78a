// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Scheduling policy table: priority tiers, topology spread and taint tolerations.
//!
//! The tables here are plain values. The defaults are built by functions rather
//! than held in statics, and callers can swap any table through
//! [`crate::defaults::Defaults`].

use crate::constants::{
    NODE_FAILURE_TOLERATION_SECS, PRIORITY_CLASS_DEFAULT, PRIORITY_CLASS_EVENTUAL,
    PRIORITY_CLASS_HIGH, PRIORITY_CLASS_LOW, PRIORITY_CLASS_MODERATE, PRIORITY_CLASS_NORMAL,
};
use crate::errors::ConfigError;
use crate::labels::{
    EFFECT_NO_EXECUTE, EFFECT_NO_SCHEDULE, K8S_INSTANCE, K8S_MANAGED_BY, MANAGED_BY_APPSTACK,
    POD_TEMPLATE_HASH, TAINT_CONTROL_PLANE, TAINT_DISK_PRESSURE, TAINT_MEMORY_PRESSURE,
    TAINT_NETWORK_UNAVAILABLE, TAINT_NOT_READY, TAINT_PID_PRESSURE, TAINT_UNINITIALIZED,
    TAINT_UNREACHABLE, TAINT_UNSCHEDULABLE, TOPOLOGY_DATACENTER, TOPOLOGY_DATACENTER_AISLE,
    TOPOLOGY_DATACENTER_RACK, TOPOLOGY_DATACENTER_ZONE, TOPOLOGY_HOSTNAME, TOPOLOGY_REGION,
    TOPOLOGY_ZONE,
};
use k8s_openapi::api::core::v1::{Toleration, TopologySpreadConstraint};
use k8s_openapi::api::scheduling::v1::PriorityClass;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

// ============================================================================
// Priority Classes
// ============================================================================

/// Preemption policy of tiers that must never evict running pods
pub const PREEMPTION_NEVER: &str = "Never";

/// One preemption tier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityTier {
    pub name: String,
    pub value: i32,
    pub description: String,
    #[serde(default)]
    pub global_default: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preemption_policy: Option<String>,
}

impl PriorityTier {
    fn new(name: &str, value: i32, description: &str) -> Self {
        Self {
            name: name.to_string(),
            value,
            description: description.to_string(),
            global_default: false,
            preemption_policy: None,
        }
    }
}

/// Validated, totally ordered set of priority tiers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PriorityClassTable {
    tiers: Vec<PriorityTier>,
}

impl PriorityClassTable {
    /// Validates and orders a set of tiers, lowest value first.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a name or value appears twice, or if more than
    /// one tier is marked as the global default.
    pub fn new(mut tiers: Vec<PriorityTier>) -> Result<Self, ConfigError> {
        let mut names = HashSet::new();
        let mut values: HashMap<i32, &str> = HashMap::new();
        let mut global_default: Option<&str> = None;

        for tier in &tiers {
            if !names.insert(tier.name.as_str()) {
                return Err(ConfigError::DuplicatePriorityClass {
                    name: tier.name.clone(),
                });
            }
            if let Some(first) = values.insert(tier.value, tier.name.as_str()) {
                return Err(ConfigError::DuplicatePriorityValue {
                    value: tier.value,
                    first: first.to_string(),
                    second: tier.name.clone(),
                });
            }
            if tier.global_default {
                if let Some(first) = global_default {
                    return Err(ConfigError::MultipleGlobalDefaults {
                        first: first.to_string(),
                        second: tier.name.clone(),
                    });
                }
                global_default = Some(tier.name.as_str());
            }
        }

        tiers.sort_by_key(|tier| tier.value);
        Ok(Self { tiers })
    }

    /// The organization's six tiers, from "eventual" to "high".
    #[must_use]
    pub fn standard() -> Self {
        Self {
            tiers: standard_priority_tiers(),
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PriorityTier> {
        self.tiers.iter().find(|tier| tier.name == name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Tiers in ascending priority order.
    pub fn iter(&self) -> impl Iterator<Item = &PriorityTier> {
        self.tiers.iter()
    }

    #[must_use]
    pub fn global_default(&self) -> Option<&PriorityTier> {
        self.tiers.iter().find(|tier| tier.global_default)
    }

    /// Builds cluster-scoped `PriorityClass` objects for every tier.
    #[must_use]
    pub fn to_priority_classes(&self) -> Vec<PriorityClass> {
        self.tiers.iter().map(build_priority_class).collect()
    }
}

/// Builds a `PriorityClass` object for one tier.
#[must_use]
pub fn build_priority_class(tier: &PriorityTier) -> PriorityClass {
    PriorityClass {
        metadata: ObjectMeta {
            name: Some(tier.name.clone()),
            labels: Some(BTreeMap::from([(
                K8S_MANAGED_BY.to_string(),
                MANAGED_BY_APPSTACK.to_string(),
            )])),
            ..Default::default()
        },
        value: tier.value,
        description: Some(tier.description.clone()),
        global_default: tier.global_default.then_some(true),
        preemption_policy: tier.preemption_policy.clone(),
    }
}

// Listed in ascending order.
fn standard_priority_tiers() -> Vec<PriorityTier> {
    vec![
        PriorityTier {
            preemption_policy: Some(PREEMPTION_NEVER.to_string()),
            ..PriorityTier::new(
                PRIORITY_CLASS_EVENTUAL,
                -1_000_000,
                "Very low priority class, lower than low, does not preempt other pods",
            )
        },
        PriorityTier::new(
            PRIORITY_CLASS_LOW,
            -1_000,
            "Low priority class, lower than default, higher than eventual, preempts other pods",
        ),
        PriorityTier {
            global_default: true,
            ..PriorityTier::new(
                PRIORITY_CLASS_DEFAULT,
                0,
                "Default priority class, lower than normal, higher than low, preempts other pods, \
                 used by pods that do not specify a priority class",
            )
        },
        PriorityTier::new(
            PRIORITY_CLASS_NORMAL,
            1_000,
            "Normal priority, lower than moderate, higher than default, preempts other pods, \
             should be used as a default",
        ),
        PriorityTier::new(
            PRIORITY_CLASS_MODERATE,
            500_000,
            "Moderate priority, lower than high, higher than normal, preempts other pods",
        ),
        PriorityTier::new(
            PRIORITY_CLASS_HIGH,
            1_000_000,
            "High priority, higher than moderate, preempts other pods",
        ),
    ]
}

// ============================================================================
// Topology Spread
// ============================================================================

/// Best-effort satisfaction: the scheduler may still place a pod when skew is exceeded
pub const WHEN_UNSATISFIABLE_SCHEDULE_ANYWAY: &str = "ScheduleAnyway";

/// Maximum replica imbalance tolerated across domains
pub const TOPOLOGY_MAX_SKEW: i32 = 1;

/// Topology dimensions, from widest to narrowest.
#[must_use]
pub fn standard_topology_keys() -> Vec<String> {
    [
        TOPOLOGY_REGION,
        TOPOLOGY_ZONE,
        TOPOLOGY_DATACENTER,
        TOPOLOGY_DATACENTER_ZONE,
        TOPOLOGY_DATACENTER_AISLE,
        TOPOLOGY_DATACENTER_RACK,
        TOPOLOGY_HOSTNAME,
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Builds one spread constraint per topology key for the pods of `instance`.
///
/// Each constraint uses max skew 1, best-effort satisfaction, and
/// `pod-template-hash` as a match label key so only pods of the same rollout are
/// counted against each other.
#[must_use]
pub fn topology_spread_constraints(
    instance: &str,
    topology_keys: &[String],
) -> Vec<TopologySpreadConstraint> {
    topology_keys
        .iter()
        .map(|key| TopologySpreadConstraint {
            max_skew: TOPOLOGY_MAX_SKEW,
            topology_key: key.clone(),
            when_unsatisfiable: WHEN_UNSATISFIABLE_SCHEDULE_ANYWAY.to_string(),
            label_selector: Some(LabelSelector {
                match_labels: Some(BTreeMap::from([(
                    K8S_INSTANCE.to_string(),
                    instance.to_string(),
                )])),
                ..Default::default()
            }),
            match_label_keys: Some(vec![POD_TEMPLATE_HASH.to_string()]),
            ..Default::default()
        })
        .collect()
}

/// Rejects topology key lists naming the same dimension twice.
///
/// # Errors
///
/// Returns [`ConfigError::DuplicateTopologyKey`] on the first repeated key.
pub fn validate_topology_keys(keys: &[String]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for key in keys {
        if !seen.insert(key.as_str()) {
            return Err(ConfigError::DuplicateTopologyKey { key: key.clone() });
        }
    }
    Ok(())
}

// ============================================================================
// Tolerations
// ============================================================================

/// Operator matching a taint regardless of its value
pub const TOLERATION_OPERATOR_EXISTS: &str = "Exists";

/// Tolerations for the standard node-condition taints.
///
/// Not-ready and unreachable nodes evict (`NoExecute`), so those tolerations are
/// bounded to [`NODE_FAILURE_TOLERATION_SECS`]. Everything else only blocks
/// scheduling (`NoSchedule`).
#[must_use]
pub fn standard_tolerations() -> Vec<Toleration> {
    let evicting = [TAINT_NOT_READY, TAINT_UNREACHABLE]
        .into_iter()
        .map(|key| toleration(key, EFFECT_NO_EXECUTE, Some(NODE_FAILURE_TOLERATION_SECS)));

    let blocking = [
        TAINT_DISK_PRESSURE,
        TAINT_MEMORY_PRESSURE,
        TAINT_PID_PRESSURE,
        TAINT_UNSCHEDULABLE,
        TAINT_NETWORK_UNAVAILABLE,
        TAINT_UNINITIALIZED,
        TAINT_CONTROL_PLANE,
    ]
    .into_iter()
    .map(|key| toleration(key, EFFECT_NO_SCHEDULE, None));

    evicting.chain(blocking).collect()
}

fn toleration(key: &str, effect: &str, seconds: Option<i64>) -> Toleration {
    Toleration {
        key: Some(key.to_string()),
        operator: Some(TOLERATION_OPERATOR_EXISTS.to_string()),
        effect: Some(effect.to_string()),
        toleration_seconds: seconds,
        value: None,
    }
}

/// Rejects toleration lists repeating the same (key, effect) pair.
///
/// # Errors
///
/// Returns [`ConfigError::DuplicateToleration`] on the first repeated pair.
pub fn validate_tolerations(tolerations: &[Toleration]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for t in tolerations {
        let key = t.key.clone().unwrap_or_default();
        let effect = t.effect.clone().unwrap_or_default();
        if !seen.insert((key.clone(), effect.clone())) {
            return Err(ConfigError::DuplicateToleration { key, effect });
        }
    }
    Ok(())
}
