// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Known ownership vocabularies.
//!
//! Ownership fields are free-form strings on the wire so new units can be added
//! without a release, but these are the values the organization uses today.

// ============================================================================
// Business Units
// ============================================================================

pub const BUSINESS_UNIT_INFRASTRUCTURE: &str = "infrastructure";
pub const BUSINESS_UNIT_SECURITY: &str = "security";
pub const BUSINESS_UNIT_ENGINEERING: &str = "engineering";
pub const BUSINESS_UNIT_HUMAN_RESOURCES: &str = "human-resources";
pub const BUSINESS_UNIT_FINANCE: &str = "finance";
pub const BUSINESS_UNIT_MARKETING: &str = "marketing";
pub const BUSINESS_UNIT_PRODUCT: &str = "product";
pub const BUSINESS_UNIT_OPERATIONS: &str = "operations";
pub const BUSINESS_UNIT_SALES: &str = "sales";
pub const BUSINESS_UNIT_MANAGEMENT: &str = "management";
pub const BUSINESS_UNIT_EXECUTIVE: &str = "executive";
pub const BUSINESS_UNIT_INTERNAL: &str = "internal";

/// Every known business unit. Cost centers mirror business units one to one.
pub const BUSINESS_UNITS: &[&str] = &[
    BUSINESS_UNIT_INFRASTRUCTURE,
    BUSINESS_UNIT_SECURITY,
    BUSINESS_UNIT_ENGINEERING,
    BUSINESS_UNIT_HUMAN_RESOURCES,
    BUSINESS_UNIT_FINANCE,
    BUSINESS_UNIT_MARKETING,
    BUSINESS_UNIT_PRODUCT,
    BUSINESS_UNIT_OPERATIONS,
    BUSINESS_UNIT_SALES,
    BUSINESS_UNIT_MANAGEMENT,
    BUSINESS_UNIT_EXECUTIVE,
    BUSINESS_UNIT_INTERNAL,
];

// ============================================================================
// Customers
// ============================================================================

/// Workloads serving the organization itself
pub const CUSTOMER_INTERNAL: &str = "internal";

// ============================================================================
// Data Classification and Compliance
// ============================================================================

pub const DATA_CLASSIFICATION_NONE: &str = "none";

pub const COMPLIANCE_FRAMEWORK_NONE: &str = "none";
pub const COMPLIANCE_FRAMEWORK_RGPD: &str = "rgpd";

/// Returns `true` if `unit` is a known business unit (and therefore a known cost center).
#[must_use]
pub fn is_known_business_unit(unit: &str) -> bool {
    BUSINESS_UNITS.contains(&unit)
}
