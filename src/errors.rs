// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for resolution and assembly.
//!
//! The taxonomy follows the pipeline:
//! - [`VcsError`] - the repository metadata needed for defaults is missing or malformed
//! - [`ValidationError`] - a required field is still empty, zero or unparsable after merging
//! - [`ResolveError`] - anything that aborts [`crate::resolver::Resolver::resolve`]
//! - [`AssemblyError`] - a resolved spec broke an invariant the resolver guarantees
//! - [`ConfigError`] - an injected defaults table is inconsistent
//!
//! None of these are retryable: resolution and assembly are deterministic, so the
//! only recovery is corrected input.

use thiserror::Error;

/// Errors raised while reading version-control metadata.
#[derive(Error, Debug)]
pub enum VcsError {
    /// The remote exists but has no URL configured.
    #[error("remote URL not found for remote '{remote}'")]
    NoRemoteUrl {
        /// Remote that was queried (normally "origin")
        remote: String,
    },

    /// The remote has several URLs, so the project identity is ambiguous.
    #[error("found more than 1 remote URL for remote '{remote}' ({count} URLs)")]
    MultipleRemoteUrls {
        /// Remote that was queried
        remote: String,
        /// Number of URLs found
        count: usize,
    },

    /// The remote URL does not contain at least a host and a path.
    #[error("repository remote URL is invalid: '{url}'")]
    InvalidRemoteUrl {
        /// The offending URL, verbatim
        url: String,
    },

    /// The repository has no tags to derive a version from.
    #[error("no tag found in repository")]
    NoTag,

    /// The most recent tag is not a semantic version.
    #[error("tag '{tag}' is not a valid semantic version: {source}")]
    MalformedTag {
        /// Tag as returned by the repository
        tag: String,
        /// Underlying parse error
        #[source]
        source: semver::Error,
    },

    /// Running the version-control tool failed.
    #[error("failed to run '{command}': {reason}")]
    Command {
        /// Command line that was executed
        command: String,
        /// Exit status or spawn error, with stderr when available
        reason: String,
    },
}

/// A required field failed validation after defaults were merged.
///
/// Every variant names exactly one field so the caller knows what to fix.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field} cannot be empty")]
    Empty {
        /// Name of the field
        field: &'static str,
    },

    #[error("{field} cannot be zero")]
    Zero {
        /// Name of the field
        field: &'static str,
    },

    /// A string field could not be parsed into its typed form.
    #[error("{field} is malformed ('{value}'): {reason}")]
    Malformed {
        /// Name of the field
        field: &'static str,
        /// Value as supplied
        value: String,
        /// Parser message
        reason: String,
    },

    #[error("TraceSampleRatio must be within (0, 1], got {ratio}")]
    SampleRatioOutOfRange {
        /// Supplied ratio
        ratio: f64,
    },

    #[error("MinReplicas ({min}) cannot exceed MaxReplicas ({max})")]
    ReplicaBoundsInverted {
        /// Minimum replicas
        min: i32,
        /// Maximum replicas
        max: i32,
    },
}

impl ValidationError {
    /// Name of the field that failed validation.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::Empty { field } | Self::Zero { field } | Self::Malformed { field, .. } => field,
            Self::SampleRatioOutOfRange { .. } => "TraceSampleRatio",
            Self::ReplicaBoundsInverted { .. } => "MinReplicas",
        }
    }
}

/// Errors that abort parameter resolution.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error(transparent)]
    Vcs(#[from] VcsError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// One or more ownership fields still hold the template placeholder.
    #[error("fields still set to placeholder value '{placeholder}': {}", fields.join(", "))]
    PlaceholderValues {
        /// The placeholder literal that was found
        placeholder: &'static str,
        /// Every offending field, in checklist order
        fields: Vec<&'static str>,
    },
}

/// Errors raised by the assembler.
///
/// These indicate a defect upstream of assembly rather than bad user input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssemblyError {
    /// A value the resolver guarantees is missing or out of range.
    #[error("invariant violated for {field}: {reason}")]
    InvariantViolation {
        /// Field holding the bad value
        field: &'static str,
        /// What was wrong with it
        reason: String,
    },

    /// An object was pushed after an object that depends on it.
    #[error("{kind} cannot be emitted after {after}")]
    OutOfOrder {
        /// Kind being pushed
        kind: &'static str,
        /// Kind already in the graph that must come later
        after: &'static str,
    },
}

/// Errors raised while validating injected configuration tables.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("priority class '{name}' is defined more than once")]
    DuplicatePriorityClass {
        /// Duplicated class name
        name: String,
    },

    /// Two classes share a value, so the ordering is not total.
    #[error("priority classes '{first}' and '{second}' share value {value}")]
    DuplicatePriorityValue {
        /// Shared priority value
        value: i32,
        /// First class holding the value
        first: String,
        /// Second class holding the value
        second: String,
    },

    #[error("priority classes '{first}' and '{second}' are both marked global default")]
    MultipleGlobalDefaults {
        /// First global default
        first: String,
        /// Second global default
        second: String,
    },

    #[error("topology key '{key}' is listed more than once")]
    DuplicateTopologyKey {
        /// Duplicated key
        key: String,
    },

    #[error("toleration for taint '{key}' with effect '{effect}' is listed more than once")]
    DuplicateToleration {
        /// Duplicated taint key
        key: String,
        /// Effect shared by both entries (empty means all effects)
        effect: String,
    },
}
