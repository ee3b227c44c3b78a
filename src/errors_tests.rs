// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `errors`

#[cfg(test)]
mod tests {
    use crate::errors::{AssemblyError, ResolveError, ValidationError, VcsError};
    use std::error::Error;

    #[test]
    fn test_validation_messages_name_the_field() {
        assert_eq!(
            ValidationError::Empty { field: "imageRef" }.to_string(),
            "imageRef cannot be empty"
        );
        assert_eq!(
            ValidationError::Zero { field: "port" }.to_string(),
            "port cannot be zero"
        );
        assert_eq!(
            ValidationError::Malformed {
                field: "rpo",
                value: "soon".to_string(),
                reason: "expected number".to_string(),
            }
            .to_string(),
            "rpo is malformed ('soon'): expected number"
        );
    }

    #[test]
    fn test_validation_field() {
        assert_eq!(ValidationError::Empty { field: "appName" }.field(), "appName");
        assert_eq!(
            ValidationError::SampleRatioOutOfRange { ratio: 2.0 }.field(),
            "TraceSampleRatio"
        );
        assert_eq!(
            ValidationError::ReplicaBoundsInverted { min: 5, max: 2 }.field(),
            "MinReplicas"
        );
    }

    #[test]
    fn test_sample_ratio_message() {
        assert_eq!(
            ValidationError::SampleRatioOutOfRange { ratio: 1.5 }.to_string(),
            "TraceSampleRatio must be within (0, 1], got 1.5"
        );
    }

    #[test]
    fn test_placeholder_message_lists_fields() {
        let err = ResolveError::PlaceholderValues {
            placeholder: "changeme",
            fields: vec!["costCenter", "operationsOwner"],
        };
        assert_eq!(
            err.to_string(),
            "fields still set to placeholder value 'changeme': costCenter, operationsOwner"
        );
    }

    #[test]
    fn test_resolve_error_is_transparent() {
        let err: ResolveError = ValidationError::Empty { field: "runtimeEnv" }.into();
        assert_eq!(err.to_string(), "runtimeEnv cannot be empty");

        let err: ResolveError = VcsError::NoTag.into();
        assert_eq!(err.to_string(), "no tag found in repository");
    }

    #[test]
    fn test_malformed_tag_keeps_source() {
        let source = semver::Version::parse("latest").unwrap_err();
        let err = VcsError::MalformedTag {
            tag: "latest".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("tag 'latest' is not a valid semantic version"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_assembly_messages() {
        assert_eq!(
            AssemblyError::OutOfOrder {
                kind: "Namespace",
                after: "Service"
            }
            .to_string(),
            "Namespace cannot be emitted after Service"
        );
        assert_eq!(
            AssemblyError::InvariantViolation {
                field: "port",
                reason: "is zero".to_string()
            }
            .to_string(),
            "invariant violated for port: is zero"
        );
    }
}
