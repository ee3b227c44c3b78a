// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `resolver`

#[cfg(test)]
mod tests {
    use crate::constants::{DEFAULT_HTTP_PORT, PLACEHOLDER_VALUE};
    use crate::defaults::Defaults;
    use crate::deployment::{DeploymentSpec, DevSpec};
    use crate::errors::{ConfigError, ResolveError, ValidationError, VcsError};
    use crate::labels::{K8S_INSTANCE, TOPOLOGY_HOSTNAME};
    use crate::resolver::Resolver;
    use crate::vcs::StaticVcs;
    use k8s_openapi::api::core::v1::TopologySpreadConstraint;
    use std::sync::Arc;
    use std::time::Duration;

    fn vcs(urls: &[&str], tag: Option<&str>) -> Arc<StaticVcs> {
        Arc::new(StaticVcs::new(urls, tag))
    }

    fn resolver() -> Resolver {
        Resolver::new(
            Defaults::default(),
            vcs(&["https://github.com/org/cartservice.git"], Some("v2.3.1")),
        )
        .unwrap()
    }

    /// Every field without a default, filled in.
    fn request(env: &str) -> DeploymentSpec {
        DeploymentSpec {
            runtime_env: Some(env.to_string()),
            app_namespace: Some("shop".to_string()),
            app_component: Some("api".to_string()),
            business_unit_id: Some("engineering".to_string()),
            customer_id: Some("internal".to_string()),
            cost_center: Some("engineering".to_string()),
            cost_allocation_owner: Some("team-cart".to_string()),
            operations_owner: Some("team-cart".to_string()),
            rpo: Some("24h".to_string()),
            monitoring_url: Some("https://grafana.kema.internal/d/cart".to_string()),
            ..Default::default()
        }
    }

    fn validation_error(result: Result<impl std::fmt::Debug, ResolveError>) -> ValidationError {
        match result {
            Err(ResolveError::Validation(err)) => err,
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    // ========================================================================
    // Defaulting
    // ========================================================================

    #[test]
    fn test_defaults_from_repository() {
        let mut spec = request("dev");
        spec.app_name = None;
        spec.port = Some(0);

        let resolved = resolver().resolve(&spec).unwrap();

        assert_eq!(resolved.app_name, "cartservice");
        assert_eq!(resolved.app_version, semver::Version::new(2, 3, 1));
        assert_eq!(resolved.port, DEFAULT_HTTP_PORT);
        assert_eq!(resolved.instance(), "cartservice-dev");
        assert_eq!(resolved.image_tag, "2.3.1");
        assert_eq!(resolved.image_ref, "github.com/org/cartservice");
        assert_eq!(
            resolved.project_url.as_str(),
            "https://github.com/org/cartservice"
        );
    }

    #[test]
    fn test_caller_values_win() {
        let mut spec = request("prod");
        spec.app_name = Some("checkout".to_string());
        spec.app_version = Some("v3.0.0".to_string());
        spec.port = Some(9090);
        spec.image_ref = Some("ghcr.io/org/checkout".to_string());
        spec.priority_class_name = Some("high".to_string());

        let resolved = resolver().resolve(&spec).unwrap();

        assert_eq!(resolved.app_name, "checkout");
        assert_eq!(resolved.app_version, semver::Version::new(3, 0, 0));
        assert_eq!(resolved.image(), "ghcr.io/org/checkout:v3.0.0");
        assert_eq!(resolved.port, 9090);
        assert_eq!(resolved.priority_class_name, "high");
        assert_eq!(resolved.route_path_prefix, "/checkout/v3");
    }

    #[test]
    fn test_empty_string_falls_back_to_default() {
        let mut spec = request("prod");
        spec.otel_compression = Some(String::new());
        spec.data_classification = Some(String::new());

        let resolved = resolver().resolve(&spec).unwrap();
        assert_eq!(resolved.otel_compression, "gzip");
        assert_eq!(resolved.data_classification, "none");
    }

    #[test]
    fn test_organization_defaults() {
        let resolved = resolver().resolve(&request("prod")).unwrap();

        assert_eq!(resolved.http_read_timeout_secs, 5);
        assert_eq!(resolved.http_write_timeout_secs, 10);
        assert_eq!(resolved.http_idle_timeout_secs, 30);
        assert_eq!(resolved.metrics_export_interval_secs, 30);
        assert!((resolved.trace_sample_ratio - 1.0).abs() < f64::EPSILON);
        assert_eq!(resolved.cpu_request_millicpu, 500);
        assert_eq!(resolved.memory_request_mib, 500);
        assert_eq!(resolved.cpu_limit_millicpu, None);
        assert_eq!(resolved.min_replicas, 1);
        assert_eq!(resolved.max_replicas, 10);
        assert_eq!(resolved.progress_deadline_secs, 180);
        assert_eq!(resolved.image_pull_policy, "IfNotPresent");
        assert_eq!(resolved.priority_class_name, "normal");
        assert_eq!(resolved.tolerations.len(), 9);
        assert_eq!(resolved.route_hostnames, vec!["api.kema.internal"]);
        assert_eq!(resolved.route_path_prefix, "/cartservice/v2");
        assert_eq!(resolved.rpo, Duration::from_secs(24 * 3600));
        assert!(resolved.expiration.is_none());
        assert!(resolved.dev.is_none());
    }

    #[test]
    fn test_default_topology_targets_instance() {
        let resolved = resolver().resolve(&request("prod")).unwrap();

        assert_eq!(resolved.topology_spread_constraints.len(), 7);
        for constraint in &resolved.topology_spread_constraints {
            let labels = constraint
                .label_selector
                .as_ref()
                .and_then(|s| s.match_labels.as_ref())
                .unwrap();
            assert_eq!(labels.get(K8S_INSTANCE).unwrap(), "cartservice-prod");
        }
    }

    #[test]
    fn test_topology_list_is_replaced_not_merged() {
        let mut spec = request("prod");
        spec.topology_spread_constraints = Some(vec![TopologySpreadConstraint {
            max_skew: 2,
            topology_key: TOPOLOGY_HOSTNAME.to_string(),
            when_unsatisfiable: "DoNotSchedule".to_string(),
            ..Default::default()
        }]);

        let resolved = resolver().resolve(&spec).unwrap();
        assert_eq!(resolved.topology_spread_constraints.len(), 1);
        assert_eq!(resolved.topology_spread_constraints[0].max_skew, 2);
    }

    #[test]
    fn test_empty_list_falls_back_to_default() {
        let mut spec = request("prod");
        spec.topology_spread_constraints = Some(Vec::new());
        spec.hpa_metrics = Some(Vec::new());

        let resolved = resolver().resolve(&spec).unwrap();
        assert_eq!(resolved.topology_spread_constraints.len(), 7);
        assert_eq!(resolved.hpa_metrics.len(), 1);
    }

    #[test]
    fn test_optional_values() {
        let mut spec = request("prod");
        spec.expiration = Some("2027-01-31T00:00:00Z".to_string());
        spec.cpu_limit_millicpu = Some(4000);
        spec.memory_limit_mib = Some(0);
        spec.added_capabilities = Some(vec!["NET_BIND_SERVICE".to_string()]);

        let resolved = resolver().resolve(&spec).unwrap();
        assert_eq!(
            resolved.expiration.map(|e| e.to_rfc3339()),
            Some("2027-01-31T00:00:00+00:00".to_string())
        );
        assert_eq!(resolved.cpu_limit_millicpu, Some(4000));
        assert_eq!(resolved.memory_limit_mib, None);
        assert_eq!(resolved.added_capabilities, vec!["NET_BIND_SERVICE"]);
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let spec = request("prod");
        assert_eq!(
            resolver().resolve(&spec).unwrap(),
            resolver().resolve(&spec).unwrap()
        );
    }

    // ========================================================================
    // Development environment
    // ========================================================================

    #[test]
    fn test_dev_settings_defaults() {
        let resolved = resolver().resolve(&request("dev")).unwrap();
        let dev = resolved.dev.unwrap();

        assert_eq!(dev.nameservers, vec!["1.1.1.1"]);
        assert_eq!(dev.volume_mount_path, "/app");
        assert_eq!(dev.host_code_path, "/git-vcs-org");
        assert_eq!(dev.git_token, None);
    }

    #[test]
    fn test_dev_settings_overrides() {
        let mut spec = request("dev");
        spec.dev = Some(DevSpec {
            host_code_path: Some("/home/me/src".to_string()),
            git_token: Some("ghp_x".to_string()),
            ..Default::default()
        });

        let dev = resolver().resolve(&spec).unwrap().dev.unwrap();
        assert_eq!(dev.host_code_path, "/home/me/src");
        assert_eq!(dev.volume_mount_path, "/app");
        assert_eq!(dev.git_token.as_deref(), Some("ghp_x"));
    }

    #[test]
    fn test_dev_block_ignored_outside_dev() {
        let mut spec = request("prod");
        spec.dev = Some(DevSpec {
            git_token: Some("ghp_x".to_string()),
            ..Default::default()
        });

        assert!(resolver().resolve(&spec).unwrap().dev.is_none());
    }

    // ========================================================================
    // Validation checklist
    // ========================================================================

    #[test]
    fn test_missing_runtime_env() {
        let mut spec = request("prod");
        spec.runtime_env = None;

        let err = validation_error(resolver().resolve(&spec));
        assert_eq!(err, ValidationError::Empty { field: "runtimeEnv" });
        assert_eq!(err.to_string(), "runtimeEnv cannot be empty");
    }

    #[test]
    fn test_first_failing_field_is_reported() {
        let mut spec = request("prod");
        spec.cost_center = None;
        spec.monitoring_url = None;

        let err = validation_error(resolver().resolve(&spec));
        assert_eq!(err.field(), "costCenter");
    }

    #[test]
    fn test_missing_monitoring_url() {
        let mut spec = request("prod");
        spec.monitoring_url = None;

        assert_eq!(
            validation_error(resolver().resolve(&spec)),
            ValidationError::Empty {
                field: "monitoringUrl"
            }
        );
    }

    #[test]
    fn test_missing_rpo_is_zero() {
        let mut spec = request("prod");
        spec.rpo = Some("0s".to_string());

        assert_eq!(
            validation_error(resolver().resolve(&spec)),
            ValidationError::Zero { field: "rpo" }
        );
    }

    #[test]
    fn test_malformed_values() {
        let mut spec = request("prod");
        spec.rpo = Some("a while".to_string());
        assert_eq!(validation_error(resolver().resolve(&spec)).field(), "rpo");

        let mut spec = request("prod");
        spec.monitoring_url = Some("not a url".to_string());
        assert_eq!(
            validation_error(resolver().resolve(&spec)).field(),
            "monitoringUrl"
        );

        let mut spec = request("prod");
        spec.expiration = Some("next tuesday".to_string());
        assert_eq!(
            validation_error(resolver().resolve(&spec)).field(),
            "expiration"
        );

        let mut spec = request("prod");
        spec.app_version = Some("latest".to_string());
        assert_eq!(
            validation_error(resolver().resolve(&spec)).field(),
            "appVersion"
        );
    }

    #[test]
    fn test_sample_ratio_bounds() {
        for ratio in [-0.5, 1.01, 2.0] {
            let mut spec = request("prod");
            spec.trace_sample_ratio = Some(ratio);
            assert_eq!(
                validation_error(resolver().resolve(&spec)),
                ValidationError::SampleRatioOutOfRange { ratio }
            );
        }

        let mut spec = request("prod");
        spec.trace_sample_ratio = Some(0.25);
        assert!(resolver().resolve(&spec).is_ok());
    }

    #[test]
    fn test_replica_bounds() {
        let mut spec = request("prod");
        spec.min_replicas = Some(5);
        spec.max_replicas = Some(2);
        assert_eq!(
            validation_error(resolver().resolve(&spec)),
            ValidationError::ReplicaBoundsInverted { min: 5, max: 2 }
        );

        let mut spec = request("prod");
        spec.min_replicas = Some(-1);
        assert_eq!(
            validation_error(resolver().resolve(&spec)).field(),
            "minReplicas"
        );
    }

    #[test]
    fn test_route_prefix_must_be_absolute() {
        let mut spec = request("prod");
        spec.route_path_prefix = Some("cart".to_string());
        assert_eq!(
            validation_error(resolver().resolve(&spec)).field(),
            "routePathPrefix"
        );
    }

    #[test]
    fn test_placeholder_fields_are_rejected() {
        let mut spec = request("prod");
        spec.cost_center = Some(PLACEHOLDER_VALUE.to_string());
        spec.operations_owner = Some("CHANGEME".to_string());

        match resolver().resolve(&spec) {
            Err(ResolveError::PlaceholderValues {
                placeholder,
                fields,
            }) => {
                assert_eq!(placeholder, PLACEHOLDER_VALUE);
                assert_eq!(fields, vec!["costCenter", "operationsOwner"]);
            }
            other => panic!("expected placeholder error, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_priority_class_is_accepted() {
        let mut spec = request("prod");
        spec.priority_class_name = Some("platform-critical".to_string());
        assert_eq!(
            resolver().resolve(&spec).unwrap().priority_class_name,
            "platform-critical"
        );
    }

    // ========================================================================
    // Repository metadata
    // ========================================================================

    #[test]
    fn test_no_remote_url() {
        let resolver = Resolver::new(Defaults::default(), vcs(&[], Some("v1.0.0"))).unwrap();
        let err = resolver.resolve(&request("prod")).unwrap_err();
        assert!(matches!(err, ResolveError::Vcs(VcsError::NoRemoteUrl { .. })));
    }

    #[test]
    fn test_multiple_remote_urls() {
        let resolver = Resolver::new(
            Defaults::default(),
            vcs(
                &["https://github.com/org/a.git", "https://gitlab.com/org/a.git"],
                Some("v1.0.0"),
            ),
        )
        .unwrap();

        let err = resolver.resolve(&request("prod")).unwrap_err();
        assert!(matches!(
            err,
            ResolveError::Vcs(VcsError::MultipleRemoteUrls { count: 2, .. })
        ));
    }

    #[test]
    fn test_missing_tag() {
        let resolver = Resolver::new(
            Defaults::default(),
            vcs(&["https://github.com/org/cartservice.git"], None),
        )
        .unwrap();

        let err = resolver.resolve(&request("prod")).unwrap_err();
        assert!(matches!(err, ResolveError::Vcs(VcsError::NoTag)));
    }

    // ========================================================================
    // Construction
    // ========================================================================

    #[test]
    fn test_new_rejects_inconsistent_defaults() {
        let mut defaults = Defaults::default();
        defaults.topology_keys.push(TOPOLOGY_HOSTNAME.to_string());

        let err = Resolver::new(defaults, vcs(&[], None)).unwrap_err();
        assert_eq!(
            err,
            ConfigError::DuplicateTopologyKey {
                key: TOPOLOGY_HOSTNAME.to_string()
            }
        );
    }

    #[test]
    fn test_custom_defaults_are_used() {
        let defaults = Defaults {
            port: 3000,
            route_hostnames: vec!["shop.example.com".to_string()],
            ..Defaults::default()
        };
        let resolver = Resolver::new(
            defaults,
            vcs(&["https://github.com/org/cartservice.git"], Some("v2.3.1")),
        )
        .unwrap();

        let resolved = resolver.resolve(&request("prod")).unwrap();
        assert_eq!(resolved.port, 3000);
        assert_eq!(resolved.route_hostnames, vec!["shop.example.com"]);
        assert_eq!(resolver.defaults().port, 3000);
    }
}
