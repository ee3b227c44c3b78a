// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `defaults`

#[cfg(test)]
mod tests {
    use crate::constants::{
        DEFAULT_HTTP_PORT, DEFAULT_OTEL_ENDPOINT, DEFAULT_PRIORITY_CLASS, RUNTIME_ENV_DEV,
    };
    use crate::defaults::{standard_hpa_behavior, standard_hpa_metrics, Defaults};
    use crate::errors::ConfigError;
    use std::io::Write;

    fn write_yaml(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_builtin_defaults() {
        let defaults = Defaults::default();

        assert_eq!(defaults.otel_endpoint, DEFAULT_OTEL_ENDPOINT);
        assert_eq!(defaults.port, DEFAULT_HTTP_PORT);
        assert_eq!(defaults.min_replicas, 1);
        assert_eq!(defaults.max_replicas, 10);
        assert_eq!(defaults.priority_class_name, DEFAULT_PRIORITY_CLASS);
        assert_eq!(defaults.dev_runtime_env, RUNTIME_ENV_DEV);
        assert_eq!(defaults.topology_keys.len(), 7);
        assert_eq!(defaults.tolerations.len(), 9);
        assert_eq!(defaults.priority_classes.len(), 6);
        assert!(defaults.validate().is_ok());
    }

    #[test]
    fn test_builtin_priority_class_is_in_table() {
        let defaults = Defaults::default();
        let table = defaults.priority_class_table().unwrap();
        assert!(table.contains(&defaults.priority_class_name));
    }

    #[test]
    fn test_hpa_behavior() {
        let behavior = standard_hpa_behavior();

        let down = behavior.scale_down.unwrap();
        assert_eq!(down.select_policy.as_deref(), Some("Min"));
        let policy = &down.policies.unwrap()[0];
        assert_eq!(policy.type_, "Percent");
        assert_eq!(policy.value, 30);
        assert_eq!(policy.period_seconds, 60);

        let up = behavior.scale_up.unwrap();
        assert_eq!(up.select_policy.as_deref(), Some("Max"));
    }

    #[test]
    fn test_hpa_metrics() {
        let metrics = standard_hpa_metrics();
        assert_eq!(metrics.len(), 1);

        let resource = metrics[0].resource.as_ref().unwrap();
        assert_eq!(resource.name, "cpu");
        assert_eq!(resource.target.type_, "Utilization");
        assert_eq!(resource.target.average_utilization, Some(70));
    }

    #[test]
    fn test_from_yaml_file_overrides_subset() {
        let file = write_yaml(
            "port: 9090\nrouteHostnames: [\"api.example.com\"]\ndev:\n  hostCodePath: /src\n",
        );

        let defaults = Defaults::from_yaml_file(file.path()).unwrap();
        assert_eq!(defaults.port, 9090);
        assert_eq!(defaults.route_hostnames, vec!["api.example.com"]);
        assert_eq!(defaults.dev.host_code_path, "/src");

        // Untouched keys keep their built-in values
        assert_eq!(defaults.dev.volume_mount_path, "/app");
        assert_eq!(defaults.otel_endpoint, DEFAULT_OTEL_ENDPOINT);
        assert_eq!(defaults.topology_keys.len(), 7);
    }

    #[test]
    fn test_from_empty_file() {
        let file = write_yaml("");
        assert_eq!(
            Defaults::from_yaml_file(file.path()).unwrap(),
            Defaults::default()
        );
    }

    #[test]
    fn test_from_yaml_file_rejects_unknown_keys() {
        let file = write_yaml("prot: 9090\n");
        assert!(Defaults::from_yaml_file(file.path()).is_err());
    }

    #[test]
    fn test_from_yaml_file_rejects_duplicate_topology_key() {
        let file = write_yaml("topologyKeys: [\"kubernetes.io/hostname\", \"kubernetes.io/hostname\"]\n");

        let err = Defaults::from_yaml_file(file.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::DuplicateTopologyKey { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_duplicate_priority_class() {
        let mut defaults = Defaults::default();
        let extra = defaults.priority_classes[0].clone();
        defaults.priority_classes.push(extra);

        assert!(matches!(
            defaults.validate(),
            Err(ConfigError::DuplicatePriorityClass { .. })
        ));
    }

    #[test]
    fn test_round_trips_through_yaml() {
        let defaults = Defaults::default();
        let yaml = serde_yaml::to_string(&defaults).unwrap();
        let parsed: Defaults = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, defaults);
    }
}
