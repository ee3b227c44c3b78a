// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `identity`

#[cfg(test)]
mod tests {
    use crate::identity::{instance_name, is_dns_label, Identity, DNS_LABEL_MAX_LEN};
    use crate::labels::{
        K8S_COMPONENT, K8S_INSTANCE, K8S_MANAGED_BY, K8S_NAME, K8S_PART_OF, K8S_VERSION,
        MANAGED_BY_APPSTACK,
    };

    fn cartservice() -> Identity {
        Identity::derive("cartservice", "cartservice-dev", "2.3.1", "api", "shop")
    }

    #[test]
    fn test_labels_carry_every_field() {
        let labels = cartservice().labels();

        assert_eq!(labels.len(), 6);
        assert_eq!(labels.get(K8S_NAME).unwrap(), "cartservice");
        assert_eq!(labels.get(K8S_INSTANCE).unwrap(), "cartservice-dev");
        assert_eq!(labels.get(K8S_VERSION).unwrap(), "2.3.1");
        assert_eq!(labels.get(K8S_COMPONENT).unwrap(), "api");
        assert_eq!(labels.get(K8S_PART_OF).unwrap(), "shop");
        assert_eq!(labels.get(K8S_MANAGED_BY).unwrap(), MANAGED_BY_APPSTACK);
    }

    #[test]
    fn test_selector_is_instance_only() {
        let selector = cartservice().selector();

        assert_eq!(selector.len(), 1);
        assert_eq!(selector.get(K8S_INSTANCE).unwrap(), "cartservice-dev");
    }

    #[test]
    fn test_selector_is_subset_of_labels() {
        let identity = cartservice();
        let labels = identity.labels();
        for (key, value) in identity.selector() {
            assert_eq!(labels.get(&key), Some(&value));
        }
    }

    #[test]
    fn test_distinct_instances_have_distinct_selectors() {
        let dev = Identity::derive("cartservice", "cartservice-dev", "2.3.1", "api", "shop");
        let prod = Identity::derive("cartservice", "cartservice-prod", "2.3.1", "api", "shop");

        assert_ne!(dev.selector(), prod.selector());
        assert_ne!(dev.labels(), prod.labels());
    }

    #[test]
    fn test_derive_is_deterministic() {
        assert_eq!(cartservice(), cartservice());
        assert_eq!(cartservice().labels(), cartservice().labels());
    }

    #[test]
    fn test_build_metadata_is_label_safe() {
        let identity = Identity::derive("svc", "svc-prod", "1.0.0+build.5", "api", "shop");
        assert_eq!(identity.version, "1.0.0_build.5");
    }

    #[test]
    fn test_empty_inputs_are_accepted() {
        let identity = Identity::derive("", "", "", "", "");
        assert_eq!(identity.labels().len(), 6);
        assert_eq!(identity.managed_by, MANAGED_BY_APPSTACK);
    }

    #[test]
    fn test_instance_name() {
        assert_eq!(instance_name("cartservice", "dev"), "cartservice-dev");
        assert_eq!(instance_name("cartservice", "prod"), "cartservice-prod");
    }

    #[test]
    fn test_dns_label_accepts_instance_names() {
        assert!(is_dns_label("cartservice-prod"));
        assert!(is_dns_label("a1-dev"));
        assert!(is_dns_label(&"a".repeat(DNS_LABEL_MAX_LEN)));
    }

    #[test]
    fn test_dns_label_rejects_invalid_names() {
        assert!(!is_dns_label(""));
        assert!(!is_dns_label("foo.js-prod"));
        assert!(!is_dns_label("my_svc-prod"));
        assert!(!is_dns_label("CartService-prod"));
        assert!(!is_dns_label("3dviewer-prod"));
        assert!(!is_dns_label("cartservice-"));
        assert!(!is_dns_label(&"a".repeat(DNS_LABEL_MAX_LEN + 1)));
    }
}
