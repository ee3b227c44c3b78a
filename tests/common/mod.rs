// Common test utilities for integration tests

#![allow(dead_code)]

use appstack::deployment::DeploymentSpec;
use appstack::vcs::StaticVcs;
use std::sync::Arc;

/// `github.com/org/cartservice` tagged `v2.3.1`
pub fn cartservice_repo() -> Arc<StaticVcs> {
    Arc::new(StaticVcs::new(
        &["git@github.com:org/cartservice.git"],
        Some("v2.3.1"),
    ))
}

/// A request file as a team would write it: only the fields without defaults
pub const CARTSERVICE_REQUEST: &str = r"
runtimeEnv: prod
appNamespace: shop
appComponent: api
businessUnitId: engineering
customerId: internal
costCenter: engineering
costAllocationOwner: team-cart
operationsOwner: team-cart
rpo: 24h
monitoringUrl: https://grafana.kema.internal/d/cart
";

/// Parses [`CARTSERVICE_REQUEST`] with the runtime environment replaced
pub fn cartservice_request(env: &str) -> DeploymentSpec {
    let mut spec = DeploymentSpec::from_yaml_str(CARTSERVICE_REQUEST)
        .expect("fixture request must parse");
    spec.runtime_env = Some(env.to_string());
    spec
}

/// Splits a multi-document YAML stream into parsed documents
pub fn yaml_documents(stream: &str) -> Vec<serde_yaml::Value> {
    stream
        .split("---\n")
        .filter(|doc| !doc.trim().is_empty())
        .map(|doc| serde_yaml::from_str(doc).expect("document must be valid YAML"))
        .collect()
}
