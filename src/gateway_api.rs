// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Gateway API `HTTPRoute` types.
//!
//! Only the subset of `gateway.networking.k8s.io/v1` needed to attach a route to
//! a shared Gateway, match a path prefix, rewrite it and forward to a Service.
//! The CRD itself is installed with the Gateway API release, never generated
//! from these types.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Path match type matching on a `/`-separated prefix
pub const PATH_MATCH_PATH_PREFIX: &str = "PathPrefix";

/// Filter type rewriting the request URL before forwarding
pub const FILTER_URL_REWRITE: &str = "URLRewrite";

/// Path modifier replacing the matched prefix
pub const PATH_MODIFIER_REPLACE_PREFIX_MATCH: &str = "ReplacePrefixMatch";

/// API group of the Gateway API
pub const GATEWAY_API_GROUP: &str = "gateway.networking.k8s.io";

/// Kind of the resource a route attaches to
pub const KIND_GATEWAY: &str = "Gateway";

/// Route attaching HTTP traffic from a Gateway to backends.
#[derive(CustomResource, Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "gateway.networking.k8s.io",
    version = "v1",
    kind = "HTTPRoute",
    plural = "httproutes",
    namespaced,
    derive = "PartialEq",
    doc = "HTTPRoute provides a way to route HTTP requests from a Gateway to backend Services."
)]
#[serde(rename_all = "camelCase")]
pub struct HTTPRouteSpec {
    /// Gateways (or listeners of them) this route attaches to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parent_refs: Vec<ParentReference>,

    /// Host headers the route matches. Empty matches every listener hostname.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hostnames: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<HTTPRouteRule>,
}

/// Reference to a parent Gateway.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParentReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Listener name within the Gateway
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_name: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HTTPRouteRule {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matches: Vec<HTTPRouteMatch>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<HTTPRouteFilter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub backend_refs: Vec<HTTPBackendRef>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HTTPRouteMatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<HTTPPathMatch>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HTTPPathMatch {
    /// `Exact`, `PathPrefix` or `RegularExpression`
    #[serde(rename = "type")]
    pub type_: String,
    pub value: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HTTPRouteFilter {
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_rewrite: Option<HTTPURLRewriteFilter>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HTTPURLRewriteFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<HTTPPathModifier>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HTTPPathModifier {
    /// `ReplaceFullPath` or `ReplacePrefixMatch`
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace_full_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace_prefix_match: Option<String>,
}

/// Backend receiving matched traffic. Defaults to a core `Service`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HTTPBackendRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<i32>,
}

impl HTTPRouteRule {
    /// Rule matching `prefix`, rewriting it to `/` and forwarding to one Service port.
    #[must_use]
    pub fn prefix_rewrite_to_service(prefix: &str, service: &str, port: i32) -> Self {
        Self {
            matches: vec![HTTPRouteMatch {
                path: Some(HTTPPathMatch {
                    type_: PATH_MATCH_PATH_PREFIX.to_string(),
                    value: prefix.to_string(),
                }),
            }],
            filters: vec![HTTPRouteFilter {
                type_: FILTER_URL_REWRITE.to_string(),
                url_rewrite: Some(HTTPURLRewriteFilter {
                    hostname: None,
                    path: Some(HTTPPathModifier {
                        type_: PATH_MODIFIER_REPLACE_PREFIX_MATCH.to_string(),
                        replace_full_path: None,
                        replace_prefix_match: Some("/".to_string()),
                    }),
                }),
            }],
            backend_refs: vec![HTTPBackendRef {
                name: service.to_string(),
                namespace: None,
                port: Some(port),
                weight: None,
            }],
        }
    }
}
