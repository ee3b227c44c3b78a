// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Ordered collection of generated objects.
//!
//! Objects are kept in dependency order: an object is only ever pushed after
//! every object it references. The external engine applying the graph can rely
//! on this order for create operations and reverse it for deletes.

use crate::errors::AssemblyError;
use crate::gateway_api::HTTPRoute;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::autoscaling::v2::HorizontalPodAutoscaler;
use k8s_openapi::api::core::v1::{ConfigMap, Namespace, Secret, Service};
use kube::ResourceExt;
use serde::Serialize;

/// One generated platform object.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GraphObject {
    Namespace(Namespace),
    ConfigMap(ConfigMap),
    Secret(Secret),
    Deployment(Deployment),
    HorizontalPodAutoscaler(HorizontalPodAutoscaler),
    Service(Service),
    HttpRoute(HTTPRoute),
}

impl GraphObject {
    /// Kubernetes kind of the object.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Namespace(_) => "Namespace",
            Self::ConfigMap(_) => "ConfigMap",
            Self::Secret(_) => "Secret",
            Self::Deployment(_) => "Deployment",
            Self::HorizontalPodAutoscaler(_) => "HorizontalPodAutoscaler",
            Self::Service(_) => "Service",
            Self::HttpRoute(_) => "HTTPRoute",
        }
    }

    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Namespace(o) => o.name_any(),
            Self::ConfigMap(o) => o.name_any(),
            Self::Secret(o) => o.name_any(),
            Self::Deployment(o) => o.name_any(),
            Self::HorizontalPodAutoscaler(o) => o.name_any(),
            Self::Service(o) => o.name_any(),
            Self::HttpRoute(o) => o.name_any(),
        }
    }

    /// Namespace of the object; `None` for cluster-scoped objects.
    #[must_use]
    pub fn namespace(&self) -> Option<String> {
        match self {
            Self::Namespace(_) => None,
            Self::ConfigMap(o) => o.namespace(),
            Self::Secret(o) => o.namespace(),
            Self::Deployment(o) => o.namespace(),
            Self::HorizontalPodAutoscaler(o) => o.namespace(),
            Self::Service(o) => o.namespace(),
            Self::HttpRoute(o) => o.namespace(),
        }
    }

    // Position in the dependency order. Lower ranks are referenced by higher ones.
    fn rank(&self) -> u8 {
        match self {
            Self::Namespace(_) => 0,
            Self::ConfigMap(_) => 1,
            Self::Secret(_) => 2,
            Self::Deployment(_) => 3,
            Self::HorizontalPodAutoscaler(_) => 4,
            Self::Service(_) => 5,
            Self::HttpRoute(_) => 6,
        }
    }
}

/// Dependency-ordered list of generated objects.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResourceGraph {
    objects: Vec<GraphObject>,
}

impl ResourceGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an object, refusing anything that must precede an object
    /// already in the graph.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError::OutOfOrder`] if `object` ranks before the last
    /// pushed object.
    pub fn push(&mut self, object: GraphObject) -> Result<(), AssemblyError> {
        if let Some(last) = self.objects.last() {
            if object.rank() < last.rank() {
                return Err(AssemblyError::OutOfOrder {
                    kind: object.kind(),
                    after: last.kind(),
                });
            }
        }
        self.objects.push(object);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &GraphObject> {
        self.objects.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Kinds in emission order.
    #[must_use]
    pub fn kinds(&self) -> Vec<&'static str> {
        self.objects.iter().map(GraphObject::kind).collect()
    }

    /// First object of the given kind.
    #[must_use]
    pub fn find(&self, kind: &str) -> Option<&GraphObject> {
        self.objects.iter().find(|o| o.kind() == kind)
    }

    /// Renders the graph as a multi-document YAML stream.
    ///
    /// # Errors
    ///
    /// Returns an error if an object fails to serialize.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        let mut out = String::new();
        for object in &self.objects {
            out.push_str("---\n");
            out.push_str(&serde_yaml::to_string(object)?);
        }
        Ok(out)
    }

    /// Renders the graph as a pretty-printed JSON array.
    ///
    /// # Errors
    ///
    /// Returns an error if an object fails to serialize.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.objects)
    }
}

impl<'a> IntoIterator for &'a ResourceGraph {
    type Item = &'a GraphObject;
    type IntoIter = std::slice::Iter<'a, GraphObject>;

    fn into_iter(self) -> Self::IntoIter {
        self.objects.iter()
    }
}
