// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

#![allow(unexpected_cfgs)]

//! # Appstack - Resource Graphs for HTTP Workloads
//!
//! Appstack turns a short, partially filled deployment request into the full set
//! of Kubernetes objects an HTTP application needs: a namespace with pod
//! security labels, its configuration, a hardened deployment, an autoscaler, a
//! service and a Gateway API route.
//!
//! ## Overview
//!
//! Generation runs in two stages:
//!
//! 1. [`resolver::Resolver`] merges the request with organization defaults and
//!    repository metadata (name, URL and version from the git remote and tags),
//!    then validates every required field.
//! 2. [`assembler::Assembler`] builds the objects from the resolved spec and
//!    returns them as a dependency-ordered [`graph::ResourceGraph`].
//!
//! Nothing here talks to a cluster. Applying the graph is left to whichever
//! engine consumes the rendered YAML.
//!
//! ## Modules
//!
//! - [`deployment`] - Request and resolved spec types
//! - [`defaults`] - Organization-wide defaults
//! - [`resolver`] - Merge and validation
//! - [`assembler`] - Object builders
//! - [`graph`] - Ordered object collection and rendering
//! - [`identity`] - Standard labels
//! - [`scheduling`] - Priority classes, topology spread and tolerations
//! - [`vcs`] - Repository metadata
//! - [`network_prefix`] - Random IPv6 ULA prefixes
//!
//! ## Example
//!
//! ```rust,no_run
//! use appstack::assembler::Assembler;
//! use appstack::defaults::Defaults;
//! use appstack::deployment::DeploymentSpec;
//! use appstack::resolver::Resolver;
//! use appstack::vcs::GitCli;
//! use std::sync::Arc;
//!
//! # fn main() -> anyhow::Result<()> {
//! let resolver = Resolver::new(Defaults::default(), Arc::new(GitCli::new(".")))?;
//! let spec = DeploymentSpec::from_yaml_file("deploy/app.yaml".as_ref())?;
//!
//! let resolved = resolver.resolve(&spec)?;
//! let graph = Assembler::default().assemble(&resolved, &resolved.identity())?;
//! print!("{}", graph.to_yaml()?);
//! # Ok(())
//! # }
//! ```

pub mod assembler;
pub mod constants;
pub mod defaults;
pub mod deployment;
pub mod errors;
pub mod gateway_api;
pub mod graph;
pub mod identity;
pub mod labels;
pub mod network_prefix;
pub mod ownership;
pub mod resolver;
pub mod scheduling;
pub mod vcs;

#[cfg(test)]
mod defaults_tests;
#[cfg(test)]
mod errors_tests;
#[cfg(test)]
mod identity_tests;
#[cfg(test)]
mod resolver_tests;
#[cfg(test)]
mod vcs_tests;
