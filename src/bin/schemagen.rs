// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Deployment Request Schema Generator
//!
//! Generates the JSON Schema of the deployment request format from the Rust
//! types in src/deployment.rs, so editors can validate request files.
//!
//! Usage:
//!   cargo run --bin schemagen
//!
//! The schema is written to deploy/schemas/deployment-spec.schema.json.

use appstack::deployment::DeploymentSpec;
use std::fs;
use std::path::Path;

const SCHEMA_FILE: &str = "deployment-spec.schema.json";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = Path::new("deploy/schemas");

    // Ensure output directory exists
    fs::create_dir_all(output_dir)?;

    println!("Generating deployment request schema from src/deployment.rs...");

    let schema = schemars::schema_for!(DeploymentSpec);
    let mut content = serde_json::to_string_pretty(&schema)?;
    content.push('\n');

    let path = output_dir.join(SCHEMA_FILE);
    fs::write(&path, content)?;

    println!("✓ Wrote {}", path.display());
    println!("\nReference it from a request file with:");
    println!("  # yaml-language-server: $schema=./{SCHEMA_FILE}");

    Ok(())
}
