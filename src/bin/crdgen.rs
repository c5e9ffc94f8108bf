//! # CRD Generator
//!
//! Generates the CustomResourceDefinition YAML and the parameter reference
//! of the four UptimeRobot resource kinds.
//!
//! ## Usage
//!
//! ```bash
//! # Generate CRD YAML
//! cargo run --bin crdgen -- yaml > manifests/crds.yaml
//!
//! # Generate the Markdown parameter reference
//! cargo run --bin crdgen -- docs > docs/parameters.md
//! ```

use clap::{Parser, Subcommand};
use uptimerobot_operator::crd::custom_resource_definitions;
use uptimerobot_operator::crd::schema::parameter_table;

#[derive(Parser)]
#[command(name = "crdgen", about = "Generate UptimeRobot operator CRDs and docs")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print all CRDs as a multi-document YAML stream (default)
    Yaml,
    /// Print a Markdown table of spec parameters for every kind
    Docs,
}

fn main() {
    let cli = Cli::parse();
    match cli.command.unwrap_or(Commands::Yaml) {
        Commands::Yaml => print_yaml(),
        Commands::Docs => print_docs(),
    }
}

fn print_yaml() {
    println!("# This file is auto-generated by crdgen");
    println!("# DO NOT EDIT THIS FILE MANUALLY");
    println!("# Change the resource types in src/crd and regenerate");
    for crd in custom_resource_definitions() {
        match serde_yaml::to_string(&crd) {
            Ok(yaml) => {
                println!("---");
                print!("{yaml}");
            }
            Err(e) => {
                eprintln!("Failed to serialize CRD to YAML: {e}");
                std::process::exit(1);
            }
        }
    }
}

fn print_docs() {
    for crd in custom_resource_definitions() {
        println!("### {}", crd.spec.names.kind);
        println!();
        print!("{}", parameter_table(&crd));
        println!();
    }
}
