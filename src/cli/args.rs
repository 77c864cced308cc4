// ABOUTME: Command line argument definitions and parsing using Clap
// ABOUTME: Defines the property-generator CLI structure with run and validate subcommands

use clap::{Parser, Subcommand};
use indexmap::IndexMap;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "property-generator")]
#[command(about = "Generate process properties from templates, object paths and regex rules")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Path to configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Disable colored output")]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the configured properties for a process snapshot
    Run {
        #[arg(long, help = "Path to process snapshot YAML file")]
        process: PathBuf,

        #[arg(long, help = "Path to plugin configuration YAML file")]
        plugin_config: PathBuf,

        #[arg(long, help = "Project name used to select the config section")]
        project: Option<String>,

        #[arg(long, help = "Step name used to select the config section")]
        step: Option<String>,

        #[arg(
            short = 'V',
            long = "var",
            help = "Generic variables for {name} replacement (key=value)"
        )]
        vars: Vec<String>,

        #[arg(long, help = "Treat the snapshot as an untyped YAML mapping")]
        raw: bool,

        #[arg(short, long, help = "Write the JSON run report to this file")]
        output: Option<PathBuf>,
    },

    /// Validate a plugin configuration without touching a process
    Validate {
        #[arg(long, help = "Path to plugin configuration YAML file")]
        plugin_config: PathBuf,

        #[arg(long, help = "Only validate the section selected for this project")]
        project: Option<String>,

        #[arg(long, help = "Only validate the section selected for this step")]
        step: Option<String>,

        #[arg(long, help = "Treat warnings as errors")]
        strict: bool,
    },
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parse variables from key=value format, keeping their order
    pub fn parse_variables(vars: &[String]) -> anyhow::Result<IndexMap<String, String>> {
        let mut variables = IndexMap::new();

        for var in vars {
            if let Some((key, value)) = var.split_once('=') {
                variables.insert(key.to_string(), value.to_string());
            } else {
                return Err(anyhow::anyhow!(
                    "Invalid variable format '{}'. Expected 'key=value'",
                    var
                ));
            }
        }

        Ok(variables)
    }
}
