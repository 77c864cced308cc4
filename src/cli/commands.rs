// ABOUTME: Command implementations for the property-generator CLI
// ABOUTME: Handles the run and validate commands against snapshots and plugin configs

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::config::Config;
use crate::engine::{InMemoryPropertyStore, PropertyGenerator, RunOutcome, RunReport};
use crate::parser::{ConfigValidator, PluginConfig, WILDCARD};
use crate::process::Process;
use crate::template::{evaluate, Accessible, MapVariableReplacer};

/// Options of the run command after argument parsing
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub process: PathBuf,
    pub plugin_config: PathBuf,
    pub project: Option<String>,
    pub step: Option<String>,
    pub raw: bool,
    pub output: Option<PathBuf>,
}

/// Generate the configured properties for a process snapshot
pub async fn run_properties(options: RunOptions, config: &Config) -> Result<()> {
    info!(
        "Generating properties for {} with {}",
        options.process.display(),
        options.plugin_config.display()
    );

    let plugin_config = PluginConfig::load(&options.plugin_config)
        .await
        .with_context(|| format!("Failed to load plugin config '{}'", options.plugin_config.display()))?;

    let content = tokio::fs::read_to_string(&options.process)
        .await
        .with_context(|| format!("Failed to read process snapshot '{}'", options.process.display()))?;

    let report = if options.raw {
        let snapshot: serde_yaml::Mapping =
            serde_yaml::from_str(&content).context("Failed to parse process snapshot")?;
        let project = evaluate(&snapshot, "projekt.titel").ok().flatten();
        let replacer = build_replacer(config, process_tokens(&snapshot));
        let mut store = InMemoryPropertyStore::new();

        let generator = select_generator(&plugin_config, &options, project.as_deref(), config)?;
        generator.execute(&snapshot, &replacer, &mut store)
    } else {
        let process = Process::from_yaml(&content).context("Failed to parse process snapshot")?;
        let replacer = build_replacer(config, process_tokens(&process));
        let mut store = InMemoryPropertyStore::for_process(&process);

        let generator =
            select_generator(&plugin_config, &options, process.project_title(), config)?;
        generator.execute(&process, &replacer, &mut store)
    };

    for result in &report.properties {
        if let Some(value) = &result.value {
            println!("{} = {}", result.name, value);
        }
    }

    if let Some(output_path) = &options.output {
        write_report(&report, output_path)?;
    }

    finish(&report)
}

/// Validate a plugin configuration, optionally only the section for a project/step pair
pub async fn validate_config(
    plugin_config_path: PathBuf,
    project: Option<String>,
    step: Option<String>,
    strict: bool,
    config: &Config,
) -> Result<()> {
    info!("Validating plugin config: {}", plugin_config_path.display());

    let plugin_config = PluginConfig::load(&plugin_config_path)
        .await
        .map_err(|e| anyhow::anyhow!("Plugin config validation failed: {}", e))?;
    let validator = ConfigValidator::new().with_strict_mode(strict);

    let report = if project.is_some() || step.is_some() {
        let project = project.or_else(|| config.default_project.clone());
        let step = step.or_else(|| config.default_step.clone());
        let definitions = plugin_config.definitions_for(
            project.as_deref().unwrap_or(WILDCARD),
            step.as_deref().unwrap_or(WILDCARD),
        )?;
        validator.validate(&definitions)
    } else {
        validator.validate_config(&plugin_config)?
    };

    for warning in &report.warnings {
        println!("⚠ {}", warning);
    }
    for error in &report.errors {
        println!("✗ {}", error);
    }

    if !report.is_valid {
        return Err(anyhow::anyhow!(
            "Plugin config '{}' is invalid",
            plugin_config_path.display()
        ));
    }

    println!("✓ Plugin config '{}' is valid", plugin_config_path.display());
    println!("  Sections: {}", plugin_config.config.len());
    info!("Plugin config validation completed successfully");

    Ok(())
}

fn select_generator(
    plugin_config: &PluginConfig,
    options: &RunOptions,
    process_project: Option<&str>,
    config: &Config,
) -> Result<PropertyGenerator> {
    let project = options
        .project
        .as_deref()
        .or(process_project)
        .or(config.default_project.as_deref())
        .unwrap_or(WILDCARD);
    let step = options
        .step
        .as_deref()
        .or(config.default_step.as_deref())
        .unwrap_or(WILDCARD);

    let section = plugin_config.section_for(project, step)?;
    let generator = PropertyGenerator::from_section(section)?;
    info!(
        "Loaded {} property definitions for project '{}', step '{}'",
        generator.definitions().len(),
        project,
        step
    );
    Ok(generator)
}

/// Tokens describing the process itself, available as `{processtitle}` and friends
fn process_tokens(root: &dyn Accessible) -> Vec<(&'static str, String)> {
    [
        ("processtitle", "titel"),
        ("processid", "id"),
        ("projectname", "projekt.titel"),
    ]
    .into_iter()
    .filter_map(|(token, path)| {
        evaluate(root, path)
            .ok()
            .flatten()
            .map(|value| (token, value))
    })
    .collect()
}

/// Process tokens first, then configured variables, then command line variables
fn build_replacer(config: &Config, tokens: Vec<(&'static str, String)>) -> MapVariableReplacer {
    let mut replacer = MapVariableReplacer::new();
    replacer.extend(tokens);
    replacer.extend(
        config
            .template_vars
            .iter()
            .map(|(name, value)| (name.clone(), value.clone())),
    );
    replacer
}

fn write_report(report: &RunReport, output_path: &Path) -> Result<()> {
    let json_content = serde_json::to_string_pretty(report)
        .map_err(|e| anyhow::anyhow!("Failed to serialize report to JSON: {}", e))?;

    std::fs::write(output_path, json_content).map_err(|e| {
        anyhow::anyhow!(
            "Failed to write output file '{}': {}",
            output_path.display(),
            e
        )
    })?;

    info!("Report written to: {}", output_path.display());
    Ok(())
}

fn finish(report: &RunReport) -> Result<()> {
    println!(
        "Run {} finished with outcome: {}",
        report.run_id, report.outcome
    );

    match report.outcome {
        RunOutcome::Finish => Ok(()),
        RunOutcome::Error => {
            let failed = report
                .properties
                .iter()
                .find(|result| result.error.is_some());
            match failed {
                Some(result) => {
                    warn!("Property '{}' aborted the run", result.name);
                    Err(anyhow::anyhow!(
                        "Property generation failed at '{}': {}",
                        result.name,
                        result.error.as_deref().unwrap_or_default()
                    ))
                }
                None => Err(anyhow::anyhow!("Property generation failed")),
            }
        }
    }
}
