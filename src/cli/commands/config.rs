//! `stk config` command - Inspect configuration
//!
//! Values are layered: built-in defaults, the global file, the workspace's
//! `.stk/config.yaml`, then `STK_*` environment variables.

use clap::Subcommand;
use console::style;
use miette::{miette, IntoDiagnostic, Result};

use crate::cli::GlobalOpts;
use crate::core::{Config, Workspace};

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Show the effective configuration (access token masked)
    Show(ShowArgs),

    /// Show paths to configuration files
    Path,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ShowArgs {
    /// Show only this key's value (e.g. report_title, remote.sheet)
    pub key: Option<String>,
}

/// Run a config subcommand
pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    let workspace = Workspace::open(global.workspace.as_deref()).ok();
    let config = Config::load_for(workspace.as_ref());

    match cmd {
        ConfigCommands::Show(args) => run_show(args, &config),
        ConfigCommands::Path => run_path(workspace.as_ref()),
    }
}

fn run_show(args: ShowArgs, config: &Config) -> Result<()> {
    let config = config.redacted();

    if let Some(key) = &args.key {
        let value = get_config_value(&config, key)
            .ok_or_else(|| miette!("Key '{}' is not set", key))?;
        println!("{}", value);
        return Ok(());
    }

    let yaml = serde_yml::to_string(&config).into_diagnostic()?;
    print!("{}", yaml);
    Ok(())
}

/// Effective value of a dotted key, defaults applied
fn get_config_value(config: &Config, key: &str) -> Option<String> {
    match key {
        "placeholder_image" => Some(config.placeholder_image().to_string()),
        "report_title" => Some(config.report_title().to_string()),
        "default_format" => config.default_format.clone(),
        "remote.base_url" => Some(config.remote.base_url().to_string()),
        "remote.spreadsheet_id" => config.remote.spreadsheet_id.clone(),
        "remote.sheet" => Some(config.remote.sheet().to_string()),
        "remote.token" => config.remote.token.clone(),
        _ => None,
    }
}

fn run_path(workspace: Option<&Workspace>) -> Result<()> {
    match Config::global_config_path() {
        Some(path) => {
            let status = if path.exists() {
                style("(exists)").green()
            } else {
                style("(not found)").dim()
            };
            println!("Global:    {} {}", path.display(), status);
        }
        None => println!("Global:    {}", style("(no config directory)").dim()),
    }

    match workspace {
        Some(ws) => println!("Workspace: {}", ws.config_path().display()),
        None => println!("Workspace: {}", style("(not in a workspace)").dim()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RemoteSettings;

    #[test]
    fn test_get_config_value() {
        let config = Config {
            report_title: Some("Warehouse B".to_string()),
            remote: RemoteSettings {
                token: Some("secret".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let redacted = config.redacted();

        assert_eq!(
            get_config_value(&redacted, "report_title").as_deref(),
            Some("Warehouse B")
        );
        assert_eq!(
            get_config_value(&redacted, "remote.sheet").as_deref(),
            Some("inventory")
        );
        assert_eq!(
            get_config_value(&redacted, "remote.token").as_deref(),
            Some("********")
        );
        assert!(get_config_value(&redacted, "default_format").is_none());
        assert!(get_config_value(&redacted, "nonsense").is_none());
    }
}
