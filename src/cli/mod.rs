//! Command-line interface for chardex.
//!
//! Provides commands for listing the catalog, showing a single character,
//! enumerating identifiers for pre-rendering, and inspecting configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config::{self, ResolvedConfig, DATA_DIR_ENV};
use crate::library::{Catalog, CharacterDetail, ContentId};

/// chardex - Static character catalog resolver
#[derive(Parser, Debug)]
#[command(name = "chardex")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Character data directory (overrides config file)
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all characters
    List {
        /// Print previews as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show details of a character
    Show {
        /// Character ID (file stem, e.g. kaedehara_kazuha)
        id: String,

        /// Print the detail view as JSON
        #[arg(long)]
        json: bool,

        /// Print the raw record as JSON instead of the detail view
        #[arg(long, conflicts_with = "json")]
        raw: bool,
    },

    /// Print every character ID (one per line) for pre-rendering
    Ids {
        /// Print detail page routes instead of bare IDs
        #[arg(long)]
        routes: bool,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let cfg = self.resolved_config()?;
        let catalog = Catalog::from_config(&cfg);

        match self.command {
            Commands::List { json } => list_characters(&catalog, json).await,
            Commands::Show { id, json, raw } => show_character(&catalog, &id, json, raw).await,
            Commands::Ids { routes } => list_ids(&catalog, routes).await,
            Commands::Config => show_config(&cfg),
        }
    }

    fn resolved_config(&self) -> Result<ResolvedConfig> {
        let cwd = std::env::current_dir().context("Failed to determine current directory")?;
        let loaded = config::config().cloned();
        apply_data_dir_override(loaded, self.data_dir.as_deref(), &cwd)
    }
}

/// Apply `--data-dir` on top of the loaded configuration.
///
/// An explicit data directory is enough to run, so a config file that
/// fails to load is logged and replaced by defaults in that case.
fn apply_data_dir_override(
    loaded: Result<ResolvedConfig>,
    data_dir: Option<&Path>,
    cwd: &Path,
) -> Result<ResolvedConfig> {
    match (loaded, data_dir) {
        (Ok(cfg), Some(dir)) => Ok(cfg.with_data_dir(dir)),
        (Ok(cfg), None) => Ok(cfg),
        (Err(e), Some(dir)) => {
            tracing::warn!("Ignoring unusable configuration, using defaults: {:#}", e);
            Ok(ResolvedConfig::defaults(cwd).with_data_dir(dir))
        }
        (Err(e), None) => Err(e),
    }
}

/// List all characters as a table
async fn list_characters(catalog: &Catalog, json: bool) -> Result<()> {
    let previews = catalog.list_previews().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&previews)?);
        return Ok(());
    }

    if previews.is_empty() {
        println!("No characters found in {}", catalog.data_dir().display());
        return Ok(());
    }

    println!("{:<24} {:<28} {}", "ID", "NAME", "IMAGE");
    println!("{}", "-".repeat(90));

    for preview in &previews {
        println!("{:<24} {:<28} {}", preview.id, preview.name, preview.image);
    }

    println!("\nTotal: {} characters", previews.len());

    Ok(())
}

/// Show a single character
async fn show_character(catalog: &Catalog, id: &str, json: bool, raw: bool) -> Result<()> {
    let id = ContentId::from(id);

    if raw {
        let record = catalog
            .load_record(&id)
            .await
            .ok_or_else(|| anyhow::anyhow!("Character not found: {}", id))?;
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    let detail = catalog
        .detail(&id)
        .await
        .ok_or_else(|| anyhow::anyhow!("Character not found: {}", id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&detail)?);
    } else {
        print!("{}", render_detail(&detail));
    }

    Ok(())
}

/// Plain-text rendering of a detail view
pub fn render_detail(detail: &CharacterDetail) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    let rule = "=".repeat(64);

    // Writing to a String cannot fail
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "  {}", detail.name);
    let _ = writeln!(out, "  {} | {}", detail.weapon_label, detail.rarity_label);
    let _ = writeln!(out, "  Image: {}", detail.image);
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "\nDescription\n  {}", detail.description);

    let _ = writeln!(out, "\nBase Stats (Level 1)");
    for stat in &detail.base_stats {
        let _ = writeln!(out, "  {:<4} {}", stat.label, stat.value);
    }

    if let Some(growth) = &detail.stat_growth {
        let _ = writeln!(out, "\nStat Growth\n  {}", growth);
    }

    if !detail.constellations.is_empty() {
        let _ = writeln!(out, "\nConstellations");
        for c in &detail.constellations {
            let _ = writeln!(out, "  {}", c.title);
            let _ = writeln!(out, "    {}", c.description_html);
        }
    }

    out
}

/// Print every ID (or route) for pre-rendering detail pages
async fn list_ids(catalog: &Catalog, routes: bool) -> Result<()> {
    let params = catalog
        .static_routes()
        .await
        .context("Cannot enumerate characters for pre-rendering")?;

    for param in params {
        if routes {
            println!("{}", param.path());
        } else {
            println!("{}", param.id);
        }
    }

    Ok(())
}

/// Show resolved configuration
fn show_config(cfg: &ResolvedConfig) -> Result<()> {
    println!("chardex configuration");
    println!("{}", "-".repeat(40));
    println!(
        "Config file:      {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!("Data directory:   {}", cfg.data_dir.display());
    println!("Media root:       {}", cfg.media_root);
    println!("Record extension: .{}", cfg.record_extension);
    println!("Image extension:  .{}", cfg.image_extension);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::StatLine;

    #[test]
    fn test_cli_parses_show() {
        let cli = Cli::try_parse_from(["chardex", "show", "ganyu", "--json"]).unwrap();
        match cli.command {
            Commands::Show { id, json, raw } => {
                assert_eq!(id, "ganyu");
                assert!(json);
                assert!(!raw);
            }
            other => panic!("Expected Show, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_rejects_json_with_raw() {
        assert!(Cli::try_parse_from(["chardex", "show", "ganyu", "--json", "--raw"]).is_err());
    }

    #[test]
    fn test_cli_global_data_dir() {
        let cli = Cli::try_parse_from(["chardex", "ids", "--data-dir", "/tmp/chars"]).unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/chars")));
    }

    #[test]
    fn test_data_dir_override_survives_bad_config() {
        let cwd = PathBuf::from("/srv/site");
        let broken = || Err(anyhow::anyhow!("Failed to parse config file"));

        let cfg = apply_data_dir_override(broken(), Some(Path::new("/tmp/chars")), &cwd).unwrap();
        assert_eq!(cfg.data_dir, PathBuf::from("/tmp/chars"));
        assert_eq!(cfg.media_root, config::DEFAULT_MEDIA_ROOT);
        assert!(cfg.config_file.is_none());

        assert!(apply_data_dir_override(broken(), None, &cwd).is_err());
    }

    #[test]
    fn test_data_dir_override_replaces_loaded_dir() {
        let cwd = PathBuf::from("/srv/site");
        let loaded = ResolvedConfig::defaults(&cwd);

        let cfg = apply_data_dir_override(Ok(loaded.clone()), None, &cwd).unwrap();
        assert_eq!(cfg, loaded);

        let cfg = apply_data_dir_override(Ok(loaded), Some(Path::new("/x")), &cwd).unwrap();
        assert_eq!(cfg.data_dir, PathBuf::from("/x"));
    }

    #[test]
    fn test_render_detail_omits_empty_sections() {
        let detail = CharacterDetail {
            id: ContentId::from("ganyu"),
            name: "Ganyu".to_string(),
            image: "/media/images/characters/ganyu.png".to_string(),
            weapon_label: "Weapon: Bow".to_string(),
            rarity_label: "Rarity: 5".to_string(),
            description: "Adeptus.".to_string(),
            base_stats: vec![StatLine {
                label: "HP".to_string(),
                value: 763,
            }],
            stat_growth: None,
            constellations: Vec::new(),
        };

        let text = render_detail(&detail);
        assert!(text.contains("Weapon: Bow | Rarity: 5"));
        assert!(text.contains("HP   763"));
        assert!(!text.contains("Stat Growth"));
        assert!(!text.contains("Constellations"));
    }
}
