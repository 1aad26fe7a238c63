use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use cargo_metadata::{Metadata, MetadataCommand, Package};
use clap::{Parser, Subcommand};
use semver::Version;
use toml_edit::{DocumentMut, value};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Workspace maintenance utilities")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify a release tag matches the version of every publishable crate.
    CheckTag {
        #[arg(long)]
        tag: String,
    },
    /// Rewrite the workspace version in the root manifest.
    SetVersion {
        #[arg(long)]
        version: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::CheckTag { tag } => {
            let (version, count) = check_tag(&tag)?;
            println!(
                "Tag {tag} matches workspace version {version} across {count} publishable crates."
            );
        }
        Commands::SetVersion { version } => {
            let version = Version::parse(&version).context("invalid semver version")?;
            set_version(&version)?;
            println!("Workspace version set to {version}.");
        }
    }

    Ok(())
}

fn check_tag(tag: &str) -> Result<(Version, usize)> {
    let tag_version = parse_tag(tag)?;
    let metadata = load_metadata()?;
    let packages = publishable_packages(&metadata);

    if packages.is_empty() {
        bail!("No publishable workspace packages found.");
    }

    for pkg in &packages {
        if pkg.version != tag_version {
            bail!(
                "{} is at {}, which does not match tag {}.",
                pkg.name,
                pkg.version,
                tag
            );
        }
    }

    Ok((tag_version, packages.len()))
}

fn set_version(version: &Version) -> Result<()> {
    let metadata = load_metadata()?;
    let root_manifest = PathBuf::from(metadata.workspace_root.as_std_path()).join("Cargo.toml");
    let text = fs::read_to_string(&root_manifest)
        .with_context(|| format!("reading {}", root_manifest.display()))?;
    let mut doc: DocumentMut = text.parse().context("parsing root manifest")?;

    doc["workspace"]["package"]["version"] = value(version.to_string());

    fs::write(&root_manifest, doc.to_string())
        .with_context(|| format!("writing {}", root_manifest.display()))?;
    Ok(())
}

fn parse_tag(tag: &str) -> Result<Version> {
    let Some(stripped) = tag.strip_prefix('v') else {
        bail!("Tag must start with 'v' (e.g., v1.2.3).");
    };
    Version::parse(stripped).context("Failed to parse semver from tag")
}

fn load_metadata() -> Result<Metadata> {
    MetadataCommand::new()
        .no_deps()
        .exec()
        .context("Failed to load cargo metadata")
}

fn publishable_packages(metadata: &Metadata) -> Vec<&Package> {
    let workspace_ids: HashSet<_> = metadata.workspace_members.iter().collect();
    metadata
        .packages
        .iter()
        .filter(|pkg| workspace_ids.contains(&pkg.id))
        .filter(|pkg| pkg.name != "xtask")
        .filter(|pkg| match &pkg.publish {
            None => true,
            Some(registries) => !registries.is_empty(),
        })
        .collect()
}
