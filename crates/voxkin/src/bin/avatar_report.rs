//! # Avatar Report
//!
//! Builds one avatar and prints what came out: cell counts per limb,
//! pivots, the look-at point and the resources handed to the registry.
//!
//! ```text
//! avatar_report [CONFIG.toml] [PATTERN.txt]
//! RUST_LOG=voxkin_avatar=debug avatar_report
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use voxkin::prelude::*;
use voxkin::avatar::Resource;

#[derive(Parser)]
#[command(name = "avatar_report")]
#[command(about = "Build a voxel avatar and print its limb summary", long_about = None)]
struct Cli {
    /// TOML config; defaults are used when omitted
    config: Option<PathBuf>,

    /// Glyph file, one row per line; the built-in glyph when omitted
    pattern: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AvatarConfig::from_toml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AvatarConfig::default(),
    };
    let pattern = match &cli.pattern {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading glyph {}", path.display()))?;
            Pattern::parse(&text)
        }
        None => Pattern::default_glyph(),
    };

    tracing::info!(
        config = %cli.config.as_deref().map_or("<defaults>".into(), |p| p.display().to_string()),
        pattern = %cli.pattern.as_deref().map_or("<built-in>".into(), |p| p.display().to_string()),
        "building avatar"
    );

    let builder = AvatarBuilder::new(config)?;
    let mut registry = DisposeList::new();
    let avatar = builder.build(&pattern, &mut registry);

    print_report(&pattern, &avatar, &registry);
    Ok(())
}

fn print_report(pattern: &Pattern, avatar: &AvatarBuild, registry: &DisposeList) {
    let selection = &avatar.selection;

    println!("=== Avatar Report ===");
    println!(
        "glyph: {} rows x {} cols",
        pattern.row_count(),
        pattern.col_count()
    );
    println!(
        "body: {} cells, {} voxels, {} instance bytes",
        selection.body.len(),
        avatar.body.count(),
        avatar.body.as_bytes().len()
    );

    let limbs = [
        ("arm_left", &avatar.arm_left),
        ("arm_right", &avatar.arm_right),
        ("left_foot", &avatar.left_foot),
        ("right_foot", &avatar.right_foot),
    ];
    for (name, limb) in limbs {
        match limb {
            Some(group) => {
                let pivot = group.pivot();
                println!(
                    "{name}: {} cells, {} instance bytes, pivot ({:.3}, {:.3}, {:.3})",
                    group.cells.len(),
                    group.mesh.as_bytes().len(),
                    pivot.x,
                    pivot.y,
                    pivot.z
                );
            }
            None => println!("{name}: absent"),
        }
    }

    let arm_source = if selection.used_markers {
        "hand markers"
    } else if selection.used_fallback {
        "band-edge fallback"
    } else {
        "classification"
    };
    println!("arms from: {arm_source}");
    println!(
        "look_at: ({:.3}, {:.3}, {:.3})",
        avatar.look_at.x, avatar.look_at.y, avatar.look_at.z
    );
    println!("total voxels: {}", avatar.voxel_count());

    println!("registered resources: {}", registry.len());
    for resource in registry.iter() {
        match resource {
            Resource::Geometry(handle, geometry) => {
                println!("  geometry #{}: box edge {}", handle.raw(), geometry.edge);
            }
            Resource::Material(handle, material) => {
                let [r, g, b] = material.rgb();
                println!(
                    "  material #{}: color {:#08x} (rgb {r:.3} {g:.3} {b:.3}) roughness {} metalness {}",
                    handle.raw(),
                    material.color,
                    material.roughness,
                    material.metalness
                );
            }
        }
    }
}
