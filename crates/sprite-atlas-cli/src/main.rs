use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use sprite_atlas_core::config::{AtlasConfig, MapFormat, PackerConfig};
use sprite_atlas_core::pack_sprites;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "sprite-atlas",
    about = "Pack sprites into a texture atlas image plus a placement map",
    version
)]
struct Cli {
    // Input/Output
    /// Input image files or directories (subdirectories become animations)
    #[arg(required = true, help_heading = "Input/Output")]
    inputs: Vec<PathBuf>,
    /// Output atlas image (format by extension: png/jpg/bmp)
    #[arg(short = 'o', long, default_value = "atlas.png", help_heading = "Input/Output")]
    out_image: PathBuf,
    /// Output placement map
    #[arg(short = 'm', long, default_value = "atlas.atlas", help_heading = "Input/Output")]
    out_map: PathBuf,
    /// Map format: atlas (structured text) | lua (script table)
    #[arg(long, default_value = "atlas", value_parser = ["atlas", "lua"], help_heading = "Input/Output")]
    format: String,

    // Layout
    /// Maximum atlas width
    #[arg(long, default_value_t = 4096, help_heading = "Layout")]
    max_width: u32,
    /// Maximum atlas height
    #[arg(long, default_value_t = 4096, help_heading = "Layout")]
    max_height: u32,
    /// Padding between sprites (also the edge-bleed thickness)
    #[arg(long, default_value_t = 1, help_heading = "Layout")]
    padding: u32,
    /// Round atlas dimensions up to powers of two
    #[arg(long, default_value_t = false, help_heading = "Layout")]
    pow2: bool,
    /// Force a square atlas
    #[arg(long, default_value_t = false, help_heading = "Layout")]
    square: bool,

    // Map
    /// Normalized sprite origin X in [0,1] (map only)
    #[arg(long, default_value_t = 0.5, help_heading = "Map")]
    origin_x: f32,
    /// Normalized sprite origin Y in [0,1] (map only)
    #[arg(long, default_value_t = 0.5, help_heading = "Map")]
    origin_y: f32,
    /// Descend into subdirectories of directory inputs
    #[arg(long, default_value_t = true, action = ArgAction::Set, help_heading = "Map")]
    recurse: bool,
    /// Emit one animation per subdirectory
    #[arg(long, default_value_t = true, action = ArgAction::Set, help_heading = "Map")]
    animations: bool,
    /// Frame rate written for every animation
    #[arg(long, default_value_t = 8, help_heading = "Map")]
    frame_rate: u32,

    // Logging/UX
    /// Show a progress spinner (disable with --progress false or --quiet)
    #[arg(long, default_value_t = true, action = ArgAction::Set, help_heading = "Logging/UX")]
    progress: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(short, long, default_value_t = false, help_heading = "Logging/UX")]
    quiet: bool,
    /// Print the merged configuration as JSON and exit
    #[arg(long, default_value_t = false, help_heading = "Logging/UX")]
    print_config: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);

    let cfg = AtlasConfig {
        output_image_path: cli.out_image.clone(),
        output_map_path: cli.out_map.clone(),
        packer: PackerConfig {
            max_width: cli.max_width,
            max_height: cli.max_height,
            padding: cli.padding,
            power_of_two: cli.pow2,
            square: cli.square,
        },
        origin_x: cli.origin_x,
        origin_y: cli.origin_y,
        recurse_subdirectories: cli.recurse,
        create_animations: cli.animations,
        frame_rate: cli.frame_rate,
        input_paths: cli.inputs.clone(),
        map_format: cli
            .format
            .parse::<MapFormat>()
            .unwrap_or(MapFormat::Atlas),
    };

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&cfg)?);
        return Ok(());
    }

    let bar = if cli.progress && !cli.quiet {
        let b = ProgressBar::new_spinner();
        b.set_style(
            ProgressStyle::with_template("{spinner:.green} {wide_msg}")
                .expect("valid template"),
        );
        Some(b)
    } else {
        None
    };

    let result = pack_sprites(&cfg, |msg| {
        if let Some(b) = &bar {
            b.set_message(msg.to_string());
            b.tick();
        }
        debug!("{msg}");
    });
    if let Some(b) = &bar {
        b.finish_and_clear();
    }
    result.with_context(|| {
        format!(
            "packing {} input path(s) into {}",
            cfg.input_paths.len(),
            cfg.output_image_path.display()
        )
    })
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}
