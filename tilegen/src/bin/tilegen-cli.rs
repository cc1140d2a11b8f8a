use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use serde::Serialize;
use std::path::PathBuf;
use tilegen::preview::{hex_dump, preview_png};
use tilegen::{render_sublevel, ObjectRender, RenderSettings};
use tilegen_game::{AlgorithmVariant, FormatVersion, OverflowPolicy, ScreenIdx, Sublevel};

#[derive(Parser)]
struct Args {
    #[arg(long)]
    sublevel: PathBuf,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    overflow: Option<OverflowPolicy>,

    #[arg(long)]
    variant: Option<AlgorithmVariant>,

    #[arg(long)]
    format: Option<FormatVersion>,

    #[arg(long)]
    png: Option<PathBuf>,

    #[arg(long)]
    dump: Option<PathBuf>,

    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Serialize)]
struct Report<'a> {
    tileset: u16,
    active_screens: usize,
    exceeds_screen_limit: bool,
    screen_status: Vec<u8>,
    screen_links: Vec<(ScreenIdx, ScreenIdx)>,
    objects: &'a [ObjectRender],
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = Args::parse();
    let sublevel = Sublevel::load(&args.sublevel)?;
    let settings = RenderSettings {
        seed: args.seed,
        overflow: args.overflow,
        variant: args.variant,
        format: args.format,
    };
    let output = render_sublevel(&sublevel, &settings)?;

    if let Some(png_path) = &args.png {
        info!("Writing preview image to {}", png_path.display());
        let png = preview_png(&output.grid)?;
        std::fs::write(png_path, png)
            .with_context(|| format!("Unable to write preview to {}", png_path.display()))?;
    }

    if let Some(dump_path) = &args.dump {
        info!("Writing tile dump to {}", dump_path.display());
        std::fs::write(dump_path, hex_dump(&output.grid))
            .with_context(|| format!("Unable to write dump to {}", dump_path.display()))?;
    }

    if let Some(report_path) = &args.report {
        info!("Writing render report to {}", report_path.display());
        let report = Report {
            tileset: sublevel.tileset(),
            active_screens: output.active_screen_count(),
            exceeds_screen_limit: output.exceeds_screen_limit(),
            screen_status: output.screens.raw_status().to_vec(),
            screen_links: output.screens.links().collect(),
            objects: &output.objects,
        };
        let report_str = serde_json::to_string_pretty(&report)?;
        std::fs::write(report_path, report_str)
            .with_context(|| format!("Unable to write report to {}", report_path.display()))?;
    }

    for (idx, err) in output.failures() {
        println!("object {idx}: {err}");
    }
    Ok(())
}
