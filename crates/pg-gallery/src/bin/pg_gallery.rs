use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use image::GrayImage;
use pg_core::Region;
use pg_grid::{LevelInfo, LocStatus, ScanConfig, ScanGrid};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Largest coverage map side, in pixels.
const MAX_COVERAGE_SIDE: usize = 16384;

#[derive(Parser, Debug)]
#[command(name = "pg_gallery")]
#[command(about = "Run the probe grid over a region and write inspection artifacts")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Every in-region probe location, in order
    #[command(name = "sequence")]
    Sequence(CommonArgs),
    /// Level plan and raw sample budget
    #[command(name = "levels")]
    Levels(CommonArgs),
    /// PNG map shaded by the level that first probed each pixel
    #[command(name = "coverage")]
    Coverage(CommonArgs),
}

#[derive(Args, Debug, Clone)]
struct CommonArgs {
    /// JSON case file with `region`, `scale` and `min_gap`
    #[arg(long, conflicts_with = "image")]
    case: Option<PathBuf>,
    /// PNG whose dimensions define the region
    #[arg(long)]
    image: Option<PathBuf>,
    #[arg(long, allow_hyphen_values = true)]
    x_min: Option<i32>,
    #[arg(long, allow_hyphen_values = true)]
    x_max: Option<i32>,
    #[arg(long, allow_hyphen_values = true)]
    y_min: Option<i32>,
    #[arg(long, allow_hyphen_values = true)]
    y_max: Option<i32>,
    #[arg(long, default_value_t = 1)]
    scale: u32,
    #[arg(long, default_value_t = 1)]
    min_gap: u32,
    #[arg(long, default_value = "out/probe-grid")]
    out: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CaseFile {
    #[serde(default)]
    name: Option<String>,
    /// `[x_min, x_max, y_min, y_max]`, inclusive.
    region: [i32; 4],
    #[serde(default = "default_one")]
    scale: u32,
    #[serde(default = "default_one")]
    min_gap: u32,
}

fn default_one() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize)]
struct RegionDto {
    x_min: i32,
    x_max: i32,
    y_min: i32,
    y_max: i32,
}

#[derive(Debug, Clone, Serialize)]
struct MetaGrid {
    case: Option<String>,
    region: RegionDto,
    scale: u32,
    min_gap: u32,
    min_extent: i64,
    max_extent: i64,
    offset: [i64; 2],
    num_levels: usize,
    sample_budget: u64,
}

#[derive(Debug, Clone, Serialize)]
struct LocationDto {
    index: usize,
    level: usize,
    extent: i64,
    x: i32,
    y: i32,
}

#[derive(Debug, Clone, Serialize)]
struct MetaSequence {
    grid: MetaGrid,
    good_count: usize,
    final_total: u64,
}

#[derive(Debug, Clone, Serialize)]
struct LevelDto {
    level: usize,
    extent: i64,
    jump_size: i64,
    pixel_total: i64,
    start_pos: i64,
    crosses_per_axis: i64,
    samples: u64,
}

#[derive(Debug, Clone, Serialize)]
struct LevelsDto {
    grid: MetaGrid,
    levels: Vec<LevelDto>,
}

#[derive(Debug, Clone, Serialize)]
struct MetaCoverage {
    grid: MetaGrid,
    width: usize,
    height: usize,
    probed_pixels: usize,
    shading: &'static str,
}

struct Setup {
    case: Option<String>,
    region: Region,
    cfg: ScanConfig,
    out: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::Sequence(args) => run_sequence(args),
        Command::Levels(args) => run_levels(args),
        Command::Coverage(args) => run_coverage(args),
    }
}

fn run_sequence(args: CommonArgs) -> Result<()> {
    let setup = prepare(&args, "sequence")?;
    let mut grid = build_grid(&setup)?;
    let meta = grid_meta(&setup, &grid);

    let mut locations = Vec::new();
    loop {
        let sample = grid.pop_location();
        if sample.status == LocStatus::End {
            break;
        }
        locations.push(LocationDto {
            index: locations.len(),
            level: grid.level_index(),
            extent: grid.extent(),
            x: sample.loc.x,
            y: sample.loc.y,
        });
    }

    tracing::info!(count = locations.len(), "collected probe locations");

    write_json(setup.out.join("locations.json"), &locations)?;
    write_json(
        setup.out.join("meta.json"),
        &MetaSequence {
            grid: meta,
            good_count: locations.len(),
            final_total: grid.total(),
        },
    )?;

    Ok(())
}

fn run_levels(args: CommonArgs) -> Result<()> {
    let setup = prepare(&args, "levels")?;
    let grid = build_grid(&setup)?;

    let levels = grid
        .levels()
        .iter()
        .enumerate()
        .map(|(i, l)| level_dto(i, l))
        .collect::<Vec<_>>();

    write_json(
        setup.out.join("levels.json"),
        &LevelsDto {
            grid: grid_meta(&setup, &grid),
            levels,
        },
    )
}

fn run_coverage(args: CommonArgs) -> Result<()> {
    let setup = prepare(&args, "coverage")?;
    let mut grid = build_grid(&setup)?;
    let meta = grid_meta(&setup, &grid);

    let region = setup.region;
    let (width, height) = (region.width(), region.height());
    if width == 0 || height == 0 {
        bail!("region {:?} contains no pixels.", region);
    }
    if width > MAX_COVERAGE_SIDE || height > MAX_COVERAGE_SIDE {
        bail!(
            "region {}x{} exceeds the coverage map limit of {} pixels per side.",
            width,
            height,
            MAX_COVERAGE_SIDE
        );
    }

    let num_levels = grid.levels().len();
    let mut first_level = vec![None::<usize>; width * height];
    loop {
        let sample = grid.pop_location();
        if sample.status == LocStatus::End {
            break;
        }
        let level = grid.level_index();
        let ix = (i64::from(sample.loc.x) - i64::from(region.x_min)) as usize;
        let iy = (i64::from(sample.loc.y) - i64::from(region.y_min)) as usize;
        let cell = &mut first_level[iy * width + ix];
        if cell.is_none() {
            *cell = Some(level);
        }
    }

    let probed = first_level.iter().filter(|l| l.is_some()).count();
    let pixels = first_level
        .iter()
        .map(|l| l.map_or(0, |l| level_shade(l, num_levels)))
        .collect::<Vec<u8>>();

    save_luma_raw(setup.out.join("coverage.png"), width, height, pixels)?;
    write_json(
        setup.out.join("meta.json"),
        &MetaCoverage {
            grid: meta,
            width,
            height,
            probed_pixels: probed,
            shading: "255 for the coarsest level, darker for finer levels, 0 if never probed",
        },
    )?;

    tracing::info!(probed, width, height, "wrote coverage map");
    Ok(())
}

fn prepare(args: &CommonArgs, run_name: &str) -> Result<Setup> {
    let (case, region, cfg) = if let Some(path) = &args.case {
        ensure_file_exists(path, "case")?;
        let case: CaseFile = read_json(path)
            .with_context(|| format!("reading case json at {}", path.display()))?;
        let [x_min, x_max, y_min, y_max] = case.region;
        (
            case.name,
            Region::new(x_min, x_max, y_min, y_max),
            ScanConfig {
                scale: case.scale,
                min_gap: case.min_gap,
            },
        )
    } else {
        let cfg = ScanConfig {
            scale: args.scale,
            min_gap: args.min_gap,
        };
        (None, region_from_args(args)?, cfg)
    };

    let out = args.out.join(run_name);
    fs::create_dir_all(&out)
        .with_context(|| format!("creating output directory {}", out.display()))?;

    tracing::info!(
        ?region,
        scale = cfg.scale,
        min_gap = cfg.min_gap,
        out = %out.display(),
        "prepared run"
    );

    Ok(Setup {
        case,
        region,
        cfg,
        out,
    })
}

fn region_from_args(args: &CommonArgs) -> Result<Region> {
    if let Some(path) = &args.image {
        ensure_file_exists(path, "image")?;
        let (w, h) = image::image_dimensions(path)
            .with_context(|| format!("reading dimensions of {}", path.display()))?;
        return Ok(Region::from_image_size(w as usize, h as usize));
    }

    match (args.x_min, args.x_max, args.y_min, args.y_max) {
        (Some(x_min), Some(x_max), Some(y_min), Some(y_max)) => {
            Ok(Region::new(x_min, x_max, y_min, y_max))
        }
        _ => bail!("region requires --case, --image, or all of --x-min/--x-max/--y-min/--y-max."),
    }
}

fn build_grid(setup: &Setup) -> Result<ScanGrid> {
    ScanGrid::new(setup.region, &setup.cfg)
        .with_context(|| format!("building scan grid for {:?}", setup.region))
}

fn grid_meta(setup: &Setup, grid: &ScanGrid) -> MetaGrid {
    let r = setup.region;
    let (ox, oy) = grid.offset();
    MetaGrid {
        case: setup.case.clone(),
        region: RegionDto {
            x_min: r.x_min,
            x_max: r.x_max,
            y_min: r.y_min,
            y_max: r.y_max,
        },
        scale: setup.cfg.scale,
        min_gap: setup.cfg.min_gap,
        min_extent: grid.min_extent(),
        max_extent: grid.max_extent(),
        offset: [ox, oy],
        num_levels: grid.levels().len(),
        sample_budget: grid.sample_budget(),
    }
}

fn level_dto(level: usize, info: &LevelInfo) -> LevelDto {
    LevelDto {
        level,
        extent: info.extent,
        jump_size: info.jump_size,
        pixel_total: info.pixel_total,
        start_pos: info.start_pos,
        crosses_per_axis: info.crosses_per_axis,
        samples: info.num_samples(),
    }
}

fn level_shade(level: usize, num_levels: usize) -> u8 {
    if num_levels <= 1 {
        return 255;
    }
    let step = 191.0 / (num_levels - 1) as f32;
    (255.0 - step * level as f32).round().clamp(64.0, 255.0) as u8
}

fn save_luma_raw(path: PathBuf, width: usize, height: usize, data: Vec<u8>) -> Result<()> {
    let gray = GrayImage::from_raw(width as u32, height as u32, data)
        .context("constructing GrayImage from raw bytes")?;
    gray.save(&path)
        .with_context(|| format!("saving image {}", path.display()))
}

fn write_json(path: PathBuf, value: &impl Serialize) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).context("serializing json")?;
    fs::write(&path, bytes).with_context(|| format!("writing json {}", path.display()))?;
    tracing::debug!(path = %path.display(), "wrote json");
    Ok(())
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&data).with_context(|| format!("parsing json {}", path.display()))
}

fn ensure_file_exists(path: &Path, what: &str) -> Result<()> {
    if !path.exists() {
        bail!("{} file does not exist: {}", what, path.display());
    }
    if !path.is_file() {
        bail!("{} path is not a file: {}", what, path.display());
    }
    Ok(())
}
