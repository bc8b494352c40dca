//! Example: print the order in which a scan grid probes a small region.
//!
//! Each cell of the printed map shows the refinement level (0 = coarsest)
//! at which that pixel was first probed, or `.` if it was never probed.
//! The first few probe locations are listed underneath.
//!
//! Run from the workspace root:
//!   cargo run -p probe-grid --example probe_order -- --help
//!   cargo run -p probe-grid --example probe_order -- --width 24 --height 12

use anyhow::{Result, bail};
use clap::Parser;
use probe_grid::{LocStatus, Region, ScanConfig, ScanGrid};

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(about = "Print the probe order of a scan grid over a small region")]
struct Args {
    /// Region width in pixels
    #[arg(long, default_value_t = 16)]
    width: usize,

    /// Region height in pixels
    #[arg(long, default_value_t = 16)]
    height: usize,

    /// Downsampling factor of the searched image
    #[arg(long, default_value_t = 1)]
    scale: u32,

    /// Minimum feature gap in full-resolution pixels
    #[arg(long, default_value_t = 1)]
    min_gap: u32,

    /// How many probe locations to list
    #[arg(long, default_value_t = 20)]
    list: usize,
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if args.width == 0 || args.height == 0 {
        bail!("region must have at least one row and one column");
    }
    if args.width > 80 || args.height > 80 {
        bail!("region {}x{} is too large to print", args.width, args.height);
    }

    let region = Region::from_image_size(args.width, args.height);
    let cfg = ScanConfig {
        scale: args.scale,
        min_gap: args.min_gap,
    };
    let mut grid = ScanGrid::new(region, &cfg)?;

    println!(
        "region {}x{}: max_extent={}, min_extent={}, offset={:?}, levels={}",
        args.width,
        args.height,
        grid.max_extent(),
        grid.min_extent(),
        grid.offset(),
        grid.levels().len()
    );

    let mut map = vec![None::<usize>; args.width * args.height];
    let mut order = Vec::new();

    loop {
        let sample = grid.pop_location();
        if sample.status == LocStatus::End {
            break;
        }
        let level = grid.level_index();

        let idx = sample.loc.y as usize * args.width + sample.loc.x as usize;
        if map[idx].is_none() {
            map[idx] = Some(level);
        }
        order.push((level, sample.loc));
    }

    for row in map.chunks(args.width) {
        let line: String = row
            .iter()
            .map(|cell| match cell {
                Some(l) if *l < 10 => char::from(b'0' + *l as u8),
                Some(_) => '+',
                None => '.',
            })
            .collect();
        println!("{line}");
    }

    println!("{} probes; first {}:", order.len(), args.list.min(order.len()));
    for (i, (l, loc)) in order.iter().take(args.list).enumerate() {
        println!("  #{i:<4} level {l}  ({}, {})", loc.x, loc.y);
    }

    Ok(())
}
