//! マーカーごとの欠損状況を領域別に表示する

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use marker_retarget::marker::{AnimationSequence, Region};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Processed capture (JSON)
    sequence: PathBuf,

    /// Only list markers present in fewer than this share of frames (0-100)
    #[arg(short, long, default_value = "100")]
    below: f32,
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));

    let sequence = AnimationSequence::load(&args.sequence)
        .with_context(|| format!("Failed to load sequence {}", args.sequence.display()))?;
    let total = sequence.len();
    println!(
        "{}: {} frames @ {:.1} Hz",
        args.sequence.display(),
        total,
        sequence.capture_rate()
    );
    if total == 0 {
        return Ok(());
    }

    let coverage = sequence.coverage();
    for region in Region::ALL {
        let rows: Vec<_> = coverage
            .iter()
            .filter(|(id, _)| id.region() == region)
            .map(|&(id, count)| (id, count, count as f32 * 100.0 / total as f32))
            .filter(|&(_, _, pct)| pct < args.below || args.below >= 100.0)
            .collect();
        if rows.is_empty() {
            continue;
        }
        let present: usize = rows.iter().map(|&(_, count, _)| count).sum();
        println!();
        println!(
            "[{}] {:.1}%",
            region.as_str(),
            present as f32 * 100.0 / (rows.len() * total) as f32
        );
        for (id, count, pct) in rows {
            let flag = if count == 0 { "  (never)" } else { "" };
            println!("  {:<6} {:6}/{:<6} {:5.1}%{}", id.as_str(), count, total, pct, flag);
        }
    }
    Ok(())
}
