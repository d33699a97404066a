//! Marker replay: モーキャプのマーカー列をスケルトンに流し込み、
//! フレームごとのルート姿勢と解けたボーンを表示する。

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{bail, Context, Result};
use clap::Parser;
use nalgebra::Vector3;

use marker_retarget::config::Config;
use marker_retarget::marker::AnimationSequence;
use marker_retarget::retarget::{PoseEngine, SolveReport};
use marker_retarget::skeleton::{humanoid, Skeleton};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Processed capture (JSON: {"frames": [...], "original_fps": N})
    sequence: PathBuf,

    /// Path to configuration file (TOML)
    #[arg(short = 'C', long, default_value = "config.toml")]
    config: PathBuf,

    /// Skeleton definition (TOML or JSON); overrides [replay].skeleton
    #[arg(short, long)]
    skeleton: Option<PathBuf>,

    /// Solve a single frame only
    #[arg(short, long)]
    frame: Option<usize>,

    /// Print the local rotation of every bone written per frame
    #[arg(short, long)]
    bones: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

type LogFile = Arc<Mutex<std::io::BufWriter<std::fs::File>>>;

fn open_log_file(dir: &str) -> Result<LogFile> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create log dir {}", dir))?;
    let ts = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let path = format!("{}/replay_{}.log", dir, ts);
    let file = std::fs::File::create(&path)?;
    eprintln!("Log: {}", path);
    Ok(Arc::new(Mutex::new(std::io::BufWriter::new(file))))
}

macro_rules! runlog {
    ($logfile:expr, $($arg:tt)*) => {{
        let msg = format!($($arg)*);
        println!("{}", msg);
        if let Ok(mut f) = $logfile.lock() {
            let _ = writeln!(f, "{}", msg);
        }
    }};
}

fn load_skeleton(args: &Args, config: &Config) -> Result<Skeleton> {
    let path = args
        .skeleton
        .clone()
        .or_else(|| config.replay.skeleton.as_ref().map(PathBuf::from));
    match path {
        Some(path) => Skeleton::load(&path)
            .with_context(|| format!("Failed to load skeleton {}", path.display())),
        None => Ok(humanoid()),
    }
}

/// +Z 正面を基準にしたルートのyaw（度）
fn root_yaw_deg(skeleton: &Skeleton) -> f32 {
    let forward = skeleton.root_rotation() * Vector3::z();
    forward.x.atan2(forward.z).to_degrees()
}

fn summarize(report: &SolveReport) -> String {
    let root = report
        .root
        .map_or_else(|| "-".to_string(), |s| format!("{:?}", s));
    let ground = report
        .ground
        .map_or_else(|| "-".to_string(), |s| format!("{:?}", s));
    let facing = report
        .facing
        .map_or_else(|| "-".to_string(), |s| format!("{:?}", s));
    format!(
        "root={} ground={} facing={} bones={}",
        root,
        ground,
        facing,
        report.written.len()
    )
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    let config = Config::load_or_default(&args.config);
    let logfile = open_log_file(&config.replay.log_dir)?;

    runlog!(logfile, "Marker Retarget ({})", env!("GIT_VERSION"));

    let sequence = AnimationSequence::load(&args.sequence)
        .with_context(|| format!("Failed to load sequence {}", args.sequence.display()))?;
    runlog!(
        logfile,
        "Sequence: {} ({} frames @ {:.1} Hz, {:.2}s)",
        args.sequence.display(),
        sequence.len(),
        sequence.capture_rate(),
        sequence.duration_secs()
    );

    let mut skeleton = load_skeleton(&args, &config)?;
    runlog!(
        logfile,
        "Skeleton: {} bones, {} roles bound",
        skeleton.len(),
        skeleton.bound_roles()
    );

    let range = match args.frame {
        Some(i) if i < sequence.len() => i..i + 1,
        Some(i) => bail!("frame {} out of range (sequence has {} frames)", i, sequence.len()),
        None => 0..sequence.len(),
    };

    let engine = PoseEngine::from_config(&config.retarget);
    let mut touched: HashSet<usize> = HashSet::new();
    let mut rootless = 0usize;

    for i in range {
        let Some(frame) = sequence.frame(i) else {
            continue;
        };
        let report = engine.solve(frame, &mut skeleton);
        if report.root.is_none() {
            rootless += 1;
        }
        touched.extend(report.written.iter().copied());

        let p = skeleton.root_position();
        runlog!(
            logfile,
            "[{:5}] t={:7.3}s markers={:3} pos=({:+.3}, {:+.3}, {:+.3}) yaw={:+6.1} {}",
            i,
            sequence.time_of(i),
            frame.present_count(),
            p.x,
            p.y,
            p.z,
            root_yaw_deg(&skeleton),
            summarize(&report)
        );

        if args.bones {
            let mut seen = HashSet::new();
            for &id in report.written.iter().rev() {
                // 上書きされたボーンは最終値のみ
                if !seen.insert(id) {
                    continue;
                }
                let q = skeleton.local_rotation(id);
                runlog!(
                    logfile,
                    "        {:<28} q=({:+.4}, {:+.4}, {:+.4}, {:+.4})",
                    skeleton.bone_at(id).name,
                    q.i,
                    q.j,
                    q.k,
                    q.w
                );
            }
        }
    }

    runlog!(
        logfile,
        "Done: {} of {} bones driven, {} frames without root",
        touched.len(),
        skeleton.len(),
        rootless
    );
    Ok(())
}
