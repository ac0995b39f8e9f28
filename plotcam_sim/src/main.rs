//! plotcam scene driver CLI
//!
//! Play the plotcam scenes and export their per-frame geometry.

use clap::Parser;
use plotcam_sim::{RerunLogger, SceneConfig, SceneId, SceneResult, SceneRunner};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// plotcam scene driver CLI
#[derive(Parser, Debug)]
#[command(name = "plotcam-sim")]
#[command(
    about = "Play plotcam scenes frame by frame and export their geometry",
    long_about = None
)]
struct Args {
    /// Scene to play (hparam_estimation, blue_to_green, all)
    #[arg(short = 'S', long, default_value = "all")]
    scene: String,

    /// Frame rate override for every scene
    #[arg(short, long)]
    fps: Option<u32>,

    /// JSON config file; missing fields keep their defaults
    #[arg(short, long)]
    config: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// JSON output for CI parsing
    #[arg(long)]
    json: bool,

    /// Export frame geometry to a JSON file for an external renderer
    #[arg(long)]
    export: Option<String>,

    /// Stream the scene to a Rerun viewer (needs the `visualization` feature)
    #[arg(long)]
    rerun: bool,
}

fn main() {
    let args = Args::parse();

    // Initialize logging; RUST_LOG wins over --verbose
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    if !args.json {
        info!("plotcam scene driver v{}", env!("CARGO_PKG_VERSION"));
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    }

    // Parse scenes
    let scenes: Vec<SceneId> = if args.scene == "all" {
        SceneId::all()
    } else {
        match args.scene.parse() {
            Ok(scene) => vec![scene],
            Err(e) => {
                eprintln!("Error: {}", e);
                eprintln!("Available scenes: hparam_estimation, blue_to_green, all");
                std::process::exit(1);
            }
        }
    };

    if args.export.is_some() && scenes.len() > 1 {
        eprintln!("Error: --export only supports a single scene, not 'all'");
        std::process::exit(1);
    }

    let config = match &args.config {
        Some(path) => match SceneConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                error!("✗ {}", e);
                std::process::exit(1);
            }
        },
        None => SceneConfig::default(),
    };

    let logger = if args.rerun {
        RerunLogger::new("plotcam")
    } else {
        RerunLogger::disabled()
    };
    let mut runner = SceneRunner::new(config).with_logger(logger);
    if let Some(fps) = args.fps {
        runner = runner.with_fps(fps);
    }

    let mut all_results: Vec<SceneResult> = Vec::new();
    for scene in &scenes {
        let mut result = runner.run(*scene);

        if let (Some(path), Some(export)) = (&args.export, &result.export) {
            match export.write_to_file(path) {
                Ok(()) => info!("Exported {} frames to {}", export.frames.len(), path),
                Err(e) => {
                    result.passed = false;
                    result.failure_reason = Some(e.to_string());
                }
            }
        }

        if !args.json {
            if result.passed {
                info!(
                    "✓ {} PASSED ({} frames, {:.2}s)",
                    scene.name(),
                    result.total_frames,
                    result.final_time_secs
                );
            } else {
                error!(
                    "✗ {} FAILED: {}",
                    scene.name(),
                    result.failure_reason.as_deref().unwrap_or("unknown")
                );
            }
        }

        all_results.push(result);
    }

    // Summary
    let total = all_results.len();
    let failed_count = all_results.iter().filter(|r| !r.passed).count();
    let passed = total - failed_count;

    if args.json {
        // JSON output for CI parsing
        let summary = serde_json::json!({
            "total": total,
            "passed": passed,
            "failed": failed_count,
            "results": all_results.iter().map(|r| {
                serde_json::json!({
                    "scene": r.scene.name(),
                    "passed": r.passed,
                    "frames": r.total_frames,
                    "time_secs": r.final_time_secs,
                    "failure_reason": r.failure_reason,
                })
            }).collect::<Vec<_>>(),
        });
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => error!("Failed to serialize summary: {}", e),
        }
    } else {
        info!("");
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

        if failed_count == 0 {
            info!("✅ All {} scene runs passed!", total);
        } else {
            error!("❌ {}/{} scene runs failed!", failed_count, total);
        }
    }

    // Exit with proper code for CI
    if failed_count > 0 {
        std::process::exit(1);
    }
}
