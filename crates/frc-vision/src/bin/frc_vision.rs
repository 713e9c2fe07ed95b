use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use frc_vision::detect::load_frame;
use frc_vision::io::{VisionReport, VisionRunConfig};
use frc_vision::overlay;
use log::{error, warn, LevelFilter};

/// Run ball and tape detection on one image and write a JSON report.
#[derive(Parser, Debug)]
#[command(name = "frc-vision", version, about)]
struct Cli {
    /// JSON run configuration.
    config: PathBuf,

    /// Override the report path from the config.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log level for the stderr logger. `RUST_LOG` takes over with `tracing`.
    #[cfg_attr(feature = "tracing", allow(dead_code))]
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,

    /// Write the run log to a timestamped file in this directory instead of
    /// stderr. Warnings and errors still reach stderr.
    #[cfg_attr(feature = "tracing", allow(dead_code))]
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Emit structured JSON logs through `tracing`.
    #[cfg(feature = "tracing")]
    #[arg(long)]
    json_logs: bool,
}

fn init_logging(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    // The subscriber also bridges `log` records.
    #[cfg(feature = "tracing")]
    {
        frc_vision::core::init_tracing(cli.json_logs);
        Ok(())
    }
    #[cfg(not(feature = "tracing"))]
    {
        match &cli.log_dir {
            Some(dir) => {
                frc_vision::core::init_to_dir(dir, "frc_vision", cli.log_level)?;
            }
            None => frc_vision::core::init_with_level(cli.log_level)?,
        }
        Ok(())
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let cfg = VisionRunConfig::load_json(&cli.config)?;
    let t_total = Instant::now();
    let library = cfg.build_library()?;

    let t = Instant::now();
    let frame = load_frame(&cfg.image_path)?;
    let load_image = elapsed_ms(t);

    let (width, height) = frame.dimensions();
    if f64::from(width) != cfg.camera.width_px || f64::from(height) != cfg.camera.height_px {
        warn!(
            "image is {width}x{height} but camera geometry says {}x{}",
            cfg.camera.width_px, cfg.camera.height_px
        );
    }

    let mut report = VisionReport::new(&cfg, &cli.config, width, height);
    report.timings_ms.load_image = load_image;

    if cfg.targets.balls {
        let t = Instant::now();
        match library.detect_balls(&frame, &cfg.camera) {
            Ok(balls) => report.balls = Some(balls),
            Err(err) => report.set_error(err),
        }
        report.timings_ms.detect_balls = elapsed_ms(t);
    }

    if cfg.targets.tape {
        let t = Instant::now();
        let tape = if cfg.targets.tape_from_edges {
            library.detect_tape_from_edges(&frame, &cfg.camera)
        } else {
            library.detect_tape(&frame, &cfg.camera)
        };
        match tape {
            Ok(tape) => report.tape = Some(tape),
            Err(err) => report.set_error(err),
        }
        report.timings_ms.detect_tape = elapsed_ms(t);
    }

    if let Some(path) = cfg.overlay_path() {
        let img = overlay::render(&frame, report.balls.as_ref(), report.tape.as_ref());
        match img.save(&path) {
            Ok(()) => report.overlay_path = Some(path.to_string_lossy().into_owned()),
            Err(err) => {
                let msg = format!("failed to save overlay to {}: {err}", path.display());
                error!("{msg}");
                report.set_error(msg);
            }
        }
    }

    report.timings_ms.total = elapsed_ms(t_total);

    let output_path = cli.output.unwrap_or_else(|| cfg.output_path());
    report.write_json(&output_path)?;
    println!("wrote report JSON to {}", output_path.display());

    Ok(())
}
