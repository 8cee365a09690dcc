use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use rayon::prelude::*;

use slider_captcha::{
    codec, DirectoryResources, Error, PlacementPlanner, SliderCaptcha, WatermarkConfig,
};

#[derive(Parser)]
#[command(
    name = "slider-captcha",
    about = "Generate slider puzzle captchas from an asset directory",
    version,
    after_help = "ASSETS must contain backgrounds/ and pieces/ (PNG templates with an alpha mask).\n\
                  fonts/ (*.ttf, *.otf) is only needed with --watermark."
)]
struct Cli {
    /// Asset directory
    assets: PathBuf,

    /// Output directory for bk_<n>.png / sli_<n>.png
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Number of challenges to generate
    #[arg(short = 'n', long, default_value_t = 1)]
    count: u32,

    /// Watermark text drawn in the bottom-right corner
    #[arg(short, long)]
    watermark: Option<String>,

    /// Watermark font size in pixels
    #[arg(long, default_value_t = slider_captcha::watermark::DEFAULT_FONT_SIZE)]
    font_size: u32,

    /// Pixel adjustment added to the estimated watermark width
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    offset: i32,

    /// Maximum decoy placement attempts
    #[arg(long, default_value_t = slider_captcha::placement::DEFAULT_MAX_ATTEMPTS)]
    max_attempts: u32,

    /// Print JSON lines (base64 payloads and answer) instead of writing files
    #[arg(long)]
    json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long)]
    quiet: bool,
}

/// Outcome of one generated challenge.
struct Outcome {
    index: u32,
    result: Result<String, Error>,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        "info"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if cli.count == 0 {
        eprintln!("Error: --count must be at least 1");
        process::exit(1);
    }

    let resources = match DirectoryResources::open(&cli.assets) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Fatal: {e}");
            process::exit(1);
        }
    };

    let mut watermark = WatermarkConfig::default()
        .with_font_size(cli.font_size)
        .with_offset(cli.offset);
    if let Some(text) = &cli.watermark {
        watermark = watermark.with_text(text);
    }

    let captcha = SliderCaptcha::new(resources)
        .with_watermark(watermark)
        .with_planner(PlacementPlanner::with_max_attempts(cli.max_attempts));

    if !cli.json {
        if let Err(e) = std::fs::create_dir_all(&cli.output) {
            eprintln!("Fatal: Failed to create output directory: {e}");
            process::exit(1);
        }
    }

    let outcomes: Vec<Outcome> = (0..cli.count)
        .into_par_iter()
        .map(|index| Outcome {
            index,
            result: if cli.json {
                json_line(&captcha)
            } else {
                write_files(&captcha, &cli.output, index)
            },
        })
        .collect();

    let mut fail_count = 0usize;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(line) if cli.json => println!("{line}"),
            Ok(line) => {
                if !cli.quiet {
                    eprintln!("[OK] #{}: {line}", outcome.index);
                }
            }
            Err(e) => {
                fail_count += 1;
                eprintln!("[FAIL] #{}: {e}", outcome.index);
            }
        }
    }

    if outcomes.len() > 1 && !cli.quiet {
        eprintln!();
        eprint!("[Summary] Generated: {}", outcomes.len() - fail_count);
        if fail_count > 0 {
            eprint!(", Failed: {fail_count}");
        }
        eprintln!(" (Total: {})", outcomes.len());
    }

    if fail_count > 0 {
        process::exit(1);
    }
}

fn json_line(captcha: &SliderCaptcha<DirectoryResources>) -> Result<String, Error> {
    let data = captcha.generate()?;
    let line = serde_json::json!({
        "background_image_base64": data.background_image_base64,
        "slider_image_base64": data.slider_image_base64,
        "result_percent": data.result_percent,
    });
    Ok(line.to_string())
}

fn write_files(
    captcha: &SliderCaptcha<DirectoryResources>,
    dir: &Path,
    index: u32,
) -> Result<String, Error> {
    let challenge = captcha.build_challenge(&mut rand::rng())?;
    let bk_path = dir.join(format!("bk_{index}.png"));
    let sli_path = dir.join(format!("sli_{index}.png"));
    std::fs::write(&bk_path, codec::encode_png(&challenge.background)?)?;
    std::fs::write(&sli_path, codec::encode_png(&challenge.piece)?)?;
    Ok(format!(
        "{} + {} (answer {}%, real_x={}, decoy_x={})",
        bk_path.display(),
        sli_path.display(),
        challenge.percent,
        challenge.placement.real_x,
        challenge.placement.decoy_x
    ))
}
