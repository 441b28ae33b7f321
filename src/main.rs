use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use rayon::prelude::*;
use tracing::{error, info, warn};

use ekta::config::AppConfig;
use ekta::processing::transform;
use ekta::{EditState, Editor, FilterKind, image_io};

/// Apply Ekta filters and adjustments to images and export them as JPEG.
#[derive(Parser, Debug)]
#[command(name = "ekta", version)]
struct Cli {
    /// Images to edit.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Named filter: none, bw-classic, bw-contrast, sepia, vintage.
    #[arg(long)]
    filter: Option<FilterKind>,

    /// JSON preset holding a full edit state; flags below override it.
    #[arg(long)]
    preset: Option<PathBuf>,

    /// Brightness, -100 to 100.
    #[arg(long, allow_negative_numbers = true)]
    brightness: Option<i32>,

    /// Contrast, -100 to 100.
    #[arg(long, allow_negative_numbers = true)]
    contrast: Option<i32>,

    /// Saturation, -100 to 100.
    #[arg(long, allow_negative_numbers = true)]
    saturation: Option<i32>,

    /// Exposure in hundredths of a stop, -100 to 100.
    #[arg(long, allow_negative_numbers = true)]
    exposure: Option<i32>,

    /// Temperature, negative is cooler, -100 to 100.
    #[arg(long, allow_negative_numbers = true)]
    temperature: Option<i32>,

    /// Sharpness, negative softens, -100 to 100.
    #[arg(long, allow_negative_numbers = true)]
    sharpness: Option<i32>,

    /// Film grain, 0 to 100.
    #[arg(long)]
    grain: Option<i32>,

    /// Vignette, 0 to 100.
    #[arg(long)]
    vignette: Option<i32>,

    /// Clockwise quarter turns applied to the edited result.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    rotate: i32,

    /// Directory for exported files (default: next to each input).
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// JPEG quality, 1 to 100.
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: Option<u8>,

    /// Edit at full resolution instead of the configured display size.
    #[arg(long)]
    no_fit: bool,
}

impl Cli {
    fn edit_state(&self) -> anyhow::Result<EditState> {
        let mut state = match &self.preset {
            Some(path) => EditState::load_preset(path)?,
            None => EditState::default(),
        };
        if let Some(filter) = self.filter {
            state.filter = filter;
        }
        let adj = &mut state.adjustments;
        let overrides = [
            (&mut adj.brightness, self.brightness),
            (&mut adj.contrast, self.contrast),
            (&mut adj.saturation, self.saturation),
            (&mut adj.exposure, self.exposure),
            (&mut adj.temperature, self.temperature),
            (&mut adj.sharpness, self.sharpness),
            (&mut adj.grain, self.grain),
            (&mut adj.vignette, self.vignette),
        ];
        for (field, value) in overrides {
            if let Some(v) = value {
                *field = v;
            }
        }
        Ok(state)
    }
}

struct Job<'a> {
    state: &'a EditState,
    fit: Option<(u32, u32)>,
    rotate: i32,
    out_dir: Option<&'a Path>,
    quality: u8,
}

fn process_one(input: &Path, job: &Job<'_>) -> anyhow::Result<PathBuf> {
    let mut original = image_io::open_image(input)?;
    if let Some((max_w, max_h)) = job.fit {
        original = transform::fit_within(original, max_w, max_h);
    }

    let rendered = Editor::with_state(original, job.state.clone()).into_displayed();
    // Rotating the final render keeps the edits applied exactly once.
    let rendered = transform::rotate_quarter_turns(&rendered, job.rotate);

    let output = image_io::output_path(input, job.out_dir);
    image_io::export_jpeg(&rendered, &output, job.quality)
        .with_context(|| format!("export of {} failed", input.display()))?;
    Ok(output)
}

/// Drops paths without a known image extension, logging each one.
fn supported_inputs(inputs: &[PathBuf]) -> Vec<&Path> {
    inputs
        .iter()
        .map(PathBuf::as_path)
        .filter(|path| {
            let ok = image_io::is_supported_image(path);
            if !ok {
                warn!(input = %path.display(), "skipping unsupported file type");
            }
            ok
        })
        .collect()
}

fn run(cli: Cli) -> anyhow::Result<usize> {
    let config = AppConfig::load();
    let state = cli.edit_state()?;
    let out_dir = cli.output_dir.clone().or(config.output_dir.clone());
    let job = Job {
        state: &state,
        fit: (!cli.no_fit).then_some((config.display_max_width, config.display_max_height)),
        rotate: cli.rotate,
        out_dir: out_dir.as_deref(),
        quality: cli.quality.unwrap_or(config.jpeg_quality),
    };
    let inputs = supported_inputs(&cli.inputs);
    if inputs.is_empty() {
        anyhow::bail!("no supported images among {} input(s)", cli.inputs.len());
    }
    info!(
        filter = state.filter.display_name(),
        adjustments = ?state.adjustments,
        "editing {} file(s)",
        inputs.len()
    );

    let failures = inputs
        .par_iter()
        .map(|input| match process_one(input, &job) {
            Ok(output) => {
                info!(input = %input.display(), output = %output.display(), "exported");
                0
            }
            Err(err) => {
                error!(input = %input.display(), "{:#}", err);
                1
            }
        })
        .sum::<usize>();
    Ok(failures)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match run(Cli::parse()) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(failures) => {
            error!("{} file(s) failed", failures);
            ExitCode::FAILURE
        }
        Err(err) => {
            error!("{:#}", err);
            ExitCode::from(2)
        }
    }
}
