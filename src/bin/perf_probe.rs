use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use rayon::prelude::*;

use ekta::config::AppConfig;
use ekta::processing::{self, transform};
use ekta::{Adjustments, EditState, FilterKind, image_io};

fn list_images(dir: &Path, limit: usize) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("read_dir failed for {}", dir.display()))?
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file() && image_io::is_supported_image(p))
        .collect();
    files.sort();
    files.truncate(limit);
    Ok(files)
}

fn median_ms(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) * 0.5
    } else {
        sorted[mid]
    }
}

// Every stage active, so each render does its full set of passes.
fn build_state() -> EditState {
    EditState {
        filter: FilterKind::Vintage,
        adjustments: Adjustments {
            brightness: 12,
            contrast: 20,
            saturation: -15,
            exposure: 10,
            temperature: 25,
            sharpness: 30,
            grain: 20,
            vignette: 40,
        },
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args();
    let _bin = args.next();
    let dir = args
        .next()
        .map(PathBuf::from)
        .context("usage: perf_probe <image-dir> [count] [iterations]")?;
    let count = args
        .next()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(20);
    let iterations = args
        .next()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(5)
        .max(1);

    let files = list_images(&dir, count)?;
    if files.is_empty() {
        anyhow::bail!("No supported images found in {}", dir.display());
    }
    eprintln!("Using {} images from {}", files.len(), dir.display());

    let config = AppConfig::load();
    let state = build_state();

    // Renders are single-threaded; files are spread across the rayon pool.
    let per_file: Vec<(PathBuf, f64)> = files
        .par_iter()
        .map(|path| -> Result<(PathBuf, f64)> {
            let img = image_io::open_image(path)
                .with_context(|| format!("open failed for {}", path.display()))?;
            let preview =
                transform::fit_within(img, config.display_max_width, config.display_max_height);
            let samples: Vec<f64> = (0..iterations)
                .map(|_| {
                    let t0 = Instant::now();
                    let _out = processing::render(&preview, &state);
                    t0.elapsed().as_secs_f64() * 1000.0
                })
                .collect();
            Ok((path.clone(), median_ms(&samples)))
        })
        .collect::<Result<_>>()?;

    for (path, ms) in &per_file {
        println!("METRIC render_ms_median[{}]={:.2}", path.display(), ms);
    }
    let medians: Vec<f64> = per_file.iter().map(|(_, ms)| *ms).collect();
    println!("METRIC file_count={}", files.len());
    println!("METRIC iterations={}", iterations);
    println!("METRIC render_ms_median={:.2}", median_ms(&medians));

    Ok(())
}
