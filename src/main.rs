// AdMatch CLI binary

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use walkdir::WalkDir;

use admatch::pipeline::{self, PipelineConfig};
use admatch::pools::{MatchPools, NamedImage};
use admatch::scoring::{score_image, score_image_bus};
use admatch::submission::SubmissionRow;

#[derive(Parser)]
#[command(name = "admatch")]
#[command(about = "Match vendor submission rows to media items", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the matching pipeline over a batch manifest
    Run {
        /// Batch manifest (JSON)
        manifest: PathBuf,
        /// Output directory for results and selected images
        #[arg(short, long, default_value = "out")]
        out_dir: PathBuf,
        /// RNG seed for the bus fallback draw (random when omitted)
        #[arg(long)]
        seed: Option<u64>,
        /// Single-unit mode: match only this unit number
        #[arg(long)]
        unit: Option<String>,
        /// Directory of loose image files to add to the manifest's pool
        #[arg(long)]
        images_dir: Option<PathBuf>,
    },

    /// Score a single image with the selection heuristics
    Score {
        /// Image file
        path: PathBuf,
    },
}

/// On-disk batch description. Image entries are paths relative to the
/// manifest's directory; a null page-image entry marks an absent blob.
#[derive(Deserialize)]
struct Manifest {
    rows: Vec<SubmissionRow>,
    #[serde(default)]
    page_texts: Vec<String>,
    #[serde(default)]
    page_images: Vec<Vec<Option<PathBuf>>>,
    #[serde(default)]
    image_files: Vec<ManifestFile>,
    #[serde(default)]
    config: PipelineConfig,
}

#[derive(Deserialize)]
struct ManifestFile {
    name: String,
    path: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { manifest, out_dir, seed, unit, images_dir } => {
            cmd_run(manifest, out_dir, seed, unit, images_dir)
        }
        Commands::Score { path } => cmd_score(path),
    }
}

fn cmd_run(
    manifest_path: PathBuf,
    out_dir: PathBuf,
    seed: Option<u64>,
    unit: Option<String>,
    images_dir: Option<PathBuf>,
) -> Result<()> {
    let text = fs::read_to_string(&manifest_path)
        .with_context(|| format!("Cannot read manifest {}", manifest_path.display()))?;
    let manifest: Manifest =
        serde_json::from_str(&text).context("Manifest is not valid JSON")?;

    let base = manifest_path.parent().unwrap_or(Path::new("."));
    let mut pools = load_pools(&manifest, base)?;
    if let Some(dir) = images_dir {
        pools.image_files.extend(enumerate_images(&dir)?);
    }

    let mut config = manifest.config;
    if unit.is_some() {
        config.matcher.forced_unit = unit;
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut rows = manifest.rows;
    let outcomes = pipeline::run(&mut rows, &pools, &config, &mut rng)?;

    fs::create_dir_all(&out_dir)
        .with_context(|| format!("Cannot create {}", out_dir.display()))?;

    let mut image_paths: Vec<Option<String>> = Vec::with_capacity(outcomes.len());
    for (index, outcome) in outcomes.iter().enumerate() {
        match &outcome.image {
            Some(image) => {
                let name = format!("row_{}.png", index);
                image.save(out_dir.join(&name))?;
                image_paths.push(Some(name));
            }
            None => image_paths.push(None),
        }
    }

    let results = serde_json::json!({
        "engine_version": admatch::constants::ENGINE_VERSION,
        "matched_at": chrono::Utc::now().to_rfc3339(),
        "rows": rows,
        "images": image_paths,
    });
    fs::write(out_dir.join("results.json"), serde_json::to_string_pretty(&results)?)?;

    let matched = rows.iter().filter(|r| r.is_matched()).count();
    let with_image = image_paths.iter().filter(|p| p.is_some()).count();
    println!("Matched {} of {} rows", matched, rows.len());
    println!("Wrote {} images and results.json to {}", with_image, out_dir.display());

    Ok(())
}

fn cmd_score(path: PathBuf) -> Result<()> {
    let image = image::open(&path)
        .with_context(|| format!("Cannot open image {}", path.display()))?
        .to_rgb8();

    println!("{}", path.display());
    println!("  Dimensions:  {}x{}", image.width(), image.height());
    println!("  Score:       {}/4", score_image(&image));
    println!("  Bus score:   {}/2", score_image_bus(&image));

    Ok(())
}

fn load_pools(manifest: &Manifest, base: &Path) -> Result<MatchPools> {
    let mut page_images = Vec::with_capacity(manifest.page_images.len());
    for group in &manifest.page_images {
        let mut blobs = Vec::with_capacity(group.len());
        for entry in group {
            match entry {
                Some(path) => {
                    let bytes = fs::read(base.join(path))
                        .with_context(|| format!("Cannot read image {}", path.display()))?;
                    blobs.push(Some(bytes));
                }
                None => blobs.push(None),
            }
        }
        page_images.push(blobs);
    }

    let mut image_files = Vec::with_capacity(manifest.image_files.len());
    for file in &manifest.image_files {
        let image = image::open(base.join(&file.path))
            .with_context(|| format!("Cannot open image {}", file.path.display()))?
            .to_rgb8();
        image_files.push(NamedImage { name: file.name.clone(), image });
    }

    Ok(MatchPools {
        page_texts: manifest.page_texts.clone(),
        page_images,
        image_files,
    })
}

/// Walk a directory for loose image files, in sorted order so file indexes
/// are stable across runs.
fn enumerate_images(dir: &Path) -> Result<Vec<NamedImage>> {
    let mut found = Vec::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        match image::open(entry.path()) {
            Ok(decoded) => found.push(NamedImage { name, image: decoded.to_rgb8() }),
            Err(err) => log::warn!("Skipping {}: {}", entry.path().display(), err),
        }
    }

    log::info!("Enumerated {} image files from {}", found.len(), dir.display());
    Ok(found)
}
