use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use car_listing_parser::page::{prepare_lines, strip_images, PageCapture};
use car_listing_parser::parser::inspection::parse_inspection;
use car_listing_parser::parser::lines::classify;
use car_listing_parser::{process_listing, Database, Settings, VehicleRecord, Vocabulary};

#[derive(Parser)]
#[command(name = "car_listing", about = "Structured records from captured car listing pages")]
struct Cli {
    /// Settings file (toml/json/yaml); LISTING__* env vars override it
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse one captured page into a vehicle record
    Extract {
        /// Page markdown
        #[arg(short, long)]
        page: PathBuf,
        /// Image URL list, one per line (default: images linked in the page)
        #[arg(short, long)]
        images: Option<PathBuf>,
        /// Listing URL, used for stock id / make / model
        #[arg(short, long)]
        url: Option<String>,
        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Parse a JSON array of captured pages into a vehicle database
    Batch {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show how each line of a page is classified and routed
    Classify {
        #[arg(short, long)]
        page: PathBuf,
    },
    /// Print the effective settings
    Settings,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).context("loading settings")?;

    let result = match cli.command {
        Commands::Extract {
            page,
            images,
            url,
            output,
        } => {
            let vocab = settings.compile()?;
            let text = fs::read_to_string(&page)
                .with_context(|| format!("reading {}", page.display()))?;
            let images = match images {
                Some(path) => fs::read_to_string(&path)
                    .with_context(|| format!("reading {}", path.display()))?
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(str::to_string)
                    .collect(),
                None => Vec::new(),
            };
            let capture = PageCapture {
                url,
                text,
                images,
                ..Default::default()
            };
            let record = process_listing(&capture.to_input(), &vocab);
            write_json(&record, output.as_deref())?;
            print_record_summary(&record);
            Ok(())
        }
        Commands::Batch { input, output } => {
            let vocab = settings.compile()?;
            let raw = fs::read_to_string(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let captures: Vec<PageCapture> = serde_json::from_str(&raw)
                .with_context(|| format!("parsing {}", input.display()))?;
            if captures.is_empty() {
                warn!(input = %input.display(), "no pages in batch");
            }
            eprintln!("Processing {} pages...", captures.len());
            let vehicles = process_captures(&captures, &vocab);
            let db = Database::assemble(vehicles, chrono::Utc::now());
            write_json(&db, output.as_deref())?;
            eprintln!(
                "Saved {} vehicles, {} images, average completeness {:.2}, makes: {}",
                db.database_info.total_vehicles,
                db.summary.total_images,
                db.summary.average_completeness,
                db.summary.makes.join(", ")
            );
            Ok(())
        }
        Commands::Classify { page } => {
            let vocab = settings.compile()?;
            let text = fs::read_to_string(&page)
                .with_context(|| format!("reading {}", page.display()))?;
            let lines = prepare_lines(&strip_images(&text));

            println!("{:>4} | {:<8} | {}", "#", "Kind", "Line");
            println!("{}", "-".repeat(72));
            for (i, line) in lines.iter().enumerate() {
                let kind = classify(line, &vocab);
                println!("{:>4} | {:<8} | {}", i + 1, kind.as_str(), clip(line, 56));
            }

            let (report, stats) = parse_inspection(&lines, &vocab);
            println!(
                "\n{} lines | {} sections, {} items | {} unclassified",
                lines.len(),
                report.sections.len(),
                report.item_count(),
                stats.unclassified
            );
            println!("{}", serde_json::to_string_pretty(&stats)?);
            Ok(())
        }
        Commands::Settings => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        eprintln!("\nDone in {}", elapsed_label(elapsed));
    }

    result
}

fn process_captures(captures: &[PageCapture], vocab: &Vocabulary) -> Vec<VehicleRecord> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let pb = ProgressBar::new(captures.len() as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")
    {
        pb.set_style(style.progress_chars("#>-"));
    }

    let mut vehicles = Vec::with_capacity(captures.len());
    for chunk in captures.chunks(500) {
        let records: Vec<_> = chunk
            .par_iter()
            .map(|c| process_listing(&c.to_input(), vocab))
            .collect();
        vehicles.extend(records);
        pb.inc(chunk.len() as u64);
    }

    pb.finish_and_clear();
    info!(vehicles = vehicles.len(), "batch processed");
    vehicles
}

fn write_json<T: serde::Serialize>(value: &T, output: Option<&Path>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "wrote output");
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn print_record_summary(record: &VehicleRecord) {
    let q = &record.data_quality;
    eprintln!(
        "{} lines | {} inspection items in {} sections | {} features | {} images | {} unclassified | score {:.2}",
        q.total_lines,
        q.inspection_items,
        record.inspection_report.sections.len(),
        q.feature_count,
        q.image_count,
        q.line_routing.unclassified,
        record.completeness_score
    );
}

fn clip(line: &str, width: usize) -> String {
    match line.char_indices().nth(width) {
        Some((cut, _)) => format!("{}...", &line[..cut]),
        None => line.to_string(),
    }
}

fn elapsed_label(d: std::time::Duration) -> String {
    let total = d.as_secs();
    let (h, m, s) = (total / 3600, total / 60 % 60, total % 60);
    match (h, m) {
        (0, 0) => format!("{:.1}s", d.as_secs_f64()),
        (0, _) => format!("{}m {}s", m, s),
        _ => format!("{}h {}m {}s", h, m, s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn clip_counts_chars() {
        assert_eq!(clip("Hood Condition", 20), "Hood Condition");
        assert_eq!(clip("Hood Condition", 4), "Hood...");
        assert_eq!(clip("Ölstand prüfen", 3), "Öls...");
    }

    #[test]
    fn elapsed_labels() {
        assert_eq!(elapsed_label(Duration::from_millis(2500)), "2.5s");
        assert_eq!(elapsed_label(Duration::from_secs(125)), "2m 5s");
        assert_eq!(elapsed_label(Duration::from_secs(3725)), "1h 2m 5s");
    }
}
