use anyhow::{Context, Result, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;

use placescout::api::{FoursquareClient, NominatimClient};
use placescout::config::{FileConfig, load_token};
use placescout::output::write_json;
use placescout::pipeline::{Throttle, UnresolvedPolicy, generate_nearby_places, geocode_cities};

/// Collect nearby points of interest for a list of cities
///
/// Examples:
///   # Restaurants and parks within 500m of two city centers
///   placescout -c Paris -c Lyon -k 13065 -k 16032
///
///   # Wider radius, skip cities the geocoder cannot find
///   placescout -c "Buenos Aires" -c Atlantis -k 13065 -r 2000 --on-unresolved skip
///
///   # Use a config file
///   placescout --config survey.toml
#[derive(Parser, Debug)]
#[command(name = "placescout")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches placescout.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// City to search around (repeatable)
    #[arg(short = 'c', long = "city")]
    cities: Vec<String>,

    /// Places category to search for (repeatable)
    #[arg(short = 'k', long = "category")]
    categories: Vec<String>,

    /// Search radius in meters [default: 500]
    #[arg(short = 'r', long)]
    radius: Option<u32>,

    /// Output JSON file for places [default: places.json]
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Also write the geocoded cities to this JSON file
    #[arg(long)]
    coordinates_output: Option<PathBuf>,

    /// What to do when a city cannot be geocoded [default: abort]
    #[arg(long, value_enum)]
    on_unresolved: Option<UnresolvedPolicy>,

    /// Upper bound in seconds of the random pause between cities [default: 3]
    #[arg(long)]
    max_delay: Option<u64>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    let total_start = Instant::now();

    let file_config: FileConfig = if let Some(ref config_path) = args.config {
        if config_path.exists() {
            let contents = std::fs::read_to_string(config_path)
                .context(format!("Failed to read config file: {:?}", config_path))?;
            toml::from_str(&contents).context("Failed to parse config file")?
        } else {
            bail!("Config file not found: {:?}", config_path);
        }
    } else {
        FileConfig::load().unwrap_or_default()
    };

    let verbose = args.verbose || file_config.verbose;
    init_logging(verbose);

    let cities = if args.cities.is_empty() {
        file_config.cities.clone()
    } else {
        args.cities.clone()
    };
    let categories = if args.categories.is_empty() {
        file_config.categories.clone()
    } else {
        args.categories.clone()
    };
    let radius = args.radius.unwrap_or(file_config.radius);
    let max_delay = args.max_delay.unwrap_or(file_config.max_delay_secs);
    let on_unresolved = args.on_unresolved.unwrap_or(file_config.on_unresolved);
    let output = args
        .output
        .clone()
        .or_else(|| file_config.output.clone())
        .unwrap_or_else(|| PathBuf::from("places.json"));
    let coordinates_output = args
        .coordinates_output
        .clone()
        .or_else(|| file_config.coordinates_output.clone());
    let places_config = file_config.places.clone().unwrap_or_default();
    let geocoder_config = file_config.geocoder.clone().unwrap_or_default();

    if cities.is_empty() {
        bail!("No cities given: pass --city/-c or set `cities` in the config file");
    }
    if categories.is_empty() {
        bail!("No categories given: pass --category/-k or set `categories` in the config file");
    }

    let token = load_token(&places_config.token_env)?;

    println!("placescout - Nearby Places Collector");
    println!("====================================");
    println!();

    log::debug!("Cities: {:?}", cities);
    log::debug!("Categories: {:?}", categories);
    log::debug!(
        "Radius: {}m, max delay: {}s, unresolved cities: {:?}",
        radius,
        max_delay,
        on_unresolved
    );

    let geocoder =
        NominatimClient::new(&geocoder_config).context("Failed to create geocoding client")?;
    let spinner = create_spinner(&format!("Geocoding {} cities...", cities.len()));
    let start = Instant::now();
    let geocoded =
        geocode_cities(&geocoder, &cities, on_unresolved).context("Failed to geocode cities")?;
    spinner.finish_with_message(format!(
        "Geocoded {}/{} cities [{:.1}s]",
        geocoded.coordinates.len(),
        cities.len(),
        start.elapsed().as_secs_f32()
    ));
    for city in &geocoded.unresolved {
        println!("  Skipped unresolved city: {}", city);
    }

    if let Some(ref path) = coordinates_output {
        write_json(path, &geocoded.coordinates).context("Failed to write coordinates file")?;
    }

    let client = FoursquareClient::new(token, &places_config)
        .context("Failed to create places client")?;
    let throttle = Throttle::new(max_delay);
    let progress = create_progress_bar(geocoded.coordinates.len() as u64);
    let start = Instant::now();
    let fan_out = generate_nearby_places(
        &client,
        &throttle,
        &geocoded.coordinates,
        &categories,
        radius,
        &progress,
    )
    .context("Failed to fetch nearby places")?;
    progress.finish_with_message(format!(
        "Collected {} places from {} searches [{:.1}s]",
        fan_out.places.len(),
        fan_out.report.searches.len(),
        start.elapsed().as_secs_f32()
    ));

    let malformed: Vec<_> = fan_out.report.malformed().collect();
    if !malformed.is_empty() {
        println!("  {} responses dropped as malformed:", malformed.len());
        for search in malformed {
            println!("    {} / {}", search.city, search.category);
        }
    }

    write_json(&output, &fan_out.places).context("Failed to write places file")?;

    println!();
    println!(
        "Done! Total time: {:.1}s",
        total_start.elapsed().as_secs_f32()
    );
    println!();
    println!("Output: {}", output.display());
    if let Some(path) = coordinates_output {
        println!("Coordinates: {}", path.display());
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
        pb.set_style(style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]));
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

fn create_progress_bar(cities: u64) -> ProgressBar {
    let pb = ProgressBar::new(cities);
    if let Ok(style) = ProgressStyle::with_template("{bar:30.green} {pos}/{len} cities {msg}") {
        pb.set_style(style);
    }
    pb
}
