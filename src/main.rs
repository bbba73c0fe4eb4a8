use clap::Parser;
use destcheck::config::Config;
use destcheck::location::{CountryList, Geocoder, NominatimClient, Validator, VerdictCache};
use destcheck::server::{self, AppState, SharedValidator};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

/// destcheck: does this city exist in that country?
///
/// Looks the pair up on OpenStreetMap Nominatim and reports whether the
/// city was found inside the country, and whether it is ambiguous there
/// (matches in more than one state/province).
///
/// Examples:
///   destcheck Toronto --country Canada
///   destcheck Springfield -c "United States"
///   destcheck --serve --listen 0.0.0.0:3000
#[derive(Parser)]
#[command(name = "destcheck", version, about, long_about = None)]
struct Cli {
    /// City name. Example: destcheck Toronto --country Canada
    #[arg(index = 1)]
    city: Option<String>,

    /// Destination country (must be in the country list).
    #[arg(long, short = 'c')]
    country: Option<String>,

    /// Newline-delimited list of accepted country names.
    #[arg(long)]
    countries_file: Option<PathBuf>,

    /// Nominatim-compatible search endpoint.
    #[arg(long)]
    endpoint: Option<String>,

    /// User-Agent sent to the geocoding service.
    #[arg(long)]
    user_agent: Option<String>,

    /// Request timeout in seconds.
    #[arg(long)]
    timeout: Option<u64>,

    /// Preferred result language (accept-language), e.g. "en".
    #[arg(long)]
    language: Option<String>,

    /// Maximum number of cached verdicts.
    #[arg(long)]
    capacity: Option<usize>,

    /// Verbose logging.
    #[arg(long)]
    debug: bool,

    /// Run the HTTP API instead of a single check.
    #[arg(long)]
    serve: bool,

    /// Listen address for --serve.
    #[arg(long)]
    listen: Option<String>,
}

impl Cli {
    fn apply(&self, cfg: &mut Config) {
        if let Some(ref v) = self.endpoint {
            cfg.endpoint = v.clone();
        }
        if let Some(ref v) = self.user_agent {
            cfg.user_agent = v.clone();
        }
        if let Some(v) = self.timeout {
            cfg.timeout_secs = v;
        }
        if let Some(ref v) = self.language {
            cfg.language = Some(v.clone());
        }
        if let Some(v) = self.capacity {
            cfg.cache_capacity = v;
        }
        if let Some(ref v) = self.countries_file {
            cfg.countries_file = Some(v.clone());
        }
        if let Some(ref v) = self.listen {
            cfg.listen_addr = v.clone();
        }
        cfg.debug |= self.debug;
    }
}

fn main() {
    let cli = Cli::parse();

    let mut cfg = Config::from_env();
    cli.apply(&mut cfg);

    let log_level = if cfg.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    let countries = match cfg.countries_file {
        Some(ref path) => CountryList::load_from(path).unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            process::exit(1);
        }),
        None => CountryList::builtin(),
    };

    let cache = VerdictCache::new(cfg.cache_capacity);

    if cli.serve {
        let client: Box<dyn Geocoder> = Box::new(NominatimClient::new(cfg.geocoder()));
        let validator: SharedValidator = Validator::new(client, cache);
        run_server(&cfg, AppState::new(validator, countries));
        return;
    }

    check_one(&cli, &countries, Validator::nominatim(cfg.geocoder(), cache));
}

fn run_server(cfg: &Config, state: AppState) {
    tracing::info!(
        endpoint = %cfg.endpoint,
        capacity = cfg.cache_capacity,
        timeout_secs = cfg.timeout_secs,
        "starting destcheck server"
    );

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Error: Cannot start runtime: {}", e);
        process::exit(1);
    });
    if let Err(e) = runtime.block_on(server::start(&cfg.listen_addr, Arc::new(state))) {
        eprintln!("Error: Server on {} failed: {}", cfg.listen_addr, e);
        process::exit(1);
    }
}

fn check_one(cli: &Cli, countries: &CountryList, mut validator: Validator) {
    let city = cli.city.as_deref().unwrap_or("").trim();
    let country = cli.country.as_deref().unwrap_or("").trim();

    if city.is_empty() || country.is_empty() {
        eprintln!("Error: A city and a country are required.");
        eprintln!();
        eprintln!("Usage:");
        eprintln!("  destcheck Toronto --country Canada");
        eprintln!("  destcheck --serve");
        process::exit(1);
    }
    if !countries.contains(country) {
        eprintln!("Error: Unknown country '{}'.", country);
        process::exit(1);
    }

    let verdict = validator.validate(city, country).unwrap_or_else(|e| {
        eprintln!("Error: Could not verify location '{}, {}': {}", city, country, e);
        process::exit(2);
    });

    if !verdict.valid {
        eprintln!("  \u{1F4CD} City '{}' not found in {}.", city, country);
    } else if verdict.ambiguous {
        eprintln!("  \u{26A0}\u{FE0F}  City '{}' is ambiguous; please specify province/state.", city);
    } else {
        eprintln!("  \u{1F4CD} {}, {}: found", city, country);
    }

    let output = serde_json::json!({
        "city": city,
        "country": country,
        "valid": verdict.valid,
        "ambiguous": verdict.ambiguous,
    });
    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
