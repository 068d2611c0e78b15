//! Domain Scan CLI Application
//!
//! Translates a keyword into several languages, combines each translation with
//! the selected TLDs, and reports which of the resulting domains are free.

mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;
use domain_scan_lib::{
    generate_candidates, load_env_config, normalize_tld, parse_duration_string, validate_keyword,
    ConfigManager, DomainCandidate, DomainScanner, FileConfig, ScanConfig, ScanSummary,
    Translation, Translator,
};
use serde::Serialize;
use std::process;
use std::time::Instant;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// CLI arguments for domain-scan
#[derive(Parser, Debug)]
#[command(name = "domain-scan")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Find available domain names for a keyword across languages")]
#[command(
    long_about = "Translate a keyword into fifteen languages, pair every usable translation with the selected TLDs, and check each candidate over RDAP.\n\nWithout OPENAI_API_KEY a fixed set of mock translations is used."
)]
#[command(styles = STYLES)]
pub struct Args {
    /// Keyword to translate and scan
    #[arg(value_name = "KEYWORD", help_heading = "Keyword")]
    pub keyword: Option<String>,

    /// TLDs to check (comma-separated or multiple -t flags)
    #[arg(short = 't', long = "tld", value_name = "TLD", value_delimiter = ',', action = clap::ArgAction::Append, help_heading = "Domain Selection")]
    pub tlds: Option<Vec<String>>,

    /// List the popular TLDs and exit
    #[arg(long = "list-tlds", help_heading = "Domain Selection")]
    pub list_tlds: bool,

    /// Translate and list candidates without checking them
    #[arg(long = "dry-run", help_heading = "Domain Selection")]
    pub dry_run: bool,

    /// Output the final results as JSON
    #[arg(short = 'j', long = "json", help_heading = "Output Format")]
    pub json: bool,

    /// Group results by status once the scan completes
    #[arg(short = 'p', long = "pretty", help_heading = "Output Format")]
    pub pretty: bool,

    /// Pause between candidates (e.g. 300ms, 1s)
    #[arg(long = "delay", value_name = "DURATION", help_heading = "Checking")]
    pub delay: Option<String>,

    /// RDAP request timeout (e.g. 5s)
    #[arg(long = "timeout", value_name = "DURATION", help_heading = "Checking")]
    pub timeout: Option<String>,

    /// Use specific config file instead of automatic discovery
    #[arg(long = "config", value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose", help_heading = "Configuration")]
    pub verbose: bool,
}

/// Shape of `--json` output.
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    keyword: &'a str,
    translations: &'a [Translation],
    candidates: &'a [DomainCandidate],
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ScanSummary>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = validate_args(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    if args.list_tlds {
        ui::print_tlds();
        return;
    }

    init_logging(args.verbose);

    if let Err(e) = run_scan(args).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the default level.
fn init_logging(verbose: bool) {
    let default = if verbose {
        "domain_scan=debug,domain_scan_lib=debug,warn"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .try_init();
}

fn validate_args(args: &Args) -> Result<(), String> {
    // --list-tlds is self-contained, skip other validation
    if args.list_tlds {
        return Ok(());
    }

    if args.keyword.is_none() {
        return Err("You must specify a keyword to scan".to_string());
    }

    if args.pretty && args.json {
        return Err("Cannot use --pretty with --json".to_string());
    }

    if let Some(tlds) = &args.tlds {
        if let Some(bad) = tlds.iter().find(|t| normalize_tld(t).is_none()) {
            return Err(format!("Invalid TLD '{}'", bad));
        }
    }

    for (flag, value) in [("--delay", &args.delay), ("--timeout", &args.timeout)] {
        if let Some(raw) = value {
            if parse_duration_string(raw).is_none() {
                return Err(format!(
                    "Invalid {} '{}'. Use format like '300ms', '5s', '2m'",
                    flag, raw
                ));
            }
        }
    }

    Ok(())
}

/// Main scanning logic
async fn run_scan(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let keyword = validate_keyword(args.keyword.as_deref().unwrap_or_default())?;
    let config = build_config(&args)?;
    debug!("{:?}", domain_scan_lib::info());
    debug!(
        "scan config: tlds={:?} delay={:?} timeout={:?}",
        config.tlds, config.delay, config.rdap_timeout
    );

    if args.dry_run {
        return run_dry_run(&keyword, &config, &args).await;
    }

    let start = Instant::now();
    let mut scanner = DomainScanner::from_config(&config)?;

    let spinner = (!args.json).then(|| ui::Spinner::start(format!("Translating '{}'...", keyword)));
    let submitted = scanner.submit_keyword(&keyword).await.map(|c| c.len());
    if let Some(spinner) = spinner {
        spinner.stop().await;
    }
    let total = submitted?;
    info!("{} candidates for '{}'", total, keyword);

    if !args.json {
        ui::print_translations(scanner.translations());
        ui::print_header(
            &keyword,
            total,
            scanner.tlds(),
            scanner.uses_mock_translations(),
        );
    }

    let spinner = (args.pretty && total > 0)
        .then(|| ui::Spinner::start(format!("Checking {} domains...", total)));

    let mut checked = 0;
    while let Some(update) = scanner.next_update().await {
        checked += 1;
        if let Some(spinner) = &spinner {
            spinner.set_message(format!("Checking domains... {}/{}", checked, total));
        } else if !args.json {
            ui::print_candidate(&update.candidate, Some((update.index + 1, total)));
        }
    }

    if let Some(spinner) = spinner {
        spinner.stop().await;
    }

    let board = scanner.board();
    let summary = board.summary();

    if args.json {
        let report = JsonReport {
            keyword: &keyword,
            translations: scanner.translations(),
            candidates: board.candidates(),
            summary: Some(summary),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if args.pretty {
        ui::print_grouped_results(board.candidates());
    }
    if total > 0 {
        println!();
        ui::print_summary(&summary, start.elapsed());
    }

    Ok(())
}

/// Translate and generate without touching any registry.
async fn run_dry_run(
    keyword: &str,
    config: &ScanConfig,
    args: &Args,
) -> Result<(), Box<dyn std::error::Error>> {
    let translator = Translator::from_config(config)?;
    let translations = translator.translate_keyword(keyword).await?;
    let candidates = generate_candidates(&translations, &config.tlds)?;

    if args.json {
        let report = JsonReport {
            keyword,
            translations: &translations,
            candidates: &candidates,
            summary: None,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    ui::print_translations(&translations);
    for candidate in &candidates {
        println!("{}", candidate.domain);
    }
    Ok(())
}

/// Build the scan configuration.
///
/// Precedence, lowest first: defaults, config files, `DS_*` environment
/// variables, CLI flags.
fn build_config(args: &Args) -> Result<ScanConfig, Box<dyn std::error::Error>> {
    let config_manager = ConfigManager::new(args.verbose);
    let env_config = load_env_config(args.verbose);

    let explicit_path = args.config.as_ref().or(env_config.config.as_ref());
    let file_config = match explicit_path {
        Some(path) => {
            debug!("using explicit config file: {}", path);
            config_manager
                .load_file(path)
                .map_err(|e| format!("Failed to load config file '{}': {}", path, e))?
        }
        None => config_manager
            .discover_and_load()
            .unwrap_or_else(|_| FileConfig::default()),
    };

    let config = file_config.apply_to(ScanConfig::default())?;
    let config = env_config.apply_to(config);

    apply_cli_args_to_config(config, args)
}

fn apply_cli_args_to_config(
    mut config: ScanConfig,
    args: &Args,
) -> Result<ScanConfig, Box<dyn std::error::Error>> {
    if let Some(tlds) = &args.tlds {
        config.tlds = tlds.clone();
    }
    if let Some(raw) = &args.delay {
        config.delay =
            parse_duration_string(raw).ok_or_else(|| format!("Invalid --delay '{}'", raw))?;
    }
    if let Some(raw) = &args.timeout {
        config.rdap_timeout =
            parse_duration_string(raw).ok_or_else(|| format!("Invalid --timeout '{}'", raw))?;
    }
    Ok(config)
}
