//! Display logic for the domain-scan CLI.
//!
//! Colored result lines, grouped `--pretty` output, spinner animation,
//! headers, and summaries. Uses only the `console` crate.

use console::{pad_str, style, Alignment, Term};
use domain_scan_lib::{
    is_valid_label, popular_tlds, CandidateStatus, DomainCandidate, ScanSummary, TrafficSummary,
    Translation,
};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

const DOMAIN_WIDTH: usize = 30;

// ── Spinner ──────────────────────────────────────────────────────────────────

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const FRAME_INTERVAL: Duration = Duration::from_millis(80);

/// Braille-dot spinner on stderr whose message can change while it runs.
///
/// The message lives in a watch channel; sending `None` stops the animation.
pub struct Spinner {
    message: watch::Sender<Option<String>>,
    handle: JoinHandle<()>,
}

impl Spinner {
    pub fn start(message: impl Into<String>) -> Self {
        let (tx, mut rx) = watch::channel(Some(message.into()));

        let handle = tokio::spawn(async move {
            let term = Term::stderr();
            for frame in SPINNER_FRAMES.iter().cycle() {
                let current = rx.borrow_and_update().clone();
                let Some(text) = current else { break };
                let _ = term.clear_line();
                let _ = term.write_str(&format!("{} {}", style(frame).cyan(), text));

                tokio::select! {
                    _ = tokio::time::sleep(FRAME_INTERVAL) => {}
                    changed = rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }
            }
            let _ = term.clear_line();
        });

        Self {
            message: tx,
            handle,
        }
    }

    /// Replace the text shown next to the spinner.
    pub fn set_message(&self, message: impl Into<String>) {
        let _ = self.message.send(Some(message.into()));
    }

    /// Stop the spinner and clear the line.
    pub async fn stop(self) {
        let _ = self.message.send(None);
        let _ = self.handle.await;
    }
}

// ── Header ───────────────────────────────────────────────────────────────────

/// Print a styled header before the sweep starts.
pub fn print_header(keyword: &str, candidate_count: usize, tlds: &[String], mock: bool) {
    println!(
        "{} {} {}",
        style("domain-scan").bold(),
        style(format!("v{}", env!("CARGO_PKG_VERSION"))).dim(),
        style(format!(
            "· '{}' → {} candidate{}",
            keyword,
            candidate_count,
            plural(candidate_count)
        ))
        .dim(),
    );

    let mut meta_parts = vec![format!("TLDs: {}", tlds.join(", "))];
    if mock {
        meta_parts.push("Mock translations".to_string());
    }
    println!("{}", style(meta_parts.join(" | ")).dim());
    println!();
}

// ── Translations ─────────────────────────────────────────────────────────────

/// Print the translation roster, marking entries that cannot be a label.
pub fn print_translations(translations: &[Translation]) {
    println!("{}", style("Translations:").yellow().bold());
    for t in translations {
        let language = pad_str(&t.language, 12, Alignment::Left, None);
        if is_valid_label(&t.translation) {
            println!("  {}  {}", style(language).cyan(), t.translation);
        } else {
            println!(
                "  {}  {}  {}",
                style(language).cyan(),
                style(&t.translation).dim(),
                style("(skipped)").dim(),
            );
        }
    }
    println!();
}

// ── Single result line ───────────────────────────────────────────────────────

/// Format and print a single candidate with colors and alignment.
///
/// If `counter` is Some((current, total)), a progress prefix like `[3/8]` is shown.
pub fn print_candidate(candidate: &DomainCandidate, counter: Option<(usize, usize)>) {
    let padded_domain = pad_str(&candidate.domain, DOMAIN_WIDTH, Alignment::Left, Some(".."));

    let prefix = match counter {
        Some((cur, total)) => format!("{} ", style(format!("[{}/{}]", cur, total)).dim()),
        None => String::new(),
    };

    let details = format_details(candidate);
    let details = if details.is_empty() {
        String::new()
    } else {
        format!("  {}", style(details).dim())
    };

    println!(
        "  {}{}  {}{}",
        prefix,
        style(&padded_domain).white(),
        status_label(candidate.status),
        details,
    );
}

fn status_label(status: CandidateStatus) -> console::StyledObject<&'static str> {
    match status {
        CandidateStatus::Available => style("AVAILABLE").green().bold(),
        CandidateStatus::Registered => style("REGISTERED").red().bold(),
        CandidateStatus::Unknown => style("UNKNOWN").yellow(),
        CandidateStatus::Error => style("ERROR").magenta(),
        CandidateStatus::Checking => style("CHECKING").dim(),
    }
}

// ── Grouped output ───────────────────────────────────────────────────────────

/// Print candidates grouped by status. Empty sections are omitted.
pub fn print_grouped_results(candidates: &[DomainCandidate]) {
    let sections = [
        (CandidateStatus::Available, "Available"),
        (CandidateStatus::Registered, "Registered"),
        (CandidateStatus::Unknown, "Unknown"),
        (CandidateStatus::Error, "Error"),
    ];

    for (status, title) in sections {
        let group: Vec<&DomainCandidate> =
            candidates.iter().filter(|c| c.status == status).collect();
        if group.is_empty() {
            continue;
        }

        let heading = format!("── {} ({}) ", title, group.len());
        let rule = "─".repeat(52usize.saturating_sub(heading.chars().count()));
        match status {
            CandidateStatus::Available => {
                println!("  {} {}", style(heading).green().bold(), style(rule).green().dim())
            }
            CandidateStatus::Registered => {
                println!("  {} {}", style(heading).red().bold(), style(rule).red().dim())
            }
            _ => println!(
                "  {} {}",
                style(heading).yellow().bold(),
                style(rule).yellow().dim()
            ),
        }

        for candidate in group {
            let padded = pad_str(&candidate.domain, DOMAIN_WIDTH, Alignment::Left, Some(".."));
            let details = format_details(candidate);
            if details.is_empty() {
                println!("    {}", style(&padded).white());
            } else {
                println!("    {}  {}", style(&padded).white(), style(details).dim());
            }
        }
        println!();
    }
}

// ── Summary ──────────────────────────────────────────────────────────────────

/// Print the final summary bar with colored counts.
pub fn print_summary(summary: &ScanSummary, duration: Duration) {
    println!(
        "  {}",
        style("────────────────────────────────────────────────────").dim()
    );
    println!(
        "  {} domain{} in {:.1}s  {}  {}  {}  {}  {}  {}",
        style(summary.total).bold(),
        plural(summary.total),
        duration.as_secs_f64(),
        style("|").dim(),
        style(format!("{} available", summary.available)).green(),
        style("|").dim(),
        style(format!("{} registered", summary.registered)).red(),
        style("|").dim(),
        style(format!("{} unknown", summary.unknown + summary.error)).yellow(),
    );
}

/// Print the popular suffix catalogue.
pub fn print_tlds() {
    println!();
    println!("{}", style("Popular TLDs:").yellow().bold());
    println!();
    for tld in popular_tlds() {
        println!(
            "  {} {}  {}",
            style(format!("{:<6}", tld.extension)).green().bold(),
            style(format!("{:<8}", tld.name)).white(),
            style(format!("({:?})", tld.category)).cyan(),
        );
    }
    println!();
    println!("Use: domain-scan <keyword> -t com,io,dev");
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Short description shown after the status.
pub fn format_details(candidate: &DomainCandidate) -> String {
    match candidate.status {
        CandidateStatus::Registered => {
            let mut parts = Vec::new();
            if let Some(date) = &candidate.registration_date {
                parts.push(format!("Registered: {}", short_date(date)));
            }
            if let Some(traffic) = &candidate.traffic_data {
                parts.push(format!("Traffic: {}", format_traffic(traffic)));
            }
            parts.join(", ")
        }
        CandidateStatus::Unknown | CandidateStatus::Error => candidate
            .message
            .as_ref()
            .map(|m| format!("({})", m))
            .unwrap_or_default(),
        _ => String::new(),
    }
}

/// `YYYY-MM: visits` pairs, oldest first.
pub fn format_traffic(traffic: &TrafficSummary) -> String {
    traffic
        .metrics
        .iter()
        .map(|m| format!("{}: {}", m.month, m.visits))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Date part of an RDAP timestamp.
fn short_date(date: &str) -> &str {
    date.get(..10).unwrap_or(date)
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
