mod config;
mod edit;
#[cfg(feature = "tui")]
mod tui;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::{json, Value};

use edit::MAX_SAMPLE_COUNT;
use riemann_core::{
    compute_integral_estimate, compute_samples, subinterval_width, Formula, SamplingRule, Settings,
};

#[derive(Parser)]
#[command(
    name = "riemann",
    version,
    about = "Approximate definite integrals with Riemann sums and plot the rectangles"
)]
struct Cli {
    /// Path to a TOML config file (overrides $RIEMANN_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    settings: SettingsArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Overrides for the startup settings. Unset flags keep the config values.
#[derive(Args, Default)]
struct SettingsArgs {
    /// Formula (task) id: 2, 10, 22, 26 or 31
    #[arg(short, long, global = true, allow_negative_numbers = true)]
    task: Option<i64>,

    /// Lower bound of integration
    #[arg(long, global = true, allow_negative_numbers = true)]
    start: Option<f64>,

    /// Upper bound of integration
    #[arg(long, global = true, allow_negative_numbers = true)]
    end: Option<f64>,

    /// Number of subintervals
    #[arg(short = 'n', long, global = true)]
    samples: Option<usize>,

    /// Sampling rule
    #[arg(short, long, global = true)]
    rule: Option<CliRule>,
}

impl SettingsArgs {
    fn apply(&self, base: Settings) -> Settings {
        let mut s = base;
        if let Some(task) = self.task {
            s = s.with_formula_id(task);
        }
        if let Some(start) = self.start {
            s = s.with_start(start);
        }
        if let Some(end) = self.end {
            s = s.with_end(end);
        }
        if let Some(samples) = self.samples {
            s = s.with_sample_count(samples);
        }
        if let Some(rule) = self.rule {
            s = s.with_rule(rule.into());
        }
        s
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the estimate, then open the interactive viewer (default)
    View,

    /// Print the integral estimate
    Estimate {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the sample points
    Samples {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compare the estimate under every sampling rule
    Compare {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show how the estimate settles as the sample count doubles
    Converge {
        /// Number of doublings
        #[arg(short, long, default_value = "6")]
        steps: usize,
    },

    /// List the available formulas
    Formulas,

    /// Show current configuration
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum CliRule {
    Left,
    Right,
    Middle,
    Random,
}

impl From<CliRule> for SamplingRule {
    fn from(val: CliRule) -> Self {
        match val {
            CliRule::Left => SamplingRule::Left,
            CliRule::Right => SamplingRule::Right,
            CliRule::Middle => SamplingRule::Middle,
            CliRule::Random => SamplingRule::Random,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into()),
        )
        .init();

    let cli = Cli::parse();
    let cfg = match &cli.config {
        Some(path) => config::load_config_from(path)?,
        None => config::load_config()?,
    };
    let settings = cli.settings.apply(cfg.defaults.settings());
    check_sample_counts(&settings, &cfg.view)?;
    tracing::debug!(?settings, "startup settings");

    match cli.command.unwrap_or(Commands::View) {
        Commands::View => cmd_view(&settings, &cfg.view),
        Commands::Estimate { json } => cmd_estimate(&settings, json),
        Commands::Samples { json } => cmd_samples(&settings, json),
        Commands::Compare { json } => cmd_compare(&settings, json),
        Commands::Converge { steps } => cmd_converge(&settings, steps),
        Commands::Formulas => cmd_formulas(),
        Commands::Config => cmd_config(cli.config.as_deref(), &settings, &cfg.view),
    }
}

/// Startup counts come from flags or the config file and get the same ceiling
/// as viewer edits.
fn check_sample_counts(settings: &Settings, view: &config::ViewConfig) -> Result<()> {
    if settings.sample_count > MAX_SAMPLE_COUNT {
        bail!(
            "samples = {} exceeds the limit of {MAX_SAMPLE_COUNT}",
            settings.sample_count
        );
    }
    if view.curve_resolution > MAX_SAMPLE_COUNT {
        bail!(
            "curve_resolution = {} exceeds the limit of {MAX_SAMPLE_COUNT}",
            view.curve_resolution
        );
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_view(settings: &Settings, view: &config::ViewConfig) -> Result<()> {
    let estimate =
        compute_integral_estimate(settings).context("computing startup estimate")?;
    println!("{estimate}");

    #[cfg(feature = "tui")]
    {
        tui::run(*settings, view)
    }
    #[cfg(not(feature = "tui"))]
    {
        let _ = view;
        tracing::warn!("tui feature not enabled, skipping the viewer");
        Ok(())
    }
}

fn cmd_estimate(settings: &Settings, as_json: bool) -> Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(&estimate_json(settings)?)?);
    } else {
        println!("{}", compute_integral_estimate(settings)?);
    }
    Ok(())
}

fn estimate_json(settings: &Settings) -> Result<Value> {
    let formula = Formula::from_id(settings.formula_id)?;
    let estimate = compute_integral_estimate(settings)?;
    Ok(json!({
        "settings": settings,
        "formula": formula,
        "label": formula.label(),
        "estimate": estimate,
    }))
}

fn cmd_samples(settings: &Settings, as_json: bool) -> Result<()> {
    let samples = compute_samples(settings)?;
    if as_json {
        println!("{}", serde_json::to_string_pretty(&samples)?);
        return Ok(());
    }

    println!("{:>6} {:>16} {:>16}", "i", "x", "y");
    println!("{}", "-".repeat(40));
    for (i, sample) in samples.iter().enumerate() {
        println!("{i:>6} {:>16.8} {:>16.8}", sample.x, sample.y);
    }
    println!("{}", "-".repeat(40));
    println!("width = {}", subinterval_width(settings));
    Ok(())
}

#[derive(Serialize)]
struct RuleEstimate {
    rule: SamplingRule,
    estimate: f64,
}

fn cmd_compare(settings: &Settings, as_json: bool) -> Result<()> {
    let rows = SamplingRule::ALL
        .iter()
        .map(|rule| -> Result<RuleEstimate> {
            let estimate = compute_integral_estimate(&settings.with_rule(*rule))?;
            Ok(RuleEstimate {
                rule: *rule,
                estimate,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!(
        "{} on [{}, {}], {} subintervals",
        Formula::from_id(settings.formula_id)?,
        settings.start,
        settings.end,
        settings.sample_count
    );
    println!("{:<10} Estimate", "Rule");
    println!("{}", "-".repeat(30));
    for row in &rows {
        println!("{:<10} {:.10}", row.rule.to_string(), row.estimate);
    }
    Ok(())
}

/// Sample counts for `converge`: the starting count doubled `steps - 1`
/// times, stopping early at [`MAX_SAMPLE_COUNT`].
fn converge_counts(start: usize, steps: usize) -> Vec<usize> {
    let mut counts = Vec::with_capacity(steps);
    let mut n = start.max(1);
    while counts.len() < steps && n <= MAX_SAMPLE_COUNT {
        counts.push(n);
        n = match n.checked_mul(2) {
            Some(next) => next,
            None => break,
        };
    }
    counts
}

fn cmd_converge(settings: &Settings, steps: usize) -> Result<()> {
    if steps == 0 {
        bail!("--steps must be at least 1");
    }
    let counts = converge_counts(settings.sample_count, steps);
    if counts.len() < steps {
        tracing::warn!(
            "stopping after {} steps, next count exceeds {MAX_SAMPLE_COUNT}",
            counts.len()
        );
    }
    let mut previous: Option<f64> = None;

    println!(
        "{} on [{}, {}], rule={}",
        Formula::from_id(settings.formula_id)?,
        settings.start,
        settings.end,
        settings.rule
    );
    println!("{:>12} {:>18} {:>14} {:>12}", "Samples", "Estimate", "Change", "Time");
    println!("{}", "─".repeat(59));
    for n in counts {
        let t0 = Instant::now();
        let estimate = compute_integral_estimate(&settings.with_sample_count(n))?;
        let ms = t0.elapsed().as_secs_f64() * 1000.0;
        let change = previous
            .map(|p| format!("{:.3e}", estimate - p))
            .unwrap_or_else(|| "-".into());
        println!(
            "{n:>12} {estimate:>18.12} {change:>14} {:>12}",
            format_duration(ms)
        );
        previous = Some(estimate);
    }
    Ok(())
}

fn cmd_formulas() -> Result<()> {
    println!("{:<6} Formula", "Task");
    println!("{}", "-".repeat(24));
    for formula in Formula::ALL {
        println!("{:<6} {}", formula.id(), formula.label());
    }
    Ok(())
}

fn cmd_config(
    explicit: Option<&std::path::Path>,
    settings: &Settings,
    view: &config::ViewConfig,
) -> Result<()> {
    match explicit {
        Some(p) => println!("Config: {} (from --config)", p.display()),
        None => println!("Config: {}", config::show_config_path()),
    }
    println!();
    println!("[defaults]");
    println!("  task = {}", settings.formula_id);
    println!("  start = {}", settings.start);
    println!("  end = {}", settings.end);
    println!("  samples = {}", settings.sample_count);
    println!("  rule = {}", settings.rule);
    println!();
    println!("[view]");
    println!("  curve_resolution = {}", view.curve_resolution);
    println!("  curve_rule = {}", view.curve_rule);
    Ok(())
}

fn format_duration(ms: f64) -> String {
    if ms < 0.001 {
        format!("{:.1} ns", ms * 1_000_000.0)
    } else if ms < 1.0 {
        format!("{:.1} µs", ms * 1000.0)
    } else if ms < 1000.0 {
        format!("{:.1} ms", ms)
    } else {
        format!("{:.2} s", ms / 1000.0)
    }
}
