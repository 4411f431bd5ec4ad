use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use slideforge_core::synth::TemplateMetadata;
use slideforge_core::{ContentPlan, PresentationAssembler, SynthesisSettings, TemplateAnalyzer};
use std::fs;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

mod logging;

use logging::{init_logging, LogConfig, LogFormat};

#[derive(Parser)]
#[command(name = "slideforge")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")"))]
#[command(about = "Generate PowerPoint decks from a template and a content plan", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[arg(long, value_enum, default_value = "compact", global = true)]
    log_format: LogFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Describe a template's layouts, images and theme sample.
    Analyze {
        #[arg(short, long)]
        template: PathBuf,

        /// Print the full metadata as JSON.
        #[arg(long)]
        json: bool,

        #[arg(short, long)]
        settings: Option<PathBuf>,
    },
    /// Build a presentation from a template and a JSON content plan.
    Generate {
        #[arg(short, long)]
        template: PathBuf,

        #[arg(short, long)]
        plan: PathBuf,

        #[arg(short, long)]
        output: PathBuf,

        #[arg(short, long)]
        settings: Option<PathBuf>,

        /// Write the synthesis report as JSON.
        #[arg(short, long)]
        report: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    let log_config = LogConfig::from_verbosity(cli.verbose)
        .with_format(cli.log_format)
        .with_ansi(io::stderr().is_terminal());
    init_logging(&log_config);

    let result = match cli.command {
        Commands::Analyze {
            template,
            json,
            settings,
        } => run_analyze(&template, json, settings.as_deref()),
        Commands::Generate {
            template,
            plan,
            output,
            settings,
            report,
        } => run_generate(&template, &plan, &output, settings.as_deref(), report.as_deref()),
    };

    if let Err(error) = result {
        eprintln!("error: {:#}", error);
        std::process::exit(1);
    }
}

fn load_settings(path: Option<&Path>) -> Result<SynthesisSettings> {
    let Some(path) = path else {
        return Ok(SynthesisSettings::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading settings {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing settings {}", path.display()))
}

fn read_template(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("reading template {}", path.display()))
}

fn run_analyze(template: &Path, json: bool, settings: Option<&Path>) -> Result<()> {
    let settings = load_settings(settings)?;
    let bytes = read_template(template)?;
    let metadata = TemplateAnalyzer::analyze(&bytes, &settings)
        .with_context(|| format!("analyzing {}", template.display()))?;

    if json {
        println!("{}", metadata.to_json());
    } else {
        print_summary(&metadata);
    }
    Ok(())
}

fn print_summary(metadata: &TemplateMetadata) {
    println!("Slides:  {}", metadata.slide_count);
    if let Some((width, height)) = metadata.slide_size {
        println!("Size:    {} x {} EMU", width, height);
    }
    println!("Layouts: {}", metadata.layout_count);
    for layout in &metadata.layouts {
        let roles: Vec<String> = layout.roles().iter().map(|r| format!("{:?}", r)).collect();
        println!("  [{}] {:<28} {}", layout.index, layout.name, roles.join(", "));
    }
    let images = &metadata.images.categorized;
    println!(
        "Images:  {} ({} logo, {} background, {} content)",
        metadata.images.total(),
        images.logos.len(),
        images.backgrounds.len(),
        images.content.len()
    );
    if !metadata.theme.colors.is_empty() {
        println!("Colors:  {}", metadata.theme.colors.join(" "));
    }
    if !metadata.theme.fonts.is_empty() {
        println!("Fonts:   {}", metadata.theme.fonts.join(", "));
    }
    for diagnostic in &metadata.diagnostics {
        println!("warning: {}", diagnostic.message);
    }
}

fn run_generate(
    template: &Path,
    plan_path: &Path,
    output: &Path,
    settings: Option<&Path>,
    report_path: Option<&Path>,
) -> Result<()> {
    let settings = load_settings(settings)?;
    let plan_text = fs::read_to_string(plan_path)
        .with_context(|| format!("reading plan {}", plan_path.display()))?;
    let plan = ContentPlan::from_json(&plan_text)
        .with_context(|| format!("parsing plan {}", plan_path.display()))?;
    plan.validate().context("validating plan")?;

    let bytes = read_template(template)?;
    let metadata = TemplateAnalyzer::analyze(&bytes, &settings)
        .with_context(|| format!("analyzing {}", template.display()))?;
    if metadata.slide_count == 0 {
        bail!("template {} has no slides to clone from", template.display());
    }

    let result = PresentationAssembler::new(&settings)
        .synthesize(&bytes, &plan, &metadata)
        .context("synthesizing presentation")?;

    fs::write(output, &result.bytes)
        .with_context(|| format!("writing {}", output.display()))?;
    if let Some(path) = report_path {
        fs::write(path, result.report.to_json())
            .with_context(|| format!("writing report {}", path.display()))?;
    }

    println!(
        "Wrote {} slides to {}",
        result.report.slides_generated,
        output.display()
    );
    if !result.report.is_clean() {
        println!("{} warnings", result.report.diagnostics.len());
    }
    Ok(())
}
