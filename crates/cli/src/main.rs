//! CLI tool for building a slide deck from text and a PowerPoint template.

use anyhow::{Context, Result};
use clap::Parser;
use deck_core::{plan_slides, SlidePlan, SlideStructurer};
use deck_gemini::{GeminiConfig, GeminiStructurer, DEFAULT_MODEL};
use deck_pptx::{DeckReader, DeckRenderer};
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::{Path, PathBuf};

/// Turn a block of text into slides rendered with a PowerPoint template.
#[derive(Parser, Debug)]
#[command(name = "deck-build")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Template file (.pptx or .potx)
    #[arg(short, long)]
    template: PathBuf,

    /// Text file to turn into slides ("-" for stdin)
    #[arg(short, long, default_value = "-")]
    input: PathBuf,

    /// Output file
    #[arg(short, long, default_value = "generated_presentation.pptx")]
    output: PathBuf,

    /// Tone or structure guidance for the model
    #[arg(short, long, default_value = "")]
    guidance: String,

    /// Skip the model and split paragraphs only
    #[arg(long)]
    offline: bool,

    /// Gemini API key; without one only paragraph splitting is used
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Gemini model name
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let text = read_input(&args.input)?;
    let plan = make_plan(&args, &text);
    if plan.is_empty() {
        anyhow::bail!("Could not generate slide structure from the text");
    }

    if args.verbose {
        eprintln!("Planned {} slides ({:?})", plan.slides.len(), plan.source);
    }

    let template = File::open(&args.template)
        .with_context(|| format!("Failed to open {}", args.template.display()))?;
    let deck = DeckRenderer::new()
        .render(BufReader::new(template), &plan.slides)
        .with_context(|| format!("Failed to render {}", args.template.display()))?;

    std::fs::write(&args.output, &deck)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    print_summary(&deck)?;
    if args.verbose {
        eprintln!("Written to: {}", args.output.display());
    }

    Ok(())
}

/// Read the source text from a file or stdin.
fn read_input(path: &Path) -> Result<String> {
    let mut text = String::new();
    if path == Path::new("-") {
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
    } else {
        File::open(path)
            .and_then(|mut f| f.read_to_string(&mut text))
            .with_context(|| format!("Failed to read {}", path.display()))?;
    }
    Ok(text)
}

/// Plan slides, using Gemini unless offline or no key is set.
fn make_plan(args: &Args, text: &str) -> SlidePlan {
    let structurer = if args.offline {
        None
    } else {
        match args.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
            Some(key) => Some(GeminiStructurer::new(
                GeminiConfig::new(key).with_model(&args.model),
            )),
            None => {
                log::warn!("GEMINI_API_KEY is not set; splitting paragraphs only");
                None
            }
        }
    };

    plan_slides(
        structurer.as_ref().map(|s| s as &dyn SlideStructurer),
        text,
        &args.guidance,
    )
}

/// Print one line per slide of the generated deck.
fn print_summary(deck: &[u8]) -> Result<()> {
    let summary = DeckReader::new()
        .read(Cursor::new(deck))
        .context("Failed to read back generated deck")?;

    for slide in &summary.slides {
        let title = slide
            .title()
            .and_then(|paragraphs| paragraphs.first())
            .map(String::as_str)
            .unwrap_or("");
        println!("{:>3}. {}", slide.number, title);
    }

    Ok(())
}
