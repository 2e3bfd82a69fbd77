//! CLI tool for compiling slide scripts onto PowerPoint templates.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use slidegen_core::{
    build_constraints, compile_deck, generate_deck, parse_script, CompileSummary, Template,
};
use slidegen_llm::{ChatClient, GenerationConfig};
use slidegen_pptx::PptxTemplate;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Environment variable consulted when --api-key is not given.
const API_KEY_ENV: &str = "SLIDEGEN_API_KEY";

/// Build PowerPoint decks from slide scripts and PPTX templates.
#[derive(Parser, Debug)]
#[command(name = "slidegen")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the template's layouts and their capacity constraints
    Layouts {
        /// Template file (.pptx)
        template: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compile a slide script onto a template
    Compile {
        /// Template file (.pptx)
        template: PathBuf,

        /// Slide script (markdown with layout directives)
        script: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Generate a slide script from free-form content and compile it
    Generate {
        /// Template file (.pptx)
        template: PathBuf,

        /// Content file to build the deck from
        content: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Provider: gemini, openai or claude
        #[arg(long, default_value = "gemini")]
        provider: String,

        /// Model short name
        #[arg(long, default_value = "gemini-2.5-flash")]
        model: String,

        /// API key (default: $SLIDEGEN_API_KEY)
        #[arg(long)]
        api_key: Option<String>,

        /// OpenAI-compatible endpoint to use instead of the provider's
        #[arg(long)]
        base_url: Option<String>,

        /// Model id for --base-url (default: --model, sent as given)
        #[arg(long, requires = "base_url")]
        custom_model: Option<String>,

        /// Proxy for both http and https requests
        #[arg(long)]
        proxy: Option<String>,

        /// Also write the generated script to this file
        #[arg(long)]
        save_script: Option<PathBuf>,
    },

    /// Print the text of each slide in a deck
    Outline {
        /// Presentation file (.pptx)
        deck: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    match args.command {
        Command::Layouts { template, json } => list_layouts(&template, json),
        Command::Compile {
            template,
            script,
            output,
        } => {
            let script = fs::read_to_string(&script)
                .with_context(|| format!("Failed to read {}", script.display()))?;
            let mut deck = load_template(&template)?;

            let specs = parse_script(&script);
            log::debug!("Parsed {} slide specs", specs.len());
            let summary = compile_deck(&mut deck, &specs)?;

            write_deck(&deck, &output)?;
            report(&summary, &output, args.verbose);
            Ok(())
        }
        Command::Generate {
            template,
            content,
            output,
            provider,
            model,
            api_key,
            base_url,
            custom_model,
            proxy,
            save_script,
        } => {
            let content = fs::read_to_string(&content)
                .with_context(|| format!("Failed to read {}", content.display()))?;
            if content.trim().is_empty() {
                bail!("Content file is empty");
            }

            let config = GenerationConfig {
                provider,
                model,
                api_key: api_key.or_else(|| std::env::var(API_KEY_ENV).ok()),
                custom_base_url: base_url,
                custom_model,
                http_proxy: proxy.clone(),
                https_proxy: proxy,
                ..Default::default()
            };
            let client = ChatClient::new(config.resolve()?)?;
            let mut deck = load_template(&template)?;

            if args.verbose {
                eprintln!(
                    "Generating with {} ({})",
                    client.config().provider,
                    client.config().model
                );
            }
            let generated = generate_deck(&mut deck, &content, &client)?;

            if let Some(path) = save_script {
                write_atomic(&path, generated.script.as_bytes())?;
                if args.verbose {
                    eprintln!("Script written to: {}", path.display());
                }
            }

            write_deck(&deck, &output)?;
            report(&generated.summary, &output, args.verbose);
            Ok(())
        }
        Command::Outline { deck } => {
            let deck = load_template(&deck)?;
            for (i, texts) in deck.slide_texts()?.iter().enumerate() {
                println!("--- Slide {} ---", i + 1);
                for text in texts {
                    println!("{}", text);
                }
            }
            Ok(())
        }
    }
}

/// Read and parse a .pptx file.
fn load_template(path: &Path) -> Result<PptxTemplate> {
    let bytes = fs::read(path).with_context(|| format!("Failed to open {}", path.display()))?;
    PptxTemplate::load(&bytes).with_context(|| format!("Failed to load {}", path.display()))
}

/// Print the layouts of a template with their constraints.
fn list_layouts(path: &Path, json: bool) -> Result<()> {
    let template = load_template(path)?;
    let layouts = template.layouts();
    let constraints = build_constraints(layouts);

    if json {
        let entries: Vec<serde_json::Value> = layouts
            .iter()
            .enumerate()
            .map(|(index, layout)| {
                serde_json::json!({
                    "index": index,
                    "name": layout.name,
                    "placeholders": layout.placeholders,
                    "constraint": constraints.get(&layout.name),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for (index, layout) in layouts.iter().enumerate() {
        match constraints.get(&layout.name) {
            Some(c) if c.has_body => println!(
                "{:>3}  {}  (title {} words, body {} bullets)",
                index, layout.name, c.title_capacity, c.body_capacity
            ),
            Some(c) => println!(
                "{:>3}  {}  (title {} words)",
                index, layout.name, c.title_capacity
            ),
            None => println!("{:>3}  {}", index, layout.name),
        }
    }
    Ok(())
}

/// Serialize a compiled deck and write it out.
fn write_deck(deck: &PptxTemplate, path: &Path) -> Result<()> {
    let bytes = deck.serialize()?;
    write_atomic(path, &bytes)
}

fn report(summary: &CompileSummary, output: &Path, verbose: bool) {
    if summary.content_dropped > 0 {
        eprintln!(
            "Warning: content of {} slide(s) had no body placeholder and was dropped",
            summary.content_dropped
        );
    }
    if verbose {
        eprintln!(
            "  {} slides added, {} template slides removed",
            summary.slides_added, summary.originals_removed
        );
        eprintln!("Written to: {}", output.display());
    }
}

/// Sibling path the output is staged at before the final rename.
fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("output");
    path.with_file_name(format!(".{}.tmp", name))
}

/// Write a file so that readers see either the old or the new content.
fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }

    let staging = staging_path(path);
    let mut file = File::create(&staging)
        .with_context(|| format!("Failed to create {}", staging.display()))?;
    file.write_all(content)
        .and_then(|_| file.sync_all())
        .with_context(|| format!("Failed to write to {}", staging.display()))?;
    drop(file);

    fs::rename(&staging, path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
