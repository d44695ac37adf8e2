use anyhow::{Context, Result};
use bat::PrettyPrinter;
use clap::Parser;
use cliclack::{input, spinner};
use console::style;
use std::env;

use scribe::agent::Agent;
use scribe::artifact::ReportInput;
use scribe::formatting;
use scribe::providers::configs::openai::{OpenAiProviderConfig, DEFAULT_HOST};
use scribe::providers::openai::OpenAiProvider;
use scribe::reflection;
use scribe::tools::ToolRegistry;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Research topic; prompted for interactively when omitted
    prompt: Option<String>,

    /// API key (can also be set via OPENAI_API_KEY environment variable)
    #[arg(short, long)]
    api_key: Option<String>,

    /// Model to use
    #[arg(short, long, default_value = "gpt-4o")]
    model: String,
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let api_key = cli
        .api_key
        .or_else(|| env::var("OPENAI_API_KEY").ok())
        .context("API key must be provided via --api-key or OPENAI_API_KEY environment variable")?;
    let host = env::var("OPENAI_API_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());

    let provider = OpenAiProvider::new(OpenAiProviderConfig::new(api_key.clone(), host.clone()))?;
    let stage_provider = OpenAiProvider::new(OpenAiProviderConfig::new(api_key, host))?;
    let agent = Agent::new(Box::new(provider), ToolRegistry::new()?, &cli.model);

    let prompt = match cli.prompt {
        Some(prompt) => prompt,
        None => input("Research topic:").placeholder("").interact()?,
    };

    // 1) Research with tools
    let spin = spinner();
    spin.start("researching");
    let run = agent.research(&prompt)?;
    spin.stop("");

    println!("{}", style("=== Research Report (preliminary) ===").bold());
    println!("{}\n", run.text);

    // 2) Reflection on the report
    let spin = spinner();
    spin.start("reflecting");
    let reflection = reflection::reflect_and_rewrite(
        &stage_provider,
        &ReportInput::from(run.text),
        &cli.model,
        reflection::DEFAULT_TEMPERATURE,
    )?;
    spin.stop("");

    println!("{}", style("=== Reflection on Report ===").bold());
    println!("{}\n", reflection.reflection);
    println!("{}", style("=== Revised Report ===").bold());
    println!("{}\n", reflection.revised_report);

    // 3) Convert the revised report to HTML
    let spin = spinner();
    spin.start("formatting");
    let html = formatting::convert_to_html(
        &stage_provider,
        &ReportInput::from(reflection.revised_report),
        &cli.model,
        formatting::DEFAULT_TEMPERATURE,
    )?;
    spin.stop("");

    println!("{}", style("=== Generated HTML ===").bold());
    render(&html);
    println!();
    Ok(())
}

fn render(content: &str) {
    PrettyPrinter::new()
        .input_from_bytes(content.as_bytes())
        .language("html")
        .print()
        .unwrap();
}
