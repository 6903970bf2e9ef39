use std::{
    fs,
    io::{self, Read, Write},
    path::PathBuf,
    sync::Arc,
    time::Duration,
};

use anyhow::{Context, Result, bail};
use clap::Parser;
use gistr::{
    config, logging,
    summarization::{
        LanguageHint, SummarizationOrchestrator, SummaryLength, SummaryOptions, SummaryRequest,
        SummaryResult, SummarySource,
    },
    transport::{GeminiTransport, ModelTransport},
};
use tokio::time::Instant;

#[derive(Parser)]
#[command(
    name = "gistr-cli",
    about = "Summarize an article read from a file or stdin"
)]
struct Cli {
    /// Article to summarize; reads stdin when omitted.
    #[arg(long)]
    input: Option<PathBuf>,
    /// Target summary length: short, medium or long.
    #[arg(long, default_value = "medium")]
    length: SummaryLength,
    /// Skip key point extraction.
    #[arg(long)]
    no_key_points: bool,
    /// Output language code such as `fr`; detected when omitted.
    #[arg(long)]
    language: Option<String>,
    /// Give up on the remote cascade after this many seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Never contact the remote API.
    #[arg(long)]
    extractive_only: bool,
    /// Print the result as JSON.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing("warn", false);
    let config = config::init_config().context("Failed to load configuration")?;

    let text = read_article(cli.input.as_ref())?;
    if text.trim().is_empty() {
        bail!("article text is empty");
    }

    let transport = if cli.extractive_only {
        None
    } else {
        GeminiTransport::from_config(config)
            .context("Failed to build Gemini transport")?
            .map(|transport| Arc::new(transport) as Arc<dyn ModelTransport>)
    };
    let orchestrator = SummarizationOrchestrator::new(config.summarizer_settings(), transport)
        .context("Invalid summarizer settings")?;

    let options = SummaryOptions {
        length: cli.length,
        extract_key_points: !cli.no_key_points,
        language_hint: cli
            .language
            .as_deref()
            .map(LanguageHint::from_code)
            .unwrap_or_default(),
    };
    let mut request = SummaryRequest::new(text).with_options(options);
    if let Some(secs) = cli.timeout_secs {
        request = request.with_deadline(Instant::now() + Duration::from_secs(secs));
    }

    let result = orchestrator.summarize(&request).await?;
    print_result(&result, cli.json)
}

fn read_article(input: Option<&PathBuf>) -> Result<String> {
    match input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

fn print_result(result: &SummaryResult, json: bool) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut stdout, result)?;
        writeln!(stdout)?;
        return Ok(());
    }

    let source = match &result.source {
        SummarySource::Remote { model, api_version } => format!("AI ({model}, {api_version})"),
        SummarySource::Extractive => "Extractive".to_string(),
    };
    writeln!(stdout, "{}", result.summary)?;
    if !result.key_points.is_empty() {
        writeln!(stdout)?;
        writeln!(stdout, "Key points:")?;
        for point in &result.key_points {
            writeln!(stdout, "- {point}")?;
        }
    }
    writeln!(stdout)?;
    writeln!(stdout, "Source: {source}")?;
    Ok(())
}
