use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use mathsteps::{Config, ParsedResult, SolveResponse};

#[derive(Parser)]
#[command(name = "mathsteps")]
#[command(about = "Format step-by-step math solutions")]
struct Cli {
    /// Solution text file, or `-` for stdin
    input: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Latex)]
    format: Format,

    /// Config file
    #[arg(short, long, default_value = "mathsteps.toml")]
    config: PathBuf,

    /// Treat the input as a JSON response body with a `solution` field
    #[arg(long)]
    response: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Latex,
    Html,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;
    log::debug!("Loaded config: {config:?}");

    let input = read_input(&cli.input)?;
    let result = if cli.response {
        let response = SolveResponse::from_json(&input)
            .with_context(|| format!("Invalid response body in {}", cli.input.display()))?;
        mathsteps::parse(&response.solution)
    } else {
        mathsteps::parse_bytes(&input)
    };

    if let Some(error) = &result.error {
        log::warn!("Showing raw solution: {}", error.message);
    }

    let rendered = render(&result, cli.format, &config)?;

    match &cli.output {
        Some(output) => {
            fs::write(output, rendered)
                .with_context(|| format!("Error writing {}", output.display()))?;
            log::info!("Created {}", output.display());
        }
        None => io::stdout()
            .write_all(rendered.as_bytes())
            .context("Error writing to stdout")?,
    }

    Ok(())
}

fn read_input(path: &Path) -> anyhow::Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut buf = Vec::new();
        io::stdin()
            .read_to_end(&mut buf)
            .context("Error reading stdin")?;
        Ok(buf)
    } else {
        fs::read(path).with_context(|| format!("Error reading {}", path.display()))
    }
}

fn render(result: &ParsedResult, format: Format, config: &Config) -> anyhow::Result<String> {
    Ok(match format {
        Format::Json => {
            let mut json = serde_json::to_string_pretty(result)?;
            json.push('\n');
            json
        }
        Format::Latex => mathsteps::render::latex::blocks_to_latex(&result.blocks, &config.latex),
        Format::Html => mathsteps::render::html::result_to_html(result, &config.html),
    })
}
