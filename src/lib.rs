mod block;
mod config;
mod parser;
pub mod render;
mod response;

pub use block::{ContentBlock, ParseError, ParsedResult};
pub use config::{Config, ConfigError, HtmlConfig, LatexConfig};
pub use response::{SolveRequest, SolveResponse};

/// Parse solver output into a list of blocks.
pub fn parse(text: &str) -> ParsedResult {
    parser::parse(text)
}

/// Parse solver output that may not be valid UTF-8.
pub fn parse_bytes(bytes: &[u8]) -> ParsedResult {
    parser::parse_bytes(bytes)
}

/// Convert solver output to LaTeX using default config.
pub fn solution_to_latex(text: &str) -> String {
    solution_to_latex_with_config(text, &Config::compiled_default())
}

/// Convert solver output to LaTeX with custom config.
pub fn solution_to_latex_with_config(text: &str, config: &Config) -> String {
    let result = parse(text);
    render::latex::blocks_to_latex(&result.blocks, &config.latex)
}

/// Convert solver output to HTML using default config.
pub fn solution_to_html(text: &str) -> String {
    solution_to_html_with_config(text, &Config::compiled_default())
}

/// Convert solver output to HTML with custom config.
pub fn solution_to_html_with_config(text: &str, config: &Config) -> String {
    let result = parse(text);
    render::html::result_to_html(&result, &config.html)
}
