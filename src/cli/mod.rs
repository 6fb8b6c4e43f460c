//! CLI module for dox-agent
//!
//! Provides command-line argument parsing for the dox-agent binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod output;

use clap::Parser;
use std::path::PathBuf;

/// dox-agent - research-focused question answering
///
/// Processes a question through a draft, search, and revise loop and
/// returns a detailed answer with citations based on current research.
#[derive(Parser, Debug)]
#[command(
    name = "dox-agent",
    author = "Dirmacs <build@dirmacs.com>",
    version,
    about = "Research-focused question answering with citations",
    long_about = "Processes a research question through a draft/search/revise loop against an LLM\n\
                  and a web-search service, returning a detailed answer with citations.\n\n\
                  Requires OPENAI_API_KEY and TAVILY_API_KEY in the environment or a .env file.",
    after_help = "EXAMPLES:\n    \
                  dox-agent \"What is quantum computing?\"\n    \
                  dox-agent -v -l gpt-4 \"Explain dark matter\"      # verbose, custom model\n    \
                  dox-agent -s output.json \"History of AI\"         # save final answer to file"
)]
pub struct Cli {
    /// The research question to process
    pub question: String,

    /// Maximum number of search-revise iterations
    #[arg(short = 'm', long)]
    pub max_iterations: Option<usize>,

    /// OpenAI model to use (default: gpt-4-turbo-preview)
    #[arg(short = 'l', long)]
    pub model: Option<String>,

    /// Maximum number of search results to return per query
    #[arg(short = 'r', long)]
    pub max_results: Option<usize>,

    /// Word limit for answers (default: 250)
    #[arg(short = 'w', long)]
    pub word_limit: Option<usize>,

    /// Show detailed output including reflections and search queries
    #[arg(short, long)]
    pub verbose: bool,

    /// Save the final structured answer to a file as JSON
    #[arg(short = 's', long, value_name = "PATH")]
    pub save_output: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_is_required() {
        assert!(Cli::try_parse_from(["dox-agent"]).is_err());
        assert!(Cli::try_parse_from(["dox-agent", "What is Rust?"]).is_ok());
    }

    #[test]
    fn test_flags_parse() {
        let cli = Cli::try_parse_from([
            "dox-agent",
            "-m",
            "2",
            "-l",
            "gpt-4",
            "-r",
            "3",
            "-v",
            "--no-color",
            "question",
        ])
        .unwrap();

        assert_eq!(cli.max_iterations, Some(2));
        assert_eq!(cli.model.as_deref(), Some("gpt-4"));
        assert_eq!(cli.max_results, Some(3));
        assert!(cli.verbose);
        assert!(cli.no_color);
        assert_eq!(cli.question, "question");
    }
}
