use dox_agent::cli::output::{save_output, Output};
use dox_agent::cli::Cli;
use dox_agent::{
    AgentInput, Config, OpenAIClient, Orchestrator, PromptAssembler, TavilySearchClient,
};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse_args();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dox_agent=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    match run(&cli, &output).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output.error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, output: &Output) -> dox_agent::Result<()> {
    let config = Config::from_env()?.with_overrides(
        cli.max_iterations,
        cli.model.clone(),
        cli.max_results,
        cli.word_limit,
    );

    let completion = Arc::new(OpenAIClient::new(
        config.openai_api_key.clone(),
        config.model.clone(),
        PromptAssembler::new(config.word_limit),
    ));
    let search = Arc::new(TavilySearchClient::new(
        config.tavily_api_key.clone(),
        config.max_results,
    ));

    let orchestrator = Orchestrator::new(completion, search, config.max_iterations);
    let history = orchestrator
        .run(AgentInput::Question(cli.question.clone()))
        .await?;

    if cli.verbose {
        output.render_verbose(&history);
    } else {
        output.render_standard(&history)?;
    }

    if let Some(path) = &cli.save_output {
        save_output(&history, path)?;
    }

    Ok(())
}
