use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use repo_traffic::error::Error;
use repo_traffic::github::DEFAULT_API_URL;
use repo_traffic::report::DEFAULT_CHART_PATH;
use repo_traffic::svg::Theme;
use repo_traffic::{EnvFileSource, RenderOptions, RunOptions, logging, pipeline};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ThemeArg {
    Dark,
    Light,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Dark => Theme::Dark,
            ThemeArg::Light => Theme::Light,
        }
    }
}

/// Show page-view traffic for every repository owned by GITHUB_USERNAME.
#[derive(Debug, Parser)]
#[command(name = "repo-traffic", version)]
struct Cli {
    /// Dotenv file holding GITHUB_TOKEN and GITHUB_USERNAME [default: .env if present]
    #[arg(long, value_name = "PATH")]
    env_file: Option<PathBuf>,

    /// Where to write the bar chart (overwritten each run).
    #[arg(long, short, value_name = "PATH", default_value = DEFAULT_CHART_PATH)]
    output: PathBuf,

    #[arg(long, value_enum, default_value_t = ThemeArg::Light)]
    theme: ThemeArg,

    /// Don't open the chart after writing it.
    #[arg(long)]
    no_open: bool,

    /// REST API root.
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Debug logging for this tool.
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let options = RunOptions {
        api_url: cli.api_url,
        render: RenderOptions {
            chart_path: cli.output,
            theme: cli.theme.into(),
            open: !cli.no_open,
        },
    };

    let result = match EnvFileSource::discover(cli.env_file) {
        Ok(source) => pipeline::run(&source, &options, &mut std::io::stdout().lock()).await,
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            match e {
                Error::Configuration(_) => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}
