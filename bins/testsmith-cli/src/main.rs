mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "testsmith-cli")]
#[command(about = "testsmith CLI - Synthesize, run and inspect test harnesses", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show which function a harness would call
    Resolve {
        /// Language (typescript, python, java, cpp)
        #[arg(short, long)]
        lang: String,

        /// Path to the user's source file
        #[arg(short, long)]
        source: PathBuf,

        /// Problem JSON supplying the input schema and entry name hint
        #[arg(short, long)]
        problem: Option<PathBuf>,
    },

    /// Print a synthesized harness program
    Synth {
        #[arg(short, long)]
        lang: String,

        #[arg(short, long)]
        source: PathBuf,

        #[arg(short, long)]
        problem: PathBuf,

        /// Emit the stdin-driven judge program instead of the test harness
        #[arg(long, default_value = "false")]
        judge: bool,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Recover verdicts from captured program output ("-" for stdin)
    Extract {
        #[arg(short, long, default_value = "-")]
        input: String,
    },

    /// Synthesize, submit to the judge and print the run report
    Run {
        #[arg(short, long)]
        lang: String,

        #[arg(short, long)]
        source: PathBuf,

        #[arg(short, long)]
        problem: PathBuf,
    },

    /// Run every stored implementation of every problem
    Simulate {
        /// Problem JSON file (object or array) or a directory of them
        #[arg(short, long)]
        problems: PathBuf,

        /// Stop at the first run that does not pass
        #[arg(long, default_value = "false")]
        stop_on_failure: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve { lang, source, problem } => {
            commands::resolve(&lang, &source, problem.as_deref())?;
        }
        Commands::Synth {
            lang,
            source,
            problem,
            judge,
            out,
        } => {
            commands::synth(&lang, &source, &problem, judge, out.as_deref())?;
        }
        Commands::Extract { input } => {
            commands::extract(&input)?;
        }
        Commands::Run { lang, source, problem } => {
            commands::run(&lang, &source, &problem).await?;
        }
        Commands::Simulate {
            problems,
            stop_on_failure,
        } => {
            commands::simulate(&problems, stop_on_failure).await?;
        }
    }

    Ok(())
}
