mod recognizer;
mod server;

use anyhow::Result;
use clap::{Parser, Subcommand};
use mathnotes::Pipeline;
use recognizer::CommandRecognizer;
use std::io::Read;

#[derive(Parser)]
#[command(name = "mathnotes")]
#[command(about = "Recognize handwritten math and solve it symbolically.")]
#[command(
    long_about = "mathnotes classifies each line of recognized math markup (solve, integrate,\ndifferentiate, or simplify), executes it symbolically, and prints one JSON\nrecord per line. Use `run` for markup text directly, or `serve` to expose the\nrecognition-and-solving pipeline over HTTP."
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process markup text and print result records as JSON
    ///
    /// Each non-blank line is classified and executed independently;
    /// a bad line produces an error record, not a failed run.
    Run {
        /// Markup to process (reads stdin when omitted)
        input: Option<String>,
        /// Pretty-print the JSON output
        #[arg(short, long)]
        pretty: bool,
    },
    /// Start the HTTP server (POST /calculate with a base64 image)
    Serve {
        /// Host address to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// Port number to listen on
        #[arg(short, long, default_value = "5001")]
        port: u16,
        /// Recognition command; invoked with the image path appended
        #[arg(long, default_value = "pix2text")]
        recognizer: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run { input, pretty } => run_command(input, pretty),
        Commands::Serve {
            host,
            port,
            recognizer,
        } => serve_command(&host, port, &recognizer),
    }
}

fn run_command(input: Option<String>, pretty: bool) -> Result<()> {
    let text = match input {
        Some(text) => text,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let pipeline = Pipeline::new();
    let records = pipeline.process_batch(&text);
    let json = if pretty {
        serde_json::to_string_pretty(&records)?
    } else {
        serde_json::to_string(&records)?
    };
    println!("{}", json);
    Ok(())
}

fn serve_command(host: &str, port: u16, recognizer: &str) -> Result<()> {
    use tokio::runtime::Runtime;
    let rt = Runtime::new()?;
    rt.block_on(async {
        let state = server::http::AppState {
            pipeline: Pipeline::new(),
            recognizer: Box::new(CommandRecognizer::new(recognizer)),
        };
        server::http::start_server(state, host, port).await
    })?;
    Ok(())
}
