//! docchat CLI binary.
//!
//! Subcommands: `serve` (HTTP server with upload and chat), `ask` (question a local PDF).

mod logging;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use docchat::{ChatOpenAI, ContextManager, LlmClient, PdfExtractor};
use serve::ServeConfig;

#[derive(Parser, Debug)]
#[command(name = "docchat")]
#[command(about = "docchat: chat with a PDF through an LLM")]
struct Args {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default http://0.0.0.0:5000)
    Serve(ServeArgs),
    /// Ask questions about a local PDF
    Ask(AskArgs),
}

#[derive(clap::Args, Debug)]
struct ServeArgs {
    /// Listen address (overrides DOCCHAT_ADDR)
    #[arg(long, value_name = "ADDR")]
    addr: Option<String>,

    /// Directory with index.html and assets (overrides DOCCHAT_STATIC_DIR)
    #[arg(long, value_name = "DIR")]
    static_dir: Option<PathBuf>,

    /// Directory for transient uploads (overrides DOCCHAT_UPLOAD_DIR)
    #[arg(long, value_name = "DIR")]
    upload_dir: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
struct AskArgs {
    /// PDF to load
    #[arg(value_name = "PDF")]
    pdf: PathBuf,

    /// Question; repeat to ask several in order
    #[arg(short, long = "message", value_name = "QUESTION")]
    messages: Vec<String>,

    /// Keep reading questions from stdin until EOF or `exit`
    #[arg(short, long)]
    interactive: bool,
}

fn serve_config(args: ServeArgs) -> ServeConfig {
    let mut config = ServeConfig::from_env();
    if let Some(addr) = args.addr {
        config.addr = addr;
    }
    if let Some(dir) = args.static_dir {
        config.static_dir = dir;
    }
    if let Some(dir) = args.upload_dir {
        config.upload_dir = dir;
    }
    config
}

async fn run_ask(args: AskArgs, llm: Arc<dyn LlmClient>) -> Result<(), Box<dyn std::error::Error>> {
    // History size and timeout follow the same env settings as the server.
    let settings = ServeConfig::from_env();
    let text = cli::load_document(&args.pdf, &PdfExtractor::new())?;
    let mut ctx = ContextManager::with_max_exchanges(settings.history_exchanges)
        .with_generation_timeout(settings.generation_timeout);
    ctx.set_document(text);

    let mut stdout = std::io::stdout();
    cli::ask_all(&mut ctx, llm.as_ref(), &args.messages, &mut stdout).await?;
    if args.interactive || args.messages.is_empty() {
        cli::run_repl(&mut ctx, llm.as_ref(), tokio::io::stdin(), &mut stdout).await?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    config::load_and_apply("docchat", None::<&std::path::Path>).ok();
    logging::init()?;

    let args = Args::parse();
    let llm: Arc<dyn LlmClient> = Arc::new(ChatOpenAI::from_env());
    match args.cmd {
        Command::Serve(serve_args) => {
            serve::run_serve(serve_config(serve_args), llm)
                .await
                .map_err(|e| e as Box<dyn std::error::Error>)?;
        }
        Command::Ask(ask_args) => {
            if let Err(e) = run_ask(ask_args, llm).await {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
    Ok(())
}
