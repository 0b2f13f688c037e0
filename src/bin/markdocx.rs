//! markdocx command-line interface.
//!
//! Two modes:
//!
//! * one-shot: `markdocx report.docx -o report.md`
//! * server:   `markdocx --serve --port 3000`

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use markdocx::{ConvertOptions, Converter, LinkStyle, RenderOptions};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "markdocx",
    version,
    about = "Convert Word documents (.docx) to GitHub-flavored Markdown",
    after_help = "Examples:\n  \
        markdocx report.docx\n  \
        markdocx report.docx -o report.md\n  \
        markdocx https://example.com/report.docx\n  \
        markdocx --serve --port 3000"
)]
struct Cli {
    /// Path or HTTP(S) URL of the .docx document to convert
    #[arg(required_unless_present = "serve")]
    input: Option<String>,

    /// Write Markdown to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit reference-style links instead of inline links
    #[arg(long)]
    reference_links: bool,

    /// Download timeout for URL inputs, in seconds
    #[arg(long, default_value_t = 120)]
    timeout: u64,

    /// Run the HTTP API instead of converting a single document
    #[arg(long)]
    serve: bool,

    /// Address to bind in server mode
    #[arg(long, default_value = "127.0.0.1", env = "MARKDOCX_HOST")]
    host: String,

    /// Port to bind in server mode
    #[arg(long, default_value_t = 3000, env = "MARKDOCX_PORT")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("markdocx=info")),
        )
        .init();

    let cli = Cli::parse();
    let converter = Arc::new(Converter::new());

    if cli.serve {
        let addr = format!("{}:{}", cli.host, cli.port);
        markdocx::server::serve(&addr, converter)
            .await
            .with_context(|| format!("server failed on {addr}"))?;
        return Ok(());
    }

    let Some(input) = cli.input else {
        bail!("no input document given (or pass --serve)");
    };

    let options = ConvertOptions {
        render: RenderOptions {
            link_style: cli.reference_links.then_some(LinkStyle::Referenced),
            ..RenderOptions::default()
        },
        download_timeout_secs: cli.timeout,
    };

    let markdown = converter.convert(&input, &options).await?;

    match cli.output {
        Some(path) => {
            tokio::fs::write(&path, &markdown)
                .await
                .with_context(|| format!("failed to write '{}'", path.display()))?;
            eprintln!("Wrote {} bytes to {}", markdown.len(), path.display());
        }
        None => println!("{markdown}"),
    }

    Ok(())
}
