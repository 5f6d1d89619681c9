// command line interface

use crate::core::{OUTPUT_DIR, PROMISES_CSV, VERSES_CSV};
use crate::{Builder, Server};
use clap::{Parser, Subcommand};
use miette::Result;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nevin", about = "Bible assistant backend and offline dataset tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// start the nevin api server
    Serve {
        /// port number
        #[arg(long, short, default_value = "8000")]
        port: u16,

        /// host to bind
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// anthropic api key; ai endpoints refuse requests without it
        #[arg(long, short = 'k', env = "ANTHROPIC_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },

    /// convert the csv sources into the sqlite bundle for the mobile app
    BuildDb {
        /// bilingual verse csv
        #[arg(long, default_value = VERSES_CSV)]
        verses: PathBuf,

        /// promises csv
        #[arg(long, default_value = PROMISES_CSV)]
        promises: PathBuf,

        /// where bible.db and bible_books.json land
        #[arg(long, default_value = OUTPUT_DIR)]
        out_dir: PathBuf,
    },
}

pub async fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("nevin=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            port,
            host,
            api_key,
        } => Ok(Server::run(api_key, &host, port).await?),

        Commands::BuildDb {
            verses,
            promises,
            out_dir,
        } => {
            let summary = Builder::run(&verses, &promises, &out_dir).await?;

            println!("books:    {}", summary.books);
            println!("verses:   {}", summary.verses);
            println!("promises: {}", summary.promises);
            println!(
                "database: {} ({:.2} MB)",
                summary.db_path.display(),
                summary.db_bytes as f64 / (1024.0 * 1024.0)
            );
            Ok(())
        }
    }
}
