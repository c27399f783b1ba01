use anyhow::Result;
use ark_whitelist::App;
use ark_whitelist::Config;
use ark_whitelist::clients::git::RemoteClient;
use ark_whitelist::commands;
use ark_whitelist::indexer::Indexer;
use ark_whitelist::logging::setup_logging;
use ark_whitelist::mutator::ReplaceFileRequest;
use ark_whitelist::mutator::WhitelistRequest;
use ark_whitelist::whitelist::Whitelist;
use clap::Parser;
use clap::Subcommand;
use tokio::io::BufReader;

#[derive(Parser)]
#[command(name = "ark-whitelist")]
#[command(about = "Edit game server whitelists and config files stored in a git repository", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Answer chat interactions (JSON lines on stdin) while refreshing the index
    Serve,
    /// Refresh the folder/file index once and print it
    Sync,
    /// Overwrite a file with the contents of another file
    ReplaceFile {
        source_folder: String,
        source_file: String,
        target_folder: String,
        target_file: String,
    },
    /// Overwrite a whitelist file with the given player IDs (at least one)
    Whitelist {
        folder: String,
        file: String,
        /// Player IDs, separated by spaces or commas
        #[arg(required = true)]
        members: Vec<String>,
    },
    /// Print the chat command registration payload
    Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging()?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve => {
            let (app, indexer) = load()?;
            app.cmd_serve(
                &indexer,
                BufReader::new(tokio::io::stdin()),
                tokio::io::stdout(),
            )
            .await?
        }
        Commands::Sync => {
            let (_, indexer) = load()?;
            commands::sync::cmd_sync(&indexer, &mut std::io::stdout()).await?
        }
        Commands::ReplaceFile {
            source_folder,
            source_file,
            target_folder,
            target_file,
        } => {
            let (app, _) = load()?;
            let message = app
                .replace_file(ReplaceFileRequest {
                    source_folder,
                    source_file,
                    target_folder,
                    target_file,
                })
                .await?;
            println!("{}", message);
        }
        Commands::Whitelist {
            folder,
            file,
            members,
        } => {
            let (app, _) = load()?;
            let message = app
                .update_whitelist(WhitelistRequest {
                    folder,
                    file,
                    document: Whitelist::parse_members(&members.join(" ")),
                })
                .await?;
            println!("{}", message);
        }
        Commands::Commands => {
            println!("{}", serde_json::to_string_pretty(&commands::definitions())?);
        }
    }

    Ok(())
}

fn load() -> Result<(App<RemoteClient>, Indexer<RemoteClient>)> {
    Ok(App::from_config(Config::load()?))
}
