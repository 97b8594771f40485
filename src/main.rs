mod cli;
mod client;
mod config;
mod download;
mod format;
mod normalize;
mod server;
mod whisper;

use clap::Parser;

use cli::{Cli, Commands};
use config::ClientConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port } => {
            server::run_server(host, port).await?;
        }
        Commands::TranscribeFile {
            audio_file,
            server_url,
            format,
            output,
            save,
        } => {
            let config = ClientConfig {
                server_url,
                audio_file,
                format,
                output,
                save,
            };
            client::run_client(config).await?;
        }
        Commands::Download { model, models_path } => {
            download::download_model(&model, models_path).await?;
        }
    }

    Ok(())
}
