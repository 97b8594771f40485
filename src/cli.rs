use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "zimu",
    about = "Zimu - Chinese Audio Transcription & Subtitle Server",
    long_about = "Transcribes Chinese audio into plain text, SRT, or WebVTT subtitles with \
traditional-to-simplified script conversion, served over HTTP.",
    after_help = "EXAMPLES:\n    # Start the transcription server\n    zimu serve\n\n    # Transcribe an audio file through a running server\n    zimu file my_audio.wav\n\n    # Ask for SRT subtitles instead of plain text\n    zimu file my_audio.wav --format srt\n\n    # Fetch a whisper model before first start\n    zimu download base --models-path models\n\n    # Use a different server when in client mode\n    zimu file audio.wav --server-url http://my-server:8080"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(name = "serve")]
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        #[arg(long, default_value = "8080")]
        port: u16,
    },
    #[command(name = "file")]
    TranscribeFile {
        audio_file: String,

        #[arg(long, default_value = "http://localhost:8080")]
        server_url: String,

        /// Output representation: text, srt, or vtt
        #[arg(long, default_value = "text")]
        format: String,

        /// Write the transcript here instead of printing it
        #[arg(long, short = 'o')]
        output: Option<std::path::PathBuf>,

        /// Save next to the audio file, with the format's extension
        #[arg(long, conflicts_with = "output")]
        save: bool,
    },
    #[command(name = "download")]
    Download {
        /// Model name, e.g. base, small, large-v3-turbo
        model: String,

        #[arg(long)]
        models_path: Option<String>,
    },
}
