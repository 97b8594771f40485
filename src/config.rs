use std::path::PathBuf;

#[derive(Debug)]
pub struct ClientConfig {
    pub server_url: String,
    pub audio_file: String,
    /// Output representation requested from the server.
    pub format: String,
    /// Explicit transcript destination.
    pub output: Option<PathBuf>,
    /// Save next to the audio file instead of printing.
    pub save: bool,
}
