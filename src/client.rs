use anyhow::{Context, Result, anyhow};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::ClientConfig;

/// Upload an audio file to a running server and return the plain-text body.
pub async fn send_transcription_request(config: &ClientConfig) -> Result<String> {
    let audio_path = Path::new(&config.audio_file);
    if !audio_path.exists() {
        return Err(anyhow!("Audio file not found: {}", config.audio_file));
    }

    let audio_data = fs::read(audio_path)
        .with_context(|| format!("Failed to read audio file: {}", config.audio_file))?;
    debug!("Loaded {} bytes from {}", audio_data.len(), config.audio_file);

    let file_name = audio_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| config.audio_file.clone());

    let form = reqwest::multipart::Form::new().part(
        "file",
        reqwest::multipart::Part::bytes(audio_data).file_name(file_name),
    );

    let response = reqwest::Client::new()
        .post(format!("{}/api/v1/transcribe", config.server_url))
        .query(&[("format", config.format.as_str())])
        .multipart(form)
        .send()
        .await
        .with_context(|| format!("Failed to reach server at {}", config.server_url))?;

    let status = response.status();
    let body = response.text().await.context("Failed to read response")?;

    if !status.is_success() {
        return Err(anyhow!("Server returned error {status}: {body}"));
    }

    Ok(body)
}

pub async fn check_server_health(server_url: &str) -> Result<()> {
    let response = reqwest::Client::new()
        .get(format!("{server_url}/api/v1/health"))
        .send()
        .await
        .with_context(|| format!("Failed to connect to server at {server_url}"))?;

    if !response.status().is_success() {
        return Err(anyhow!("Server health check failed: {}", response.status()));
    }
    Ok(())
}

/// Where the transcript goes: an explicit `--output` path, or one derived
/// from the audio file name the way the web UI names its downloads
/// (`recording.wav` + `srt` -> `recording.srt`).
fn output_path(config: &ClientConfig) -> Option<PathBuf> {
    if let Some(ref path) = config.output {
        return Some(path.clone());
    }
    if !config.save {
        return None;
    }
    let extension = match config.format.as_str() {
        "text" => "txt",
        other => other,
    };
    Some(Path::new(&config.audio_file).with_extension(extension))
}

pub async fn run_client(config: ClientConfig) -> Result<()> {
    println!("🎵 Zimu Client");
    println!("   File:   {}", config.audio_file);
    println!("   Format: {}", config.format);
    println!("   Server: {}", config.server_url);

    if let Err(e) = check_server_health(&config.server_url).await {
        eprintln!("❌ {e}");
        eprintln!("💡 Make sure the server is running: zimu serve");
        return Err(e);
    }
    println!("✅ Server is healthy, uploading...");

    let transcript = send_transcription_request(&config).await?;

    match output_path(&config) {
        Some(path) => {
            fs::write(&path, &transcript)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("💾 Saved transcript to {}", path.display());
        }
        None => {
            println!("📝 Result:\n{transcript}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_output_uses_format_extension() {
        let config = ClientConfig {
            server_url: "http://localhost:8080".to_string(),
            audio_file: "recordings/meeting.wav".to_string(),
            format: "srt".to_string(),
            output: None,
            save: true,
        };
        assert_eq!(
            output_path(&config),
            Some(PathBuf::from("recordings/meeting.srt"))
        );
    }

    #[test]
    fn text_format_saves_as_txt() {
        let config = ClientConfig {
            server_url: "http://localhost:8080".to_string(),
            audio_file: "a.wav".to_string(),
            format: "text".to_string(),
            output: None,
            save: true,
        };
        assert_eq!(output_path(&config), Some(PathBuf::from("a.txt")));
    }

    #[test]
    fn explicit_output_wins() {
        let config = ClientConfig {
            server_url: "http://localhost:8080".to_string(),
            audio_file: "a.wav".to_string(),
            format: "vtt".to_string(),
            output: Some(PathBuf::from("subs/out.vtt")),
            save: false,
        };
        assert_eq!(output_path(&config), Some(PathBuf::from("subs/out.vtt")));
    }

    #[test]
    fn no_save_prints_instead() {
        let config = ClientConfig {
            server_url: "http://localhost:8080".to_string(),
            audio_file: "a.wav".to_string(),
            format: "vtt".to_string(),
            output: None,
            save: false,
        };
        assert_eq!(output_path(&config), None);
    }
}
