use anyhow::{Result, anyhow};
use futures_util::TryStreamExt;
use std::path::Path;
use tokio::io::AsyncWriteExt;

const AVAILABLE_MODELS: &[&str] = &[
    "tiny",
    "tiny.en",
    "tiny-q5_1",
    "tiny.en-q5_1",
    "tiny-q8_0",
    "base",
    "base.en",
    "base-q5_1",
    "base.en-q5_1",
    "base-q8_0",
    "small",
    "small.en",
    "small.en-tdrz",
    "small-q5_1",
    "small.en-q5_1",
    "small-q8_0",
    "medium",
    "medium.en",
    "medium-q5_0",
    "medium.en-q5_0",
    "medium-q8_0",
    "large-v1",
    "large-v2",
    "large-v2-q5_0",
    "large-v2-q8_0",
    "large-v3",
    "large-v3-q5_0",
    "large-v3-turbo",
    "large-v3-turbo-q5_0",
    "large-v3-turbo-q8_0",
];

pub fn list_available_models() -> String {
    let mut output = String::from("\nAvailable models:");

    // One line per model family (tiny, base, small, ...).
    let mut current_family = "";
    for model in AVAILABLE_MODELS {
        let family = model.split(['.', '-']).next().unwrap_or("");
        if family != current_family {
            output.push_str("\n  ");
            current_family = family;
        }
        output.push(' ');
        output.push_str(model);
    }

    output.push_str("\n\n.en = english-only  -q5_[01] = quantized  -tdrz = tinydiarize\n");
    output
}

pub fn validate_model(model: &str) -> Result<()> {
    anyhow::ensure!(
        AVAILABLE_MODELS.contains(&model),
        "Invalid model: {model}\n{}",
        list_available_models()
    );
    Ok(())
}

fn model_url(model: &str) -> String {
    let repo = if model.contains("tdrz") {
        "https://huggingface.co/akashmjn/tinydiarize-whisper.cpp"
    } else {
        "https://huggingface.co/ggerganov/whisper.cpp"
    };
    format!("{repo}/resolve/main/ggml-{model}.bin")
}

pub async fn download_model(model: &str, models_path: Option<String>) -> Result<()> {
    validate_model(model)?;

    let download_path = models_path.unwrap_or_else(|| ".".to_string());
    let file_path = Path::new(&download_path).join(format!("ggml-{model}.bin"));

    if file_path.exists() {
        println!("Model '{model}' already exists. Skipping download.");
        return Ok(());
    }

    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| anyhow!("Failed to create directory: {}", e))?;
    }

    let url = model_url(model);
    println!("Downloading ggml model '{model}' from '{url}'...");

    let response = reqwest::get(&url)
        .await
        .map_err(|e| anyhow!("Failed to start download: {}", e))?
        .error_for_status()
        .map_err(|e| anyhow!("Download failed: {}", e))?;

    let mut file = tokio::fs::File::create(&file_path)
        .await
        .map_err(|e| anyhow!("Failed to create {}: {}", file_path.display(), e))?;

    let mut stream = response.bytes_stream();
    let mut downloaded: u64 = 0;
    while let Some(chunk) = stream
        .try_next()
        .await
        .map_err(|e| anyhow!("Download interrupted: {}", e))?
    {
        file.write_all(&chunk)
            .await
            .map_err(|e| anyhow!("Failed to write model file: {}", e))?;
        downloaded += chunk.len() as u64;
    }
    file.flush()
        .await
        .map_err(|e| anyhow!("Failed to flush model file: {}", e))?;

    println!(
        "Done! Model '{}' ({} MB) saved in '{}'",
        model,
        downloaded / (1024 * 1024),
        file_path.display()
    );
    println!("You can now use it like this:");
    println!("  $ WHISPER_MODEL_PATH={} zimu serve", file_path.display());

    Ok(())
}
