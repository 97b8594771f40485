use actix_cors::Cors;
use actix_multipart::{Field, Multipart};
use actix_web::{App, HttpResponse, HttpServer, Responder, get, middleware::Logger, post, web};
use futures_util::TryStreamExt;
use log::{debug, error, info, warn};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use crate::format::{self, OutputFormat};
use crate::normalize::ScriptNormalizer;
use crate::whisper::config::WhisperConfig;
use crate::whisper::transcriber::{Transcriber, WhisperTranscriber};

/// Origin of the bundled web frontend.
const FRONTEND_ORIGIN: &str = "http://localhost:3000";

pub struct AppState {
    pub transcriber: Arc<dyn Transcriber>,
    pub normalizer: ScriptNormalizer,
}

#[derive(serde::Deserialize)]
pub struct TranscribeQuery {
    #[serde(default = "default_format")]
    format: String,
}

fn default_format() -> String {
    "text".to_string()
}

#[get("/api/v1/health")]
pub async fn health_check() -> impl Responder {
    debug!("Health check endpoint called");
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "message": "Transcription service is running"
    }))
}

#[post("/api/v1/transcribe")]
pub async fn transcribe_upload(
    data: web::Data<AppState>,
    query: web::Query<TranscribeQuery>,
    mut payload: Multipart,
) -> impl Responder {
    debug!("Transcription request received, format={}", query.format);

    // Reject bad selectors before touching the upload.
    let Some(output_format) = OutputFormat::parse(&query.format) else {
        warn!("Unsupported output format requested: {}", query.format);
        return plain_text(HttpResponse::BadRequest(), format!(
            "Unsupported format: {}. Valid options: {}",
            query.format,
            format::VALID_FORMATS
        ));
    };

    let mut audio_data: Option<Vec<u8>> = None;
    let mut filename = String::new();

    while let Some(field) = payload.try_next().await.unwrap_or(None) {
        match field.name() {
            Some("file") => {
                if let Some(name) = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                {
                    filename = name.to_string();
                }
                match read_field_data(field).await {
                    Ok(data) => {
                        debug!("Audio data received: {} bytes", data.len());
                        audio_data = Some(data);
                    }
                    Err(e) => {
                        error!("Failed to read audio data: {e}");
                        return plain_text(
                            HttpResponse::BadRequest(),
                            "Failed to read audio data".to_string(),
                        );
                    }
                }
            }
            _ => continue,
        }
    }

    let Some(audio_bytes) = audio_data else {
        warn!("No audio file provided in transcription request");
        return plain_text(
            HttpResponse::BadRequest(),
            "No audio file provided".to_string(),
        );
    };

    info!(
        "Processing upload: {} bytes, file name {:?}, format {}",
        audio_bytes.len(),
        filename,
        query.format
    );

    // Scratch file keeps the upload's extension so the decoder can see the
    // container. Removed on drop, whichever way this handler exits.
    let suffix = Path::new(&filename)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    let mut scratch = match tempfile::Builder::new()
        .prefix("zimu-upload-")
        .suffix(&suffix)
        .tempfile()
    {
        Ok(file) => file,
        Err(e) => {
            error!("Failed to create scratch file: {e}");
            return plain_text(
                HttpResponse::InternalServerError(),
                "Failed to store upload".to_string(),
            );
        }
    };

    if let Err(e) = scratch.write_all(&audio_bytes).and_then(|_| scratch.flush()) {
        error!("Failed to write scratch file: {e}");
        return plain_text(
            HttpResponse::InternalServerError(),
            "Failed to store upload".to_string(),
        );
    }

    match data.transcriber.transcribe_file(scratch.path()) {
        Ok(result) => {
            info!(
                "Transcription completed: {} segments, {} characters",
                result.segments.len(),
                result.text.len()
            );
            let output = format::render(&result, output_format);
            let output = data.normalizer.normalize(&output);
            plain_text(HttpResponse::Ok(), output)
        }
        Err(e) => {
            error!("Transcription failed: {e}");
            plain_text(
                HttpResponse::InternalServerError(),
                format!("Transcription failed: {e}"),
            )
        }
    }
}

fn plain_text(mut builder: actix_web::HttpResponseBuilder, body: String) -> HttpResponse {
    builder.content_type("text/plain; charset=utf-8").body(body)
}

async fn read_field_data(mut field: Field) -> Result<Vec<u8>, actix_web::Error> {
    let mut data = Vec::new();
    while let Some(chunk) = field.try_next().await? {
        data.extend_from_slice(&chunk);
    }
    debug!("Read field data: {} bytes", data.len());
    Ok(data)
}

pub async fn run_server(host: String, port: u16) -> std::io::Result<()> {
    info!("Starting transcription service");
    info!("Initializing whisper transcriber...");

    let config = WhisperConfig::default();
    info!(
        "Using configuration: model_path={:?}, use_gpu={}, language={}, num_threads={}",
        config.model_path, config.use_gpu, config.language, config.num_threads
    );

    let transcriber = match WhisperTranscriber::new(config) {
        Ok(t) => {
            info!("Whisper transcriber initialized successfully");
            t
        }
        Err(e) => {
            error!("Failed to initialize transcriber: {e}");
            std::process::exit(1);
        }
    };

    let normalizer = ScriptNormalizer::detect();
    info!("Script normalizer: {normalizer:?}");

    let app_state = web::Data::new(AppState {
        transcriber: Arc::new(transcriber),
        normalizer,
    });

    info!("Starting HTTP server on {host}:{port}");

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(
                actix_multipart::form::MultipartFormConfig::default()
                    .total_limit(100 * 1024 * 1024), // 100MB
            )
            .wrap(
                Cors::default()
                    .allowed_origin(FRONTEND_ORIGIN)
                    .allow_any_method()
                    .allow_any_header()
                    .supports_credentials()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(health_check)
            .service(transcribe_upload)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
