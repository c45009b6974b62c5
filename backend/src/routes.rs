use std::time::Instant;

use actix_cors::Cors;
use actix_multipart::Multipart;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError, web};
use futures::TryStreamExt;
use log::{error, info, warn};
use shared::{ErrorResponse, HealthResponse, PredictResponse};

use crate::error::PipelineError;
use crate::pipeline;
use crate::state::AppState;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error("No image file in upload")]
    MissingUpload,
    #[error("Image file exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: usize },
    #[error("Malformed upload: {0}")]
    Multipart(String),
    #[error("Error processing image")]
    Worker(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Pipeline(PipelineError::InvalidImage(_)) => StatusCode::BAD_REQUEST,
            ApiError::Pipeline(PipelineError::ModelNotLoaded) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Pipeline(PipelineError::Inference(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::MissingUpload | ApiError::Multipart(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/predict").route(web::post().to(predict)))
        .service(web::resource("/health").route(web::get().to(health)));
}

/// CORS policy for the browser client: listed origins (or `*`), any method
/// and header, credentials allowed.
pub fn cors(allowed_origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .supports_credentials()
        .max_age(3600);

    if allowed_origins.iter().any(|origin| origin == "*") {
        return cors.allow_any_origin();
    }
    allowed_origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}

async fn predict(state: web::Data<AppState>, payload: Multipart) -> Result<HttpResponse, ApiError> {
    let image_data = read_upload(payload, state.max_upload_bytes)
        .await
        .inspect_err(|e| warn!("Rejected upload: {}", e))?;

    let started = Instant::now();
    let job_state = state.clone();
    let outcome = web::block(move || {
        pipeline::run(job_state.model(), &image_data, job_state.resize_filter)
    })
    .await
    .map_err(|e| ApiError::Worker(e.to_string()))
    .inspect_err(|e| error!("Inference worker failed: {:?}", e))?;

    match outcome {
        Ok(prediction) => {
            info!("Prediction {} in {:?}", prediction, started.elapsed());
            Ok(HttpResponse::Ok().json(PredictResponse {
                prediction: prediction.to_string(),
            }))
        }
        Err(e) => {
            match &e {
                PipelineError::Inference(_) => error!("Error processing image: {}", e.detail()),
                _ => warn!("{}: {}", e, e.detail()),
            }
            Err(e.into())
        }
    }
}

/// Collects the first non-empty file part of the upload.
async fn read_upload(mut payload: Multipart, limit: usize) -> Result<Vec<u8>, ApiError> {
    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| ApiError::Multipart(e.to_string()))?
    {
        let mut image_data = Vec::new();
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|e| ApiError::Multipart(e.to_string()))?
        {
            if image_data.len() + chunk.len() > limit {
                return Err(ApiError::PayloadTooLarge { limit });
            }
            image_data.extend_from_slice(&chunk);
        }
        if !image_data.is_empty() {
            return Ok(image_data);
        }
    }
    Err(ApiError::MissingUpload)
}

async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse::new(state.model_loaded()))
}
