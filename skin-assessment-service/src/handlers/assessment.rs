//! `POST /assessments`: three face photos in, model response out.

use crate::error::AssessmentError;
use crate::models::{FaceForm, FormValue, MessagesRequest, SkinProfile};
use crate::services::encoding::encode_all;
use crate::startup::AppState;
use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use metrics::{counter, histogram};
use service_core::error::AppError;
use std::time::Instant;

pub async fn create_assessment(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let result = match multipart {
        Ok(multipart) => assess(&state, multipart).await,
        Err(rejection) => Err(AssessmentError::MalformedForm(rejection.body_text())),
    };

    let outcome = match &result {
        Ok(_) => "success",
        Err(e) => e.outcome(),
    };
    counter!("assessments_total", "outcome" => outcome).increment(1);

    result.map(Json).map_err(|e| {
        match &e {
            AssessmentError::Provider(_) | AssessmentError::Encoding(_) => {
                tracing::error!(outcome, "Assessment failed: {}", e)
            }
            _ => tracing::warn!(outcome, "Assessment rejected: {}", e),
        }
        AppError::from(e)
    })
}

async fn assess(
    state: &AppState,
    multipart: Multipart,
) -> Result<serde_json::Value, AssessmentError> {
    let form = read_form(multipart).await?;
    let settings = &state.config.assessment;

    let profile = if settings.accept_form_profile {
        SkinProfile::from_form(
            form.concern.as_deref(),
            form.skin_type.as_deref(),
            &settings.default_profile,
        )
    } else {
        settings.default_profile.clone()
    };

    let photos = form.into_photos()?;
    tracing::debug!(
        front_bytes = photos.front.data.len(),
        left_bytes = photos.left.data.len(),
        right_bytes = photos.right.data.len(),
        "Received face photos"
    );

    let images = encode_all(photos).await?;
    let request = MessagesRequest::assessment(&state.config.anthropic.model, &images, &profile);

    let started = Instant::now();
    let response = state.provider.create_message(&request).await;
    let elapsed = started.elapsed();
    histogram!(
        "assessment_upstream_duration_seconds",
        "provider" => state.provider.name()
    )
    .record(elapsed.as_secs_f64());

    tracing::info!(
        provider = state.provider.name(),
        model = %request.model,
        elapsed_ms = elapsed.as_millis() as u64,
        ok = response.is_ok(),
        "Upstream assessment call finished"
    );

    Ok(response?)
}

/// Drain the multipart body, keeping only the fields the form knows about.
async fn read_form(mut multipart: Multipart) -> Result<FaceForm, AssessmentError> {
    let mut form = FaceForm::default();

    while let Some(field) = multipart.next_field().await.map_err(form_error)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        if !FaceForm::accepts(&name) {
            continue;
        }

        let value = match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(form_error)?;
                FormValue::File {
                    file_name: Some(file_name),
                    content_type,
                    data,
                }
            }
            None => {
                let data = field.bytes().await.map_err(form_error)?;
                FormValue::Text(String::from_utf8_lossy(&data).into_owned())
            }
        };

        form.insert(&name, value);
    }

    Ok(form)
}

fn form_error(err: MultipartError) -> AssessmentError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AssessmentError::PayloadTooLarge(err.body_text())
    } else {
        AssessmentError::MalformedForm(err.body_text())
    }
}
