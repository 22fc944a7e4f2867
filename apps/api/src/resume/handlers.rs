//! Axum route handlers for the Résumé API.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use tracing::info;

use crate::errors::AppError;
use crate::models::resume::AnalyzeResponse;
use crate::resume::analyzer::analyze_text;
use crate::resume::extract::extract_text;
use crate::state::AppState;

const UPLOAD_FIELD: &str = "file";

struct Upload {
    filename: String,
    data: Bytes,
}

/// POST /api/resume/analyze
///
/// Accepts a multipart upload (field `file`, expected PDF) and returns ATS
/// feedback per detected section. An unreadable document gives an empty
/// `suggestions` object rather than an error.
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let upload = read_upload(&mut multipart).await?;
    info!(filename = %upload.filename, bytes = upload.data.len(), "Received résumé upload");

    let text = extract_text(upload.data).await;
    let suggestions = analyze_text(
        &text,
        state.llm.as_ref(),
        state.config.section_concurrency,
    )
    .await?;

    Ok(Json(AnalyzeResponse {
        filename: upload.filename,
        suggestions,
    }))
}

async fn read_upload(multipart: &mut Multipart) -> Result<Upload, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await.map_err(multipart_error)?;
        return Ok(Upload { filename, data });
    }
    Err(AppError::Validation(format!(
        "Missing '{UPLOAD_FIELD}' field in multipart upload"
    )))
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::Validation(format!("Malformed multipart upload: {}", e.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::llm_client::CannedClient;
    use crate::resume::extract::text_pdf;
    use crate::routes::build_router;

    use super::*;

    const BOUNDARY: &str = "promptcv-test-boundary";

    fn state_with(llm: Arc<CannedClient>, config: Config) -> AppState {
        AppState { llm, config }
    }

    fn multipart_request(field: &str, filename: &str, data: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: application/pdf\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/resume/analyze")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    const SECTION_REPLY: &str = "ATS Score: 74/100
- Keyword Optimization: 14/20
- Content Structure: 15/20
- Achievement Quantification: 13/20
- Action Verb Usage: 16/20
- Relevance & Impact: 16/20
Suggested Heading: Professional Summary
Recommendations:
- Add measurable outcomes
- Lead with action verbs";

    #[tokio::test]
    async fn test_pdf_upload_returns_suggestions_per_section() {
        let llm = Arc::new(CannedClient::replying(SECTION_REPLY));
        let app = build_router(state_with(llm.clone(), Config::for_tests()));
        let pdf = text_pdf(&["Summary", "Built systems.", "Education", "BS CS 2020"]);

        let response = app
            .oneshot(multipart_request("file", "resume.pdf", &pdf))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let raw = String::from_utf8(bytes.to_vec()).unwrap();
        let body: Value = serde_json::from_str(&raw).unwrap();

        assert_eq!(body["filename"], "resume.pdf");
        let summary = &body["suggestions"]["Summary"];
        assert_eq!(summary["original_heading"], "Summary");
        assert_eq!(summary["suggested_heading"], "Professional Summary");
        assert_eq!(summary["ats_score"], 74);
        assert_eq!(summary["score_breakdown"]["Keyword Optimization"], 14);
        assert_eq!(summary["score_breakdown"]["Relevance & Impact"], 16);
        assert_eq!(
            summary["recommendations"],
            serde_json::json!(["Add measurable outcomes", "Lead with action verbs"])
        );
        assert_eq!(summary["section_preview"], "Built systems.");
        assert_eq!(
            body["suggestions"]["Education"]["section_preview"],
            "BS CS 2020"
        );

        let summary_at = raw.find("\"Summary\":{").unwrap();
        let education_at = raw.find("\"Education\":{").unwrap();
        assert!(summary_at < education_at);
        assert_eq!(llm.call_count(), 2);
    }

    #[tokio::test]
    async fn test_unreadable_document_returns_empty_suggestions() {
        let llm = Arc::new(CannedClient::replying("ATS Score: 90"));
        let app = build_router(state_with(llm.clone(), Config::for_tests()));

        let response = app
            .oneshot(multipart_request("file", "resume.pdf", b"not a pdf at all"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["filename"], "resume.pdf");
        assert_eq!(body["suggestions"], serde_json::json!({}));
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_file_field_is_bad_request() {
        let llm = Arc::new(CannedClient::replying("ATS Score: 90"));
        let app = build_router(state_with(llm, Config::for_tests()));

        let response = app
            .oneshot(multipart_request("document", "resume.pdf", b"%PDF-1.4"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_non_multipart_request_is_rejected() {
        let llm = Arc::new(CannedClient::replying("ATS Score: 90"));
        let app = build_router(state_with(llm, Config::for_tests()));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/resume/analyze")
                    .header("content-type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_oversized_upload_is_rejected() {
        let llm = Arc::new(CannedClient::replying("ATS Score: 90"));
        let config = Config {
            max_upload_bytes: 64,
            ..Config::for_tests()
        };
        let app = build_router(state_with(llm.clone(), config));

        let response = app
            .oneshot(multipart_request("file", "resume.pdf", &[b'x'; 4096]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(llm.call_count(), 0);
    }
}
