//! `POST /chat`: `{"question": "..."}` in, `{"answer": "..."}` out.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::app::AppState;
use super::response::ApiError;
use super::session::SessionId;

#[derive(Deserialize)]
pub(crate) struct ChatRequest {
    question: Option<String>,
}

#[derive(Serialize)]
pub(crate) struct ChatResponse {
    answer: String,
}

pub(crate) async fn chat(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionId>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(req) = body
        .map_err(|e| ApiError::bad_request(format!("invalid json body: {}", e.body_text())))?;
    let question = req
        .question
        .ok_or_else(|| ApiError::bad_request("No question provided"))?;

    let ctx = state.sessions.context(&session.0);
    let mut ctx = ctx.lock().await;
    let answer = ctx.answer_question(&question, state.llm.as_ref()).await?;
    info!(
        session_id = %session.0,
        question_len = question.len(),
        answer_len = answer.len(),
        history_len = ctx.history().len(),
        "question answered"
    );
    Ok(Json(ChatResponse { answer }))
}
