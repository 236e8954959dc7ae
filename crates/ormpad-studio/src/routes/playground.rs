//! The playground page and snippet-execution endpoint.
//!
//! `POST /` serves two callers: the editor's fetch requests (marked
//! with `x-requested-with: XMLHttpRequest`) get JSON, plain form posts
//! get the whole page re-rendered. Snippet failures are ordinary run
//! output, never HTTP errors.

use axum::{
    extract::State,
    http::HeaderMap,
    response::{Html, IntoResponse, Response},
    routing::get,
    Form, Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::page::{render_page, DEFAULT_SNIPPET};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(index).post(run_snippet))
}

async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_page(DEFAULT_SNIPPET, "", &[], None, &state.schema))
}

#[derive(Debug, Deserialize)]
struct RunRequest {
    code: String,
}

async fn run_snippet(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(request): Form<RunRequest>,
) -> Response {
    let outcome = state.engine.lock().run(&request.code);

    if is_xhr(&headers) {
        Json(json!({
            "result": outcome.output,
            "queries": outcome.queries,
            "execution_time": outcome.elapsed_seconds,
        }))
        .into_response()
    } else {
        Html(render_page(
            &request.code,
            &outcome.output,
            &outcome.queries,
            Some(outcome.elapsed_seconds),
            &state.schema,
        ))
        .into_response()
    }
}

fn is_xhr(headers: &HeaderMap) -> bool {
    headers
        .get("x-requested-with")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.eq_ignore_ascii_case("XMLHttpRequest"))
}
