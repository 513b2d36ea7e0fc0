//! Rule-based campus chatbot: the first canned entry whose keyword appears
//! in the message wins, otherwise the default line is returned.

use axum::{response::Json, routing::post, Router};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

/// Keyword → reply table. Order matters: earlier entries win.
const RESPONSES: &[(&str, &str)] = &[
    ("class", "Classes run from 8 AM to 5 PM on weekdays."),
    ("events", "You can check upcoming events on the Events page."),
    (
        "clubs",
        "Visit the Clubs page to browse and join student organizations.",
    ),
];

const DEFAULT_RESPONSE: &str =
    "I can help you with class schedules, events, and general university information.";

/// Pick the canned reply for a message.
pub fn reply_to(message: &str) -> &'static str {
    let message = message.to_lowercase();
    RESPONSES
        .iter()
        .find(|(keyword, _)| message.contains(keyword))
        .map(|(_, reply)| *reply)
        .unwrap_or(DEFAULT_RESPONSE)
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatReq {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatResp {
    pub response: String,
}

/// Answer a chat message with a canned reply.
#[utoipa::path(
    post,
    path = "/chatbot",
    tag = "chatbot",
    request_body = ChatReq,
    responses((status = 200, body = ChatResp))
)]
pub async fn chat(Json(req): Json<ChatReq>) -> Json<ChatResp> {
    tracing::debug!(message = %req.message, "chatbot message");
    Json(ChatResp {
        response: reply_to(&req.message).to_string(),
    })
}

#[derive(OpenApi)]
#[openapi(paths(chat), components(schemas(ChatReq, ChatResp)))]
struct ChatbotApi;

/// OpenAPI fragment for this module, merged by the server.
pub fn openapi() -> utoipa::openapi::OpenApi {
    ChatbotApi::openapi()
}

pub fn router() -> Router {
    Router::new().route("/chatbot", post(chat))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    #[test]
    fn keyword_matching_is_case_insensitive() {
        assert_eq!(
            reply_to("When does my CLASS start?"),
            "Classes run from 8 AM to 5 PM on weekdays."
        );
        assert_eq!(
            reply_to("any events this weekend?"),
            "You can check upcoming events on the Events page."
        );
        assert_eq!(
            reply_to("how do I join clubs"),
            "Visit the Clubs page to browse and join student organizations."
        );
    }

    #[test]
    fn unknown_messages_get_the_default_line() {
        assert_eq!(reply_to("what's the wifi password"), DEFAULT_RESPONSE);
        assert_eq!(reply_to(""), DEFAULT_RESPONSE);
    }

    #[test]
    fn earlier_table_entries_win_on_multiple_matches() {
        assert_eq!(
            reply_to("class events clubs"),
            "Classes run from 8 AM to 5 PM on weekdays."
        );
    }

    #[tokio::test]
    async fn chat_endpoint_round_trip() {
        let resp = router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/chatbot")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"message": "tell me about clubs"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["response"].as_str().unwrap().contains("Clubs page"));
    }
}
