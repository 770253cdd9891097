pub mod chat;
pub mod detail;
pub mod middleware;
pub mod protocol;
pub mod rest;
pub mod save_task;
pub mod state;
pub mod ws_handler;

// Re-export the handlers the binary and the router need.
pub use middleware::{require_student, require_teacher};
pub use ws_handler::chat_ws_handler;

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use state::AppState;
use std::sync::Arc;

/// Large enough for a 5 MiB file plus the multipart envelope. Bodies past it
/// are rejected with the same message as an oversized file.
pub const UPLOAD_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Builds the API router: shared routes, plus teacher-only and student-only
/// routes gated on the workspace's current role.
pub fn build_router(app_state: Arc<AppState>) -> Router {
    let shared_routes = Router::new()
        .route("/role", get(rest::get_role_handler).put(rest::set_role_handler))
        .route("/notes/{id}", get(rest::get_note_handler))
        .route(
            "/detail",
            get(detail::get_detail_handler).delete(detail::close_detail_handler),
        )
        .route("/detail/{id}", post(detail::open_detail_handler))
        .route("/chat", post(chat::chat_handler))
        .route("/chat/ws", get(chat_ws_handler));

    let teacher_routes = Router::new()
        .route(
            "/teacher/notes",
            get(rest::teacher_notes_handler).post(rest::upload_note_handler),
        )
        .route("/teacher/notes/{id}", delete(rest::delete_note_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_teacher,
        ));

    let student_routes = Router::new()
        .route("/student/notes", get(rest::student_notes_handler))
        .route(
            "/student/notes/{id}/bookmark",
            post(rest::toggle_bookmark_handler),
        )
        .route(
            "/student/notes/{id}/annotation",
            put(rest::set_annotation_handler),
        )
        .route(
            "/student/detail/annotation",
            put(detail::save_detail_annotation_handler),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_student,
        ));

    Router::new()
        .merge(shared_routes)
        .merge(teacher_routes)
        .merge(student_routes)
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, DEFAULT_CHAT_API_BASE, DEFAULT_CHAT_MODEL};
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use notes_hub_core::{
        chat::MISSING_CREDENTIAL_MESSAGE, ChatGateway, ChatService, PortResult, UserRole,
        Workspace,
    };
    use serde_json::{json, Value};
    use std::time::Duration;
    use tower::ServiceExt;
    use tracing::Level;

    const BOUNDARY: &str = "notes-hub-boundary";

    fn test_config() -> Arc<Config> {
        Arc::new(Config {
            bind_address: "127.0.0.1:0".parse().unwrap(),
            log_level: Level::INFO,
            chat_api_key: None,
            chat_api_base: DEFAULT_CHAT_API_BASE.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            seed_sample_notes: false,
            cors_origin: "http://localhost:3000".to_string(),
        })
    }

    fn app_with(workspace: Workspace, chat: ChatGateway) -> (Arc<AppState>, Router) {
        let state = Arc::new(AppState::new(workspace, test_config(), chat));
        let router = build_router(state.clone());
        (state, router)
    }

    fn app(workspace: Workspace) -> (Arc<AppState>, Router) {
        app_with(workspace, ChatGateway::unconfigured())
    }

    async fn call(router: &Router, request: Request<Body>) -> Response {
        router.clone().oneshot(request).await.unwrap()
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn upload_request(fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> Request<Body> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((file_name, mime, bytes)) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {mime}\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method(Method::POST)
            .uri("/teacher/notes")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn teacher_workspace() -> Workspace {
        let mut workspace = Workspace::default();
        workspace.switch_role(UserRole::Teacher);
        workspace
    }

    #[tokio::test]
    async fn teacher_routes_are_closed_to_students() {
        let (_, router) = app(Workspace::default());

        let response = call(&router, upload_request(&[("title", "x")], None)).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = call(&router, empty_request(Method::GET, "/student/notes")).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn switching_role_opens_the_teacher_view_and_keeps_notes() {
        let (state, router) = app(Workspace::seeded());

        let response = call(
            &router,
            json_request(Method::PUT, "/role", json!({ "role": "Teacher" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["role"], "Teacher");

        let response = call(&router, empty_request(Method::GET, "/teacher/notes")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let view = body_json(response).await;
        assert_eq!(view["total"], 3);
        assert_eq!(state.workspace.lock().await.store().len(), 3);

        let subjects: Vec<_> = view["groups"]
            .as_array()
            .unwrap()
            .iter()
            .map(|g| g["subject"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(subjects, vec!["Computer Science", "History", "Physics"]);
    }

    #[tokio::test]
    async fn uploading_a_text_file_creates_a_note_first_in_line() {
        let (state, router) = app(teacher_workspace());

        let response = call(
            &router,
            upload_request(
                &[("subject", "Chemistry")],
                Some(("stoichiometry.txt", "text/plain", b"moles and masses".as_slice())),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let note = body_json(response).await;
        assert_eq!(note["title"], "stoichiometry");
        assert_eq!(note["content"], "moles and masses");
        assert_eq!(note["fileType"], "text");
        assert_eq!(note["isBookmarked"], false);
        assert_eq!(note["studentNote"], "");

        let workspace = state.workspace.lock().await;
        assert_eq!(workspace.store().len(), 1);
        assert_eq!(workspace.store().notes()[0].subject, "Chemistry");
    }

    #[tokio::test]
    async fn incomplete_upload_is_rejected_without_touching_the_store() {
        let (state, router) = app(teacher_workspace());

        let response = call(
            &router,
            upload_request(&[("title", "Orbitals"), ("content", "s, p, d, f")], None),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "Please fill in all fields.");
        assert!(state.workspace.lock().await.store().is_empty());
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected_with_size_message() {
        let (state, router) = app(teacher_workspace());
        let six_mib = vec![b'a'; 6 * 1024 * 1024];

        let response = call(
            &router,
            upload_request(
                &[("title", "Big"), ("subject", "Misc")],
                Some(("big.txt", "text/plain", six_mib.as_slice())),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body_text(response).await, "File size exceeds 5MB limit.");
        assert!(state.workspace.lock().await.store().is_empty());
    }

    #[tokio::test]
    async fn upload_past_body_limit_gets_size_message() {
        let (state, router) = app(teacher_workspace());
        let twelve_mib = vec![b'a'; 12 * 1024 * 1024];

        let response = call(
            &router,
            upload_request(
                &[("title", "Huge"), ("subject", "Misc")],
                Some(("huge.txt", "text/plain", twelve_mib.as_slice())),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body_text(response).await, "File size exceeds 5MB limit.");
        assert!(state.workspace.lock().await.store().is_empty());
    }

    #[tokio::test]
    async fn unsupported_upload_is_rejected() {
        let (_, router) = app(teacher_workspace());

        let response = call(
            &router,
            upload_request(
                &[("subject", "Art")],
                Some(("sketch.png", "image/png", [0x89u8, 0x50].as_slice())),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn deleting_an_unknown_note_is_a_no_op() {
        let mut workspace = Workspace::seeded();
        workspace.switch_role(UserRole::Teacher);
        let (state, router) = app(workspace);

        let uri = format!("/teacher/notes/{}", uuid::Uuid::new_v4());
        let response = call(&router, empty_request(Method::DELETE, &uri)).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(state.workspace.lock().await.store().len(), 3);
    }

    #[tokio::test]
    async fn empty_bookmark_filter_reports_missing_bookmarks() {
        let (_, router) = app(Workspace::default());

        let response = call(
            &router,
            empty_request(Method::GET, "/student/notes?filter=bookmarked"),
        )
        .await;
        let view = body_json(response).await;
        assert_eq!(view["total"], 0);
        assert_eq!(view["empty"]["hint"], "You have not bookmarked any notes yet.");
    }

    #[tokio::test]
    async fn student_search_and_bookmark_toggle() {
        let (state, router) = app(Workspace::seeded());

        let response = call(&router, empty_request(Method::GET, "/student/notes?q=PHYSICS")).await;
        let view = body_json(response).await;
        assert_eq!(view["total"], 1);
        let id = view["groups"][0]["notes"][0]["id"].as_str().unwrap().to_string();

        let uri = format!("/student/notes/{id}/bookmark");
        let response = call(&router, empty_request(Method::POST, &uri)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["isBookmarked"], true);

        let response = call(&router, empty_request(Method::POST, &uri)).await;
        assert_eq!(body_json(response).await["isBookmarked"], false);

        let workspace = state.workspace.lock().await;
        let physics = workspace.store().notes().iter().find(|n| n.subject == "Physics").unwrap();
        assert!(!physics.is_bookmarked);
    }

    #[tokio::test(start_paused = true)]
    async fn detail_annotation_save_walks_the_indicator() {
        let workspace = Workspace::seeded();
        let id = workspace.store().notes()[1].id;
        let (_, router) = app(workspace);

        let response = call(&router, empty_request(Method::POST, &format!("/detail/{id}"))).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = call(
            &router,
            json_request(
                Method::PUT,
                "/student/detail/annotation",
                json!({ "text": "Compare with the Reformation" }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let detail = body_json(response).await;
        assert_eq!(detail["saveStatus"], "saving");
        assert_eq!(detail["note"]["studentNote"], "Compare with the Reformation");

        let response = call(
            &router,
            json_request(Method::PUT, "/student/detail/annotation", json!({ "text": "again" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        tokio::time::sleep(Duration::from_millis(600)).await;
        let detail = body_json(call(&router, empty_request(Method::GET, "/detail")).await).await;
        assert_eq!(detail["saveStatus"], "saved");

        tokio::time::sleep(Duration::from_millis(2000)).await;
        let detail = body_json(call(&router, empty_request(Method::GET, "/detail")).await).await;
        assert_eq!(detail["saveStatus"], "idle");
        assert_eq!(detail["note"]["studentNote"], "Compare with the Reformation");

        let note = body_json(call(&router, empty_request(Method::GET, &format!("/notes/{id}"))).await).await;
        assert_eq!(note["studentNote"], "Compare with the Reformation");
    }

    #[tokio::test]
    async fn unknown_note_is_not_found() {
        let (_, router) = app(Workspace::default());
        let uri = format!("/notes/{}", uuid::Uuid::new_v4());
        let response = call(&router, empty_request(Method::GET, &uri)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn chat_without_credential_returns_configuration_message() {
        let (_, router) = app(Workspace::default());

        let response = call(
            &router,
            json_request(Method::POST, "/chat", json!({ "prompt": "hello" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let reply = body_json(response).await;
        assert_eq!(reply["role"], "model");
        assert_eq!(reply["text"], MISSING_CREDENTIAL_MESSAGE);
    }

    struct EchoService;

    #[async_trait]
    impl ChatService for EchoService {
        async fn generate_reply(&self, _system_instruction: &str, prompt: &str) -> PortResult<String> {
            Ok(format!("You asked: {prompt}"))
        }
    }

    #[tokio::test]
    async fn chat_forwards_prompt_to_configured_service() {
        let (_, router) = app_with(
            Workspace::default(),
            ChatGateway::new(Some(Arc::new(EchoService))),
        );

        let response = call(
            &router,
            json_request(Method::POST, "/chat", json!({ "prompt": "what is a mole?" })),
        )
        .await;
        assert_eq!(body_json(response).await["text"], "You asked: what is a mole?");
    }
}
