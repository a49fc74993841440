use axum::{
    async_trait,
    extract::{
        rejection::{JsonRejection, PathRejection},
        FromRequest, Path, Request, State,
    },
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Form, Json, Router,
};
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::{
    auth::extractors::RequestContext,
    error::AppError,
    state::AppState,
    wods::{
        dto::{
            DeleteWodRequest, DeleteWodResponse, GeneratedWorkout, SaveWodRequest, WorkoutRequest,
        },
        form::{FormOptions, WodForm},
        render,
        repo_types::StoredWorkout,
        services,
    },
};

// --- public routers ---

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/wod/options", get(options))
        .route("/wod/list", get(list_wods))
        .route("/wod/:id", get(get_wod))
        .route("/wod/:id/markdown", get(get_wod_markdown))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/wod/generate", post(generate))
        .route("/wod/preview", post(preview))
        .route("/wod/save", post(save))
        .route("/wod/delete", post(delete_wod))
}

/// Generation input: JSON `WorkoutRequest`, or the raw intake form when url-encoded.
#[derive(Debug)]
pub struct GenerateInput(pub WorkoutRequest);

#[async_trait]
impl<S> FromRequest<S> for GenerateInput
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.starts_with("application/x-www-form-urlencoded"))
            .unwrap_or(false);

        if is_form {
            let Form(form) = Form::<WodForm>::from_request(req, state)
                .await
                .map_err(|e| AppError::Validation(e.body_text()))?;
            form.into_request().map(GenerateInput).map_err(AppError::Validation)
        } else {
            let Json(body) = Json::<WorkoutRequest>::from_request(req, state)
                .await
                .map_err(bad_json)?;
            Ok(GenerateInput(body))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub request: WorkoutRequest,
    pub workout: GeneratedWorkout,
}

// --- handlers ---

pub async fn options() -> Json<FormOptions> {
    Json(FormOptions::current())
}

#[instrument(skip(state, ctx, input))]
pub async fn generate(
    State(state): State<AppState>,
    ctx: RequestContext,
    input: Result<GenerateInput, AppError>,
) -> Result<Json<GeneratedWorkout>, AppError> {
    let user = ctx.require_user()?;
    let GenerateInput(req) = input?;
    info!(user_id = user.id, strategy = %req.strategy, duration = req.duration, "generating wod");
    let wod = state.generator.generate(&req).await?;
    Ok(Json(wod))
}

#[instrument(skip(ctx, payload))]
pub async fn preview(
    ctx: RequestContext,
    payload: Result<Json<PreviewRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    ctx.require_user()?;
    let Json(body) = payload.map_err(bad_json)?;
    body.request.validate().map_err(AppError::Validation)?;
    Ok(markdown(render::generated_markdown(&body.request, &body.workout)))
}

#[instrument(skip(state, ctx, payload))]
pub async fn save(
    State(state): State<AppState>,
    ctx: RequestContext,
    payload: Result<Json<SaveWodRequest>, JsonRejection>,
) -> Result<Json<Option<StoredWorkout>>, AppError> {
    let user = ctx.require_user()?;
    let Json(body) = payload.map_err(bad_json)?;
    let new_wod = body.into_new_wod()?;
    let created = services::create(state.wods.as_ref(), user.id, new_wod).await?;
    Ok(Json(created))
}

#[instrument(skip(state, ctx))]
pub async fn list_wods(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<Vec<StoredWorkout>>, AppError> {
    let user = ctx.require_user()?;
    let rows = services::list_by_owner(state.wods.as_ref(), user.id).await?;
    Ok(Json(rows))
}

#[instrument(skip(state, ctx, id))]
pub async fn get_wod(
    State(state): State<AppState>,
    ctx: RequestContext,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<StoredWorkout>, AppError> {
    let user = ctx.require_user()?;
    let Path(id) = id.map_err(|e| AppError::Validation(e.body_text()))?;
    Ok(Json(owned_wod(&state, user.id, id).await?))
}

#[instrument(skip(state, ctx, id))]
pub async fn get_wod_markdown(
    State(state): State<AppState>,
    ctx: RequestContext,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let user = ctx.require_user()?;
    let Path(id) = id.map_err(|e| AppError::Validation(e.body_text()))?;
    let wod = owned_wod(&state, user.id, id).await?;
    Ok(markdown(render::stored_markdown(&wod)))
}

#[instrument(skip(state, ctx, payload))]
pub async fn delete_wod(
    State(state): State<AppState>,
    ctx: RequestContext,
    payload: Result<Json<DeleteWodRequest>, JsonRejection>,
) -> Result<Json<DeleteWodResponse>, AppError> {
    let user = ctx.require_user()?;
    let Json(body) = payload.map_err(bad_json)?;
    let success = services::delete_by_id(state.wods.as_ref(), user.id, body.id).await?;
    Ok(Json(DeleteWodResponse { success }))
}

async fn owned_wod(state: &AppState, user_id: i64, id: i64) -> Result<StoredWorkout, AppError> {
    match services::get_by_id(state.wods.as_ref(), id).await? {
        Some(wod) if wod.user_id == user_id => Ok(wod),
        Some(_) => {
            warn!(user_id, wod_id = id, "wod belongs to another user");
            Err(AppError::NotFound)
        }
        None => Err(AppError::NotFound),
    }
}

fn markdown(body: String) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/markdown; charset=utf-8")], body)
}

fn bad_json(e: JsonRejection) -> AppError {
    AppError::Validation(e.body_text())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{mock_users::MockUsers, repo_types::User, services::SessionKeys};
    use crate::llm::mock_llm::{sample_reply, MockLlm};
    use crate::wods::dto::decode_list;
    use crate::wods::mock_repo::{MockMode, MockWodRepo};
    use axum::{
        body::{to_bytes, Body},
        extract::FromRef,
        http::{Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct Harness {
        state: AppState,
        repo: Arc<MockWodRepo>,
        llm: Arc<MockLlm>,
    }

    impl Harness {
        fn new() -> Self {
            Self::build(MockWodRepo::default(), MockLlm::replying(sample_reply().to_string()))
        }

        fn build(repo: MockWodRepo, llm: MockLlm) -> Self {
            let users = MockUsers::with_user(1, "coach-1");
            let second = User {
                id: 2,
                open_id: "coach-2".into(),
                ..users.users.lock().unwrap()[0].clone()
            };
            users.users.lock().unwrap().push(second);
            let repo = Arc::new(repo);
            let llm = Arc::new(llm);
            let state = AppState::fake()
                .with_users(Arc::new(users))
                .with_wods(repo.clone())
                .with_llm(llm.clone());
            Self { state, repo, llm }
        }

        fn token(&self, user_id: i64) -> String {
            SessionKeys::from_ref(&self.state).sign(user_id).unwrap()
        }

        async fn send(&self, req: Request<Body>) -> Response {
            Router::new()
                .merge(read_routes())
                .merge(write_routes())
                .with_state(self.state.clone())
                .oneshot(req)
                .await
                .unwrap()
        }

        async fn post_json(&self, uri: &str, user: Option<i64>, body: Value) -> Response {
            let mut req = Request::post(uri).header("content-type", "application/json");
            if let Some(id) = user {
                req = req.header("authorization", format!("Bearer {}", self.token(id)));
            }
            self.send(req.body(Body::from(body.to_string())).unwrap()).await
        }

        async fn get(&self, uri: &str, user: Option<i64>) -> Response {
            let mut req = Request::get(uri);
            if let Some(id) = user {
                req = req.header("cookie", format!("app_session_id={}", self.token(id)));
            }
            self.send(req.body(Body::empty()).unwrap()).await
        }
    }

    async fn json_body(res: Response) -> Value {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn generate_body(duration: i32) -> Value {
        json!({
            "strategy": "AMRAP",
            "duration": duration,
            "difficulty": "Intermediate",
            "focusArea": "Full Body"
        })
    }

    fn save_body() -> Value {
        let wod: GeneratedWorkout = serde_json::from_value(sample_reply()).unwrap();
        let req: WorkoutRequest = serde_json::from_value(generate_body(20)).unwrap();
        serde_json::to_value(SaveWodRequest::from_generated(&req, &wod)).unwrap()
    }

    #[tokio::test]
    async fn protected_routes_reject_anonymous_callers_without_side_effects() {
        let h = Harness::new();

        let res = h.post_json("/wod/generate", None, generate_body(20)).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(res).await["error"], "unauthorized");

        let res = h.post_json("/wod/save", None, save_body()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let res = h.get("/wod/list", None).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let res = h.post_json("/wod/delete", None, json!({"id": 1})).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        assert_eq!(h.repo.call_count(), 0);
        assert_eq!(h.llm.calls(), 0);
    }

    #[tokio::test]
    async fn forged_session_is_anonymous() {
        let h = Harness::new();
        let res = h
            .send(
                Request::get("/wod/list")
                    .header("authorization", "Bearer not.a.token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(h.repo.call_count(), 0);
    }

    #[tokio::test]
    async fn failing_user_store_is_a_server_error_not_a_logout() {
        let h = Harness::new();
        let token = h.token(1);

        let mut failing = MockUsers::with_user(1, "coach-1");
        failing.failing = true;
        let state = h.state.clone().with_users(Arc::new(failing));
        let res = Router::new()
            .merge(read_routes())
            .with_state(state)
            .oneshot(
                Request::get("/wod/list")
                    .header("authorization", format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(res).await["error"], "storage_error");
        assert_eq!(h.repo.call_count(), 0);
    }

    #[tokio::test]
    async fn unavailable_user_store_leaves_the_caller_anonymous() {
        let h = Harness::new();
        let token = h.token(1);

        let mut down = MockUsers::with_user(1, "coach-1");
        down.unavailable = true;
        let state = h.state.clone().with_users(Arc::new(down));
        let res = Router::new()
            .merge(read_routes())
            .with_state(state)
            .oneshot(
                Request::get("/wod/list")
                    .header("authorization", format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn generate_returns_the_structured_workout() {
        let h = Harness::new();
        let res = h.post_json("/wod/generate", Some(1), generate_body(20)).await;
        assert_eq!(res.status(), StatusCode::OK);

        let json = json_body(res).await;
        for field in ["title", "description", "warmup", "mainWorkout", "cooldown", "notes"] {
            assert!(json[field].is_string(), "{} should be a string", field);
        }
        assert!(json["movements"].is_array());
        assert!(json["equipment"].is_array());
        assert_eq!(h.repo.call_count(), 0);
    }

    #[tokio::test]
    async fn generate_enforces_duration_bounds() {
        let h = Harness::new();
        for (duration, expected) in [
            (4, StatusCode::BAD_REQUEST),
            (121, StatusCode::BAD_REQUEST),
            (5, StatusCode::OK),
            (120, StatusCode::OK),
        ] {
            let res = h.post_json("/wod/generate", Some(1), generate_body(duration)).await;
            assert_eq!(res.status(), expected, "duration {}", duration);
        }
        assert_eq!(h.llm.calls(), 2);
    }

    #[tokio::test]
    async fn generate_rejects_unknown_strategy() {
        let h = Harness::new();
        let mut body = generate_body(20);
        body["strategy"] = json!("Tabata");
        let res = h.post_json("/wod/generate", Some(1), body).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(res).await["error"], "validation_error");
        assert_eq!(h.llm.calls(), 0);
    }

    #[tokio::test]
    async fn generate_accepts_the_intake_form() {
        let h = Harness::new();
        let req = Request::post("/wod/generate")
            .header("content-type", "application/x-www-form-urlencoded")
            .header("authorization", format!("Bearer {}", h.token(1)))
            .body(Body::from(
                "strategy=For+Time&duration=30&difficulty=Advanced\
                 &focusArea=Cardio&movements=Row%2C+Burpee",
            ))
            .unwrap();
        let res = h.send(req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let sent = h.llm.requests.lock().unwrap();
        assert!(sent[0].user.contains("Workout Type: For Time"));
        assert!(sent[0].user.contains("Required Movements: Row, Burpee"));
    }

    #[tokio::test]
    async fn malformed_model_reply_is_a_bad_gateway() {
        let mut reply = sample_reply();
        reply.as_object_mut().unwrap().remove("notes");
        let h = Harness::build(MockWodRepo::default(), MockLlm::replying(reply.to_string()));

        let res = h.post_json("/wod/generate", Some(1), generate_body(20)).await;
        assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(json_body(res).await["error"], "malformed_response");
    }

    #[tokio::test]
    async fn save_then_list_round_trips() {
        let h = Harness::new();
        let res = h.post_json("/wod/save", Some(1), save_body()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let saved = json_body(res).await;
        assert_eq!(saved["userId"], 1);
        assert_eq!(saved["strategy"], "AMRAP");

        let list = json_body(h.get("/wod/list", Some(1)).await).await;
        let rows = list.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(
            decode_list(rows[0]["movements"].as_str().unwrap()).unwrap(),
            vec!["Wall Ball", "Pull-up", "Run"]
        );
        assert_eq!(
            decode_list(rows[0]["equipment"].as_str().unwrap()).unwrap(),
            vec!["Medicine Ball", "Pull-up Bar"]
        );

        let other = json_body(h.get("/wod/list", Some(2)).await).await;
        assert!(other.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_rejects_unserialised_lists() {
        let h = Harness::new();
        let mut body = save_body();
        body["movements"] = json!("Wall Ball, Pull-up");
        let res = h.post_json("/wod/save", Some(1), body).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(h.repo.call_count(), 0);
    }

    #[tokio::test]
    async fn save_returns_null_when_storage_is_unavailable() {
        let h = Harness::build(
            MockWodRepo::with_mode(MockMode::Unavailable),
            MockLlm::replying(sample_reply().to_string()),
        );
        let res = h.post_json("/wod/save", Some(1), save_body()).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(json_body(res).await, Value::Null);

        let res = h.get("/wod/list", Some(1)).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(json_body(res).await, json!([]));
    }

    #[tokio::test]
    async fn list_surfaces_database_failures() {
        let h = Harness::build(
            MockWodRepo::with_mode(MockMode::Failing),
            MockLlm::replying(sample_reply().to_string()),
        );
        let res = h.get("/wod/list", Some(1)).await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn delete_is_scoped_to_the_owner() {
        let h = Harness::new();
        let saved = json_body(h.post_json("/wod/save", Some(1), save_body()).await).await;
        let id = saved["id"].as_i64().unwrap();

        let res = h.post_json("/wod/delete", Some(1), json!({"id": 9999})).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(json_body(res).await["success"], false);

        let res = h.post_json("/wod/delete", Some(2), json!({"id": id})).await;
        assert_eq!(json_body(res).await["success"], false);

        let res = h.post_json("/wod/delete", Some(1), json!({"id": id})).await;
        assert_eq!(json_body(res).await["success"], true);

        let list = json_body(h.get("/wod/list", Some(1)).await).await;
        assert!(list.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn single_wod_is_owner_only() {
        let h = Harness::new();
        let saved = json_body(h.post_json("/wod/save", Some(1), save_body()).await).await;
        let id = saved["id"].as_i64().unwrap();

        let res = h.get(&format!("/wod/{}", id), Some(1)).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(json_body(res).await["title"], "Engine Builder");

        let res = h.get(&format!("/wod/{}", id), Some(2)).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let res = h.get("/wod/12345", Some(1)).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn markdown_export_and_preview() {
        let h = Harness::new();
        let saved = json_body(h.post_json("/wod/save", Some(1), save_body()).await).await;
        let id = saved["id"].as_i64().unwrap();

        let res = h.get(&format!("/wod/{}/markdown", id), Some(1)).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers()["content-type"].to_str().unwrap().starts_with("text/markdown"));
        let text = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(text.to_vec()).unwrap();
        assert!(text.starts_with("# Engine Builder"));
        assert!(text.contains("`AMRAP` · `20 min` · `Intermediate`"));

        let res = h
            .post_json(
                "/wod/preview",
                Some(1),
                json!({"request": generate_body(20), "workout": sample_reply()}),
            )
            .await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn options_are_public() {
        let h = Harness::new();
        let res = h.get("/wod/options", None).await;
        assert_eq!(res.status(), StatusCode::OK);
        let json = json_body(res).await;
        assert_eq!(json["strategies"][2], "For Time");
        assert_eq!(json["minDuration"], 5);
        assert_eq!(json["maxDuration"], 120);
    }
}
