pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};

use crate::applications::handlers as applications;
use crate::applications::resume::MAX_RESUME_BYTES;
use crate::auth::handlers as auth;
use crate::jobs::handlers as jobs;
use crate::screening::handlers as screening;
use crate::state::AppState;
use crate::talent::handlers as talent;

/// Room for the form fields around a maximum-size resume.
const APPLY_BODY_LIMIT: usize = MAX_RESUME_BYTES + 512 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Auth
        .route("/api/v1/auth/signup", post(auth::handle_signup))
        .route("/api/v1/auth/login", post(auth::handle_login))
        .route("/api/v1/auth/logout", post(auth::handle_logout))
        .route("/api/v1/auth/me", get(auth::handle_me))
        // Jobs
        .route(
            "/api/v1/jobs",
            get(jobs::handle_list_jobs).post(jobs::handle_post_job),
        )
        .route(
            "/api/v1/jobs/:id",
            get(jobs::handle_get_job).put(jobs::handle_update_job),
        )
        .route(
            "/api/v1/jobs/:id/applications",
            get(applications::handle_job_applications)
                .post(applications::handle_apply)
                .layer(DefaultBodyLimit::max(APPLY_BODY_LIMIT)),
        )
        .route("/api/v1/jobs/:id/screen", post(screening::handle_screen_job))
        .route("/api/v1/jobs/:id/talent", get(talent::handle_talent_report))
        // Applications
        .route(
            "/api/v1/applications/mine",
            get(applications::handle_my_applications),
        )
        .route(
            "/api/v1/applications/:id",
            patch(applications::handle_update_application),
        )
        .route(
            "/api/v1/applications/:id/resume",
            get(applications::handle_get_resume),
        )
        // Talent
        .route("/api/v1/talent", get(talent::handle_talent_pool))
        .route("/api/v1/dashboard/stats", get(talent::handle_dashboard_stats))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use chrono::Utc;
    use serde_json::{json, Value};
    use tokio::sync::Notify;
    use tower::ServiceExt;

    use super::*;
    use crate::applications::storage::MemoryResumeStorage;
    use crate::auth::MemorySessionStore;
    use crate::errors::AppError;
    use crate::jobs::seed::seed_demo_jobs;
    use crate::models::{Application, ApplicationStatus, Job, Recommendation};
    use crate::screening::CandidateScreener;
    use crate::store::MemoryStore;

    const BOUNDARY: &str = "hirestream-test-boundary";
    const FAKE_PDF: &[u8] = b"%PDF-1.4\n% resume\n%%EOF\n";

    /// Scores the first applicant 90 and the rest 40, plus one verdict for an unknown id.
    struct StubScreener;

    #[async_trait]
    impl CandidateScreener for StubScreener {
        async fn screen(
            &self,
            _job: &Job,
            applications: &[Application],
        ) -> Result<Vec<Recommendation>, AppError> {
            let mut recs: Vec<Recommendation> = applications
                .iter()
                .enumerate()
                .map(|(i, app)| Recommendation {
                    application_id: app.id.to_string(),
                    score: if i == 0 { 90.4 } else { 40.0 },
                    feedback: format!("Verdict for {}", app.candidate_name),
                    strengths: None,
                    weaknesses: None,
                    recommended_actions: None,
                })
                .collect();
            recs.push(Recommendation {
                application_id: uuid::Uuid::new_v4().to_string(),
                score: 100.0,
                feedback: "stray".to_string(),
                strengths: None,
                weaknesses: None,
                recommended_actions: None,
            });
            Ok(recs)
        }

        fn backend(&self) -> &'static str {
            "stub"
        }
    }

    /// Fails every call, proving the handler never reached it.
    struct UnreachableScreener;

    #[async_trait]
    impl CandidateScreener for UnreachableScreener {
        async fn screen(&self, _job: &Job, _apps: &[Application]) -> Result<Vec<Recommendation>, AppError> {
            Err(AppError::Llm("screener should not be called".to_string()))
        }

        fn backend(&self) -> &'static str {
            "unreachable"
        }
    }

    /// Parks inside `screen` until released, then scores everyone 80.
    struct GatedScreener {
        entered: Arc<Notify>,
        release: Arc<Notify>,
    }

    #[async_trait]
    impl CandidateScreener for GatedScreener {
        async fn screen(
            &self,
            _job: &Job,
            applications: &[Application],
        ) -> Result<Vec<Recommendation>, AppError> {
            self.entered.notify_one();
            self.release.notified().await;
            Ok(applications
                .iter()
                .map(|app| Recommendation {
                    application_id: app.id.to_string(),
                    score: 80.0,
                    feedback: "Solid".to_string(),
                    strengths: None,
                    weaknesses: None,
                    recommended_actions: None,
                })
                .collect())
        }

        fn backend(&self) -> &'static str {
            "gated"
        }
    }

    fn test_state(screener: Arc<dyn CandidateScreener>) -> AppState {
        AppState {
            store: Arc::new(MemoryStore::new()),
            sessions: Arc::new(MemorySessionStore::new(3600)),
            resumes: Arc::new(MemoryResumeStorage::new()),
            screener,
        }
    }

    fn json_request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    fn apply_request(
        job_id: &str,
        token: &str,
        skills: &str,
        resume: Option<(&str, &[u8])>,
    ) -> Request<Body> {
        apply_request_with(job_id, token, &[("skills", skills)], resume)
    }

    fn apply_request_with(
        job_id: &str,
        token: &str,
        fields: &[(&str, &str)],
        resume: Option<(&str, &[u8])>,
    ) -> Request<Body> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((content_type, data)) = resume {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"resume\"; filename=\"cv.pdf\"\r\nContent-Type: {content_type}\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(format!("/api/v1/jobs/{job_id}/applications"))
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    async fn signup(app: &Router, name: &str, email: &str, role: &str) -> String {
        let (status, body) = send(
            app,
            json_request(
                "POST",
                "/api/v1/auth/signup",
                None,
                Some(json!({"name": name, "email": email, "password": "secret123", "role": role})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "signup failed: {body}");
        body["token"].as_str().unwrap().to_string()
    }

    async fn post_job(app: &Router, token: &str) -> String {
        let (status, body) = send(
            app,
            json_request(
                "POST",
                "/api/v1/jobs",
                Some(token),
                Some(json!({
                    "title": "Rust Engineer",
                    "company": "Ferrous Inc",
                    "description": "Build services",
                    "requirements": "Rust, Tokio, SQL",
                    "location": "Remote",
                    "salary": "$150k"
                })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "post job failed: {body}");
        body["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let app = build_router(test_state(Arc::new(StubScreener)));
        let (status, body) = send(&app, json_request("GET", "/health", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "hirestream-api");
    }

    #[tokio::test]
    async fn test_signup_me_logout_cycle() {
        let app = build_router(test_state(Arc::new(StubScreener)));
        let token = signup(&app, "Ada", " Ada@Example.com ", "CANDIDATE").await;

        let (status, me) = send(&app, json_request("GET", "/api/v1/auth/me", Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["email"], "ada@example.com");
        assert_eq!(me["role"], "CANDIDATE");
        assert!(me.get("password_hash").is_none());

        let (status, _) = send(&app, json_request("POST", "/api/v1/auth/logout", Some(&token), None)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, json_request("POST", "/api/v1/auth/logout", Some(&token), None)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&app, json_request("GET", "/api/v1/auth/me", Some(&token), None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_duplicate_signup_and_bad_login() {
        let app = build_router(test_state(Arc::new(StubScreener)));
        signup(&app, "Hana", "hana@corp.com", "HR").await;

        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/api/v1/auth/signup",
                None,
                Some(json!({"name": "Other", "email": "HANA@corp.com", "password": "secret123", "role": "HR"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["message"], "Email already registered");

        let (status, _) = send(
            &app,
            json_request(
                "POST",
                "/api/v1/auth/login",
                None,
                Some(json!({"email": "hana@corp.com", "password": "wrong-password"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/api/v1/auth/login",
                None,
                Some(json!({"email": "Hana@Corp.com", "password": "secret123"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["role"], "HR");
    }

    #[tokio::test]
    async fn test_job_role_guards_and_visibility() {
        let app = build_router(test_state(Arc::new(StubScreener)));
        let hr = signup(&app, "Hana", "hana@corp.com", "HR").await;
        let candidate = signup(&app, "Ada", "ada@example.com", "CANDIDATE").await;

        let (status, _) = send(&app, json_request("GET", "/api/v1/jobs", None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let draft = json!({
            "title": "X", "company": "Y", "description": "Z",
            "requirements": ["A"], "location": "L", "salary": "S"
        });
        let (status, _) = send(&app, json_request("POST", "/api/v1/jobs", Some(&candidate), Some(draft))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let job_id = post_job(&app, &hr).await;
        let (status, body) = send(&app, json_request("GET", "/api/v1/jobs", Some(&hr), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["requirements"], json!(["Rust", "Tokio", "SQL"]));
        assert_eq!(body[0]["applicant_count"], 0);

        let (status, _) = send(
            &app,
            json_request(
                "PUT",
                &format!("/api/v1/jobs/{job_id}"),
                Some(&hr),
                Some(json!({
                    "title": "Rust Engineer", "company": "Ferrous Inc", "description": "Build services",
                    "requirements": ["Rust"], "location": "Remote", "salary": "$150k", "is_active": false
                })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, listed) = send(&app, json_request("GET", "/api/v1/jobs", Some(&candidate), None)).await;
        assert_eq!(listed, json!([]));
        let (status, _) = send(
            &app,
            json_request("GET", &format!("/api/v1/jobs/{job_id}"), Some(&candidate), None),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_apply_validation() {
        let app = build_router(test_state(Arc::new(StubScreener)));
        let hr = signup(&app, "Hana", "hana@corp.com", "HR").await;
        let candidate = signup(&app, "Ada", "ada@example.com", "CANDIDATE").await;
        let job_id = post_job(&app, &hr).await;

        let (status, body) = send(&app, apply_request(&job_id, &candidate, "Rust", None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Please upload your resume PDF.");

        let (status, body) = send(
            &app,
            apply_request(&job_id, &candidate, "Rust", Some(("text/plain", b"hello"))),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Please upload a PDF file.");

        let (status, _) = send(
            &app,
            apply_request(&job_id, &hr, "Rust", Some(("application/pdf", FAKE_PDF))),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(
            &app,
            apply_request(&job_id, &candidate, "Rust, Tokio", Some(("application/pdf", FAKE_PDF))),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, _) = send(
            &app,
            apply_request(&job_id, &candidate, "Rust", Some(("application/pdf", FAKE_PDF))),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_apply_review_and_resume_access() {
        let app = build_router(test_state(Arc::new(StubScreener)));
        let hr = signup(&app, "Hana", "hana@corp.com", "HR").await;
        let ada = signup(&app, "Ada", "ada@example.com", "CANDIDATE").await;
        let bo = signup(&app, "Bo", "bo@example.com", "CANDIDATE").await;
        let job_id = post_job(&app, &hr).await;

        let (status, application) = send(
            &app,
            apply_request(&job_id, &ada, "Rust, Tokio", Some(("application/pdf", FAKE_PDF))),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(application["candidate_name"], "Ada");
        assert_eq!(application["skills"], json!(["Rust", "Tokio"]));
        assert_eq!(application["status"], "PENDING");
        assert!(application["resume_text"].as_str().unwrap().starts_with("Skills: Rust, Tokio"));
        let app_id = application["id"].as_str().unwrap().to_string();

        let (_, mine) = send(&app, json_request("GET", "/api/v1/applications/mine", Some(&ada), None)).await;
        assert_eq!(mine[0]["id"], app_id.as_str());
        assert_eq!(mine[0]["job"]["company"], "Ferrous Inc");

        let (status, listed) = send(
            &app,
            json_request("GET", &format!("/api/v1/jobs/{job_id}/applications"), Some(&hr), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(listed[0]["viewed_at"].is_string());

        let (status, updated) = send(
            &app,
            json_request(
                "PATCH",
                &format!("/api/v1/applications/{app_id}"),
                Some(&hr),
                Some(json!({"status": "SHORTLISTED", "notes": "  call back  "})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["status"], "SHORTLISTED");
        assert_eq!(updated["notes"], "call back");

        let resume_uri = format!("/api/v1/applications/{app_id}/resume");
        let response = app
            .clone()
            .oneshot(json_request("GET", &resume_uri, Some(&ada), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "inline; filename=\"cv.pdf\""
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], FAKE_PDF);

        let (status, _) = send(&app, json_request("GET", &resume_uri, Some(&bo), None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = send(&app, json_request("GET", &resume_uri, Some(&hr), None)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_screen_then_talent_views() {
        let app = build_router(test_state(Arc::new(StubScreener)));
        let hr = signup(&app, "Hana", "hana@corp.com", "HR").await;
        let ada = signup(&app, "Ada", "ada@example.com", "CANDIDATE").await;
        let bo = signup(&app, "Bo", "bo@example.com", "CANDIDATE").await;
        let job_id = post_job(&app, &hr).await;

        for (token, skills) in [(&ada, "Rust, SQL"), (&bo, "rust, Go")] {
            let (status, _) = send(
                &app,
                apply_request(&job_id, token, skills, Some(("application/pdf", FAKE_PDF))),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (_, before) = send(
            &app,
            json_request("GET", &format!("/api/v1/jobs/{job_id}/talent"), Some(&hr), None),
        )
        .await;
        assert_eq!(before["headline"], "2 Candidates Pending Screen");

        let (status, _) = send(
            &app,
            json_request("POST", &format!("/api/v1/jobs/{job_id}/screen"), Some(&ada), None),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, result) = send(
            &app,
            json_request("POST", &format!("/api/v1/jobs/{job_id}/screen"), Some(&hr), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(result["screened"], 2);
        assert_eq!(result["backend"], "stub");
        assert_eq!(result["applications"][0]["ai_score"], 90);
        assert_eq!(result["applications"][0]["ai_feedback"], "Verdict for Ada");
        assert_eq!(result["applications"][1]["ai_score"], 40);

        let (_, report) = send(
            &app,
            json_request("GET", &format!("/api/v1/jobs/{job_id}/talent"), Some(&hr), None),
        )
        .await;
        assert_eq!(report["headline"], "1 high-potential match");
        assert_eq!(report["primary_recommendation"]["candidate_name"], "Ada");
        assert_eq!(report["low_matches"][0]["candidate_name"], "Bo");

        let (_, pool) = send(&app, json_request("GET", "/api/v1/talent", Some(&hr), None)).await;
        assert_eq!(pool[0]["high_match_count"], 1);
        assert_eq!(pool[0]["has_unscreened"], false);

        let (status, stats) = send(&app, json_request("GET", "/api/v1/dashboard/stats", Some(&hr), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats["total_jobs"], 1);
        assert_eq!(stats["total_applications"], 2);
        assert_eq!(stats["pending_applications"], 2);
        assert_eq!(stats["average_ai_score"], 65.0);
        assert_eq!(stats["top_skills"], json!(["rust", "go", "sql"]));
    }

    #[tokio::test]
    async fn test_screen_without_applications_skips_screener() {
        let state = test_state(Arc::new(UnreachableScreener));
        seed_demo_jobs(state.store.as_ref()).await.unwrap();
        let job_id = state.store.list_jobs().await.unwrap()[0].id;
        let app = build_router(state);
        let hr = signup(&app, "Hana", "hana@corp.com", "HR").await;

        let (status, result) = send(
            &app,
            json_request("POST", &format!("/api/v1/jobs/{job_id}/screen"), Some(&hr), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(result["screened"], 0);
        assert_eq!(result["applications"], json!([]));
    }

    #[tokio::test]
    async fn test_unknown_job_is_not_found() {
        let app = build_router(test_state(Arc::new(StubScreener)));
        let hr = signup(&app, "Hana", "hana@corp.com", "HR").await;
        let missing = uuid::Uuid::new_v4();

        for uri in [
            format!("/api/v1/jobs/{missing}"),
            format!("/api/v1/jobs/{missing}/talent"),
        ] {
            let (status, body) = send(&app, json_request("GET", &uri, Some(&hr), None)).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(body["error"]["code"], "NOT_FOUND");
        }
    }

    async fn apply_ok(app: &Router, job_id: &str, token: &str, skills: &str) -> String {
        let (status, body) = send(
            app,
            apply_request(job_id, token, skills, Some(("application/pdf", FAKE_PDF))),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "apply failed: {body}");
        body["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_review_during_screening_is_kept() {
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let app = build_router(test_state(Arc::new(GatedScreener {
            entered: entered.clone(),
            release: release.clone(),
        })));
        let hr = signup(&app, "Hana", "hana@corp.com", "HR").await;
        let ada = signup(&app, "Ada", "ada@example.com", "CANDIDATE").await;
        let job_id = post_job(&app, &hr).await;
        let app_id = apply_ok(&app, &job_id, &ada, "Rust").await;

        let screening = tokio::spawn({
            let app = app.clone();
            let uri = format!("/api/v1/jobs/{job_id}/screen");
            let hr = hr.clone();
            async move { send(&app, json_request("POST", &uri, Some(&hr), None)).await }
        });
        entered.notified().await;

        let (status, _) = send(
            &app,
            json_request(
                "PATCH",
                &format!("/api/v1/applications/{app_id}"),
                Some(&hr),
                Some(json!({"status": "SHORTLISTED", "notes": "call"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let (_, listed) = send(
            &app,
            json_request("GET", &format!("/api/v1/jobs/{job_id}/applications"), Some(&hr), None),
        )
        .await;
        let viewed_at = listed[0]["viewed_at"].clone();
        assert!(viewed_at.is_string());

        release.notify_one();
        let (status, result) = screening.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(result["screened"], 1);

        let (_, after) = send(
            &app,
            json_request("GET", &format!("/api/v1/jobs/{job_id}/applications"), Some(&hr), None),
        )
        .await;
        for row in [&result["applications"][0], &after[0]] {
            assert_eq!(row["status"], "SHORTLISTED");
            assert_eq!(row["notes"], "call");
            assert_eq!(row["ai_score"], 80);
            assert_eq!(row["viewed_at"], viewed_at);
        }
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_apply_keeps_one() {
        let state = test_state(Arc::new(StubScreener));
        let resumes = Arc::new(MemoryResumeStorage::new());
        let state = AppState {
            resumes: resumes.clone(),
            ..state
        };
        let store = state.store.clone();
        let app = build_router(state);
        let hr = signup(&app, "Hana", "hana@corp.com", "HR").await;
        let ada = signup(&app, "Ada", "ada@example.com", "CANDIDATE").await;
        let job_id = post_job(&app, &hr).await;

        let pdf = Some(("application/pdf", FAKE_PDF));
        let (first, second) = tokio::join!(
            send(&app, apply_request(&job_id, &ada, "Rust", pdf)),
            send(&app, apply_request(&job_id, &ada, "Rust", pdf)),
        );
        let statuses = [first.0, second.0];
        assert_eq!(statuses.iter().filter(|s| **s == StatusCode::CREATED).count(), 1);
        assert_eq!(statuses.iter().filter(|s| **s == StatusCode::CONFLICT).count(), 1);

        let stored = store
            .list_applications(crate::store::ApplicationFilter::All)
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(resumes.object_count().await, 1);
    }

    #[tokio::test]
    async fn test_applications_belong_to_the_filing_account() {
        let app = build_router(test_state(Arc::new(StubScreener)));
        let hr = signup(&app, "Hana", "hana@corp.com", "HR").await;
        let ada = signup(&app, "Ada", "ada@example.com", "CANDIDATE").await;
        let bo = signup(&app, "Bo", "bo@example.com", "CANDIDATE").await;
        let job_id = post_job(&app, &hr).await;

        // Bo files under Ada's email address.
        let (status, filed) = send(
            &app,
            apply_request_with(
                &job_id,
                &bo,
                &[("skills", "Rust"), ("candidate_email", "ada@example.com")],
                Some(("application/pdf", FAKE_PDF)),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let app_id = filed["id"].as_str().unwrap();

        let (_, ada_mine) = send(&app, json_request("GET", "/api/v1/applications/mine", Some(&ada), None)).await;
        assert_eq!(ada_mine, json!([]));
        let (_, bo_mine) = send(&app, json_request("GET", "/api/v1/applications/mine", Some(&bo), None)).await;
        assert_eq!(bo_mine[0]["id"], app_id);

        let resume_uri = format!("/api/v1/applications/{app_id}/resume");
        let (status, _) = send(&app, json_request("GET", &resume_uri, Some(&ada), None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = send(&app, json_request("GET", &resume_uri, Some(&bo), None)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_apply_to_inactive_job_is_rejected() {
        let app = build_router(test_state(Arc::new(StubScreener)));
        let hr = signup(&app, "Hana", "hana@corp.com", "HR").await;
        let ada = signup(&app, "Ada", "ada@example.com", "CANDIDATE").await;
        let job_id = post_job(&app, &hr).await;

        let (status, _) = send(
            &app,
            json_request(
                "PUT",
                &format!("/api/v1/jobs/{job_id}"),
                Some(&hr),
                Some(json!({
                    "title": "Rust Engineer", "company": "Ferrous Inc", "description": "Build services",
                    "requirements": ["Rust"], "location": "Remote", "salary": "$150k", "is_active": false
                })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            &app,
            apply_request(&job_id, &ada, "Rust", Some(("application/pdf", FAKE_PDF))),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Job is no longer accepting applications");
    }

    #[tokio::test]
    async fn test_oversized_resumes_are_rejected() {
        let app = build_router(test_state(Arc::new(StubScreener)));
        let hr = signup(&app, "Hana", "hana@corp.com", "HR").await;
        let ada = signup(&app, "Ada", "ada@example.com", "CANDIDATE").await;
        let job_id = post_job(&app, &hr).await;

        // Just over the resume cap: caught by the PDF check.
        let mut over_cap = b"%PDF-1.4\n".to_vec();
        over_cap.resize(MAX_RESUME_BYTES + 1, b' ');
        // Over the whole request limit: caught while reading the form.
        let mut over_limit = b"%PDF-1.4\n".to_vec();
        over_limit.resize(APPLY_BODY_LIMIT + 1, b' ');

        for data in [over_cap, over_limit] {
            let (status, body) = send(
                &app,
                apply_request(&job_id, &ada, "Rust", Some(("application/pdf", &data))),
            )
            .await;
            assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
            assert_eq!(body["error"]["code"], "PAYLOAD_TOO_LARGE");
        }
    }

    #[tokio::test]
    async fn test_review_edge_cases() {
        let app = build_router(test_state(Arc::new(StubScreener)));
        let hr = signup(&app, "Hana", "hana@corp.com", "HR").await;
        let ada = signup(&app, "Ada", "ada@example.com", "CANDIDATE").await;
        let job_id = post_job(&app, &hr).await;
        let app_id = apply_ok(&app, &job_id, &ada, "Rust").await;

        let (status, _) = send(
            &app,
            json_request(
                "PATCH",
                &format!("/api/v1/applications/{}", uuid::Uuid::new_v4()),
                Some(&hr),
                Some(json!({"status": "REVIEWED"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let patch_uri = format!("/api/v1/applications/{app_id}");
        let (_, noted) = send(
            &app,
            json_request("PATCH", &patch_uri, Some(&hr), Some(json!({"notes": "strong"}))),
        )
        .await;
        assert_eq!(noted["notes"], "strong");
        let (status, cleared) = send(
            &app,
            json_request("PATCH", &patch_uri, Some(&hr), Some(json!({"notes": "   "}))),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(cleared["notes"].is_null());
        assert_eq!(cleared["status"], "PENDING");

        let list_uri = format!("/api/v1/jobs/{job_id}/applications");
        let (_, first) = send(&app, json_request("GET", &list_uri, Some(&hr), None)).await;
        let (_, second) = send(&app, json_request("GET", &list_uri, Some(&hr), None)).await;
        assert!(first[0]["viewed_at"].is_string());
        assert_eq!(first[0]["viewed_at"], second[0]["viewed_at"]);
    }

    #[tokio::test]
    async fn test_resume_download_without_stored_pdf() {
        let state = test_state(Arc::new(StubScreener));
        let store = state.store.clone();
        let app = build_router(state);
        let hr = signup(&app, "Hana", "hana@corp.com", "HR").await;
        let job_id = post_job(&app, &hr).await;

        let legacy = Application {
            id: uuid::Uuid::new_v4(),
            job_id: job_id.parse().unwrap(),
            candidate_id: None,
            candidate_name: "Imported".to_string(),
            candidate_email: "imported@example.com".to_string(),
            resume_text: "Skills: Rust".to_string(),
            resume_key: None,
            resume_file_name: None,
            skills: vec!["Rust".to_string()],
            applied_at: Utc::now(),
            status: ApplicationStatus::Pending,
            ai_score: None,
            ai_feedback: None,
            viewed_at: None,
            notes: None,
        };
        store.insert_application(&legacy).await.unwrap();

        let (status, body) = send(
            &app,
            json_request("GET", &format!("/api/v1/applications/{}/resume", legacy.id), Some(&hr), None),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["message"], "No PDF resume available.");
    }
}
