//! Server-rendered pages: home, counter, and the counter button triggers.
//!
//! The buttons are plain HTML forms. Each POST runs the operation and
//! redirects back to the counter page with a notice (post/redirect/get), so
//! a browser refresh never repeats the mutation.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{Html, Redirect},
    routing::{get, post},
    Router,
};
use counterctl_core::CounterRepo;
use serde::Deserialize;

use crate::http::error::ApiError;
use crate::http::server::AppState;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; background: #f8fafc; color: #1f2937; }
main { max-width: 28rem; margin: 4rem auto; padding: 1.5rem; text-align: center; }
.card { background: #fff; border-radius: 0.75rem; box-shadow: 0 4px 12px rgba(0,0,0,.08); padding: 2rem; }
.value { font-size: 3.75rem; font-weight: 700; color: #5898d4; margin: 1rem 0 2rem; }
.actions { display: flex; gap: 1rem; justify-content: center; }
.actions form { margin: 0; }
button, .button { border: 0; border-radius: 0.5rem; padding: 0.75rem 1.5rem; font-size: 1rem; color: #fff; background: #5898d4; cursor: pointer; text-decoration: none; }
button.secondary { background: #6b7280; }
.info { margin-top: 1rem; padding: 1rem; background: #eff6ff; border-left: 4px solid #3b82f6; color: #1e40af; font-size: 0.875rem; text-align: left; }
.notice { margin-bottom: 1rem; padding: 0.75rem; border-radius: 0.5rem; }
.notice.positive { background: #dcfce7; color: #166534; }
.notice.info { background: #e0f2fe; color: #075985; }
"#;

/// Notification shown after a button press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Notice {
    Incremented(i64),
    Reset,
}

impl Notice {
    /// Unknown or incomplete values are ignored rather than rejected
    fn parse(params: &CounterPageParams) -> Option<Self> {
        match params.notice.as_deref()? {
            "incremented" => {
                let value = params.value.as_deref()?.parse().ok()?;
                Some(Self::Incremented(value))
            }
            "reset" => Some(Self::Reset),
            _ => None,
        }
    }

    /// Redirect target carrying the result of the press
    fn location(self) -> String {
        match self {
            Self::Incremented(value) => format!("/counter?notice=incremented&value={value}"),
            Self::Reset => "/counter?notice=reset".to_string(),
        }
    }

    fn render(self) -> String {
        match self {
            Self::Incremented(value) => format!(
                r#"<div class="notice positive" role="status">Counter incremented to {value}</div>"#
            ),
            Self::Reset => {
                r#"<div class="notice info" role="status">Counter reset to 0</div>"#.to_string()
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CounterPageParams {
    pub notice: Option<String>,
    /// Value the press produced; kept as text so a malformed one is ignored
    pub value: Option<String>,
}

fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>{STYLE}</style>
</head>
<body>
<main>
{body}
</main>
</body>
</html>
"#
    ))
}

/// GET /
async fn index() -> Html<String> {
    layout(
        "Counter App",
        r#"<h1>Welcome to Counter App</h1>
<p>A simple web application with a persistent counter</p>
<div class="card">
  <h2>Ready to start counting?</h2>
  <a class="button" href="/counter">Open Counter</a>
</div>"#,
    )
}

/// GET /counter
async fn counter_page(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CounterPageParams>,
) -> Result<Html<String>, ApiError> {
    let counter = CounterRepo::new(&state.store).get().await?;

    let notice = Notice::parse(&params).map(Notice::render).unwrap_or_default();

    let body = format!(
        r#"{notice}
<div class="card">
  <h1>Counter App</h1>
  <div class="value" id="counter-value">{value}</div>
  <div class="actions">
    <form method="post" action="/counter/increment"><button type="submit">Increment</button></form>
    <form method="post" action="/counter/reset"><button type="submit" class="secondary">Reset</button></form>
  </div>
</div>
<div class="info">The counter value is automatically saved to the database</div>"#,
        value = counter.value,
    );

    Ok(layout("Counter App", &body))
}

/// POST /counter/increment
async fn increment(State(state): State<Arc<AppState>>) -> Result<Redirect, ApiError> {
    let counter = CounterRepo::new(&state.store).increment().await?;
    Ok(Redirect::to(&Notice::Incremented(counter.value).location()))
}

/// POST /counter/reset
async fn reset(State(state): State<Arc<AppState>>) -> Result<Redirect, ApiError> {
    CounterRepo::new(&state.store).reset().await?;
    Ok(Redirect::to(&Notice::Reset.location()))
}

/// Page routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/counter", get(counter_page))
        .route("/counter/increment", post(increment))
        .route("/counter/reset", post(reset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use counterctl_core::CounterStore;
    use tower::ServiceExt;

    async fn app() -> Router {
        app_with_store().await.0
    }

    async fn app_with_store() -> (Router, CounterStore) {
        let store = CounterStore::in_memory().await.unwrap();
        store.create_schema().await.unwrap();
        let app = router().with_state(Arc::new(AppState {
            store: store.clone(),
        }));
        (app, store)
    }

    async fn open(app: &Router, uri: &str) -> String {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    /// Press a button; returns the redirect target
    async fn click(app: &Router, action: &str) -> String {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(action)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        response.headers()[header::LOCATION]
            .to_str()
            .unwrap()
            .to_string()
    }

    fn shown_value(html: &str) -> &str {
        let start = html.find(r#"id="counter-value">"#).unwrap() + r#"id="counter-value">"#.len();
        let end = start + html[start..].find('<').unwrap();
        &html[start..end]
    }

    #[tokio::test]
    async fn home_page_links_to_counter() {
        let app = app().await;
        let html = open(&app, "/").await;

        assert!(html.contains("Welcome to Counter App"));
        assert!(html.contains("A simple web application with a persistent counter"));
        assert!(html.contains(r#"href="/counter">Open Counter</a>"#));
    }

    #[tokio::test]
    async fn counter_page_shows_initial_value_and_controls() {
        let app = app().await;
        let html = open(&app, "/counter").await;

        assert!(html.contains("Counter App"));
        assert_eq!(shown_value(&html), "0");
        assert!(html.contains("Increment"));
        assert!(html.contains("Reset"));
        assert!(html.contains("The counter value is automatically saved to the database"));
        assert!(!html.contains(r#"class="notice"#));
    }

    #[tokio::test]
    async fn increment_button_updates_value() {
        let app = app().await;

        let location = click(&app, "/counter/increment").await;
        assert_eq!(location, "/counter?notice=incremented&value=1");
        let html = open(&app, &location).await;
        assert_eq!(shown_value(&html), "1");
        assert!(html.contains("Counter incremented to 1"));

        let location = click(&app, "/counter/increment").await;
        assert_eq!(shown_value(&open(&app, &location).await), "2");
    }

    #[tokio::test]
    async fn reset_button_zeroes_value() {
        let app = app().await;
        for _ in 0..3 {
            click(&app, "/counter/increment").await;
        }
        assert_eq!(shown_value(&open(&app, "/counter").await), "3");

        let location = click(&app, "/counter/reset").await;
        let html = open(&app, &location).await;
        assert_eq!(shown_value(&html), "0");
        assert!(html.contains("Counter reset to 0"));
    }

    #[tokio::test]
    async fn value_persists_across_page_loads() {
        let app = app().await;
        click(&app, "/counter/increment").await;
        click(&app, "/counter/increment").await;

        assert_eq!(shown_value(&open(&app, "/counter").await), "2");
        assert_eq!(shown_value(&open(&app, "/counter").await), "2");
    }

    #[tokio::test]
    async fn increment_reset_cycles() {
        let app = app().await;
        for expected in 1..=5 {
            let location = click(&app, "/counter/increment").await;
            assert_eq!(shown_value(&open(&app, &location).await), expected.to_string());
        }

        click(&app, "/counter/reset").await;
        let location = click(&app, "/counter/increment").await;
        assert_eq!(shown_value(&open(&app, &location).await), "1");
    }

    #[tokio::test]
    async fn unknown_notice_is_ignored() {
        let app = app().await;
        let html = open(&app, "/counter?notice=%3Cscript%3E").await;

        assert!(!html.contains("<script>"));
        assert!(!html.contains(r#"class="notice"#));
    }

    #[tokio::test]
    async fn notice_reports_the_pressed_result() {
        let (app, store) = app_with_store().await;

        let location = click(&app, "/counter/increment").await;

        // Another client changes the counter before the redirect is followed
        let repo = CounterRepo::new(&store);
        repo.increment().await.unwrap();
        repo.reset().await.unwrap();

        let html = open(&app, &location).await;
        assert!(html.contains("Counter incremented to 1"));
        assert_eq!(shown_value(&html), "0");
    }

    #[tokio::test]
    async fn malformed_notice_value_is_ignored() {
        let app = app().await;

        for uri in [
            "/counter?notice=incremented",
            "/counter?notice=incremented&value=%3Cb%3E",
        ] {
            let html = open(&app, uri).await;
            assert!(!html.contains(r#"class="notice"#), "{uri}");
            assert!(!html.contains("<b>"), "{uri}");
        }
    }
}
