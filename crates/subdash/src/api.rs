use crate::config::{create_client, ApiConfig};
use crate::prelude::*;
use subdash_core::model::SubscribersResponse;
use subdash_core::session::{DashboardSession, DashboardView, TableView};

/// Fetch the subscriber list. Non-success statuses are errors; the body is
/// decoded leniently (missing fields take their defaults).
pub async fn fetch_subscribers(
    client: &reqwest::Client,
    config: &ApiConfig,
) -> std::result::Result<SubscribersResponse, Error> {
    let url = config.subscribers_url();
    log::debug!("GET {url}");

    let response = client.get(&url).send().await?;

    if !response.status().is_success() {
        return Err(Error::Status(response.status()));
    }

    let body = response.text().await?;
    let parsed: SubscribersResponse = serde_json::from_str(&body)?;
    log::debug!("received {} subscribers", parsed.subscribers.len());

    Ok(parsed)
}

/// Fetch once and hand the result to a fresh session.
///
/// A failed fetch is not an error here: the session records it and its view
/// reports the failure.
pub async fn load_session(config: &ApiConfig) -> Result<DashboardSession> {
    let client = create_client(config)?;
    let mut session = DashboardSession::new();

    let ticket = session.begin_fetch();
    let result = fetch_subscribers(&client, config).await.map_err(|e| {
        log::warn!("fetching subscribers from {} failed: {e}", config.subscribers_url());
        e.to_string()
    });

    if !session.complete_fetch(ticket, result) {
        log::warn!("discarded stale subscribers response");
    }

    Ok(session)
}

/// Unwrap a ready table view, turning the error state into a single report.
pub fn ready_view(session: &DashboardSession) -> Result<TableView> {
    match session.view() {
        DashboardView::Ready(view) => Ok(*view),
        DashboardView::Failed(message) => Err(eyre!(message)),
        DashboardView::Loading => Err(eyre!("Subscribers are still loading")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Json, Router};
    use std::time::Duration;
    use subdash_core::session::FETCH_ERROR_MESSAGE;

    async fn spawn_server(router: Router) -> ApiConfig {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        ApiConfig {
            base_url: format!("http://{addr}"),
            timeout: Duration::from_secs(5),
        }
    }

    #[tokio::test]
    async fn test_fetch_subscribers_success() {
        let router = Router::new().route(
            "/api/subscribers/",
            get(|| async {
                Json(serde_json::json!({
                    "subscribers": [
                        {"id": 1, "email": "a@x.com", "status": "active",
                         "stats": {"total_received": 5}},
                        {"id": 2, "email": "b@x.com", "status": "inactive"}
                    ],
                    "total_subscribers": 2,
                    "percent_clicked_once": 50.0
                }))
            }),
        );
        let config = spawn_server(router).await;
        let client = create_client(&config).unwrap();

        let response = fetch_subscribers(&client, &config).await.unwrap();

        assert_eq!(response.subscribers.len(), 2);
        assert_eq!(response.subscribers[0].id.to_string(), "1");
        assert_eq!(response.total_subscribers, 2.0);
    }

    #[tokio::test]
    async fn test_fetch_subscribers_missing_list() {
        let router = Router::new().route(
            "/api/subscribers/",
            get(|| async { Json(serde_json::json!({"total_subscribers": 0})) }),
        );
        let config = spawn_server(router).await;
        let client = create_client(&config).unwrap();

        let response = fetch_subscribers(&client, &config).await.unwrap();
        assert!(response.subscribers.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_subscribers_http_error() {
        let router = Router::new().route(
            "/api/subscribers/",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let config = spawn_server(router).await;
        let client = create_client(&config).unwrap();

        let err = fetch_subscribers(&client, &config).await.unwrap_err();
        assert!(matches!(err, Error::Status(code) if code == StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[tokio::test]
    async fn test_load_session_failure_becomes_error_state() {
        let router = Router::new().route(
            "/api/subscribers/",
            get(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        );
        let config = spawn_server(router).await;

        let session = load_session(&config).await.unwrap();

        assert_eq!(
            session.view(),
            DashboardView::Failed(FETCH_ERROR_MESSAGE.to_string())
        );
        let err = ready_view(&session).unwrap_err();
        assert_eq!(err.to_string(), FETCH_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_load_session_ready() {
        let router = Router::new().route(
            "/api/subscribers/",
            get(|| async {
                Json(serde_json::json!({
                    "subscribers": [{"id": "sub_1", "email": "a@x.com", "status": "active"}],
                    "total_subscribers": 1,
                    "percent_clicked_once": 100.0
                }))
            }),
        );
        let config = spawn_server(router).await;

        let session = load_session(&config).await.unwrap();
        let view = ready_view(&session).unwrap();

        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.stats.subscribers_clicked, 1);
    }
}
