//! Same-origin relay for cross-origin feed URLs. Forwards the target URL and
//! streams the raw response body back verbatim; no parsing happens here.

use actix_cors::Cors;
use actix_web::http::header;
use actix_web::{web, App, HttpResponse, HttpServer};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::types::AggregatorConfig;

#[derive(Debug, Deserialize)]
pub struct RelayQuery {
    pub url: Option<String>,
}

/// `GET /relay?url=<encoded>`: fetch the target and echo its body as
/// `text/xml`. The body is passed through as raw bytes, never re-decoded,
/// and the upstream status is not reinterpreted; only a transport failure
/// turns into an error response.
pub async fn relay(
    query: web::Query<RelayQuery>,
    client: web::Data<reqwest::Client>,
) -> HttpResponse {
    let Some(target) = query.url.clone() else {
        return HttpResponse::BadRequest().json(json!({ "error": "url parameter is required" }));
    };

    match fetch_body(&client, &target).await {
        Ok(body) => echo(body),
        Err(e) => {
            warn!(url = %target, error = %e, "relay fetch failed");
            HttpResponse::BadGateway().json(json!({ "error": "failed to fetch URL" }))
        }
    }
}

fn echo(body: Vec<u8>) -> HttpResponse {
    HttpResponse::Ok().content_type("text/xml").body(body)
}

async fn fetch_body(client: &reqwest::Client, url: &str) -> reqwest::Result<Vec<u8>> {
    Ok(client.get(url).send().await?.bytes().await?.to_vec())
}

/// Run the relay server until shutdown. Any origin may call the relay;
/// browser dashboards on other origins are its whole audience.
pub async fn serve(bind: &str, config: &AggregatorConfig) -> std::io::Result<()> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(config.timeout)
        .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
        .build()
        .expect("Failed to create HTTP client");

    info!("Relay listening on http://{bind}");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "OPTIONS"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION]);

        App::new()
            .wrap(cors)
            .app_data(web::Data::new(client.clone()))
            .route("/relay", web::get().to(relay))
    })
    .bind(bind)?
    .run()
    .await
}
