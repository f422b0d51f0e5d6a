//! HTTP handler functions for the SafeRoute API.

use actix_web::{HttpResponse, web};
use chrono::{SecondsFormat, Utc};
use saferoute_server_models::{ApiCrimeResponse, ApiError, ApiHealth};
use saferoute_source::load_summary;

use crate::AppState;

/// Service identifier reported by the health check.
pub const SERVICE_NAME: &str = "SafeRoute API";

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        service: SERVICE_NAME.to_string(),
    })
}

/// `GET /api/crime`
///
/// Fetches one page of recent incidents, classifies them, and returns the
/// points with per-category counts. Any upstream failure becomes a 500
/// with no points.
pub async fn crime(state: web::Data<AppState>) -> HttpResponse {
    match load_summary(state.source.as_ref()).await {
        Ok(summary) => HttpResponse::Ok().json(ApiCrimeResponse::from(summary)),
        Err(e) => {
            log::error!("Failed to fetch crime data: {e}");
            HttpResponse::InternalServerError().json(ApiError {
                error: "Failed to fetch crime data".to_string(),
                message: e.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read as _, Write as _};
    use std::net::{SocketAddr, TcpListener};
    use std::sync::Arc;
    use std::time::Duration;

    use actix_web::{App, http::StatusCode, test};
    use async_trait::async_trait;
    use saferoute_source::chicago::ChicagoSource;
    use saferoute_source::{IncidentSource, SourceError};
    use saferoute_source_models::{RawIncident, RawScalar};
    use serde_json::Value;

    use crate::{AppState, configure_api};

    enum StubSource {
        Records(Vec<RawIncident>),
        TimesOut,
    }

    #[async_trait]
    impl IncidentSource for StubSource {
        fn id(&self) -> &'static str {
            "stub"
        }

        fn name(&self) -> &'static str {
            "Stub"
        }

        async fn fetch_incidents(&self) -> Result<Vec<RawIncident>, SourceError> {
            match self {
                Self::Records(records) => Ok(records.clone()),
                Self::TimesOut => Err(SourceError::Timeout { millis: 30_000 }),
            }
        }
    }

    fn text(s: &str) -> Option<RawScalar> {
        Some(RawScalar::Text(s.to_string()))
    }

    fn state(source: impl IncidentSource + 'static) -> actix_web::web::Data<AppState> {
        actix_web::web::Data::new(AppState {
            source: Arc::new(source),
        })
    }

    async fn get_json(source: impl IncidentSource + 'static, uri: &str) -> (StatusCode, Value) {
        let app =
            test::init_service(App::new().app_data(state(source)).configure(configure_api)).await;
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }

    /// Serves exactly one canned HTTP response on a local port.
    fn one_shot_upstream(status_line: &'static str, body: &'static str) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
        });

        addr
    }

    fn chicago_at(addr: SocketAddr) -> ChicagoSource {
        ChicagoSource::builder()
            .api_url(format!("http://{addr}/resource/ijzp-q8t2.json"))
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap()
    }

    #[actix_web::test]
    async fn health_reports_service() {
        let (status, body) = get_json(StubSource::Records(Vec::new()), "/api/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "SafeRoute API");
        let timestamp = body["timestamp"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    }

    #[actix_web::test]
    async fn crime_maps_records() {
        let robbery = RawIncident {
            latitude: text("41.8"),
            longitude: text("-87.6"),
            primary_type: Some("ROBBERY".to_string()),
            description: Some("ARMED".to_string()),
            date: Some("2024-11-05T00:00:00.000".to_string()),
            block: Some("100 S STATE ST".to_string()),
            arrest: text("true"),
        };
        let unlocated = RawIncident {
            primary_type: Some("THEFT".to_string()),
            ..RawIncident::default()
        };
        let battery = RawIncident {
            latitude: Some(RawScalar::Number(41.9)),
            longitude: Some(RawScalar::Number(-87.7)),
            primary_type: Some("DOMESTIC BATTERY".to_string()),
            arrest: Some(RawScalar::Bool(false)),
            ..RawIncident::default()
        };

        let (status, body) = get_json(
            StubSource::Records(vec![robbery, unlocated, battery]),
            "/api/crime",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalRecords"], 3);
        assert_eq!(body["mappedRecords"], 2);
        assert_eq!(body["points"].as_array().unwrap().len(), 2);
        assert_eq!(body["stats"]["ROBBERY"], 1);
        assert_eq!(body["stats"]["BATTERY"], 1);
        assert!(body["stats"].get("THEFT").is_none());

        let first = &body["points"][0];
        assert_eq!(first["lat"], 41.8);
        assert_eq!(first["lng"], -87.6);
        assert_eq!(first["type"], "ROBBERY");
        assert_eq!(first["desc"], "ARMED");
        assert_eq!(first["date"], "11/5/2024");
        assert_eq!(first["rawDate"], "2024-11-05T00:00:00.000");
        assert_eq!(first["rawType"], "ROBBERY");
        assert_eq!(first["severity"], 8);
        assert_eq!(first["block"], "100 S STATE ST");
        assert_eq!(first["arrestMade"], true);

        let second = &body["points"][1];
        assert_eq!(second["desc"], "DOMESTIC BATTERY");
        assert_eq!(second["block"], "Unknown location");
        assert_eq!(second["date"], "");
        assert_eq!(second["arrestMade"], false);
    }

    #[actix_web::test]
    async fn crime_counts_are_consistent() {
        let records: Vec<RawIncident> = ["THEFT", "ASSAULT", "STALKING", "ASSAULT", "ARSON"]
            .iter()
            .map(|t| RawIncident {
                latitude: text("41.88"),
                longitude: text("-87.63"),
                primary_type: Some((*t).to_string()),
                ..RawIncident::default()
            })
            .collect();

        let (_, body) = get_json(StubSource::Records(records), "/api/crime").await;

        let points = body["points"].as_array().unwrap().len() as u64;
        let stats_total: u64 = body["stats"]
            .as_object()
            .unwrap()
            .values()
            .map(|v| v.as_u64().unwrap())
            .sum();
        assert_eq!(body["mappedRecords"].as_u64(), Some(points));
        assert_eq!(stats_total, points);
        assert_eq!(body["stats"]["THEFT"], 2);
        assert_eq!(body["stats"]["ASSAULT"], 2);
        assert_eq!(body["stats"]["HATE_CRIME"], 1);
    }

    #[actix_web::test]
    async fn upstream_timeout_returns_error_envelope() {
        let (status, body) = get_json(StubSource::TimesOut, "/api/crime").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to fetch crime data");
        assert_eq!(body["message"], "timeout of 30000ms exceeded");
        assert!(body.get("points").is_none());
    }

    #[actix_web::test]
    async fn upstream_error_status_returns_error_envelope() {
        let addr = one_shot_upstream("503 Service Unavailable", r#"{"error":"busy"}"#);

        let (status, body) = get_json(chicago_at(addr), "/api/crime").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to fetch crime data");
        assert_eq!(body["message"], "Request failed with status code 503");
        assert!(body.get("points").is_none());
    }

    #[actix_web::test]
    async fn undecodable_upstream_body_returns_error_envelope() {
        let addr = one_shot_upstream("200 OK", "not json");

        let (status, body) = get_json(chicago_at(addr), "/api/crime").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to fetch crime data");
        assert!(body["message"].as_str().unwrap().starts_with("JSON parse error"));
        assert!(body.get("points").is_none());
    }

    #[actix_web::test]
    async fn malformed_record_does_not_drop_batch() {
        let addr = one_shot_upstream(
            "200 OK",
            r#"[
                {"latitude":"41.8","longitude":"-87.6","primary_type":"THEFT","arrest":false},
                {"latitude":"41.9","longitude":"-87.7","primary_type":"BATTERY","description":42}
            ]"#,
        );

        let (status, body) = get_json(chicago_at(addr), "/api/crime").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalRecords"], 2);
        assert_eq!(body["mappedRecords"], 2);
        assert_eq!(body["stats"]["THEFT"], 1);
        assert_eq!(body["stats"]["BATTERY"], 1);
        assert_eq!(body["points"][1]["desc"], "BATTERY");
    }

    #[actix_web::test]
    async fn unresponsive_upstream_times_out() {
        // Accepts connections into the backlog but never answers.
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let source = ChicagoSource::builder()
            .api_url(format!("http://{addr}/resource/ijzp-q8t2.json"))
            .timeout(Duration::from_millis(200))
            .build()
            .unwrap();

        let (status, body) = get_json(source, "/api/crime").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to fetch crime data");
        assert!(body["message"].as_str().unwrap().contains("timeout"));
        assert!(body.get("points").is_none());
        drop(listener);
    }

    #[actix_web::test]
    async fn unreachable_upstream_returns_error_envelope() {
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };

        let (status, body) = get_json(chicago_at(addr), "/api/crime").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].is_string());
        assert!(body["message"].is_string());
        assert!(body.get("points").is_none());
    }
}
