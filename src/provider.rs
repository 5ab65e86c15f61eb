//! # Provider
//!
//! Host implementations of the provider interfaces: `reqwest` for outbound
//! HTTP, `DynamoDB` for recorded positions and the process environment for
//! configuration.

use std::collections::HashMap;
use std::env;
use std::error::Error;

use anyhow::{Context, Result, anyhow};
use aws_sdk_dynamodb::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_dynamodb::types::AttributeValue;
use bytes::Bytes;
use http::{Request, Response};
use http_body::Body;
use http_body_util::BodyExt;
use realtime::{Config, HttpRequest, PositionStore, StoredPosition};

const DEFAULT_REGION: &str = "us-east-2";

/// Per-request provider. Nothing is shared between requests.
pub struct Provider {
    http: reqwest::Client,
    store: aws_sdk_dynamodb::Client,
}

impl Provider {
    /// Build clients from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error when the position store credentials are not set.
    pub fn new() -> Result<Self> {
        let access_key_id =
            env::var("MOCS_AWS_ACCESS_KEY_ID").context("getting `MOCS_AWS_ACCESS_KEY_ID`")?;
        let secret_access_key = env::var("MOCS_AWS_SECRET_ACCESS_KEY")
            .context("getting `MOCS_AWS_SECRET_ACCESS_KEY`")?;
        let region = env::var("AWS_REGION").unwrap_or_else(|_| {
            tracing::trace!("AWS_REGION not set, using default: {DEFAULT_REGION}");
            DEFAULT_REGION.to_string()
        });

        let credentials =
            Credentials::new(access_key_id, secret_access_key, None, None, "environment");
        Ok(Self::connect(credentials, region))
    }

    /// Build clients for the given store credentials and region.
    #[must_use]
    pub fn connect(credentials: Credentials, region: impl Into<String>) -> Self {
        let config = aws_sdk_dynamodb::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.into()))
            .credentials_provider(credentials)
            .build();

        Self {
            http: reqwest::Client::new(),
            store: aws_sdk_dynamodb::Client::from_conf(config),
        }
    }
}

impl HttpRequest for Provider {
    async fn fetch<T>(&self, request: Request<T>) -> Result<Response<Bytes>>
    where
        T: Body + Send + 'static,
        T::Data: Send,
        T::Error: Into<Box<dyn Error + Send + Sync + 'static>>,
    {
        let (parts, body) = request.into_parts();
        let body = body
            .collect()
            .await
            .map_err(|e| {
                let err: Box<dyn Error + Send + Sync> = e.into();
                anyhow!(err)
            })
            .context("reading request body")?
            .to_bytes();

        let request = reqwest::Request::try_from(Request::from_parts(parts, body))
            .context("building outbound request")?;
        // reqwest errors carry the request URL, query string (API key) included
        let response = self
            .http
            .execute(request)
            .await
            .map_err(reqwest::Error::without_url)
            .context("sending outbound request")?;

        let mut builder = Response::builder().status(response.status());
        if let Some(headers) = builder.headers_mut() {
            headers.extend(response.headers().clone());
        }
        let bytes = response
            .bytes()
            .await
            .map_err(reqwest::Error::without_url)
            .context("reading response body")?;

        builder.body(bytes).context("building response")
    }
}

impl Config for Provider {
    async fn get(&self, key: &str) -> Result<String> {
        env::var(key).with_context(|| format!("getting `{key}`"))
    }
}

impl PositionStore for Provider {
    async fn latest(&self, table: &str, vehicle_id: &str) -> Result<Option<StoredPosition>> {
        let output = self
            .store
            .query()
            .table_name(table)
            .key_condition_expression("vehicleId = :vId")
            .expression_attribute_values(":vId", AttributeValue::S(vehicle_id.to_string()))
            .scan_index_forward(false)
            .limit(1)
            .send()
            .await
            .with_context(|| format!("querying `{table}` for {vehicle_id}"))?;

        let Some(item) = output.items().first() else {
            return Ok(None);
        };

        Ok(Some(StoredPosition {
            vehicle_id: vehicle_id.to_string(),
            latitude: attribute(item, "latitude")?,
            longitude: attribute(item, "longitude")?,
            timestamp: attribute(item, "timestamp")?,
        }))
    }
}

// String or number attribute as text.
fn attribute(item: &HashMap<String, AttributeValue>, name: &str) -> Result<String> {
    match item.get(name) {
        Some(AttributeValue::S(value) | AttributeValue::N(value)) => Ok(value.clone()),
        Some(other) => Err(anyhow!("attribute `{name}` has unexpected type: {other:?}")),
        None => Err(anyhow!("attribute `{name}` missing")),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use axum::Router;
    use axum::http::{HeaderValue, StatusCode};
    use axum::routing::get;
    use http_body_util::Empty;
    use tokio::net::TcpListener;

    use super::*;

    pub(crate) fn test_provider() -> Provider {
        Provider::connect(Credentials::new("test", "test", None, None, "test"), DEFAULT_REGION)
    }

    /// Serve `router` on an ephemeral local port, returning its base URL.
    pub(crate) async fn serve(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("should bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move { axum::serve(listener, router).await });
        format!("http://{addr}")
    }

    /// Base URL of a local port nothing is listening on.
    pub(crate) async fn closed_port() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("should bind");
        let addr = listener.local_addr().expect("local addr");
        drop(listener);
        format!("http://{addr}")
    }

    fn get_request(uri: &str) -> Request<Empty<Bytes>> {
        Request::builder().uri(uri).body(Empty::<Bytes>::new()).expect("should build")
    }

    #[tokio::test]
    async fn fetch_response() {
        let router = Router::new().route(
            "/getvehicles",
            get(|| async {
                (
                    StatusCode::ACCEPTED,
                    [("x-bustime", HeaderValue::from_static("v3"))],
                    r#"{"bustime-response": {"vehicle": []}}"#,
                )
            }),
        );
        let base = serve(router).await;

        let response = test_provider()
            .fetch(get_request(&format!("{base}/getvehicles?format=json&rt=14")))
            .await
            .expect("should fetch");

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(response.headers().get("x-bustime"), Some(&HeaderValue::from_static("v3")));
        assert_eq!(response.body().as_ref(), br#"{"bustime-response": {"vehicle": []}}"#);
    }

    #[tokio::test]
    async fn fetch_query_forwarded() {
        let router = Router::new().route(
            "/getvehicles",
            get(|uri: axum::http::Uri| async move { uri.query().unwrap_or_default().to_string() }),
        );
        let base = serve(router).await;

        let response = test_provider()
            .fetch(get_request(&format!("{base}/getvehicles?format=json&key=abc&rt=14")))
            .await
            .expect("should fetch");

        assert_eq!(response.body().as_ref(), b"format=json&key=abc&rt=14");
    }

    // Connection failures must not echo the request URL and its API key.
    #[tokio::test]
    async fn fetch_error_hides_url() {
        let base = closed_port().await;

        let err = test_provider()
            .fetch(get_request(&format!("{base}/getvehicles?key=SUPERSECRETKEY&rt=14")))
            .await
            .expect_err("nothing listening");

        let message = format!("{err:#} {err:?}");
        assert!(message.contains("sending outbound request"), "{message}");
        assert!(!message.contains("SUPERSECRETKEY"), "{message}");
    }

    #[test]
    fn string_attribute() {
        let item = HashMap::from([
            ("latitude".to_string(), AttributeValue::S("+411234567".to_string())),
            ("timestamp".to_string(), AttributeValue::N("1767623520".to_string())),
        ]);

        assert_eq!(attribute(&item, "latitude").expect("string"), "+411234567");
        assert_eq!(attribute(&item, "timestamp").expect("number"), "1767623520");
    }

    #[test]
    fn bad_attribute() {
        let item = HashMap::from([("latitude".to_string(), AttributeValue::Bool(true))]);

        let err = attribute(&item, "latitude").expect_err("wrong type");
        assert!(err.to_string().contains("unexpected type"));

        let err = attribute(&item, "longitude").expect_err("missing");
        assert_eq!(err.to_string(), "attribute `longitude` missing");
    }
}
