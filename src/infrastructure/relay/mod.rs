// src/infrastructure/relay/mod.rs
// HTTP adapter for the gasless session relay.

use async_trait::async_trait;
use hyper::client::HttpConnector;
use hyper::{Body, Client, Method, Request};
use hyper_tls::HttpsConnector;

use crate::application::dto::{side_to_wire, RelaySubmitRequest, RelaySubmitResponse};
use crate::domain::errors::{classify_failure, FailureClass, VenueError, VenueResult};
use crate::domain::repository::{RelayMethod, RelayOrderParams, SessionRelay};

pub struct HttpSessionRelay {
    base_url: String,
    client: Client<HttpsConnector<HttpConnector>>,
}

impl HttpSessionRelay {
    pub fn new(base_url: &str) -> Self {
        let https = HttpsConnector::new();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::builder().build::<_, Body>(https),
        }
    }
}

#[async_trait]
impl SessionRelay for HttpSessionRelay {
    async fn submit(
        &self,
        method: RelayMethod,
        venue: &str,
        session_id: &str,
        trader: &str,
        params: &RelayOrderParams,
    ) -> VenueResult<String> {
        let body = RelaySubmitRequest {
            method: method.as_str().to_string(),
            venue: venue.to_string(),
            session_id: session_id.to_string(),
            trader: trader.to_string(),
            side: side_to_wire(params.side).to_string(),
            // Fixed-point integers as strings; they exceed JSON's safe range.
            size: params.size_fp.to_string(),
            price: params.price_fp.map(|p| p.to_string()),
            order_id: params.order_id.clone(),
        };
        let bytes = serde_json::to_vec(&body)
            .map_err(|e| VenueError::Submission(format!("relay encode: {}", e)))?;

        let request = Request::builder()
            .method(Method::POST)
            .uri(format!("{}/session/submit", self.base_url))
            .header("content-type", "application/json")
            .body(Body::from(bytes))
            .map_err(|e| VenueError::Submission(format!("relay request: {}", e)))?;

        let response = self
            .client
            .request(request)
            .await
            .map_err(|e| VenueError::Submission(format!("relay unreachable: {}", e)))?;
        let status = response.status();
        let bytes = hyper::body::to_bytes(response.into_body())
            .await
            .map_err(|e| VenueError::Submission(format!("relay read: {}", e)))?;
        if !status.is_success() {
            return Err(VenueError::Submission(format!(
                "relay returned status {}",
                status
            )));
        }

        let parsed: RelaySubmitResponse = serde_json::from_slice(&bytes)
            .map_err(|e| VenueError::Submission(format!("relay decode: {}", e)))?;

        if !parsed.success {
            let message = parsed.error.unwrap_or_else(|| "unspecified".to_string());
            return Err(match classify_failure(&message) {
                FailureClass::SessionInvalid => VenueError::Session(message),
                FailureClass::Slippage => VenueError::Slippage(message),
                FailureClass::UserCancelled => VenueError::UserCancelled,
                FailureClass::Other => VenueError::Submission(message),
            });
        }
        parsed
            .tx_hash
            .ok_or_else(|| VenueError::Submission("relay returned no transaction hash".into()))
    }
}
