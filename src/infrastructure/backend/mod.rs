// src/infrastructure/backend/mod.rs
// HTTP adapter for the backend order-matching API.

use async_trait::async_trait;
use hyper::client::HttpConnector;
use hyper::{Body, Client, Method, Request};
use hyper_tls::HttpsConnector;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::application::dto::{OpenOrderDto, PlaceOrderRequest, PlaceOrderResponse};
use crate::domain::errors::{BackendError, BackendResult};
use crate::domain::models::Order;
use crate::domain::repository::{BackendAck, OrderBackend, SignedOrderRequest};

pub struct HttpOrderBackend {
    base_url: String,
    client: Client<HttpsConnector<HttpConnector>>,
}

impl HttpOrderBackend {
    pub fn new(base_url: &str) -> Self {
        let https = HttpsConnector::new();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::builder().build::<_, Body>(https),
        }
    }

    async fn request_json<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> BackendResult<R> {
        let uri = format!("{}{}", self.base_url, path);
        let mut builder = Request::builder().method(method).uri(&uri);
        if body.is_some() {
            builder = builder.header("content-type", "application/json");
        }
        let request = builder
            .body(body.map(Body::from).unwrap_or_else(Body::empty))
            .map_err(|e| BackendError::Request(e.to_string()))?;

        let response = self
            .client
            .request(request)
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;
        let status = response.status();
        let bytes = hyper::body::to_bytes(response.into_body())
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;
        if !status.is_success() {
            log::warn!("backend {} returned {}", uri, status);
            return Err(BackendError::Status(status.as_u16()));
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn post_json<T: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
    ) -> BackendResult<R> {
        let bytes = serde_json::to_vec(body)?;
        self.request_json(Method::POST, path, Some(bytes)).await
    }
}

#[async_trait]
impl OrderBackend for HttpOrderBackend {
    async fn submit_order(&self, req: &SignedOrderRequest) -> BackendResult<BackendAck> {
        let body = PlaceOrderRequest::from(req);
        let response: PlaceOrderResponse = self.post_json("/api/orders", &body).await?;
        if !response.success {
            return Err(BackendError::Rejected(
                response.error.unwrap_or_else(|| "unspecified".to_string()),
            ));
        }
        let order_id = response
            .order_id
            .ok_or_else(|| BackendError::Rejected("missing order id".to_string()))?;
        log::info!(
            "backend accepted order {} ({} matches)",
            order_id,
            response.matches.len()
        );
        Ok(BackendAck {
            order_id,
            matched: response.matches.len(),
            tx_hash: response.transaction_hash,
        })
    }

    async fn open_orders(&self, market: &str, trader: &str) -> BackendResult<Vec<Order>> {
        let path = format!("/api/orders?metricId={}&trader={}", market, trader);
        let dtos: Vec<OpenOrderDto> = self.request_json(Method::GET, &path, None).await?;
        Ok(dtos.into_iter().filter_map(OpenOrderDto::into_domain).collect())
    }

    async fn cancel_order(&self, order_id: &str) -> BackendResult<()> {
        let path = format!("/api/orders/{}/cancel", order_id);
        let response: PlaceOrderResponse = self.request_json(Method::POST, &path, None).await?;
        if !response.success {
            return Err(BackendError::Rejected(
                response.error.unwrap_or_else(|| "cancel rejected".to_string()),
            ));
        }
        Ok(())
    }
}
