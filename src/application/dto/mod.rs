// src/application/dto/mod.rs
// Wire DTOs for the backend order API and the gasless relay. The JSON
// shapes are boundary contracts with existing services and must not
// drift.

use serde::{Deserialize, Serialize};

use crate::domain::models::{Order, OrderSide, OrderStatus};
use crate::domain::repository::SignedOrderRequest;

pub fn side_to_wire(side: OrderSide) -> &'static str {
    match side {
        OrderSide::Long => "buy",
        OrderSide::Short => "sell",
    }
}

pub fn side_from_wire(s: &str) -> Option<OrderSide> {
    match s.to_lowercase().as_str() {
        "buy" | "long" => Some(OrderSide::Long),
        "sell" | "short" => Some(OrderSide::Short),
        _ => None,
    }
}

/// POST /api/orders request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub metric_id: String,
    pub order_type: String,
    pub side: String,
    pub quantity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    pub trader: String,
    pub signature: String,
    pub nonce: u64,
    pub metadata_hash: String,
}

impl From<&SignedOrderRequest> for PlaceOrderRequest {
    fn from(req: &SignedOrderRequest) -> Self {
        Self {
            metric_id: req.market.clone(),
            order_type: if req.is_limit { "limit" } else { "market" }.to_string(),
            side: side_to_wire(req.side).to_string(),
            quantity: req.quantity,
            price: req.price,
            trader: req.trader.clone(),
            signature: req.signature.clone(),
            nonce: req.nonce,
            metadata_hash: req.metadata_hash.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchFill {
    pub order_id: String,
    pub price: f64,
    pub quantity: f64,
}

/// POST /api/orders response body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderResponse {
    pub success: bool,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub matches: Vec<MatchFill>,
    #[serde(default)]
    pub transaction_hash: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// One open order as the backend reports it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenOrderDto {
    pub id: String,
    pub metric_id: String,
    pub side: String,
    pub quantity: f64,
    #[serde(default)]
    pub filled_quantity: f64,
    #[serde(default)]
    pub price: Option<f64>,
    pub status: OrderStatus,
    pub trader: String,
    pub timestamp: i64,
    #[serde(default)]
    pub expiry_time: Option<i64>,
}

impl OpenOrderDto {
    pub fn into_domain(self) -> Option<Order> {
        Some(Order {
            id: self.id,
            market: self.metric_id,
            side: side_from_wire(&self.side)?,
            quantity: self.quantity,
            filled_quantity: self.filled_quantity,
            price: self.price.filter(|p| *p > 0.0),
            status: self.status,
            trader: self.trader,
            timestamp: self.timestamp,
            expiry_time: self.expiry_time,
        })
    }
}

/// Session relay submission body. Fixed-point integers travel as decimal
/// strings because they exceed JSON's safe integer range.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelaySubmitRequest {
    pub method: String,
    pub venue: String,
    pub session_id: String,
    pub trader: String,
    pub side: String,
    pub size: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelaySubmitResponse {
    pub success: bool,
    #[serde(default)]
    pub tx_hash: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_order_request_serializes_camel_case() {
        let req = PlaceOrderRequest {
            metric_id: "ETH-PERP".into(),
            order_type: "limit".into(),
            side: "buy".into(),
            quantity: 2.0,
            price: Some(10.5),
            trader: "0xabc".into(),
            signature: "0xsig".into(),
            nonce: 7,
            metadata_hash: "0xhash".into(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["metricId"], "ETH-PERP");
        assert_eq!(json["orderType"], "limit");
        assert_eq!(json["metadataHash"], "0xhash");
    }

    #[test]
    fn open_order_parses_status_and_side() {
        let json = r#"{
            "id": "42",
            "metricId": "ETH-PERP",
            "side": "sell",
            "quantity": 3.0,
            "filledQuantity": 1.0,
            "price": 11.0,
            "status": "partially_filled",
            "trader": "0xDEF",
            "timestamp": 1700000000
        }"#;
        let dto: OpenOrderDto = serde_json::from_str(json).unwrap();
        let order = dto.into_domain().unwrap();
        assert_eq!(order.side, OrderSide::Short);
        assert_eq!(order.status, OrderStatus::PartiallyFilled);
        assert_eq!(order.expiry_time, None);
    }

    #[test]
    fn unknown_side_is_rejected() {
        let dto = OpenOrderDto {
            id: "1".into(),
            metric_id: "ETH-PERP".into(),
            side: "hold".into(),
            quantity: 1.0,
            filled_quantity: 0.0,
            price: None,
            status: OrderStatus::Pending,
            trader: "0xabc".into(),
            timestamp: 0,
            expiry_time: None,
        };
        assert!(dto.into_domain().is_none());
    }
}
