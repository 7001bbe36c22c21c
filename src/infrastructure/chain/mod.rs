// src/infrastructure/chain/mod.rs
// In-memory chain venue for the demo driver and tests. Production chain
// access goes through a wallet-injected provider behind the same ports.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::errors::{VenueError, VenueResult};
use crate::domain::fixed::{from_fixed, price_to_fp, SIZE_DECIMALS};
use crate::domain::models::{DepthSnapshot, Order, OrderStatus};
use crate::domain::repository::{
    ChainOpenRequest, ChainPlaceRequest, ChainVenue, DepthSource,
};

struct PaperState {
    depth: DepthSnapshot,
    /// 6-decimal free collateral per trader.
    collateral: HashMap<String, i128>,
    gas: HashMap<String, u128>,
    orders: Vec<Order>,
    next_tx: u64,
}

/// Paper venue: a book snapshot, a collateral ledger and an order list.
/// Position opens succeed only when the mark (book mid) falls inside the
/// submitted price window, so the slippage ladder is exercised end to end.
pub struct PaperChainVenue {
    market: String,
    state: Mutex<PaperState>,
}

impl PaperChainVenue {
    pub fn new(market: &str, depth: DepthSnapshot) -> Self {
        Self {
            market: market.to_string(),
            state: Mutex::new(PaperState {
                depth,
                collateral: HashMap::new(),
                gas: HashMap::new(),
                orders: Vec::new(),
                next_tx: 1,
            }),
        }
    }

    pub fn deposit(&self, trader: &str, amount_fp: i128) {
        let mut state = self.state.lock().unwrap();
        *state.collateral.entry(trader.to_string()).or_insert(0) += amount_fp;
    }

    pub fn fund_gas(&self, trader: &str, wei: u128) {
        let mut state = self.state.lock().unwrap();
        state.gas.insert(trader.to_string(), wei);
    }

    pub fn set_depth(&self, depth: DepthSnapshot) {
        self.state.lock().unwrap().depth = depth;
    }

    fn next_hash(state: &mut PaperState) -> String {
        let n = state.next_tx;
        state.next_tx += 1;
        format!("0xpaper{:08x}", n)
    }

    fn mark_fp(state: &PaperState) -> Option<i128> {
        let bid = state.depth.best_bid();
        let ask = state.depth.best_ask();
        let mark = match (bid, ask) {
            (Some(b), Some(a)) => (a + b) / 2.0,
            (Some(b), None) => b,
            (None, Some(a)) => a,
            (None, None) => return None,
        };
        price_to_fp(mark)
    }
}

#[async_trait]
impl ChainVenue for PaperChainVenue {
    async fn best_bid(&self, _venue: &str) -> VenueResult<i128> {
        let state = self.state.lock().unwrap();
        Ok(state.depth.best_bid().and_then(price_to_fp).unwrap_or(0))
    }

    async fn best_ask(&self, _venue: &str) -> VenueResult<i128> {
        let state = self.state.lock().unwrap();
        Ok(state.depth.best_ask().and_then(price_to_fp).unwrap_or(0))
    }

    async fn available_collateral(&self, _venue: &str, trader: &str) -> VenueResult<i128> {
        let state = self.state.lock().unwrap();
        Ok(*state.collateral.get(trader).unwrap_or(&0))
    }

    async fn static_place_check(&self, req: &ChainPlaceRequest) -> VenueResult<()> {
        if req.size_fp <= 0 {
            return Err(VenueError::Submission("size must be positive".into()));
        }
        if req.price_fp <= 0 {
            return Err(VenueError::Submission("price must be positive".into()));
        }
        Ok(())
    }

    async fn place_order(&self, req: &ChainPlaceRequest) -> VenueResult<String> {
        self.static_place_check(req).await?;
        let mut state = self.state.lock().unwrap();
        let tx = Self::next_hash(&mut state);
        let id = format!("chain-{}", state.orders.len() + 1);
        state.orders.push(Order {
            id,
            market: self.market.clone(),
            side: req.side,
            quantity: from_fixed(req.size_fp, SIZE_DECIMALS),
            filled_quantity: 0.0,
            price: req
                .is_limit
                .then(|| from_fixed(req.price_fp, crate::domain::fixed::PRICE_DECIMALS)),
            status: OrderStatus::Pending,
            trader: req.trader.clone(),
            timestamp: Utc::now().timestamp(),
            expiry_time: None,
        });
        Ok(tx)
    }

    async fn open_position(&self, req: &ChainOpenRequest) -> VenueResult<String> {
        let mut state = self.state.lock().unwrap();
        let mark = Self::mark_fp(&state)
            .ok_or_else(|| VenueError::NoLiquidity(req.side.book_side().to_string()))?;
        if mark < req.min_price_fp || mark > req.max_price_fp {
            return Err(VenueError::Submission(format!(
                "price out of range: mark {} not in [{}, {}]",
                mark, req.min_price_fp, req.max_price_fp
            )));
        }
        Ok(Self::next_hash(&mut state))
    }

    async fn cancel_order(&self, _venue: &str, order_id: &str) -> VenueResult<String> {
        let mut state = self.state.lock().unwrap();
        let order = state
            .orders
            .iter_mut()
            .find(|o| o.id == order_id)
            .ok_or_else(|| VenueError::Submission(format!("unknown order {}", order_id)))?;
        order.status = OrderStatus::Cancelled;
        Ok(Self::next_hash(&mut state))
    }

    async fn active_orders(&self, _venue: &str, trader: &str) -> VenueResult<Vec<Order>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .orders
            .iter()
            .filter(|o| o.status.is_active() && o.trader.eq_ignore_ascii_case(trader))
            .cloned()
            .collect())
    }

    async fn gas_balance(&self, trader: &str) -> VenueResult<u128> {
        let state = self.state.lock().unwrap();
        Ok(*state.gas.get(trader).unwrap_or(&u128::MAX))
    }

    async fn gas_price(&self) -> VenueResult<u128> {
        Ok(1_000_000_000) // 1 gwei
    }

    async fn venue_by_market(&self, market: &str) -> VenueResult<Option<String>> {
        if market == self.market {
            Ok(Some(format!("0xpaper::{}", market)))
        } else {
            Ok(None)
        }
    }
}

#[async_trait]
impl DepthSource for PaperChainVenue {
    async fn depth(&self, _market: &str, levels: usize) -> VenueResult<DepthSnapshot> {
        let state = self.state.lock().unwrap();
        let mut snapshot = state.depth.clone();
        snapshot.bids.truncate(levels);
        snapshot.asks.truncate(levels);
        Ok(snapshot)
    }
}
