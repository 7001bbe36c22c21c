// src/adapter/panel.rs
// Trading panel coordinator: selects the venue strategy (direct vs.
// gasless), guards against double submission, keeps the optimistic
// session order cache, and broadcasts panel events to the views.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tokio::sync::broadcast;

use crate::application::usecase::orders_usecase::{filled_orders_for_market, merge_active_orders};
use crate::application::usecase::quote_usecase::QuoteEngine;
use crate::application::usecase::submission_usecase::{SessionInfo, SessionStore};
use crate::domain::errors::{AppResult, VenueError};
use crate::domain::models::{
    Order, OrderSide, OrderStatus, OrderType, PanelEvent, PriceContext, QuoteResult, SizeMode,
    SubmitOutcome, TradeRequest,
};
use crate::domain::repository::{ChainVenue, OrderBackend};
use crate::domain::service::VenueStrategy;

const EVENT_CHANNEL_CAPACITY: usize = 64;

pub struct TradePanel {
    market: String,
    trader: String,
    venue_addr: String,
    direct: Arc<dyn VenueStrategy>,
    gasless: Option<Arc<dyn VenueStrategy>>,
    session: Arc<SessionStore>,
    /// Feature flag: when set, trading must go through a session and the
    /// panel blocks rather than silently falling back to a direct
    /// transaction (the two paths have different signing models).
    gasless_required: bool,
    chain: Arc<dyn ChainVenue>,
    backend: Option<Arc<dyn OrderBackend>>,
    quote_engine: Option<Arc<QuoteEngine>>,
    session_cache: Mutex<Vec<Order>>,
    submitting: AtomicBool,
    events: broadcast::Sender<PanelEvent>,
}

impl TradePanel {
    pub fn new(
        market: &str,
        trader: &str,
        venue_addr: &str,
        direct: Arc<dyn VenueStrategy>,
        chain: Arc<dyn ChainVenue>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            market: market.to_string(),
            trader: trader.to_string(),
            venue_addr: venue_addr.to_string(),
            direct,
            gasless: None,
            session: Arc::new(SessionStore::new()),
            gasless_required: false,
            chain,
            backend: None,
            quote_engine: None,
            session_cache: Mutex::new(Vec::new()),
            submitting: AtomicBool::new(false),
            events,
        }
    }

    pub fn with_gasless(
        mut self,
        strategy: Arc<dyn VenueStrategy>,
        session: Arc<SessionStore>,
        required: bool,
    ) -> Self {
        self.gasless = Some(strategy);
        self.session = session;
        self.gasless_required = required;
        self
    }

    pub fn with_backend(mut self, backend: Arc<dyn OrderBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn with_quote_engine(mut self, engine: Arc<QuoteEngine>) -> Self {
        self.quote_engine = Some(engine);
        self
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PanelEvent> {
        self.events.subscribe()
    }

    pub fn market(&self) -> &str {
        &self.market
    }

    /// Called when the user enables gasless trading.
    pub fn enable_session(&self, info: SessionInfo) {
        self.session.set(info);
    }

    pub fn has_active_session(&self) -> bool {
        self.session.active().is_some()
    }

    /// Pick the strategy for this click. Gasless wins while a session is
    /// active; a required-but-missing session blocks submission.
    fn select_strategy(&self) -> Result<Arc<dyn VenueStrategy>, VenueError> {
        if let Some(gasless) = &self.gasless {
            if self.session.active().is_some() {
                return Ok(Arc::clone(gasless));
            }
            if self.gasless_required {
                return Err(VenueError::SessionRequired);
            }
        }
        Ok(Arc::clone(&self.direct))
    }

    pub fn resolve_price(&self, side: OrderSide, order_type: OrderType, ctx: &PriceContext) -> f64 {
        self.direct.resolve_price(side, order_type, ctx)
    }

    /// Recompute the fill estimate. Goes through the supersession-guarded
    /// engine when one is wired (order-book venues); `Ok(None)` means a
    /// newer refresh superseded this one.
    pub async fn refresh_quote(
        &self,
        side: OrderSide,
        order_type: OrderType,
        amount: f64,
        mode: SizeMode,
        ctx: &PriceContext,
    ) -> AppResult<Option<QuoteResult>> {
        match &self.quote_engine {
            Some(engine) => {
                engine
                    .refresh(&self.market, side, order_type, amount, mode, ctx)
                    .await
            }
            None => {
                let strategy = self.select_strategy().map_err(crate::domain::errors::AppError::Venue)?;
                strategy
                    .compute_quote(&self.market, side, order_type, amount, mode, ctx)
                    .await
                    .map(Some)
            }
        }
    }

    /// One submit click. All errors fold into the outcome; nothing
    /// propagates past this boundary.
    pub async fn submit_order(&self, req: &TradeRequest, ctx: &PriceContext) -> SubmitOutcome {
        // Single logical operation per click; repeated clicks are refused
        // until the whole attempt (including retries) settles.
        if self
            .submitting
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return SubmitOutcome::failed("submission already in progress");
        }

        let outcome = match self.select_strategy() {
            Ok(strategy) => {
                log::info!(
                    "submitting {} {} {} via {}",
                    req.side,
                    req.amount,
                    req.market,
                    strategy.name()
                );
                match strategy.submit(req, ctx).await {
                    Ok(tx_hash) => {
                        self.record_optimistic_order(req, &tx_hash);
                        if let Some(engine) = &self.quote_engine {
                            engine.clear();
                        }
                        let _ = self.events.send(PanelEvent::OrderSubmitted {
                            tx_hash: Some(tx_hash.clone()),
                        });
                        let _ = self.events.send(PanelEvent::RefreshOrders);
                        SubmitOutcome::ok(Some(tx_hash), None)
                    }
                    Err(err) => self.fold_error(err),
                }
            }
            Err(err) => self.fold_error(err),
        };

        self.submitting.store(false, Ordering::SeqCst);
        outcome
    }

    /// Cancel an order through the same dual-path selection.
    pub async fn cancel_order(&self, order_id: &str) -> SubmitOutcome {
        let outcome = match self.select_strategy() {
            Ok(strategy) => match strategy.cancel(&self.market, &self.trader, order_id).await {
                Ok(tx_hash) => {
                    self.record_optimistic_cancel(order_id);
                    let _ = self.events.send(PanelEvent::OrderCancelled {
                        order_id: order_id.to_string(),
                    });
                    let _ = self.events.send(PanelEvent::RefreshOrders);
                    SubmitOutcome::ok(Some(tx_hash), Some(order_id.to_string()))
                }
                Err(err) => self.fold_error(err),
            },
            Err(err) => self.fold_error(err),
        };
        outcome
    }

    fn fold_error(&self, err: VenueError) -> SubmitOutcome {
        if matches!(err, VenueError::Session(_)) {
            self.session.clear();
            let _ = self.events.send(PanelEvent::SessionInvalidated);
        }
        log::warn!("submission failed: {}", err);
        SubmitOutcome::failed(err.to_string())
    }

    /// The session cache reflects the most recent local view of orders the
    /// user just placed; the merge gives it overwrite priority.
    fn record_optimistic_order(&self, req: &TradeRequest, tx_hash: &str) {
        let mut cache = self.session_cache.lock().unwrap();
        cache.push(Order {
            id: tx_hash.to_string(),
            market: req.market.clone(),
            side: req.side,
            quantity: req.amount,
            filled_quantity: 0.0,
            price: req.order_type.trigger_price(),
            status: OrderStatus::Pending,
            trader: req.trader.clone(),
            timestamp: Utc::now().timestamp(),
            expiry_time: None,
        });
    }

    fn record_optimistic_cancel(&self, order_id: &str) {
        let mut cache = self.session_cache.lock().unwrap();
        if let Some(order) = cache.iter_mut().find(|o| o.id == order_id) {
            order.status = OrderStatus::Cancelled;
        } else {
            cache.push(Order {
                id: order_id.to_string(),
                market: self.market.clone(),
                side: OrderSide::Long,
                quantity: 0.0,
                filled_quantity: 0.0,
                price: None,
                status: OrderStatus::Cancelled,
                trader: self.trader.clone(),
                timestamp: Utc::now().timestamp(),
                expiry_time: None,
            });
        }
    }

    /// Refresh the active-order view. The sources are fetched
    /// concurrently; the merge runs only once all of them have resolved
    /// so the overwrite-priority rule applies correctly.
    pub async fn active_orders(&self) -> Vec<Order> {
        let remote_fut = async {
            match &self.backend {
                Some(backend) => match backend.open_orders(&self.market, &self.trader).await {
                    Ok(orders) => orders,
                    Err(e) => {
                        log::warn!("backend order fetch failed: {}", e);
                        Vec::new()
                    }
                },
                None => Vec::new(),
            }
        };
        let onchain_fut = async {
            match self.chain.active_orders(&self.venue_addr, &self.trader).await {
                Ok(orders) => orders,
                Err(e) => {
                    log::warn!("on-chain order fetch failed: {}", e);
                    Vec::new()
                }
            }
        };

        let (remote, onchain) = tokio::join!(remote_fut, onchain_fut);
        let session = self.session_cache.lock().unwrap().clone();
        merge_active_orders(&remote, &onchain, &session)
    }

    /// This wallet's fills on this market, from an already-fetched list.
    pub fn filled_orders(&self, orders: &[Order]) -> Vec<Order> {
        filled_orders_for_market(orders, &self.market, &self.trader)
    }
}
