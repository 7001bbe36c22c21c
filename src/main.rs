// src/main.rs
// Demo driver: wires the panel against the in-memory paper venue and
// walks through a quote, a submission and the merged order view.

use std::sync::Arc;

use perp_panel::adapter::TradePanel;
use perp_panel::application::usecase::margin_usecase::{
    estimate_liquidation, required_margin, LiquidationParams,
};
use perp_panel::application::usecase::quote_usecase::QuoteEngine;
use perp_panel::application::usecase::submission_usecase::{
    BookStrategy, GaslessStrategy, SessionStore,
};
use perp_panel::config::Config;
use perp_panel::domain::errors::AppResult;
use perp_panel::domain::fixed::{from_fixed, PRICE_DECIMALS};
use perp_panel::domain::models::{
    DepthLevel, DepthSnapshot, OrderSide, OrderType, PanelEvent, PriceContext, SizeMode,
    TradeRequest,
};
use perp_panel::domain::repository::{ChainVenue, DepthSource};
use perp_panel::infrastructure::backend::HttpOrderBackend;
use perp_panel::infrastructure::chain::PaperChainVenue;
use perp_panel::infrastructure::relay::HttpSessionRelay;

#[tokio::main]
async fn main() -> AppResult<()> {
    // Load configuration; fall back to defaults with a demo wallet so the
    // paper run works without an environment.
    let config = Config::from_env().unwrap_or_else(|_| {
        let mut c = Config::default();
        c.venue.wallet_address = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266".to_string();
        c
    });
    config.init_logging()?;

    log::info!("Starting perp_panel v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Market {} on {} venue", config.market.symbol, config.venue.kind);

    let market = config.market.symbol.clone();
    let trader = config.venue.wallet_address.clone();

    // Seed the paper venue with a small book and some collateral.
    let paper = Arc::new(PaperChainVenue::new(
        &market,
        DepthSnapshot {
            asks: vec![
                DepthLevel { price: 10.0, size: 5.0 },
                DepthLevel { price: 11.0, size: 10.0 },
            ],
            bids: vec![
                DepthLevel { price: 9.8, size: 4.0 },
                DepthLevel { price: 9.5, size: 8.0 },
            ],
        },
    ));
    paper.deposit(&trader, 100_000_000_000); // $100,000
    paper.fund_gas(&trader, 1_000_000_000_000_000_000); // 1 ether

    let chain: Arc<dyn ChainVenue> = paper.clone();
    let depth: Arc<dyn DepthSource> = paper.clone();
    let venue_addr = chain
        .venue_by_market(&market)
        .await?
        .unwrap_or_else(|| "0x0".to_string());

    let strategy = Arc::new(BookStrategy::new(
        Arc::clone(&chain),
        Arc::clone(&depth),
        venue_addr.clone(),
    ));
    let engine = Arc::new(QuoteEngine::new(Arc::clone(&depth)));
    let mut panel = TradePanel::new(&market, &trader, &venue_addr, strategy, Arc::clone(&chain))
        .with_quote_engine(engine);

    if let Some(url) = &config.backend.base_url {
        log::info!("order backend at {}", url);
        panel = panel.with_backend(Arc::new(HttpOrderBackend::new(url)));
    }
    if config.session.gasless_enabled {
        if let Some(url) = &config.session.relay_url {
            log::info!("gasless relay at {}", url);
            let session = Arc::new(SessionStore::new());
            let gasless = Arc::new(GaslessStrategy::new(
                Arc::clone(&chain),
                Arc::clone(&depth),
                Arc::new(HttpSessionRelay::new(url)),
                Arc::clone(&session),
                venue_addr.clone(),
            ));
            panel = panel.with_gasless(gasless, session, config.session.gasless_required);
        }
    }
    let panel = Arc::new(panel);

    // Log panel events the way a view would consume them.
    let mut events = panel.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                PanelEvent::OrderSubmitted { tx_hash } => {
                    log::info!("event: order submitted ({:?})", tx_hash)
                }
                PanelEvent::OrderCancelled { order_id } => {
                    log::info!("event: order {} cancelled", order_id)
                }
                PanelEvent::RefreshOrders => log::info!("event: refresh orders"),
                PanelEvent::SessionInvalidated => log::warn!("event: session invalidated"),
            }
        }
    });

    let ctx = PriceContext {
        best_bid: Some(from_fixed(chain.best_bid(&venue_addr).await?, PRICE_DECIMALS)),
        best_ask: Some(from_fixed(chain.best_ask(&venue_addr).await?, PRICE_DECIMALS)),
        ..PriceContext::default()
    };

    // Quote an 8-unit market buy against the seeded book.
    if let Some(quote) = panel
        .refresh_quote(OrderSide::Long, OrderType::Market, 8.0, SizeMode::Units, &ctx)
        .await?
    {
        log::info!(
            "quote: {} units @ avg {:.4} (value {:.2}, {} levels{})",
            quote.units,
            quote.price,
            quote.value,
            quote.levels_used,
            if quote.partial { ", partial" } else { "" }
        );

        log::info!(
            "margin required: {:.2}, est. liquidation (short): {:?}",
            required_margin(OrderSide::Long, quote.value),
            estimate_liquidation(&LiquidationParams::new(OrderSide::Short, quote.price))
        );
    }

    // Submit it.
    let request = TradeRequest {
        market: market.clone(),
        trader: trader.clone(),
        side: OrderSide::Long,
        order_type: OrderType::Market,
        amount: 8.0,
        mode: SizeMode::Units,
        slippage_bps: config.venue.slippage_bps,
        leverage: config.venue.leverage,
    };
    let outcome = panel.submit_order(&request, &ctx).await;
    log::info!("submission outcome: {:?}", outcome);

    // Rest a limit order, show the merged view, then cancel it.
    let limit = TradeRequest {
        order_type: OrderType::Limit(9.0),
        amount: 2.0,
        ..request
    };
    let outcome = panel.submit_order(&limit, &ctx).await;
    log::info!("limit submission outcome: {:?}", outcome);

    let active = panel.active_orders().await;
    log::info!("active orders: {}", active.len());
    for order in &active {
        log::info!(
            "  {} {} {} @ {:?} [{}]",
            order.id,
            order.side,
            order.quantity,
            order.price,
            order.status
        );
    }

    if let Some(order) = active.iter().find(|o| o.price.is_some()) {
        let outcome = panel.cancel_order(&order.id).await;
        log::info!("cancel outcome: {:?}", outcome);
    }

    log::info!("demo complete");
    Ok(())
}
