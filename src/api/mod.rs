//! HTTP API
//! Accepts an ordered trade list and returns the symbol-keyed position map

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::atomic::Ordering;
use std::time::Instant;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::{Instrument, InstrumentType, Position, Side, Trade, ValidationError};
use crate::engine::{accumulate, AccumulateError};
use crate::observability::health::{self, HealthState};
use crate::observability::metrics::get_metrics;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRequest {
    pub symbol: String,
    pub instrument_type: InstrumentType,
    pub side: Side,
    pub quantity: i64,
    pub price: Decimal,
    pub trade_time: DateTime<Utc>,
    pub portfolio_id: Uuid,
}

impl TradeRequest {
    fn into_trade(self) -> Result<Trade, ValidationError> {
        let instrument = Instrument::new(self.symbol, self.instrument_type)?;
        Trade::new(
            instrument,
            self.side,
            self.quantity,
            self.price,
            self.trade_time,
            self.portfolio_id,
        )
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("trade list is required")]
    MissingTradeList,
    #[error("trade at index {0} is missing")]
    MissingTrade(usize),
    #[error("invalid trade at index {index}: {source}")]
    InvalidTrade {
        index: usize,
        source: ValidationError,
    },
    #[error(transparent)]
    DomainViolation(#[from] AccumulateError),
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::MissingTradeList
            | ApiError::MissingTrade(_)
            | ApiError::InvalidTrade { .. } => "invalid_input",
            ApiError::DomainViolation(_) => "domain_violation",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::DomainViolation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.to_string(),
            "code": self.code(),
        });
        (self.status(), Json(body)).into_response()
    }
}

/// Full application router: positions endpoint plus health/metrics routes.
pub fn router(state: HealthState) -> Router {
    Router::new()
        .route("/positions", post(compute_positions))
        .merge(health::routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind and serve until ctrl-c.
pub async fn serve(port: u16, state: HealthState) -> anyhow::Result<()> {
    let ready = state.ready.clone();
    let app = router(state);

    let listener = TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    ready.store(true, Ordering::Relaxed);
    info!(port = port, "HTTP server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.ok();
    info!("Received shutdown signal");
}

#[instrument(skip_all)]
async fn compute_positions(
    body: Option<Json<Option<Vec<Option<TradeRequest>>>>>,
) -> Result<Json<HashMap<String, Position>>, ApiError> {
    // A missing or `null` body and a `null` element are caller bugs, reported
    // before any position is computed.
    let requests = body
        .and_then(|Json(inner)| inner)
        .ok_or(ApiError::MissingTradeList)?;

    let mut trades = Vec::with_capacity(requests.len());
    for (index, request) in requests.into_iter().enumerate() {
        let request = request.ok_or(ApiError::MissingTrade(index))?;
        let trade = request
            .into_trade()
            .map_err(|source| ApiError::InvalidTrade { index, source })?;
        trades.push(trade);
    }

    let started = Instant::now();
    let result = accumulate(&trades);

    if let Some(ref metrics) = *get_metrics() {
        metrics
            .accumulation_duration
            .with_label_values(&["accumulate"])
            .observe(started.elapsed().as_secs_f64());
        let status = if result.is_ok() { "ok" } else { "rejected" };
        metrics
            .accumulations_total
            .with_label_values(&[status])
            .inc();
        if result.is_ok() {
            for trade in &trades {
                let side = match trade.side() {
                    Side::Buy => "buy",
                    Side::Sell => "sell",
                };
                metrics.trades_applied_total.with_label_values(&[side]).inc();
            }
        }
    }

    let positions = result?;

    if let Some(ref metrics) = *get_metrics() {
        metrics.positions_computed_total.inc_by(positions.len() as f64);
    }

    info!(
        trades = trades.len(),
        positions = positions.len(),
        "Positions computed"
    );

    Ok(Json(positions))
}
