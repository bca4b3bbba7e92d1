use super::common::{AlpacaBar, AlpacaBarsPage};
use crate::config::AlpacaConfig;
use crate::domain::errors::MarketDataError;
use crate::domain::market::{DailyBar, DateRange, build_history_table};
use crate::domain::ports::MarketDataService;
use crate::domain::price_table::PriceTable;
use crate::infrastructure::core::http_client_factory::{HttpClientFactory, build_url_with_query};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use reqwest_middleware::ClientWithMiddleware;
use std::collections::HashMap;
use tracing::{debug, error, info};

const PAGE_LIMIT: &str = "10000";

/// Daily price history from the Alpaca market data REST API.
pub struct AlpacaMarketDataService {
    client: ClientWithMiddleware,
    api_key: String,
    api_secret: String,
    data_base_url: String,
    feed: String,
}

impl AlpacaMarketDataService {
    pub fn new(config: &AlpacaConfig) -> Self {
        Self::with_client(config, HttpClientFactory::create_client())
    }

    pub fn with_client(config: &AlpacaConfig, client: ClientWithMiddleware) -> Self {
        Self {
            client,
            api_key: config.api_key.clone(),
            api_secret: config.secret_key.clone(),
            data_base_url: config.data_url.trim_end_matches('/').to_string(),
            feed: config.feed.clone(),
        }
    }

    fn day_start(date: NaiveDate) -> String {
        date.and_time(NaiveTime::MIN).and_utc().to_rfc3339()
    }

    /// Fetches every page of daily bars for `symbols` over `range`.
    async fn fetch_daily_bars(
        &self,
        symbols: &[String],
        range: &DateRange,
    ) -> Result<HashMap<String, Vec<AlpacaBar>>, MarketDataError> {
        let url = format!("{}/v2/stocks/bars", self.data_base_url);
        let mut all_bars: HashMap<String, Vec<AlpacaBar>> = HashMap::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query_params = vec![
                ("symbols", symbols.join(",")),
                ("start", Self::day_start(range.start)),
                // Daily bars are stamped after midnight, so the end day is excluded
                ("end", Self::day_start(range.end)),
                ("timeframe", "1Day".to_string()),
                ("limit", PAGE_LIMIT.to_string()),
                ("feed", self.feed.clone()),
            ];
            if let Some(token) = &page_token {
                query_params.push(("page_token", token.clone()));
            }

            debug!(
                "AlpacaMarketDataService: Fetching daily bars from {} for {:?} ({})",
                url, symbols, range
            );

            let response = self
                .client
                .get(build_url_with_query(&url, &query_params))
                .header("APCA-API-KEY-ID", &self.api_key)
                .header("APCA-API-SECRET-KEY", &self.api_secret)
                .send()
                .await
                .map_err(|e| MarketDataError::Http(e.to_string()))?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                error!(
                    "AlpacaMarketDataService: Bars request failed with {}: {}",
                    status, body
                );
                return Err(MarketDataError::Api {
                    status: status.as_u16(),
                    body,
                });
            }

            let page: AlpacaBarsPage = response
                .json()
                .await
                .map_err(|e| MarketDataError::Decode(e.to_string()))?;

            for (symbol, bars) in page.bars.unwrap_or_default() {
                all_bars.entry(symbol).or_default().extend(bars);
            }

            page_token = page.next_page_token;
            if page_token.is_none() {
                break;
            }
        }

        Ok(all_bars)
    }
}

#[async_trait]
impl MarketDataService for AlpacaMarketDataService {
    async fn load_stock_data(
        &self,
        symbols: &[String],
        range: &DateRange,
    ) -> Result<PriceTable, MarketDataError> {
        let symbols: Vec<String> = symbols.iter().map(|s| s.trim().to_uppercase()).collect();
        if symbols.is_empty() || symbols.iter().any(String::is_empty) {
            return Err(MarketDataError::InvalidArgument {
                reason: "ticker symbols must be non-empty".to_string(),
            });
        }

        let raw = self.fetch_daily_bars(&symbols, range).await?;

        let mut bars: HashMap<String, Vec<DailyBar>> = HashMap::new();
        for (symbol, alpaca_bars) in raw {
            let daily = alpaca_bars
                .iter()
                .map(AlpacaBar::to_daily_bar)
                .collect::<Result<Vec<_>, _>>()?;
            bars.insert(symbol, daily);
        }

        let table = build_history_table(&symbols, &bars)?;
        info!("Stock data for {:?} loaded successfully ({} rows)", symbols, table.len());
        Ok(table)
    }
}
