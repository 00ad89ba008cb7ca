use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use serde::Deserialize;
use time::{Date, Month, OffsetDateTime};
use tracing::{debug, warn};

use crate::config::ProviderConfig;
use crate::data_source::{BalanceSheetRequest, BalanceSheetSource, ReportFrequency, SourceError};
use crate::domain::line_items;
use crate::http_client::{HttpAuth, HttpClient, HttpRequest, NoopHttpClient, ReqwestHttpClient};
use crate::{BalanceSheet, BalanceSheetColumn, PeriodDate, ProviderId, Symbol};

const TIMESERIES_ORIGIN: &str =
    "https://query2.finance.yahoo.com/ws/fundamentals-timeseries/v1/finance/timeseries";
const COOKIE_URL: &str = "https://fc.yahoo.com";
const CRUMB_ENDPOINTS: [&str; 2] = [
    "https://query1.finance.yahoo.com/v1/test/getcrumb",
    "https://query2.finance.yahoo.com/v1/test/getcrumb",
];
const REFERER: &str = "https://finance.yahoo.com/";
const CRUMB_TTL: Duration = Duration::from_secs(3_600);
/// 2016-12-31T00:00:00Z, the earliest period Yahoo serves timeseries for.
const PERIOD_START: i64 = 1_483_142_400;

/// Mock-mode ticker that yields an empty snapshot.
pub const EMPTY_MOCK_SYMBOL: &str = "EMPTY";

/// Yahoo timeseries keys (without the `annual`/`quarterly` prefix) and the
/// row name each one is stored under.
const LINE_ITEM_KEYS: [(&str, &str); 10] = [
    ("CurrentDebt", line_items::SHORT_LONG_TERM_DEBT),
    ("LongTermDebt", line_items::LONG_TERM_DEBT),
    ("StockholdersEquity", line_items::STOCKHOLDERS_EQUITY),
    ("CurrentAssets", line_items::TOTAL_CURRENT_ASSETS),
    ("Inventory", line_items::INVENTORY),
    ("CurrentLiabilities", line_items::TOTAL_CURRENT_LIABILITIES),
    ("TotalAssets", line_items::TOTAL_ASSETS),
    (
        "TotalLiabilitiesNetMinorityInterest",
        line_items::TOTAL_LIABILITIES,
    ),
    ("CashAndCashEquivalents", line_items::CASH_AND_CASH_EQUIVALENTS),
    ("TotalDebt", line_items::TOTAL_DEBT),
];

// ============================================================================
// Yahoo Auth Manager - session cookie + crumb
// ============================================================================

#[derive(Debug)]
struct CachedCrumb {
    value: String,
    fetched_at: Instant,
}

/// Manages the crumb token Yahoo requires on fundamentals queries.
///
/// The session cookie itself lives in the transport's cookie jar (or in the
/// `YAHOO_COOKIE` override); only the crumb is cached here.
#[derive(Debug, Default)]
pub struct YahooAuthManager {
    crumb: Mutex<Option<CachedCrumb>>,
}

impl YahooAuthManager {
    fn cached(&self) -> Option<String> {
        let guard = self.crumb.lock().unwrap_or_else(PoisonError::into_inner);
        guard
            .as_ref()
            .filter(|cached| cached.fetched_at.elapsed() < CRUMB_TTL)
            .map(|cached| cached.value.clone())
    }

    /// Returns the cached crumb, running the cookie/crumb handshake when it
    /// is missing or older than one hour.
    pub async fn crumb(
        &self,
        http_client: &dyn HttpClient,
        auth: &HttpAuth,
        timeout_ms: u64,
    ) -> Result<String, SourceError> {
        if let Some(crumb) = self.cached() {
            return Ok(crumb);
        }

        let crumb = fetch_crumb(http_client, auth, timeout_ms).await?;
        *self.crumb.lock().unwrap_or_else(PoisonError::into_inner) = Some(CachedCrumb {
            value: crumb.clone(),
            fetched_at: Instant::now(),
        });
        Ok(crumb)
    }

    /// Drops the cached crumb so the next call re-authenticates.
    pub fn invalidate(&self) {
        *self.crumb.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

async fn fetch_crumb(
    http_client: &dyn HttpClient,
    auth: &HttpAuth,
    timeout_ms: u64,
) -> Result<String, SourceError> {
    if matches!(auth, HttpAuth::None) {
        // fc.yahoo.com answers 404 but sets the session cookie on the way.
        let request = HttpRequest::get(COOKIE_URL)
            .with_header("referer", REFERER)
            .with_timeout_ms(timeout_ms);
        http_client.execute(request).await.map_err(|e| {
            SourceError::unavailable(format!(
                "failed to fetch yahoo session cookie: {}",
                e.message()
            ))
        })?;
    }

    for endpoint in CRUMB_ENDPOINTS {
        let request = HttpRequest::get(endpoint)
            .with_header("referer", REFERER)
            .with_auth(auth)
            .with_timeout_ms(timeout_ms);

        let response = match http_client.execute(request).await {
            Ok(response) => response,
            Err(error) => {
                debug!(endpoint, error = %error, "crumb endpoint failed");
                continue;
            }
        };

        let body = response.body.trim();
        if response.status == 429 || body.to_ascii_lowercase().contains("too many requests") {
            return Err(SourceError::rate_limited(
                "yahoo rate limited while fetching crumb",
            ));
        }
        if !response.is_success() || body.contains("<html") || body.contains("<!DOCTYPE") {
            continue;
        }
        if !body.is_empty() && body.len() < 100 && !body.contains(' ') {
            return Ok(body.to_owned());
        }
    }

    Err(SourceError::unavailable(
        "failed to fetch yahoo crumb from all endpoints",
    ))
}

// ============================================================================
// Yahoo Adapter
// ============================================================================

/// Yahoo Finance balance-sheet adapter supporting real API calls and mock mode.
#[derive(Clone)]
pub struct YahooAdapter {
    http_client: Arc<dyn HttpClient>,
    auth: HttpAuth,
    auth_manager: Arc<YahooAuthManager>,
    timeout_ms: u64,
    use_real_api: bool,
}

impl Default for YahooAdapter {
    fn default() -> Self {
        Self {
            http_client: Arc::new(NoopHttpClient),
            auth: HttpAuth::None,
            auth_manager: Arc::new(YahooAuthManager::default()),
            timeout_ms: ProviderConfig::default().timeout_ms,
            use_real_api: false,
        }
    }
}

impl YahooAdapter {
    pub fn with_http_client(http_client: Arc<dyn HttpClient>, auth: HttpAuth) -> Self {
        let is_real = !http_client.is_mock();
        Self {
            http_client,
            auth,
            use_real_api: is_real,
            ..Self::default()
        }
    }

    /// Builds a live adapter from provider settings, or a mock one when
    /// `config.mock` is set.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, SourceError> {
        if config.mock {
            return Ok(Self::default().with_timeout_ms(config.timeout_ms));
        }

        let client = ReqwestHttpClient::from_config(config)
            .map_err(|error| SourceError::internal(error.message()))?;
        let auth = config
            .cookie
            .clone()
            .map_or(HttpAuth::None, HttpAuth::Cookie);

        Ok(Self::with_http_client(Arc::new(client), auth).with_timeout_ms(config.timeout_ms))
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub const fn is_mock(&self) -> bool {
        !self.use_real_api
    }

    async fn fetch_real_balance_sheet(
        &self,
        req: &BalanceSheetRequest,
    ) -> Result<BalanceSheet, SourceError> {
        let crumb = self
            .auth_manager
            .crumb(self.http_client.as_ref(), &self.auth, self.timeout_ms)
            .await?;

        let endpoint = timeseries_url(req, &crumb, OffsetDateTime::now_utc().unix_timestamp());
        debug!(symbol = %req.symbol, frequency = %req.frequency, "requesting yahoo balance sheet");

        let request = HttpRequest::get(endpoint)
            .with_header("referer", REFERER)
            .with_auth(&self.auth)
            .with_timeout_ms(self.timeout_ms);

        let response = self.http_client.execute(request).await.map_err(|error| {
            if error.retryable() {
                SourceError::unavailable(format!("yahoo transport error: {}", error.message()))
            } else {
                SourceError::internal(format!("yahoo transport error: {}", error.message()))
            }
        })?;

        match response.status {
            404 => {
                debug!(symbol = %req.symbol, "yahoo has no timeseries for symbol");
                return Ok(BalanceSheet::empty(req.symbol.clone()));
            }
            401 | 403 => {
                self.auth_manager.invalidate();
                warn!(status = response.status, "yahoo rejected session credentials");
                return Err(SourceError::unavailable(format!(
                    "yahoo rejected credentials with status {}",
                    response.status
                )));
            }
            429 => {
                return Err(SourceError::rate_limited("yahoo returned status 429"));
            }
            status if !response.is_success() => {
                warn!(status, symbol = %req.symbol, "yahoo timeseries request failed");
                return Err(SourceError::unavailable(format!(
                    "yahoo returned status {status}"
                )));
            }
            _ => {}
        }

        let sheet = parse_timeseries_response(req, &response.body)?;
        debug!(
            symbol = %req.symbol,
            columns = sheet.columns().len(),
            "parsed yahoo balance sheet"
        );
        Ok(sheet)
    }
}

impl BalanceSheetSource for YahooAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Yahoo
    }

    fn balance_sheet<'a>(
        &'a self,
        req: BalanceSheetRequest,
    ) -> Pin<Box<dyn Future<Output = Result<BalanceSheet, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            if self.use_real_api {
                self.fetch_real_balance_sheet(&req).await
            } else {
                fake_balance_sheet(&req)
            }
        })
    }
}

fn timeseries_url(req: &BalanceSheetRequest, crumb: &str, period_end: i64) -> String {
    let prefix = req.frequency.as_str();
    let types = LINE_ITEM_KEYS
        .iter()
        .map(|(key, _)| format!("{prefix}{key}"))
        .collect::<Vec<_>>()
        .join(",");
    let symbol = urlencoding::encode(req.symbol.as_str());

    format!(
        "{TIMESERIES_ORIGIN}/{symbol}?symbol={symbol}&type={types}&period1={PERIOD_START}&period2={period_end}&crumb={}",
        urlencoding::encode(crumb)
    )
}

fn line_item_label(key: &str) -> Option<&'static str> {
    LINE_ITEM_KEYS
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, label)| *label)
}

/// Folds Yahoo's one-series-per-line-item payload into dated columns.
fn parse_timeseries_response(
    req: &BalanceSheetRequest,
    body: &str,
) -> Result<BalanceSheet, SourceError> {
    let payload: YahooTimeseriesResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::malformed(format!("failed to parse yahoo timeseries: {e}")))?;

    if let Some(error) = &payload.timeseries.error {
        return Err(SourceError::unavailable(format!(
            "yahoo timeseries API error: {error}"
        )));
    }

    let prefix = req.frequency.as_str();
    let mut columns: BTreeMap<PeriodDate, BalanceSheetColumn> = BTreeMap::new();

    for mut series in payload.timeseries.result.unwrap_or_default() {
        let Some(series_type) = series.meta.types.first().cloned() else {
            continue;
        };
        let Some(label) = series_type.strip_prefix(prefix).and_then(line_item_label) else {
            continue;
        };
        let Some(points) = series.values.remove(&series_type) else {
            continue;
        };

        let points: Vec<Option<YahooTimeseriesPoint>> = serde_json::from_value(points)
            .map_err(|e| {
                SourceError::malformed(format!("invalid yahoo series '{series_type}': {e}"))
            })?;

        for point in points.into_iter().flatten() {
            let Some(value) = point.reported_value.and_then(|reported| reported.raw) else {
                continue;
            };
            let period_end = PeriodDate::parse(&point.as_of_date)
                .map_err(|e| SourceError::malformed(e.to_string()))?;

            columns
                .entry(period_end)
                .or_insert_with(|| BalanceSheetColumn::new(period_end))
                .insert(label, value)
                .map_err(|e| SourceError::malformed(e.to_string()))?;
        }
    }

    BalanceSheet::new(req.symbol.clone(), columns.into_values().collect())
        .map_err(|e| SourceError::malformed(e.to_string()))
}

// ============================================================================
// Yahoo Timeseries API Response Structures
// ============================================================================

#[derive(Debug, Deserialize)]
struct YahooTimeseriesResponse {
    timeseries: YahooTimeseriesData,
}

#[derive(Debug, Deserialize)]
struct YahooTimeseriesData {
    #[serde(default)]
    result: Option<Vec<YahooTimeseriesSeries>>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

/// One line item's history. The points sit under a key equal to the
/// series type, e.g. `"annualLongTermDebt": [...]`.
#[derive(Debug, Deserialize)]
struct YahooTimeseriesSeries {
    meta: YahooTimeseriesMeta,
    #[serde(flatten)]
    values: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct YahooTimeseriesMeta {
    #[serde(rename = "type", default)]
    types: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct YahooTimeseriesPoint {
    #[serde(rename = "asOfDate")]
    as_of_date: String,
    #[serde(rename = "reportedValue", default)]
    reported_value: Option<YahooRawValue>,
}

#[derive(Debug, Deserialize)]
struct YahooRawValue {
    #[serde(default)]
    raw: Option<f64>,
}

// ============================================================================
// Mock mode
// ============================================================================

const MOCK_ANCHOR_YEAR: i32 = 2024;
const MOCK_ANCHOR_MONTH: i32 = 9;

/// Deterministic synthetic balance sheet seeded from the symbol.
fn fake_balance_sheet(req: &BalanceSheetRequest) -> Result<BalanceSheet, SourceError> {
    if req.symbol.as_str().eq_ignore_ascii_case(EMPTY_MOCK_SYMBOL) {
        return Ok(BalanceSheet::empty(req.symbol.clone()));
    }

    let seed = symbol_seed(&req.symbol);
    let (periods, step_months) = match req.frequency {
        ReportFrequency::Annual => (4, 12),
        ReportFrequency::Quarterly => (5, 3),
    };

    let mut columns = Vec::with_capacity(periods);
    for index in 0..periods {
        let scale = 1.0 - 0.04 * index as f64;
        let usd = |base: u64, spread: u64| (base + seed % spread) as f64 * 1_000_000.0 * scale;

        let current_assets = usd(120_000, 40_000);
        let long_term_debt = usd(80_000, 30_000);
        let current_debt = usd(9_000, 6_000);
        let equity = usd(55_000, 40_000);
        let total_assets = current_assets + usd(200_000, 100_000);

        let column = BalanceSheetColumn::new(fake_period_end(index, step_months)?)
            .with_item(line_items::TOTAL_CURRENT_ASSETS, current_assets)
            .and_then(|c| c.with_item(line_items::INVENTORY, usd(4_000, 8_000)))
            .and_then(|c| c.with_item(line_items::TOTAL_CURRENT_LIABILITIES, usd(100_000, 50_000)))
            .and_then(|c| c.with_item(line_items::LONG_TERM_DEBT, long_term_debt))
            .and_then(|c| c.with_item(line_items::SHORT_LONG_TERM_DEBT, current_debt))
            .and_then(|c| c.with_item(line_items::TOTAL_DEBT, long_term_debt + current_debt))
            .and_then(|c| c.with_item(line_items::STOCKHOLDERS_EQUITY, equity))
            .and_then(|c| c.with_item(line_items::CASH_AND_CASH_EQUIVALENTS, usd(25_000, 20_000)))
            .and_then(|c| c.with_item(line_items::TOTAL_ASSETS, total_assets))
            .and_then(|c| c.with_item(line_items::TOTAL_LIABILITIES, total_assets - equity))
            .map_err(|e| SourceError::internal(e.to_string()))?;
        columns.push(column);
    }

    BalanceSheet::new(req.symbol.clone(), columns).map_err(|e| SourceError::internal(e.to_string()))
}

fn fake_period_end(index: usize, step_months: i32) -> Result<PeriodDate, SourceError> {
    let months = MOCK_ANCHOR_YEAR * 12 + (MOCK_ANCHOR_MONTH - 1) - index as i32 * step_months;
    let year = months.div_euclid(12);
    let month = u8::try_from(months.rem_euclid(12) + 1)
        .ok()
        .and_then(|value| Month::try_from(value).ok())
        .ok_or_else(|| SourceError::internal("mock period month out of range"))?;
    // Quarter ends only: March/December have 31 days, June/September 30.
    let day = match month {
        Month::March | Month::December => 31,
        _ => 30,
    };

    Date::from_calendar_date(year, month, day)
        .map(PeriodDate::from_date)
        .map_err(|e| SourceError::internal(e.to_string()))
}

fn symbol_seed(symbol: &Symbol) -> u64 {
    symbol.as_str().bytes().fold(0_u64, |acc, byte| {
        acc.wrapping_mul(33).wrapping_add(byte as u64)
    })
}
