//! Blocking client for the analytics service's versioned JSON API.
//!
//! The service gates everything behind a cookie session, so the client is
//! built with a cookie store: `login` establishes the session and every later
//! request carries it automatically. Each dashboard panel has its own fetcher;
//! `fetch_dashboard` runs them in parallel and isolates failures per panel.

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::domain::{
    CategoryProfit, CategorySlice, CustomerPin, DashboardFilters, DiscountImpact, FetchState,
    ForecastRow, KpiSet, MarginPoint, SalesLocation, SalesRow,
};
use crate::error::AppError;
use crate::series::{MergeWarning, merge_rows};

/// Connection settings, read from the environment.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl ApiConfig {
    /// Read `PULSE_API_URL` / `PULSE_API_USERNAME` / `PULSE_API_PASSWORD`
    /// after loading `.env`. A missing URL is a configuration error; missing
    /// credentials are allowed (the status endpoint is anonymous).
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let base_url = std::env::var("PULSE_API_URL").map_err(|_| {
            AppError::usage("Missing PULSE_API_URL in environment (.env). Or run with --sample.")
        })?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            username: std::env::var("PULSE_API_USERNAME").ok(),
            password: std::env::var("PULSE_API_PASSWORD").ok(),
        })
    }
}

/// The `/api/v1/sales/forecast` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastResponse {
    pub historical: Vec<SalesRow>,
    pub forecast: Vec<ForecastRow>,
    pub note: Option<String>,
}

/// The merged forecast panel handed to rendering layers.
#[derive(Debug, Clone, Default)]
pub struct ForecastPanel {
    pub points: Vec<crate::domain::MergedPoint>,
    pub warnings: Vec<MergeWarning>,
    pub note: Option<String>,
}

/// All dashboard panels, each in its own fetch state so one failed endpoint
/// never blanks the others.
#[derive(Debug, Clone, Default)]
pub struct DashboardData {
    pub kpis: FetchState<KpiSet>,
    pub daily: FetchState<Vec<SalesRow>>,
    pub categories: FetchState<Vec<CategorySlice>>,
    pub profit: FetchState<Vec<CategoryProfit>>,
    pub forecast: FetchState<ForecastPanel>,
    pub pins: FetchState<Vec<CustomerPin>>,
    pub locations: FetchState<Vec<SalesLocation>>,
    /// Transaction-level breakdowns; only derivable offline, so API mode
    /// leaves them `Idle`.
    pub margins: FetchState<Vec<MarginPoint>>,
    pub discounts: FetchState<DiscountImpact>,
}

pub struct ApiClient {
    http: Client,
    base: String,
}

#[derive(Debug, Deserialize)]
struct AuthStatusReply {
    #[serde(rename = "isLoggedIn")]
    is_logged_in: bool,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, AppError> {
        let http = Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| AppError::network(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base: config.base_url.clone(),
        })
    }

    /// POST `/api/v1/auth/login`; the session cookie lands in the cookie
    /// store. A 401 surfaces the server's own message.
    pub fn login(&self, username: &str, password: &str) -> Result<(), AppError> {
        let url = format!("{}/api/v1/auth/login", self.base);
        let resp = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "username": username, "password": password }))
            .send()
            .map_err(|e| AppError::network(format!("Login request failed: {e}")))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        Err(AppError::network(format!(
            "Login rejected ({status}): {}",
            server_message(resp)
        )))
    }

    pub fn auth_status(&self) -> Result<bool, AppError> {
        let reply: AuthStatusReply = self.get_json("/api/v1/auth/status", &[])?;
        Ok(reply.is_logged_in)
    }

    pub fn logout(&self) -> Result<(), AppError> {
        let url = format!("{}/api/v1/auth/logout", self.base);
        let resp = self
            .http
            .post(&url)
            .send()
            .map_err(|e| AppError::network(format!("Logout request failed: {e}")))?;
        if !resp.status().is_success() {
            return Err(AppError::network(format!(
                "Logout failed with status {}.",
                resp.status()
            )));
        }
        Ok(())
    }

    pub fn kpis(&self, filters: &DashboardFilters) -> Result<KpiSet, AppError> {
        self.get_json("/api/v1/kpis", &filters.query_pairs())
    }

    pub fn sales_over_time(&self, filters: &DashboardFilters) -> Result<Vec<SalesRow>, AppError> {
        self.get_json("/api/v1/sales/over_time", &filters.query_pairs())
    }

    pub fn sales_by_category(
        &self,
        filters: &DashboardFilters,
    ) -> Result<Vec<CategorySlice>, AppError> {
        self.get_json("/api/v1/sales/by_category", &filters.query_pairs())
    }

    pub fn profit_by_category(
        &self,
        filters: &DashboardFilters,
    ) -> Result<Vec<CategoryProfit>, AppError> {
        self.get_json("/api/v1/profit/by_category", &filters.query_pairs())
    }

    pub fn locations(&self) -> Result<Vec<SalesLocation>, AppError> {
        self.get_json("/api/v1/locations", &[])
    }

    pub fn customer_locations(&self) -> Result<Vec<CustomerPin>, AppError> {
        // The endpoint returns bare [lon, lat] pairs.
        let pairs: Vec<[f64; 2]> = self.get_json("/api/v1/customers/locations", &[])?;
        Ok(CustomerPin::from_pairs(&pairs))
    }

    pub fn sales_forecast(
        &self,
        filters: &DashboardFilters,
        days: usize,
    ) -> Result<ForecastResponse, AppError> {
        let mut query = filters.query_pairs();
        query.push(("days", days.to_string()));
        self.get_json("/api/v1/sales/forecast", &query)
    }

    /// Fetch every panel, in parallel, each failure captured in its own
    /// `FetchState::Failed` instead of aborting the whole refresh.
    pub fn fetch_dashboard(&self, filters: &DashboardFilters, forecast_days: usize) -> DashboardData {
        let ((kpis, daily), ((categories, profit), (forecast, (pins, locations)))) = rayon::join(
            || {
                rayon::join(
                    || to_state(self.kpis(filters)),
                    || to_state(self.sales_over_time(filters)),
                )
            },
            || {
                rayon::join(
                    || {
                        rayon::join(
                            || to_state(self.sales_by_category(filters)),
                            || to_state(self.profit_by_category(filters)),
                        )
                    },
                    || {
                        rayon::join(
                            || to_state(self.fetch_forecast_panel(filters, forecast_days)),
                            || {
                                rayon::join(
                                    || to_state(self.customer_locations()),
                                    || to_state(self.locations()),
                                )
                            },
                        )
                    },
                )
            },
        );

        DashboardData {
            kpis,
            daily,
            categories,
            profit,
            forecast,
            pins,
            locations,
            margins: FetchState::Idle,
            discounts: FetchState::Idle,
        }
    }

    fn fetch_forecast_panel(
        &self,
        filters: &DashboardFilters,
        days: usize,
    ) -> Result<ForecastPanel, AppError> {
        let resp = self.sales_forecast(filters, days)?;
        let outcome = merge_rows(&resp.historical, &resp.forecast);
        Ok(ForecastPanel {
            points: outcome.points,
            warnings: outcome.warnings,
            note: resp.note,
        })
    }

    fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, AppError> {
        let url = format!("{}{path}", self.base);
        let resp = self
            .http
            .get(&url)
            .query(query)
            .send()
            .map_err(|e| AppError::network(format!("Request to {path} failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::network(format!(
                "{path} returned {status}: {}",
                server_message(resp)
            )));
        }

        resp.json::<T>()
            .map_err(|e| AppError::data(format!("Failed to parse {path} response: {e}")))
    }
}

fn to_state<T>(result: Result<T, AppError>) -> FetchState<T> {
    match result {
        Ok(v) => FetchState::Ready(v),
        Err(e) => FetchState::Failed(e.to_string()),
    }
}

/// Pull the server's `message`/`error` field out of an error body, falling
/// back to the raw text.
fn server_message(resp: reqwest::blocking::Response) -> String {
    let body = resp.text().unwrap_or_default();
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(&body) {
        for key in ["message", "error"] {
            if let Some(msg) = value.get(key).and_then(|v| v.as_str()) {
                return msg.to_string();
            }
        }
    }
    if body.is_empty() {
        "no response body".to_string()
    } else {
        body
    }
}
