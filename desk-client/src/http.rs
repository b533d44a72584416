//! HTTP session against the booking service

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use reqwest::cookie::Jar;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::models::{
    ColleagueReservationsRequest, ColleagueReservationsResponse, DeskRecord, DeskZoneMapRequest,
    DeskZoneMapResponse, EmployeeContext, EmployeeRecord, EmployeesRequest, EmployeesResponse,
    MyDeskViewResponse, MyReservationRecord, RefreshResponse, ReleaseDeskRequest,
    ReservationRecord, SearchColleagueRequest, SearchColleagueResponse, TakeDeskRequest,
    ZoneDaysRequest, ZoneDaysResponse, ZoneRecord, ZonesResponse,
};
use tracing::{debug, info};

use crate::auth::{
    AuthFlow, REFRESH_COOKIE, bearer, cookie_value, ensure_success, response_cookie,
};
use crate::config::ClientConfig;
use crate::credential::{Secret, SecretStorage};
use crate::error::{ClientError, ClientResult};

/// Employees are listed for a day this far ahead; same-day listings leave
/// some people out.
const EMPLOYEE_LISTING_OFFSET_DAYS: u64 = 32;

/// Typed operations of the booking service.
///
/// Every call is a single request; nothing is retried or paginated.
#[async_trait]
pub trait DeskApi: Send + Sync {
    async fn get_zones(&self) -> ClientResult<Vec<ZoneRecord>>;
    async fn get_desk_zone_map(&self, zone_id: &str, day: NaiveDate)
    -> ClientResult<Vec<DeskRecord>>;
    /// Days of the zone on which the caller holds no desk yet
    async fn get_available_days(&self, zone_id: &str) -> ClientResult<Vec<NaiveDate>>;
    async fn get_employees(&self) -> ClientResult<Vec<EmployeeRecord>>;
    async fn get_employee_reservations(
        &self,
        employee_id: &str,
    ) -> ClientResult<Vec<ReservationRecord>>;
    async fn get_my_context(&self) -> ClientResult<EmployeeContext>;
    async fn get_my_reservations(&self) -> ClientResult<Vec<MyReservationRecord>>;
    async fn search_colleague(&self, query: &str) -> ClientResult<Vec<EmployeeRecord>>;
    /// Raw take response; interpreting it is up to the caller
    async fn take_desk(&self, zone_id: &str, desk_id: &str, day: NaiveDate) -> ClientResult<Value>;
    async fn release_desk(&self, day: NaiveDate) -> ClientResult<Value>;
    /// Base map image, `None` when the service answers with a non-success status
    async fn get_zone_image(&self, zone_id: &str) -> ClientResult<Option<Vec<u8>>>;
}

/// Authenticated session with the booking service.
///
/// Owns the bearer header and the refresh cookie; nothing else is mutated
/// after [`DeskSession::login`].
#[derive(Debug, Clone)]
pub struct DeskSession {
    client: Client,
    jar: Arc<Jar>,
    config: ClientConfig,
    share_url: Url,
    token: Option<String>,
}

impl DeskSession {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let share_url = Url::parse(&config.share_url)
            .map_err(|e| ClientError::Config(format!("share url: {e}")))?;
        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(jar.clone())
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            jar,
            config: config.clone(),
            share_url,
            token: None,
        })
    }

    /// Use an already known bearer header value
    pub fn with_token(mut self, bearer_token: impl Into<String>) -> Self {
        self.token = Some(bearer_token.into());
        self
    }

    /// Current `Authorization` header value
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // ========== Auth ==========

    /// Log in, preferring the stored secret.
    ///
    /// A missing, corrupt or expired secret falls back to the full identity
    /// provider login. The secret file is rewritten after every success.
    pub async fn login(&mut self, username: &str, password: &str) -> ClientResult<()> {
        let storage = self.config.secret_path.clone().map(SecretStorage::new);

        info!("Trying to authenticate with stored secrets");
        let secret = match self.restore(storage.as_ref()).await {
            Ok(secret) => {
                info!("Successfully authenticated with stored secrets");
                secret
            }
            Err(e) => {
                info!(
                    "Failed to authenticate with stored secrets ({}). Trying with normal login.",
                    e
                );
                let tokens = AuthFlow::new(&self.config)?
                    .authenticate(username, password)
                    .await?;
                Secret::from(tokens)
            }
        };

        self.set_secrets(&secret.bearer_token, &secret.refresh_token);
        if let Some(storage) = storage {
            storage.save(&secret)?;
            debug!("Secret saved to {:?}", storage.path());
        }
        Ok(())
    }

    async fn restore(&mut self, storage: Option<&SecretStorage>) -> ClientResult<Secret> {
        let storage =
            storage.ok_or_else(|| ClientError::Secret("no secret file configured".into()))?;
        let secret = storage.load()?.ok_or_else(|| {
            ClientError::Secret(format!("no secret stored at {}", storage.path().display()))
        })?;
        self.set_secrets(&secret.bearer_token, &secret.refresh_token);
        self.refresh().await
    }

    /// Exchange the refresh cookie for a new access token.
    ///
    /// Keeps the current refresh token when the service does not rotate it.
    pub async fn refresh(&mut self) -> ClientResult<Secret> {
        let url = format!("{}/auth0/try-refresh-token", self.config.api_url());
        let mut request = self.client.post(&url).json(&serde_json::json!({}));
        if let Some(auth) = self.token.as_deref() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }
        let response = ensure_success("token refresh", request.send().await?).await?;
        let rotated = response_cookie(&response, REFRESH_COOKIE);
        let body: RefreshResponse = response.json().await?;

        let access = body.new_token_or_null.ok_or(ClientError::Unauthorized)?;
        let refresh_token = rotated
            .or_else(|| cookie_value(&self.jar, &self.share_url, REFRESH_COOKIE))
            .ok_or_else(|| ClientError::MissingField(format!("{REFRESH_COOKIE} cookie")))?;

        let secret = Secret::new(bearer(&access.access_token), refresh_token);
        self.set_secrets(&secret.bearer_token, &secret.refresh_token);
        Ok(secret)
    }

    fn set_secrets(&mut self, bearer_token: &str, refresh_token: &str) {
        self.token = Some(bearer_token.to_string());
        self.jar.add_cookie_str(
            &format!("{REFRESH_COOKIE}={refresh_token}; Path=/"),
            &self.share_url,
        );
    }

    // ========== Transport ==========

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_url(), path.trim_start_matches('/'))
    }

    fn authorize(&self, mut request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(auth) = self.token.as_deref() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }
        request
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        debug!("GET {}", path);
        let response = self.authorize(self.client.get(self.url(path))).send().await?;
        Self::handle_response(response).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        debug!("POST {}", path);
        let request = self.client.post(self.url(path)).json(body);
        let response = self.authorize(request).send().await?;
        Self::handle_response(response).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        debug!("POST {}", path);
        let response = self.authorize(self.client.post(self.url(path))).send().await?;
        Self::handle_response(response).await
    }

    /// POST and hand back whatever JSON came back, whatever the status
    async fn post_raw<B: Serialize + Sync>(&self, path: &str, body: &B) -> ClientResult<Value> {
        debug!("POST {}", path);
        let request = self.client.post(self.url(path)).json(body);
        let response = self.authorize(request).send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            debug!("{} answered HTTP {}", path, status);
        }
        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }

    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return match status {
                StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
                _ => Err(ClientError::Status {
                    step: "API request",
                    status,
                    body,
                }),
            };
        }
        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| ClientError::InvalidResponse(format!("{e}: {text}")))
    }
}

#[async_trait]
impl DeskApi for DeskSession {
    async fn get_zones(&self) -> ClientResult<Vec<ZoneRecord>> {
        let resp: ZonesResponse = self
            .post_empty("employee-desks/desk-marketplace/get-marketplace-zones")
            .await?;
        Ok(resp.zones)
    }

    async fn get_desk_zone_map(
        &self,
        zone_id: &str,
        day: NaiveDate,
    ) -> ClientResult<Vec<DeskRecord>> {
        let request = DeskZoneMapRequest {
            date: day,
            desk_zone_id: zone_id.to_string(),
        };
        let resp: DeskZoneMapResponse = self
            .post(
                "employee-desks/desk-marketplace/get-marketplace-desk-zone-map",
                &request,
            )
            .await?;
        Ok(resp.into_desks())
    }

    async fn get_available_days(&self, zone_id: &str) -> ClientResult<Vec<NaiveDate>> {
        let request = ZoneDaysRequest {
            zone_id: zone_id.to_string(),
        };
        let resp: ZoneDaysResponse = self
            .post("employee-desks/desk-marketplace/get-marketplace-desks", &request)
            .await?;
        Ok(resp.available_days())
    }

    async fn get_employees(&self) -> ClientResult<Vec<EmployeeRecord>> {
        let today = chrono::Local::now().date_naive();
        let day = today
            .checked_add_days(Days::new(EMPLOYEE_LISTING_OFFSET_DAYS))
            .unwrap_or(today);
        let request = EmployeesRequest {
            days_to_share: vec![day],
        };
        let resp: EmployeesResponse = self
            .post("employee-reservations/get-employees", &request)
            .await?;
        Ok(resp.employees_or_null.unwrap_or_default())
    }

    async fn get_employee_reservations(
        &self,
        employee_id: &str,
    ) -> ClientResult<Vec<ReservationRecord>> {
        let request = ColleagueReservationsRequest {
            colleague_id: employee_id.to_string(),
        };
        let resp: ColleagueReservationsResponse = self
            .post(
                "employee-desks/colleague-finder/get-colleague-desk-reservations",
                &request,
            )
            .await?;
        Ok(resp.desk_reservations)
    }

    async fn get_my_context(&self) -> ClientResult<EmployeeContext> {
        self.post("get-employee-context", &serde_json::json!({})).await
    }

    async fn get_my_reservations(&self) -> ClientResult<Vec<MyReservationRecord>> {
        let resp: MyDeskViewResponse = self
            .get("employee-desks/my-desk/initialize-my-desk-view")
            .await?;
        Ok(resp.reservations)
    }

    async fn search_colleague(&self, query: &str) -> ClientResult<Vec<EmployeeRecord>> {
        let request = SearchColleagueRequest {
            full_name_query: query.to_string(),
        };
        let resp: SearchColleagueResponse = self
            .post("employee-desks/colleague-finder/search", &request)
            .await?;
        Ok(resp.found_employees)
    }

    async fn take_desk(&self, zone_id: &str, desk_id: &str, day: NaiveDate) -> ClientResult<Value> {
        let request = TakeDeskRequest {
            day_to_take: day,
            zone_id: zone_id.to_string(),
            desk_id_or_null: Some(desk_id.to_string()),
        };
        self.post_raw("employee-desks/desk-marketplace/take", &request)
            .await
    }

    async fn release_desk(&self, day: NaiveDate) -> ClientResult<Value> {
        let request = ReleaseDeskRequest { days_to_share: day };
        self.post_raw("employee-desks/share-desk/free", &request).await
    }

    async fn get_zone_image(&self, zone_id: &str) -> ClientResult<Option<Vec<u8>>> {
        let path = format!("components/desk-zone-map/desk-zone-map-image/{zone_id}");
        debug!("GET {}", path);
        let response = self.authorize(self.client.get(self.url(&path))).send().await?;
        if !response.status().is_success() {
            debug!("No map image for zone {} (HTTP {})", zone_id, response.status());
            return Ok(None);
        }
        Ok(Some(response.bytes().await?.to_vec()))
    }
}
