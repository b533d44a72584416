use std::sync::{Arc, LazyLock};
use std::time::Duration;

use regex::Regex;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, Response, Url};
use shared::models::{TokenExchangeRequest, TokenResponse};
use tracing::{debug, info};

use super::{AuthTokens, bearer};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// CSRF cookie set by the identity provider on every page
pub const CSRF_COOKIE: &str = "x-ms-cpim-csrf";

/// Cookie carrying the refresh token on the booking service
pub const REFRESH_COOKIE: &str = "refresh_token";

static TRANS_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""transId":"(StateProperties=[^"]*)""#).expect("valid transId pattern")
});

/// One login attempt.
///
/// Every flow owns a fresh cookie jar; a failed flow cannot be resumed and a
/// new one has to be started.
pub struct AuthFlow {
    client: Client,
    jar: Arc<Jar>,
    config: ClientConfig,
    login_url: Url,
}

impl AuthFlow {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let login_url = Url::parse(&config.policy_url())
            .map_err(|e| ClientError::Config(format!("login url: {e}")))?;
        Url::parse(&config.share_url)
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
            login_url,
        })
    }

    /// Run the whole login and return the token pair.
    pub async fn authenticate(&self, username: &str, password: &str) -> ClientResult<AuthTokens> {
        info!("Signing in as {} via identity provider", username);

        let tx = self.authorize().await?;
        let csrf = self.csrf()?;

        self.self_asserted(&tx, &csrf, username, None).await?;
        self.confirm(&tx, &csrf).await?;

        // The confirmed page rotates the CSRF cookie
        let csrf = self.csrf()?;
        self.self_asserted(&tx, &csrf, username, Some(password)).await?;
        let redirect = self.confirm(&tx, &csrf).await?;

        let (code, state) = authorization_code(&redirect)?;
        let tokens = self.exchange(code, state).await?;
        info!("Authenticated with username and password");
        Ok(tokens)
    }

    /// Step 1: start the authorization and pick the transaction state out of the page
    async fn authorize(&self) -> ClientResult<String> {
        let url = format!("{}/api/auth0/authorize", self.config.share_url);
        let callback = self.config.callback_uri();
        let response = self
            .client
            .get(&url)
            .query(&[("callbackUri", callback.as_str()), ("emailHint", "")])
            .send()
            .await?;
        let body = ensure_success("authorize", response).await?.text().await?;
        let tx = extract_trans_id(&body)?;
        debug!("Transaction state: {}", tx);
        Ok(tx)
    }

    /// Steps 2 and 4: submit the sign-in name, then name and password
    async fn self_asserted(
        &self,
        tx: &str,
        csrf: &str,
        username: &str,
        password: Option<&str>,
    ) -> ClientResult<()> {
        let url = format!("{}/SelfAsserted", self.config.policy_url());
        let mut form = vec![("request_type", "RESPONSE"), ("signInName", username)];
        if let Some(password) = password {
            form.push(("password", password));
        }
        let step = if password.is_some() {
            "password submission"
        } else {
            "username submission"
        };

        let response = self
            .client
            .post(&url)
            .query(&[("tx", tx), ("p", self.config.policy.as_str())])
            .header("X-CSRF-TOKEN", csrf)
            .form(&form)
            .send()
            .await?;
        ensure_success(step, response).await?;
        Ok(())
    }

    /// Steps 3 and 5: advance the flow; returns the final URL after redirects
    async fn confirm(&self, tx: &str, csrf: &str) -> ClientResult<Url> {
        let url = format!(
            "{}/api/CombinedSigninAndSignup/confirmed",
            self.config.policy_url()
        );
        let response = self
            .client
            .get(&url)
            .query(&[
                ("tx", tx),
                ("p", self.config.policy.as_str()),
                ("csrf_token", csrf),
            ])
            .send()
            .await?;
        let response = ensure_success("confirmation", response).await?;
        Ok(response.url().clone())
    }

    /// Step 6: trade the authorization code for tokens
    async fn exchange(&self, code: String, state: String) -> ClientResult<AuthTokens> {
        let url = format!("{}/api/auth0/get-token", self.config.share_url);
        let request = TokenExchangeRequest {
            code,
            redirect_uri: self.config.callback_uri(),
            state,
        };
        let response = self.client.post(&url).json(&request).send().await?;
        let response = ensure_success("token exchange", response).await?;
        let cookie = response_cookie(&response, REFRESH_COOKIE);
        let token: TokenResponse = response.json().await?;

        let refresh_token = cookie
            .or(token.refresh_token)
            .ok_or_else(|| ClientError::MissingField("refresh token".into()))?;

        Ok(AuthTokens {
            bearer_token: bearer(&token.access_token),
            refresh_token,
        })
    }

    fn csrf(&self) -> ClientResult<String> {
        cookie_value(&self.jar, &self.login_url, CSRF_COOKIE)
            .ok_or_else(|| ClientError::MissingField(format!("{CSRF_COOKIE} cookie")))
    }
}

/// Fail the flow on any non-2xx answer
pub(crate) async fn ensure_success(
    step: &'static str,
    response: Response,
) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Status { step, status, body })
}

/// Transaction state embedded in the login page
pub(crate) fn extract_trans_id(html: &str) -> ClientResult<String> {
    TRANS_ID
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| ClientError::MissingField("transaction state in login page".into()))
}

/// `code` and `state` carried by the callback redirect
pub(crate) fn authorization_code(url: &Url) -> ClientResult<(String, String)> {
    let param = |name: &str| {
        url.query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
            .ok_or_else(|| ClientError::MissingField(format!("'{name}' in redirect {url}")))
    };
    Ok((param("code")?, param("state")?))
}

/// Value of a cookie set by this response, whatever its `Path`
pub(crate) fn response_cookie(response: &Response, name: &str) -> Option<String> {
    response
        .cookies()
        .find(|c| c.name() == name)
        .map(|c| c.value().to_string())
}

/// Value of a cookie the jar would send to `url`
pub(crate) fn cookie_value(jar: &Jar, url: &Url, name: &str) -> Option<String> {
    let header = jar.cookies(url)?;
    let header = header.to_str().ok()?;
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}
