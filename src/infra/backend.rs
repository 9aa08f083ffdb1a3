//! Thin asynchronous client for the pickup backend.
//!
//! - Session routes: sign-in and sign-out (form posts, cookie session).
//! - Engineer routes: price calculation and inspection submission (JSON).
//! - User routes: pickup requests (url-encoded form, like the web form).
//!
//! Redirects are never followed. The backend answers most refusals with a
//! redirect, so the client reads the `Location` itself.

use std::sync::Arc;

use reqwest::{
    cookie::Jar, header::LOCATION, redirect::Policy, Client, RequestBuilder, Response, Url,
};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::domain::{
    InspectionSubmission, PickupRequestForm, PriceRequest, PriceResponse, Role, SubmissionResult,
};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/";
/// Flash message the backend shows when it refuses a pickup weight.
pub const INVALID_WEIGHT_FLASH: &str = "Invalid weight provided";
const USER_AGENT: &str = concat!("pickup-inspector/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("not signed in with an account that may do this")]
    Unauthenticated,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("request refused: {0}")]
    Rejected(String),
    #[error("unexpected redirect to {0}")]
    UnexpectedRedirect(String),
}

/// Backend operations the inspection flow depends on.
#[allow(async_fn_in_trait)]
pub trait EngineerApi {
    async fn calculate_price(&self, request: &PriceRequest) -> Result<PriceResponse, BackendError>;

    async fn submit_inspection(
        &self,
        pickup_id: &str,
        submission: &InspectionSubmission,
    ) -> Result<SubmissionResult, BackendError>;
}

/// Cookie jar shared by every client built for one sign-in.
#[derive(Clone, Default)]
pub struct Session {
    jar: Arc<Jar>,
}

#[derive(Clone, Debug)]
pub struct BackendClient {
    http: Client,
    base_url: Url,
}

impl BackendClient {
    pub fn new() -> Result<Self, BackendError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Client with a session of its own.
    pub fn with_base_url(base: &str) -> Result<Self, BackendError> {
        Self::with_session(base, &Session::default())
    }

    pub fn with_session(base: &str, session: &Session) -> Result<Self, BackendError> {
        let mut base_url = Url::parse(base)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let builder = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(Policy::none())
            .cookie_provider(Arc::clone(&session.jar));
        #[cfg(test)]
        let builder = builder.no_proxy();
        let http = builder.build()?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Signs in with the backend's login form. The session cookie lands in
    /// the shared jar; the returned role comes from the post-login landing.
    pub async fn login(&self, email: &str, password: &str) -> Result<Role, BackendError> {
        let url = self.url("login")?;
        tracing::info!(%url, email, "signing in");
        let response = self
            .http
            .post(url)
            .form(&[("email", email), ("password", password)])
            .send()
            .await?;
        // A failed sign-in re-renders the login page instead of redirecting.
        if redirect_target(&response)?.is_none() {
            response.error_for_status()?;
            return Err(BackendError::InvalidCredentials);
        }
        self.current_role().await
    }

    /// Role of the signed-in account, read from where the backend sends it.
    pub async fn current_role(&self) -> Result<Role, BackendError> {
        let response = self.http.get(self.url("redirect")?).send().await?;
        let target = redirect_target(&response)?.ok_or(BackendError::Unauthenticated)?;
        Role::LANDINGS
            .iter()
            .find(|(page, _)| self.is_page(&target, page))
            .map(|(_, role)| *role)
            .ok_or_else(|| self.redirect_error(&target))
    }

    pub async fn logout(&self) -> Result<(), BackendError> {
        let response = self.http.get(self.url("logout")?).send().await?;
        if redirect_target(&response)?.is_none() {
            response.error_for_status()?;
        }
        tracing::info!("signed out");
        Ok(())
    }

    /// Posts a pickup request the same way the browser form does.
    ///
    /// The backend always redirects: to the sign-in page without a user
    /// session, otherwise to the user dashboard, where the outcome is shown
    /// as a flash message.
    pub async fn request_pickup(&self, form: &PickupRequestForm) -> Result<(), BackendError> {
        let url = self.url("user/request")?;
        tracing::info!(%url, area = %form.area, "submitting pickup request");
        let response = self.http.post(url).form(&form.form_pairs()).send().await?;
        let Some(target) = redirect_target(&response)? else {
            response.error_for_status()?;
            return Ok(());
        };
        if !self.is_page(&target, "user/dashboard") {
            return Err(self.redirect_error(&target));
        }

        let dashboard = self.http.get(target).send().await?;
        if let Some(target) = redirect_target(&dashboard)? {
            return Err(self.redirect_error(&target));
        }
        let body = dashboard.error_for_status()?.text().await?;
        if body.contains(INVALID_WEIGHT_FLASH) {
            tracing::warn!(weight = %form.weight, "backend refused the pickup weight");
            return Err(BackendError::Rejected(INVALID_WEIGHT_FLASH.to_string()));
        }
        Ok(())
    }

    pub(crate) fn calculate_price_url(&self) -> Result<Url, BackendError> {
        self.url("engineer/calculate-price")
    }

    pub(crate) fn submit_url(&self, pickup_id: &str) -> Result<Url, BackendError> {
        let mut url = self.url("engineer/submit/")?;
        url.path_segments_mut()
            .map_err(|_| BackendError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push(pickup_id);
        Ok(url)
    }

    /// Sends the request and decodes the body whatever the status code is;
    /// the backend reports failures in the body. A redirect means the
    /// session was turned away.
    async fn fetch_json<T>(&self, builder: RequestBuilder) -> Result<T, BackendError>
    where
        T: DeserializeOwned,
    {
        let response = builder.send().await?;
        if let Some(target) = redirect_target(&response)? {
            return Err(self.redirect_error(&target));
        }
        let status = response.status();
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|err| {
            tracing::debug!(%status, %body, "backend returned an undecodable body");
            BackendError::Decode(err)
        })
    }

    fn redirect_error(&self, target: &Url) -> BackendError {
        if target.path() == "/" || self.is_page(target, "") || self.is_page(target, "login") {
            tracing::warn!(%target, "backend sent the session to sign in");
            BackendError::Unauthenticated
        } else {
            BackendError::UnexpectedRedirect(target.to_string())
        }
    }

    fn is_page(&self, target: &Url, page: &str) -> bool {
        self.url(page)
            .map(|url| url.path() == target.path())
            .unwrap_or(false)
    }

    fn url(&self, path: &str) -> Result<Url, BackendError> {
        Ok(self.base_url.join(path)?)
    }
}

/// Absolute target of a redirect response, `None` for anything else.
fn redirect_target(response: &Response) -> Result<Option<Url>, BackendError> {
    if !response.status().is_redirection() {
        return Ok(None);
    }
    let location = response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| BackendError::UnexpectedRedirect(response.status().to_string()))?;
    Ok(Some(response.url().join(location)?))
}

impl EngineerApi for BackendClient {
    async fn calculate_price(&self, request: &PriceRequest) -> Result<PriceResponse, BackendError> {
        let url = self.calculate_price_url()?;
        tracing::debug!(%url, ?request, "requesting price estimate");
        self.fetch_json(self.http.post(url).json(request)).await
    }

    async fn submit_inspection(
        &self,
        pickup_id: &str,
        submission: &InspectionSubmission,
    ) -> Result<SubmissionResult, BackendError> {
        let url = self.submit_url(pickup_id)?;
        tracing::info!(%url, total_price = submission.total_price, "submitting inspection");
        self.fetch_json(self.http.post(url).json(submission)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::test_server::{html, json, redirect, ScriptedServer};

    fn price_request() -> PriceRequest {
        PriceRequest {
            category: "Laptop".into(),
            weight: "5".into(),
            condition: "working".into(),
            age_years: "2".into(),
        }
    }

    fn pickup_form(weight: &str) -> PickupRequestForm {
        PickupRequestForm {
            area: "North".into(),
            address: "12 Lake Road".into(),
            ewaste_type: "Laptop".into(),
            weight: weight.into(),
            description: String::new(),
        }
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let client = BackendClient::with_base_url("http://pickup.local/app").unwrap();
        assert_eq!(client.base_url().as_str(), "http://pickup.local/app/");
        assert_eq!(
            client.calculate_price_url().unwrap().as_str(),
            "http://pickup.local/app/engineer/calculate-price"
        );
    }

    #[test]
    fn submit_url_puts_pickup_id_in_one_segment() {
        let client = BackendClient::new().unwrap();
        assert_eq!(
            client.submit_url("65f0c2a1").unwrap().as_str(),
            "http://127.0.0.1:5000/engineer/submit/65f0c2a1"
        );
        assert_eq!(
            client.submit_url("a/b c").unwrap().as_str(),
            "http://127.0.0.1:5000/engineer/submit/a%2Fb%20c"
        );
    }

    #[test]
    fn rejects_unparseable_base_url() {
        assert!(matches!(
            BackendClient::with_base_url("not a url"),
            Err(BackendError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_backend_is_an_error() {
        let client = BackendClient::with_base_url("http://127.0.0.1:9/").unwrap();
        let result = client.calculate_price(&PriceRequest::default()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn price_estimate_is_decoded_from_json() {
        let server = ScriptedServer::start(vec![json("200 OK", r#"{"estimated_value":1500}"#)]).await;
        let client = BackendClient::with_base_url(&server.base_url).unwrap();

        let response = client.calculate_price(&price_request()).await.unwrap();
        assert_eq!(response.estimated_value, 1500.0);
        assert_eq!(response.currency, "INR");

        let requests = server.requests().await;
        assert!(requests[0].starts_with("POST /engineer/calculate-price "));
        assert!(requests[0].contains(r#""weight":"5""#));
    }

    #[tokio::test]
    async fn html_page_is_a_decode_error() {
        let server = ScriptedServer::start(vec![html("200 OK", "<h1>Login</h1>")]).await;
        let client = BackendClient::with_base_url(&server.base_url).unwrap();

        let result = client.calculate_price(&price_request()).await;
        assert!(matches!(result, Err(BackendError::Decode(_))));
    }

    #[tokio::test]
    async fn json_body_is_decoded_despite_error_status() {
        let server = ScriptedServer::start(vec![json(
            "500 INTERNAL SERVER ERROR",
            r#"{"success":false,"error":"pickup not found"}"#,
        )])
        .await;
        let client = BackendClient::with_base_url(&server.base_url).unwrap();

        let result = client
            .submit_inspection("p-1", &InspectionSubmission::approved(10.0))
            .await
            .unwrap();
        assert!(!result.success);
    }

    #[tokio::test]
    async fn submission_without_success_flag_is_not_successful() {
        let server = ScriptedServer::start(vec![
            json("200 OK", "{}"),
            json("200 OK", r#"{"success":false}"#),
        ])
        .await;
        let client = BackendClient::with_base_url(&server.base_url).unwrap();
        let submission = InspectionSubmission::approved(1500.0);

        assert!(!client.submit_inspection("p-1", &submission).await.unwrap().success);
        assert!(!client.submit_inspection("p-1", &submission).await.unwrap().success);

        let requests = server.requests().await;
        assert!(requests[0].starts_with("POST /engineer/submit/p-1 "));
        assert!(requests[0].contains(r#""decision":"approved""#));
    }

    #[tokio::test]
    async fn engineer_route_bounced_to_login_is_unauthenticated() {
        let server = ScriptedServer::start(vec![redirect("/login", &[])]).await;
        let client = BackendClient::with_base_url(&server.base_url).unwrap();

        let result = client.calculate_price(&price_request()).await;
        assert!(matches!(result, Err(BackendError::Unauthenticated)));
    }

    #[tokio::test]
    async fn pickup_request_without_user_session_is_unauthenticated() {
        let server = ScriptedServer::start(vec![redirect("/", &[])]).await;
        let client = BackendClient::with_base_url(&server.base_url).unwrap();

        let result = client.request_pickup(&pickup_form("1200")).await;
        assert!(matches!(result, Err(BackendError::Unauthenticated)));

        let requests = server.requests().await;
        assert_eq!(requests.len(), 1);
    }

    #[tokio::test]
    async fn pickup_weight_refused_by_backend_is_rejected() {
        let server = ScriptedServer::start(vec![
            redirect("/user/dashboard", &[]),
            html("200 OK", "<div class=\"flash error\">Invalid weight provided</div>"),
        ])
        .await;
        let client = BackendClient::with_base_url(&server.base_url).unwrap();

        let result = client.request_pickup(&pickup_form("2.5")).await;
        assert!(
            matches!(result, Err(BackendError::Rejected(ref message)) if message == INVALID_WEIGHT_FLASH)
        );

        let requests = server.requests().await;
        assert!(requests[1].starts_with("GET /user/dashboard "));
    }

    #[tokio::test]
    async fn accepted_pickup_request_posts_form_fields() {
        let server = ScriptedServer::start(vec![
            redirect("/user/dashboard", &[]),
            html(
                "200 OK",
                "<div class=\"flash success\">Pickup request submitted successfully</div>",
            ),
        ])
        .await;
        let client = BackendClient::with_base_url(&server.base_url).unwrap();

        client.request_pickup(&pickup_form("1200")).await.unwrap();

        let requests = server.requests().await;
        assert!(requests[0].starts_with("POST /user/request "));
        assert!(requests[0].contains("weight%5B%5D=1200"));
        assert!(requests[0].contains("area=North"));
    }

    #[tokio::test]
    async fn login_session_cookie_rides_on_later_requests() {
        let server = ScriptedServer::start(vec![
            redirect(
                "/redirect",
                &[("Set-Cookie", "session=signed-token; Path=/; HttpOnly")],
            ),
            redirect("/engineer/dashboard", &[]),
            json("200 OK", r#"{"estimated_value":900}"#),
        ])
        .await;
        let session = Session::default();
        let client = BackendClient::with_session(&server.base_url, &session).unwrap();

        let role = client.login("eng@example.com", "secret").await.unwrap();
        assert_eq!(role, Role::Engineer);

        // A second client on the same session shares the cookie.
        let later = BackendClient::with_session(&server.base_url, &session).unwrap();
        later.calculate_price(&price_request()).await.unwrap();

        let requests: Vec<String> = server
            .requests()
            .await
            .into_iter()
            .map(|request| request.to_ascii_lowercase())
            .collect();
        assert!(requests[0].starts_with("post /login "));
        assert!(requests[0].contains("email=eng%40example.com"));
        assert!(!requests[0].contains("cookie: session="));
        assert!(requests[1].contains("cookie: session=signed-token"));
        assert!(requests[2].contains("cookie: session=signed-token"));
    }

    #[tokio::test]
    async fn wrong_password_is_invalid_credentials() {
        let server = ScriptedServer::start(vec![html(
            "200 OK",
            "<p class=\"error\">Invalid email or password.</p>",
        )])
        .await;
        let client = BackendClient::with_base_url(&server.base_url).unwrap();

        let result = client.login("eng@example.com", "wrong").await;
        assert!(matches!(result, Err(BackendError::InvalidCredentials)));
    }
}
