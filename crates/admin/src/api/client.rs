//! Authenticated request pipeline
//!
//! Every backend call goes through [`SessionClient::request`], which attaches
//! the bearer token and centralizes 401 handling:
//! - 401 on an authenticated call tears the session down and publishes
//!   [`SessionEvent::Expired`](super::SessionEvent::Expired)
//! - 401 on the login call is a credential error and leaves the session alone
//!
//! The client is blocking; callers that must not block run it off their loop.

use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::rejection_message;
use super::transport::{HttpRequest, HttpResponse, Method, Transport};
use super::wire::{LoginRequest, LoginResponse, MeResponse};
use super::{ApiError, Session, TokenStore};

/// Path of the login call. 401s on this path never end the session.
pub const LOGIN_PATH: &str = "/api/auth/login";

/// Parsed response body
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(Value),
    Text(String),
}

/// Method and optional JSON payload for a request
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Value>,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self {
            method: Method::Get,
            body: None,
        }
    }

    pub fn delete() -> Self {
        Self {
            method: Method::Delete,
            body: None,
        }
    }

    pub fn post(body: Value) -> Self {
        Self {
            method: Method::Post,
            body: Some(body),
        }
    }

    /// POST without a payload (e.g. releasing a phone number)
    pub fn post_empty() -> Self {
        Self {
            method: Method::Post,
            body: None,
        }
    }

    pub fn put(body: Value) -> Self {
        Self {
            method: Method::Put,
            body: Some(body),
        }
    }
}

/// Backend client carrying the session
pub struct SessionClient {
    transport: Box<dyn Transport>,
    session: Session,
}

impl SessionClient {
    /// Create a client, restoring any persisted token from `store`
    pub fn new(transport: Box<dyn Transport>, store: Box<dyn TokenStore>) -> Self {
        Self {
            transport,
            session: Session::restore(store),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn has_token(&self) -> bool {
        self.session.has_token()
    }

    /// Issue a request and parse the body (JSON when the server says so, else text)
    pub fn request(&self, path: &str, options: RequestOptions) -> Result<Body, ApiError> {
        let response = self.execute(path, options)?;
        if response.is_json() {
            let value = serde_json::from_slice(&response.body)
                .map_err(|e| ApiError::Decode(format!("{}: {}", path, e)))?;
            Ok(Body::Json(value))
        } else {
            Ok(Body::Text(response.text()))
        }
    }

    /// Issue a request and return the raw body bytes (downloads)
    pub fn request_bytes(&self, path: &str, options: RequestOptions) -> Result<Vec<u8>, ApiError> {
        Ok(self.execute(path, options)?.body)
    }

    /// Issue a request and decode a JSON body into `T`
    pub fn request_json<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        match self.request(path, options)? {
            Body::Json(value) => serde_json::from_value(value)
                .map_err(|e| ApiError::Decode(format!("{}: {}", path, e))),
            Body::Text(text) => Err(ApiError::Decode(format!(
                "{}: expected JSON, got {} bytes of text",
                path,
                text.len()
            ))),
        }
    }

    /// GET and decode a JSON body
    pub fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request_json(path, RequestOptions::get())
    }

    /// Issue a request whose success body is irrelevant (`{ok: true}` and friends)
    pub fn send(&self, path: &str, options: RequestOptions) -> Result<(), ApiError> {
        self.execute(path, options).map(|_| ())
    }

    /// Obtain a session with username and password.
    ///
    /// Bad credentials come back as [`ApiError::AuthRejected`] and leave the
    /// session untouched.
    pub fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let payload = serde_json::to_value(LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        })
        .map_err(|e| ApiError::Decode(e.to_string()))?;

        let response: LoginResponse = self.request_json(LOGIN_PATH, RequestOptions::post(payload))?;
        let Some(token) = response.token.clone().filter(|t| !t.is_empty()) else {
            warn!("Login succeeded without a token");
            return Err(ApiError::MalformedLogin);
        };

        let username = response
            .username
            .clone()
            .unwrap_or_else(|| username.to_string());
        info!("Logged in as {}", username);
        self.session.establish(token, username);
        Ok(response)
    }

    /// Validate the held token
    pub fn me(&self) -> Result<MeResponse, ApiError> {
        self.get_json("/api/auth/me")
    }

    /// End the session at the user's request
    pub fn logout(&self) {
        info!("Logging out");
        self.session.end();
    }

    fn execute(&self, path: &str, options: RequestOptions) -> Result<HttpResponse, ApiError> {
        let is_login = path.contains("/auth/login");

        let mut headers = vec![(
            "Content-Type".to_string(),
            "application/json".to_string(),
        )];
        let sent_token = self.session.token();
        if let Some(token) = &sent_token {
            headers.push(("Authorization".to_string(), format!("Bearer {}", token)));
        }

        let request = HttpRequest {
            method: options.method,
            path: path.to_string(),
            headers,
            body: options.body.map(|b| b.to_string()),
        };

        debug!("{} {}", request.method.as_str(), path);
        let response = self.transport.send(&request)?;

        if response.status == 401 {
            if is_login {
                let message = rejection_message(&response.text());
                debug!("Login rejected: {}", message);
                return Err(ApiError::AuthRejected(message));
            }
            if self.session.expire(sent_token.as_deref()) {
                warn!("{} {} returned 401, ending session", request.method.as_str(), path);
            } else {
                debug!("{} {} returned 401 for a superseded session", request.method.as_str(), path);
            }
            return Err(ApiError::AuthExpired);
        }

        if !response.is_success() {
            warn!("{} {} failed with status {}", request.method.as_str(), path, response.status);
            return Err(ApiError::RequestFailed {
                status: response.status,
                body: response.text(),
            });
        }

        Ok(response)
    }
}
