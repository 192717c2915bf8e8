// User endpoints
//
// Registration, cookie-session login/logout and profile lookup. The login
// endpoint sets the session cookie in the gateway's jar; every later call
// carries it automatically.

use secrecy::SecretString;
use serde_json::Value;
use tracing::debug;

use crate::error::Error;
use crate::gateway::{RequestGateway, RequestOptions};
use crate::models::{LoginRequest, LoginResponse, Registration, UserId, UserRecord};

impl RequestGateway {
    /// `POST /api/users/register`
    pub async fn register(&self, registration: &Registration) -> Result<Value, Error> {
        debug!(email = %registration.email, "registering user");
        let resp = self
            .call(
                "/api/users/register",
                RequestOptions::post().with_json(registration)?,
            )
            .await?;
        Ok(resp.body)
    }

    /// `POST /api/users/login`
    ///
    /// On success the session cookie is stored in the gateway's jar.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<LoginResponse, Error> {
        debug!(%email, "logging in");
        let body = LoginRequest { email, password };
        self.call("/api/users/login", RequestOptions::post().with_json(&body)?)
            .await?
            .json()
    }

    /// `POST /api/users/logout`
    pub async fn logout(&self) -> Result<Value, Error> {
        let resp = self.call("/api/users/logout", RequestOptions::post()).await?;
        debug!("logout acknowledged");
        Ok(resp.body)
    }

    /// `GET /api/users/{id}`
    pub async fn get_user(&self, id: &UserId) -> Result<UserRecord, Error> {
        self.call(&format!("/api/users/{id}"), RequestOptions::get())
            .await?
            .json()
    }
}
