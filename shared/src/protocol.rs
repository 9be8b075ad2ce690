use serde::{Deserialize, Serialize, de::DeserializeOwned};
use uuid::Uuid;

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
        }
    }
}

/// A trait that defines the request-response relationship and metadata for an auth endpoint.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The URL path (relative to the project URL), including any fixed query.
    const PATH: &'static str;
    /// The HTTP method.
    const METHOD: HttpMethod;
}

// =========================================================
// Auth payloads (GoTrue)
// =========================================================

/// The provider's user record. Only the fields this app reads are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

/// Tokens plus the user they belong to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: i64,
    /// Unix seconds
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: Identity,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl AuthSession {
    pub fn is_expired_at(&self, now_unix: i64) -> bool {
        self.expires_at.is_some_and(|t| t <= now_unix)
    }
}

/// Sign in with email + password
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordGrant {
    pub email: String,
    pub password: String,
}

impl ApiRequest for PasswordGrant {
    type Response = AuthSession;
    const PATH: &'static str = "/auth/v1/token?grant_type=password";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// Register a new identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
}

/// Sign-up returns a full session when auto-confirm is on, otherwise
/// only the (unconfirmed) user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SignUpResponse {
    Session(AuthSession),
    User(Identity),
}

impl ApiRequest for SignUpRequest {
    type Response = SignUpResponse;
    const PATH: &'static str = "/auth/v1/signup";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// Exchange a refresh token for a new session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshGrant {
    pub refresh_token: String,
}

impl ApiRequest for RefreshGrant {
    type Response = AuthSession;
    const PATH: &'static str = "/auth/v1/token?grant_type=refresh_token";
    const METHOD: HttpMethod = HttpMethod::Post;
}

pub const PATH_LOGOUT: &str = "/auth/v1/logout";
pub const PATH_USER: &str = "/auth/v1/user";
pub const PATH_REST: &str = "/rest/v1";

/// Auth state notifications, as pushed by the provider.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthEvent {
    InitialSession(Option<AuthSession>),
    SignedIn(AuthSession),
    SignedOut,
    TokenRefreshed(AuthSession),
    UserUpdated(AuthSession),
}

impl AuthEvent {
    pub fn name(&self) -> &'static str {
        match self {
            AuthEvent::InitialSession(_) => "INITIAL_SESSION",
            AuthEvent::SignedIn(_) => "SIGNED_IN",
            AuthEvent::SignedOut => "SIGNED_OUT",
            AuthEvent::TokenRefreshed(_) => "TOKEN_REFRESHED",
            AuthEvent::UserUpdated(_) => "USER_UPDATED",
        }
    }

    pub fn session(&self) -> Option<&AuthSession> {
        match self {
            AuthEvent::InitialSession(s) => s.as_ref(),
            AuthEvent::SignedIn(s) | AuthEvent::TokenRefreshed(s) | AuthEvent::UserUpdated(s) => {
                Some(s)
            }
            AuthEvent::SignedOut => None,
        }
    }
}

// =========================================================
// Error bodies
// =========================================================

/// GoTrue error body. Old and new servers use different field names.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl AuthErrorBody {
    pub fn message(&self) -> Option<&str> {
        self.error_description
            .as_deref()
            .or(self.msg.as_deref())
            .or(self.message.as_deref())
            .or(self.error.as_deref())
    }

    pub fn code(&self) -> Option<&str> {
        self.error_code.as_deref().or(self.error.as_deref())
    }
}

/// PostgREST error body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostgrestErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sign_up_response_variants() {
        let with_session: SignUpResponse = serde_json::from_value(json!({
            "access_token": "a",
            "refresh_token": "r",
            "expires_in": 3600,
            "user": { "id": "16fd2706-8baf-433b-82eb-8c7fada847da", "email": "a@b.c" }
        }))
        .unwrap();
        assert!(matches!(with_session, SignUpResponse::Session(_)));

        let pending: SignUpResponse = serde_json::from_value(json!({
            "id": "16fd2706-8baf-433b-82eb-8c7fada847da",
            "email": "a@b.c",
            "confirmation_sent_at": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        let SignUpResponse::User(identity) = pending else {
            panic!("expected an unconfirmed user");
        };
        assert_eq!(identity.email.as_deref(), Some("a@b.c"));
    }

    #[test]
    fn test_auth_error_message_precedence() {
        let old: AuthErrorBody = serde_json::from_value(json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        }))
        .unwrap();
        assert_eq!(old.message(), Some("Invalid login credentials"));

        let new: AuthErrorBody = serde_json::from_value(json!({
            "code": 400,
            "error_code": "invalid_credentials",
            "msg": "Invalid login credentials"
        }))
        .unwrap();
        assert_eq!(new.message(), Some("Invalid login credentials"));
        assert_eq!(new.code(), Some("invalid_credentials"));
    }
}
