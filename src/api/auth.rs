//! GoTrue 认证端点

use super::SupabaseApi;
use crate::error::{ErrorKind, GatewayError, GatewayResult};
use crate::provider::{AuthEvents, AuthProvider};
use crate::request::{HttpClient, HttpMethod, HttpResponse};
use hrms_shared::protocol::{
    ApiRequest, AuthErrorBody, AuthEvent, AuthSession, Identity, PATH_LOGOUT, PATH_USER,
    PasswordGrant, RefreshGrant, SignUpRequest, SignUpResponse,
};

/// GoTrue 对凭据问题返回 400/422，统一视为认证错误
fn auth_error(resp: &HttpResponse) -> GatewayError {
    let body: AuthErrorBody = resp.json().unwrap_or_default();
    let kind = match resp.status {
        400 | 401 | 403 | 422 => ErrorKind::Auth,
        status => ErrorKind::classify(status, None),
    };
    let message = body
        .message()
        .map(str::to_string)
        .unwrap_or_else(|| format!("Request failed with status {}", resp.status));
    let err = GatewayError::new(kind, message);
    match body.code() {
        Some(code) => err.with_code(code),
        None => err,
    }
}

impl<C: HttpClient> SupabaseApi<C> {
    async fn call<R: ApiRequest>(&self, request: &R, op: &'static str) -> GatewayResult<R::Response> {
        self.ensure_configured(op)?;
        let req = self
            .base_request(&self.config.endpoint(R::PATH), R::METHOD)
            .with_json(request)
            .map_err(|e| GatewayError::from(e).in_op(op))?;
        let resp = self
            .client
            .send(req)
            .await
            .map_err(|e| GatewayError::from(e).in_op(op))?;
        if !resp.ok() {
            return Err(auth_error(&resp).in_op(op));
        }
        resp.json().map_err(|e| GatewayError::from(e).in_op(op))
    }

    async fn fetch_user(&self) -> GatewayResult<Identity> {
        let op = "auth.get_user";
        let req = self.base_request(&self.config.endpoint(PATH_USER), HttpMethod::Get);
        let resp = self
            .client
            .send(req)
            .await
            .map_err(|e| GatewayError::from(e).in_op(op))?;
        if !resp.ok() {
            return Err(auth_error(&resp).in_op(op));
        }
        resp.json().map_err(|e| GatewayError::from(e).in_op(op))
    }

    async fn refresh_with(&self, refresh_token: &str) -> GatewayResult<AuthSession> {
        let grant = RefreshGrant {
            refresh_token: refresh_token.to_string(),
        };
        let session = self.call(&grant, "auth.refresh").await?;
        self.store_session(&session);
        Ok(session)
    }

    /// 校验已持久化的会话：过期或被拒绝时刷新一次
    async fn validate(&self, stored: AuthSession) -> GatewayResult<AuthSession> {
        if stored.is_expired_at(self.clock.now_unix()) {
            return self.refresh_with(&stored.refresh_token).await;
        }
        match self.fetch_user().await {
            Ok(user) => Ok(AuthSession { user, ..stored }),
            Err(e) if e.kind == ErrorKind::Auth => self.refresh_with(&stored.refresh_token).await,
            Err(e) => Err(e),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl<C: HttpClient> AuthProvider for SupabaseApi<C> {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> GatewayResult<AuthSession> {
        let grant = PasswordGrant {
            email: email.to_string(),
            password: password.to_string(),
        };
        let session = self.call(&grant, "auth.sign_in").await?;
        self.store_session(&session);
        self.events.emit(AuthEvent::SignedIn(session.clone()));
        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str) -> GatewayResult<SignUpResponse> {
        let request = SignUpRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self.call(&request, "auth.sign_up").await?;
        if let SignUpResponse::Session(session) = &response {
            self.store_session(session);
            self.events.emit(AuthEvent::SignedIn(session.clone()));
        }
        Ok(response)
    }

    async fn sign_out(&self) -> GatewayResult<()> {
        let op = "auth.sign_out";
        let has_session = self.session.borrow().is_some();
        let result = if has_session && self.config.is_complete() {
            let req = self.base_request(&self.config.endpoint(PATH_LOGOUT), HttpMethod::Post);
            match self.client.send(req).await {
                Ok(resp) if resp.ok() => Ok(()),
                Ok(resp) => Err(auth_error(&resp).in_op(op)),
                Err(e) => Err(GatewayError::from(e).in_op(op)),
            }
        } else {
            Ok(())
        };

        // 本地状态无条件清除
        self.clear_session();
        self.events.emit(AuthEvent::SignedOut);
        result
    }

    async fn restore_session(&self) -> GatewayResult<Option<AuthSession>> {
        self.ensure_configured("auth.restore_session")?;
        let Some(stored) = self.persistence.load() else {
            self.events.emit(AuthEvent::InitialSession(None));
            return Ok(None);
        };

        *self.session.borrow_mut() = Some(stored.clone());
        let restored = match self.validate(stored).await {
            Ok(session) => {
                self.store_session(&session);
                Some(session)
            }
            Err(e) => {
                log_warn!("stored session rejected: {}", e);
                // 网络故障时保留本地令牌，下次启动再试
                if e.kind == ErrorKind::Network {
                    self.session.borrow_mut().take();
                } else {
                    self.clear_session();
                }
                None
            }
        };
        self.events
            .emit(AuthEvent::InitialSession(restored.clone()));
        Ok(restored)
    }

    async fn refresh_session(&self) -> GatewayResult<Option<AuthSession>> {
        let Some(refresh_token) = self
            .session
            .borrow()
            .as_ref()
            .map(|s| s.refresh_token.clone())
        else {
            return Ok(None);
        };
        match self.refresh_with(&refresh_token).await {
            Ok(session) => {
                self.events.emit(AuthEvent::TokenRefreshed(session.clone()));
                Ok(Some(session))
            }
            // 网络故障时保留令牌，下一轮再刷新
            Err(e) if e.kind == ErrorKind::Network => Err(e),
            Err(e) => {
                log_warn!("refresh token rejected, signing out: {}", e);
                self.clear_session();
                self.events.emit(AuthEvent::SignedOut);
                Err(e)
            }
        }
    }

    fn subscribe(&self) -> AuthEvents {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::test_api;
    use crate::provider::tests::session_for;
    use crate::request::HttpError;
    use serde_json::json;
    use uuid::Uuid;

    const SIGN_IN_URL: &str = "https://xyz.supabase.co/auth/v1/token?grant_type=password";
    const REFRESH_URL: &str = "https://xyz.supabase.co/auth/v1/token?grant_type=refresh_token";
    const USER_URL: &str = "https://xyz.supabase.co/auth/v1/user";
    const LOGOUT_URL: &str = "https://xyz.supabase.co/auth/v1/logout";

    fn session_json(user_id: Uuid, token: &str) -> serde_json::Value {
        json!({
            "access_token": token,
            "refresh_token": "refresh-1",
            "token_type": "bearer",
            "expires_in": 3600,
            "expires_at": 1_714_525_200,
            "user": { "id": user_id, "email": "jane.doe@corp.io" }
        })
    }

    #[tokio::test]
    async fn test_sign_in_stores_session_and_emits() {
        let api = test_api();
        let user_id = Uuid::new_v4();
        api.client
            .mock_response(HttpMethod::Post, SIGN_IN_URL, 200, session_json(user_id, "tok"));
        let mut events = api.subscribe();

        let session = api
            .sign_in_with_password("jane.doe@corp.io", "secret")
            .await
            .unwrap();
        assert_eq!(session.user.id, user_id);
        assert_eq!(api.current_session().unwrap().access_token, "tok");
        assert_eq!(api.bearer(), "tok");

        let event = events.try_recv().unwrap();
        assert_eq!(event.name(), "SIGNED_IN");

        let sent = api.client.last_request().unwrap();
        let body: serde_json::Value = serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["email"], "jane.doe@corp.io");
    }

    #[tokio::test]
    async fn test_sign_in_keeps_provider_message() {
        let api = test_api();
        api.client.mock_response(
            HttpMethod::Post,
            SIGN_IN_URL,
            400,
            json!({ "error": "invalid_grant", "error_description": "Invalid login credentials" }),
        );

        let err = api.sign_in_with_password("a@b.c", "bad").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Auth);
        assert_eq!(err.message(), "Invalid login credentials");
        assert!(api.current_session().is_none());
    }

    #[tokio::test]
    async fn test_sign_out_clears_local_state_when_remote_fails() {
        let api = test_api();
        api.store_session(&session_for(Uuid::new_v4(), "a@b.c"));
        api.client.mock_failure(
            HttpMethod::Post,
            LOGOUT_URL,
            HttpError::NetworkError("offline".into()),
        );

        let result = api.sign_out().await;
        assert_eq!(result.unwrap_err().kind, ErrorKind::Network);
        assert!(api.current_session().is_none());
        assert!(api.persistence.load().is_none());
    }

    #[tokio::test]
    async fn test_restore_validates_stored_session() {
        let api = test_api();
        let user_id = Uuid::new_v4();
        api.persistence.save(&session_for(user_id, "a@b.c"));
        api.client.mock_response(
            HttpMethod::Get,
            USER_URL,
            200,
            json!({ "id": user_id, "email": "new@b.c" }),
        );

        let restored = api.restore_session().await.unwrap().unwrap();
        assert_eq!(restored.user.email.as_deref(), Some("new@b.c"));
        let sent = api.client.last_request().unwrap();
        assert_eq!(
            sent.header("Authorization"),
            Some(format!("Bearer access-{}", user_id).as_str())
        );
    }

    #[tokio::test]
    async fn test_restore_refreshes_rejected_token_once() {
        let api = test_api();
        let user_id = Uuid::new_v4();
        api.persistence.save(&session_for(user_id, "a@b.c"));
        api.client.mock_response(
            HttpMethod::Get,
            USER_URL,
            401,
            json!({ "msg": "JWT expired" }),
        );
        api.client
            .mock_response(HttpMethod::Post, REFRESH_URL, 200, session_json(user_id, "fresh"));

        let restored = api.restore_session().await.unwrap().unwrap();
        assert_eq!(restored.access_token, "fresh");
        assert_eq!(api.persistence.load().unwrap().access_token, "fresh");
    }

    #[tokio::test]
    async fn test_restore_failure_yields_no_session() {
        let api = test_api();
        let mut stored = session_for(Uuid::new_v4(), "a@b.c");
        stored.expires_at = Some(0);
        api.persistence.save(&stored);
        api.client.mock_response(
            HttpMethod::Post,
            REFRESH_URL,
            400,
            json!({ "error_code": "refresh_token_not_found", "msg": "Invalid Refresh Token" }),
        );
        let mut events = api.subscribe();

        assert!(api.restore_session().await.unwrap().is_none());
        assert!(api.persistence.load().is_none());
        assert_eq!(events.try_recv().unwrap(), AuthEvent::InitialSession(None));
    }

    #[tokio::test]
    async fn test_rejected_refresh_token_signs_out() {
        let api = test_api();
        api.store_session(&session_for(Uuid::new_v4(), "a@b.c"));
        api.client.mock_response(
            HttpMethod::Post,
            REFRESH_URL,
            400,
            json!({ "error_code": "refresh_token_not_found", "msg": "Invalid Refresh Token" }),
        );
        let mut events = api.subscribe();

        let err = api.refresh_session().await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Auth);
        assert!(api.current_session().is_none());
        assert!(api.persistence.load().is_none());
        assert_eq!(events.try_recv().unwrap(), AuthEvent::SignedOut);
    }

    #[tokio::test]
    async fn test_refresh_keeps_tokens_when_offline() {
        let api = test_api();
        api.store_session(&session_for(Uuid::new_v4(), "a@b.c"));
        api.client.mock_failure(
            HttpMethod::Post,
            REFRESH_URL,
            HttpError::NetworkError("offline".into()),
        );
        let mut events = api.subscribe();

        let err = api.refresh_session().await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Network);
        assert!(api.current_session().is_some());
        assert!(api.persistence.load().is_some());
        assert!(events.try_recv().is_err());
    }
}
