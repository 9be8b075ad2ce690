//! PostgREST 查询构建与响应处理

use super::SupabaseApi;
use crate::config::GatewayConfig;
use crate::error::{ErrorKind, GatewayError, GatewayResult};
use crate::request::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use hrms_shared::PGRST_NO_ROWS;
use hrms_shared::protocol::PostgrestErrorBody;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Display;

/// 单行读取：0 行时服务端返回 PGRST116
pub const ACCEPT_OBJECT: &str = "application/vnd.pgrst.object+json";
pub const PREFER_REPRESENTATION: &str = "return=representation";

/// `/rest/v1/<table>?select=...&col=eq.value`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestQuery {
    table: &'static str,
    params: Vec<(String, String)>,
}

impl RestQuery {
    pub fn table(table: &'static str) -> Self {
        Self {
            table,
            params: Vec::new(),
        }
    }

    pub fn select(mut self, columns: &str) -> Self {
        self.params.push(("select".to_string(), columns.to_string()));
        self
    }

    pub fn eq(mut self, column: &str, value: impl Display) -> Self {
        self.params.push((column.to_string(), format!("eq.{}", value)));
        self
    }

    pub fn table_name(&self) -> &'static str {
        self.table
    }

    pub fn url(&self, config: &GatewayConfig) -> GatewayResult<String> {
        let mut url = url::Url::parse(&config.table_url(self.table))
            .map_err(|e| GatewayError::config(format!("invalid Supabase URL: {}", e)))?;
        if !self.params.is_empty() {
            url.query_pairs_mut().extend_pairs(self.params.iter());
        }
        Ok(url.to_string())
    }
}

/// 将非 2xx 响应转换为错误，服务端 message 原样保留
pub fn rest_error(resp: &HttpResponse) -> GatewayError {
    let body: PostgrestErrorBody = resp.json().unwrap_or_default();
    let kind = ErrorKind::classify(resp.status, body.code.as_deref());
    let message = body
        .message
        .unwrap_or_else(|| format!("Request failed with status {}", resp.status));
    let err = GatewayError::new(kind, message);
    match body.code {
        Some(code) => err.with_code(code),
        None => err,
    }
}

impl<C: HttpClient> SupabaseApi<C> {
    async fn execute(
        &self,
        op: &'static str,
        table: &'static str,
        req: HttpRequest,
    ) -> GatewayResult<HttpResponse> {
        self.ensure_configured(op)?;
        let resp = self
            .client
            .send(req)
            .await
            .map_err(|e| GatewayError::from(e).in_op_with(op, table))?;
        if !resp.ok() {
            return Err(rest_error(&resp).in_op_with(op, table));
        }
        Ok(resp)
    }

    fn rest_request(
        &self,
        query: &RestQuery,
        method: HttpMethod,
        op: &'static str,
    ) -> GatewayResult<HttpRequest> {
        let url = query
            .url(&self.config)
            .map_err(|e| e.in_op_with(op, query.table_name()))?;
        Ok(self.base_request(&url, method))
    }

    pub(crate) async fn select_many<T: DeserializeOwned>(
        &self,
        query: RestQuery,
    ) -> GatewayResult<Vec<T>> {
        let op = "rest.select";
        let req = self.rest_request(&query, HttpMethod::Get, op)?;
        let resp = self.execute(op, query.table_name(), req).await?;
        resp.json()
            .map_err(|e| GatewayError::from(e).in_op_with(op, query.table_name()))
    }

    /// 单行读取；缺失属于预期情况，返回 None
    pub(crate) async fn select_single<T: DeserializeOwned>(
        &self,
        query: RestQuery,
    ) -> GatewayResult<Option<T>> {
        let op = "rest.select_single";
        let req = self
            .rest_request(&query, HttpMethod::Get, op)?
            .with_header("Accept", ACCEPT_OBJECT);
        match self.execute(op, query.table_name(), req).await {
            Ok(resp) => resp
                .json()
                .map(Some)
                .map_err(|e| GatewayError::from(e).in_op_with(op, query.table_name())),
            Err(e) if e.code() == Some(PGRST_NO_ROWS) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub(crate) async fn insert_one<B, T>(&self, table: &'static str, body: &B) -> GatewayResult<T>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let op = "rest.insert";
        let query = RestQuery::table(table);
        let req = self
            .rest_request(&query, HttpMethod::Post, op)?
            .with_header("Accept", ACCEPT_OBJECT)
            .with_header("Prefer", PREFER_REPRESENTATION)
            .with_json(body)
            .map_err(|e| GatewayError::from(e).in_op_with(op, table))?;
        let resp = self.execute(op, table, req).await?;
        resp.json()
            .map_err(|e| GatewayError::from(e).in_op_with(op, table))
    }

    /// PATCH 所有匹配行并返回更新后的行（可能为空）
    pub(crate) async fn update_many<B, T>(&self, query: RestQuery, body: &B) -> GatewayResult<Vec<T>>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let op = "rest.update";
        let table = query.table_name();
        let req = self
            .rest_request(&query, HttpMethod::Patch, op)?
            .with_header("Prefer", PREFER_REPRESENTATION)
            .with_json(body)
            .map_err(|e| GatewayError::from(e).in_op_with(op, table))?;
        let resp = self.execute(op, table, req).await?;
        resp.json()
            .map_err(|e| GatewayError::from(e).in_op_with(op, table))
    }
}
