use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum_macros::{AsRefStr, Display, EnumString};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub indices: Vec<String>,
    /// Search request body.
    #[serde(default)]
    pub source: Value,
    /// Keep alive of a scroll context, set to open one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll: Option<String>,
}

impl SearchRequest {
    pub fn new<I: Into<String>>(index: I, source: Value) -> Self {
        Self {
            indices: vec![index.into()],
            source,
            scroll: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScrollRequest {
    pub scroll_id: String,
    pub scroll: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeleteByQueryRequest {
    pub indices: Vec<String>,
    pub query: Value,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GetIndexRequest {
    pub indices: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinKind {
    Inner,
    Left,
}

/// One side of a join, fetched with its own search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JoinSide {
    /// Prefix of this side's fields in joined hits.
    pub alias: String,
    pub request: SearchRequest,
    pub join_field: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JoinRequest {
    pub join_kind: JoinKind,
    pub left: JoinSide,
    pub right: JoinSide,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultiQueryOperation {
    UnionAll,
    Union,
    Minus,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MultiQueryRequest {
    pub operation: MultiQueryOperation,
    pub first: SearchRequest,
    pub second: SearchRequest,
    /// Field identifying a hit for `union` and `minus`, whole source if absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_field: Option<String>,
}

/// Every request shape the backend executes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendRequest {
    Search(SearchRequest),
    Scroll(ScrollRequest),
    DeleteByQuery(DeleteByQueryRequest),
    GetIndex(GetIndexRequest),
    Join(JoinRequest),
    MultiQuery(MultiQueryRequest),
}

/// Value of the `kind` tag of a [`BackendRequest`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumString, AsRefStr, Display)]
#[strum(serialize_all = "snake_case")]
pub enum RequestKind {
    Search,
    Scroll,
    DeleteByQuery,
    GetIndex,
    Join,
    MultiQuery,
}

impl BackendRequest {
    pub fn kind(&self) -> RequestKind {
        match self {
            BackendRequest::Search(_) => RequestKind::Search,
            BackendRequest::Scroll(_) => RequestKind::Scroll,
            BackendRequest::DeleteByQuery(_) => RequestKind::DeleteByQuery,
            BackendRequest::GetIndex(_) => RequestKind::GetIndex,
            BackendRequest::Join(_) => RequestKind::Join,
            BackendRequest::MultiQuery(_) => RequestKind::MultiQuery,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_source")]
    pub source: Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "_scroll_id", default, skip_serializing_if = "Option::is_none")]
    pub scroll_id: Option<String>,
    pub total: u64,
    pub hits: Vec<SearchHit>,
}

impl SearchResponse {
    pub fn from_hits(hits: Vec<SearchHit>) -> Self {
        Self {
            scroll_id: None,
            total: hits.len() as u64,
            hits,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteByQueryResponse {
    pub deleted: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GetIndexResponse {
    /// Mappings of each index.
    pub mappings: BTreeMap<String, Value>,
}

/// Connection to the search backend.
#[async_trait]
pub trait SearchClient: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> anyhow::Result<SearchResponse>;

    async fn search_scroll(&self, request: &ScrollRequest) -> anyhow::Result<SearchResponse>;

    async fn delete_by_query(
        &self,
        request: &DeleteByQueryRequest,
    ) -> anyhow::Result<DeleteByQueryResponse>;

    async fn get_index(&self, request: &GetIndexRequest) -> anyhow::Result<GetIndexResponse>;
}
