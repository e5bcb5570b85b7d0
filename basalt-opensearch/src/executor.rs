use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use std::sync::Arc;

use futures::try_join;
use log::{debug, warn};
use serde_json::{Map, Value};

use crate::error::ExecutionError;
use crate::request::{
    BackendRequest, JoinKind, JoinRequest, JoinSide, MultiQueryOperation, MultiQueryRequest,
    RequestKind, SearchClient, SearchHit, SearchResponse,
};

/// Sends requests to the backend and renders the result as json.
///
/// Each request shape has exactly one branch. Plain requests are forwarded to the client,
/// join and multi query requests issue several searches and combine their hits here.
pub struct RestExecutor {
    client: Arc<dyn SearchClient>,
}

impl RestExecutor {
    pub fn new(client: Arc<dyn SearchClient>) -> Self {
        Self { client }
    }

    pub async fn execute(&self, request: &BackendRequest) -> Result<String, ExecutionError> {
        let kind = request.kind();
        debug!("Executing {} request", kind);

        let backend = move |source: anyhow::Error| ExecutionError::Backend { kind, source };
        let result = match request {
            BackendRequest::Search(search) => {
                serde_json::to_string(&self.client.search(search).await.map_err(backend)?)
            }
            BackendRequest::Scroll(scroll) => serde_json::to_string(
                &self.client.search_scroll(scroll).await.map_err(backend)?,
            ),
            BackendRequest::DeleteByQuery(delete) => serde_json::to_string(
                &self.client.delete_by_query(delete).await.map_err(backend)?,
            ),
            BackendRequest::GetIndex(get_index) => {
                serde_json::to_string(&self.client.get_index(get_index).await.map_err(backend)?)
            }
            BackendRequest::Join(join) => {
                serde_json::to_string(&self.execute_join(join).await.map_err(backend)?)
            }
            BackendRequest::MultiQuery(multi) => {
                serde_json::to_string(&self.execute_multi_query(multi).await.map_err(backend)?)
            }
        };

        Ok(result?)
    }

    /// Decodes a request from its json form and executes it.
    ///
    /// A request whose `kind` is not known is rejected, not ignored.
    pub async fn execute_json(&self, request: &str) -> Result<String, ExecutionError> {
        let value: Value = serde_json::from_str(request)
            .map_err(|e| ExecutionError::MalformedRequest(e.to_string()))?;

        let kind = value
            .get("kind")
            .and_then(Value::as_str)
            .ok_or_else(|| ExecutionError::MalformedRequest("missing request kind".to_string()))?;
        if RequestKind::from_str(kind).is_err() {
            warn!("Rejected request of unknown kind {:?}", kind);
            return Err(ExecutionError::UnsupportedRequest(kind.to_string()));
        }

        let request: BackendRequest = serde_json::from_value(value)
            .map_err(|e| ExecutionError::MalformedRequest(e.to_string()))?;
        self.execute(&request).await
    }

    async fn execute_join(&self, request: &JoinRequest) -> anyhow::Result<SearchResponse> {
        let (left, right) = try_join!(
            self.client.search(&request.left.request),
            self.client.search(&request.right.request)
        )?;

        let mut right_hits: HashMap<String, Vec<&SearchHit>> = HashMap::new();
        for hit in &right.hits {
            if let Some(key) = join_key(hit, &request.right.join_field) {
                right_hits.entry(key).or_default().push(hit);
            }
        }

        let mut joined = vec![];
        for hit in &left.hits {
            let matched = join_key(hit, &request.left.join_field)
                .and_then(|key| right_hits.get(&key))
                .filter(|hits| !hits.is_empty());
            match matched {
                Some(matches) => joined.extend(
                    matches
                        .iter()
                        .map(|other| combine(&request.left, hit, Some((&request.right, *other)))),
                ),
                None if request.join_kind == JoinKind::Left => {
                    joined.push(combine(&request.left, hit, None))
                }
                None => {}
            }
        }

        debug!(
            "Joined {} left hits with {} right hits into {} hits",
            left.hits.len(),
            right.hits.len(),
            joined.len()
        );
        Ok(SearchResponse::from_hits(joined))
    }

    async fn execute_multi_query(
        &self,
        request: &MultiQueryRequest,
    ) -> anyhow::Result<SearchResponse> {
        let (first, second) = try_join!(
            self.client.search(&request.first),
            self.client.search(&request.second)
        )?;
        let key_field = request.key_field.as_deref();

        let hits = match request.operation {
            MultiQueryOperation::UnionAll => first.hits.into_iter().chain(second.hits).collect(),
            MultiQueryOperation::Union => {
                let mut seen = HashSet::new();
                first
                    .hits
                    .into_iter()
                    .chain(second.hits)
                    .filter(|hit| seen.insert(hit_key(hit, key_field)))
                    .collect()
            }
            MultiQueryOperation::Minus => {
                let mut seen = second
                    .hits
                    .iter()
                    .map(|hit| hit_key(hit, key_field))
                    .collect::<HashSet<_>>();
                first
                    .hits
                    .into_iter()
                    .filter(|hit| seen.insert(hit_key(hit, key_field)))
                    .collect()
            }
        };

        Ok(SearchResponse::from_hits(hits))
    }
}

fn join_key(hit: &SearchHit, field: &str) -> Option<String> {
    hit.source
        .get(field)
        .filter(|value| !value.is_null())
        .map(Value::to_string)
}

/// Identity of a hit for `union` and `minus`.
///
/// Hits without the key field are identified by their whole source.
fn hit_key(hit: &SearchHit, key_field: Option<&str>) -> String {
    match key_field.and_then(|field| hit.source.get(field)) {
        Some(value) => format!("key:{}", value),
        None => format!("source:{}", Value::Object(hit.source.clone())),
    }
}

fn combine(
    left_side: &JoinSide,
    left: &SearchHit,
    right: Option<(&JoinSide, &SearchHit)>,
) -> SearchHit {
    let mut source = Map::new();
    for (field, value) in &left.source {
        source.insert(format!("{}.{}", left_side.alias, field), value.clone());
    }

    match right {
        Some((right_side, right)) => {
            for (field, value) in &right.source {
                source.insert(format!("{}.{}", right_side.alias, field), value.clone());
            }
            SearchHit {
                index: format!("{}|{}", left.index, right.index),
                id: format!("{}|{}", left.id, right.id),
                source,
            }
        }
        None => SearchHit {
            index: left.index.clone(),
            id: left.id.clone(),
            source,
        },
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Map, Value};

    use crate::executor::{combine, hit_key, join_key};
    use crate::request::{JoinSide, SearchHit, SearchRequest};

    fn hit(id: &str, source: Value) -> SearchHit {
        let source: Map<String, Value> = serde_json::from_value(source).unwrap();
        SearchHit {
            index: "accounts".to_string(),
            id: id.to_string(),
            source,
        }
    }

    #[test]
    fn test_join_key_skips_missing_and_null() {
        let h = hit("1", json!({"a": 1, "b": null}));
        assert_eq!(Some("1".to_string()), join_key(&h, "a"));
        assert_eq!(None, join_key(&h, "b"));
        assert_eq!(None, join_key(&h, "c"));
    }

    #[test]
    fn test_hit_key() {
        let h = hit("1", json!({"a": "x"}));
        assert_eq!("key:\"x\"", hit_key(&h, Some("a")));
        assert_eq!("source:{\"a\":\"x\"}", hit_key(&h, None));
        assert_eq!("source:{\"a\":\"x\"}", hit_key(&h, Some("b")));
    }

    #[test]
    fn test_combine_prefixes_fields() {
        let side = |alias: &str| JoinSide {
            alias: alias.to_string(),
            request: SearchRequest::new("accounts", json!({})),
            join_field: "id".to_string(),
        };
        let (a, b) = (side("a"), side("b"));

        let combined = combine(
            &a,
            &hit("1", json!({"id": 1})),
            Some((&b, &hit("2", json!({"id": 1, "name": "x"})))),
        );
        assert_eq!("1|2", combined.id);
        assert_eq!(
            json!({"a.id": 1, "b.id": 1, "b.name": "x"}),
            Value::Object(combined.source)
        );
    }
}
