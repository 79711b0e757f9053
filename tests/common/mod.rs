//! In-memory stand-in for the database server.
//!
//! Speaks the same HTTP/JSON protocol as the real server for the endpoints
//! the client uses: single and batch document/edge operations, listing,
//! AQL cursors of the form `FOR x IN coll RETURN x`, and by-example
//! queries. Revisions come from one global counter, so every write
//! produces a revision never seen before.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use arango_client::transport::{HttpRequest, HttpResponse, Transport, TransportError};
use arango_client::Database;
use http::header::{ETAG, IF_MATCH, IF_NONE_MATCH};
use http::{HeaderValue, Method, StatusCode};
use serde_json::{json, Map, Value};

pub const DATABASE: &str = "_system";

const RESERVED: [&str; 5] = ["_id", "_key", "_rev", "_from", "_to"];
const DEFAULT_BATCH_SIZE: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    Document,
    Edge,
}

#[derive(Debug)]
struct Collection {
    kind: CollectionKind,
    docs: BTreeMap<String, Map<String, Value>>,
}

#[derive(Debug)]
struct ServerCursor {
    remaining: VecDeque<Value>,
    batch_size: usize,
    count: usize,
}

#[derive(Debug, Default)]
struct State {
    collections: BTreeMap<String, Collection>,
    revision: u64,
    key: u64,
    cursor: u64,
    cursors: HashMap<String, ServerCursor>,
    log: Vec<HttpRequest>,
}

pub struct FakeArango {
    state: Mutex<State>,
}

type Reply = (StatusCode, Option<Value>, Option<String>);

fn reply(status: StatusCode, body: Value) -> Reply {
    (status, Some(body), None)
}

fn error(status: StatusCode, error_num: i64, message: &str) -> Reply {
    reply(
        status,
        json!({
            "error": true,
            "code": status.as_u16(),
            "errorNum": error_num,
            "errorMessage": message,
        }),
    )
}

fn flag(request: &HttpRequest, name: &str, default: bool) -> bool {
    match request.query_param(name) {
        Some("true") => true,
        Some("false") => false,
        _ => default,
    }
}

fn strip_reserved(body: &Map<String, Value>) -> Map<String, Value> {
    body.iter()
        .filter(|(k, _)| !RESERVED.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

fn merge(target: &mut Map<String, Value>, patch: &Map<String, Value>, keep_null: bool, merge_objects: bool) {
    for (name, value) in patch {
        if RESERVED.contains(&name.as_str()) {
            continue;
        }
        if value.is_null() && !keep_null {
            target.remove(name);
            continue;
        }
        match (target.get_mut(name), value) {
            (Some(Value::Object(existing)), Value::Object(nested)) if merge_objects => {
                merge(existing, nested, keep_null, merge_objects);
            }
            _ => {
                target.insert(name.clone(), value.clone());
            }
        }
    }
}

fn identity(doc: &Map<String, Value>) -> Value {
    json!({
        "_id": doc["_id"],
        "_key": doc["_key"],
        "_rev": doc["_rev"],
    })
}

impl FakeArango {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
        }
    }

    pub fn with_collection(self, name: &str) -> Self {
        self.add_collection(name, CollectionKind::Document);
        self
    }

    pub fn with_edge_collection(self, name: &str) -> Self {
        self.add_collection(name, CollectionKind::Edge);
        self
    }

    fn add_collection(&self, name: &str, kind: CollectionKind) {
        self.state.lock().unwrap().collections.insert(
            name.to_string(),
            Collection {
                kind,
                docs: BTreeMap::new(),
            },
        );
    }

    /// Share the server and open the default database over it
    pub fn start(self) -> (Arc<FakeArango>, Database) {
        let server = Arc::new(self);
        let transport: Arc<dyn Transport> = server.clone();
        (server, Database::new(transport, DATABASE))
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state.lock().unwrap().log.clone()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests().pop().expect("no request recorded")
    }

    pub fn open_cursors(&self) -> usize {
        self.state.lock().unwrap().cursors.len()
    }

    /// Stored state of `collection/key`, reserved fields included
    pub fn stored(&self, handle: &str) -> Option<Value> {
        let (collection, key) = handle.split_once('/')?;
        let state = self.state.lock().unwrap();
        state
            .collections
            .get(collection)?
            .docs
            .get(key)
            .map(|doc| Value::Object(doc.clone()))
    }

    pub fn list_len(&self, collection: &str) -> usize {
        let state = self.state.lock().unwrap();
        state
            .collections
            .get(collection)
            .map(|c| c.docs.len())
            .unwrap_or(0)
    }

    pub fn current_rev(&self, handle: &str) -> Option<String> {
        self.stored(handle)
            .and_then(|doc| doc["_rev"].as_str().map(str::to_string))
    }

    /// Overwrite a stored document behind the client's back
    pub fn touch(&self, handle: &str) -> String {
        let (collection, key) = handle.split_once('/').expect("handle");
        let mut state = self.state.lock().unwrap();
        state.revision += 1;
        let rev = format!("_r{}", state.revision);
        let doc = state
            .collections
            .get_mut(collection)
            .and_then(|c| c.docs.get_mut(key))
            .expect("document exists");
        doc.insert("_rev".into(), Value::String(rev.clone()));
        rev
    }

    fn handle(&self, request: &HttpRequest) -> Reply {
        let prefix = format!("/_db/{}/_api/", DATABASE);
        let rest = match request.path.strip_prefix(&prefix) {
            Some(rest) => rest.to_string(),
            None => return error(StatusCode::NOT_FOUND, 404, "unknown path"),
        };

        let mut state = self.state.lock().unwrap();

        let (head, tail) = match rest.split_once('/') {
            Some((head, tail)) => (head.to_string(), Some(tail.to_string())),
            None => (rest.clone(), None),
        };

        let kind = match head.as_str() {
            "document" => Some(CollectionKind::Document),
            "edge" => Some(CollectionKind::Edge),
            _ => None,
        };

        match (head.as_str(), tail, kind) {
            (_, None, Some(kind)) if request.method == Method::POST => state.create(request, kind),
            (_, None, Some(kind)) if request.method == Method::GET => state.list(request, kind),
            (_, Some(tail), Some(kind)) => match tail.split_once('/') {
                Some((collection, key)) => state.single(request, kind, collection, key),
                None if request.method == Method::POST => state.create_many(request, &tail),
                None if request.method == Method::DELETE => state.delete_many(request, &tail),
                None => error(StatusCode::BAD_REQUEST, 1205, "invalid document handle"),
            },
            ("cursor", None, None) if request.method == Method::POST => state.aql(request),
            ("cursor", Some(id), None) if request.method == Method::PUT => state.more(&id),
            ("cursor", Some(id), None) if request.method == Method::DELETE => state.release(&id),
            ("simple", Some(tail), None) if tail == "by-example" && request.method == Method::PUT => {
                state.by_example(request)
            }
            _ => error(StatusCode::NOT_FOUND, 404, "unknown path"),
        }
    }
}

impl State {
    fn next_rev(&mut self) -> String {
        self.revision += 1;
        format!("_r{}", self.revision)
    }

    fn next_key(&mut self) -> String {
        self.key += 1;
        format!("k{}", self.key)
    }

    fn resolves(&self, handle: &str) -> Result<(), Reply> {
        let (collection, key) = handle
            .split_once('/')
            .ok_or_else(|| error(StatusCode::BAD_REQUEST, 1205, "invalid document handle"))?;
        let docs = &self
            .collections
            .get(collection)
            .ok_or_else(|| error(StatusCode::NOT_FOUND, 1203, "collection not found"))?
            .docs;
        if docs.contains_key(key) {
            Ok(())
        } else {
            Err(error(StatusCode::NOT_FOUND, 1202, "document not found"))
        }
    }

    fn insert(
        &mut self,
        collection: &str,
        body: &Value,
        endpoints: Option<(String, String)>,
    ) -> Result<Value, Reply> {
        let body = body
            .as_object()
            .ok_or_else(|| error(StatusCode::BAD_REQUEST, 600, "body must be an object"))?;

        let endpoints = match endpoints {
            Some(endpoints) => Some(endpoints),
            None => match (body.get("_from"), body.get("_to")) {
                (Some(Value::String(from)), Some(Value::String(to))) => {
                    Some((from.clone(), to.clone()))
                }
                _ => None,
            },
        };

        let is_edge = self
            .collections
            .get(collection)
            .map(|c| c.kind == CollectionKind::Edge)
            .unwrap_or(false);
        if is_edge {
            match &endpoints {
                Some((from, to)) => {
                    self.resolves(from)?;
                    self.resolves(to)?;
                }
                None => return Err(error(StatusCode::BAD_REQUEST, 1233, "edge attribute missing")),
            }
        }

        let key = match body.get("_key").and_then(Value::as_str) {
            Some(key) => key.to_string(),
            None => self.next_key(),
        };

        let exists = self
            .collections
            .get(collection)
            .map(|c| c.docs.contains_key(&key))
            .unwrap_or(false);
        if exists {
            return Err(error(StatusCode::CONFLICT, 1210, "unique constraint violated"));
        }

        let rev = self.next_rev();
        let mut doc = strip_reserved(body);
        doc.insert("_id".into(), json!(format!("{}/{}", collection, key)));
        doc.insert("_key".into(), json!(key));
        doc.insert("_rev".into(), json!(rev));
        if let (true, Some((from, to))) = (is_edge, endpoints) {
            doc.insert("_from".into(), json!(from));
            doc.insert("_to".into(), json!(to));
        }

        let result = identity(&doc);
        if let Some(c) = self.collections.get_mut(collection) {
            c.docs.insert(key, doc);
        }
        Ok(result)
    }

    fn ensure_collection(&mut self, request: &HttpRequest, name: &str, kind: CollectionKind) -> Result<(), Reply> {
        if self.collections.contains_key(name) {
            return Ok(());
        }
        if flag(request, "createCollection", false) {
            self.collections.insert(
                name.to_string(),
                Collection {
                    kind,
                    docs: BTreeMap::new(),
                },
            );
            return Ok(());
        }
        Err(error(StatusCode::NOT_FOUND, 1203, "collection not found"))
    }

    fn write_status(request: &HttpRequest) -> StatusCode {
        if flag(request, "waitForSync", false) {
            StatusCode::CREATED
        } else {
            StatusCode::ACCEPTED
        }
    }

    fn create(&mut self, request: &HttpRequest, kind: CollectionKind) -> Reply {
        let collection = match request.query_param("collection") {
            Some(c) => c.to_string(),
            None => return error(StatusCode::BAD_REQUEST, 1204, "collection parameter missing"),
        };
        if let Err(reply) = self.ensure_collection(request, &collection, kind) {
            return reply;
        }

        let endpoints = match kind {
            CollectionKind::Edge => match (request.query_param("from"), request.query_param("to")) {
                (Some(from), Some(to)) => Some((from.to_string(), to.to_string())),
                _ => return error(StatusCode::BAD_REQUEST, 400, "from/to missing"),
            },
            CollectionKind::Document => None,
        };

        let body = request.json_body().unwrap_or(Value::Null);
        match self.insert(&collection, &body, endpoints) {
            Ok(mut result) => {
                result["error"] = json!(false);
                reply(Self::write_status(request), result)
            }
            Err(reply) => reply,
        }
    }

    fn create_many(&mut self, request: &HttpRequest, collection: &str) -> Reply {
        if let Err(reply) = self.ensure_collection(request, collection, CollectionKind::Document) {
            return reply;
        }
        let items = match request.json_body() {
            Some(Value::Array(items)) => items,
            _ => return error(StatusCode::BAD_REQUEST, 600, "body must be an array"),
        };

        let results: Vec<Value> = items
            .iter()
            .map(|item| match self.insert(collection, item, None) {
                Ok(result) => result,
                Err((_, body, _)) => {
                    let body = body.unwrap_or(Value::Null);
                    json!({"error": true, "errorNum": body["errorNum"], "errorMessage": body["errorMessage"]})
                }
            })
            .collect();
        reply(Self::write_status(request), Value::Array(results))
    }

    fn delete_many(&mut self, request: &HttpRequest, collection: &str) -> Reply {
        let return_old = flag(request, "returnOld", false);
        let docs = match self.collections.get_mut(collection) {
            Some(c) => &mut c.docs,
            None => return error(StatusCode::NOT_FOUND, 1203, "collection not found"),
        };
        let selectors = match request.json_body() {
            Some(Value::Array(items)) => items,
            _ => return error(StatusCode::BAD_REQUEST, 600, "body must be an array"),
        };

        let results: Vec<Value> = selectors
            .iter()
            .map(|selector| {
                let raw = selector.as_str().unwrap_or_default();
                let key = raw.rsplit('/').next().unwrap_or(raw);
                match docs.remove(key) {
                    Some(old) => {
                        let mut result = identity(&old);
                        if return_old {
                            result["old"] = Value::Object(old);
                        }
                        result
                    }
                    None => json!({"error": true, "errorNum": 1202, "errorMessage": "document not found"}),
                }
            })
            .collect();
        reply(Self::write_status(request), Value::Array(results))
    }

    fn list(&mut self, request: &HttpRequest, kind: CollectionKind) -> Reply {
        let name = request.query_param("collection").unwrap_or_default();
        let collection = match self.collections.get(name) {
            Some(c) => c,
            None => return error(StatusCode::NOT_FOUND, 1203, "collection not found"),
        };
        let segment = match kind {
            CollectionKind::Document => "document",
            CollectionKind::Edge => "edge",
        };
        let listed: Vec<Value> = collection
            .docs
            .keys()
            .map(|key| match request.query_param("type").unwrap_or("path") {
                "key" => json!(key),
                "id" => json!(format!("{}/{}", name, key)),
                _ => json!(format!("/_db/{}/_api/{}/{}/{}", DATABASE, segment, name, key)),
            })
            .collect();
        reply(StatusCode::OK, json!({ "documents": listed }))
    }

    fn single(&mut self, request: &HttpRequest, _kind: CollectionKind, collection: &str, key: &str) -> Reply {
        let is_read = request.method == Method::GET || request.method == Method::HEAD;

        let current = match self.collections.get(collection) {
            None => return error(StatusCode::NOT_FOUND, 1203, "collection not found"),
            Some(c) => match c.docs.get(key) {
                None => return error(StatusCode::NOT_FOUND, 1202, "document not found"),
                Some(doc) => doc.clone(),
            },
        };
        let current_rev = current["_rev"].as_str().unwrap_or_default().to_string();

        if is_read && request.header(&IF_NONE_MATCH) == Some(current_rev.as_str()) {
            return (StatusCode::NOT_MODIFIED, None, Some(current_rev));
        }

        let expected = request
            .header(&IF_MATCH)
            .or_else(|| request.query_param("rev"))
            .map(str::to_string);
        let last_write_wins = request.query_param("policy") == Some("last");
        if let Some(expected) = expected {
            if expected != current_rev && (is_read || !last_write_wins) {
                let mut body = json!({
                    "error": true,
                    "code": 412,
                    "errorNum": 1200,
                    "errorMessage": "precondition failed",
                });
                body["_id"] = current["_id"].clone();
                body["_key"] = current["_key"].clone();
                body["_rev"] = json!(current_rev);
                return (StatusCode::PRECONDITION_FAILED, Some(body), Some(current_rev));
            }
        }

        let status = Self::write_status(request);
        let method = request.method.clone();
        if method == Method::GET {
            return (StatusCode::OK, Some(Value::Object(current)), Some(current_rev));
        }
        if method == Method::HEAD {
            return (StatusCode::OK, None, Some(current_rev));
        }
        if method == Method::DELETE {
            if let Some(c) = self.collections.get_mut(collection) {
                c.docs.remove(key);
            }
            let mut result = identity(&current);
            result["error"] = json!(false);
            if flag(request, "returnOld", false) {
                result["old"] = Value::Object(current);
            }
            return reply(status, result);
        }

        let patch = match request.json_body() {
            Some(Value::Object(patch)) => patch,
            _ => return error(StatusCode::BAD_REQUEST, 600, "body must be an object"),
        };

        let mut updated = if method == Method::PATCH {
            let mut merged = current.clone();
            merge(
                &mut merged,
                &patch,
                flag(request, "keepNull", true),
                flag(request, "mergeObjects", true),
            );
            merged
        } else if method == Method::PUT {
            let mut replaced = strip_reserved(&patch);
            for name in RESERVED {
                if let Some(value) = current.get(name) {
                    replaced.insert(name.to_string(), value.clone());
                }
            }
            replaced
        } else {
            return error(StatusCode::METHOD_NOT_ALLOWED, 405, "method not supported");
        };

        let rev = self.next_rev();
        updated.insert("_rev".into(), json!(rev));

        let mut result = identity(&updated);
        result["_oldRev"] = json!(current_rev);
        result["error"] = json!(false);
        if flag(request, "returnOld", false) {
            result["old"] = Value::Object(current);
        }
        if flag(request, "returnNew", false) {
            result["new"] = Value::Object(updated.clone());
        }
        if let Some(c) = self.collections.get_mut(collection) {
            c.docs.insert(key.to_string(), updated);
        }
        reply(status, result)
    }

    fn open_cursor(&mut self, mut items: VecDeque<Value>, batch_size: usize, with_count: bool) -> Reply {
        let count = items.len();
        let batch_size = batch_size.max(1);
        let first: Vec<Value> = items.drain(..batch_size.min(count)).collect();

        let mut body = json!({
            "error": false,
            "code": 201,
            "result": first,
            "hasMore": !items.is_empty(),
        });
        if with_count {
            body["count"] = json!(count);
        }
        if !items.is_empty() {
            self.cursor += 1;
            let id = self.cursor.to_string();
            self.cursors.insert(
                id.clone(),
                ServerCursor {
                    remaining: items,
                    batch_size,
                    count,
                },
            );
            body["id"] = json!(id);
        }
        reply(StatusCode::CREATED, body)
    }

    fn aql(&mut self, request: &HttpRequest) -> Reply {
        let body = request.json_body().unwrap_or(Value::Null);
        let text = body["query"].as_str().unwrap_or_default();
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let collection = match tokens.as_slice() {
            ["FOR", var, "IN", collection, "RETURN", ret] if var == ret => *collection,
            _ => return error(StatusCode::BAD_REQUEST, 1501, "syntax error"),
        };
        let items: VecDeque<Value> = match self.collections.get(collection) {
            Some(c) => c.docs.values().cloned().map(Value::Object).collect(),
            None => return error(StatusCode::NOT_FOUND, 1203, "collection not found"),
        };
        let batch_size = body["batchSize"].as_u64().map(|n| n as usize).unwrap_or(DEFAULT_BATCH_SIZE);
        let with_count = body["count"].as_bool().unwrap_or(false);
        self.open_cursor(items, batch_size, with_count)
    }

    fn by_example(&mut self, request: &HttpRequest) -> Reply {
        let body = request.json_body().unwrap_or(Value::Null);
        let name = body["collection"].as_str().unwrap_or_default();
        let example = body["example"].as_object().cloned().unwrap_or_default();
        let collection = match self.collections.get(name) {
            Some(c) => c,
            None => return error(StatusCode::NOT_FOUND, 1203, "collection not found"),
        };

        let skip = body["skip"].as_u64().unwrap_or(0) as usize;
        let limit = body["limit"].as_u64().map(|n| n as usize).unwrap_or(usize::MAX);
        let items: VecDeque<Value> = collection
            .docs
            .values()
            .filter(|doc| example.iter().all(|(k, v)| doc.get(k) == Some(v)))
            .skip(skip)
            .take(limit)
            .cloned()
            .map(Value::Object)
            .collect();
        let batch_size = body["batchSize"].as_u64().map(|n| n as usize).unwrap_or(DEFAULT_BATCH_SIZE);
        self.open_cursor(items, batch_size, true)
    }

    fn more(&mut self, id: &str) -> Reply {
        let cursor = match self.cursors.get_mut(id) {
            Some(cursor) => cursor,
            None => return error(StatusCode::NOT_FOUND, 1600, "cursor not found"),
        };
        let take = cursor.batch_size.min(cursor.remaining.len());
        let batch: Vec<Value> = cursor.remaining.drain(..take).collect();
        let has_more = !cursor.remaining.is_empty();
        let count = cursor.count;
        if !has_more {
            self.cursors.remove(id);
        }
        reply(
            StatusCode::OK,
            json!({
                "error": false,
                "code": 200,
                "result": batch,
                "hasMore": has_more,
                "count": count,
                "id": id,
            }),
        )
    }

    fn release(&mut self, id: &str) -> Reply {
        match self.cursors.remove(id) {
            Some(_) => reply(StatusCode::ACCEPTED, json!({"error": false, "code": 202, "id": id})),
            None => error(StatusCode::NOT_FOUND, 1600, "cursor not found"),
        }
    }
}

impl Transport for FakeArango {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let (status, body, etag) = self.handle(&request);
        self.state.lock().unwrap().log.push(request.clone());

        let mut response = HttpResponse::new(status);
        if request.method != Method::HEAD {
            if let Some(body) = body {
                response = response.with_json_body(&body);
            }
        }
        if let Some(rev) = etag {
            let value = HeaderValue::from_str(&format!("\"{}\"", rev))
                .map_err(|e| TransportError::with_source("bad etag", e))?;
            response.headers.insert(ETAG, value);
        }
        Ok(response)
    }
}

/// Transport with no server behind it
pub struct Unreachable;

impl Transport for Unreachable {
    fn execute(&self, _request: HttpRequest) -> Result<HttpResponse, TransportError> {
        Err(TransportError::new("connection refused"))
    }
}
