//! In-memory stand-in for an array's namespace API.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use ifsvol_http::{Error, HttpExecutor, HttpRequest, HttpResponse, Method, RequestContext};

const INITIAL_OWNER: &str = "root";
const INITIAL_GROUP: &str = "wheel";

#[derive(Debug, Clone)]
struct Container {
    owner: String,
    group: String,
    access_control: String,
}

/// Keeps containers keyed by their namespace path and answers the subset
/// of the API the volume client uses.
#[derive(Default)]
pub struct FakeArray {
    containers: Mutex<BTreeMap<String, Container>>,
    requests: Mutex<Vec<HttpRequest>>,
    fail_acl: AtomicBool,
    acl_calls: AtomicUsize,
}

impl FakeArray {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every ACL update answer 500.
    pub fn fail_acl_updates(&self) {
        self.fail_acl.store(true, Ordering::SeqCst);
    }

    pub fn acl_calls(&self) -> usize {
        self.acl_calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.containers.lock().unwrap().contains_key(path)
    }

    pub fn owner_of(&self, path: &str) -> Option<String> {
        self.containers
            .lock()
            .unwrap()
            .get(path)
            .map(|c| c.owner.clone())
    }

    /// Add a container below `path`, bypassing the API.
    pub fn insert(&self, path: &str) {
        self.containers.lock().unwrap().insert(
            path.to_string(),
            Container {
                owner: INITIAL_OWNER.to_string(),
                group: INITIAL_GROUP.to_string(),
                access_control: "private".to_string(),
            },
        );
    }

    fn handle(&self, request: &HttpRequest) -> HttpResponse {
        let path = request.path.trim_matches('/').to_string();
        let mut containers = self.containers.lock().unwrap();

        match request.method {
            Method::GET if request.query.contains_key("metadata") => match containers.get(&path) {
                Some(c) => respond(
                    200,
                    serde_json::json!({"attrs": [
                        {"name": "owner", "value": c.owner, "namespace": null},
                        {"name": "group", "value": c.group, "namespace": null},
                        {"name": "access_control", "value": c.access_control, "namespace": null}
                    ]}),
                ),
                None => not_found(),
            },
            Method::GET => {
                let prefix = format!("{}/", path);
                let children: Vec<serde_json::Value> = containers
                    .keys()
                    .filter_map(|k| k.strip_prefix(&prefix))
                    .filter(|rest| !rest.contains('/'))
                    .map(|name| serde_json::json!({"name": name}))
                    .collect();
                respond(200, serde_json::json!({"children": children}))
            }
            Method::PUT if request.query.contains_key("acl") => {
                self.acl_calls.fetch_add(1, Ordering::SeqCst);
                if self.fail_acl.load(Ordering::SeqCst) {
                    return error(500, "AEC_EXCEPTION", "acl update failed");
                }
                let Some(container) = containers.get_mut(&path) else {
                    return not_found();
                };
                let body = request.body.clone().unwrap_or_default();
                if let Some(owner) = body["owner"]["name"].as_str() {
                    container.owner = owner.to_string();
                }
                if let Some(group) = body["group"]["name"].as_str() {
                    container.group = group.to_string();
                }
                respond(200, serde_json::Value::Null)
            }
            Method::PUT if request.headers.contains_key("x-isi-ifs-copy-source") => {
                let source = request.headers["x-isi-ifs-copy-source"]
                    .trim_start_matches('/')
                    .to_string();
                let Some(original) = containers.get(&source).cloned() else {
                    return error(404, "AEC_NOT_FOUND", "copy source not found");
                };
                containers.insert(path, original);
                respond(200, serde_json::Value::Null)
            }
            Method::PUT => {
                if request.headers.get("x-isi-ifs-target-type").map(String::as_str)
                    != Some("container")
                {
                    return error(400, "AEC_BAD_REQUEST", "unsupported target type");
                }
                let access_control = request
                    .headers
                    .get("x-isi-ifs-access-control")
                    .cloned()
                    .unwrap_or_default();
                containers.entry(path).or_insert(Container {
                    owner: INITIAL_OWNER.to_string(),
                    group: INITIAL_GROUP.to_string(),
                    access_control,
                });
                respond(200, serde_json::Value::Null)
            }
            Method::DELETE => {
                if !containers.contains_key(&path) {
                    return not_found();
                }
                let prefix = format!("{}/", path);
                containers.retain(|k, _| *k != path && !k.starts_with(&prefix));
                respond(204, serde_json::Value::Null)
            }
        }
    }
}

impl HttpExecutor for FakeArray {
    fn execute(&self, ctx: &RequestContext, request: &HttpRequest) -> Result<HttpResponse, Error> {
        ctx.check()?;
        self.requests.lock().unwrap().push(request.clone());
        Ok(self.handle(request))
    }
}

fn respond(status: u16, body: serde_json::Value) -> HttpResponse {
    HttpResponse {
        status,
        status_text: String::new(),
        headers: HashMap::new(),
        body_text: Some(if body.is_null() {
            String::new()
        } else {
            body.to_string()
        }),
        body,
    }
}

fn error(status: u16, code: &str, message: &str) -> HttpResponse {
    respond(
        status,
        serde_json::json!({"errors": [{"code": code, "message": message}]}),
    )
}

fn not_found() -> HttpResponse {
    error(404, "AEC_NOT_FOUND", "path not found")
}
