#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

use foodapp_storefront::{
    config::Config, routes::build_router, services::api::ApiClient, state::AppState,
};

pub const ADMIN_TOKEN: &str = "admin-access";
pub const ALICE_TOKEN: &str = "alice-access";

/// One request received by the mock API.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: String,
    pub authorization: Option<String>,
    pub body: String,
}

impl Recorded {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

#[derive(Default)]
struct MockData {
    requests: Vec<Recorded>,
    products: Vec<Value>,
    next_id: i64,
}

/// In-process stand-in for the remote REST API.
#[derive(Clone)]
pub struct MockApi {
    pub base_url: String,
    data: Arc<Mutex<MockData>>,
}

fn categories() -> Vec<Value> {
    vec![
        json!({"id": 1, "name": "Pizza", "description": "Stone baked", "imageUrl": "https://img/pizza.png", "active": true}),
        json!({"id": 2, "name": "Burgers", "description": "Grilled to order", "imageUrl": null, "active": true}),
    ]
}

fn category_name(id: i64) -> &'static str {
    if id == 1 { "Pizza" } else { "Burgers" }
}

fn seed_products() -> Vec<Value> {
    (1..=12)
        .map(|id: i64| {
            let category_id = if id % 2 == 1 { 1 } else { 2 };
            json!({
                "id": id,
                "name": format!("Dish {:02}", id),
                "description": format!("Tasty dish number {}", id),
                "price": 5.0 + id as f64,
                "imageUrl": null,
                "stock": id,
                "categoryId": category_id,
                "categoryName": category_name(category_id),
                "active": true,
                "createdAt": "2024-01-15T10:30:00"
            })
        })
        .collect()
}

fn query_param(query: &str, name: &str) -> Option<String> {
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == name).then(|| value.replace('+', " ").replace("%20", " "))
    })
}

fn json_response(status: StatusCode, body: Value) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        body.to_string(),
    )
        .into_response()
}

fn error_body(status: StatusCode, message: &str, path: &str) -> Response {
    json_response(
        status,
        json!({
            "status": status.as_u16(),
            "error": status.canonical_reason(),
            "message": message,
            "path": path,
        }),
    )
}

fn paged(items: Vec<Value>, query: &str) -> Value {
    let page: usize = query_param(query, "page").and_then(|p| p.parse().ok()).unwrap_or(0);
    let size: usize = query_param(query, "size").and_then(|s| s.parse().ok()).unwrap_or(10);
    let total = items.len();
    let total_pages = total.div_ceil(size);
    let content: Vec<Value> = items.into_iter().skip(page * size).take(size).collect();
    json!({
        "content": content,
        "page": page,
        "size": size,
        "totalElements": total,
        "totalPages": total_pages,
        "last": page + 1 >= total_pages,
    })
}

fn auth_response(username: &str, role: &str, suffix: &str) -> Value {
    json!({
        "accessToken": format!("{}-access{}", username, suffix),
        "refreshToken": format!("{}-refresh{}", username, suffix),
        "tokenType": "Bearer",
        "username": username,
        "email": format!("{}@example.com", username),
        "role": role,
    })
}

impl MockApi {
    /// Starts the mock on an ephemeral port.
    pub async fn spawn() -> Self {
        let data = Arc::new(Mutex::new(MockData {
            requests: Vec::new(),
            products: seed_products(),
            next_id: 13,
        }));

        let app = Router::new()
            .fallback(handle)
            .with_state(data.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}/api", addr),
            data,
        }
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.base_url, Duration::from_secs(5)).unwrap()
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.data.lock().unwrap().requests.clone()
    }

    pub fn requests_to(&self, method: &str, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests_to(method, path).len()
    }

    pub fn product_count(&self) -> usize {
        self.data.lock().unwrap().products.len()
    }
}

async fn handle(
    State(data): State<Arc<Mutex<MockData>>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    let query = uri.query().unwrap_or_default().to_string();
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = String::from_utf8_lossy(&body).to_string();

    let mut data = data.lock().unwrap();
    data.requests.push(Recorded {
        method: method.to_string(),
        path: path.clone(),
        query: query.clone(),
        authorization: authorization.clone(),
        body: body.clone(),
    });

    let is_admin = authorization.as_deref() == Some(&format!("Bearer {}", ADMIN_TOKEN));
    let segments: Vec<&str> = path
        .trim_start_matches("/api/")
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();
    let payload: Value = serde_json::from_str(&body).unwrap_or(Value::Null);

    match (method.as_str(), segments.as_slice()) {
        ("POST", ["auth", "login"]) => {
            match (payload["username"].as_str(), payload["password"].as_str()) {
                (Some("alice"), Some("secret")) => {
                    json_response(StatusCode::OK, auth_response("alice", "ROLE_USER", ""))
                }
                (Some("admin"), Some("admin123")) => {
                    json_response(StatusCode::OK, auth_response("admin", "ROLE_ADMIN", ""))
                }
                _ => error_body(StatusCode::UNAUTHORIZED, "Invalid username or password", &path),
            }
        }
        ("POST", ["auth", "register"]) => match payload["username"].as_str() {
            Some("taken") => error_body(StatusCode::BAD_REQUEST, "Username is already taken", &path),
            Some(username) => {
                json_response(StatusCode::CREATED, auth_response(username, "ROLE_USER", ""))
            }
            None => error_body(StatusCode::BAD_REQUEST, "Invalid input", &path),
        },
        ("POST", ["auth", "refresh"]) => match payload["refreshToken"].as_str() {
            Some(token) if token.ends_with("-refresh") => {
                let username = token.trim_end_matches("-refresh");
                let role = if username == "admin" { "ROLE_ADMIN" } else { "ROLE_USER" };
                json_response(StatusCode::OK, auth_response(username, role, "-2"))
            }
            _ => error_body(StatusCode::UNAUTHORIZED, "Refresh token is invalid", &path),
        },
        ("POST", ["auth", "forgot-password"]) => json_response(
            StatusCode::OK,
            json!({"message": "If the email exists, a reset link has been sent"}),
        ),
        ("GET", ["categories"]) => json_response(StatusCode::OK, Value::Array(categories())),
        ("GET", ["categories", id]) => {
            let id: i64 = id.parse().unwrap_or(-1);
            match categories().into_iter().find(|c| c["id"].as_i64() == Some(id)) {
                Some(category) => json_response(StatusCode::OK, category),
                None => error_body(StatusCode::NOT_FOUND, "Category not found", &path),
            }
        }
        ("POST", ["categories"]) | ("PUT", ["categories", _]) | ("DELETE", ["categories", _])
            if !is_admin =>
        {
            error_body(StatusCode::FORBIDDEN, "Access Denied", &path)
        }
        ("POST", ["categories"]) => {
            let mut category = payload.clone();
            category["id"] = json!(3);
            json_response(StatusCode::CREATED, category)
        }
        ("PUT", ["categories", id]) => {
            let mut category = payload.clone();
            category["id"] = json!(id.parse::<i64>().unwrap_or(-1));
            json_response(StatusCode::OK, category)
        }
        ("DELETE", ["categories", _]) => {
            json_response(StatusCode::OK, json!({"message": "Category deleted successfully"}))
        }
        ("GET", ["products"]) => {
            let mut items = data.products.clone();
            if query_param(&query, "sortBy").as_deref() == Some("name") {
                items.sort_by(|a, b| a["name"].as_str().cmp(&b["name"].as_str()));
            }
            json_response(StatusCode::OK, paged(items, &query))
        }
        ("GET", ["products", "search"]) => {
            let keyword = query_param(&query, "keyword").unwrap_or_default().to_lowercase();
            let items = data
                .products
                .iter()
                .filter(|p| {
                    p["name"]
                        .as_str()
                        .unwrap_or_default()
                        .to_lowercase()
                        .contains(&keyword)
                })
                .cloned()
                .collect();
            json_response(StatusCode::OK, paged(items, &query))
        }
        ("GET", ["products", "category", id]) => {
            let id: i64 = id.parse().unwrap_or(-1);
            let items = data
                .products
                .iter()
                .filter(|p| p["categoryId"].as_i64() == Some(id))
                .cloned()
                .collect();
            json_response(StatusCode::OK, paged(items, &query))
        }
        ("GET", ["products", id]) => {
            let id: i64 = id.parse().unwrap_or(-1);
            match data.products.iter().find(|p| p["id"].as_i64() == Some(id)) {
                Some(product) => json_response(StatusCode::OK, product.clone()),
                None => error_body(
                    StatusCode::NOT_FOUND,
                    &format!("Product not found with id: {}", id),
                    &path,
                ),
            }
        }
        ("POST", ["products"]) | ("PUT", ["products", _]) if !is_admin => {
            error_body(StatusCode::FORBIDDEN, "Access Denied", &path)
        }
        ("DELETE", ["products", _]) if !is_admin => {
            error_body(StatusCode::FORBIDDEN, "Access Denied", &path)
        }
        ("POST", ["products"]) | ("PUT", ["products", _]) => {
            if payload["price"].as_f64().unwrap_or(0.0) <= 0.0 {
                return json_response(
                    StatusCode::BAD_REQUEST,
                    json!({
                        "status": 400,
                        "error": "Validation Failed",
                        "message": "Invalid input",
                        "path": path,
                        "validationErrors": {"price": "Price must be greater than 0"}
                    }),
                );
            }

            let id = match segments.get(1) {
                Some(id) => id.parse::<i64>().unwrap_or(-1),
                None => {
                    data.next_id += 1;
                    data.next_id - 1
                }
            };
            let category_id = payload["categoryId"].as_i64().unwrap_or(1);
            let mut product = payload.clone();
            product["id"] = json!(id);
            product["categoryName"] = json!(category_name(category_id));

            if method == Method::POST {
                data.products.push(product.clone());
                json_response(StatusCode::CREATED, product)
            } else {
                match data.products.iter_mut().find(|p| p["id"].as_i64() == Some(id)) {
                    Some(existing) => {
                        *existing = product.clone();
                        json_response(StatusCode::OK, product)
                    }
                    None => error_body(StatusCode::NOT_FOUND, "Product not found", &path),
                }
            }
        }
        ("DELETE", ["products", id]) => {
            let id: i64 = id.parse().unwrap_or(-1);
            let before = data.products.len();
            data.products.retain(|p| p["id"].as_i64() != Some(id));
            if data.products.len() == before {
                error_body(StatusCode::NOT_FOUND, "Product not found", &path)
            } else {
                json_response(StatusCode::OK, json!({"message": "Product deleted successfully"}))
            }
        }
        _ => error_body(StatusCode::NOT_FOUND, "No handler", &path),
    }
}

/// Starts the storefront against `api_base_url` and returns its base URL.
pub async fn spawn_storefront(api_base_url: &str) -> String {
    spawn_storefront_with_limit(api_base_url, 1000, 1).await
}

/// Starts the storefront with the given credential rate limit.
pub async fn spawn_storefront_with_limit(api_base_url: &str, burst: u32, period_secs: u64) -> String {
    let mut config = Config::new(api_base_url);
    config.api_timeout_secs = 5;
    config.auth_rate_limit_burst = burst;
    config.auth_rate_limit_period_secs = period_secs;

    let state = AppState::new(&config).unwrap();
    let app = build_router(state).unwrap();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    format!("http://{}", addr)
}

/// A browser-like client: keeps cookies and does not follow redirects.
pub fn browser() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}
