pub mod auth_route;

pub async fn health() -> &'static str {
    "ok"
}
