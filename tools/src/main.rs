//! dashboard-server: builds the churn dashboard once and serves it.
//!
//! Usage:
//!   dashboard-server
//!   dashboard-server --seed 42 --customers 1000 --bind 127.0.0.1:8050
//!   dashboard-server --config dashboard.json

use anyhow::Result;
use axum::{extract::State, response::Html, routing::get, Json, Router};
use churnboard_core::{
    customer::CustomerRecord, figures::figure_json, Aggregates, Dashboard, DashboardConfig,
    Dataset,
};
use serde::Serialize;
use std::{env, sync::Arc};

/// Everything the handlers serve. Built once before the listener opens
/// and never mutated afterwards.
struct AppState {
    page: String,
    dataset: Dataset,
    aggregates: Aggregates,
    figures: Vec<FigureEntry>,
}

#[derive(Clone, Serialize)]
struct FigureEntry {
    id: String,
    tab: String,
    figure: serde_json::Value,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let config = load_config(&args)?;

    println!("Churn dashboard - dashboard-server");
    println!("  seed:       {}", config.dataset.seed);
    println!("  customers:  {}", config.dataset.num_customers);
    println!("  bind:       {}", config.server.bind_addr);
    println!();

    let state = Arc::new(build_state(&config)?);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("Cannot bind {}: {e}", config.server.bind_addr))?;
    log::info!("serving dashboard on http://{}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;
    Ok(())
}

fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/customers", get(customers))
        .route("/api/aggregates", get(aggregates))
        .route("/api/figures", get(figures))
        .with_state(state)
}

/// Config file first, then CLI flags on top.
fn load_config(args: &[String]) -> Result<DashboardConfig> {
    let mut config = match find_arg(args, "--config") {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };
    config.dataset.seed = parse_arg(args, "--seed", config.dataset.seed);
    config.dataset.num_customers = parse_arg(args, "--customers", config.dataset.num_customers);
    if let Some(bind) = find_arg(args, "--bind") {
        config.server.bind_addr = bind.to_string();
    }
    config.validate()?;
    Ok(config)
}

fn build_state(config: &DashboardConfig) -> Result<AppState> {
    let dataset = Dataset::generate(&config.dataset)?;
    let aggregates = Aggregates::compute(dataset.customers());
    let dashboard = Dashboard::build(&config.title, &dataset, &aggregates)?;
    let page = dashboard.render_html()?;
    log::info!("rendered page: {} bytes", page.len());

    let mut figures = Vec::new();
    for tab in &dashboard.tabs {
        for graph in &tab.graphs {
            figures.push(FigureEntry {
                id: graph.id.clone(),
                tab: tab.label.clone(),
                figure: figure_json(&graph.figure)?,
            });
        }
    }
    Ok(AppState {
        page,
        dataset,
        aggregates,
        figures,
    })
}

async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(state.page.clone())
}

async fn customers(State(state): State<Arc<AppState>>) -> Json<Vec<CustomerRecord>> {
    Json(state.dataset.customers().to_vec())
}

async fn aggregates(State(state): State<Arc<AppState>>) -> Json<Aggregates> {
    Json(state.aggregates.clone())
}

async fn figures(State(state): State<Arc<AppState>>) -> Json<Vec<FigureEntry>> {
    Json(state.figures.clone())
}

fn find_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    find_arg(args, flag)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use tower::ServiceExt; // for `oneshot`

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn flags_override_defaults() {
        let config = load_config(&args(&[
            "dashboard-server", "--seed", "9", "--customers", "25", "--bind", "0.0.0.0:9000",
        ]))
        .unwrap();
        assert_eq!(config.dataset.seed, 9);
        assert_eq!(config.dataset.num_customers, 25);
        assert_eq!(config.server.bind_addr, "0.0.0.0:9000");
    }

    #[test]
    fn zero_customers_flag_is_rejected() {
        assert!(load_config(&args(&["dashboard-server", "--customers", "0"])).is_err());
    }

    #[test]
    fn unparsable_flag_keeps_default() {
        let config = load_config(&args(&["dashboard-server", "--seed", "abc"])).unwrap();
        assert_eq!(config.dataset.seed, 42);
    }

    #[test]
    fn state_is_built_from_config() {
        let state = build_state(&DashboardConfig::default_test()).unwrap();
        assert_eq!(state.dataset.len(), 50);
        assert!(state.page.contains("<h1>"));
        assert_eq!(
            state.aggregates.churn_by_contract.iter().map(|r| r.total_customers).sum::<usize>(),
            50
        );
        assert_eq!(state.figures.len(), 10);
        assert_eq!(state.figures[0].tab, "Churn Rate by Contract Type");
    }

    fn test_app() -> Router {
        let mut config = DashboardConfig::default_test();
        config.dataset.num_customers = 300;
        app(Arc::new(build_state(&config).unwrap()))
    }

    async fn send(uri: &str) -> Response {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        test_app().oneshot(request).await.unwrap()
    }

    async fn get_json(uri: &str) -> serde_json::Value {
        let response = send(uri).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn index_serves_the_page() {
        let response = send("/").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/html"));
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let page = String::from_utf8(body.to_vec()).unwrap();
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<h1>Customer Churn Analysis Dashboard</h1>"));
    }

    #[tokio::test]
    async fn customers_route_returns_the_table() {
        let customers = get_json("/api/customers").await;
        let rows = customers.as_array().unwrap();
        assert_eq!(rows.len(), 300);
        assert_eq!(rows[0]["customer_id"], 1);
    }

    #[tokio::test]
    async fn aggregates_route_covers_every_customer() {
        let aggregates = get_json("/api/aggregates").await;
        let rows = aggregates["churn_by_contract"].as_array().unwrap();
        assert_eq!(rows.len(), 3);
        let total: u64 = rows
            .iter()
            .map(|r| r["total_customers"].as_u64().unwrap())
            .sum();
        assert_eq!(total, 300);
    }

    #[tokio::test]
    async fn figures_route_lists_every_graph() {
        let figures = get_json("/api/figures").await;
        let entries = figures.as_array().unwrap();
        assert_eq!(entries.len(), 10);
        assert_eq!(entries[0]["id"], "churn-contract-graph");
        assert_eq!(entries[0]["figure"]["data"][0]["type"], "pie");
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        assert_eq!(send("/nope").await.status(), StatusCode::NOT_FOUND);
    }
}
