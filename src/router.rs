use crate::{config::Config, error::InventoryError, state::AppState, upload::UPLOADS_ROUTE, view};
use axum::{
    extract::DefaultBodyLimit,
    http::Method,
    response::Html,
    routing::{delete, get, post},
    Router,
};
use axum_macros::debug_handler;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::info;

pub mod api;

pub fn router(state: AppState, config: &Config) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE]);

    Router::new()
        .merge(page_router(state.clone(), &config.public_dir))
        .merge(api_router(state.clone(), config.max_upload_bytes))
        .nest_service(
            &format!("/{UPLOADS_ROUTE}"),
            ServeDir::new(state.uploads.root()),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

fn page_router(state: AppState, public_dir: &str) -> Router {
    Router::new()
        .nest_service("/public", ServeDir::new(public_dir))
        .route("/", get(index))
        .route("/inventory", get(index))
        .with_state(state)
}

fn api_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/api/inventory", get(api::list))
        .route("/api/updateInventory", post(api::replace_all))
        .route("/api/deleteItem/:id", delete(api::delete_item))
        .route("/api/addNewItem", post(api::add_item))
        .route(
            "/api/uploadImage",
            post(api::upload_image).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .with_state(state)
}

#[debug_handler]
pub async fn index(
    state: axum::extract::State<AppState>,
) -> Result<Html<String>, InventoryError> {
    info!("Rendering inventory page");
    let items = state.inventory.list().await?;
    Ok(Html(view::render_index(&state, &items)?))
}
