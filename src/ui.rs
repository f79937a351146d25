use axum::{response::Html, routing::get, Router};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(board_page))
}

async fn board_page() -> Html<&'static str> {
    Html(include_str!("../assets/board.html"))
}
