//! GraphQL endpoint.

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::extract::State;
use axum::response::{Html, IntoResponse};

use crate::state::AppState;

/// Path the GraphQL endpoint is mounted at.
pub const GRAPHQL_PATH: &str = "/graphql";

/// Execute a GraphQL query or mutation against the shared schema.
pub async fn execute(State(state): State<AppState>, request: GraphQLRequest) -> GraphQLResponse {
    state.schema().execute(request.into_inner()).await.into()
}

/// Serve the GraphiQL IDE pointed at this server's endpoint.
pub async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint(GRAPHQL_PATH).finish())
}
