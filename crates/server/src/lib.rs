//! Coach Server - HTTP API for the coaching chatbot backend.
//!
//! Wires the pipeline crates (`embedding`, `retrieval`, `generation`,
//! `nutrition`) behind an axum router:
//!
//! - **Guide search**: embed the question, query the managed vector index
//!   (hybrid or dense-only), threshold, return the reference list.
//! - **Answer generation**: assemble the bounded context from the reference
//!   list and produce the policy-constrained counselor answer.
//! - **Question summary**: counselor-support digest of the user's message.
//! - **Nutrition estimates**: cached LLM nutrition figures per food entry.
//!
//! # API Endpoints
//!
//! Public: `GET /`, `GET /health`, `GET /ready`.
//!
//! Protected (API key via `X-API-Key` or `Authorization: Bearer`):
//!
//! - `POST /api/v1/coach/summary`
//! - `POST /api/v1/coach/reference` (204 when no relevant guide)
//! - `POST /api/v1/coach/answer`
//! - `POST /api/v1/nutrition` (200 cached / 201 generated)
//!
//! # Quick start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```

pub mod alert;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;
