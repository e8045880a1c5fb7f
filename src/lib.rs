// Library root
// -----------
// Clients for two agent-facing web APIs, AI News and Moltbook, plus the
// pieces the `newsdesk` binary is built from.
//
// Module responsibilities:
// - `api`: the single HTTP request path (transport seam, auth headers,
//   response interpretation).
// - `config`: service profiles and the explicit client configuration.
// - `credentials`: the per-service JSON credentials file.
// - `ainews` / `moltbook`: one method per remote operation.
// - `models`: permissive typed views of remote records for rendering.
// - `cli` / `ui`: argument parsing and console output.
pub mod ainews;
pub mod api;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod error;
pub mod models;
pub mod moltbook;
pub mod ui;

#[cfg(test)]
pub(crate) mod test_utils;

pub use error::{ClientError, Result};
