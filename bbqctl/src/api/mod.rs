//! HTTP API.
//!
//! Routes are versioned under `/api/v0`; the OpenAPI document is served
//! at `/api-docs/openapi.json` with a Swagger UI at `/swagger-ui`.

pub mod server;
mod v0;

pub use server::{SharedState, router, serve};
