//! HTTP API server for the journaling UI
//!
//! This module provides a REST API over the journal and the recording session:
//! - POST /analyze - Analyze a transcript without saving
//! - GET|POST /dreams, GET|PATCH|DELETE /dreams/:id - Journal entries
//! - GET /dreams/tag/:tag - Dreams by tag, sign or emotion
//! - GET /insights - Averages and most common dream signs
//! - GET /session, POST /session/{start,stop,cancel,clear,save} - Recording control
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
