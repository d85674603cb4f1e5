//! AI-assist proxy for the note-taking app: `POST /api/ai` plus a status
//! endpoint and dashboard.

pub mod assist;
pub mod claude;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod http;
pub mod routes;
