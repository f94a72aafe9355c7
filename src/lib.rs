//! Retrieval-augmented conversational question answering over a private
//! document collection.
//!
//! The pipeline chunks source documents, indexes their embeddings, rewrites
//! follow-up questions into standalone ones using the session history,
//! retrieves the top-k chunks and synthesizes a grounded answer, updating the
//! per-session conversation window on success.

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;
