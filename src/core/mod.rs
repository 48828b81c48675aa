//! Core functionality: block documents, posts, session and configuration

pub mod block;
pub mod config;
pub mod document;
pub mod ids;
pub mod post;
pub mod publish;
pub mod session;
