//! # SQL Signature Library
//!
//! Dialect-aware SQL signatures: a normalized digest with every literal
//! replaced by `?`, the extracted parameters with exact byte spans, and a
//! type for each top-level statement.
//!
//! Start with [`signature::signature`].

pub mod aggregate;
pub mod annotate;
pub mod app;
pub mod cache;
pub mod classify;
pub mod cli;
pub mod comments;
pub mod config;
pub mod dialect;
pub mod error;
pub mod lexer;
pub mod logging;
pub mod offset;
pub mod output;
pub mod render;
pub mod sanitize;
pub mod signature;
pub mod statements;
pub mod stream;
pub mod tuples;
