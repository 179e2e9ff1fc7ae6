//! Form Concierge - Conversation-driven government form acquisition
//!
//! This crate turns a free-text conversation into a completed government
//! form: it recognises which form the user needs, asks its questions one at
//! a time, validates each answer and hands the finished answer set to a
//! document renderer.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
