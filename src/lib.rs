//! Excel Interviewer - Adaptive Technical Assessment Engine
//!
//! This crate implements an adaptive Excel skills interview: LLM-backed
//! question generation and response evaluation behind ports, a deterministic
//! trajectory decision policy, and a per-session state machine that degrades
//! gracefully when remote capabilities fail.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
