//! Treatment Supervisor - Supervise-treatment consultation workflow
//!
//! This crate implements the consultation terminal a doctor uses to review a
//! patient's history, edit the drug prescription (optionally guided by a
//! decision-support AI), sign it and send it to the national health registry.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
