//! Nursery Hub backend: multi-tenant childcare management service.

pub mod config;
pub mod domain;
pub mod rest;
pub mod storage;
