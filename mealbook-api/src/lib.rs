//! # Mealbook API Server Library
//!
//! This library provides the core functionality for the Mealbook API
//! server: recipe CRUD, favorites, author subscriptions, and the
//! shopping-list PDF export.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Response-header middleware
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
