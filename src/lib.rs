//! Terminal news search: type a term, query NewsAPI, browse the articles.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod model;
pub mod opener;
pub mod search;
pub mod ui;
