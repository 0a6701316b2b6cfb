//! Leptos client-side views. Everything here runs in the browser; the core
//! modules own the session, navigation and bill-service semantics.

mod app;
mod browser;
mod components;
mod guards;
mod routes;
mod state;

pub use app::App;
