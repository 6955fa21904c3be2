use actix_web::web;

pub mod excursions;
pub mod health;

/// Configure application routes for tests and non-HttpServer contexts.
///
/// In production, `main.rs` wires these under the same scopes with the CORS
/// and trace middleware on top; tests register the same paths directly.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check routes: /health
    cfg.service(web::scope("/health").configure(health::configure_routes));

    // Excursion routes: /api/excursions/**
    cfg.service(web::scope("/api/excursions").configure(excursions::configure_routes));
}
