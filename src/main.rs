//! # wserver - Entry Point
//! src/main.rs
//!
//! Lee la configuración, inicializa el logging y arranca el servidor.
//! Cualquier error fatal termina el proceso con código 1.

use tracing::error;
use tracing_subscriber::EnvFilter;
use wserver::config::Config;
use wserver::server::Server;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wserver=info")),
        )
        .with_thread_names(true)
        .init();

    // Un valor inválido en CLI/env termina aquí mismo con el mensaje de clap
    let config = Config::new();
    config.print_summary();

    let server = match Server::bind(config) {
        Ok(server) => server,
        Err(e) => {
            error!(error = %e, "No se pudo iniciar el servidor");
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        error!(error = %e, "Error fatal");
        std::process::exit(1);
    }
}
