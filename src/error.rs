//! # Errores del Servidor
//! src/error.rs
//!
//! Solo los errores fatales llegan hasta `main`: configuración inválida,
//! no poder hacer bind o un fallo de `accept`. Los errores de cada conexión
//! se resuelven dentro de los handlers.

use std::io;
use thiserror::Error;

/// Configuración inválida (se detecta antes de lanzar cualquier thread)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Number of threads must be positive")]
    InvalidThreads,

    #[error("Number of buffers must be positive")]
    InvalidBuffers,

    #[error("Root directory does not exist: {0}")]
    InvalidRoot(String),
}

/// Errores fatales del servidor
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Could not bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("Accept failed: {0}")]
    Accept(#[source] io::Error),

    #[error("Could not spawn thread: {0}")]
    Spawn(#[source] io::Error),
}
