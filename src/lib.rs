//! # wserver
//! src/lib.rs
//!
//! Servidor web HTTP/1.0 concurrente con un despachador de conexiones
//! productor/consumidor: un thread acceptor llena un buffer acotado y un pool
//! de workers lo vacía según la política de planificación (FIFO o SFF).
//!
//! ## Arquitectura
//!
//! - `scheduler`: buffer circular, políticas y sincronización (mutex + condvars)
//! - `server`: acceptor, pool de workers y el `Server` que los arma
//! - `http`: parsing de la request line, resolución de URIs y handlers
//! - `config`: configuración por CLI y variables de entorno
//! - `metrics`: contadores y latencias del despacho
//! - `error`: errores fatales del arranque
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use wserver::config::Config;
//! use wserver::server::Server;
//!
//! let config = Config::default();
//! let server = Server::bind(config).expect("Error al iniciar servidor");
//! server.run().expect("Error fatal");
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod metrics;
pub mod scheduler;
pub mod server;
