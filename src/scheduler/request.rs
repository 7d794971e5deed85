//! # Request Pendiente
//! src/scheduler/request.rs
//!
//! Unidad de trabajo que viaja del acceptor al buffer y del buffer a un worker.
//! Es dueña de la conexión: cuando el worker la suelta, la conexión se cierra.

use crate::http::RequestLine;
use std::time::{Duration, Instant};

/// Conexión aceptada esperando a ser atendida
///
/// `C` es el extremo de la conexión (`TcpStream` en el servidor real).
#[derive(Debug)]
pub struct PendingRequest<C> {
    /// Conexión con el cliente
    pub conn: C,

    /// Request line leída por el acceptor (solo en modo SFF; `None` si no se pudo leer)
    pub line: Option<RequestLine>,

    /// Tamaño en bytes del recurso pedido, `None` si es desconocido
    pub size_hint: Option<u64>,

    /// Momento en que se aceptó la conexión
    pub accepted_at: Instant,
}

impl<C> PendingRequest<C> {
    /// Crea un request sin pre-inspección (modo FIFO)
    pub fn new(conn: C) -> Self {
        Self {
            conn,
            line: None,
            size_hint: None,
            accepted_at: Instant::now(),
        }
    }

    /// Crea un request con la request line y el tamaño ya resueltos (modo SFF)
    pub fn with_line(conn: C, line: RequestLine, size_hint: Option<u64>) -> Self {
        Self {
            conn,
            line: Some(line),
            size_hint,
            accepted_at: Instant::now(),
        }
    }

    /// Tamaño usable para SFF: solo cuentan los tamaños positivos
    pub fn sff_key(&self) -> Option<u64> {
        self.size_hint.filter(|&size| size > 0)
    }

    /// Tiempo transcurrido desde que se aceptó la conexión
    pub fn waited(&self) -> Duration {
        self.accepted_at.elapsed()
    }
}
