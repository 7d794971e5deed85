//! # Acceptor
//! src/server/acceptor.rs
//!
//! Único productor del planificador. Acepta conexiones en un loop bloqueante
//! y las deja en el buffer. En modo SFF primero pre-inspecciona el request:
//! lee la request line (byte a byte, sin consumir los headers), resuelve la
//! URI y consulta el tamaño del archivo.

use crate::error::ServerError;
use crate::http::uri;
use crate::http::{RequestLine, ServeContext};
use crate::metrics::DispatchMetrics;
use crate::scheduler::{PendingRequest, SchedPolicy, Scheduler};
use std::io::Read;
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Loop de aceptación de conexiones
pub struct Acceptor {
    listener: TcpListener,
    scheduler: Arc<Scheduler<TcpStream>>,
    ctx: Arc<ServeContext>,
    metrics: DispatchMetrics,
}

impl Acceptor {
    pub fn new(
        listener: TcpListener,
        scheduler: Arc<Scheduler<TcpStream>>,
        ctx: Arc<ServeContext>,
        metrics: DispatchMetrics,
    ) -> Self {
        Self {
            listener,
            scheduler,
            ctx,
            metrics,
        }
    }

    /// Acepta conexiones para siempre.
    ///
    /// Solo retorna si `accept` falla, y ese error es fatal para el servidor.
    pub fn run(self) -> Result<(), ServerError> {
        let policy = self.scheduler.policy();
        info!(policy = %policy, "Acceptor listo");

        loop {
            let (stream, peer) = self.listener.accept().map_err(ServerError::Accept)?;
            self.metrics.record_accepted();
            debug!(peer = %peer, "Nueva conexión");

            let req = prepare(stream, policy, &self.ctx, &self.metrics);

            // Bloquea mientras el buffer esté lleno
            let depth = self.scheduler.enqueue(req);
            self.metrics.record_enqueued(depth);
        }
    }
}

/// Convierte una conexión aceptada en un request listo para encolar.
///
/// Con `FIFO` no toca la conexión. Con `SFF` lee la request line y busca el
/// tamaño del recurso; si la búsqueda falla el tamaño queda desconocido.
/// Si la request line no se puede leer el request se encola igual, sin línea
/// y con tamaño desconocido, y el worker responde 400.
pub fn prepare<C: Read>(
    mut conn: C,
    policy: SchedPolicy,
    ctx: &ServeContext,
    metrics: &DispatchMetrics,
) -> PendingRequest<C> {
    if !policy.needs_size_hint() {
        return PendingRequest::new(conn);
    }

    let line = match RequestLine::read_from(&mut conn) {
        Ok(line) => line,
        Err(e) => {
            warn!(error = %e, "No se pudo leer la request line");
            metrics.record_preinspect_failure();
            return PendingRequest::new(conn);
        }
    };

    let size_hint = uri::target_size(line.target(), ctx.root());
    match size_hint {
        Some(size) => debug!(uri = line.target(), size, "Tamaño resuelto"),
        None => {
            metrics.record_preinspect_failure();
            debug!(uri = line.target(), "Tamaño desconocido");
        }
    }

    PendingRequest::with_line(conn, line, size_hint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;

    fn conn(raw: &str) -> Cursor<Vec<u8>> {
        Cursor::new(raw.as_bytes().to_vec())
    }

    #[test]
    fn test_fifo_does_not_touch_connection() {
        let ctx = ServeContext::new(".");
        let metrics = DispatchMetrics::new();

        let req = prepare(conn("GET /x HTTP/1.0\r\n\r\n"), SchedPolicy::ArrivalOrder, &ctx, &metrics);

        assert!(req.line.is_none());
        assert_eq!(req.size_hint, None);
        assert_eq!(req.conn.position(), 0);
    }

    #[test]
    fn test_sff_resolves_size() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join("big.html"), vec![b'a'; 1234]).unwrap();
        let ctx = ServeContext::new(root.path());
        let metrics = DispatchMetrics::new();

        let req = prepare(
            conn("GET /big.html HTTP/1.0\r\nHost: x\r\n\r\n"),
            SchedPolicy::SmallestFirst,
            &ctx,
            &metrics,
        );

        assert_eq!(req.size_hint, Some(1234));
        assert_eq!(req.line.as_ref().unwrap().target(), "/big.html");
        assert_eq!(metrics.snapshot().preinspect_failures, 0);
    }

    #[test]
    fn test_sff_leaves_headers_unread() {
        let ctx = ServeContext::new(".");
        let metrics = DispatchMetrics::new();
        let raw = "GET /nope HTTP/1.0\r\nHost: x\r\n\r\n";

        let req = prepare(conn(raw), SchedPolicy::SmallestFirst, &ctx, &metrics);

        let consumed = "GET /nope HTTP/1.0\r\n".len() as u64;
        assert_eq!(req.conn.position(), consumed);
    }

    #[test]
    fn test_sff_missing_file_is_unknown() {
        let root = tempfile::tempdir().unwrap();
        let ctx = ServeContext::new(root.path());
        let metrics = DispatchMetrics::new();

        let req = prepare(conn("GET /missing.html HTTP/1.0\r\n\r\n"), SchedPolicy::SmallestFirst, &ctx, &metrics);

        assert_eq!(req.size_hint, None);
        assert!(req.line.is_some());
        assert_eq!(metrics.snapshot().preinspect_failures, 1);
    }

    #[test]
    fn test_sff_empty_connection_is_still_queued() {
        let ctx = ServeContext::new(".");
        let metrics = DispatchMetrics::new();

        let req = prepare(conn(""), SchedPolicy::SmallestFirst, &ctx, &metrics);

        assert!(req.line.is_none());
        assert_eq!(req.size_hint, None);
        assert_eq!(metrics.snapshot().preinspect_failures, 1);
    }

    #[test]
    fn test_sff_garbled_line_is_queued_like_fifo() {
        let ctx = ServeContext::new(".");
        let metrics = DispatchMetrics::new();

        let sff = prepare(conn("GARBAGE\r\n\r\n"), SchedPolicy::SmallestFirst, &ctx, &metrics);
        let fifo = prepare(conn("GARBAGE\r\n\r\n"), SchedPolicy::ArrivalOrder, &ctx, &metrics);

        assert!(sff.line.is_none());
        assert_eq!(sff.sff_key(), None);
        assert!(fifo.line.is_none());
    }
}
