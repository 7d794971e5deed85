//! # Pool de Workers
//! src/server/worker.rs
//!
//! N threads consumidores. Cada uno repite para siempre:
//!
//! 1. `dequeue` (bloquea si el buffer está vacío)
//! 2. despachar el request al handler de la política activa
//! 3. soltar la conexión (se cierra al hacer drop)
//!
//! El despacho ocurre sin el lock del planificador.

use crate::error::ServerError;
use crate::http::{handle_request, handle_request_sff, reject_request, RequestLine, ServeContext};
use crate::metrics::DispatchMetrics;
use crate::scheduler::{PendingRequest, SchedPolicy, Scheduler};
use std::io::{Read, Write};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;
use tracing::{debug, error, info};

/// Handler a usar según la política, elegido una sola vez al arrancar
pub enum Dispatcher<C> {
    /// El handler lee la request line por su cuenta
    ArrivalOrder(fn(&mut C, &ServeContext)),

    /// El handler recibe la request line que leyó el acceptor
    SmallestFirst(fn(&mut C, &RequestLine, &ServeContext)),
}

// Los derives pedirían `C: Clone`; un fn pointer siempre es Copy
impl<C> Clone for Dispatcher<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for Dispatcher<C> {}

impl<C: Read + Write> Dispatcher<C> {
    /// Dispatcher con los handlers HTTP de `crate::http::handler`
    pub fn for_policy(policy: SchedPolicy) -> Self {
        match policy {
            SchedPolicy::ArrivalOrder => Dispatcher::ArrivalOrder(handle_request::<C>),
            SchedPolicy::SmallestFirst => Dispatcher::SmallestFirst(handle_request_sff::<C>),
        }
    }
}

impl<C: Write> Dispatcher<C> {
    /// Atiende un request con el handler que corresponde.
    ///
    /// En modo SFF un request sin línea es uno cuya request line el acceptor
    /// no pudo leer: se responde 400.
    pub fn dispatch(&self, req: &mut PendingRequest<C>, ctx: &ServeContext) {
        match self {
            Dispatcher::ArrivalOrder(handler) => handler(&mut req.conn, ctx),
            Dispatcher::SmallestFirst(handler) => match &req.line {
                Some(line) => handler(&mut req.conn, line, ctx),
                None => reject_request(&mut req.conn, "Malformed request line"),
            },
        }
    }
}

/// Lanza `count` workers llamados `worker-<i>`
pub fn spawn_workers<C: Write + Send + 'static>(
    count: usize,
    scheduler: Arc<Scheduler<C>>,
    dispatcher: Dispatcher<C>,
    ctx: Arc<ServeContext>,
    metrics: DispatchMetrics,
) -> Result<Vec<JoinHandle<()>>, ServerError> {
    let mut handles = Vec::with_capacity(count);

    for i in 0..count {
        let scheduler = Arc::clone(&scheduler);
        let ctx = Arc::clone(&ctx);
        let metrics = metrics.clone();

        let handle = thread::Builder::new()
            .name(format!("worker-{}", i))
            .spawn(move || worker_loop(&scheduler, dispatcher, &ctx, &metrics))
            .map_err(ServerError::Spawn)?;

        handles.push(handle);
    }

    Ok(handles)
}

/// Loop principal del worker
fn worker_loop<C: Write>(
    scheduler: &Scheduler<C>,
    dispatcher: Dispatcher<C>,
    ctx: &ServeContext,
    metrics: &DispatchMetrics,
) {
    let name = thread::current().name().unwrap_or("worker").to_string();
    info!(worker = %name, "Worker iniciado");

    loop {
        let mut req = scheduler.dequeue();

        let waited = req.waited();
        metrics.record_dispatch_start(waited);
        debug!(
            worker = %name,
            size = ?req.size_hint,
            waited_us = waited.as_micros() as u64,
            "Request tomado del buffer"
        );

        let start = Instant::now();
        let result = panic::catch_unwind(AssertUnwindSafe(|| dispatcher.dispatch(&mut req, ctx)));
        let panicked = result.is_err();
        if panicked {
            error!(worker = %name, "El handler entró en pánico");
        }

        metrics.record_dispatch_end(start.elapsed(), panicked);

        // Cierra la conexión
        drop(req);
    }
}
