//! # Collector de Métricas
//! src/metrics/collector.rs
//!
//! Recolecta contadores del acceptor y de los workers en tiempo real.
//! Tiene su propio lock, separado del lock del planificador: se actualiza
//! siempre fuera de la sección crítica del buffer.

use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Máximo de muestras de latencia a guardar (para calcular percentiles)
const MAX_SAMPLES: usize = 10_000;

/// Collector de métricas thread-safe
#[derive(Clone)]
pub struct DispatchMetrics {
    inner: Arc<Mutex<MetricsData>>,
    start_time: Instant,
}

/// Datos internos de métricas
#[derive(Default)]
struct MetricsData {
    /// Conexiones aceptadas
    accepted: u64,

    /// Conexiones que entraron al buffer
    enqueued: u64,

    /// Pre-inspecciones SFF que no pudieron obtener el tamaño
    /// (request line ilegible o recurso inexistente)
    preinspect_failures: u64,

    /// Requests despachados por los workers
    dispatched: u64,

    /// Handlers que entraron en pánico
    handler_panics: u64,

    /// Workers atendiendo un request ahora mismo
    active_workers: u64,

    /// Máxima ocupación del buffer observada
    peak_queue_depth: usize,

    /// Tiempo entre accept y dequeue (microsegundos)
    queue_waits: VecDeque<u64>,

    /// Tiempo dentro del handler (microsegundos)
    service_times: VecDeque<u64>,
}

impl DispatchMetrics {
    /// Crea un nuevo collector de métricas
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MetricsData::default())),
            start_time: Instant::now(),
        }
    }

    fn with_data<T>(&self, f: impl FnOnce(&mut MetricsData) -> T) -> T {
        let mut data = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut data)
    }

    /// Registra una conexión aceptada
    pub fn record_accepted(&self) {
        self.with_data(|data| data.accepted += 1);
    }

    /// Registra una búsqueda de tamaño fallida (el request queda como "desconocido")
    pub fn record_preinspect_failure(&self) {
        self.with_data(|data| data.preinspect_failures += 1);
    }

    /// Registra una inserción en el buffer y la ocupación resultante
    pub fn record_enqueued(&self, depth: usize) {
        self.with_data(|data| {
            data.enqueued += 1;
            data.peak_queue_depth = data.peak_queue_depth.max(depth);
        });
    }

    /// Un worker tomó un request que esperó `waited` desde el accept
    pub fn record_dispatch_start(&self, waited: Duration) {
        self.with_data(|data| {
            data.active_workers += 1;
            push_sample(&mut data.queue_waits, waited);
        });
    }

    /// Un worker terminó de atender un request
    pub fn record_dispatch_end(&self, service: Duration, panicked: bool) {
        self.with_data(|data| {
            data.active_workers = data.active_workers.saturating_sub(1);
            data.dispatched += 1;
            if panicked {
                data.handler_panics += 1;
            }
            push_sample(&mut data.service_times, service);
        });
    }

    /// Obtiene un snapshot de las métricas
    pub fn snapshot(&self) -> MetricsSnapshot {
        let uptime_secs = self.start_time.elapsed().as_secs();

        self.with_data(|data| MetricsSnapshot {
            uptime_secs,
            accepted: data.accepted,
            enqueued: data.enqueued,
            preinspect_failures: data.preinspect_failures,
            dispatched: data.dispatched,
            handler_panics: data.handler_panics,
            active_workers: data.active_workers,
            peak_queue_depth: data.peak_queue_depth,
            queue_wait_us: LatencySummary::from_samples(&data.queue_waits),
            service_us: LatencySummary::from_samples(&data.service_times),
        })
    }

    /// Métricas actuales en formato JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.snapshot())
    }
}

impl Default for DispatchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

fn push_sample(samples: &mut VecDeque<u64>, value: Duration) {
    // Si tenemos demasiadas muestras, eliminar las más antiguas
    if samples.len() >= MAX_SAMPLES {
        samples.pop_front();
    }
    samples.push_back(value.as_micros() as u64);
}

/// Snapshot de métricas (para logs y uso externo)
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub uptime_secs: u64,
    pub accepted: u64,
    pub enqueued: u64,
    pub preinspect_failures: u64,
    pub dispatched: u64,
    pub handler_panics: u64,
    pub active_workers: u64,
    pub peak_queue_depth: usize,
    pub queue_wait_us: LatencySummary,
    pub service_us: LatencySummary,
}

/// Percentiles de una ventana de latencias
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LatencySummary {
    pub p50: u64,
    pub p95: u64,
    pub p99: u64,
    pub avg: u64,
    pub samples: usize,
}

impl LatencySummary {
    fn from_samples(samples: &VecDeque<u64>) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        let mut sorted: Vec<u64> = samples.iter().copied().collect();
        sorted.sort_unstable();

        let len = sorted.len();
        let sum: u64 = sorted.iter().sum();

        Self {
            p50: sorted[len * 50 / 100],
            p95: sorted[len * 95 / 100],
            p99: sorted[len * 99 / 100],
            avg: sum / len as u64,
            samples: len,
        }
    }
}
