//! # Sistema de Métricas
//! src/metrics/mod.rs
//!
//! Recolección de métricas del despacho de conexiones:
//! - Contadores de conexiones aceptadas, encoladas y despachadas
//! - Ocupación máxima del buffer
//! - Espera en el buffer y tiempo de servicio (p50, p95, p99)

pub mod collector;

pub use collector::{DispatchMetrics, LatencySummary, MetricsSnapshot};
