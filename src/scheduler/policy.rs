//! # Política de Planificación
//! src/scheduler/policy.rs
//!
//! Define el orden en que los workers sacan requests del buffer.
//! La política se elige una sola vez al arrancar y no cambia.

use std::fmt;
use std::str::FromStr;

/// Política de planificación del buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedPolicy {
    /// FIFO: se atiende en orden de llegada
    #[default]
    ArrivalOrder,

    /// SFF: se atiende primero el archivo más pequeño del buffer
    SmallestFirst,
}

impl SchedPolicy {
    /// Nombre corto usado en la línea de comandos
    pub fn as_str(&self) -> &'static str {
        match self {
            SchedPolicy::ArrivalOrder => "FIFO",
            SchedPolicy::SmallestFirst => "SFF",
        }
    }

    /// Indica si el acceptor debe pre-inspeccionar la conexión
    /// (leer la request line y el tamaño del recurso) antes de encolar.
    pub fn needs_size_hint(&self) -> bool {
        matches!(self, SchedPolicy::SmallestFirst)
    }
}

impl fmt::Display for SchedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchedPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "FIFO" => Ok(SchedPolicy::ArrivalOrder),
            "SFF" => Ok(SchedPolicy::SmallestFirst),
            _ => Err(format!("Unknown scheduling algorithm: {}", s)),
        }
    }
}
