//! # Planificador de Conexiones
//! src/scheduler/mod.rs
//!
//! Buffer acotado compartido entre un acceptor (productor) y N workers
//! (consumidores), con dos políticas de despacho:
//!
//! - `FIFO` (`ArrivalOrder`): orden de llegada.
//! - `SFF` (`SmallestFirst`): primero el archivo más pequeño del buffer.
//!
//! Este módulo nunca toca sockets ni archivos: solo decide qué conexión se
//! atiende y cuándo.

pub mod policy;
pub mod queue;
pub mod request;
pub mod ring;

pub use policy::SchedPolicy;
pub use queue::Scheduler;
pub use request::PendingRequest;
pub use ring::RequestRing;
