//! # Núcleo del Planificador (productor/consumidor)
//! src/scheduler/queue.rs
//!
//! Sincroniza al acceptor (productor) con los workers (consumidores) sobre el
//! buffer acotado usando un único mutex y dos variables de condición:
//!
//! - `space_available`: el acceptor espera aquí cuando el buffer está lleno.
//! - `item_available`: los workers esperan aquí cuando el buffer está vacío.
//!
//! Ambas esperas vuelven a verificar la condición al despertar (`while`), por
//! lo que los despertares espurios y las carreras entre varios workers no
//! afectan la corrección. No hay timeouts ni cancelación: quien espera, espera
//! para siempre.

use crate::scheduler::{PendingRequest, RequestRing, SchedPolicy};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use tracing::trace;

/// Planificador compartido entre el acceptor y los workers
///
/// Se comparte con `Arc<Scheduler<C>>`; el lock vive dentro del tipo.
pub struct Scheduler<C> {
    /// Buffer protegido por el único lock del sistema
    ring: Mutex<RequestRing<C>>,

    /// Señal "hay espacio" (la espera el acceptor)
    space_available: Condvar,

    /// Señal "hay un request" (la esperan los workers)
    item_available: Condvar,

    capacity: usize,
    policy: SchedPolicy,
}

impl<C> Scheduler<C> {
    /// Crea un planificador con un buffer vacío de `capacity` slots
    pub fn new(capacity: usize, policy: SchedPolicy) -> Self {
        Self {
            ring: Mutex::new(RequestRing::new(capacity, policy)),
            space_available: Condvar::new(),
            item_available: Condvar::new(),
            capacity,
            policy,
        }
    }

    /// Toma el lock. Un lock envenenado se recupera: el buffer solo se modifica
    /// con código que no entra en pánico, así que su estado sigue siendo válido.
    fn lock(&self) -> MutexGuard<'_, RequestRing<C>> {
        self.ring.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Encola un request, bloqueando mientras el buffer esté lleno.
    ///
    /// Retorna la cantidad de requests en el buffer tras la inserción.
    pub fn enqueue(&self, req: PendingRequest<C>) -> usize {
        let mut ring = self.lock();
        let mut req = req;

        // Buffer lleno: el request vuelve y se espera a que un worker libere espacio
        while let Err(rejected) = ring.try_insert(req) {
            req = rejected;
            trace!(capacity = self.capacity, "buffer lleno, acceptor esperando");
            ring = self
                .space_available
                .wait(ring)
                .unwrap_or_else(PoisonError::into_inner);
        }
        let depth = ring.len();

        self.item_available.notify_one();
        depth
    }

    /// Saca el siguiente request según la política, bloqueando mientras el
    /// buffer esté vacío.
    ///
    /// El lock se libera antes de retornar: el llamador despacha el request
    /// fuera de la sección crítica.
    pub fn dequeue(&self) -> PendingRequest<C> {
        let mut ring = self.lock();

        loop {
            if let Some(req) = ring.remove_next() {
                self.space_available.notify_one();
                return req;
            }

            trace!("buffer vacío, worker esperando");
            ring = self
                .item_available
                .wait(ring)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn policy(&self) -> SchedPolicy {
        self.policy
    }
}

#[cfg(test)]
impl<C> Scheduler<C> {
    /// Intenta encolar sin bloquear. Si el buffer está lleno devuelve el request.
    fn try_enqueue(&self, req: PendingRequest<C>) -> Result<usize, PendingRequest<C>> {
        let mut ring = self.lock();
        ring.try_insert(req)?;
        let depth = ring.len();

        self.item_available.notify_one();
        Ok(depth)
    }

    /// Intenta sacar un request sin bloquear
    fn try_dequeue(&self) -> Option<PendingRequest<C>> {
        let req = self.lock().remove_next()?;
        self.space_available.notify_one();
        Some(req)
    }

    /// Requests actualmente en el buffer
    fn len(&self) -> usize {
        self.lock().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
