//! # Buffer Circular Acotado
//! src/scheduler/ring.rs
//!
//! Almacena los requests pendientes en un arreglo fijo de `capacity` slots,
//! recorrido como anillo con dos cursores:
//!
//! ```text
//!   head (siguiente a sacar)      tail (siguiente slot libre)
//!    |                             |
//!  [ R3 | R4 | R5 | -- | -- | R1 | R2 ]     count = 5
//! ```
//!
//! Esta estructura NO es thread-safe: el `Scheduler` la protege con su mutex.
//!
//! ## Orden de remoción
//!
//! - **FIFO**: se saca el elemento en `head` y se avanza el cursor. O(1).
//! - **SFF**: se recorren los `count` elementos desde `head` y se elige el de
//!   menor tamaño positivo (en empate gana el más antiguo). Si ninguno tiene
//!   tamaño conocido se saca el de `head`. Luego se compactan los elementos
//!   posteriores un slot hacia atrás, conservando su orden relativo. O(n).

use crate::scheduler::{PendingRequest, SchedPolicy};

/// Buffer circular de capacidad fija
#[derive(Debug)]
pub struct RequestRing<C> {
    /// Slots del anillo (`None` = libre)
    slots: Vec<Option<PendingRequest<C>>>,

    /// Cursor de remoción
    head: usize,

    /// Cursor de inserción
    tail: usize,

    /// Slots ocupados
    count: usize,

    /// Política de remoción, fija durante toda la vida del buffer
    policy: SchedPolicy,
}

impl<C> RequestRing<C> {
    /// Crea un buffer vacío
    ///
    /// # Panics
    ///
    /// Si `capacity` es 0. La configuración se valida antes de llegar aquí.
    pub fn new(capacity: usize, policy: SchedPolicy) -> Self {
        assert!(capacity > 0, "buffer capacity must be positive");
        Self {
            slots: (0..capacity).map(|_| None).collect(),
            head: 0,
            tail: 0,
            count: 0,
            policy,
        }
    }

    /// Inserta al final si hay espacio. Nunca bloquea.
    ///
    /// Si el buffer está lleno devuelve el request al llamador.
    pub fn try_insert(&mut self, req: PendingRequest<C>) -> Result<(), PendingRequest<C>> {
        if self.is_full() {
            return Err(req);
        }

        self.slots[self.tail] = Some(req);
        self.tail = (self.tail + 1) % self.capacity();
        self.count += 1;
        Ok(())
    }

    /// Saca el siguiente request según la política. `None` si está vacío.
    pub fn remove_next(&mut self) -> Option<PendingRequest<C>> {
        if self.is_empty() {
            return None;
        }

        let req = match self.policy {
            SchedPolicy::ArrivalOrder => {
                let req = self.slots[self.head].take();
                self.head = (self.head + 1) % self.capacity();
                req
            }
            SchedPolicy::SmallestFirst => {
                let offset = self.smallest_offset();
                self.extract_at(offset)
            }
        };

        self.count -= 1;
        req
    }

    /// Posición lógica (0 = más antiguo) del request con menor tamaño positivo.
    /// Si ninguno tiene tamaño conocido, el más antiguo.
    fn smallest_offset(&self) -> usize {
        let mut best: Option<(usize, u64)> = None;

        for offset in 0..self.count {
            let size = self.slots[self.physical(offset)]
                .as_ref()
                .and_then(PendingRequest::sff_key);

            if let Some(size) = size {
                // `<` estricto: en empate se queda el primero encontrado
                if best.map_or(true, |(_, min)| size < min) {
                    best = Some((offset, size));
                }
            }
        }

        best.map_or(0, |(offset, _)| offset)
    }

    /// Extrae el elemento en la posición lógica `offset` y compacta el resto.
    /// No toca `count`.
    fn extract_at(&mut self, offset: usize) -> Option<PendingRequest<C>> {
        let at = self.physical(offset);
        let req = self.slots[at].take();

        for i in offset..self.count - 1 {
            let (dst, src) = (self.physical(i), self.physical(i + 1));
            let next = self.slots[src].take();
            self.slots[dst] = next;
        }

        let capacity = self.capacity();
        self.tail = (self.tail + capacity - 1) % capacity;
        req
    }

    /// Índice físico de la posición lógica `offset`
    fn physical(&self, offset: usize) -> usize {
        (self.head + offset) % self.capacity()
    }

    /// Recorre los requests en orden de llegada
    #[cfg(test)]
    fn iter(&self) -> impl Iterator<Item = &PendingRequest<C>> + '_ {
        (0..self.count).filter_map(move |offset| self.slots[self.physical(offset)].as_ref())
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn is_full(&self) -> bool {
        self.count == self.capacity()
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::RequestLine;

    /// Request de prueba etiquetado con un nombre y un tamaño
    fn sized(name: &'static str, size: u64) -> PendingRequest<&'static str> {
        let line = RequestLine::parse(&format!("GET /{} HTTP/1.0", name)).unwrap();
        PendingRequest::with_line(name, line, Some(size))
    }

    fn plain(name: &'static str) -> PendingRequest<&'static str> {
        PendingRequest::new(name)
    }

    fn drain(ring: &mut RequestRing<&'static str>) -> Vec<&'static str> {
        std::iter::from_fn(|| ring.remove_next()).map(|r| r.conn).collect()
    }

    fn names(ring: &RequestRing<&'static str>) -> Vec<&'static str> {
        ring.iter().map(|r| r.conn).collect()
    }

    // ==================== Capacidad ====================

    #[test]
    fn test_inserts_up_to_capacity() {
        let mut ring = RequestRing::new(4, SchedPolicy::ArrivalOrder);
        for name in ["a", "b", "c"] {
            assert!(ring.try_insert(plain(name)).is_ok());
        }
        assert_eq!(ring.len(), 3);
        assert!(!ring.is_full());

        assert!(ring.try_insert(plain("d")).is_ok());
        assert!(ring.is_full());
    }

    #[test]
    fn test_insert_into_full_returns_request() {
        let mut ring = RequestRing::new(1, SchedPolicy::ArrivalOrder);
        ring.try_insert(plain("a")).unwrap();

        let rejected = ring.try_insert(plain("b")).unwrap_err();
        assert_eq!(rejected.conn, "b");
        assert_eq!(ring.len(), 1);
    }

    #[test]
    fn test_remove_from_empty() {
        let mut ring: RequestRing<&'static str> = RequestRing::new(2, SchedPolicy::SmallestFirst);
        assert!(ring.remove_next().is_none());
        assert!(ring.is_empty());
    }

    #[test]
    #[should_panic(expected = "capacity must be positive")]
    fn test_zero_capacity_panics() {
        let _ring: RequestRing<()> = RequestRing::new(0, SchedPolicy::ArrivalOrder);
    }

    // ==================== FIFO ====================

    #[test]
    fn test_fifo_order() {
        let mut ring = RequestRing::new(3, SchedPolicy::ArrivalOrder);
        for name in ["A", "B", "C"] {
            ring.try_insert(plain(name)).unwrap();
        }
        assert_eq!(drain(&mut ring), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_fifo_ignores_sizes() {
        let mut ring = RequestRing::new(3, SchedPolicy::ArrivalOrder);
        ring.try_insert(sized("big", 900)).unwrap();
        ring.try_insert(sized("small", 1)).unwrap();
        assert_eq!(drain(&mut ring), vec!["big", "small"]);
    }

    #[test]
    fn test_fifo_wraps_around() {
        let mut ring = RequestRing::new(3, SchedPolicy::ArrivalOrder);
        let mut out = Vec::new();

        ring.try_insert(plain("1")).unwrap();
        ring.try_insert(plain("2")).unwrap();
        out.push(ring.remove_next().unwrap().conn);
        ring.try_insert(plain("3")).unwrap();
        ring.try_insert(plain("4")).unwrap();
        out.push(ring.remove_next().unwrap().conn);
        ring.try_insert(plain("5")).unwrap();
        out.extend(drain(&mut ring));

        assert_eq!(out, vec!["1", "2", "3", "4", "5"]);
    }

    // ==================== SFF ====================

    #[test]
    fn test_sff_smallest_first() {
        let mut ring = RequestRing::new(2, SchedPolicy::SmallestFirst);
        ring.try_insert(sized("A", 500)).unwrap();
        ring.try_insert(sized("B", 100)).unwrap();
        assert_eq!(drain(&mut ring), vec!["B", "A"]);
    }

    #[test]
    fn test_sff_ties_go_to_oldest() {
        let mut ring = RequestRing::new(4, SchedPolicy::SmallestFirst);
        ring.try_insert(sized("big", 300)).unwrap();
        ring.try_insert(sized("first", 10)).unwrap();
        ring.try_insert(sized("second", 10)).unwrap();
        assert_eq!(drain(&mut ring), vec!["first", "second", "big"]);
    }

    #[test]
    fn test_sff_single_unknown() {
        let mut ring = RequestRing::new(1, SchedPolicy::SmallestFirst);
        ring.try_insert(sized("A", 0)).unwrap();
        assert_eq!(ring.remove_next().unwrap().conn, "A");
        assert!(ring.is_empty());
    }

    #[test]
    fn test_sff_all_unknown_falls_back_to_oldest() {
        let mut ring = RequestRing::new(3, SchedPolicy::SmallestFirst);
        ring.try_insert(plain("x")).unwrap();
        ring.try_insert(sized("y", 0)).unwrap();
        ring.try_insert(plain("z")).unwrap();
        assert_eq!(drain(&mut ring), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_sff_known_size_beats_unknown() {
        let mut ring = RequestRing::new(3, SchedPolicy::SmallestFirst);
        ring.try_insert(plain("unknown")).unwrap();
        ring.try_insert(sized("known", 4096)).unwrap();
        assert_eq!(ring.remove_next().unwrap().conn, "known");
        assert_eq!(ring.remove_next().unwrap().conn, "unknown");
    }

    #[test]
    fn test_sff_compaction_preserves_order() {
        let mut ring = RequestRing::new(5, SchedPolicy::SmallestFirst);
        ring.try_insert(sized("a", 50)).unwrap();
        ring.try_insert(sized("b", 40)).unwrap();
        ring.try_insert(sized("c", 5)).unwrap();
        ring.try_insert(sized("d", 60)).unwrap();
        ring.try_insert(sized("e", 30)).unwrap();

        assert_eq!(ring.remove_next().unwrap().conn, "c");
        assert_eq!(names(&ring), vec!["a", "b", "d", "e"]);
        assert_eq!(ring.len(), 4);

        // El slot liberado queda al final y vuelve a estar disponible
        ring.try_insert(sized("f", 70)).unwrap();
        assert_eq!(names(&ring), vec!["a", "b", "d", "e", "f"]);
        assert!(ring.is_full());
    }

    #[test]
    fn test_sff_extracts_first_and_last_positions() {
        let mut ring = RequestRing::new(4, SchedPolicy::SmallestFirst);
        ring.try_insert(sized("first", 1)).unwrap();
        ring.try_insert(sized("mid", 50)).unwrap();
        ring.try_insert(sized("last", 2)).unwrap();

        // Más antiguo: todo lo demás se corre un slot
        assert_eq!(ring.remove_next().unwrap().conn, "first");
        assert_eq!(names(&ring), vec!["mid", "last"]);

        // Más nuevo: no hay nada que compactar
        assert_eq!(ring.remove_next().unwrap().conn, "last");
        assert_eq!(names(&ring), vec!["mid"]);

        ring.try_insert(sized("x", 70)).unwrap();
        ring.try_insert(sized("y", 60)).unwrap();
        ring.try_insert(sized("z", 80)).unwrap();
        assert!(ring.is_full());
        assert_eq!(drain(&mut ring), vec!["mid", "y", "x", "z"]);
    }

    #[test]
    fn test_sff_reuses_freed_slots() {
        let mut ring = RequestRing::new(4, SchedPolicy::SmallestFirst);

        ring.try_insert(plain("old1")).unwrap();
        ring.try_insert(plain("old2")).unwrap();
        assert_eq!(ring.remove_next().unwrap().conn, "old1");
        assert_eq!(ring.remove_next().unwrap().conn, "old2");
        assert!(ring.is_empty());

        ring.try_insert(sized("p", 80)).unwrap();
        ring.try_insert(sized("q", 70)).unwrap();
        ring.try_insert(sized("r", 10)).unwrap();
        ring.try_insert(sized("s", 90)).unwrap();

        assert_eq!(ring.remove_next().unwrap().conn, "r");
        assert_eq!(names(&ring), vec!["p", "q", "s"]);

        ring.try_insert(sized("t", 20)).unwrap();
        assert_eq!(drain(&mut ring), vec!["t", "q", "p", "s"]);
    }

    #[test]
    fn test_sff_interleaved_never_loses_requests() {
        let mut ring = RequestRing::new(3, SchedPolicy::SmallestFirst);
        let sizes = [("a", 9), ("b", 0), ("c", 3), ("d", 7), ("e", 1), ("f", 0), ("g", 5)];
        let mut out = Vec::new();

        for (name, size) in sizes {
            if ring.is_full() {
                out.push(ring.remove_next().unwrap().conn);
            }
            ring.try_insert(sized(name, size)).unwrap();
        }
        out.extend(drain(&mut ring));

        let mut sorted = out.clone();
        sorted.sort();
        assert_eq!(sorted, vec!["a", "b", "c", "d", "e", "f", "g"]);
    }
}
