//! # Módulo del Servidor
//! src/server/mod.rs
//!
//! Las tres piezas con threads del servidor:
//! 1. `acceptor`: un único thread que acepta conexiones y llena el buffer
//! 2. `worker`: N threads que vacían el buffer y atienden cada conexión
//! 3. `tcp`: el `Server` que valida, hace bind y pone todo en marcha

pub mod acceptor;
pub mod tcp;
pub mod worker;

// Re-exportar para facilitar el uso
pub use acceptor::Acceptor;
pub use tcp::Server;
pub use worker::Dispatcher;
