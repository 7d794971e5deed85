//! # Módulo HTTP
//!
//! Todo lo que el planificador trata como colaborador externo:
//!
//! - Lectura byte a byte de la request line y los headers
//! - Resolución de URIs a rutas del sistema de archivos
//! - Construcción de responses HTTP/1.0
//! - Los dos handlers de despacho (FIFO y SFF), que sirven archivos estáticos
//!   y ejecutan programas CGI
//!
//! ### Formato de Request
//!
//! ```text
//! GET /path?query=value HTTP/1.0\r\n
//! Header-Name: Header-Value\r\n
//! \r\n
//! ```

pub mod handler;
pub mod request;
pub mod response;
pub mod status;
pub mod uri;

// Re-exportamos los tipos principales para facilitar su uso
pub use handler::{handle_request, handle_request_sff, reject_request, ServeContext};
pub use request::{Method, ParseError, RequestLine};
pub use response::Response;
pub use status::StatusCode;
