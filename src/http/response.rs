//! # Construcción de Respuestas HTTP
//!
//! API para armar la cabecera de una respuesta HTTP/1.0 y convertirla a bytes.
//! El cuerpo de los archivos estáticos no pasa por aquí: se copia directo
//! del archivo al socket después de `head_bytes()`.
//!
//! ## Ejemplo de uso
//!
//! ```
//! use wserver::http::{Response, StatusCode};
//!
//! let response = Response::new(StatusCode::Ok)
//!     .with_header("Content-Type", "text/plain")
//!     .with_body("hola");
//!
//! let bytes = response.to_bytes();
//! assert!(bytes.starts_with(b"HTTP/1.0 200 OK\r\n"));
//! ```

use super::StatusCode;
use std::collections::HashMap;

/// Valor del header `Server`
pub const SERVER_NAME: &str = "wserver";

/// Representa una respuesta HTTP/1.0
#[derive(Debug, Clone)]
pub struct Response {
    /// Código de estado HTTP
    status: StatusCode,

    /// Headers HTTP (HashMap para evitar duplicados)
    headers: HashMap<String, String>,

    /// Cuerpo en memoria (vacío cuando el cuerpo se envía aparte)
    body: Vec<u8>,
}

impl Response {
    /// Crea una respuesta con el header `Server` ya puesto
    pub fn new(status: StatusCode) -> Self {
        let mut headers = HashMap::new();
        headers.insert("Server".to_string(), SERVER_NAME.to_string());
        Self {
            status,
            headers,
            body: Vec::new(),
        }
    }

    /// Agrega un header (si ya existe, se sobrescribe)
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }

    /// Establece el cuerpo y su `Content-Length`
    pub fn with_body(mut self, body: &str) -> Self {
        self.body = body.as_bytes().to_vec();
        self.headers
            .insert("Content-Length".to_string(), self.body.len().to_string());
        self
    }

    /// Cabecera para un archivo cuyo cuerpo se enviará aparte
    pub fn file(content_type: &str, length: u64) -> Self {
        Self::new(StatusCode::Ok)
            .with_header("Content-Type", content_type)
            .with_header("Content-Length", &length.to_string())
    }

    /// Respuesta de error con mensaje JSON
    ///
    /// Formato: `{"error": "...", "cause": "..."}`
    pub fn error(status: StatusCode, message: &str, cause: &str) -> Self {
        let body = serde_json::json!({
            "error": message,
            "cause": cause,
        })
        .to_string();

        Self::new(status)
            .with_header("Content-Type", "application/json")
            .with_body(&body)
    }

    /// Status line y headers, terminados en la línea vacía
    pub fn head_bytes(&self) -> Vec<u8> {
        let mut result = format!("HTTP/1.0 {}\r\n", self.status).into_bytes();

        for (name, value) in &self.headers {
            result.extend_from_slice(format!("{}: {}\r\n", name, value).as_bytes());
        }

        result.extend_from_slice(b"\r\n");
        result
    }

    /// Respuesta completa (cabecera + cuerpo en memoria)
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = self.head_bytes();
        result.extend_from_slice(&self.body);
        result
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}
