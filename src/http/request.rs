//! # Lectura de Requests HTTP/1.0
//! src/http/request.rs
//!
//! Lee y parsea lo mínimo que necesita el servidor de archivos:
//!
//! ```text
//! GET /path?query HTTP/1.0\r\n      <- request line
//! Host: localhost:10000\r\n          <- headers (se leen y se ignoran)
//! \r\n
//! ```
//!
//! La lectura es byte a byte a propósito: en modo SFF el acceptor lee la
//! request line y luego el worker sigue leyendo los headers desde el mismo
//! socket, así que no se puede consumir nada más allá del `\n`.

use std::collections::HashMap;
use std::io::{self, Read};
use thiserror::Error;

/// Largo máximo de una línea (request line o header)
pub const MAX_LINE: usize = 8192;

/// Máximo de headers que se aceptan antes de cortar la lectura
const MAX_HEADERS: usize = 100;

/// Método HTTP de la request line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    GET,
    HEAD,
    POST,

    /// Cualquier otro token; el handler responde 501
    Other(String),
}

impl Method {
    /// Interpreta un token como método. Nunca falla: los desconocidos
    /// se conservan para poder responder 501.
    pub fn from_token(s: &str) -> Self {
        match s {
            "GET" => Method::GET,
            "HEAD" => Method::HEAD,
            "POST" => Method::POST,
            other => Method::Other(other.to_string()),
        }
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::POST => "POST",
            Method::Other(s) => s.as_str(),
        }
    }
}

/// Errores de parsing de la request line
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// El cliente cerró sin mandar nada
    #[error("Empty request")]
    EmptyRequest,

    /// Falta el target (`GET` solo)
    #[error("Invalid request line: {0:?}")]
    InvalidRequestLine(String),
}

/// Request line ya parseada: `METHOD TARGET [VERSION]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    method: Method,
    target: String,
    version: String,
}

impl RequestLine {
    /// Parsea una request line
    ///
    /// Solo se exigen método y target; si falta la versión se asume HTTP/1.0.
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use wserver::http::{Method, RequestLine};
    ///
    /// let line = RequestLine::parse("GET /index.html HTTP/1.0\r\n").unwrap();
    /// assert_eq!(line.method(), &Method::GET);
    /// assert_eq!(line.target(), "/index.html");
    /// ```
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let mut parts = line.split_whitespace();

        let method = parts.next().ok_or(ParseError::EmptyRequest)?;
        let target = parts
            .next()
            .ok_or_else(|| ParseError::InvalidRequestLine(line.trim_end().to_string()))?;
        let version = parts.next().unwrap_or("HTTP/1.0");

        Ok(Self {
            method: Method::from_token(method),
            target: target.to_string(),
            version: version.to_string(),
        })
    }

    /// Lee la request line directamente del socket y la parsea
    pub fn read_from<R: Read>(reader: &mut R) -> io::Result<Self> {
        let line = read_line(reader)?;
        Self::parse(&line).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Target tal como vino en la request (`/path?query`)
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

/// Lee una línea terminada en `\n` byte a byte.
///
/// Retorna la línea incluyendo el terminador (si llegó). Una línea vacía
/// significa EOF. Corta en `MAX_LINE` bytes.
pub fn read_line<R: Read>(reader: &mut R) -> io::Result<String> {
    let mut line = Vec::with_capacity(128);
    let mut byte = [0u8; 1];

    while line.len() < MAX_LINE {
        match reader.read(&mut byte) {
            Ok(0) => break,
            Ok(_) => {
                line.push(byte[0]);
                if byte[0] == b'\n' {
                    break;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    Ok(String::from_utf8_lossy(&line).into_owned())
}

/// Lee los headers hasta la línea vacía.
///
/// Las líneas sin `:` se ignoran; este servidor no usa los headers para nada,
/// solo los consume para dejar el socket limpio antes de responder.
pub fn read_headers<R: Read>(reader: &mut R) -> io::Result<HashMap<String, String>> {
    let mut headers = HashMap::new();

    for _ in 0..MAX_HEADERS {
        let line = read_line(reader)?;
        // La línea vacía (o EOF) marca el fin de los headers
        if line.trim().is_empty() {
            break;
        }

        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_string(), value.trim().to_string());
        }
    }

    Ok(headers)
}
