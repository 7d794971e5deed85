//! # Handlers de Despacho
//! src/http/handler.rs
//!
//! Los dos puntos de entrada que usan los workers para atender una conexión:
//!
//! - `handle_request`: modo FIFO. Lee la request line, los headers y sirve.
//! - `handle_request_sff`: modo SFF. La request line ya la leyó el acceptor,
//!   así que solo lee los headers y sirve.
//!
//! Ningún error sale de aquí: se responde al cliente cuando se puede y se
//! registra en el log. Cerrar la conexión es trabajo del worker.

use crate::http::request::{read_headers, Method, RequestLine};
use crate::http::response::SERVER_NAME;
use crate::http::uri::{self, ResolvedUri, ResourceKind};
use crate::http::{Response, StatusCode};
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// Datos de solo lectura que necesitan los handlers
#[derive(Debug, Clone)]
pub struct ServeContext {
    /// Directorio raíz desde el que se sirven archivos
    root: PathBuf,
}

impl ServeContext {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Handler de modo FIFO: atiende la conexión completa
pub fn handle_request<C: Read + Write>(conn: &mut C, ctx: &ServeContext) {
    let line = match RequestLine::read_from(conn) {
        Ok(line) => line,
        Err(e) => {
            debug!(error = %e, "request line inválida");
            reject_request(conn, &e.to_string());
            return;
        }
    };

    handle_request_sff(conn, &line, ctx);
}

/// Responde 400 a una conexión cuya request line no se pudo leer
pub fn reject_request<C: Write>(conn: &mut C, cause: &str) {
    // El cliente puede haber cerrado ya; no hay nada más que hacer
    let _ = reply_error(conn, StatusCode::BadRequest, "Bad request", cause);
}

/// Handler de modo SFF: la request line ya fue consumida del socket
pub fn handle_request_sff<C: Read + Write>(conn: &mut C, line: &RequestLine, ctx: &ServeContext) {
    match serve(conn, line, ctx) {
        Ok(status) => debug!(
            method = line.method().as_str(),
            uri = line.target(),
            status = status.as_u16(),
            "request atendido"
        ),
        Err(e) => warn!(
            method = line.method().as_str(),
            uri = line.target(),
            error = %e,
            "error atendiendo request"
        ),
    }
}

/// Sirve un request y retorna el código enviado
fn serve<C: Read + Write>(conn: &mut C, line: &RequestLine, ctx: &ServeContext) -> io::Result<StatusCode> {
    read_headers(conn)?;

    if line.method() != &Method::GET {
        return reply_error(
            conn,
            StatusCode::NotImplemented,
            "Method not implemented",
            line.method().as_str(),
        );
    }

    let resolved = match uri::resolve(line.target(), ctx.root()) {
        Ok(resolved) => resolved,
        Err(e) => return reply_error(conn, StatusCode::Forbidden, "Forbidden", &e.to_string()),
    };

    let meta = match fs::metadata(&resolved.path) {
        Ok(meta) => meta,
        Err(_) => return reply_error(conn, StatusCode::NotFound, "Not found", line.target()),
    };

    match resolved.kind {
        ResourceKind::Static => serve_static(conn, &resolved, &meta, line.target()),
        ResourceKind::Dynamic => serve_dynamic(conn, &resolved, &meta, line.target()),
    }
}

/// Envía un archivo: cabecera y luego el contenido copiado directo al socket
fn serve_static<C: Write>(
    conn: &mut C,
    resolved: &ResolvedUri,
    meta: &fs::Metadata,
    target: &str,
) -> io::Result<StatusCode> {
    if !meta.is_file() {
        return reply_error(conn, StatusCode::Forbidden, "Could not read this file", target);
    }

    let mut file = match File::open(&resolved.path) {
        Ok(file) => file,
        Err(_) => return reply_error(conn, StatusCode::Forbidden, "Could not read this file", target),
    };

    let head = Response::file(uri::content_type(&resolved.path), meta.len());
    conn.write_all(&head.head_bytes())?;
    io::copy(&mut file, conn)?;
    conn.flush()?;

    Ok(StatusCode::Ok)
}

/// Ejecuta un programa CGI y reenvía su salida al cliente.
///
/// Se envía la status line y `Server`; el programa escribe el resto de los
/// headers, la línea vacía y el cuerpo.
fn serve_dynamic<C: Write>(
    conn: &mut C,
    resolved: &ResolvedUri,
    meta: &fs::Metadata,
    target: &str,
) -> io::Result<StatusCode> {
    if !meta.is_file() || !is_executable(meta) {
        return reply_error(conn, StatusCode::Forbidden, "Could not run this CGI program", target);
    }

    let mut child = match Command::new(&resolved.path)
        .env("QUERY_STRING", &resolved.cgi_args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            return reply_error(
                conn,
                StatusCode::InternalServerError,
                "Could not start CGI program",
                &e.to_string(),
            )
        }
    };

    let preamble = format!("HTTP/1.0 {}\r\nServer: {}\r\n", StatusCode::Ok, SERVER_NAME);
    let relayed = conn.write_all(preamble.as_bytes()).and_then(|_| match child.stdout.as_mut() {
        Some(stdout) => io::copy(stdout, conn).map(|_| ()),
        None => Ok(()),
    });

    // Siempre se recoge al hijo, aunque el cliente se haya ido
    let status = child.wait()?;
    relayed?;
    conn.flush()?;

    if !status.success() {
        debug!(uri = target, ?status, "programa CGI terminó con error");
    }
    Ok(StatusCode::Ok)
}

/// Responde con un error JSON y retorna el código enviado
fn reply_error<C: Write>(
    conn: &mut C,
    status: StatusCode,
    message: &str,
    cause: &str,
) -> io::Result<StatusCode> {
    let response = Response::error(status, message, cause);
    conn.write_all(&response.to_bytes())?;
    conn.flush()?;
    Ok(status)
}

#[cfg(unix)]
fn is_executable(meta: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_meta: &fs::Metadata) -> bool {
    true
}
