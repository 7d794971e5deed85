//! # Resolución de URIs
//! src/http/uri.rs
//!
//! Traduce el target de un request a una ruta del sistema de archivos
//! relativa al directorio raíz del servidor.
//!
//! - Contenido **estático**: cualquier target que no contenga `cgi`.
//!   El query string se descarta y un target terminado en `/` sirve `index.html`.
//! - Contenido **dinámico**: targets que contienen `cgi`. Lo que viene después
//!   de `?` se pasa al programa como `QUERY_STRING`.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Archivo servido cuando el target es un directorio
const DEFAULT_FILE: &str = "index.html";

/// Tipo de recurso pedido
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Static,
    Dynamic,
}

/// Target ya resuelto a una ruta local
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUri {
    pub kind: ResourceKind,

    /// Ruta en disco (siempre dentro de la raíz)
    pub path: PathBuf,

    /// Argumentos CGI (vacío para contenido estático)
    pub cgi_args: String,
}

/// Errores de resolución
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UriError {
    /// El target intenta salir de la raíz con `..`
    #[error("Path traversal not allowed: {0}")]
    Traversal(String),
}

/// Resuelve un target contra el directorio raíz
///
/// # Ejemplo
///
/// ```
/// use std::path::Path;
/// use wserver::http::uri::{resolve, ResourceKind};
///
/// let uri = resolve("/docs/", Path::new("/srv")).unwrap();
/// assert_eq!(uri.kind, ResourceKind::Static);
/// assert_eq!(uri.path, Path::new("/srv/docs/index.html"));
/// ```
pub fn resolve(target: &str, root: &Path) -> Result<ResolvedUri, UriError> {
    if target.contains("..") {
        return Err(UriError::Traversal(target.to_string()));
    }

    let (kind, path_part, cgi_args) = if target.contains("cgi") {
        match target.split_once('?') {
            Some((path, args)) => (ResourceKind::Dynamic, path, args.to_string()),
            None => (ResourceKind::Dynamic, target, String::new()),
        }
    } else {
        let path = target.split_once('?').map_or(target, |(path, _)| path);
        (ResourceKind::Static, path, String::new())
    };

    // Sin el '/' inicial: `join` con una ruta absoluta reemplazaría la raíz
    let mut path = root.join(path_part.trim_start_matches('/'));
    if kind == ResourceKind::Static && path_part.ends_with('/') {
        path.push(DEFAULT_FILE);
    }

    Ok(ResolvedUri {
        kind,
        path,
        cgi_args,
    })
}

/// Tamaño en bytes de un archivo regular, `None` si no existe o no es archivo
pub fn resource_size(path: &Path) -> Option<u64> {
    fs::metadata(path)
        .ok()
        .filter(|meta| meta.is_file())
        .map(|meta| meta.len())
}

/// Tamaño del recurso al que apunta un target, para la política SFF
///
/// Cualquier fallo (target inválido, archivo inexistente) da `None`.
pub fn target_size(target: &str, root: &Path) -> Option<u64> {
    let uri = resolve(target, root).ok()?;
    resource_size(&uri.path)
}

/// Content-Type según la extensión del archivo
pub fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("html") | Some("htm") => "text/html",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        Some("json") => "application/json",
        Some("gif") => "image/gif",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        _ => "text/plain",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    #[test]
    fn test_resolve_static() {
        let uri = resolve("/a/b.html", Path::new("/root")).unwrap();
        assert_eq!(uri.kind, ResourceKind::Static);
        assert_eq!(uri.path, PathBuf::from("/root/a/b.html"));
        assert!(uri.cgi_args.is_empty());
    }

    #[test]
    fn test_resolve_static_directory() {
        let uri = resolve("/", Path::new("/root")).unwrap();
        assert_eq!(uri.path, PathBuf::from("/root/index.html"));
    }

    #[test]
    fn test_resolve_static_drops_query() {
        let uri = resolve("/page.html?x=1", Path::new("/root")).unwrap();
        assert_eq!(uri.path, PathBuf::from("/root/page.html"));
        assert!(uri.cgi_args.is_empty());
    }

    #[test]
    fn test_resolve_dynamic_with_args() {
        let uri = resolve("/spin.cgi?5", Path::new("/root")).unwrap();
        assert_eq!(uri.kind, ResourceKind::Dynamic);
        assert_eq!(uri.path, PathBuf::from("/root/spin.cgi"));
        assert_eq!(uri.cgi_args, "5");
    }

    #[test]
    fn test_resolve_dynamic_without_args() {
        let uri = resolve("/cgi-bin/env", Path::new("/root")).unwrap();
        assert_eq!(uri.kind, ResourceKind::Dynamic);
        assert_eq!(uri.path, PathBuf::from("/root/cgi-bin/env"));
        assert_eq!(uri.cgi_args, "");
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let result = resolve("/../etc/passwd", Path::new("/root"));
        assert!(matches!(result, Err(UriError::Traversal(_))));
    }

    #[test]
    fn test_resource_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("five.txt");
        File::create(&path).unwrap().write_all(b"12345").unwrap();

        assert_eq!(resource_size(&path), Some(5));
        assert_eq!(resource_size(&dir.path().join("missing")), None);
        // Un directorio no es un recurso servible
        assert_eq!(resource_size(dir.path()), None);
    }

    #[test]
    fn test_target_size() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("index.html"))
            .unwrap()
            .write_all(b"<html></html>")
            .unwrap();

        assert_eq!(target_size("/", dir.path()), Some(13));
        assert_eq!(target_size("/nope.html", dir.path()), None);
        assert_eq!(target_size("/../index.html", dir.path()), None);
    }

    #[test]
    fn test_content_type() {
        assert_eq!(content_type(Path::new("a.html")), "text/html");
        assert_eq!(content_type(Path::new("a.JPG")), "image/jpeg");
        assert_eq!(content_type(Path::new("a.png")), "image/png");
        assert_eq!(content_type(Path::new("README")), "text/plain");
    }
}
