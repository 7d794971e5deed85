//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración del servidor con soporte para argumentos CLI y variables de
//! entorno. Se lee y valida una sola vez al arrancar.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./wserver -d ./www -p 10000 -t 8 -b 16 -s SFF
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! WSERVER_PORT=8080 WSERVER_SCHEDALG=FIFO ./wserver
//! ```

use crate::error::ConfigError;
use crate::scheduler::SchedPolicy;
use clap::Parser;
use std::path::Path;

/// Configuración del servidor
#[derive(Debug, Clone, Parser)]
#[command(name = "wserver")]
#[command(about = "Servidor web concurrente con buffer acotado y planificación FIFO/SFF")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Directorio raíz desde el que se sirven los archivos
    #[arg(short = 'd', long = "root", default_value = ".", env = "WSERVER_ROOT")]
    pub root_dir: String,

    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "10000", env = "WSERVER_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "0.0.0.0", env = "WSERVER_HOST")]
    pub host: String,

    // === Planificación ===
    /// Número de workers
    #[arg(short = 't', long = "threads", default_value = "1", env = "WSERVER_THREADS")]
    pub threads: usize,

    /// Capacidad del buffer de conexiones pendientes
    #[arg(short = 'b', long = "buffers", default_value = "1", env = "WSERVER_BUFFERS")]
    pub buffers: usize,

    /// Política de planificación: FIFO o SFF
    #[arg(short = 's', long = "schedalg", default_value = "FIFO", env = "WSERVER_SCHEDALG")]
    pub policy: SchedPolicy,

    // === Observabilidad ===
    /// Cada cuántos segundos se registran las métricas (0 = nunca)
    #[arg(long = "stats-interval", default_value = "0", env = "WSERVER_STATS_INTERVAL")]
    pub stats_interval_secs: u64,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use wserver::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "0.0.0.0:10000");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Valida la configuración
    ///
    /// Se llama antes de crear el buffer o lanzar cualquier thread.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.threads == 0 {
            return Err(ConfigError::InvalidThreads);
        }
        if self.buffers == 0 {
            return Err(ConfigError::InvalidBuffers);
        }
        if !Path::new(&self.root_dir).is_dir() {
            return Err(ConfigError::InvalidRoot(self.root_dir.clone()));
        }

        Ok(())
    }

    /// Imprime un resumen de la configuración
    pub fn print_summary(&self) {
        println!("╔══════════════════════════════════════════════════════════════╗");
        println!("║                  wserver Configuration                       ║");
        println!("╚══════════════════════════════════════════════════════════════╝");
        println!();
        println!("🌐 Network:");
        println!("   Address:      {}", self.address());
        println!("   Root dir:     {}", self.root_dir);
        println!();
        println!("👷 Scheduler:");
        println!("   Workers:      {}", self.threads);
        println!("   Buffers:      {}", self.buffers);
        println!("   Policy:       {}", self.policy);
        println!();

        if self.stats_interval_secs > 0 {
            println!("📊 Stats every {} s", self.stats_interval_secs);
        } else {
            println!("📊 Stats:        disabled");
        }

        println!();
        println!("═══════════════════════════════════════════════════════════════");
        println!();
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            root_dir: ".".to_string(),
            port: 10000,
            host: "0.0.0.0".to_string(),
            threads: 1,
            buffers: 1,
            policy: SchedPolicy::ArrivalOrder,
            stats_interval_secs: 0,
        }
    }
}
