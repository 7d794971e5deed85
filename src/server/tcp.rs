//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Arma las piezas del servidor: valida la configuración, hace bind, crea el
//! planificador compartido, lanza el pool de workers y corre el acceptor en
//! el thread que llama a `run`.

use crate::config::Config;
use crate::error::ServerError;
use crate::http::ServeContext;
use crate::metrics::DispatchMetrics;
use crate::scheduler::Scheduler;
use crate::server::acceptor::Acceptor;
use crate::server::worker::{self, Dispatcher};
use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{info, warn};

/// Servidor HTTP/1.0 con buffer acotado y pool de workers
pub struct Server {
    config: Config,
    listener: TcpListener,
    scheduler: Arc<Scheduler<TcpStream>>,
    ctx: Arc<ServeContext>,
    metrics: DispatchMetrics,
}

impl Server {
    /// Valida la configuración y hace bind del socket.
    ///
    /// No lanza ningún thread: si algo falla aquí el proceso termina limpio.
    pub fn bind(config: Config) -> Result<Self, ServerError> {
        config.validate()?;

        let address = config.address();
        let listener = TcpListener::bind(&address).map_err(|source| ServerError::Bind {
            addr: address.clone(),
            source,
        })?;
        info!(address = %address, "Servidor escuchando");

        Ok(Self {
            scheduler: Arc::new(Scheduler::new(config.buffers, config.policy)),
            ctx: Arc::new(ServeContext::new(config.root_dir.clone())),
            metrics: DispatchMetrics::new(),
            listener,
            config,
        })
    }

    /// Dirección real del socket (útil con puerto 0)
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Handle a las métricas del servidor
    pub fn metrics(&self) -> DispatchMetrics {
        self.metrics.clone()
    }

    /// Lanza los workers y corre el acceptor.
    ///
    /// Solo retorna con un error fatal.
    pub fn run(self) -> Result<(), ServerError> {
        let dispatcher = Dispatcher::for_policy(self.config.policy);
        let workers = worker::spawn_workers(
            self.config.threads,
            Arc::clone(&self.scheduler),
            dispatcher,
            Arc::clone(&self.ctx),
            self.metrics.clone(),
        )?;
        info!(
            workers = workers.len(),
            buffers = self.scheduler.capacity(),
            policy = %self.config.policy,
            "Pool de workers listo"
        );

        if self.config.stats_interval_secs > 0 {
            spawn_reporter(
                self.metrics.clone(),
                Duration::from_secs(self.config.stats_interval_secs),
            )?;
        }

        Acceptor::new(self.listener, self.scheduler, self.ctx, self.metrics).run()
    }
}

/// Thread que registra un snapshot de métricas cada `every`
fn spawn_reporter(metrics: DispatchMetrics, every: Duration) -> Result<JoinHandle<()>, ServerError> {
    thread::Builder::new()
        .name("stats".to_string())
        .spawn(move || loop {
            thread::sleep(every);
            match metrics.to_json() {
                Ok(json) => info!(metrics = %json, "Métricas"),
                Err(e) => warn!(error = %e, "No se pudieron serializar las métricas"),
            }
        })
        .map_err(ServerError::Spawn)
}
