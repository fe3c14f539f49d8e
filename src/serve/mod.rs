//! Development server with a Publish button.
//!
//! Serves the site root over HTTP, injects the publish widget into HTML
//! pages and runs the commit-and-push sequence on `POST /publish`.

mod inject;
mod mime;
mod path;
mod publish;
mod response;

pub use inject::{inject_widget, render_widget};
pub use path::{resolve_path, url_path};
pub use publish::{
    commit_message, PublishOutcome, Publisher, NO_CHANGES_MESSAGE, PUBLISHED_MESSAGE,
};

use anyhow::{anyhow, Context, Result};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tiny_http::{Method, Request, Server};

use crate::config::ServeConfig;

/// Control endpoint that triggers a publish.
pub const PUBLISH_PATH: &str = "/publish";

/// What a request is routed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/` or `*.html`: page with the widget injected
    Page,
    /// Any other GET or HEAD path
    Static,
    Publish,
    NotFound,
    NotImplemented,
}

/// Route a request by method and URL. Query strings are ignored.
///
/// HEAD routes like GET; tiny_http drops the body but keeps the headers.
pub fn route(method: &Method, url: &str) -> Route {
    let path = url_path(url);
    let is_page = path == "/" || path.ends_with(".html");
    match method {
        Method::Get | Method::Head if is_page => Route::Page,
        Method::Get | Method::Head => Route::Static,
        Method::Post if path == PUBLISH_PATH => Route::Publish,
        Method::Post => Route::NotFound,
        _ => Route::NotImplemented,
    }
}

/// State shared by all request workers.
pub struct ServerContext {
    root: PathBuf,
    widget: String,
    publisher: Publisher,
}

impl ServerContext {
    pub fn new(root: PathBuf, widget: String, publisher: Publisher) -> Self {
        Self {
            root,
            widget,
            publisher,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Unblocks the accept loop of a running [`DevServer`].
#[derive(Clone)]
pub struct ShutdownHandle {
    server: Arc<Server>,
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        self.server.unblock();
    }
}

/// Bound server ready to accept requests.
pub struct DevServer {
    server: Arc<Server>,
    addr: SocketAddr,
    workers: usize,
    context: Arc<ServerContext>,
}

impl DevServer {
    /// Bind to `config.interface:config.port` (port 0 picks a free port).
    pub fn bind(config: &ServeConfig, context: ServerContext) -> Result<Self> {
        let requested = SocketAddr::new(config.interface, config.port);
        let server = Server::http(requested)
            .map_err(|e| anyhow!("Failed to bind {requested}: {e}"))?;
        let addr = server.server_addr().to_ip().unwrap_or(requested);

        log::info!("Serving {} on http://{}", context.root.display(), addr);

        Ok(Self {
            server: Arc::new(server),
            addr,
            workers: config.workers.max(1),
            context: Arc::new(context),
        })
    }

    /// Get the bound address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            server: Arc::clone(&self.server),
        }
    }

    /// Accept requests until shut down, handling them on a bounded pool.
    pub fn run(self) -> Result<()> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|i| format!("beacon-http-{i}"))
            .build()
            .context("Failed to create request worker pool")?;

        for request in self.server.incoming_requests() {
            let context = Arc::clone(&self.context);
            pool.spawn(move || {
                if let Err(e) = handle_request(request, &context) {
                    log::warn!("Request error: {e:#}");
                }
            });
        }

        log::info!("Server stopped");
        Ok(())
    }
}

/// Handle a single HTTP request.
pub fn handle_request(request: Request, context: &ServerContext) -> Result<()> {
    let method = request.method().clone();
    let url = request.url().to_string();
    log::debug!("{method} {url}");

    match route(&method, &url) {
        Route::Page => match resolve_path(&url, &context.root) {
            Some(path) => match fs::read_to_string(&path) {
                Ok(content) => response::respond_page(request, &content, &context.widget),
                Err(e) => {
                    let err = anyhow::Error::new(e)
                        .context(format!("Failed to read {}", path.display()));
                    log::warn!("{err:#}");
                    response::respond_server_error(request, &err)
                }
            },
            None => response::respond_not_found(request),
        },
        Route::Static => match resolve_path(&url, &context.root) {
            Some(path) => match fs::read(&path) {
                Ok(body) => response::respond_file(request, &path, body),
                Err(e) => {
                    let err = anyhow::Error::new(e)
                        .context(format!("Failed to read {}", path.display()));
                    response::respond_server_error(request, &err)
                }
            },
            None => response::respond_not_found(request),
        },
        Route::Publish => {
            let outcome = context.publisher.publish();
            response::respond_json(request, &outcome)
        }
        Route::NotFound => response::respond_not_found(request),
        Route::NotImplemented => response::respond_not_implemented(request),
    }
}
