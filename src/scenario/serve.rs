//! Static file server for running scenarios against `ui/` without the desktop shell.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::error::{NinError, NinResult, ResultExt};

pub struct StaticServer {
    port: u16,
    shutdown: Arc<Notify>,
    task: JoinHandle<()>,
}

impl StaticServer {
    /// Serve `root` on a random localhost port.
    pub async fn start(root: &Path) -> NinResult<Self> {
        if !root.is_dir() {
            return Err(NinError::ConfigError(format!(
                "serve directory {} does not exist",
                root.display()
            )));
        }

        let app = Router::new()
            .fallback(serve_file)
            .with_state(Arc::new(root.to_path_buf()));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("failed to bind static server")?;
        let port = listener.local_addr()?.port();

        let shutdown = Arc::new(Notify::new());
        let notify = shutdown.clone();
        let task = tokio::spawn(async move {
            let served = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    notify.notified().await;
                })
                .await;
            if let Err(e) = served {
                log::warn!("[E2E] Static server stopped: {}", e);
            }
        });

        log::info!("[E2E] Serving {} on port {}", root.display(), port);
        Ok(Self {
            port,
            shutdown,
            task,
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    pub async fn stop(self) {
        self.shutdown.notify_one();
        let _ = self.task.await;
    }
}

async fn serve_file(State(root): State<Arc<PathBuf>>, uri: Uri) -> Response {
    let Some(path) = resolve(&root, uri.path()) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match tokio::fs::read(&path).await {
        Ok(body) => ([(header::CONTENT_TYPE, content_type(&path))], body).into_response(),
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Map a request path under `root`. Paths leaving `root` resolve to nothing.
fn resolve(root: &Path, request: &str) -> Option<PathBuf> {
    let mut path = root.to_path_buf();
    for component in Path::new(request.trim_start_matches('/')).components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::CurDir => {},
            _ => return None,
        }
    }

    if path.is_dir() {
        path.push("index.html");
    }
    Some(path)
}

fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") => "text/html; charset=utf-8",
        Some("js") => "text/javascript; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
