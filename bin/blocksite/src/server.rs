//! Development server for a built site.
//!
//! Serves the output directory, answers missing paths with the 404 page of
//! the locale in the path, and pushes reload events over SSE.

use std::{
    convert::Infallible,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use axum::{
    Router,
    extract::State,
    handler::HandlerWithoutStateExt,
    http::{StatusCode, Uri},
    response::{
        Html, IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
    routing::get,
};
use tokio::sync::broadcast;
use tokio_stream::{Stream, StreamExt, wrappers::BroadcastStream};
use tower_http::services::ServeDir;

/// Path of the live reload event stream.
pub const LIVERELOAD_PATH: &str = "/__livereload";

/// Name of the not-found page in the output root and in each locale dir.
const NOT_FOUND_FILE: &str = "404.html";

/// What the browser should do after a rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadMessage {
    /// Full page reload.
    Reload,
    /// Re-fetch stylesheets only.
    CssReload,
}

impl ReloadMessage {
    /// Event payload sent to the browser.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reload => "reload",
            Self::CssReload => "css-reload",
        }
    }
}

/// Reload broadcaster shared by the watcher and the SSE handler.
#[derive(Clone)]
pub struct ServerState {
    pub reload_tx: broadcast::Sender<ReloadMessage>,
}

impl ServerState {
    pub fn new() -> Self {
        let (reload_tx, _) = broadcast::channel(16);
        Self { reload_tx }
    }

    /// Send `message` to every connected browser.
    pub fn notify(&self, message: ReloadMessage) {
        // No connected browser is not an error.
        let _ = self.reload_tx.send(message);
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Not-found pages of a built site.
#[derive(Debug, Clone)]
pub struct NotFoundPages {
    output_dir: PathBuf,
    locales: Arc<[String]>,
}

impl NotFoundPages {
    pub fn new(output_dir: impl Into<PathBuf>, locales: &[String]) -> Self {
        Self {
            output_dir: output_dir.into(),
            locales: locales.into(),
        }
    }

    /// `/<locale>/404.html` when the request path starts with a configured
    /// locale, the root `404.html` otherwise.
    pub fn page_for(&self, request_path: &str) -> PathBuf {
        let first = request_path.trim_start_matches('/').split('/').next();
        match first.filter(|segment| self.locales.iter().any(|l| l == segment)) {
            Some(locale) => self.output_dir.join(locale).join(NOT_FOUND_FILE),
            None => self.output_dir.join(NOT_FOUND_FILE),
        }
    }

    async fn respond(&self, request_path: &str) -> Response {
        let localized = self.page_for(request_path);
        let root = self.output_dir.join(NOT_FOUND_FILE);

        for page in [localized, root] {
            if let Ok(body) = tokio::fs::read_to_string(&page).await {
                return (StatusCode::NOT_FOUND, Html(body)).into_response();
            }
        }

        (StatusCode::NOT_FOUND, "Not Found").into_response()
    }
}

/// Router serving `output_dir` with live reload and localized 404 pages.
pub fn create_router(output_dir: &Path, locales: &[String], state: Arc<ServerState>) -> Router {
    let pages = NotFoundPages::new(output_dir, locales);
    let not_found = move |uri: Uri| {
        let pages = pages.clone();
        async move { pages.respond(uri.path()).await }
    };

    Router::new()
        .route(LIVERELOAD_PATH, get(livereload_handler))
        .fallback_service(ServeDir::new(output_dir).not_found_service(not_found.into_service()))
        .with_state(state)
}

async fn livereload_handler(
    State(state): State<Arc<ServerState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = BroadcastStream::new(state.reload_tx.subscribe()).filter_map(|msg| {
        // Lagged receivers skip missed events.
        let message = msg.ok()?;
        Some(Ok::<_, Infallible>(Event::default().data(message.as_str())))
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(30)).text("ping"))
}

/// Script injected before `</body>` of every built page in watch mode.
pub const LIVERELOAD_SCRIPT: &str = r#"
<script>
(function() {
    const source = new EventSource('/__livereload');
    source.onmessage = function(event) {
        if (event.data === 'reload') {
            window.location.reload();
        } else if (event.data === 'css-reload') {
            document.querySelectorAll('link[rel="stylesheet"]').forEach(function(link) {
                link.href = link.href.split('?')[0] + '?v=' + Date.now();
            });
        }
    };
})();
</script>
"#;

#[cfg(test)]
mod tests {
    use std::fs;

    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::{TcpListener, TcpStream},
    };

    use super::*;

    fn locales() -> Vec<String> {
        vec!["fr".to_string(), "en".to_string()]
    }

    async fn get_raw(addr: std::net::SocketAddr, path: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let request = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[test]
    fn test_message_payloads() {
        assert_eq!(ReloadMessage::Reload.as_str(), "reload");
        assert_eq!(ReloadMessage::CssReload.as_str(), "css-reload");
        assert!(LIVERELOAD_SCRIPT.contains(LIVERELOAD_PATH));
    }

    #[test]
    fn test_not_found_page_for() {
        let pages = NotFoundPages::new("/site", &locales());

        assert_eq!(pages.page_for("/fr/missing"), Path::new("/site/fr/404.html"));
        assert_eq!(pages.page_for("/en"), Path::new("/site/en/404.html"));
        assert_eq!(pages.page_for("/de/page"), Path::new("/site/404.html"));
        assert_eq!(pages.page_for("/french"), Path::new("/site/404.html"));
        assert_eq!(pages.page_for("/"), Path::new("/site/404.html"));
    }

    #[tokio::test]
    async fn test_notify_reaches_subscribers() {
        let state = ServerState::new();
        let mut rx = state.reload_tx.subscribe();

        state.notify(ReloadMessage::CssReload);

        assert_eq!(rx.recv().await.unwrap(), ReloadMessage::CssReload);
        ServerState::default().notify(ReloadMessage::Reload);
    }

    #[tokio::test]
    async fn test_router_serves_localized_not_found() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("fr")).unwrap();
        fs::write(dir.path().join("fr/index.html"), "<p>Accueil</p>").unwrap();
        fs::write(dir.path().join("fr/404.html"), "<p>Page introuvable</p>").unwrap();
        fs::write(dir.path().join("404.html"), "<p>Page not found</p>").unwrap();

        let app = create_router(dir.path(), &locales(), Arc::new(ServerState::new()));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await });

        let home = get_raw(addr, "/fr/").await;
        assert!(home.starts_with("HTTP/1.1 200"));
        assert!(home.contains("Accueil"));

        let localized = get_raw(addr, "/fr/nope").await;
        assert!(localized.starts_with("HTTP/1.1 404"));
        assert!(localized.contains("Page introuvable"));

        // No English 404 was built, so the root page answers.
        let fallback = get_raw(addr, "/en/nope").await;
        assert!(fallback.starts_with("HTTP/1.1 404"));
        assert!(fallback.contains("Page not found"));
    }
}
