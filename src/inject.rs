//! Per-response sprite definition injection
//!
//! The injector wraps a request/response cycle as an explicit pipeline:
//! decide from the request start whether the response is a candidate,
//! buffer candidate HTML bodies chunk by chunk, and on the final chunk
//! splice a hidden `<svg>` block holding exactly the symbols the request
//! rendered, immediately after the opening `<body>` tag. Everything else
//! passes through untouched.
//!
//! The pipeline is deliberately framework-free: it consumes
//! [`http::response::Parts`] and ordered [`Bytes`] chunks with a
//! last-chunk flag, which any server stack can feed it.

use std::path::Path;
use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use http::Method;
use tracing::{debug, info, warn};

use crate::icon::UsedIcons;
use crate::registry::{RegistryError, SpriteRegistry};

/// Request-gating configuration
#[derive(Debug, Clone)]
pub struct InjectorConfig {
    /// Requests under this path prefix are never processed
    pub static_prefix: String,
    /// Path extensions that identify asset responses to skip
    pub skip_extensions: Vec<String>,
}

impl Default for InjectorConfig {
    fn default() -> Self {
        Self {
            static_prefix: "/static".to_string(),
            skip_extensions: [
                "css", "js", "mjs", "map", "json", "png", "jpg", "jpeg", "gif", "webp",
                "ico", "svg", "woff", "woff2", "ttf", "otf",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

/// Response interceptor that injects used-icon definitions into HTML
#[derive(Debug)]
pub struct SpriteInjector {
    registry: Arc<SpriteRegistry>,
    config: InjectorConfig,
}

impl SpriteInjector {
    /// Wrap an already-loaded registry with default gating
    pub fn new(registry: Arc<SpriteRegistry>) -> Self {
        Self::with_config(registry, InjectorConfig::default())
    }

    /// Wrap an already-loaded registry with custom gating
    pub fn with_config(registry: Arc<SpriteRegistry>, config: InjectorConfig) -> Self {
        Self { registry, config }
    }

    /// Load the sprite document eagerly and build an injector
    ///
    /// Startup hook: a missing or corrupt sprite document fails here,
    /// before the first request is served.
    pub fn from_sprite_file(path: &Path) -> Result<Self, RegistryError> {
        let registry = SpriteRegistry::load(path)?;
        info!("sprite injector ready with {} symbols", registry.len());
        Ok(Self::new(Arc::new(registry)))
    }

    /// The registry backing this injector
    pub fn registry(&self) -> &SpriteRegistry {
        &self.registry
    }

    /// Start intercepting one response, deciding candidacy from the
    /// request method and path
    pub fn begin(&self, method: &Method, path: &str) -> ResponseRewriter<'_> {
        let state = if self.is_candidate(method, path) {
            State::AwaitingHeaders
        } else {
            State::Passthrough
        };
        ResponseRewriter {
            injector: self,
            state,
        }
    }

    /// Definitions block for the given used-icon set
    ///
    /// Empty when no icon was used. Ids absent from the registry are
    /// skipped; the rest are concatenated inside one hidden `<svg>`.
    pub fn sprite_defs(&self, used: &UsedIcons) -> String {
        if used.is_empty() {
            return String::new();
        }
        let symbols: Vec<&str> = used.iter().filter_map(|id| self.registry.resolve(id)).collect();
        if symbols.is_empty() {
            return String::new();
        }
        format!("<svg style=\"display:none\">{}</svg>", symbols.join("\n"))
    }

    fn is_candidate(&self, method: &Method, path: &str) -> bool {
        if method != Method::GET {
            return false;
        }
        if path.starts_with(&self.config.static_prefix) {
            return false;
        }
        if let Some(ext) = Path::new(path).extension().and_then(|e| e.to_str()) {
            let ext = ext.to_ascii_lowercase();
            if self.config.skip_extensions.iter().any(|skip| *skip == ext) {
                return false;
            }
        }
        true
    }

    fn splice(&self, body: Bytes, used: &UsedIcons) -> Bytes {
        if used.is_empty() {
            return body;
        }
        let text = match std::str::from_utf8(&body) {
            Ok(text) => text,
            Err(_) => {
                warn!("response declared text/html but body is not UTF-8; forwarding unmodified");
                return body;
            }
        };
        let Some(tag_start) = text.find("<body") else {
            return body;
        };
        let Some(tag_len) = text[tag_start..].find('>') else {
            return body;
        };
        let defs = self.sprite_defs(used);
        if defs.is_empty() {
            return body;
        }

        let insert_at = tag_start + tag_len + 1;
        debug!("injecting {} icon definitions", used.len());
        let mut out = String::with_capacity(text.len() + defs.len());
        out.push_str(&text[..insert_at]);
        out.push_str(&defs);
        out.push_str(&text[insert_at..]);
        Bytes::from(out)
    }
}

/// Per-response rewrite pipeline
///
/// Dropping a rewriter mid-stream (client disconnect) releases any
/// buffered body immediately.
#[derive(Debug)]
pub struct ResponseRewriter<'a> {
    injector: &'a SpriteInjector,
    state: State,
}

#[derive(Debug)]
enum State {
    /// Forward everything untouched
    Passthrough,
    /// Candidate request; the content-type decides at response start
    AwaitingHeaders,
    /// Accumulating body chunks of an HTML response
    Buffering(BytesMut),
    /// Final chunk emitted
    Flushed,
}

impl ResponseRewriter<'_> {
    /// Apply the response-start decision and header rewrite
    ///
    /// Buffering begins only when the content-type starts with
    /// `text/html`; in that case `content-length` is removed (the body
    /// length may change) and all other headers are left as they are.
    pub fn start(&mut self, parts: &mut http::response::Parts) {
        if !matches!(self.state, State::AwaitingHeaders) {
            return;
        }
        let html = parts
            .headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("text/html"));
        if !html {
            self.state = State::Passthrough;
            return;
        }
        parts.headers.remove(CONTENT_LENGTH);
        self.state = State::Buffering(BytesMut::new());
    }

    /// Feed one body chunk; `more` is false on the final chunk
    ///
    /// Passthrough responses come back immediately. Buffered responses
    /// return nothing until the final chunk, which yields the complete
    /// body with the definitions block spliced in.
    pub fn push_chunk(&mut self, chunk: Bytes, more: bool, used: &UsedIcons) -> Option<Bytes> {
        match &mut self.state {
            State::Buffering(buffer) => {
                buffer.extend_from_slice(&chunk);
                if more {
                    return None;
                }
                let body = std::mem::take(buffer).freeze();
                self.state = State::Flushed;
                Some(self.injector.splice(body, used))
            }
            State::Passthrough | State::AwaitingHeaders | State::Flushed => Some(chunk),
        }
    }

    /// True when body chunks are being accumulated
    pub fn is_buffering(&self) -> bool {
        matches!(self.state, State::Buffering(_))
    }
}
