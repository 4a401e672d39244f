//! Editor-facing facade over the weft crates.
//!
//! A [`Document`] owns the text of one file together with its
//! [`weft_parse::SyntaxTree`] and the resolver cache, and keeps them in
//! step as edits arrive. Configuration comes from [`WeftConfig`]; the
//! `weft` binary wraps the [`report`] functions.
//!
//! # Debugging
//!
//! - `RUST_LOG=weft_parse=debug`: reparse decisions (reuse, grow, shrink).
//! - `RUST_LOG=weft_parse=trace`: every parsed piece.
//! - `WEFT_LOG_TREE=1`: indent output by span nesting.

use std::path::Path;
use std::sync::Once;

mod config;
mod document;
mod edit;
pub mod report;

pub use config::{ConfigError, WeftConfig, DEFAULT_REPARSE_CHUNK, EAGER_REPARSE_VAR, REPARSE_CHUNK_VAR};
pub use document::Document;
pub use edit::{parse_script, Edit, EditError, ScriptError};

static TRACING_INIT: Once = Once::new();

/// Install the global tracing subscriber once, and only when `RUST_LOG`
/// is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_err() {
            return;
        }
        let filter = EnvFilter::from_default_env();
        let nested = std::env::var_os("WEFT_LOG_TREE").is_some();
        let hierarchical =
            nested.then(|| tracing_tree::HierarchicalLayer::new(2).with_targets(true));
        let flat = (!nested).then(|| {
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_writer(std::io::stderr)
        });
        // Another subscriber may already be installed by an embedding host.
        let _ = tracing_subscriber::registry()
            .with(hierarchical)
            .with(flat)
            .with(filter)
            .try_init();
    });
}

/// Open the file at `path` as a document.
pub fn load_document(path: impl AsRef<Path>, config: WeftConfig) -> std::io::Result<Document> {
    let text = std::fs::read_to_string(path)?;
    Ok(Document::new(text, config))
}
