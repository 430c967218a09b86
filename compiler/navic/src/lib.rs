//! Navic - the Navi global scope, node schema validation and CLI commands.
//!
//! # Architecture
//!
//! - `scope`: the process-wide global scope (builtins + prelude)
//! - `schema`: node schemas whose port types are Navi expressions
//! - `diagnostic`: terminal rendering of parse and scope errors
//! - `commands`: handlers behind the `navi` binary

use std::sync::Once;

pub mod commands;
pub mod diagnostic;
pub mod schema;
pub mod scope;

pub use schema::{
    can_connect, validate_catalog, validate_schema, NodeSchema, NodeTypes, PortSchema,
    SchemaCatalog, SchemaDiagnostic, SchemaError,
};
pub use scope::{build_global_scope, global_scope, PreludeError, PRELUDE};

static TRACING_INIT: Once = Once::new();

/// Install a stderr tracing subscriber filtered by `RUST_LOG`.
///
/// Does nothing unless `RUST_LOG` is set; safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}
