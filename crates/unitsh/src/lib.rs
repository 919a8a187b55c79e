//! # unitsh - compile nested command units into shell functions
//!
//! ## Introduction for developers
//!
//! Read this to understand how `unitsh` works internally.
//!
//! ### Documents
//!
//! A document ([document::Document]) is a YAML file with two sections: `options` and `units`.
//!
//! ```yaml
//! options:
//!   separator: "-"
//!
//! units:
//!   backend:
//!     "@workingDirectory": services/backend
//!     build: cargo build
//!     test: cargo test
//!   check: $(backend.test)
//!   clean:
//! ```
//!
//! `units` is a tree. Each entry is one of
//! - a namespace: a mapping containing more units
//! - a command: a string
//! - a placeholder: `null`
//! - a reference: `$(a.b.c)`, the path to another unit starting at the root
//!
//! Strings like `$(git rev-parse HEAD)` (whitespace or parentheses inside) are ordinary commands.
//!
//! Keys containing `@` are reserved attributes of the enclosing namespace (see [unit]), they are never units.
//!
//! ### Pipeline
//!
//! see [pipeline::Pipeline]
//!
//! The document is processed in place by these stages, in this order:
//!
//! 1. [options::normalize]: validate `separator` (`.`, `-` or `:`, default `.`)
//! 2. [resolve::resolve_references]: replace references by copies of their targets in the raw tree
//! 3. [paths::assign_paths]: inherit working directories, turn commands and placeholders into namespaces
//! 4. [names::assign_names]: join keys into qualified names
//!
//! Given the example above
//!
//! | **unit**          | **qualified name** | **working directory** | **command**   |
//! |-------------------|--------------------|-----------------------|---------------|
//! | `backend`         | `backend`          | `services/backend`    |               |
//! | `backend.build`   | `backend-build`    | `services/backend`    | `cargo build` |
//! | `backend.test`    | `backend-test`     | `services/backend`    | `cargo test`  |
//! | `check`           | `check`            |                       | `cargo test`  |
//! | `clean`           | `clean`            |                       |               |
//!
//! ### Output
//!
//! [emit::functions] yields one [emit::Function] per named unit, [emit::write_functions] renders them as shell
//! functions. Units without a working directory or command have no body and are not written.
pub mod document;
pub mod emit;
pub mod names;
pub mod options;
pub mod paths;
pub mod pipeline;
pub mod resolve;
pub mod unit;
mod visit;

/// Runs the default pipeline and collects the resulting functions
pub fn compile(document: &mut document::Document) -> Result<Vec<emit::Function<'_>>, CompileError> {
    pipeline::Pipeline::default().run(document)?;
    Ok(emit::functions(&document.units).collect())
}

#[derive(thiserror::Error, Debug)]
pub enum CompileError {
    #[error("Invalid value {value} for option `{option}`, expected one of {allowed}")]
    InvalidOption {
        option: &'static str,
        value: String,
        allowed: String,
    },
    #[error("Reference at `{location}` has an empty path")]
    EmptyReferencePath { location: String },
    #[error("Unable to resolve {reference}: no unit `{id}` in {context}")]
    UnresolvedReference {
        reference: String,
        id: String,
        context: String,
    },
}
