//! # Libris
//!
//! Libris is a file-backed library catalog: books, members (students and
//! faculty with different borrowing limits), and an issue/return ledger,
//! persisted as three JSON documents between runs. It is a library with a
//! CLI client, not a CLI with incidental library code.
//!
//! ## Layering
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │  CLI layer (main.rs, args.rs, shell.rs)                    │
//! │  - Menus, prompts, terminal output                         │
//! │  - The ONLY place that knows about stdin/stdout/exit codes │
//! └────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌────────────────────────────────────────────────────────────┐
//! │  API layer (api.rs)                                        │
//! │  - LibraryApi<S: LibraryStore> facade                      │
//! │  - Flushes the store after every successful mutation       │
//! └────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌────────────────────────────────────────────────────────────┐
//! │  Command layer (commands/*.rs)                             │
//! │  - Invariant-checked catalog operations, no I/O            │
//! └────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌────────────────────────────────────────────────────────────┐
//! │  Domain + storage (model.rs, library.rs, store/)           │
//! │  - Validated entities, the in-memory catalog,              │
//! │    FileStore (production) / InMemoryStore (tests)          │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! From `api.rs` inward nothing prints, reads stdin, or exits: commands
//! take plain arguments and return `Result<CmdResult>`, which is what
//! makes the business rules testable without a terminal.
//!
//! ## Module overview
//!
//! - [`api`]: the facade every UI goes through
//! - [`commands`]: one module per catalog operation
//! - [`library`]: the in-memory catalog and member-id allocator
//! - [`model`]: `Book`, `Member`, and the persisted snapshot
//! - [`store`]: persistence trait and backends
//! - [`config`]: data-directory configuration
//! - [`error`]: error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod library;
pub mod model;
pub mod store;
