//! # Strata Window Registry Library
//!
//! An in-memory window registry with z-order stacking, a
//! normal/minimized/maximized state machine, snap-zone placement, window
//! grouping, and named layouts persisted through a pluggable key-value
//! store.
//!
//! ## Architecture
//!
//! Strata is built on a small modular core:
//! - `registry`: window table, display-order stack, and state machine
//! - `events`: publish/subscribe notification facade for UI bindings
//! - `zones`: named work-area regions for one-step placement
//! - `layout`: versioned snapshots and the persistence collaborator
//! - `config`: configuration parsing and management
//!
//! ## Usage
//!
//! ```rust,no_run
//! use strata::{StrataConfig, WindowDescriptor, WindowRegistry};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = StrataConfig::default();
//!     let mut registry = WindowRegistry::new(&config);
//!
//!     let window = registry.register_window(WindowDescriptor::new("portfolio"))?;
//!     registry.snap_to_zone(&window.id, "left-half")?;
//!     registry.save_layout("work").await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod events;
pub mod layout;
pub mod registry;
pub mod zones;

// Re-export main types for easy access
pub use config::{StrataConfig, WorkArea};
pub use events::{EventBus, EventKind, RegistryEvent, SubscriptionId};
pub use layout::{FileLayoutStore, LayoutSnapshot, LayoutStore, MemoryLayoutStore};
pub use registry::{
    Position, Rect, RegistryError, Size, Window, WindowDescriptor, WindowPatch, WindowRegistry,
    WindowState,
};
pub use zones::Zone;

// Re-export common error types
pub use anyhow::{Context, Error, Result};

/// Version information for Strata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
