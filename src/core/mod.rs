//! # Core Module
//!
//! This module provides the shared-ownership containers used throughout the rendering
//! core. It includes thread-safe and single-threaded variants of resource containers
//! and a single-threaded system container.
//!
//! ## Key Components
//! - `MtResource`: Thread-safe reference-counted resource with read-write locking
//! - `StResource`: Single-threaded reference-counted resource with interior mutability
//! - `StSystem`: Single-threaded container for long-lived systems such as the GPU backend
//!
//! ## Usage
//! ```rust
//! use voxel_render_core::core::{MtResource, StResource, StSystem};
//!
//! // Thread-safe resource
//! let counter = MtResource::new(0);
//! *counter.get_mut() += 1;
//! assert_eq!(*counter.get(), 1);
//!
//! // Single-threaded system
//! let system = StSystem::new(Box::new(42u32));
//! assert_eq!(**system.get(), 42);
//!
//! // Single-threaded resource
//! let names = StResource::new(vec!["vertex"]);
//! names.get_mut().push("index");
//! assert_eq!(names.get().len(), 2);
//! ```

pub mod mt_resource;
pub mod st_resource;
pub mod st_system;

// Re-export types for easier access
pub use mt_resource::MtResource;
pub use st_resource::StResource;
pub use st_system::StSystem;
