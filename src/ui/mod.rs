//! Presentation layer for the photo list.
//!
//! The store's state is projected into a [`PhotoListViewModel`], which the
//! renderer turns into plain text for the terminal.
//!
//! ```text
//! AppState → PhotoListViewModel::from_state → render → text
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: Display-ready projection of the state
//! - [`renderer`]: Text rendering of the view model
//!
//! # Example
//!
//! ```rust
//! use locationstream::ui::{render, PhotoListViewModel};
//! use locationstream::AppState;
//!
//! let viewmodel = PhotoListViewModel::from_state(&AppState::default());
//! assert!(render(&viewmodel).contains("No photos yet"));
//! ```

pub mod renderer;
pub mod viewmodel;

pub use renderer::render;
pub use viewmodel::{EmptyState, PhotoListViewModel, PhotoRow, TrackingControls};
