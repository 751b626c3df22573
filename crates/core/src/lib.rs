//! Core library for subdash
//!
//! This crate implements the **Functional Core** of the subdash dashboard: the
//! in-memory tabular engine that turns a raw list of newsletter subscribers
//! into the exact rows and columns on screen.
//!
//! # Architecture Overview
//!
//! - **`subdash_core`** (this crate): Pure transformation functions with zero I/O
//! - **`subdash`**: HTTP fetching, terminal rendering and orchestration (the Imperative Shell)
//!
//! Data flows one way per render:
//!
//! ```text
//! raw records -> filter -> sort -> paginate -> project visible columns -> rows
//! ```
//!
//! # Module Organization
//!
//! - [`model`]: Subscriber records, API response shape and aggregate stats
//! - [`field`]: Tagged field accessors used for sorting
//! - [`filter`]: Status and source/channel predicates
//! - [`sort`]: Stable single-key ordering with direction toggling
//! - [`pagination`]: Page windows, navigation and clamping
//! - [`columns`]: Fixed column registry, visibility and cell formatting
//! - [`session`]: Serializable session state with a single action entry point
//!
//! # Example Usage
//!
//! ```rust
//! use subdash_core::filter::StatusFilter;
//! use subdash_core::model::{Subscriber, SubscribersResponse};
//! use subdash_core::session::{Action, DashboardSession, DashboardView};
//!
//! let mut session = DashboardSession::new();
//! let ticket = session.begin_fetch();
//! session.complete_fetch(
//!     ticket,
//!     Ok(SubscribersResponse {
//!         subscribers: vec![
//!             Subscriber::new("1", "a@x.com", "active"),
//!             Subscriber::new("2", "b@x.com", "inactive"),
//!         ],
//!         total_subscribers: 2.0,
//!         percent_clicked_once: 50.0,
//!     }),
//! );
//!
//! session.apply(Action::SetStatusFilter { status: StatusFilter::Active });
//!
//! let DashboardView::Ready(view) = session.view() else { panic!("not loaded") };
//! assert_eq!(view.rows.len(), 1);
//! assert_eq!(view.rows[0].cells[0], "a@x.com");
//! ```

pub mod columns;
pub mod error;
pub mod field;
pub mod filter;
pub mod model;
pub mod pagination;
pub mod session;
pub mod sort;

pub use error::EngineError;
