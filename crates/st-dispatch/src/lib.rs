//! `st-dispatch` — the batch dispatch scheduler.
//!
//! Cross-city shipments end their trunk leg parked at a district hub in
//! `waiting_for_delivery`.  This crate turns those parked shipments back
//! into moving ones: it watches each hub, and once a hub accumulates
//! enough shipments (or one waits too long) it routes a single courier
//! tour over the whole batch, extends every shipment's path with its
//! share of the tour, and re-arms them on the simulation engine as
//! `delivering`.
//!
//! # Concurrency model
//!
//! One [`Dispatcher::run`] task serves the whole process.  It reacts to a
//! periodic hub scan and to hub-arrival notifications pushed by the
//! engine over an mpsc channel.  A per-hub busy set guarantees at most
//! one batch evaluation per hub at a time, held through a short cooldown
//! after each batch.
//!
//! # Crate layout
//!
//! | Module         | Contents                                        |
//! |----------------|-------------------------------------------------|
//! | [`dispatcher`] | `Dispatcher` — scan loop, triggers, tour routing |
//! | [`error`]      | `DispatchError`, `DispatchResult<T>`            |

pub mod dispatcher;
pub mod error;


pub use dispatcher::Dispatcher;
pub use error::{DispatchError, DispatchResult};
