//! `st-store` — persistence and order-subsystem boundary.
//!
//! The traits here are implemented by storage backends; the engine crates
//! (`st-sim`, `st-dispatch`) depend on the abstractions, never on a
//! concrete backend.  The in-memory backend is the reference
//! implementation — persistence *technology* is outside this engine's
//! scope, so anything that satisfies [`ShipmentStore`]'s single-document
//! atomicity contract can be dropped in.
//!
//! # Crate layout
//!
//! | Module     | Contents                                            |
//! |------------|-----------------------------------------------------|
//! | [`store`]  | `ShipmentStore` trait, `ShipmentPatch`              |
//! | [`orders`] | `OrderService` trait, `NoopOrders`                  |
//! | [`memory`] | `MemoryStore` — `RwLock<HashMap>` backend           |
//! | [`error`]  | `StoreError`, `StoreResult<T>`                      |

pub mod error;
pub mod memory;
pub mod orders;
pub mod store;


pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use orders::{NoopOrders, OrderService};
pub use store::{ShipmentPatch, ShipmentStore};
