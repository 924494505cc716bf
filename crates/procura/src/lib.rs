//! Procurement recommendation engine.
//!
//! Given a project's bill of materials and the universe of vendor quotes, the
//! engine normalizes prices into a reference currency, checks attribute
//! compliance between specifications and offered products, and evaluates a
//! closed set of vendor-selection strategies to recommend which vendors should
//! fulfill each line, together with cost, risk, and savings analysis. All
//! computation is a pure pass over in-memory data supplied through narrow
//! repository traits; the only persisted side effect is a project's current
//! strategy record.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
