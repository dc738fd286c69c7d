//! Dialog models: the action payload model and entity substitution engine
//! shared by a dialog trainer and its runtime scorer.
//!
//! Templates reference entities with `$name` placeholders and wrap
//! contingent phrases in `[...]`. Actions carry a JSON payload whose shape
//! depends on the action type; it is parsed once into a typed payload.

pub mod core;
pub mod schema;
