//! Text rendering: entity store, placeholder tokenizer, substitution engine
//! and rich-text serializer.

pub mod entity_map;
pub mod serializer;
pub mod substitute;
pub mod tokenizer;
