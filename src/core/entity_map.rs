//! Entity value store. Resolved entities keyed by name, built once per render.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::core::serializer::EntityDisplayValues;
use crate::core::substitute;
use crate::schema::filled_entity::FilledEntity;

#[derive(Debug, Error)]
pub enum EntityMapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Read-only mapping from entity name to its filled values.
///
/// There are no mutating methods; build a new map with
/// [`FilledEntityMap::builder`] for every render request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilledEntityMap {
    map: FxHashMap<String, FilledEntity>,
}

impl FilledEntityMap {
    pub fn builder() -> FilledEntityMapBuilder {
        FilledEntityMapBuilder::default()
    }

    /// Load a map from a RON file of `{ "name": (entityId: ..., values: [...]) }`.
    pub fn load_from_ron(path: &Path) -> Result<FilledEntityMap, EntityMapError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse a map from a RON string.
    pub fn parse_ron(input: &str) -> Result<FilledEntityMap, EntityMapError> {
        let map: FxHashMap<String, FilledEntity> = ron::from_str(input)?;
        Ok(FilledEntityMap { map })
    }

    pub fn get(&self, name: &str) -> Option<&FilledEntity> {
        self.map.get(name)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }

    /// All values of `name` joined as prose, or `None` if the name is unknown.
    pub fn value_as_string(&self, name: &str) -> Option<String> {
        self.map.get(name).map(FilledEntity::value_as_string)
    }

    /// The raw user texts of `name`; values without user text are skipped.
    pub fn value_as_list(&self, name: &str) -> Vec<String> {
        self.map
            .get(name)
            .map(|entity| {
                entity
                    .values
                    .iter()
                    .filter_map(|value| value.user_text.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Key → display text for every entity that renders to non-empty text.
    /// This is the lookup table the rich-text serializer consumes.
    pub fn display_values(&self) -> EntityDisplayValues {
        self.map
            .iter()
            .filter_map(|(name, entity)| {
                let text = entity.value_as_string();
                (!text.is_empty()).then(|| (name.clone(), text))
            })
            .collect()
    }

    /// Like [`display_values`](Self::display_values) but keyed by each
    /// entity's id, which is how rich-text mentions refer to entities.
    pub fn display_values_by_id(&self) -> EntityDisplayValues {
        self.map
            .values()
            .filter_map(|entity| {
                let id = entity.entity_id.clone()?;
                let text = entity.value_as_string();
                (!text.is_empty()).then(|| (id, text))
            })
            .collect()
    }

    /// Resolve `$name` placeholders and `[...]` contingent phrases in `text`.
    pub fn substitute(&self, text: &str) -> String {
        substitute::substitute(text, self)
    }
}

impl FromIterator<(String, FilledEntity)> for FilledEntityMap {
    fn from_iter<T: IntoIterator<Item = (String, FilledEntity)>>(iter: T) -> Self {
        FilledEntityMap {
            map: iter.into_iter().collect(),
        }
    }
}

/// Builder for a `FilledEntityMap`. Later entries replace earlier ones
/// with the same name.
#[derive(Debug, Default)]
pub struct FilledEntityMapBuilder {
    map: FxHashMap<String, FilledEntity>,
}

impl FilledEntityMapBuilder {
    pub fn entity(mut self, name: impl Into<String>, entity: FilledEntity) -> Self {
        self.map.insert(name.into(), entity);
        self
    }

    /// Shorthand for an entity filled with plain user texts and no id.
    pub fn texts<I, S>(self, name: impl Into<String>, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entity(name, FilledEntity::from_texts(None, texts))
    }

    /// Add entities keyed by their `entity_id`; entities without an id are skipped.
    pub fn with_filled_entities<I>(mut self, entities: I) -> Self
    where
        I: IntoIterator<Item = FilledEntity>,
    {
        for entity in entities {
            if let Some(id) = entity.entity_id.clone() {
                self.map.insert(id, entity);
            }
        }
        self
    }

    pub fn build(self) -> FilledEntityMap {
        FilledEntityMap { map: self.map }
    }
}
