use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::entity_map::FilledEntityMap;
use crate::core::serializer::EntityDisplayValues;
use crate::schema::action::{ActionType, PayloadSource};
use crate::schema::filled_entity::FilledEntity;

/// Request body for a scoring round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreInput {
    pub filled_entities: Vec<FilledEntity>,
    #[serde(default = "empty_context")]
    pub context: Value,
    #[serde(default)]
    pub masked_actions: Vec<String>,
}

fn empty_context() -> Value {
    Value::Object(Default::default())
}

impl ScoreInput {
    /// Display text per entity id, for rendering the scored actions.
    /// Entities without an id or without any text are left out.
    pub fn display_values(&self) -> EntityDisplayValues {
        FilledEntityMap::builder()
            .with_filled_entities(self.filled_entities.iter().cloned())
            .build()
            .display_values()
    }
}

/// Fields shared by scored and unscored actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredBase {
    pub action_id: String,
    pub payload: String,
    pub is_terminal: bool,
    pub action_type: ActionType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredAction {
    #[serde(flatten)]
    pub base: ScoredBase,
    pub score: f64,
}

/// An action the scorer did not consider, with the reason why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnscoredAction {
    #[serde(flatten)]
    pub base: ScoredBase,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub wall_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResponse {
    pub scored_actions: Vec<ScoredAction>,
    #[serde(default)]
    pub unscored_actions: Vec<UnscoredAction>,
    #[serde(default)]
    pub metrics: Metrics,
}

impl ScoreResponse {
    /// The highest-scoring action; the first one wins a tie.
    pub fn best_action(&self) -> Option<&ScoredAction> {
        self.scored_actions
            .iter()
            .fold(None, |best: Option<&ScoredAction>, candidate| match best {
                Some(b) if b.score >= candidate.score => Some(b),
                _ => Some(candidate),
            })
    }
}

impl PayloadSource for ScoredBase {
    fn action_type(&self) -> ActionType {
        self.action_type
    }

    fn payload(&self) -> &str {
        &self.payload
    }
}

impl PayloadSource for ScoredAction {
    fn action_type(&self) -> ActionType {
        self.base.action_type
    }

    fn payload(&self) -> &str {
        &self.base.payload
    }
}

impl PayloadSource for UnscoredAction {
    fn action_type(&self) -> ActionType {
        self.base.action_type
    }

    fn payload(&self) -> &str {
        &self.base.payload
    }
}
