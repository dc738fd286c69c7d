//! WASM bindings for dialog-models, used by the authoring UI to preview
//! actions in the browser.
//!
//! Structured values cross the boundary as JSON strings.

use std::collections::HashMap;
use wasm_bindgen::prelude::*;

use dialog_models::core::entity_map::FilledEntityMap;
use dialog_models::core::serializer::{EntityDisplayValues, SerializerOptions};
use dialog_models::schema::action::{
    is_stub_payload, render_arguments as render_each, Action, PayloadSource,
};
use dialog_models::schema::filled_entity::FilledEntity;

// ---------------------------------------------------------------------------
// JSON helpers
// ---------------------------------------------------------------------------
fn parse_action(action_json: &str) -> Result<Action, JsError> {
    serde_json::from_str(action_json).map_err(|e| JsError::new(&format!("Invalid action JSON: {e}")))
}

fn parse_values(values_json: &str) -> Result<EntityDisplayValues, JsError> {
    serde_json::from_str(values_json)
        .map_err(|e| JsError::new(&format!("Invalid entity values JSON: {e}")))
}

fn parse_options(options_json: Option<String>) -> Result<SerializerOptions, JsError> {
    match options_json {
        Some(json) => serde_json::from_str(&json)
            .map_err(|e| JsError::new(&format!("Invalid serializer options JSON: {e}"))),
        None => Ok(SerializerOptions::default()),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsError> {
    serde_json::to_string(value).map_err(|e| JsError::new(&format!("Serialization error: {e}")))
}

// ---------------------------------------------------------------------------
// Exports
// ---------------------------------------------------------------------------

/// Substitute `$name` placeholders and `[...]` phrases in a legacy template.
///
/// `entities_json` maps entity names to filled entities:
/// ```json
/// { "size": { "entityId": "e1", "values": [{ "userText": "large" }] } }
/// ```
#[wasm_bindgen]
pub fn substitute(text: &str, entities_json: &str) -> Result<String, JsError> {
    let map: FilledEntityMap = serde_json::from_str::<HashMap<String, FilledEntity>>(entities_json)
        .map_err(|e| JsError::new(&format!("Invalid entities JSON: {e}")))?
        .into_iter()
        .collect();
    Ok(map.substitute(text))
}

/// Display text of an action. `values_json` maps entity id to display text.
#[wasm_bindgen(js_name = payloadText)]
pub fn payload_text(action_json: &str, values_json: &str) -> Result<String, JsError> {
    let action = parse_action(action_json)?;
    let values = parse_values(values_json)?;
    action
        .payload_text(&values)
        .map_err(|e| JsError::new(&e.to_string()))
}

/// Render every argument of an action. Returns a JSON array of
/// `{ "parameter": ..., "value": string | null }` in evaluation order.
#[wasm_bindgen(js_name = renderArguments)]
pub fn render_arguments(
    action_json: &str,
    values_json: &str,
    options_json: Option<String>,
) -> Result<String, JsError> {
    let action = parse_action(action_json)?;
    let values = parse_values(values_json)?;
    let options = parse_options(options_json)?;
    let arguments = action
        .action_arguments()
        .map_err(|e| JsError::new(&e.to_string()))?;
    to_json(&render_each(&arguments, &values, options))
}

/// True if the action is the placeholder API action. Accepts a partial
/// action; only `payload` is read. Never throws.
#[wasm_bindgen(js_name = isStubbedAction)]
pub fn is_stubbed_action(action_json: Option<String>) -> bool {
    #[derive(serde::Deserialize)]
    struct PartialAction {
        payload: Option<String>,
    }

    action_json
        .and_then(|json| serde_json::from_str::<PartialAction>(&json).ok())
        .and_then(|action| action.payload)
        .is_some_and(|payload| is_stub_payload(&payload))
}

/// A fresh placeholder API action as JSON.
#[wasm_bindgen(js_name = stubAction)]
pub fn stub_action() -> Result<String, JsError> {
    to_json(&Action::stub())
}
