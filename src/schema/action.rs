//! Actions and their type-specific payloads.
//!
//! An action stores its payload as an opaque JSON string. The shape of that
//! JSON depends on the action type; [`ActionPayload::parse`] validates it
//! once and the typed views below are built from the parsed payload.

use chrono::{SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;
use tracing::debug;

use crate::core::serializer::{serialize, EntityDisplayValues, SerializeError, SerializerOptions};

/// Fixed id tooling assigns to the placeholder API action.
pub const CL_STUB_IMPORT_ACTION_ID: &str = "51cd7df5-e504-451d-b629-0932e604689c";

/// API name carried by the placeholder API action.
pub const STUB_API_NAME: &str = "STUB_API";

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("failed to parse {action_type} action payload{hint}: {source}", hint = legacy_hint(.action_type))]
    PayloadParse {
        action_type: ActionType,
        source: serde_json::Error,
    },
    #[error("you attempted to create {expected} action from action of type: {actual}")]
    VariantMismatch {
        expected: ActionType,
        actual: ActionType,
    },
    #[error("render error: {0}")]
    Render(#[from] SerializeError),
}

fn legacy_hint(action_type: &ActionType) -> &'static str {
    match action_type {
        ActionType::Text | ActionType::EndSession => {
            ". This might be an old action which was saved as a string. Please create a new action"
        }
        _ => "",
    }
}

/// The closed set of action kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    Text,
    ApiLocal,
    Card,
    EndSession,
    SetEntity,
}

impl ActionType {
    /// Wire name, e.g. "API_LOCAL".
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::ApiLocal => "API_LOCAL",
            Self::Card => "CARD",
            Self::EndSession => "END_SESSION",
            Self::SetEntity => "SET_ENTITY",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConditionType {
    Equal,
}

/// An entity/value equality test gating an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub entity_id: String,
    pub value_id: String,
    pub condition: ConditionType,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionClientData {
    /// Hashes used to match imported utterances to this action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_hashes: Option<Vec<String>>,
}

/// An authored action as stored by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub action_id: Option<String>,
    pub action_type: ActionType,
    pub created_date_time: String,
    pub payload: String,
    pub is_terminal: bool,
    #[serde(default)]
    pub required_entities_from_payload: Vec<String>,
    #[serde(default)]
    pub required_entities: Vec<String>,
    #[serde(default)]
    pub negative_entities: Vec<String>,
    #[serde(default)]
    pub required_conditions: Vec<Condition>,
    #[serde(default)]
    pub negative_conditions: Vec<Condition>,
    #[serde(default)]
    pub suggested_entity: Option<String>,
    pub version: u64,
    pub package_creation_id: u64,
    pub package_deletion_id: u64,
    #[serde(default)]
    pub entity_id: Option<String>,
    #[serde(default)]
    pub enum_value_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_data: Option<ActionClientData>,
}

impl Action {
    /// The placeholder API action inserted by import tooling.
    pub fn stub() -> Action {
        let payload = serde_json::json!({
            "payload": STUB_API_NAME,
            "logicArguments": [],
            "renderArguments": [],
        });

        Action {
            action_id: None,
            action_type: ActionType::ApiLocal,
            created_date_time: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            payload: payload.to_string(),
            is_terminal: false,
            required_entities_from_payload: Vec::new(),
            required_entities: Vec::new(),
            negative_entities: Vec::new(),
            required_conditions: Vec::new(),
            negative_conditions: Vec::new(),
            suggested_entity: None,
            version: 0,
            package_creation_id: 0,
            package_deletion_id: 0,
            entity_id: None,
            enum_value_id: None,
            client_data: None,
        }
    }
}

/// Anything that carries an action type and a raw payload: stored actions
/// and the scorer's scored/unscored records.
pub trait PayloadSource {
    fn action_type(&self) -> ActionType;
    fn payload(&self) -> &str;

    fn parse_payload(&self) -> Result<ActionPayload, ActionError> {
        ActionPayload::parse(self.action_type(), self.payload())
    }

    /// The text shown for this action.
    ///
    /// TEXT and END_SESSION render their document with `values`. CARD and
    /// API_LOCAL return the template or API name without substitution.
    /// Any other type returns the raw payload.
    fn payload_text(&self, values: &EntityDisplayValues) -> Result<String, ActionError> {
        if self.action_type() == ActionType::SetEntity {
            return Ok(self.payload().to_string());
        }

        let text = match self.parse_payload()? {
            ActionPayload::Text(p) | ActionPayload::EndSession(p) => {
                serialize(&p.json, values, SerializerOptions::default())?
            }
            ActionPayload::Card(CardPayload { payload, .. })
            | ActionPayload::ApiLocal(ApiPayload { payload, .. }) => payload,
            ActionPayload::SetEntity(_) => self.payload().to_string(),
        };
        Ok(text)
    }

    /// Template arguments: CARD arguments, or API_LOCAL logic arguments
    /// followed by render arguments. Empty for every other type.
    fn action_arguments(&self) -> Result<Vec<ActionArgument>, ActionError> {
        match self.action_type() {
            ActionType::Card | ActionType::ApiLocal => Ok(self.parse_payload()?.arguments()),
            _ => Ok(Vec::new()),
        }
    }
}

impl PayloadSource for Action {
    fn action_type(&self) -> ActionType {
        self.action_type
    }

    fn payload(&self) -> &str {
        &self.payload
    }
}

/// True if `action` is the placeholder API action. Never fails: a missing
/// action or an unparsable payload is simply not a stub.
pub fn is_stubbed_action<A: PayloadSource + ?Sized>(action: Option<&A>) -> bool {
    action.is_some_and(|a| is_stub_payload(a.payload()))
}

/// True if `payload` is JSON whose `payload` field is the stub API name.
pub fn is_stub_payload(payload: &str) -> bool {
    serde_json::from_str::<Value>(payload)
        .is_ok_and(|json| json.get("payload").and_then(Value::as_str) == Some(STUB_API_NAME))
}

// Payload shapes, one per action type.

/// TEXT / END_SESSION payload: a rich-text document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPayload {
    pub json: Value,
}

/// A template parameter as stored inside a payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentPayload {
    pub parameter: String,
    pub value: TextPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardPayload {
    /// Card template name.
    pub payload: String,
    pub arguments: Vec<ArgumentPayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPayload {
    /// Callback name.
    pub payload: String,
    #[serde(default)]
    pub logic_arguments: Vec<ArgumentPayload>,
    #[serde(default)]
    pub render_arguments: Vec<ArgumentPayload>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetEntityPayload {
    pub entity_id: String,
    pub enum_value_id: String,
}

/// A payload validated against its action type.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionPayload {
    Text(TextPayload),
    ApiLocal(ApiPayload),
    Card(CardPayload),
    EndSession(TextPayload),
    SetEntity(SetEntityPayload),
}

fn parse_as<T: DeserializeOwned>(action_type: ActionType, payload: &str) -> Result<T, ActionError> {
    serde_json::from_str(payload).map_err(|source| ActionError::PayloadParse {
        action_type,
        source,
    })
}

impl ActionPayload {
    pub fn parse(action_type: ActionType, payload: &str) -> Result<ActionPayload, ActionError> {
        Ok(match action_type {
            ActionType::Text => Self::Text(parse_as(action_type, payload)?),
            ActionType::ApiLocal => Self::ApiLocal(parse_as(action_type, payload)?),
            ActionType::Card => Self::Card(parse_as(action_type, payload)?),
            ActionType::EndSession => Self::EndSession(parse_as(action_type, payload)?),
            ActionType::SetEntity => Self::SetEntity(parse_as(action_type, payload)?),
        })
    }

    pub fn action_type(&self) -> ActionType {
        match self {
            Self::Text(_) => ActionType::Text,
            Self::ApiLocal(_) => ActionType::ApiLocal,
            Self::Card(_) => ActionType::Card,
            Self::EndSession(_) => ActionType::EndSession,
            Self::SetEntity(_) => ActionType::SetEntity,
        }
    }

    /// Re-encode to the stored JSON form.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        match self {
            Self::Text(p) | Self::EndSession(p) => serde_json::to_string(p),
            Self::ApiLocal(p) => serde_json::to_string(p),
            Self::Card(p) => serde_json::to_string(p),
            Self::SetEntity(p) => serde_json::to_string(p),
        }
    }

    /// Template arguments in evaluation order.
    pub fn arguments(&self) -> Vec<ActionArgument> {
        match self {
            Self::Card(p) => p.arguments.iter().map(ActionArgument::from).collect(),
            Self::ApiLocal(p) => p
                .logic_arguments
                .iter()
                .chain(&p.render_arguments)
                .map(ActionArgument::from)
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// A named template argument of a CARD or API_LOCAL action.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionArgument {
    pub parameter: String,
    /// Rich-text document for the argument value.
    pub value: Value,
}

impl From<&ArgumentPayload> for ActionArgument {
    fn from(arg: &ArgumentPayload) -> Self {
        ActionArgument {
            parameter: arg.parameter.clone(),
            value: arg.value.json.clone(),
        }
    }
}

impl From<&ActionArgument> for ArgumentPayload {
    fn from(arg: &ActionArgument) -> Self {
        ArgumentPayload {
            parameter: arg.parameter.clone(),
            value: TextPayload {
                json: arg.value.clone(),
            },
        }
    }
}

impl ActionArgument {
    pub fn render_value(
        &self,
        values: &EntityDisplayValues,
        options: SerializerOptions,
    ) -> Result<String, SerializeError> {
        serialize(&self.value, values, options)
    }

    /// Render this argument; a failure becomes `None` instead of an error.
    pub fn render(
        &self,
        values: &EntityDisplayValues,
        options: SerializerOptions,
    ) -> RenderedActionArgument {
        let value = match self.render_value(values, options) {
            Ok(text) => Some(text),
            Err(e) => {
                debug!(parameter = %self.parameter, error = %e, "argument has no value");
                None
            }
        };

        RenderedActionArgument {
            parameter: self.parameter.clone(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedActionArgument {
    pub parameter: String,
    pub value: Option<String>,
}

/// Render each argument independently, preserving order.
pub fn render_arguments(
    arguments: &[ActionArgument],
    values: &EntityDisplayValues,
    options: SerializerOptions,
) -> Vec<RenderedActionArgument> {
    arguments
        .iter()
        .map(|arg| arg.render(values, options))
        .collect()
}

fn expect_type(action: &Action, expected: ActionType) -> Result<(), ActionError> {
    if action.action_type != expected {
        return Err(ActionError::VariantMismatch {
            expected,
            actual: action.action_type,
        });
    }
    Ok(())
}

/// View of a TEXT action.
#[derive(Debug, Clone, PartialEq)]
pub struct TextAction {
    pub action: Action,
    pub value: Value,
}

impl TryFrom<Action> for TextAction {
    type Error = ActionError;

    fn try_from(action: Action) -> Result<Self, Self::Error> {
        expect_type(&action, ActionType::Text)?;
        let TextPayload { json } = parse_as(action.action_type, &action.payload)?;
        Ok(TextAction {
            action,
            value: json,
        })
    }
}

impl TextAction {
    pub fn render_value(
        &self,
        values: &EntityDisplayValues,
        options: SerializerOptions,
    ) -> Result<String, SerializeError> {
        serialize(&self.value, values, options)
    }
}

/// View of an END_SESSION action.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionAction {
    pub action: Action,
    pub value: Value,
}

impl TryFrom<Action> for SessionAction {
    type Error = ActionError;

    fn try_from(action: Action) -> Result<Self, Self::Error> {
        expect_type(&action, ActionType::EndSession)?;
        let TextPayload { json } = parse_as(action.action_type, &action.payload)?;
        Ok(SessionAction {
            action,
            value: json,
        })
    }
}

impl SessionAction {
    pub fn render_value(
        &self,
        values: &EntityDisplayValues,
        options: SerializerOptions,
    ) -> Result<String, SerializeError> {
        serialize(&self.value, values, options)
    }
}

/// View of an API_LOCAL action.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiAction {
    pub action: Action,
    pub name: String,
    pub logic_arguments: Vec<ActionArgument>,
    pub render_arguments: Vec<ActionArgument>,
}

impl TryFrom<Action> for ApiAction {
    type Error = ActionError;

    fn try_from(action: Action) -> Result<Self, Self::Error> {
        expect_type(&action, ActionType::ApiLocal)?;
        let payload: ApiPayload = parse_as(action.action_type, &action.payload)?;
        Ok(ApiAction {
            action,
            name: payload.payload,
            logic_arguments: payload.logic_arguments.iter().map(ActionArgument::from).collect(),
            render_arguments: payload.render_arguments.iter().map(ActionArgument::from).collect(),
        })
    }
}

impl ApiAction {
    pub fn render_logic_arguments(
        &self,
        values: &EntityDisplayValues,
        options: SerializerOptions,
    ) -> Vec<RenderedActionArgument> {
        render_arguments(&self.logic_arguments, values, options)
    }

    pub fn render_render_arguments(
        &self,
        values: &EntityDisplayValues,
        options: SerializerOptions,
    ) -> Vec<RenderedActionArgument> {
        render_arguments(&self.render_arguments, values, options)
    }
}

/// View of a CARD action.
#[derive(Debug, Clone, PartialEq)]
pub struct CardAction {
    pub action: Action,
    pub template_name: String,
    pub arguments: Vec<ActionArgument>,
}

impl TryFrom<Action> for CardAction {
    type Error = ActionError;

    fn try_from(action: Action) -> Result<Self, Self::Error> {
        expect_type(&action, ActionType::Card)?;
        let payload: CardPayload = parse_as(action.action_type, &action.payload)?;
        Ok(CardAction {
            action,
            template_name: payload.payload,
            arguments: payload.arguments.iter().map(ActionArgument::from).collect(),
        })
    }
}

impl CardAction {
    pub fn render_arguments(
        &self,
        values: &EntityDisplayValues,
        options: SerializerOptions,
    ) -> Vec<RenderedActionArgument> {
        render_arguments(&self.arguments, values, options)
    }
}

/// View of a SET_ENTITY action.
#[derive(Debug, Clone, PartialEq)]
pub struct SetEntityAction {
    pub action: Action,
    pub entity_id: String,
    pub enum_value_id: String,
}

impl TryFrom<Action> for SetEntityAction {
    type Error = ActionError;

    fn try_from(action: Action) -> Result<Self, Self::Error> {
        expect_type(&action, ActionType::SetEntity)?;
        let payload: SetEntityPayload = parse_as(action.action_type, &action.payload)?;
        Ok(SetEntityAction {
            action,
            entity_id: payload.entity_id,
            enum_value_id: payload.enum_value_id,
        })
    }
}

/// An action converted to the view matching its type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedAction {
    Text(TextAction),
    Api(ApiAction),
    Card(CardAction),
    EndSession(SessionAction),
    SetEntity(SetEntityAction),
}

impl TryFrom<Action> for TypedAction {
    type Error = ActionError;

    fn try_from(action: Action) -> Result<Self, Self::Error> {
        Ok(match action.action_type {
            ActionType::Text => Self::Text(action.try_into()?),
            ActionType::ApiLocal => Self::Api(action.try_into()?),
            ActionType::Card => Self::Card(action.try_into()?),
            ActionType::EndSession => Self::EndSession(action.try_into()?),
            ActionType::SetEntity => Self::SetEntity(action.try_into()?),
        })
    }
}

impl TypedAction {
    pub fn action(&self) -> &Action {
        match self {
            Self::Text(a) => &a.action,
            Self::Api(a) => &a.action,
            Self::Card(a) => &a.action,
            Self::EndSession(a) => &a.action,
            Self::SetEntity(a) => &a.action,
        }
    }
}
