use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What a session is recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialogType {
    Teach,
    TrainDialog,
    LogDialog,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub session_id: String,
    pub created_datetime: String,
    pub last_query_datetime: String,
    pub package_id: u64,
    pub save_to_log: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionList {
    pub sessions: Vec<Session>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionIdList {
    pub session_ids: Vec<String>,
}

/// Parameters for starting a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCreateParams {
    /// Prior log rounds replayed into the new session, passed through as-is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_dialog: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_id: Option<String>,
    pub save_to_log: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialog_type_wire_names() {
        assert_eq!(serde_json::to_string(&DialogType::TrainDialog).unwrap(), "\"traindialog\"");
        assert_eq!(
            serde_json::from_str::<DialogType>("\"logdialog\"").unwrap(),
            DialogType::LogDialog
        );
    }

    #[test]
    fn session_list_deserializes() {
        let json = r#"{ "sessions": [{
            "sessionId": "s1",
            "createdDatetime": "2020-01-01T00:00:00Z",
            "lastQueryDatetime": "2020-01-01T00:05:00Z",
            "packageId": 7,
            "saveToLog": true
        }] }"#;
        let list: SessionList = serde_json::from_str(json).unwrap();
        assert_eq!(list.sessions[0].package_id, 7);
        assert!(list.sessions[0].save_to_log);
    }

    #[test]
    fn create_params_omit_absent_fields() {
        let params = SessionCreateParams {
            save_to_log: true,
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&params).unwrap(), r#"{"saveToLog":true}"#);
    }
}
