//! Action payload model against the fixture actions.

use dialog_models::core::entity_map::FilledEntityMap;
use dialog_models::core::serializer::{EntityDisplayValues, SerializerOptions};
use dialog_models::schema::action::{
    is_stubbed_action, Action, ActionError, ActionType, PayloadSource, RenderedActionArgument,
    TextAction, TypedAction,
};

fn fixture_actions() -> Vec<Action> {
    let contents = std::fs::read_to_string("tests/fixtures/actions.json").unwrap();
    serde_json::from_str(&contents).unwrap()
}

fn fixture_action(id: &str) -> Action {
    fixture_actions()
        .into_iter()
        .find(|a| a.action_id.as_deref() == Some(id))
        .unwrap()
}

fn fixture_values() -> EntityDisplayValues {
    FilledEntityMap::load_from_ron(std::path::Path::new("tests/fixtures/entities.ron"))
        .unwrap()
        .display_values_by_id()
}

fn rendered(parameter: &str, value: Option<&str>) -> RenderedActionArgument {
    RenderedActionArgument {
        parameter: parameter.to_string(),
        value: value.map(str::to_string),
    }
}

#[test]
fn payload_text_per_action_type() {
    let values = fixture_values();
    let text_of = |id: &str| fixture_action(id).payload_text(&values).unwrap();

    assert_eq!(text_of("greet"), "Hello Sam, what can I get you?");
    assert_eq!(
        text_of("confirm"),
        "One large coffee with caramel, whipped cream and cinnamon."
    );
    assert_eq!(text_of("order"), "placeOrder");
    assert_eq!(text_of("menu"), "menuCard");
    assert_eq!(text_of("bye"), "Goodbye");
    assert_eq!(
        text_of("pick-size"),
        r#"{"entityId": "e-size", "enumValueId": "v-large"}"#
    );
}

#[test]
fn legacy_plain_string_text_action_fails_loudly() {
    let err = fixture_action("legacy")
        .payload_text(&fixture_values())
        .unwrap_err();
    assert!(matches!(
        err,
        ActionError::PayloadParse {
            action_type: ActionType::Text,
            ..
        }
    ));
    assert!(err.to_string().contains("Please create a new action"));
}

#[test]
fn text_payload_with_unfilled_mention_is_a_render_error() {
    let err = fixture_action("greet")
        .payload_text(&EntityDisplayValues::new())
        .unwrap_err();
    assert!(matches!(err, ActionError::Render(_)));
}

#[test]
fn api_arguments_render_in_order_with_isolated_failures() {
    let values = fixture_values();
    let action = fixture_action("order");

    let parameters: Vec<_> = action
        .action_arguments()
        .unwrap()
        .into_iter()
        .map(|a| a.parameter)
        .collect();
    assert_eq!(parameters, vec!["size", "milk", "summary"]);

    let api = match TypedAction::try_from(action).unwrap() {
        TypedAction::Api(api) => api,
        other => panic!("expected api action, got {other:?}"),
    };
    assert_eq!(
        api.render_logic_arguments(&values, SerializerOptions::default()),
        vec![rendered("size", Some("large")), rendered("milk", None)]
    );
    assert_eq!(
        api.render_render_arguments(&values, SerializerOptions::default()),
        vec![rendered("summary", Some("Order for Sam"))]
    );
}

#[test]
fn card_arguments_render() {
    let card = match TypedAction::try_from(fixture_action("menu")).unwrap() {
        TypedAction::Card(card) => card,
        other => panic!("expected card action, got {other:?}"),
    };
    assert_eq!(card.template_name, "menuCard");
    assert_eq!(
        card.render_arguments(&fixture_values(), SerializerOptions::default()),
        vec![
            rendered("title", Some("Welcome back, Sam")),
            rendered("footer", Some("Prices include tax")),
        ]
    );
}

#[test]
fn every_fixture_except_legacy_converts_to_its_view() {
    for action in fixture_actions() {
        let id = action.action_id.clone().unwrap();
        let result = TypedAction::try_from(action);
        if id == "legacy" {
            assert!(result.is_err());
        } else {
            let typed = result.unwrap();
            assert_eq!(typed.action().action_id.as_deref(), Some(id.as_str()));
        }
    }
}

#[test]
fn text_view_from_api_action_is_rejected() {
    let err = TextAction::try_from(fixture_action("order")).unwrap_err();
    assert!(matches!(
        err,
        ActionError::VariantMismatch {
            expected: ActionType::Text,
            actual: ActionType::ApiLocal,
        }
    ));
}

#[test]
fn only_the_stub_is_stubbed() {
    let stubbed: Vec<_> = fixture_actions()
        .into_iter()
        .filter(|a| is_stubbed_action(Some(a)))
        .filter_map(|a| a.action_id)
        .collect();
    assert_eq!(stubbed, vec!["stub"]);
    assert!(!is_stubbed_action::<Action>(None));
}

#[test]
fn actions_round_trip_through_json() {
    let actions = fixture_actions();
    let encoded = serde_json::to_string(&actions).unwrap();
    let decoded: Vec<Action> = serde_json::from_str(&encoded).unwrap();
    assert_eq!(actions, decoded);
}
