//! Substitution engine against the fixture entity store.

use dialog_models::core::entity_map::FilledEntityMap;
use dialog_models::core::serializer::{serialize, SerializerOptions};
use dialog_models::core::substitute::substitute;
use dialog_models::schema::action::{Action, PayloadSource};

fn fixture_entities() -> FilledEntityMap {
    let path = std::path::Path::new("tests/fixtures/entities.ron");
    FilledEntityMap::load_from_ron(path).unwrap()
}

fn fixture_action(id: &str) -> Action {
    let contents = std::fs::read_to_string("tests/fixtures/actions.json").unwrap();
    let actions: Vec<Action> = serde_json::from_str(&contents).unwrap();
    actions
        .into_iter()
        .find(|a| a.action_id.as_deref() == Some(id))
        .unwrap()
}

#[test]
fn fixture_store_loads() {
    let entities = fixture_entities();
    assert_eq!(entities.len(), 4);
    assert_eq!(entities.value_as_string("size").as_deref(), Some("large"));
    assert_eq!(entities.value_as_list("size"), vec!["lg"]);
    assert_eq!(entities.value_as_string("milk").as_deref(), Some(""));
}

#[test]
fn legacy_template_renders() {
    let entities = fixture_entities();
    assert_eq!(
        substitute("Hi $name. One $size coffee[ with $topping][ and $milk]?", &entities),
        "Hi Sam. One large coffee with caramel, whipped cream and cinnamon?"
    );
}

#[test]
fn unknown_entities_stay_visible() {
    let entities = fixture_entities();
    assert_eq!(
        substitute("Deliver to $address[ by $time], $name", &entities),
        "Deliver to $address, Sam"
    );
}

#[test]
fn store_is_reusable_across_renders() {
    let entities = fixture_entities();
    let first = entities.substitute("$name");
    let second = entities.substitute("$name");
    assert_eq!(first, "Sam");
    assert_eq!(first, second);
    assert_eq!(entities, fixture_entities());
}

#[test]
fn rich_text_and_legacy_paths_agree() {
    let entities = fixture_entities();

    let legacy = substitute("One $size coffee[ with $topping][ and $milk].", &entities);

    let action = fixture_action("confirm");
    let document = action.parse_payload().unwrap();
    let rich = match document {
        dialog_models::schema::action::ActionPayload::Text(p) => serialize(
            &p.json,
            &entities.display_values_by_id(),
            SerializerOptions::default(),
        )
        .unwrap(),
        other => panic!("expected text payload, got {other:?}"),
    };

    assert_eq!(legacy, "One large coffee with caramel, whipped cream and cinnamon.");
    assert_eq!(rich, legacy);
}
