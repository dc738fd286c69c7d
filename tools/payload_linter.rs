//! Validates stored action payloads.
//!
//! Usage: payload_linter <actions.json>

use dialog_models::core::serializer::{EntityDisplayValues, SerializerOptions};
use dialog_models::schema::action::{is_stubbed_action, Action, TypedAction};
use std::process;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: payload_linter <actions.json>");
        process::exit(0);
    }

    let contents = match std::fs::read_to_string(&args[1]) {
        Ok(contents) => contents,
        Err(e) => {
            eprintln!("ERROR: Failed to read '{}': {}", args[1], e);
            process::exit(1);
        }
    };

    let actions: Vec<Action> = match serde_json::from_str(&contents) {
        Ok(actions) => actions,
        Err(e) => {
            eprintln!("ERROR: '{}' is not a list of actions: {}", args[1], e);
            process::exit(1);
        }
    };

    println!("Loaded {} actions", actions.len());

    let (errors, warnings) = lint_actions(actions);

    println!("\n=== Payload Lint Report ===\n");

    if errors.is_empty() && warnings.is_empty() {
        println!("All checks passed!");
    }

    for warning in &warnings {
        println!("WARNING: {}", warning);
    }

    for error in &errors {
        println!("ERROR: {}", error);
    }

    println!(
        "\nSummary: {} errors, {} warnings",
        errors.len(),
        warnings.len()
    );

    if !errors.is_empty() {
        process::exit(1);
    }
}

fn lint_actions(actions: Vec<Action>) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    // Arguments that only render once entities are filled are fine; ones
    // that fail even with fallback enabled are malformed.
    let no_values = EntityDisplayValues::new();
    let fallback = SerializerOptions {
        fallback_to_original: true,
        ..Default::default()
    };

    for action in actions {
        let id = action
            .action_id
            .clone()
            .unwrap_or_else(|| "<no id>".to_string());

        if is_stubbed_action(Some(&action)) {
            warnings.push(format!("Action '{}' is a stub API action", id));
        }

        let typed = match TypedAction::try_from(action) {
            Ok(typed) => typed,
            Err(e) => {
                errors.push(format!("Action '{}': {}", id, e));
                continue;
            }
        };

        let arguments = match &typed {
            TypedAction::Api(api) => {
                if api.name.is_empty() {
                    errors.push(format!("API action '{}' has no callback name", id));
                }
                let mut rendered = api.render_logic_arguments(&no_values, fallback);
                rendered.extend(api.render_render_arguments(&no_values, fallback));
                rendered
            }
            TypedAction::Card(card) => {
                if card.template_name.is_empty() {
                    errors.push(format!("Card action '{}' has no template name", id));
                }
                card.render_arguments(&no_values, fallback)
            }
            TypedAction::Text(text) => {
                if let Err(e) = text.render_value(&no_values, fallback) {
                    errors.push(format!("Text action '{}': {}", id, e));
                }
                Vec::new()
            }
            TypedAction::EndSession(session) => {
                if let Err(e) = session.render_value(&no_values, fallback) {
                    errors.push(format!("End session action '{}': {}", id, e));
                }
                Vec::new()
            }
            TypedAction::SetEntity(set) => {
                if set.entity_id.is_empty() || set.enum_value_id.is_empty() {
                    errors.push(format!("Set entity action '{}' has an empty id", id));
                }
                Vec::new()
            }
        };

        for argument in arguments {
            if argument.value.is_none() {
                warnings.push(format!(
                    "Action '{}' argument '{}' does not render",
                    id, argument.parameter
                ));
            }
        }
    }

    (errors, warnings)
}
