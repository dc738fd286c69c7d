//! Render templates and actions against a set of filled entities.
//!
//! Usage: preview --entities <file.ron> [--text <template>] [--actions <file.json>] [--fallback]
//!
//! Without `--text` or `--actions` an interactive shell starts:
//!   <template>   substitute and print
//!   :entities    list loaded entities
//!   :help        list commands
//!   :quit        exit

use dialog_models::core::entity_map::FilledEntityMap;
use dialog_models::core::serializer::SerializerOptions;
use dialog_models::core::tokenizer::placeholders;
use dialog_models::schema::action::{is_stubbed_action, Action, PayloadSource, TypedAction};
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return;
    }

    let mut entities_path = None;
    let mut text = None;
    let mut actions_path = None;
    let mut options = SerializerOptions::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--entities" if i + 1 < args.len() => {
                i += 1;
                entities_path = Some(args[i].clone());
            }
            "--text" if i + 1 < args.len() => {
                i += 1;
                text = Some(args[i].clone());
            }
            "--actions" if i + 1 < args.len() => {
                i += 1;
                actions_path = Some(args[i].clone());
            }
            "--fallback" => {
                options.fallback_to_original = true;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let entities = match entities_path {
        Some(ref path) => match FilledEntityMap::load_from_ron(Path::new(path)) {
            Ok(map) => map,
            Err(e) => {
                eprintln!("ERROR: Failed to load entities from {}: {}", path, e);
                process::exit(1);
            }
        },
        None => FilledEntityMap::default(),
    };

    println!("Loaded {} entities", entities.len());

    if let Some(ref template) = text {
        println!("{}", entities.substitute(template));
    }

    if let Some(ref path) = actions_path {
        preview_actions(path, &entities, options);
    }

    if text.is_none() && actions_path.is_none() {
        run_shell(&entities);
    }
}

fn preview_actions(path: &str, entities: &FilledEntityMap, options: SerializerOptions) {
    let actions: Vec<Action> = match std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|contents| serde_json::from_str(&contents).map_err(|e| e.to_string()))
    {
        Ok(actions) => actions,
        Err(e) => {
            eprintln!("ERROR: Failed to load actions from {}: {}", path, e);
            process::exit(1);
        }
    };

    let values = entities.display_values_by_id();

    for action in actions {
        let id = action.action_id.clone().unwrap_or_else(|| "<no id>".to_string());
        println!("\n--- {} ({}) ---", id, action.action_type);

        if is_stubbed_action(Some(&action)) {
            println!("(stub action)");
            continue;
        }

        match action.payload_text(&values) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                println!("ERROR: {}", e);
                continue;
            }
        }

        let arguments = match TypedAction::try_from(action) {
            Ok(TypedAction::Api(api)) => {
                let mut rendered = api.render_logic_arguments(&values, options);
                rendered.extend(api.render_render_arguments(&values, options));
                rendered
            }
            Ok(TypedAction::Card(card)) => card.render_arguments(&values, options),
            Ok(_) => Vec::new(),
            Err(e) => {
                println!("ERROR: {}", e);
                continue;
            }
        };

        for argument in arguments {
            match argument.value {
                Some(value) => println!("  {} = {}", argument.parameter, value),
                None => println!("  {} = <no value>", argument.parameter),
            }
        }
    }
}

fn run_shell(entities: &FilledEntityMap) {
    println!("Type ':help' for commands.\n");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("preview> ");
        stdout.flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).is_err() || line.is_empty() {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line {
            ":quit" | ":q" => {
                println!("Goodbye.");
                break;
            }
            ":help" | ":h" => print_help(),
            ":entities" => {
                let mut names: Vec<&str> = entities.names().collect();
                names.sort_unstable();
                for name in names {
                    let value = entities.value_as_string(name).unwrap_or_default();
                    println!("  ${} = {:?}", name, value);
                }
            }
            template => {
                let output = entities.substitute(template);
                println!("{}", output);

                let unfilled: Vec<&str> = placeholders(&output).collect();
                if !unfilled.is_empty() {
                    println!("  (unfilled: {})", unfilled.join(", "));
                }
            }
        }
    }
}

fn print_usage() {
    println!("Usage: preview --entities <file.ron> [--text <template>] [--actions <file.json>] [--fallback]");
}

fn print_help() {
    println!("Commands:");
    println!("  <template>   substitute $entities and [contingent phrases]");
    println!("  :entities    list loaded entities");
    println!("  :help        show this help");
    println!("  :quit        exit");
}
