//! Showcase of datalize conversions and their diagnostics.
//!
//! Run with: cargo run --example showcase

use datalize::{Datalize, Datetime, Deserializer, from_value, to_string_pretty};
use miette::{GraphicalReportHandler, GraphicalTheme};
use owo_colors::OwoColorize;
use serde_json::{Value, json};
use uuid::Uuid;

// ============================================================================
// Helper Functions
// ============================================================================

fn render_error(err: &dyn miette::Diagnostic) -> String {
    let mut output = String::new();
    let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode());
    if let Err(e) = handler.render_report(&mut output, err) {
        output = format!("failed to render report: {e}");
    }
    output
}

fn print_scenario(name: &str, description: &str) {
    println!();
    println!("{}", "═".repeat(78).dimmed());
    println!("{} {}", "SCENARIO:".bold().cyan(), name.bold().white());
    println!("{}", "─".repeat(78).dimmed());
    println!("{}", description.dimmed());
    println!("{}", "═".repeat(78).dimmed());
}

fn print_json(label: &str, value: &Value) {
    println!();
    println!("{}", label.bold().green());
    println!("{}", "─".repeat(60).dimmed());
    let pretty = format!("{value:#}");
    for (i, line) in pretty.lines().enumerate() {
        println!("{} {} {}", format!("{:3}", i + 1).dimmed(), "│".dimmed(), line);
    }
    println!("{}", "─".repeat(60).dimmed());
}

fn print_descriptor<T: Datalize>() {
    println!();
    println!("{} {}", "Target:".bold().blue(), T::describe());
}

fn scenario<T: Datalize + std::fmt::Debug>(name: &str, description: &str, input: Value) {
    print_scenario(name, description);
    print_descriptor::<T>();
    print_json("JSON Input:", &input);

    let mut deserializer = Deserializer::new();
    let converted = deserializer
        .convert(&input, &T::describe())
        .and_then(T::from_instance);
    for advisory in deserializer.advisories() {
        println!("{} {}", "advisory:".bold().yellow(), advisory);
    }

    match converted {
        Ok(value) => {
            println!();
            println!("{}", "Converted:".bold().green());
            println!("{value:#?}");
            println!();
            println!("{}", "Emitted:".bold().green());
            println!("{}", to_string_pretty(&value));
        }
        Err(err) => {
            println!();
            println!("{}", "Error:".bold().red());
            println!("{}", render_error(&err));
        }
    }
}

// ============================================================================
// Types
// ============================================================================

datalize::record! {
    #[derive(Debug)]
    struct Point {
        val: String,
        ts: Datetime,
    }
}

datalize::record! {
    #[derive(Debug)]
    struct OneExample {
        my_id: Uuid,
        points: Vec<Point>,
        name: Option<String> = Some("Example".to_string()),
    }
}

datalize::enumeration! {
    #[derive(Debug)]
    enum Priority {
        Low as "low" = 1,
        Normal as "normal" = 2,
        Urgent as "urgent" = 3,
    }
}

datalize::one_of! {
    #[derive(Debug)]
    enum TextOrNumber {
        Text(String),
        Number(i64),
    }
}

datalize::record! {
    #[derive(Debug)]
    struct Ticket {
        title: String,
        priority: Priority,
        estimate: TextOrNumber,
    }
}

// ============================================================================
// Main
// ============================================================================

fn main() {
    println!("\n{}", "═".repeat(70));
    println!("  datalize Showcase");
    println!("{}\n", "═".repeat(70));

    scenario::<OneExample>(
        "Records, UUIDs and datetimes",
        "A missing field with a default is filled in; datetimes keep their offset.",
        json!({
            "my_id": "029affa6-814e-439a-a61d-2614ad184e0d",
            "points": [
                {"val": "timestamps", "ts": "2020-05-18T13:39:00.000666"},
                {"val": "with timezone", "ts": "2020-05-18T13:37:00.000666+03:00"}
            ]
        }),
    );

    scenario::<Ticket>(
        "Enums by name or value",
        "The priority is given by name on input and written by value on output.",
        json!({"title": "Fix login", "priority": "urgent", "estimate": 3}),
    );

    scenario::<Ticket>(
        "Ambiguous union",
        "A string candidate listed first takes numbers too, so an advisory is raised.",
        json!({"title": "Refactor", "priority": 2, "estimate": "3"}),
    );

    scenario::<Ticket>(
        "Unknown enum member",
        "A misspelled member name gets a suggestion.",
        json!({"title": "Deploy", "priority": "urgnet", "estimate": 1}),
    );

    scenario::<OneExample>(
        "Malformed datetime",
        "The error path points at the offending list element.",
        json!({
            "my_id": "029affa6814e439aa61d2614ad184e0d",
            "points": [{"val": "bad", "ts": "2020-05-18 13:39:00"}]
        }),
    );

    scenario::<OneExample>(
        "Missing required field",
        "Fields without a default must be present.",
        json!({"points": []}),
    );

    // Typed entry point, no advisories collected.
    match from_value::<Ticket>(&json!({"title": "Typed", "priority": 1, "estimate": [1]})) {
        Ok(ticket) => println!("{ticket:#?}"),
        Err(err) => {
            print_scenario("Exhausted union", "No candidate accepts a list.");
            println!("{}", render_error(&err));
        }
    }
}
