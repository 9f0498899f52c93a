//! Built-in mock business tools.
//!
//! Each tool returns a short spoken-style sentence. The business logic is
//! canned; real integrations replace entries through [`ToolRegistry::register`].
//!
//! [`ToolRegistry::register`]: super::ToolRegistry::register

use std::sync::Arc;

use chrono::Local;
use serde::Deserialize;

use super::calculator;
use super::tool::{AgentTool, Tool};
use super::types::AgentToolParameters;
use super::ToolArguments;
use crate::error::VoxaError;

/// Format used when reading the time aloud.
pub const TIME_FORMAT: &str = "%A, %B %d, %Y at %I:%M %p";

pub fn get_current_time_tool() -> Arc<dyn Tool> {
    Arc::new(AgentTool::sync(
        "get_current_time",
        "Get the current date and time.",
        AgentToolParameters::empty(),
        |_args| Ok(Local::now().format(TIME_FORMAT).to_string()),
    ))
}

pub fn calculate_tool() -> Arc<dyn Tool> {
    Arc::new(AgentTool::sync(
        "calculate",
        "Evaluate a basic arithmetic expression using + - * / and parentheses.",
        AgentToolParameters::object()
            .string(
                "expression",
                "A mathematical expression to evaluate (e.g., \"2 + 2\", \"100 * 0.15\")",
                true,
            )
            .build(),
        |args| {
            let expression = args.get_str("expression")?;
            calculator::evaluate(expression)
                .map(calculator::format_number)
                .map_err(|e| VoxaError::tool("calculate", e.to_string()))
        },
    ))
}

// Customer support

pub fn check_order_status_tool() -> Arc<dyn Tool> {
    Arc::new(AgentTool::sync(
        "check_order_status",
        "Check the status of a customer order.",
        AgentToolParameters::object()
            .string("order_id", "The order ID to look up", true)
            .build(),
        |args| {
            let order_id = args.get_str("order_id")?.trim();
            let status = match order_id {
                "12345" => "Your order is out for delivery and should arrive today.".to_string(),
                "12346" => "Your order is being prepared and will ship tomorrow.".to_string(),
                "12347" => "Your order has been delivered.".to_string(),
                other => format!(
                    "I couldn't find an order with ID {other}. Please verify the order number."
                ),
            };
            Ok(status)
        },
    ))
}

pub fn create_support_ticket_tool() -> Arc<dyn Tool> {
    Arc::new(AgentTool::sync(
        "create_support_ticket",
        "Create a support ticket for the customer.",
        AgentToolParameters::object()
            .string_enum(
                "issue_type",
                "Type of issue",
                &["billing", "technical", "general"],
                true,
            )
            .string("description", "Description of the issue", true)
            .string_enum("priority", "Priority level", &["low", "normal", "high"], false)
            .build(),
        |args| {
            let issue_type = args.get_str("issue_type")?;
            args.get_str("description")?;
            let ticket_id = format!("TKT-{}", Local::now().format("%Y%m%d%H%M%S"));
            Ok(format!(
                "I've created support ticket {ticket_id} for your {issue_type} issue. \
                 Our team will contact you within 24 hours."
            ))
        },
    ))
}

// Sales

pub fn check_product_availability_tool() -> Arc<dyn Tool> {
    Arc::new(AgentTool::sync(
        "check_product_availability",
        "Check if a product is available in stock.",
        AgentToolParameters::object()
            .string("product_name", "Name of the product to check", true)
            .build(),
        |args| {
            let product = args.get_str("product_name")?;
            Ok(format!(
                "Yes, {product} is currently in stock. Would you like me to tell you more about it?"
            ))
        },
    ))
}

pub fn get_pricing_tool() -> Arc<dyn Tool> {
    Arc::new(AgentTool::sync(
        "get_pricing",
        "Get pricing information for a product.",
        AgentToolParameters::object()
            .string("product_name", "Name of the product", true)
            .build(),
        |args| {
            let product = args.get_str("product_name")?;
            Ok(format!(
                "The {product} starts at $99. We also have premium options available. \
                 Would you like more details?"
            ))
        },
    ))
}

#[derive(Deserialize)]
struct DemoRequest {
    name: String,
    email: String,
    preferred_time: String,
}

pub fn schedule_demo_tool() -> Arc<dyn Tool> {
    Arc::new(AgentTool::sync(
        "schedule_demo",
        "Schedule a product demo for a potential customer.",
        AgentToolParameters::object()
            .string("name", "Customer's name", true)
            .string("email", "Customer's email address", true)
            .string("preferred_time", "Preferred demo time", true)
            .build(),
        |args| {
            let req: DemoRequest = args.deserialize()?;
            Ok(format!(
                "I've scheduled a demo for {} at {}. A confirmation will be sent to {}.",
                req.name, req.preferred_time, req.email
            ))
        },
    ))
}

// Healthcare

pub fn check_appointment_availability_tool() -> Arc<dyn Tool> {
    Arc::new(AgentTool::sync(
        "check_appointment_availability",
        "Check available appointment slots.",
        AgentToolParameters::object()
            .string("date", "Preferred date (e.g., \"tomorrow\", \"next Monday\")", true)
            .string_enum("doctor_type", "Type of doctor", &["general", "specialist"], false)
            .build(),
        |args| {
            let date = args.get_str("date")?;
            Ok(format!(
                "We have openings on {date} at 9:00 AM, 2:00 PM, and 4:30 PM. \
                 Would any of these times work for you?"
            ))
        },
    ))
}

#[derive(Deserialize)]
struct AppointmentRequest {
    patient_name: String,
    date: String,
    time: String,
}

pub fn book_appointment_tool() -> Arc<dyn Tool> {
    Arc::new(AgentTool::sync(
        "book_appointment",
        "Book a medical appointment.",
        AgentToolParameters::object()
            .string("patient_name", "Patient's full name", true)
            .string("date", "Appointment date", true)
            .string("time", "Appointment time", true)
            .string("reason", "Reason for visit", true)
            .build(),
        |args| {
            let req: AppointmentRequest = args.deserialize()?;
            args.get_str("reason")?;
            Ok(format!(
                "I've booked an appointment for {} on {} at {}. Please arrive 15 minutes early.",
                req.patient_name, req.date, req.time
            ))
        },
    ))
}

// Restaurant

fn party_size(args: &ToolArguments) -> Result<i64, VoxaError> {
    let size = args.get_i64("party_size")?;
    if size < 1 {
        return Err(VoxaError::InvalidArgument(format!(
            "party_size must be at least 1, got {size}"
        )));
    }
    Ok(size)
}

pub fn check_reservation_availability_tool() -> Arc<dyn Tool> {
    Arc::new(AgentTool::sync(
        "check_reservation_availability",
        "Check if a reservation slot is available.",
        AgentToolParameters::object()
            .string("date", "Desired date", true)
            .string("time", "Desired time", true)
            .integer("party_size", "Number of guests", true)
            .build(),
        |args| {
            let date = args.get_str("date")?;
            let time = args.get_str("time")?;
            let size = party_size(args)?;
            Ok(format!(
                "We have availability for a party of {size} on {date} at {time}. \
                 Would you like me to book it?"
            ))
        },
    ))
}

pub fn make_reservation_tool() -> Arc<dyn Tool> {
    Arc::new(AgentTool::sync(
        "make_reservation",
        "Make a restaurant reservation.",
        AgentToolParameters::object()
            .string("name", "Name for the reservation", true)
            .string("date", "Reservation date", true)
            .string("time", "Reservation time", true)
            .integer("party_size", "Number of guests", true)
            .string(
                "special_requests",
                "Any special requests (dietary, seating, etc.)",
                false,
            )
            .build(),
        |args| {
            let name = args.get_str("name")?;
            let date = args.get_str("date")?;
            let time = args.get_str("time")?;
            let size = party_size(args)?;
            let mut confirmation =
                format!("Reservation confirmed for {name}, party of {size}, on {date} at {time}.");
            if let Some(requests) = args.get_str_opt("special_requests") {
                confirmation.push_str(&format!(" I've noted your request: {requests}."));
            }
            Ok(confirmation)
        },
    ))
}

pub fn get_menu_info_tool() -> Arc<dyn Tool> {
    Arc::new(AgentTool::sync(
        "get_menu_info",
        "Get information about the menu.",
        AgentToolParameters::object()
            .string(
                "category",
                "Menu category (appetizers, entrees, desserts, drinks); omit for an overview",
                false,
            )
            .build(),
        |args| {
            Ok(match args.get_str_opt("category") {
                Some(category) => format!(
                    "Our {category} include a variety of delicious options. \
                     Would you like me to describe some specific items?"
                ),
                None => "We offer appetizers, entrees, desserts, and a full bar. \
                         What category would you like to hear about?"
                    .to_string(),
            })
        },
    ))
}

/// Every built-in tool.
pub fn all_tools() -> Vec<Arc<dyn Tool>> {
    vec![
        get_current_time_tool(),
        calculate_tool(),
        check_order_status_tool(),
        create_support_ticket_tool(),
        check_product_availability_tool(),
        get_pricing_tool(),
        schedule_demo_tool(),
        check_appointment_availability_tool(),
        book_appointment_tool(),
        check_reservation_availability_tool(),
        make_reservation_tool(),
        get_menu_info_tool(),
    ]
}

/// Named tool groups per industry.
pub fn presets() -> Vec<(&'static str, Vec<&'static str>)> {
    vec![
        (
            "customer-support",
            vec!["get_current_time", "check_order_status", "create_support_ticket"],
        ),
        (
            "sales",
            vec![
                "get_current_time",
                "check_product_availability",
                "get_pricing",
                "schedule_demo",
            ],
        ),
        (
            "healthcare",
            vec![
                "get_current_time",
                "check_appointment_availability",
                "book_appointment",
            ],
        ),
        (
            "restaurant",
            vec![
                "get_current_time",
                "check_reservation_availability",
                "make_reservation",
                "get_menu_info",
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolExecutionContext;
    use serde_json::json;

    async fn run(tool: Arc<dyn Tool>, args: serde_json::Value) -> Result<String, VoxaError> {
        tool.execute(&ToolArguments::new(args), &ToolExecutionContext::default())
            .await
    }

    #[test]
    fn all_tools_have_unique_names_and_object_schemas() {
        let tools = all_tools();
        assert_eq!(tools.len(), 12);

        let mut names: Vec<&str> = tools.iter().map(|t| t.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 12);

        for tool in &tools {
            assert!(!tool.description().is_empty(), "{} lacks a description", tool.name());
            assert_eq!(tool.parameters().schema["type"], "object");
        }
    }

    #[test]
    fn presets_reference_known_tools() {
        let tools = all_tools();
        for (key, names) in presets() {
            assert_eq!(names[0], "get_current_time", "{key} should start with the clock");
            for name in names {
                assert!(tools.iter().any(|t| t.name() == name), "{key}: {name}");
            }
        }
    }

    #[tokio::test]
    async fn calculate_returns_bare_value() {
        assert_eq!(run(calculate_tool(), json!({"expression": "2+2"})).await.unwrap(), "4");
        assert_eq!(
            run(calculate_tool(), json!({"expression": "100 * 0.15"})).await.unwrap(),
            "15"
        );
    }

    #[tokio::test]
    async fn calculate_reports_faults_as_tool_errors() {
        let err = run(calculate_tool(), json!({"expression": "1/0"})).await.unwrap_err();
        assert!(matches!(err, VoxaError::ToolExecution { ref tool_name, .. } if tool_name == "calculate"));

        let err = run(calculate_tool(), json!({})).await.unwrap_err();
        assert!(matches!(err, VoxaError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn order_status_has_canned_answers() {
        let known = run(check_order_status_tool(), json!({"order_id": "12347"})).await.unwrap();
        assert_eq!(known, "Your order has been delivered.");

        let unknown = run(check_order_status_tool(), json!({"order_id": "999"})).await.unwrap();
        assert!(unknown.contains("couldn't find an order with ID 999"));
    }

    #[tokio::test]
    async fn support_ticket_ids_are_timestamped() {
        let out = run(
            create_support_ticket_tool(),
            json!({"issue_type": "billing", "description": "double charge"}),
        )
        .await
        .unwrap();
        let id = out
            .split_whitespace()
            .find(|w| w.starts_with("TKT-"))
            .unwrap();
        assert_eq!(id.len(), "TKT-".len() + 14);
        assert!(out.contains("billing issue"));
    }

    #[tokio::test]
    async fn reservation_notes_special_requests_only_when_present() {
        let base = json!({"name": "Ada", "date": "Friday", "time": "7pm", "party_size": 4});
        let plain = run(make_reservation_tool(), base.clone()).await.unwrap();
        assert_eq!(plain, "Reservation confirmed for Ada, party of 4, on Friday at 7pm.");

        let mut with_note = base;
        with_note["special_requests"] = json!("window seat");
        let noted = run(make_reservation_tool(), with_note).await.unwrap();
        assert!(noted.ends_with("I've noted your request: window seat."));
    }

    #[tokio::test]
    async fn reservation_rejects_empty_party() {
        let err = run(
            check_reservation_availability_tool(),
            json!({"date": "today", "time": "6pm", "party_size": 0}),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, VoxaError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn demo_and_appointment_confirmations() {
        let demo = run(
            schedule_demo_tool(),
            json!({"name": "Sam", "email": "sam@example.com", "preferred_time": "3pm"}),
        )
        .await
        .unwrap();
        assert_eq!(
            demo,
            "I've scheduled a demo for Sam at 3pm. A confirmation will be sent to sam@example.com."
        );

        let booked = run(
            book_appointment_tool(),
            json!({"patient_name": "Lee", "date": "Monday", "time": "9am", "reason": "checkup"}),
        )
        .await
        .unwrap();
        assert!(booked.starts_with("I've booked an appointment for Lee on Monday at 9am."));
    }

    #[tokio::test]
    async fn appointment_requires_a_reason() {
        let err = run(
            book_appointment_tool(),
            json!({"patient_name": "Lee", "date": "Monday", "time": "9am"}),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, VoxaError::InvalidArgument(ref m) if m.contains("reason")));
    }

    #[tokio::test]
    async fn menu_info_without_category_gives_overview() {
        let overview = run(get_menu_info_tool(), json!({})).await.unwrap();
        assert!(overview.starts_with("We offer appetizers"));
        let desserts = run(get_menu_info_tool(), json!({"category": "desserts"})).await.unwrap();
        assert!(desserts.starts_with("Our desserts include"));
    }
}
