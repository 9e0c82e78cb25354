//! Table naming conventions.
//!
//! These are the canonical table names in the hosted record store. Column
//! names match the serde field names of the records in [`crate::models`].

pub const RESPONDENTS: &str = "respondents";

pub const HEALTH_UNITS: &str = "health_units";

pub const USERS: &str = "users";

pub const QUESTIONS: &str = "questions";

pub const RESPONSES: &str = "questionnaire_responses";

pub const DEVICES: &str = "push_devices";

pub const NOTIFICATIONS: &str = "notifications";

