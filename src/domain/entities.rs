use serde::{Deserialize, Serialize};

pub type PickupId = String;

/// Item categories the pricing engine knows a base rate for.
pub const CATEGORIES: &[&str] = &[
    "Laptop",
    "Desktop PC",
    "Mobile Devices",
    "Printer",
    "Office PCs",
    "Server Racks",
    "UPS Batteries",
    "Washing Machine",
    "Fridge",
    "AC",
];

/// Condition grades, best first.
pub const CONDITIONS: &[&str] = &["working", "repairable", "scrap"];

/// Body of `POST /engineer/calculate-price`.
///
/// Every field is the raw text of its form input. Nothing is trimmed or
/// converted; the backend owns interpretation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRequest {
    pub category: String,
    pub weight: String,
    pub condition: String,
    pub age_years: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceResponse {
    pub estimated_value: f64,
    #[serde(default)]
    pub base_rate: Option<f64>,
    #[serde(default)]
    pub condition_factor: Option<f64>,
    #[serde(default)]
    pub age_factor: Option<f64>,
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl PriceResponse {
    pub fn new(estimated_value: f64) -> Self {
        Self {
            estimated_value,
            base_rate: None,
            condition_factor: None,
            age_factor: None,
            currency: default_currency(),
        }
    }
}

fn default_currency() -> String {
    "INR".to_string()
}

/// Outcome of a price calculation.
///
/// `Unavailable` still reports an amount of zero through [`PriceEstimate::amount`]
/// so callers that only want a number keep the old behaviour, while the UI can
/// tell a failed lookup apart from a genuine zero quote.
#[derive(Clone, Debug, PartialEq)]
pub enum PriceEstimate {
    Quoted(PriceResponse),
    Unavailable(String),
}

impl PriceEstimate {
    pub fn amount(&self) -> f64 {
        match self {
            PriceEstimate::Quoted(response) => response.estimated_value,
            PriceEstimate::Unavailable(_) => 0.0,
        }
    }

    pub fn is_quoted(&self) -> bool {
        matches!(self, PriceEstimate::Quoted(_))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    #[default]
    Approved,
}

/// Body of `POST /engineer/submit/{pickup_id}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InspectionSubmission {
    pub total_price: f64,
    pub decision: Decision,
}

impl InspectionSubmission {
    pub fn approved(total_price: f64) -> Self {
        Self {
            total_price,
            decision: Decision::Approved,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResult {
    #[serde(default)]
    pub success: bool,
}

/// Account role, as revealed by where the backend sends a fresh sign-in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    User,
    Engineer,
    Warehouse,
}

impl Role {
    /// Backend page each role lands on, relative to the base URL.
    pub const LANDINGS: [(&'static str, Role); 3] = [
        ("user/request", Role::User),
        ("engineer/dashboard", Role::Engineer),
        ("warehouse/dashboard", Role::Warehouse),
    ];

    pub fn label(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Engineer => "engineer",
            Role::Warehouse => "warehouse",
        }
    }
}

/// Signed-in account for the current backend session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub email: String,
    pub role: Role,
}

/// Fields of the user pickup form, posted as `application/x-www-form-urlencoded`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PickupRequestForm {
    pub area: String,
    pub address: String,
    pub ewaste_type: String,
    pub weight: String,
    pub description: String,
}

impl PickupRequestForm {
    /// Key/value pairs in the shape of the backend's multi-item form.
    pub fn form_pairs(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("area", self.area.as_str()),
            ("address", self.address.as_str()),
            ("ewaste_type[]", self.ewaste_type.as_str()),
            ("weight[]", self.weight.as_str()),
            ("item_description[]", ""),
            ("description", self.description.as_str()),
        ]
    }
}

/// Renders a price the way it appears in the display element: integers
/// without a fractional part, everything else as-is.
pub fn format_price(value: f64) -> String {
    format!("{value}")
}
