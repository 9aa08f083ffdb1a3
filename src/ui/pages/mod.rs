pub mod dashboard;
pub mod inspection;
pub mod pickup_request;
pub mod settings;

pub use dashboard::DashboardPage;
pub use inspection::InspectionPage;
pub use pickup_request::PickupRequestPage;
pub use settings::SettingsPage;
