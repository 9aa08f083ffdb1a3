//! Domain logic for pickup pricing, inspection and request validation.

pub mod app_state;
pub mod entities;
pub mod form_guard;
pub mod inspection;

#[allow(unused_imports)]
pub use app_state::{AppState, CollectedPickup, PersistedState};
#[allow(unused_imports)]
pub use entities::{
    format_price, Account, Decision, InspectionSubmission, PickupId, PickupRequestForm,
    PriceEstimate, PriceRequest, PriceResponse, Role, SubmissionResult, CATEGORIES, CONDITIONS,
};
#[allow(unused_imports)]
pub use form_guard::{FormGuard, GuardVerdict, GuardedForm, SubmitControl, WeightInput};
#[allow(unused_imports)]
pub use inspection::{
    calculate_price, submit_inspection, InspectionView, SubmitOutcome, DASHBOARD_PATH,
};
