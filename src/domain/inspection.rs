//! Price estimation and the engineer's inspection submission.
//!
//! Both flows run against an [`InspectionView`], the view-model of the
//! inspection page, so they never reach into page state directly.

use crate::infra::backend::EngineerApi;

use super::entities::{format_price, InspectionSubmission, PriceEstimate, PriceRequest};

pub const DASHBOARD_PATH: &str = "/engineer/dashboard";
pub const COLLECTED_MESSAGE: &str = "Pickup collected successfully!";
pub const SUBMIT_ERROR_MESSAGE: &str = "Error submitting inspection";

#[allow(async_fn_in_trait)]
pub trait InspectionView {
    /// Raw values of the category, weight, condition and age fields.
    fn price_request(&self) -> PriceRequest;
    fn pickup_id(&self) -> String;
    fn show_price(&mut self, text: String);
    /// Blocking yes/no prompt.
    async fn confirm(&mut self, message: String) -> bool;
    fn alert(&mut self, message: &str);
    fn navigate(&mut self, path: &str);
}

#[derive(Clone, Debug, PartialEq)]
pub enum SubmitOutcome {
    /// The engineer declined the confirmation prompt.
    Cancelled,
    /// The backend accepted the inspection at this price.
    Collected { total_price: f64 },
    /// The backend answered without `success: true`.
    Rejected,
    /// The submission never got a usable answer.
    Failed(String),
}

/// Fetches an estimate for the current field values and writes it to the
/// price display. Failures are logged and leave the display untouched.
pub async fn calculate_price<A, V>(api: &A, view: &mut V) -> PriceEstimate
where
    A: EngineerApi,
    V: InspectionView,
{
    let request = view.price_request();
    match api.calculate_price(&request).await {
        Ok(response) => {
            tracing::debug!(estimated_value = response.estimated_value, "price estimate received");
            view.show_price(format_price(response.estimated_value));
            PriceEstimate::Quoted(response)
        }
        Err(err) => {
            tracing::warn!(error = %err, "error calculating price");
            PriceEstimate::Unavailable(err.to_string())
        }
    }
}

/// Re-prices the pickup, asks for confirmation, and records an approved
/// inspection. Only a `success: true` answer has a visible effect beyond the
/// prompt; a transport or decode failure raises a generic alert.
pub async fn submit_inspection<A, V>(api: &A, view: &mut V) -> SubmitOutcome
where
    A: EngineerApi,
    V: InspectionView,
{
    let pickup_id = view.pickup_id();
    let estimate = calculate_price(api, view).await;
    let price = estimate.amount();

    if !view.confirm(confirmation_message(&estimate)).await {
        tracing::debug!(%pickup_id, "inspection cancelled at confirmation");
        return SubmitOutcome::Cancelled;
    }

    let submission = InspectionSubmission::approved(price);
    match api.submit_inspection(&pickup_id, &submission).await {
        Ok(result) if result.success => {
            tracing::info!(%pickup_id, price, "pickup collected");
            view.alert(COLLECTED_MESSAGE);
            view.navigate(DASHBOARD_PATH);
            SubmitOutcome::Collected { total_price: price }
        }
        Ok(_) => {
            // No user-facing branch for a refused inspection yet.
            tracing::warn!(%pickup_id, "backend did not accept the inspection");
            SubmitOutcome::Rejected
        }
        Err(err) => {
            tracing::error!(%pickup_id, error = %err, "inspection submission failed");
            view.alert(SUBMIT_ERROR_MESSAGE);
            SubmitOutcome::Failed(err.to_string())
        }
    }
}

pub fn confirmation_message(estimate: &PriceEstimate) -> String {
    let price = format_price(estimate.amount());
    match estimate {
        PriceEstimate::Quoted(_) => format!("Confirm collection at ₹{price}?"),
        PriceEstimate::Unavailable(_) => {
            format!("Confirm collection at ₹{price}? (price estimate unavailable)")
        }
    }
}
