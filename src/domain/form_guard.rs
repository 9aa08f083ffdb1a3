//! Submit-time and keystroke guards for the pickup request form.
//!
//! The guard owns the weight input and the submit control of the form it is
//! attached to. Without a form it stays inert and lets everything through.

pub const WEIGHT_ERROR_CLASS: &str = "error-border";
pub const INVALID_WEIGHT_MESSAGE: &str = "Please enter a valid positive weight.";
pub const SUBMIT_LABEL: &str = "Request Pickup";
pub const SUBMITTING_LABEL: &str = "Submitting...";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WeightInput {
    pub value: String,
    pub has_error: bool,
}

impl WeightInput {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            has_error: false,
        }
    }

    pub fn class_list(&self) -> &'static str {
        if self.has_error {
            WEIGHT_ERROR_CLASS
        } else {
            ""
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmitControl {
    pub disabled: bool,
    pub label: String,
}

impl Default for SubmitControl {
    fn default() -> Self {
        Self {
            disabled: false,
            label: SUBMIT_LABEL.to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GuardedForm {
    pub weight: WeightInput,
    pub submit: SubmitControl,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardVerdict {
    /// Let the form submission go ahead.
    Proceed,
    /// Cancel the submission and tell the user why.
    Blocked { message: &'static str },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormGuard {
    form: Option<GuardedForm>,
}

impl FormGuard {
    pub fn attach(form: Option<GuardedForm>) -> Self {
        if form.is_none() {
            tracing::debug!("no pickup form present; form guard inert");
        }
        Self { form }
    }

    pub fn is_inert(&self) -> bool {
        self.form.is_none()
    }

    pub fn form(&self) -> Option<&GuardedForm> {
        self.form.as_ref()
    }

    pub fn weight_value(&self) -> &str {
        self.form
            .as_ref()
            .map(|form| form.weight.value.as_str())
            .unwrap_or_default()
    }

    /// Submit handler. A valid weight locks the submit control; an invalid one
    /// flags the field and blocks the submission.
    pub fn on_submit(&mut self) -> GuardVerdict {
        let Some(form) = self.form.as_mut() else {
            return GuardVerdict::Proceed;
        };

        if !is_valid_weight(&form.weight.value) {
            tracing::info!(weight = %form.weight.value, "blocked pickup submission with invalid weight");
            form.weight.has_error = true;
            return GuardVerdict::Blocked {
                message: INVALID_WEIGHT_MESSAGE,
            };
        }

        form.weight.has_error = false;
        form.submit.disabled = true;
        form.submit.label = SUBMITTING_LABEL.to_string();
        GuardVerdict::Proceed
    }

    /// Input handler. Returns `true` when the value was clamped.
    pub fn on_input(&mut self, value: impl Into<String>) -> bool {
        let Some(form) = self.form.as_mut() else {
            return false;
        };
        let value = value.into();
        if to_number(&value) < 0.0 {
            form.weight.value = "0".to_string();
            true
        } else {
            form.weight.value = value;
            false
        }
    }

    /// Called once the submission request has finished. A successful request
    /// clears the field for the next pickup; a failed one unlocks the control.
    pub fn on_submission_settled(&mut self, succeeded: bool) {
        if let Some(form) = self.form.as_mut() {
            if succeeded {
                form.weight = WeightInput::default();
            }
            form.submit = SubmitControl::default();
        }
    }
}

pub fn is_valid_weight(raw: &str) -> bool {
    let weight = parse_float(raw);
    !weight.is_nan() && weight > 0.0
}

/// Parses the longest numeric prefix of `raw`, after leading whitespace, and
/// yields NaN when there is none. `"12kg"` is 12, `"kg12"` is NaN.
pub fn parse_float(raw: &str) -> f64 {
    let text = raw.trim_start();
    let bytes = text.as_bytes();
    let len = bytes.len();

    let mut end = 0;
    if matches!(bytes.first().copied(), Some(b'+' | b'-')) {
        end = 1;
    }
    if text[end..].starts_with("Infinity") {
        return if bytes[0] == b'-' {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let int_start = end;
    while end < len && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < len && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        while frac_end < len && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        let frac_digits = frac_end - end - 1;
        if digits > 0 || frac_digits > 0 {
            end = frac_end;
            digits += frac_digits;
        }
    }

    if digits == 0 {
        return f64::NAN;
    }

    if end < len && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < len && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < len && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    text[..end].parse::<f64>().unwrap_or(f64::NAN)
}

/// Whole-string numeric conversion used for comparisons against the live
/// input value: blank is 0, anything with trailing junk is NaN.
pub fn to_number(raw: &str) -> f64 {
    let text = raw.trim();
    if text.is_empty() {
        return 0.0;
    }
    match text {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    let numeric = text
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    if !numeric {
        return f64::NAN;
    }
    text.parse::<f64>().unwrap_or(f64::NAN)
}
