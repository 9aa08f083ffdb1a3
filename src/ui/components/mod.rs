pub mod confirm_dialog;
pub mod kpi_card;
pub mod toast;
