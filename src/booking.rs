// Booking creation
// Turns ticked "Confirmed Events" rows into booking/signee rows and the deal memo payload.
use crate::activity_log::{LogEntry, Outcome};
use crate::dates::format_dmy;
use crate::deal_memo::DealMemoPayload;
use crate::fees::{calculate_fees, FeeCalculation};
use crate::pricing::SeasonalPricing;
use crate::selection::{SelectedEvents, SelectionError};
use crate::types::FeeTotal;
use chrono::{Local, NaiveDate, NaiveDateTime};
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::OnceLock;
use thiserror::Error;
use tracing::info;

pub const CUSTOM_FEES_EXPLANATION: &str = "Custom Fees";
pub const BOOKING_CREATED_ACTION: &str = "Booking Created";

const SIGNEE_ID_PREFIX: &str = "SIGN ";
const SHORT_ID_LEN: usize = 6;
// Blank columns between the signee ID and the latest event date
const BOOKING_ROW_GAP: usize = 10;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BookingError {
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Invalid {field} entered: {input:?}. Please enter a valid number.")]
    InvalidAmount { field: &'static str, input: String },

    #[error("The first selected event has no name")]
    MissingEventName,

    #[error(transparent)]
    Selection(#[from] SelectionError),
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
    })
}

pub fn validate_email(email: &str) -> bool {
    email_pattern().is_match(email)
}

// Accepts "1000" or "£1,250.50"
pub fn parse_amount(field: &'static str, input: &str) -> Result<f64, BookingError> {
    let cleaned = input.trim().trim_start_matches('£').replace(',', "");
    cleaned
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .ok_or_else(|| BookingError::InvalidAmount {
            field,
            input: input.to_string(),
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeeOverride {
    pub hire_fee: f64,
    pub bar_deposit: f64,
    pub deposit_returned_on: f64,
    pub half_hire_fee_returned_on: f64,
}

impl FeeOverride {
    pub fn parse(
        hire_fee: &str,
        bar_deposit: &str,
        deposit_returned_on: &str,
        half_hire_fee_returned_on: &str,
    ) -> Result<Self, BookingError> {
        Ok(Self {
            hire_fee: parse_amount("hire fee", hire_fee)?,
            bar_deposit: parse_amount("bar deposit", bar_deposit)?,
            deposit_returned_on: parse_amount("deposit returned on value", deposit_returned_on)?,
            half_hire_fee_returned_on: parse_amount(
                "half hire fee returned on value",
                half_hire_fee_returned_on,
            )?,
        })
    }

    // The discounted hire figure is not part of the override and is kept
    pub fn apply(&self, fees: FeeTotal) -> FeeTotal {
        FeeTotal {
            hire_fee: self.hire_fee,
            bar_deposit: self.bar_deposit,
            deposit_returned_on: self.deposit_returned_on,
            half_hire_fee_returned_on: self.half_hire_fee_returned_on,
            discounted_hire: fees.discounted_hire,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgreedFees {
    pub fees: FeeTotal,
    pub explanation: String,
}

impl AgreedFees {
    pub fn from_calculation(calculation: &FeeCalculation) -> Self {
        Self {
            fees: calculation.total,
            explanation: calculation.explanation_text(),
        }
    }

    pub fn with_override(self, fee_override: &FeeOverride) -> Self {
        Self {
            fees: fee_override.apply(self.fees),
            explanation: CUSTOM_FEES_EXPLANATION.to_string(),
        }
    }

    // Text shown to the operator before the booking is committed
    pub fn summary(&self) -> String {
        format!(
            "The hire fee for the selected events is £{}.\n\n{}\n\n\
             The bar deposit is {}\n\
             The value that the deposit is returned on is {}\n\
             The value that 50% of the hire fee is returned on is {}",
            self.fees.hire_fee,
            self.explanation,
            self.fees.bar_deposit,
            self.fees.deposit_returned_on,
            self.fees.half_hire_fee_returned_on
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingIds {
    pub booking_id: String,
    pub signee_id: String,
}

impl BookingIds {
    pub fn generate(first_event_name: &str) -> Self {
        Self::generate_with(first_event_name, &mut rand::thread_rng())
    }

    pub fn generate_with<R: Rng>(first_event_name: &str, rng: &mut R) -> Self {
        Self {
            booking_id: format!("{}{}", first_event_name, short_id(rng)),
            signee_id: format!("{}{}", SIGNEE_ID_PREFIX, short_id(rng)),
        }
    }
}

fn short_id<R: Rng>(rng: &mut R) -> String {
    let bound = 1u32 << (4 * SHORT_ID_LEN);
    format!("{:0width$x}", rng.gen_range(0..bound), width = SHORT_ID_LEN)
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookingRequest {
    pub email: String,
    pub subject: String,
    pub fee_override: Option<FeeOverride>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub ids: BookingIds,
    pub created_at: NaiveDateTime,
    pub latest_event_date: NaiveDate,
    pub fees: AgreedFees,
    pub email: String,
    pub subject: String,
    // "Confirmed Events" rows that get the booking ID written back
    pub event_rows: Vec<usize>,
}

pub fn prepare_booking(
    selected: &SelectedEvents,
    pricing: &SeasonalPricing,
    request: BookingRequest,
) -> Result<NewBooking, BookingError> {
    let email = request.email.trim().to_string();
    if !validate_email(&email) {
        return Err(BookingError::InvalidEmail(request.email));
    }

    let latest_event_date = selected
        .latest_event_date()
        .ok_or(SelectionError::NothingSelected)?;
    let first_event_name = selected
        .first_event_name()
        .ok_or(BookingError::MissingEventName)?;

    let calculation = calculate_fees(&selected.selections, pricing);
    let mut fees = AgreedFees::from_calculation(&calculation);
    if let Some(fee_override) = &request.fee_override {
        fees = fees.with_override(fee_override);
    }

    let ids = BookingIds::generate(first_event_name);
    info!(
        booking_id = %ids.booking_id,
        hire_fee = fees.fees.hire_fee,
        custom = request.fee_override.is_some(),
        "Prepared booking"
    );

    Ok(NewBooking {
        ids,
        created_at: Local::now().naive_local(),
        latest_event_date,
        fees,
        email,
        subject: request.subject,
        event_rows: selected.row_indices.clone(),
    })
}

impl NewBooking {
    pub fn latest_event_date_text(&self) -> String {
        format_dmy(self.latest_event_date)
    }

    pub fn created_at_text(&self) -> String {
        self.created_at.format("%d/%m/%Y, %H:%M:%S").to_string()
    }

    // Spreadsheet serial day number (days since 30/12/1899)
    pub fn latest_event_serial(&self) -> i64 {
        let epoch = NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or_default();
        (self.latest_event_date - epoch).num_days()
    }

    // "Bookings" sheet row
    pub fn booking_row(&self) -> Vec<Value> {
        let mut row = vec![
            json!(self.ids.booking_id),
            json!(self.created_at_text()),
            json!(self.ids.signee_id),
        ];
        row.extend(std::iter::repeat(json!("")).take(BOOKING_ROW_GAP));
        row.push(json!(self.latest_event_date_text()));
        row.push(json!(""));
        row.push(json!(""));
        row.push(json!(self.latest_event_serial()));
        row
    }

    pub fn signee_row(&self) -> Vec<Value> {
        vec![json!(self.ids.signee_id), json!(self.ids.booking_id)]
    }

    pub fn log_entry(&self) -> LogEntry {
        LogEntry::new(BOOKING_CREATED_ACTION, Outcome::Success, self.ids.booking_id.as_str())
            .at(self.created_at)
    }

    pub fn deal_memo(&self, booking_sheet_row: usize, signee_sheet_row: usize) -> DealMemoPayload {
        DealMemoPayload {
            booking_id: self.ids.booking_id.clone(),
            signee_id: self.ids.signee_id.clone(),
            booking_sheet_row_number: booking_sheet_row,
            signee_sheet_row_number: signee_sheet_row,
            email: self.email.clone(),
            hire_fee: self.fees.fees.hire_fee,
            bar_deposit: self.fees.fees.bar_deposit,
            deposit_returned_on: self.fees.fees.deposit_returned_on,
            half_hire_fee_returned_on: self.fees.fees.half_hire_fee_returned_on,
            subject: self.subject.clone(),
            latest_event_date: self.latest_event_date_text(),
        }
    }
}
