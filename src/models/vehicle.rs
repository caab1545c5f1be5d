use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A client-only row. Never sent to the server.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub id: Uuid,
    pub make: String,
    pub model: String,
    pub price: f64,
    pub electric: bool,
}

impl Vehicle {
    pub fn price_label(&self) -> String {
        format_usd(self.price)
    }

    pub fn electric_label(&self) -> &'static str {
        if self.electric {
            "Yes"
        } else {
            "No"
        }
    }
}

/// Raw text as typed into the add form.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct VehicleForm {
    pub make: String,
    pub model: String,
    pub price: String,
    pub electric: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VehicleFormError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("price '{0}' is not a valid amount")]
    InvalidPrice(String),
    #[error("electric '{0}' must be true/false or yes/no")]
    InvalidElectric(String),
}

impl VehicleForm {
    pub fn new(make: &str, model: &str, price: &str, electric: &str) -> Self {
        Self {
            make: make.to_string(),
            model: model.to_string(),
            price: price.to_string(),
            electric: electric.to_string(),
        }
    }

    pub fn parse(&self) -> Result<Vehicle, VehicleFormError> {
        let make = required("make", &self.make)?;
        let model = required("model", &self.model)?;
        let price = parse_price(required("price", &self.price)?)?;
        let electric = parse_electric(required("electric", &self.electric)?)?;

        Ok(Vehicle {
            id: Uuid::new_v4(),
            make: make.to_string(),
            model: model.to_string(),
            price,
            electric,
        })
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, VehicleFormError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(VehicleFormError::Required(field));
    }
    Ok(value)
}

/// Upper bound (exclusive) on a vehicle price. Keeps the cent count well
/// inside `u64` for `format_usd`.
pub const MAX_PRICE: f64 = 1_000_000_000_000.0;

pub fn parse_price(raw: &str) -> Result<f64, VehicleFormError> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    match cleaned.parse::<f64>() {
        Ok(price) if price.is_finite() && (0.0..MAX_PRICE).contains(&price) => Ok(price),
        _ => Err(VehicleFormError::InvalidPrice(raw.to_string())),
    }
}

pub fn parse_electric(raw: &str) -> Result<bool, VehicleFormError> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Ok(true),
        "false" | "no" | "n" | "0" => Ok(false),
        _ => Err(VehicleFormError::InvalidElectric(raw.to_string())),
    }
}

/// `40000.0` -> `$40,000`, `1234.5` -> `$1,234.50`.
pub fn format_usd(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let dollars = cents / 100;
    let rem = cents % 100;

    let digits = dollars.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    if rem == 0 {
        format!("{sign}${grouped}")
    } else {
        format!("{sign}${grouped}.{rem:02}")
    }
}
