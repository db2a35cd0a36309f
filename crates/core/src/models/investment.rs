use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CoreError;

/// A single user-entered investment line.
///
/// Serialized in camelCase so the persisted array keeps the field names
/// front ends already write (`purchasePrice`, `currentPrice`, ...).
/// Arrays written before records carried an `id` still load; the record
/// store derives an identifier for each such record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    /// Stable identifier, survives edits and reordering
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    /// Asset category / ticker (not unique across records)
    pub asset: String,

    /// Number of units held
    pub quantity: f64,

    /// Unit price paid
    pub purchase_price: f64,

    /// Latest known unit price; `None` means "unchanged since purchase"
    #[serde(default)]
    pub current_price: Option<f64>,

    /// Free-form purchase date as typed by the user
    pub purchase_date: String,
}

impl Investment {
    pub fn new(draft: InvestmentDraft) -> Self {
        Self::with_id(Uuid::new_v4(), draft)
    }

    /// Build a record from a draft, keeping an existing identifier (edits).
    pub fn with_id(id: Uuid, draft: InvestmentDraft) -> Self {
        Self {
            id,
            asset: draft.asset,
            quantity: draft.quantity,
            purchase_price: draft.purchase_price,
            current_price: draft.current_price,
            purchase_date: draft.purchase_date,
        }
    }

    /// Unit price used for valuation: the current price if known, else the purchase price.
    pub fn effective_price(&self) -> f64 {
        self.current_price.unwrap_or(self.purchase_price)
    }

    /// quantity × purchase price
    pub fn initial_value(&self) -> f64 {
        self.quantity * self.purchase_price
    }

    /// quantity × (current price ?? purchase price)
    pub fn current_value(&self) -> f64 {
        self.quantity * self.effective_price()
    }
}

/// Validated user input for creating or editing an [`Investment`].
#[derive(Debug, Clone, PartialEq)]
pub struct InvestmentDraft {
    pub asset: String,
    pub quantity: f64,
    pub purchase_price: f64,
    pub current_price: Option<f64>,
    pub purchase_date: String,
}

impl InvestmentDraft {
    /// Build a draft from typed values, applying the basic input checks.
    pub fn new(
        asset: impl Into<String>,
        quantity: f64,
        purchase_price: f64,
        current_price: Option<f64>,
        purchase_date: impl Into<String>,
    ) -> Result<Self, CoreError> {
        let draft = Self {
            asset: asset.into().trim().to_string(),
            quantity,
            purchase_price,
            current_price,
            purchase_date: purchase_date.into().trim().to_string(),
        };
        draft.validate()?;
        Ok(draft)
    }

    /// Build a draft from raw form fields.
    ///
    /// Numbers are trimmed and parsed; a blank current price means "not set".
    pub fn from_form(
        asset: &str,
        quantity: &str,
        purchase_price: &str,
        current_price: &str,
        purchase_date: &str,
    ) -> Result<Self, CoreError> {
        let current_price = match current_price.trim() {
            "" => None,
            raw => Some(parse_number("current price", raw)?),
        };
        Self::new(
            asset,
            parse_number("quantity", quantity)?,
            parse_number("purchase price", purchase_price)?,
            current_price,
            purchase_date,
        )
    }

    fn validate(&self) -> Result<(), CoreError> {
        if self.asset.is_empty() {
            return Err(CoreError::ValidationError("Asset is required".into()));
        }
        if !self.quantity.is_finite() {
            return Err(CoreError::ValidationError(format!(
                "Quantity must be a number, got {}",
                self.quantity
            )));
        }
        if !self.purchase_price.is_finite() {
            return Err(CoreError::ValidationError(format!(
                "Purchase price must be a number, got {}",
                self.purchase_price
            )));
        }
        if let Some(price) = self.current_price {
            if !price.is_finite() {
                return Err(CoreError::ValidationError(format!(
                    "Current price must be a number, got {price}"
                )));
            }
        }
        if self.purchase_date.is_empty() {
            return Err(CoreError::ValidationError("Purchase date is required".into()));
        }
        Ok(())
    }
}

impl From<&Investment> for InvestmentDraft {
    fn from(inv: &Investment) -> Self {
        Self {
            asset: inv.asset.clone(),
            quantity: inv.quantity,
            purchase_price: inv.purchase_price,
            current_price: inv.current_price,
            purchase_date: inv.purchase_date.clone(),
        }
    }
}

fn parse_number(field: &str, raw: &str) -> Result<f64, CoreError> {
    let trimmed = raw.trim();
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CoreError::ValidationError(format!("Invalid {field}: '{trimmed}'")))
}
