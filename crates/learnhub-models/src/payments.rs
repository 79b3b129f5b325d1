//! Course payments. Managed by admins only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use learnhub_core::pagination::PaginationParams;
use learnhub_core::serde::deserialize_optional_parse;

use crate::enums::PaymentStatus;
use crate::ids::{CourseId, PaymentId, UserId};

pub const PAYMENT_COLUMNS: &str = "id, user_id, course_id, amount, currency, method, status, \
     transaction_id, created_at, updated_at";

pub const DEFAULT_CURRENCY: &str = "USD";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Payment {
    pub id: PaymentId,
    pub user_id: UserId,
    pub course_id: CourseId,
    pub amount: f64,
    #[schema(example = "USD")]
    pub currency: String,
    #[schema(example = "card")]
    pub method: String,
    pub status: PaymentStatus,
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreatePaymentDto {
    pub user_id: UserId,
    pub course_id: CourseId,
    #[validate(range(exclusive_min = 0.0, message = "Amount must be greater than 0"))]
    pub amount: f64,
    #[validate(length(equal = 3, message = "Currency must be a 3-letter code"))]
    pub currency: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Method must be between 1 and 50 characters"))]
    pub method: String,
    pub status: Option<PaymentStatus>,
    #[validate(length(max = 255, message = "Transaction ID cannot exceed 255 characters"))]
    pub transaction_id: Option<String>,
}

impl CreatePaymentDto {
    /// Upper-cased currency, `USD` when absent.
    pub fn currency_code(&self) -> String {
        self.currency
            .as_deref()
            .map(str::to_uppercase)
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string())
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdatePaymentDto {
    #[validate(range(exclusive_min = 0.0, message = "Amount must be greater than 0"))]
    pub amount: Option<f64>,
    #[validate(length(equal = 3, message = "Currency must be a 3-letter code"))]
    pub currency: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Method must be between 1 and 50 characters"))]
    pub method: Option<String>,
    pub status: Option<PaymentStatus>,
    #[validate(length(max = 255, message = "Transaction ID cannot exceed 255 characters"))]
    pub transaction_id: Option<String>,
}

/// `GET /payment` filters.
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaymentFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_parse")]
    pub user: Option<UserId>,
    #[serde(default, deserialize_with = "deserialize_optional_parse")]
    pub course: Option<CourseId>,
    pub status: Option<PaymentStatus>,
    pub method: Option<String>,
    #[serde(rename = "minAmount", default, deserialize_with = "deserialize_optional_parse")]
    pub min_amount: Option<f64>,
    #[serde(rename = "maxAmount", default, deserialize_with = "deserialize_optional_parse")]
    pub max_amount: Option<f64>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}
