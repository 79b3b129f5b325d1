pub use learnhub_models::payments::{
    CreatePaymentDto, PAYMENT_COLUMNS, Payment, PaymentFilterParams, UpdatePaymentDto,
};
pub use learnhub_models::{PaymentId, PaymentStatus};
