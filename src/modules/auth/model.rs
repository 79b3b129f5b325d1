pub use learnhub_models::auth::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse, RegisterRequest,
    ResetPasswordRequest, TokenResponse, VerifyEmailRequest,
};
