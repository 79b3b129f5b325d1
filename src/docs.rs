use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use learnhub_core::{ErrorResponse, PaginationMeta, PaginationParams};
use learnhub_models::auth::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse, RegisterRequest,
    ResetPasswordRequest, TokenResponse, VerifyEmailRequest,
};
use learnhub_models::conversations::{
    Conversation, ConversationDetail, ConversationWithLastMessage, CreateConversationDto,
    CreateMessageDto, Message, UpdateConversationDto,
};
use learnhub_models::course_modules::{CreateModuleDto, Module, UpdateModuleDto};
use learnhub_models::courses::{Course, CreateCourseDto, UpdateCourseDto};
use learnhub_models::payments::{CreatePaymentDto, Payment, UpdatePaymentDto};
use learnhub_models::reviews::{CreateReviewDto, Review, ReviewWithDetails, UpdateReviewDto};
use learnhub_models::users::{CreateUserDto, UpdateUserDto, User};
use learnhub_models::{
    ConversationStatus, ConversationType, CourseStatus, ModuleStatus, PaymentStatus, UserRole,
    UserStatus,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::logout_user,
        crate::modules::auth::controller::refresh_token,
        crate::modules::auth::controller::verify_email,
        crate::modules::auth::controller::forgot_password,
        crate::modules::auth::controller::reset_password,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::delete_user,
        crate::modules::courses::controller::create_course,
        crate::modules::courses::controller::get_courses,
        crate::modules::courses::controller::get_course,
        crate::modules::courses::controller::update_course,
        crate::modules::courses::controller::delete_course,
        crate::modules::course_modules::controller::get_modules,
        crate::modules::course_modules::controller::get_module,
        crate::modules::course_modules::controller::create_module,
        crate::modules::course_modules::controller::update_module,
        crate::modules::course_modules::controller::delete_module,
        crate::modules::reviews::controller::create_review,
        crate::modules::reviews::controller::get_reviews,
        crate::modules::reviews::controller::get_review,
        crate::modules::reviews::controller::update_review,
        crate::modules::reviews::controller::delete_review,
        crate::modules::conversations::controller::create_conversation,
        crate::modules::conversations::controller::get_conversations,
        crate::modules::conversations::controller::get_conversation,
        crate::modules::conversations::controller::update_conversation,
        crate::modules::conversations::controller::delete_conversation,
        crate::modules::conversations::controller::send_message,
        crate::modules::payments::controller::create_payment,
        crate::modules::payments::controller::get_payments,
        crate::modules::payments::controller::get_payment,
        crate::modules::payments::controller::update_payment,
        crate::modules::payments::controller::delete_payment,
    ),
    components(
        schemas(
            ErrorResponse,
            PaginationMeta,
            PaginationParams,
            UserRole,
            UserStatus,
            CourseStatus,
            ModuleStatus,
            ConversationType,
            ConversationStatus,
            PaymentStatus,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            TokenResponse,
            VerifyEmailRequest,
            ForgotPasswordRequest,
            ResetPasswordRequest,
            MessageResponse,
            User,
            CreateUserDto,
            UpdateUserDto,
            Course,
            CreateCourseDto,
            UpdateCourseDto,
            Module,
            CreateModuleDto,
            UpdateModuleDto,
            Review,
            ReviewWithDetails,
            CreateReviewDto,
            UpdateReviewDto,
            Conversation,
            ConversationWithLastMessage,
            ConversationDetail,
            CreateConversationDto,
            UpdateConversationDto,
            Message,
            CreateMessageDto,
            Payment,
            CreatePaymentDto,
            UpdatePaymentDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login, sessions and password recovery"),
        (name = "Users", description = "User accounts"),
        (name = "Courses", description = "Course catalogue"),
        (name = "Modules", description = "Ordered course modules"),
        (name = "Reviews", description = "Course reviews"),
        (name = "Conversations", description = "Direct and group conversations"),
        (name = "Payments", description = "Course payments (admin only)")
    ),
    info(
        title = "LearnHub API",
        version = "0.1.0",
        description = "E-learning REST API built with Rust, Axum, and PostgreSQL.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
