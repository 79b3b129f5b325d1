pub use learnhub_models::reviews::{
    CreateReviewDto, Review, ReviewFilterParams, ReviewWithDetails, UpdateReviewDto,
};
pub use learnhub_models::ReviewId;
