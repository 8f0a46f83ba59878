// Domain layer - Pure plotting types and functions
pub mod color;
pub mod expression;
pub mod query_result;
pub mod render;
pub mod series;
