// Application layer - Plotting use cases and collaborator seams
pub mod broadcast;
pub mod coloring;
pub mod error;
pub mod normalizer;
pub mod plot_service;
pub mod query_backend;
pub mod range_executor;
pub mod renderer;
