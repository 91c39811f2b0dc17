//! SQLite storage implementation for positions.

mod model;
mod repository;

pub use model::PositionDB;
pub use repository::PositionQueryRepository;
