//! Trades module - domain model and query trait.

mod trades_model;
mod trades_traits;


// Re-export the public interface
pub use trades_model::Trade;
pub use trades_traits::TradeQueryRepositoryTrait;
