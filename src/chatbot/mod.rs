pub mod error;
pub mod gateway;

pub use error::ChatbotError;
pub use gateway::ChatbotGateway;
