pub mod config;
pub mod controller;
pub mod error;
pub mod error_utils;
pub mod export;
pub mod highlight;
pub mod types;

pub use config::*;
pub use controller::*;
pub use error::*;
pub use error_utils::*;
pub use export::*;
pub use highlight::*;
pub use types::*;
