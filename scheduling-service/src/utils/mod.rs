pub mod body;
pub mod token;

pub use body::JsonOrForm;
pub use token::bearer_token;
