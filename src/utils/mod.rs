pub mod time;
pub mod validation;
