pub mod email;
pub mod error;
pub mod fees;
pub mod member;
pub mod money;
pub mod reference;
pub mod transaction;
