pub mod event;
pub mod registration;
pub mod trending;

pub use event::Event;
pub use registration::{Registration, RegistrationForm, RegistrationHistory, MAX_FIELD_LEN};
pub use trending::TrendingEntry;
