pub mod daily_context;
pub mod user;

pub use daily_context::DailyContextRow;
pub use user::UserRecord;
