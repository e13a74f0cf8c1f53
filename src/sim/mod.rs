pub mod event;
pub mod save;
pub mod session;
