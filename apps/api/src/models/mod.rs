pub mod application;
pub mod notification;

pub use application::{Application, ApplicationRow, NewApplication, StatusChange};
pub use notification::{NotificationCategory, OutboundNotification, Recipient};
