pub mod category;
pub mod device;
pub mod health_unit;
pub mod notification;
pub mod question;
pub mod respondent;
pub mod response;
pub mod user;
