mod admin;
mod asset;
mod employee;
mod ticket;

pub use admin::AdminUser;
pub use asset::{AssetRow, NewAsset};
pub use employee::{Employee, EmployeeUpdate, NewEmployee};
pub use ticket::Ticket;
