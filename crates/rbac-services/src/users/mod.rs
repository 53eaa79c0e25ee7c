//! User services

mod create;
mod delete;
mod read;
mod update;

pub use create::CreateUserService;
pub use delete::DeleteUserService;
pub use read::ReadUsersService;
pub use update::{UpdateUserService, UserUpdate};
