pub mod badges;
pub mod feedback;
pub mod server_status;
pub mod ui;

pub use badges::*;
pub use feedback::*;
pub use server_status::ServerStatus;
