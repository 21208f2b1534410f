mod build;
mod info;
mod init;
mod plan;

pub use build::cmd_build;
pub use info::cmd_info;
pub use init::cmd_init;
pub use plan::cmd_plan;
