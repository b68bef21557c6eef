pub mod delete;
pub mod deploy;
pub mod logs;
pub mod restart;
pub mod scale;
pub mod status;
