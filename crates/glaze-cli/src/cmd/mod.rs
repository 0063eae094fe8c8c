pub mod audit;
pub mod config;
pub mod detect;
pub mod init;
pub mod patch;
pub mod scrub;
pub mod verify;
