pub mod check_ops;
pub mod completions;
pub mod docs;
pub mod embed;
pub mod init;
pub mod metadata;
pub mod version;
