pub mod deploy;
pub mod environment;
pub mod manifest;
