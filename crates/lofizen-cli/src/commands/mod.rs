pub mod clear;
pub mod session;
pub mod settings;
pub mod stats;
pub mod timer;
pub mod todo;
pub mod video;
