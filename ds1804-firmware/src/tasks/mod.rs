//! Embassy tasks

pub mod pot;

pub use pot::pot_task;
