pub mod forms;
pub mod path;
