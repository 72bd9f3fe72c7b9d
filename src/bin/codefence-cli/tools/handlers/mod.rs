//! Built-in tool handlers.

mod file_read;
mod file_write;
mod ls;
mod run_python;

pub use file_read::file_read_tool;
pub use file_write::file_write_tool;
pub use ls::ls_tool;
pub use run_python::run_python_tool;
