mod reader;
mod types;

pub use reader::AuditReader;
pub use types::*;
