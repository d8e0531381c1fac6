pub mod charts;
pub mod consolidate;
pub mod process;
pub mod run;
