pub mod scan;
pub mod show;
