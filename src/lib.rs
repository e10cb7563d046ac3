#[macro_use]
extern crate log;
#[macro_use]
extern crate anyhow;

pub mod course;
pub mod export_data;
pub mod import_data;
pub mod logs;
pub mod track;
pub mod track_processor;
