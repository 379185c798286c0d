//! YAML output generation for the harvested tree.

mod mapping;
mod writer;

pub use mapping::{MappingValue, ToMapping};
pub use writer::{generate_yaml, output_file_name, save_yaml};
