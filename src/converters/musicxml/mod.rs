//! MusicXML format converters

pub mod figured_bass;

pub use figured_bass::{read_figured_bass, write_figured_bass, MusicXmlResult};
