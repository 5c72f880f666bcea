//! Applying overrides to target files
//!
//! Both updaters compare current values with the desired ones, record a
//! [`Change`](crate::domain::Change) for every difference and persist the
//! new content only when not simulating.

pub mod properties;
pub mod xml;

pub use properties::{rewrite_properties, update_properties_file, ConfigLine};
pub use xml::{update_xml_file, XmlDocument, XmlError};
