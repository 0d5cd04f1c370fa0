//! Pretty JSON arrays in the catalog dump format

use std::io::Write;

use platform_context_core::catalog::{MethodElement, PropertyElement, TypeElement};
use serde::Serialize;

use super::Exporter;
use crate::error::Result;

pub struct JsonExporter;

impl JsonExporter {
    fn write_array<T: Serialize>(items: &[&T], out: &mut dyn Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut *out, items)?;
        writeln!(out)?;
        Ok(())
    }
}

impl Exporter for JsonExporter {
    fn extension(&self) -> &'static str {
        ".json"
    }

    fn write_methods(&self, methods: &[&MethodElement], out: &mut dyn Write) -> Result<()> {
        Self::write_array(methods, out)
    }

    fn write_properties(
        &self,
        properties: &[&PropertyElement],
        out: &mut dyn Write,
    ) -> Result<()> {
        Self::write_array(properties, out)
    }

    fn write_types(&self, types: &[&TypeElement], out: &mut dyn Write) -> Result<()> {
        Self::write_array(types, out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_methods_use_dump_field_names() {
        let method = MethodElement::new("Сообщить").alias("Message").returns("Булево");
        let mut out = Vec::new();
        JsonExporter.write_methods(&[&method], &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["name_en"], "Message");
        assert_eq!(value[0]["return"], "Булево");
        assert!(value[0]["signature"].as_array().unwrap().is_empty());
    }
}
