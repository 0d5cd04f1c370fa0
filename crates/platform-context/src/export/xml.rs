//! Streaming XML export
//!
//! Elements are written as they are visited; nothing is buffered beyond the
//! output writer. Optional fields are omitted rather than written empty.

use std::io::{self, Write};

use platform_context_core::catalog::{
    MethodElement, Parameter, PropertyElement, Signature, TypeElement,
};

use super::Exporter;
use crate::error::Result;

const INDENT: &str = "  ";

pub struct XmlExporter;

impl Exporter for XmlExporter {
    fn extension(&self) -> &'static str {
        ".xml"
    }

    fn write_methods(&self, methods: &[&MethodElement], out: &mut dyn Write) -> Result<()> {
        let mut xml = XmlWriter::new(out);
        xml.declaration()?;
        xml.open("methods")?;
        for method in methods {
            write_method(&mut xml, method)?;
        }
        xml.close("methods")?;
        Ok(())
    }

    fn write_properties(
        &self,
        properties: &[&PropertyElement],
        out: &mut dyn Write,
    ) -> Result<()> {
        let mut xml = XmlWriter::new(out);
        xml.declaration()?;
        xml.open("properties")?;
        for property in properties {
            write_property(&mut xml, property)?;
        }
        xml.close("properties")?;
        Ok(())
    }

    fn write_types(&self, types: &[&TypeElement], out: &mut dyn Write) -> Result<()> {
        let mut xml = XmlWriter::new(out);
        xml.declaration()?;
        xml.open("types")?;
        for ty in types {
            xml.open("type")?;
            xml.text("name", &ty.name)?;
            xml.optional("description", ty.description.as_deref())?;
            for method in &ty.methods {
                write_method(&mut xml, method)?;
            }
            for property in &ty.properties {
                write_property(&mut xml, property)?;
            }
            for constructor in &ty.constructors {
                write_signature(&mut xml, "constructor", constructor)?;
            }
            xml.close("type")?;
        }
        xml.close("types")?;
        Ok(())
    }
}

fn write_method<W: Write>(xml: &mut XmlWriter<W>, method: &MethodElement) -> io::Result<()> {
    xml.open("method")?;
    xml.text("name", &method.name)?;
    xml.optional("name_en", method.alias.as_deref())?;
    xml.optional("description", method.description.as_deref())?;
    for signature in &method.signatures {
        write_signature(xml, "signature", signature)?;
    }
    xml.optional("return", method.return_type.as_deref())?;
    xml.close("method")
}

fn write_property<W: Write>(xml: &mut XmlWriter<W>, property: &PropertyElement) -> io::Result<()> {
    xml.open("property")?;
    xml.text("name", &property.name)?;
    xml.optional("name_en", property.alias.as_deref())?;
    xml.optional("description", property.description.as_deref())?;
    xml.text("readonly", if property.readonly { "true" } else { "false" })?;
    xml.optional("type", property.type_name.as_deref())?;
    xml.close("property")
}

fn write_signature<W: Write>(
    xml: &mut XmlWriter<W>,
    tag: &str,
    signature: &Signature,
) -> io::Result<()> {
    xml.open(tag)?;
    xml.text("name", &signature.name)?;
    xml.optional("description", signature.description.as_deref())?;
    for param in &signature.params {
        write_param(xml, param)?;
    }
    xml.close(tag)
}

fn write_param<W: Write>(xml: &mut XmlWriter<W>, param: &Parameter) -> io::Result<()> {
    xml.open("param")?;
    xml.text("name", &param.name)?;
    xml.optional("description", param.description.as_deref())?;
    xml.optional("type", param.type_name.as_deref())?;
    xml.text("required", if param.required { "true" } else { "false" })?;
    xml.close("param")
}

/// Indenting element writer over any `Write`.
struct XmlWriter<W: Write> {
    out: W,
    depth: usize,
}

impl<W: Write> XmlWriter<W> {
    fn new(out: W) -> Self {
        Self { out, depth: 0 }
    }

    fn declaration(&mut self) -> io::Result<()> {
        writeln!(self.out, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")
    }

    fn indent(&mut self) -> io::Result<()> {
        for _ in 0..self.depth {
            self.out.write_all(INDENT.as_bytes())?;
        }
        Ok(())
    }

    fn open(&mut self, tag: &str) -> io::Result<()> {
        self.indent()?;
        writeln!(self.out, "<{}>", tag)?;
        self.depth += 1;
        Ok(())
    }

    fn close(&mut self, tag: &str) -> io::Result<()> {
        self.depth = self.depth.saturating_sub(1);
        self.indent()?;
        writeln!(self.out, "</{}>", tag)
    }

    fn text(&mut self, tag: &str, value: &str) -> io::Result<()> {
        self.indent()?;
        writeln!(self.out, "<{}>{}</{}>", tag, escape_xml(value), tag)
    }

    fn optional(&mut self, tag: &str, value: Option<&str>) -> io::Result<()> {
        match value {
            Some(value) => self.text(tag, value),
            None => Ok(()),
        }
    }
}

/// Escape the five XML special characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
