//! Catalog exporters
//!
//! An export writes three files into an output directory, one per catalog
//! section: `global-methods<ext>`, `global-properties<ext>` and
//! `types<ext>`. The JSON layout is the one [`JsonCatalog`] reads back.
//!
//! [`JsonCatalog`]: platform_context_core::catalog::JsonCatalog

mod json;
mod markdown;
mod xml;

pub use json::JsonExporter;
pub use markdown::MarkdownExporter;
pub use xml::XmlExporter;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use platform_context_core::catalog::{MethodElement, PropertyElement, TypeElement};
use platform_context_core::index::CatalogIndex;
use tracing::info;

use crate::error::Result;

/// Writes one catalog section at a time to an output stream.
pub trait Exporter {
    /// File extension including the leading dot.
    fn extension(&self) -> &'static str;

    fn write_methods(&self, methods: &[&MethodElement], out: &mut dyn Write) -> Result<()>;

    fn write_properties(&self, properties: &[&PropertyElement], out: &mut dyn Write)
        -> Result<()>;

    fn write_types(&self, types: &[&TypeElement], out: &mut dyn Write) -> Result<()>;
}

/// Export formats selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Xml,
    Markdown,
}

impl ExportFormat {
    pub fn exporter(self) -> Box<dyn Exporter> {
        match self {
            ExportFormat::Json => Box::new(JsonExporter),
            ExportFormat::Xml => Box::new(XmlExporter),
            ExportFormat::Markdown => Box::new(MarkdownExporter),
        }
    }
}

/// Write all three sections of `index` into `dir`, creating it if needed.
///
/// Returns the written file paths in section order.
pub fn export_catalog(
    index: &CatalogIndex,
    exporter: &dyn Exporter,
    dir: &Path,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let ext = exporter.extension();

    let methods: Vec<&MethodElement> = index.methods().collect();
    let properties: Vec<&PropertyElement> = index.properties().collect();
    let types: Vec<&TypeElement> = index.types().collect();

    let methods_path = dir.join(format!("global-methods{}", ext));
    write_file(&methods_path, |out| exporter.write_methods(&methods, out))?;
    info!(path = %methods_path.display(), count = methods.len(), "Exported global methods");

    let properties_path = dir.join(format!("global-properties{}", ext));
    write_file(&properties_path, |out| {
        exporter.write_properties(&properties, out)
    })?;
    info!(path = %properties_path.display(), count = properties.len(), "Exported global properties");

    let types_path = dir.join(format!("types{}", ext));
    write_file(&types_path, |out| exporter.write_types(&types, out))?;
    info!(path = %types_path.display(), count = types.len(), "Exported types");

    Ok(vec![methods_path, properties_path, types_path])
}

fn write_file(path: &Path, write: impl FnOnce(&mut dyn Write) -> Result<()>) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    let out: &mut dyn Write = &mut file;
    write(out)?;
    file.flush()?;
    Ok(())
}
