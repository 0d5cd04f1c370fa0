//! Snippet-style Markdown export
//!
//! Each element becomes a `TITLE:`/`DESCRIPTION:` snippet; snippets are
//! separated by a dashed line.

use std::io::{self, Write};

use platform_context_core::catalog::{MethodElement, Parameter, PropertyElement, TypeElement};

use super::Exporter;
use crate::error::Result;

const SEPARATOR: &str = "----------------------------------------";
const NO_PARAM_DETAILS: &str = "(No specific parameter details provided for this general signature)";

pub struct MarkdownExporter;

impl Exporter for MarkdownExporter {
    fn extension(&self) -> &'static str {
        ".md"
    }

    fn write_methods(&self, methods: &[&MethodElement], out: &mut dyn Write) -> Result<()> {
        write_snippets(out, methods, |out, method| {
            snippet_start(
                out,
                &format!("Global Method: {}", method.name),
                method.description.as_deref(),
            )?;
            writeln!(out, "Name: {}", method.name)?;
            writeln!(out)?;
            writeln!(out, "Signatures:")?;
            write_signatures(out, method, "  ")
        })
    }

    fn write_properties(
        &self,
        properties: &[&PropertyElement],
        out: &mut dyn Write,
    ) -> Result<()> {
        write_snippets(out, properties, |out, property| {
            snippet_start(
                out,
                &format!("Global Property: {}", property.name),
                property.description.as_deref(),
            )?;
            writeln!(out, "Name: {}", property.name)?;
            writeln!(out, "Readonly: {}", property.readonly)?;
            if let Some(type_name) = non_empty(property.type_name.as_deref()) {
                writeln!(out, "Type: {}", type_name)?;
            }
            Ok(())
        })
    }

    fn write_types(&self, types: &[&TypeElement], out: &mut dyn Write) -> Result<()> {
        write_snippets(out, types, |out, ty| {
            snippet_start(out, &format!("Type: {}", ty.name), ty.description.as_deref())?;
            writeln!(out, "Name: {}", ty.name)?;

            writeln!(out)?;
            writeln!(out, "Properties:")?;
            if ty.properties.is_empty() {
                writeln!(out, "  (No properties)")?;
            }
            for property in &ty.properties {
                let mut name = property.name.clone();
                if let Some(alias) = non_empty(property.alias.as_deref()) {
                    name.push_str(&format!(" ({})", alias));
                }
                writeln!(
                    out,
                    "  - {}: {} ({}){}",
                    name,
                    type_or_any(property.type_name.as_deref()),
                    if property.readonly { "readonly" } else { "readwrite" },
                    description_suffix(property.description.as_deref()),
                )?;
            }

            writeln!(out)?;
            writeln!(out, "Methods:")?;
            if ty.methods.is_empty() {
                writeln!(out, "  (No methods)")?;
            }
            for method in &ty.methods {
                writeln!(out, "  ---")?;
                writeln!(out, "  Method: {}", method.name)?;
                if let Some(description) = non_empty(method.description.as_deref()) {
                    writeln!(out, "    Description: {}", description)?;
                }
                writeln!(out, "    Signatures:")?;
                write_signatures(out, method, "      ")?;
            }
            Ok(())
        })
    }
}

fn write_snippets<T>(
    out: &mut dyn Write,
    items: &[&T],
    mut write_one: impl FnMut(&mut dyn Write, &T) -> io::Result<()>,
) -> Result<()> {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
            writeln!(out, "{}", SEPARATOR)?;
            writeln!(out)?;
        }
        write_one(&mut *out, *item)?;
    }
    Ok(())
}

fn snippet_start(out: &mut dyn Write, title: &str, description: Option<&str>) -> io::Result<()> {
    writeln!(out, "TITLE: {}", title)?;
    if let Some(description) = non_empty(description) {
        writeln!(out, "DESCRIPTION: {}", description)?;
    }
    Ok(())
}

/// Signature blocks at `indent`; parameter details go two spaces deeper.
fn write_signatures(out: &mut dyn Write, method: &MethodElement, indent: &str) -> io::Result<()> {
    let returns = non_empty(method.return_type.as_deref())
        .map(|r| format!(":{}", r))
        .unwrap_or_default();
    let detail = format!("{}  ", indent);

    if method.signatures.is_empty() {
        writeln!(out, "{}{}(){}", indent, method.name, returns)?;
        writeln!(out, "{}{}", detail, NO_PARAM_DETAILS)?;
        return Ok(());
    }

    for signature in &method.signatures {
        writeln!(out, "{}---", indent)?;
        let params: Vec<String> = signature
            .params
            .iter()
            .map(|p| format!("{}:{}", p.name, type_or_any(p.type_name.as_deref())))
            .collect();
        writeln!(out, "{}{}({}){}", indent, method.name, params.join(", "), returns)?;
        if let Some(description) = non_empty(signature.description.as_deref()) {
            writeln!(out, "{}Description: {}", detail, description)?;
        }
        write_params(out, &signature.params, &detail)?;
    }
    Ok(())
}

fn write_params(out: &mut dyn Write, params: &[Parameter], indent: &str) -> io::Result<()> {
    if params.is_empty() {
        return writeln!(out, "{}Parameters: (None)", indent);
    }
    writeln!(out, "{}Parameters:", indent)?;
    for param in params {
        writeln!(
            out,
            "{}  - {}: {} ({}){}",
            indent,
            param.name,
            type_or_any(param.type_name.as_deref()),
            if param.required { "required" } else { "optional" },
            description_suffix(param.description.as_deref()),
        )?;
    }
    Ok(())
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.is_empty())
}

fn type_or_any(type_name: Option<&str>) -> &str {
    non_empty(type_name).unwrap_or("any")
}

fn description_suffix(description: Option<&str>) -> String {
    non_empty(description)
        .map(|d| format!(" - {}", d))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform_context_core::catalog::Signature;
    use pretty_assertions::assert_eq;

    fn render_methods(methods: &[&MethodElement]) -> String {
        let mut out = Vec::new();
        MarkdownExporter.write_methods(methods, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_method_snippet() {
        let method = MethodElement::new("НайтиПоСсылке")
            .description("Поиск объекта")
            .signature(
                Signature::new("Основной")
                    .param(Parameter::new("Ссылка").type_name("ЛюбаяСсылка").required()),
            )
            .returns("Произвольный");

        assert_eq!(
            render_methods(&[&method]),
            "TITLE: Global Method: НайтиПоСсылке\n\
             DESCRIPTION: Поиск объекта\n\
             Name: НайтиПоСсылке\n\
             \n\
             Signatures:\n\
             \x20 ---\n\
             \x20 НайтиПоСсылке(Ссылка:ЛюбаяСсылка):Произвольный\n\
             \x20   Parameters:\n\
             \x20     - Ссылка: ЛюбаяСсылка (required)\n"
        );
    }

    #[test]
    fn test_snippets_are_separated() {
        let first = MethodElement::new("А");
        let second = MethodElement::new("Б");
        let text = render_methods(&[&first, &second]);

        assert!(text.contains(&format!("\n\n{}\n\nTITLE: Global Method: Б", SEPARATOR)));
        assert!(text.contains("  А()\n    (No specific parameter details"));
    }

    #[test]
    fn test_type_snippet_lists_members() {
        let ty = TypeElement::new("ТаблицаЗначений")
            .property(PropertyElement::new("Колонки").alias("Columns").readonly());
        let mut out = Vec::new();
        MarkdownExporter.write_types(&[&ty], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("TITLE: Type: ТаблицаЗначений\nName: ТаблицаЗначений\n"));
        assert!(text.contains("  - Колонки (Columns): any (readonly)\n"));
        assert!(text.contains("Methods:\n  (No methods)\n"));
    }
}
