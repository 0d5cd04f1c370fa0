//! Markdown rendering of search results, element cards and API errors
//!
//! Output adapts to the result count:
//! - nothing found: a hint block
//! - one hit: the detailed block
//! - up to five hits: compact blocks, best first
//! - more: a table of the top five plus the best hit in detail

use platform_context_core::catalog::{
    Element, ElementKind, MethodElement, Parameter, PropertyElement, Signature, TypeElement,
};
use platform_context_core::{ApiError, SearchHit};

const TABLE_ROWS: usize = 5;
const SIGNATURE_CELL_WIDTH: usize = 40;
const COMPACT_DESCRIPTION_WIDTH: usize = 100;
const SEPARATOR: &str = "\n---\n\n";

/// Render ranked hits for `query`.
pub fn search_results(query: &str, hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return format!(
            "❌ **Nothing found for:** `{}`\n\n\
             💡 **Try:**\n\
             - checking the spelling\n\
             - a shorter query\n\
             - a synonym or the identifier itself (`ТаблицаЗначений`)\n",
            query.trim()
        );
    }

    let mut out = format!(
        "# 🔎 Search results: \"{}\" ({} found)\n\n",
        query.trim(),
        hits.len()
    );

    if hits.len() == 1 {
        out.push_str(&single_hit(&hits[0]));
    } else if hits.len() <= TABLE_ROWS {
        let blocks: Vec<String> = hits
            .iter()
            .enumerate()
            .map(|(i, hit)| compact_hit(hit, i == 0))
            .collect();
        out.push_str(&blocks.join(SEPARATOR));
    } else {
        out.push_str("## Top results\n\n");
        out.push_str("| Name | Kind | Signature | Match |\n");
        out.push_str("|------|------|-----------|-------|\n");
        for hit in hits.iter().take(TABLE_ROWS) {
            out.push_str(&format!(
                "| **{}** | {} | `{}` | {} |\n",
                table_cell(&qualified_name(hit)),
                kind_icon(hit.element.kind()),
                table_cell(&truncate(&element_signature(&hit.element), SIGNATURE_CELL_WIDTH)),
                hit.tier,
            ));
        }
        out.push_str(&format!(
            "\n*... and {} more*\n",
            hits.len() - TABLE_ROWS
        ));
        out.push_str(SEPARATOR);
        out.push_str("## ⭐ Best match\n\n");
        out.push_str(&single_hit(&hits[0]));
    }

    out
}

fn single_hit(hit: &SearchHit) -> String {
    let mut out = format!(
        "## {} {}\n```bsl\n{}\n```\n*{}* • **Match: {}**\n\n",
        kind_icon(hit.element.kind()),
        hit.element.name(),
        element_signature(&hit.element),
        kind_description(hit.element.kind(), hit.owner.as_deref()),
        hit.tier,
    );
    if let Some(description) = non_empty(hit.element.description()) {
        out.push_str(description);
        out.push('\n');
    }
    out
}

fn compact_hit(hit: &SearchHit, best: bool) -> String {
    let prefix = if best { "## ⭐ " } else { "## " };
    let mut out = format!(
        "{}{}\n```bsl\n{}\n```\n*{}*",
        prefix,
        qualified_name(hit),
        element_signature(&hit.element),
        kind_description(hit.element.kind(), hit.owner.as_deref()),
    );
    if !best {
        out.push_str(" • *less relevant*");
    }
    out.push('\n');
    if let Some(description) = non_empty(hit.element.description()) {
        out.push('\n');
        out.push_str(&truncate(description, COMPACT_DESCRIPTION_WIDTH));
        out.push('\n');
    }
    out
}

/// Detailed card for one element, optionally declared by `owner`.
pub fn element_card(element: &Element, owner: Option<&str>) -> String {
    let mut out = format!("# {} {}\n\n", kind_icon(element.kind()), element.name());
    if let Some(owner) = owner {
        out.push_str(&format!("*Member of `{}`*\n\n", owner));
    }

    out.push_str("## Signature\n```bsl\n");
    out.push_str(&element_signature(element));
    out.push_str("\n```\n\n");

    match element {
        Element::Method(method) => method_details(&mut out, method),
        Element::Property(property) => property_details(&mut out, property),
        Element::Type(ty) => type_details(&mut out, ty),
    }

    if let Some(description) = non_empty(element.description()) {
        out.push_str("## Description\n");
        out.push_str(description);
        out.push_str("\n\n");
    }
    out
}

/// Card for a type member lookup.
pub fn member_card(hit: &SearchHit) -> String {
    element_card(&hit.element, hit.owner.as_deref())
}

fn method_details(out: &mut String, method: &MethodElement) {
    let multiple = method.signatures.len() > 1;
    for signature in &method.signatures {
        if multiple {
            out.push_str(&format!("## Parameters: {}\n", signature_label(signature)));
            out.push_str(&format!(
                "`{}`\n\n",
                method_signature(method, Some(signature))
            ));
        } else if !signature.params.is_empty() {
            out.push_str("## Parameters\n");
        }
        push_params(out, &signature.params);
    }

    if let Some(return_type) = non_empty(method.return_type.as_deref()) {
        out.push_str(&format!("## Returns\n**{}**\n\n", return_type));
    }
}

fn property_details(out: &mut String, property: &PropertyElement) {
    out.push_str("## Property\n");
    out.push_str(&format!(
        "- **Type:** {}\n",
        non_empty(property.type_name.as_deref()).unwrap_or("Arbitrary")
    ));
    out.push_str(&format!(
        "- **Read-only:** {}\n\n",
        if property.readonly { "yes" } else { "no" }
    ));
}

fn type_details(out: &mut String, ty: &TypeElement) {
    out.push_str("## Type\n");
    out.push_str(&format!("- **Methods:** {}\n", ty.methods.len()));
    out.push_str(&format!("- **Properties:** {}\n", ty.properties.len()));
    out.push_str(&format!("- **Constructors:** {}\n\n", ty.constructors.len()));
}

fn push_params(out: &mut String, params: &[Parameter]) {
    if params.is_empty() {
        return;
    }
    for param in params {
        out.push_str(&format!(
            "- **{}** *({})*{} - {}\n",
            param.name,
            non_empty(param.type_name.as_deref()).unwrap_or("Arbitrary"),
            if param.required { "" } else { " optional" },
            non_empty(param.description.as_deref()).unwrap_or("No description"),
        ));
    }
    out.push('\n');
}

/// Constructor listing for a type.
pub fn constructors(type_name: &str, constructors: &[Signature]) -> String {
    let mut out = format!(
        "# 🔨 Constructors: {} ({})\n\n",
        type_name,
        constructors.len()
    );
    for constructor in constructors {
        out.push_str(&format!(
            "## {}\n```bsl\nНовый {}({})\n```\n",
            signature_label(constructor),
            type_name,
            params_inline(&constructor.params)
        ));
        if let Some(description) = non_empty(constructor.description.as_deref()) {
            out.push_str(description);
            out.push('\n');
        }
        out.push('\n');
        push_params(&mut out, &constructor.params);
    }
    out
}

/// Full member listing of a type.
pub fn type_members(ty: &TypeElement) -> String {
    let mut out = format!("# 📦 {}\n\n", ty.name);
    if let Some(description) = non_empty(ty.description.as_deref()) {
        out.push_str(description);
        out.push_str("\n\n");
    }

    out.push_str(&format!("## 🔧 Methods ({})\n\n", ty.methods.len()));
    if ty.methods.is_empty() {
        out.push_str("_None_\n\n");
    } else {
        out.push_str("| Name | Signature | Description |\n");
        out.push_str("|------|-----------|-------------|\n");
        for method in &ty.methods {
            out.push_str(&format!(
                "| **{}** | `{}` | {} |\n",
                table_cell(&method.name),
                table_cell(&method_signature(method, method.signatures.first())),
                table_cell(&truncate(
                    method.description.as_deref().unwrap_or(""),
                    COMPACT_DESCRIPTION_WIDTH
                )),
            ));
        }
        out.push('\n');
    }

    out.push_str(&format!("## 📋 Properties ({})\n\n", ty.properties.len()));
    if ty.properties.is_empty() {
        out.push_str("_None_\n");
    } else {
        out.push_str("| Name | Type | Read-only | Description |\n");
        out.push_str("|------|------|-----------|-------------|\n");
        for property in &ty.properties {
            out.push_str(&format!(
                "| **{}** | {} | {} | {} |\n",
                table_cell(&property.name),
                table_cell(property.type_name.as_deref().unwrap_or("")),
                if property.readonly { "yes" } else { "no" },
                table_cell(&truncate(
                    property.description.as_deref().unwrap_or(""),
                    COMPACT_DESCRIPTION_WIDTH
                )),
            ));
        }
    }
    out
}

/// User-facing rendering of an API error.
pub fn error(err: &ApiError) -> String {
    if err.is_not_found() {
        format!("❌ **Not found:** {}", err)
    } else {
        format!("❌ **Error:** {}", err)
    }
}

/// One-line `bsl` signature of an element.
pub fn element_signature(element: &Element) -> String {
    match element {
        Element::Method(method) => method_signature(method, method.signatures.first()),
        Element::Property(property) => match non_empty(property.type_name.as_deref()) {
            Some(type_name) => format!("{}: {}", property.name, type_name),
            None => property.name.clone(),
        },
        Element::Type(ty) => match ty.constructors.first() {
            Some(constructor) => format!("Новый {}({})", ty.name, params_inline(&constructor.params)),
            None => ty.name.clone(),
        },
    }
}

fn method_signature(method: &MethodElement, signature: Option<&Signature>) -> String {
    let params = signature
        .map(|s| params_inline(&s.params))
        .unwrap_or_default();
    match non_empty(method.return_type.as_deref()) {
        Some(return_type) => format!("{}({}): {}", method.name, params, return_type),
        None => format!("{}({})", method.name, params),
    }
}

fn params_inline(params: &[Parameter]) -> String {
    params
        .iter()
        .map(|p| {
            let param = match non_empty(p.type_name.as_deref()) {
                Some(type_name) => format!("{}: {}", p.name, type_name),
                None => p.name.clone(),
            };
            if p.required {
                param
            } else {
                format!("[{}]", param)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn signature_label(signature: &Signature) -> &str {
    if signature.name.trim().is_empty() {
        "Default"
    } else {
        &signature.name
    }
}

fn qualified_name(hit: &SearchHit) -> String {
    match &hit.owner {
        Some(owner) => format!("{}.{}", owner, hit.element.name()),
        None => hit.element.name().to_string(),
    }
}

fn kind_icon(kind: ElementKind) -> &'static str {
    match kind {
        ElementKind::Method => "🔧",
        ElementKind::Property => "📋",
        ElementKind::Type => "📦",
    }
}

fn kind_description(kind: ElementKind, owner: Option<&str>) -> String {
    match (kind, owner) {
        (ElementKind::Method, Some(owner)) => format!("Method of {}", owner),
        (ElementKind::Property, Some(owner)) => format!("Property of {}", owner),
        (ElementKind::Method, None) => "Global method".to_string(),
        (ElementKind::Property, None) => "Global property".to_string(),
        (ElementKind::Type, _) => "Type".to_string(),
    }
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

/// Shorten to `max` characters, ending with "..." when cut.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}

fn table_cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\n', '\r'], " ")
}
