use anyhow::{Context, Result, anyhow};
use schemars::{JsonSchema, Schema, schema_for};
use serde_json::{Map, Value};
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Integer,
    Number,
    Boolean,
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    pub title: String,
    pub description: Option<String>,
    pub kind: FieldKind,
    pub default: Option<Value>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

pub fn schema_of<T: JsonSchema>() -> Schema {
    schema_for!(T)
}

/// Flattens the top-level properties of `T`'s schema into field specs.
pub fn field_specs<T: JsonSchema>() -> Result<Vec<FieldSpec>> {
    let root = schema_of::<T>();
    let root_obj = root.as_object().context("root schema is not an object")?;
    let props = root_obj
        .get("properties")
        .and_then(|v| v.as_object())
        .context("schema has no properties")?;

    let mut out = Vec::new();
    for (name, field_schema) in props {
        let mut fs_obj = field_schema
            .as_object()
            .context("field schema not object")?;

        if fs_obj.get("$ref").is_some() {
            fs_obj = resolve_ref_obj(root_obj, fs_obj)
                .ok_or_else(|| anyhow!("failed to resolve field $ref for '{name}'"))?;
        }

        let Some(kind) = detect_field_kind(fs_obj.get("type")) else {
            continue;
        };

        out.push(FieldSpec {
            name: name.clone(),
            title: fs_obj
                .get("title")
                .and_then(|v| v.as_str())
                .unwrap_or(name)
                .to_string(),
            description: fs_obj
                .get("description")
                .and_then(|v| v.as_str())
                .map(str::to_string),
            kind,
            default: fs_obj
                .get("default")
                .or_else(|| root_obj.get("default").and_then(|d| d.get(name)))
                .cloned(),
            min: fs_obj
                .get("minimum")
                .or_else(|| fs_obj.get("exclusiveMinimum"))
                .and_then(|v| v.as_f64()),
            max: fs_obj
                .get("maximum")
                .or_else(|| fs_obj.get("exclusiveMaximum"))
                .and_then(|v| v.as_f64()),
        });
    }
    Ok(out)
}

/// One line per field: name, type, default, range and description.
pub fn render_table(specs: &[FieldSpec]) -> String {
    let width = specs.iter().map(|s| s.name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for spec in specs {
        let default = spec
            .default
            .as_ref()
            .map(Value::to_string)
            .unwrap_or_else(|| "-".into());
        let range = match (spec.min, spec.max) {
            (Some(lo), Some(hi)) => format!(" [{lo}, {hi}]"),
            (Some(lo), None) => format!(" [{lo}, ..)"),
            (None, Some(hi)) => format!(" (.., {hi}]"),
            (None, None) => String::new(),
        };
        let _ = writeln!(
            out,
            "{:<width$}  {:<8} default={}{}  {}",
            spec.name,
            format!("{:?}", spec.kind).to_lowercase(),
            default,
            range,
            spec.description.as_deref().unwrap_or(&spec.title),
        );
    }
    out
}

/// Resolve a local $ref like "#/$defs/CartOptions" against the root object.
fn resolve_ref_obj<'a>(
    root_obj: &'a Map<String, Value>,
    obj: &'a Map<String, Value>,
) -> Option<&'a Map<String, Value>> {
    match obj.get("$ref") {
        Some(Value::String(r)) => {
            let path = r.strip_prefix("#/")?;
            let mut cur: &Map<String, Value> = root_obj;
            for raw_seg in path.split('/') {
                // JSON Pointer unescape (~1 => /, ~0 => ~)
                let seg = raw_seg.replace("~1", "/").replace("~0", "~");
                cur = cur.get(&seg)?.as_object()?;
            }
            Some(cur)
        }
        _ => Some(obj),
    }
}

fn detect_field_kind(ty: Option<&Value>) -> Option<FieldKind> {
    let kind_of = |s: &str| match s {
        "string" => Some(FieldKind::String),
        "integer" => Some(FieldKind::Integer),
        "number" => Some(FieldKind::Number),
        "boolean" => Some(FieldKind::Boolean),
        _ => None,
    };
    match ty {
        Some(Value::String(s)) => kind_of(s.as_str()),
        // unions like ["null","integer"] for Option<T>
        Some(Value::Array(arr)) => arr.iter().filter_map(|v| v.as_str()).find_map(kind_of),
        _ => None,
    }
}
