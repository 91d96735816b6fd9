use crate::core::attributes::{AttributeRef, NominalAttribute, NumericAttribute};
use crate::core::instance_header::InstanceHeader;
use crate::error::CartError;
use crate::utils::file_parsing::{split_csv_preserving_quotes, strip_surrounding_quotes};
use std::io::BufRead;
use std::sync::Arc;

#[derive(Debug)]
pub(super) enum AttributeKind {
    Numeric,
    Nominal(Vec<String>),
}

pub(super) fn is_comment_or_empty(s: &str) -> bool {
    let t = s.trim();
    t.is_empty() || t.starts_with('%')
}

/// Line reader that skips comments and blank lines and tracks 1-based line
/// numbers for error messages.
pub(super) struct LineReader<R> {
    inner: R,
    line_no: usize,
}

impl<R: BufRead> LineReader<R> {
    pub(super) fn new(inner: R) -> Self {
        Self { inner, line_no: 0 }
    }

    pub(super) fn line_no(&self) -> usize {
        self.line_no
    }

    pub(super) fn next_content_line(&mut self) -> Result<Option<String>, CartError> {
        let mut line = String::new();
        loop {
            line.clear();
            let n = self.inner.read_line(&mut line)?;
            if n == 0 {
                return Ok(None);
            }
            self.line_no += 1;
            if !is_comment_or_empty(&line) {
                return Ok(Some(line.trim().to_string()));
            }
        }
    }
}

/// Reads everything up to and including `@data`. The class defaults to the
/// last attribute.
pub(super) fn parse_header<R: BufRead>(
    reader: &mut LineReader<R>,
    class_index: Option<usize>,
) -> Result<InstanceHeader, CartError> {
    let mut relation: Option<String> = None;
    let mut attributes: Vec<AttributeRef> = Vec::new();

    loop {
        let Some(line) = reader.next_content_line()? else {
            return Err(CartError::parse(
                reader.line_no(),
                "ARFF file ended before @data",
            ));
        };

        let low = line.to_ascii_lowercase();
        if low.starts_with("@relation") {
            if relation.is_some() || !attributes.is_empty() {
                return Err(CartError::parse(reader.line_no(), "misplaced @relation"));
            }
            let raw = line["@relation".len()..].trim();
            relation = Some(strip_surrounding_quotes(raw).to_string());
        } else if low.starts_with("@attribute") {
            let (name, kind) = parse_attribute_line(&line, reader.line_no())?;
            match kind {
                AttributeKind::Numeric => {
                    attributes.push(Arc::new(NumericAttribute::new(name)) as AttributeRef);
                }
                AttributeKind::Nominal(values) => {
                    attributes
                        .push(Arc::new(NominalAttribute::with_values(name, values)) as AttributeRef);
                }
            }
        } else if low.starts_with("@data") {
            break;
        } else {
            return Err(CartError::parse(
                reader.line_no(),
                format!("unsupported header directive: {line}"),
            ));
        }
    }

    if attributes.is_empty() {
        return Err(CartError::parse(reader.line_no(), "no attributes declared"));
    }
    let class_index = class_index.unwrap_or(attributes.len() - 1);
    if class_index >= attributes.len() {
        return Err(CartError::invalid_option(
            "class_index",
            format!(
                "{class_index} is out of range for {} attributes",
                attributes.len()
            ),
        ));
    }

    Ok(InstanceHeader::new(
        relation.unwrap_or_else(|| "unnamed_relation".to_string()),
        attributes,
        class_index,
    ))
}

pub(super) fn parse_attribute_line(
    line: &str,
    line_no: usize,
) -> Result<(String, AttributeKind), CartError> {
    let trimmed = line.trim();
    if !trimmed.to_ascii_lowercase().starts_with("@attribute") {
        return Err(CartError::parse(line_no, "line is not '@attribute'"));
    }
    let rest = trimmed["@attribute".len()..].trim();

    let (name, after_name) = match rest.chars().next() {
        Some(quote @ ('\'' | '"')) => {
            let end = rest[1..]
                .find(quote)
                .map(|i| i + 1)
                .ok_or_else(|| CartError::parse(line_no, "attribute name without closing quote"))?;
            (rest[1..end].to_string(), rest[end + 1..].trim())
        }
        _ => {
            let mut it = rest.splitn(2, char::is_whitespace);
            let name = it.next().unwrap_or_default().to_string();
            let after = it
                .next()
                .ok_or_else(|| CartError::parse(line_no, "attribute type is missing"))?;
            (name, after.trim())
        }
    };
    if name.is_empty() {
        return Err(CartError::parse(line_no, "attribute name is missing"));
    }

    let low = after_name.to_ascii_lowercase();
    if low.starts_with("numeric") || low.starts_with("real") || low.starts_with("integer") {
        return Ok((name, AttributeKind::Numeric));
    }

    if after_name.starts_with('{') {
        let close = after_name
            .rfind('}')
            .ok_or_else(|| CartError::parse(line_no, "nominal set without closing '}'"))?;

        let values = split_csv_preserving_quotes(&after_name[1..close])
            .into_iter()
            .map(|s| strip_surrounding_quotes(&s).to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        if values.is_empty() {
            return Err(CartError::parse(line_no, "empty nominal domain"));
        }
        return Ok((name, AttributeKind::Nominal(values)));
    }

    Err(CartError::parse(
        line_no,
        format!("attribute type not supported: {after_name}"),
    ))
}

/// Parses one data row into attribute values and the row weight. A trailing
/// `{w}` token sets the weight; it defaults to 1.
pub(super) fn parse_instance_values(
    header: &InstanceHeader,
    line: &str,
    line_no: usize,
) -> Result<(Vec<f64>, f64), CartError> {
    let mut tokens = split_csv_preserving_quotes(line);
    let num_attributes = header.attributes.len();

    let mut weight = 1.0;
    if tokens.len() == num_attributes + 1 {
        let last = tokens.pop().unwrap_or_default();
        let inner = last
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
            .ok_or_else(|| {
                CartError::parse(line_no, format!("expected instance weight, found '{last}'"))
            })?;
        weight = inner
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|w| w.is_finite() && *w >= 0.0)
            .ok_or_else(|| CartError::parse(line_no, format!("invalid instance weight '{inner}'")))?;
    }

    if tokens.len() != num_attributes {
        return Err(CartError::parse(
            line_no,
            format!(
                "number of columns ({}) differs from number of attributes ({num_attributes})",
                tokens.len()
            ),
        ));
    }

    let mut values = Vec::with_capacity(tokens.len());
    for (idx, raw) in tokens.iter().enumerate() {
        let raw = raw.trim();
        if raw == "?" {
            values.push(f64::NAN);
            continue;
        }

        let attr = &header.attributes[idx];

        if attr.as_any().is::<NumericAttribute>() {
            let v: f64 = raw.parse().map_err(|_| {
                CartError::parse(
                    line_no,
                    format!("invalid numeric value '{raw}' for attribute '{}'", attr.name()),
                )
            })?;
            values.push(v);
            continue;
        }

        if let Some(nominal) = attr.as_any().downcast_ref::<NominalAttribute>() {
            let key = strip_surrounding_quotes(raw);
            let Some(pos) = nominal.index_of_value(key) else {
                return Err(CartError::parse(
                    line_no,
                    format!("nominal value '{key}' not found in domain of '{}'", attr.name()),
                ));
            };
            values.push(pos as f64);
            continue;
        }

        return Err(CartError::parse(
            line_no,
            format!("unsupported attribute type at column #{idx}"),
        ));
    }

    Ok((values, weight))
}
