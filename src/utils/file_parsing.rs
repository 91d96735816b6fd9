/// Splits a comma separated line, keeping commas that appear inside single or
/// double quotes.
pub fn split_csv_preserving_quotes(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for c in line.trim().chars() {
        if escaped {
            current.push(c);
            escaped = false;
            continue;
        }
        match (quote, c) {
            (Some(_), '\\') => {
                current.push(c);
                escaped = true;
            }
            (Some(q), _) if c == q => {
                current.push(c);
                quote = None;
            }
            (None, '\'' | '"') => {
                current.push(c);
                quote = Some(c);
            }
            (None, ',') => {
                tokens.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }

    if !current.trim().is_empty() || !tokens.is_empty() {
        tokens.push(current.trim().to_string());
    }
    tokens
}

pub fn strip_surrounding_quotes(s: &str) -> &str {
    let t = s.trim();
    if t.len() >= 2
        && ((t.starts_with('\'') && t.ends_with('\'')) || (t.starts_with('"') && t.ends_with('"')))
    {
        &t[1..t.len() - 1]
    } else {
        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_keeps_quoted_commas() {
        let tokens = split_csv_preserving_quotes("a, 'b,c', \"d\" ,e");
        assert_eq!(tokens, vec!["a", "'b,c'", "\"d\"", "e"]);
    }

    #[test]
    fn split_keeps_trailing_empty_token() {
        let tokens = split_csv_preserving_quotes("1,2,");
        assert_eq!(tokens, vec!["1", "2", ""]);
    }

    #[test]
    fn split_of_blank_line_is_empty() {
        assert!(split_csv_preserving_quotes("   ").is_empty());
    }

    #[test]
    fn strip_removes_matching_quotes_only() {
        assert_eq!(strip_surrounding_quotes("'sunny'"), "sunny");
        assert_eq!(strip_surrounding_quotes("\"a b\""), "a b");
        assert_eq!(strip_surrounding_quotes("'open"), "'open");
        assert_eq!(strip_surrounding_quotes("'"), "'");
    }
}
