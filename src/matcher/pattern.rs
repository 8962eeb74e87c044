use regex::Regex;

use crate::ConfigurationError;

use super::Params;

/// One compiled `/`-separated piece of a path pattern.
#[derive(Debug, Clone)]
pub(crate) enum Segment {
    Static(String),
    Pattern {
        source: String,
        regex: Regex,
        names: Vec<String>,
    },
    /// `{name:path}`, swallows the rest of the path.
    Rest { source: String, name: String },
}

impl Segment {
    pub(crate) fn source(&self) -> &str {
        match self {
            Self::Static(source) => source,
            Self::Pattern { source, .. } | Self::Rest { source, .. } => source,
        }
    }

    /// Lookup precedence: literals, then patterns, then rest placeholders.
    pub(crate) fn rank(&self) -> u8 {
        match self {
            Self::Static(_) => 0,
            Self::Pattern { .. } => 1,
            Self::Rest { .. } => 2,
        }
    }

    pub(crate) fn matches(&self, segment: &str, params: &mut Params) -> bool {
        match self {
            Self::Static(literal) => literal == segment,
            Self::Pattern { regex, names, .. } => match regex.captures(segment) {
                Some(captures) => {
                    for name in names {
                        if let Some(value) = captures.name(name) {
                            params.insert(name.clone(), value.as_str().to_string());
                        }
                    }
                    true
                }
                None => false,
            },
            Self::Rest { name, .. } => {
                if segment.is_empty() {
                    return false;
                }
                params.insert(name.clone(), segment.to_string());
                true
            }
        }
    }
}

impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        self.rank() == other.rank() && self.source() == other.source()
    }
}

#[derive(Debug, PartialEq)]
enum Part<'a> {
    Literal(&'a str),
    Placeholder { name: &'a str, kind: Option<&'a str> },
}

pub(crate) fn compile(pattern: &str) -> Result<Vec<Segment>, ConfigurationError> {
    let invalid = |reason: String| ConfigurationError::InvalidPattern {
        pattern: pattern.to_string(),
        reason,
    };
    let rest = pattern
        .strip_prefix('/')
        .ok_or_else(|| invalid("must start with '/'".to_string()))?;
    let sources = split_segments(rest).map_err(invalid)?;
    let last = sources.len() - 1;
    let mut seen: Vec<&str> = Vec::new();
    let mut segments = Vec::with_capacity(sources.len());
    for (index, source) in sources.into_iter().enumerate() {
        let parts = parse_parts(source).map_err(invalid)?;
        for part in &parts {
            if let Part::Placeholder { name, .. } = part {
                if seen.contains(name) {
                    return Err(invalid(format!("duplicate placeholder '{name}'")));
                }
                seen.push(*name);
            }
        }
        segments.push(build_segment(source, parts, index == last).map_err(invalid)?);
    }
    Ok(segments)
}

/// Splits on `/` outside of braces, so placeholder regexes may contain `{n}` quantifiers.
pub(crate) fn split_segments(path: &str) -> Result<Vec<&str>, String> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (index, byte) in path.bytes().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| "unbalanced '}'".to_string())?;
            }
            b'/' if depth == 0 => {
                segments.push(&path[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err("unclosed '{'".to_string());
    }
    segments.push(&path[start..]);
    Ok(segments)
}

fn parse_parts(segment: &str) -> Result<Vec<Part<'_>>, String> {
    let bytes = segment.as_bytes();
    let mut parts = Vec::new();
    let mut literal_start = 0;
    let mut index = 0;
    while index < bytes.len() {
        match bytes[index] {
            b'{' => {
                if literal_start < index {
                    parts.push(Part::Literal(&segment[literal_start..index]));
                }
                let close = closing_brace(bytes, index).ok_or_else(|| "unclosed '{'".to_string())?;
                let inner = &segment[index + 1..close];
                let (name, kind) = match inner.split_once(':') {
                    Some((name, kind)) => (name, Some(kind)),
                    None => (inner, None),
                };
                validate_name(name)?;
                if kind.is_some_and(str::is_empty) {
                    return Err(format!("placeholder '{name}' has an empty type"));
                }
                parts.push(Part::Placeholder { name, kind });
                index = close + 1;
                literal_start = index;
            }
            b'}' => return Err("unbalanced '}'".to_string()),
            _ => index += 1,
        }
    }
    if literal_start < bytes.len() {
        parts.push(Part::Literal(&segment[literal_start..]));
    }
    Ok(parts)
}

fn closing_brace(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (index, byte) in bytes.iter().enumerate().skip(open) {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(index);
                }
            }
            _ => {}
        }
    }
    None
}

fn validate_name(name: &str) -> Result<(), String> {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return Err(format!("invalid placeholder name '{name}'")),
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(format!("invalid placeholder name '{name}'"))
    }
}

fn kind_regex(kind: Option<&str>) -> &str {
    match kind {
        None | Some("string") => "[^/]+",
        Some("digit") => "[0-9]+",
        Some("alnum") => "[a-zA-Z0-9]+",
        Some("alpha") => "[a-zA-Z]+",
        Some(custom) => custom,
    }
}

fn build_segment(source: &str, parts: Vec<Part<'_>>, is_last: bool) -> Result<Segment, String> {
    match parts.as_slice() {
        [] => return Ok(Segment::Static(String::new())),
        [Part::Literal(literal)] => return Ok(Segment::Static(literal.to_string())),
        [Part::Placeholder {
            name,
            kind: Some("path"),
        }] => {
            if !is_last {
                return Err(format!("'{name}' matches a path and must be the last segment"));
            }
            return Ok(Segment::Rest {
                source: source.to_string(),
                name: name.to_string(),
            });
        }
        _ => {}
    }
    let mut expression = String::from("^");
    let mut names = Vec::new();
    for part in parts {
        match part {
            Part::Literal(literal) => expression.push_str(&regex::escape(literal)),
            Part::Placeholder {
                name,
                kind: Some("path"),
            } => {
                return Err(format!("'{name}' matches a path and must fill a whole segment"));
            }
            Part::Placeholder { name, kind } => {
                expression.push_str(&format!("(?P<{name}>{})", kind_regex(kind)));
                names.push(name.to_string());
            }
        }
    }
    expression.push('$');
    let regex = Regex::new(&expression).map_err(|err| err.to_string())?;
    Ok(Segment::Pattern {
        source: source.to_string(),
        regex,
        names,
    })
}

/// Fills the placeholders of `template`. Errors with the name of the first missing parameter.
pub(crate) fn expand<'p>(
    template: &str,
    params: impl Fn(&str) -> Option<&'p str>,
) -> Result<String, String> {
    let bytes = template.as_bytes();
    let mut url = String::with_capacity(template.len());
    let mut literal_start = 0;
    let mut index = 0;
    while index < bytes.len() {
        if bytes[index] != b'{' {
            index += 1;
            continue;
        }
        let Some(close) = closing_brace(bytes, index) else {
            break;
        };
        url.push_str(&template[literal_start..index]);
        let inner = &template[index + 1..close];
        let name = inner.split(':').next().unwrap_or(inner);
        url.push_str(params(name).ok_or_else(|| name.to_string())?);
        index = close + 1;
        literal_start = index;
    }
    url.push_str(&template[literal_start..]);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn matches(pattern: &str, segment: &str) -> Option<Params> {
        let segments = compile(pattern).unwrap();
        let mut params = Params::new();
        segments[0].matches(segment, &mut params).then_some(params)
    }

    #[test]
    fn test_split_segments() {
        assert_eq!(split_segments("").unwrap(), vec![""]);
        assert_eq!(split_segments("a/b/").unwrap(), vec!["a", "b", ""]);
        assert_eq!(
            split_segments("year/{y:[0-9]{4}}/x").unwrap(),
            vec!["year", "{y:[0-9]{4}}", "x"]
        );
        assert!(split_segments("a/{b").is_err());
        assert!(split_segments("a}/b").is_err());
    }

    #[test]
    fn test_compile_kinds() {
        let segments = compile("/hello/{name}/{rest:path}").unwrap();
        assert_eq!(segments.len(), 3);
        assert!(matches!(&segments[0], Segment::Static(s) if s == "hello"));
        assert!(matches!(&segments[1], Segment::Pattern { names, .. } if names == &["name"]));
        assert!(matches!(&segments[2], Segment::Rest { name, .. } if name == "rest"));
    }

    #[rstest]
    #[case("/{id:digit}", "42", true)]
    #[case("/{id:digit}", "4a", false)]
    #[case("/{id:alpha}", "abc", true)]
    #[case("/{id:alpha}", "ab1", false)]
    #[case("/{id:alnum}", "ab1", true)]
    #[case("/{id}", "anything-goes", true)]
    #[case("/{id}", "", false)]
    #[case("/{id:[a-c]+}", "abcab", true)]
    #[case("/{id:[a-c]+}", "abd", false)]
    fn test_placeholder_kinds(#[case] pattern: &str, #[case] segment: &str, #[case] expected: bool) {
        assert_eq!(matches(pattern, segment).is_some(), expected);
    }

    #[test]
    fn test_mixed_segment() {
        let params = matches("/{name}.{ext:alpha}", "report.pdf").unwrap();
        assert_eq!(params.get("name").map(String::as_str), Some("report"));
        assert_eq!(params.get("ext").map(String::as_str), Some("pdf"));
    }

    #[rstest]
    #[case("relative")]
    #[case("/{}")]
    #[case("/{1abc}")]
    #[case("/{id}/{id}")]
    #[case("/{rest:path}/tail")]
    #[case("/file.{rest:path}")]
    #[case("/{id:}")]
    #[case("/{id:(}")]
    fn test_invalid_patterns(#[case] pattern: &str) {
        assert!(matches!(
            compile(pattern),
            Err(ConfigurationError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_expand() {
        let lookup = |name: &str| match name {
            "id" => Some("42"),
            "ext" => Some("json"),
            _ => None,
        };
        assert_eq!(expand("/item/{id:digit}.{ext}", lookup).unwrap(), "/item/42.json");
        assert_eq!(expand("/static", lookup).unwrap(), "/static");
        assert_eq!(expand("/user/{uid}", lookup), Err("uid".to_string()));
        assert_eq!(expand("/y/{id:[0-9]{2}}", lookup).unwrap(), "/y/42");
    }
}
