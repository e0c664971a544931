//! Minimal XML reader producing an element tree.
//!
//! Handles the subset of XML that shows up in pasted documents: the XML
//! declaration, processing instructions, comments, DOCTYPE (with an
//! internal subset), CDATA sections, quoted attributes, self-closing tags,
//! and predefined/numeric character references. Namespaces are kept as
//! part of the element name.

use crate::error::{Error, Result, SourcePosition};

/// Deepest element nesting accepted before parsing stops.
pub const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

impl XmlElement {
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(el) => Some(el),
            XmlNode::Text(_) => None,
        })
    }

    /// Concatenated text content of this element (direct children only).
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                XmlNode::Text(t) => Some(t.as_str()),
                XmlNode::Element(_) => None,
            })
            .collect()
    }
}

/// Parse a complete document and return its root element.
pub fn parse(input: &str) -> Result<XmlElement> {
    let mut reader = Reader::new(input);
    reader.parse_document()
}

struct Reader<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Reader<'a> {
    fn new(src: &'a str) -> Self {
        let pos = if src.starts_with('\u{feff}') { 3 } else { 0 };
        Self { src, pos, depth: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn starts_with(&self, s: &str) -> bool {
        self.rest().starts_with(s)
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
        self.pos > start
    }

    fn position_at(&self, offset: usize) -> SourcePosition {
        let before = &self.src[..offset.min(self.src.len())];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = before[line_start..].chars().count() + 1;
        SourcePosition { line, column }
    }

    fn error_at(&self, offset: usize, message: impl Into<String>) -> Error {
        Error::input_parse_failed("xml", message, Some(self.position_at(offset)))
    }

    fn error(&self, message: impl Into<String>) -> Error {
        self.error_at(self.pos, message)
    }

    fn expect(&mut self, s: &str) -> Result<()> {
        if self.starts_with(s) {
            self.pos += s.len();
            Ok(())
        } else {
            Err(self.error(format!("expected '{}'", s)))
        }
    }

    fn skip_past(&mut self, terminator: &str, what: &str) -> Result<&'a str> {
        match self.rest().find(terminator) {
            Some(idx) => {
                let body = &self.rest()[..idx];
                self.pos += idx + terminator.len();
                Ok(body)
            }
            None => Err(self.error(format!("unterminated {}", what))),
        }
    }

    fn parse_document(&mut self) -> Result<XmlElement> {
        self.skip_misc(true)?;

        if self.at_end() {
            return Err(self.error("document has no root element"));
        }
        if self.peek() != Some('<') {
            return Err(self.error("text is not allowed before the root element"));
        }

        let root = self.parse_element()?;

        self.skip_misc(false)?;
        if !self.at_end() {
            return Err(self.error("unexpected content after the root element"));
        }

        Ok(root)
    }

    /// Skip whitespace, comments, processing instructions and (in the
    /// prolog) a DOCTYPE declaration.
    fn skip_misc(&mut self, prolog: bool) -> Result<()> {
        loop {
            self.skip_whitespace();
            if self.starts_with("<?") {
                self.skip_past("?>", "processing instruction")?;
            } else if self.starts_with("<!--") {
                self.skip_past("-->", "comment")?;
            } else if prolog && self.starts_with("<!DOCTYPE") {
                self.skip_doctype()?;
            } else {
                return Ok(());
            }
        }
    }

    fn skip_doctype(&mut self) -> Result<()> {
        let start = self.pos;
        let mut depth = 0usize;
        let mut quote: Option<char> = None;

        while let Some(c) = self.bump() {
            match (quote, c) {
                (Some(q), _) if c == q => quote = None,
                (Some(_), _) => {}
                (None, '"') | (None, '\'') => quote = Some(c),
                (None, '[') => depth += 1,
                (None, ']') => depth = depth.saturating_sub(1),
                (None, '>') if depth == 0 => return Ok(()),
                _ => {}
            }
        }

        Err(self.error_at(start, "unterminated DOCTYPE declaration"))
    }

    fn parse_name(&mut self) -> Result<String> {
        let start = self.pos;
        match self.peek() {
            Some(c) if is_name_start(c) => {
                self.bump();
            }
            _ => return Err(self.error("expected a name")),
        }
        while matches!(self.peek(), Some(c) if is_name_char(c)) {
            self.bump();
        }
        Ok(self.src[start..self.pos].to_string())
    }

    fn parse_element(&mut self) -> Result<XmlElement> {
        let open_at = self.pos;
        if self.depth >= MAX_DEPTH {
            return Err(self.error_at(
                open_at,
                format!("elements nested deeper than {} levels", MAX_DEPTH),
            ));
        }
        self.depth += 1;
        let element = self.parse_element_body(open_at)?;
        self.depth -= 1;
        Ok(element)
    }

    fn parse_element_body(&mut self, open_at: usize) -> Result<XmlElement> {
        self.expect("<")?;
        let name = self.parse_name()?;
        let mut element = XmlElement {
            name,
            attributes: Vec::new(),
            children: Vec::new(),
        };

        loop {
            let had_space = self.skip_whitespace();
            if self.starts_with("/>") {
                self.pos += 2;
                return Ok(element);
            }
            if self.starts_with(">") {
                self.pos += 1;
                break;
            }
            if self.at_end() {
                return Err(self.error_at(open_at, format!("unclosed tag <{}>", element.name)));
            }
            if !had_space {
                return Err(self.error("expected whitespace between attributes"));
            }
            self.parse_attribute(&mut element)?;
        }

        self.parse_content(&mut element, open_at)?;
        Ok(element)
    }

    fn parse_attribute(&mut self, element: &mut XmlElement) -> Result<()> {
        let name_at = self.pos;
        let name = self.parse_name()?;
        self.skip_whitespace();
        self.expect("=")?;
        self.skip_whitespace();

        let quote = match self.peek() {
            Some(q @ ('"' | '\'')) => q,
            _ => return Err(self.error("attribute value must be quoted")),
        };
        self.bump();

        let value_at = self.pos;
        let Some(len) = self.rest().find(quote) else {
            return Err(self.error_at(value_at, "unterminated attribute value"));
        };
        let raw = &self.rest()[..len];
        if let Some(lt) = raw.find('<') {
            return Err(self.error_at(value_at + lt, "'<' is not allowed in attribute values"));
        }
        let value = self.decode_entities(raw, value_at)?;
        self.pos += len + 1;

        if element.attributes.iter().any(|(existing, _)| *existing == name) {
            return Err(self.error_at(name_at, format!("duplicate attribute '{}'", name)));
        }
        element.attributes.push((name, value));
        Ok(())
    }

    fn parse_content(&mut self, element: &mut XmlElement, open_at: usize) -> Result<()> {
        loop {
            if self.at_end() {
                return Err(self.error_at(open_at, format!("unclosed element <{}>", element.name)));
            }

            if self.starts_with("</") {
                let close_at = self.pos;
                self.pos += 2;
                let close = self.parse_name()?;
                self.skip_whitespace();
                self.expect(">")?;
                if close != element.name {
                    return Err(self.error_at(
                        close_at,
                        format!(
                            "mismatched closing tag: expected </{}>, found </{}>",
                            element.name, close
                        ),
                    ));
                }
                return Ok(());
            }

            if self.starts_with("<!--") {
                self.skip_past("-->", "comment")?;
            } else if self.starts_with("<![CDATA[") {
                self.pos += "<![CDATA[".len();
                let body = self.skip_past("]]>", "CDATA section")?;
                push_text(element, body.to_string());
            } else if self.starts_with("<?") {
                self.skip_past("?>", "processing instruction")?;
            } else if self.starts_with("<") {
                let child = self.parse_element()?;
                element.children.push(XmlNode::Element(child));
            } else {
                let start = self.pos;
                let len = self.rest().find('<').unwrap_or(self.rest().len());
                let raw = &self.src[start..start + len];
                let text = self.decode_entities(raw, start)?;
                self.pos += len;
                push_text(element, text);
            }
        }
    }

    fn decode_entities(&self, raw: &str, offset: usize) -> Result<String> {
        if !raw.contains('&') {
            return Ok(raw.to_string());
        }

        let mut out = String::with_capacity(raw.len());
        let mut rest = raw;
        let mut consumed = 0usize;

        while let Some(amp) = rest.find('&') {
            out.push_str(&rest[..amp]);
            let after = &rest[amp + 1..];
            let Some(semi) = after.find(';').filter(|&i| i <= 10) else {
                return Err(self.error_at(offset + consumed + amp, "unterminated entity reference"));
            };
            let entity = &after[..semi];
            let decoded = decode_entity(entity).ok_or_else(|| {
                self.error_at(
                    offset + consumed + amp,
                    format!("unknown entity '&{};'", entity),
                )
            })?;
            out.push(decoded);

            let advance = amp + 1 + semi + 1;
            consumed += advance;
            rest = &rest[advance..];
        }

        out.push_str(rest);
        Ok(out)
    }
}

fn push_text(element: &mut XmlElement, text: String) {
    if text.is_empty() {
        return;
    }
    if let Some(XmlNode::Text(last)) = element.children.last_mut() {
        last.push_str(&text);
    } else {
        element.children.push(XmlNode::Text(text));
    }
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = if let Some(hex) = entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                entity.strip_prefix('#')?.parse::<u32>().ok()?
            };
            char::from_u32(code)
        }
    }
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == ':'
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | ':' | '-' | '.')
}

/// Escape text content.
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape a double-quoted attribute value.
pub fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}

/// Turn an arbitrary key into a valid element/attribute name.
pub fn sanitize_name(key: &str) -> String {
    let mut name: String = key
        .chars()
        .map(|c| if is_name_char(c) { c } else { '_' })
        .collect();

    if name.is_empty() {
        return "item".to_string();
    }
    if name.chars().next().is_some_and(|c| !is_name_start(c)) {
        name.insert(0, '_');
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_elements_with_attributes() {
        let root = parse(r#"<?xml version="1.0"?><book id="7" lang='en'><title>Rust</title><tags/></book>"#)
            .unwrap();

        assert_eq!(root.name, "book");
        assert_eq!(
            root.attributes,
            vec![
                ("id".to_string(), "7".to_string()),
                ("lang".to_string(), "en".to_string())
            ]
        );
        let children: Vec<&XmlElement> = root.child_elements().collect();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].text(), "Rust");
        assert!(children[1].children.is_empty());
    }

    #[test]
    fn decodes_entities_and_cdata() {
        let root = parse("<a>1 &lt; 2 &amp;&#65;&#x42;<![CDATA[<raw> & stuff]]></a>").unwrap();
        assert_eq!(root.text(), "1 < 2 &AB<raw> & stuff");
    }

    #[test]
    fn skips_comments_doctype_and_processing_instructions() {
        let input = "<!DOCTYPE note [<!ELEMENT note (#PCDATA)>]>\n<!-- head -->\n<note><?pi x?>hi<!-- inner --></note>\n<!-- tail -->";
        let root = parse(input).unwrap();
        assert_eq!(root.name, "note");
        assert_eq!(root.text(), "hi");
    }

    #[test]
    fn mismatched_tag_reports_position() {
        let err = parse("<a>\n  <b></c>\n</a>").unwrap_err();
        assert_eq!(err.code.as_str(), "input.parse_failed");
        assert_eq!(err.details["line"], 2);
        assert_eq!(err.details["column"], 6);
        assert!(err.details["error"]
            .as_str()
            .unwrap()
            .contains("expected </b>, found </c>"));
    }

    #[test]
    fn unclosed_element_is_an_error() {
        let err = parse("<a><b>text</b>").unwrap_err();
        assert!(err.details["error"].as_str().unwrap().contains("unclosed element <a>"));
    }

    #[test]
    fn trailing_content_is_an_error() {
        assert!(parse("<a/><b/>").is_err());
        assert!(parse("<a/> junk").is_err());
    }

    #[test]
    fn empty_document_is_an_error() {
        let err = parse("   ").unwrap_err();
        assert!(err.details["error"].as_str().unwrap().contains("no root element"));
    }

    #[test]
    fn duplicate_attribute_is_an_error() {
        assert!(parse(r#"<a x="1" x="2"/>"#).is_err());
    }

    #[test]
    fn unknown_entity_is_an_error() {
        let err = parse("<a>&nbsp;</a>").unwrap_err();
        assert!(err.details["error"].as_str().unwrap().contains("&nbsp;"));
    }

    #[test]
    fn nesting_limit_is_an_error_not_a_crash() {
        let at_limit = format!("{}{}", "<a>".repeat(MAX_DEPTH), "</a>".repeat(MAX_DEPTH));
        assert!(parse(&at_limit).is_ok());

        let deep = format!("{}{}", "<a>".repeat(200_000), "</a>".repeat(200_000));
        let err = parse(&deep).unwrap_err();
        assert_eq!(err.code.as_str(), "input.parse_failed");
        assert_eq!(err.details["line"], 1);
        assert_eq!(err.details["column"], MAX_DEPTH * 3 + 1);
        assert!(err.details["error"].as_str().unwrap().contains("nested deeper than 256"));
    }

    #[test]
    fn sanitize_name_fixes_invalid_keys() {
        assert_eq!(sanitize_name("first name"), "first_name");
        assert_eq!(sanitize_name("1st"), "_1st");
        assert_eq!(sanitize_name(""), "item");
        assert_eq!(sanitize_name("ns:tag"), "ns:tag");
    }

    #[test]
    fn escaping() {
        assert_eq!(escape_text("a < b & c"), "a &lt; b &amp; c");
        assert_eq!(escape_attr(r#"say "hi""#), "say &quot;hi&quot;");
    }
}
