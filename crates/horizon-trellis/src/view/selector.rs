//! Restricted element selectors.
//!
//! Every selector the binding layer computes or accepts has the shape
//! `tag[attr='value']...`: an optional tag name followed by attribute
//! tests. That grammar is all [`Selector`] parses and matches; anything
//! richer belongs to the host document implementation.

use std::fmt;
use std::str::FromStr;

use crate::error::SelectorError;
use crate::view::dom::Element;

/// A parsed `tag[attr='value']` selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    tag: Option<String>,
    attributes: Vec<(String, String)>,
}

impl Selector {
    /// Parses a selector string.
    ///
    /// The grammar is an optional tag name (letters, digits, `-`, `_`)
    /// followed by zero or more `[name='value']` attribute tests; values may
    /// be single- or double-quoted. At least one of the two parts must be
    /// present.
    pub fn parse(input: &str) -> Result<Selector, SelectorError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(SelectorError::Empty);
        }
        let malformed = || SelectorError::Malformed {
            selector: input.to_string(),
        };

        let tag_end = trimmed.find('[').unwrap_or(trimmed.len());
        let tag_part = &trimmed[..tag_end];
        let tag = if tag_part.is_empty() {
            None
        } else {
            if !tag_part
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            {
                return Err(malformed());
            }
            Some(tag_part.to_string())
        };

        let mut attributes = Vec::new();
        let mut rest = &trimmed[tag_end..];
        while !rest.is_empty() {
            let Some(body) = rest.strip_prefix('[') else {
                return Err(malformed());
            };
            let Some(close) = body.find(']') else {
                return Err(malformed());
            };
            let test = &body[..close];
            let Some((name, quoted)) = test.split_once('=') else {
                return Err(malformed());
            };
            let name = name.trim();
            if name.is_empty() {
                return Err(malformed());
            }
            let quoted = quoted.trim();
            let value = quoted
                .strip_prefix('\'')
                .and_then(|v| v.strip_suffix('\''))
                .or_else(|| quoted.strip_prefix('"').and_then(|v| v.strip_suffix('"')))
                .ok_or_else(|| malformed())?;
            attributes.push((name.to_string(), value.to_string()));
            rest = &body[close + 1..];
        }

        if tag.is_none() && attributes.is_empty() {
            return Err(malformed());
        }
        Ok(Selector { tag, attributes })
    }

    /// The tag-name test, if any.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// The attribute tests, in source order.
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Returns `true` if the element satisfies every test in the selector.
    pub fn matches(&self, element: &dyn Element) -> bool {
        if let Some(tag) = &self.tag {
            if element.tag() != *tag {
                return false;
            }
        }
        self.attributes
            .iter()
            .all(|(name, value)| element.attribute(name).as_deref() == Some(value.as_str()))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(tag) = &self.tag {
            f.write_str(tag)?;
        }
        for (name, value) in &self.attributes {
            write!(f, "[{name}='{value}']")?;
        }
        Ok(())
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::dom::MemoryElement;

    #[test]
    fn test_parse_tag_only() {
        let selector = Selector::parse("div").unwrap();
        assert_eq!(selector.tag(), Some("div"));
        assert!(selector.attributes().is_empty());
    }

    #[test]
    fn test_parse_tag_with_attributes() {
        let selector = Selector::parse("script[type='text/template'][data-view='Item']").unwrap();
        assert_eq!(selector.tag(), Some("script"));
        assert_eq!(
            selector.attributes(),
            &[
                ("type".to_string(), "text/template".to_string()),
                ("data-view".to_string(), "Item".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_attribute_only() {
        let selector = Selector::parse("[data-view='Item']").unwrap();
        assert_eq!(selector.tag(), None);
        assert_eq!(selector.attributes().len(), 1);
    }

    #[test]
    fn test_parse_double_quotes() {
        let selector = Selector::parse("div[data-model=\"Item\"]").unwrap();
        assert_eq!(selector.attributes()[0].1, "Item");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(Selector::parse("  "), Err(SelectorError::Empty));
        assert!(Selector::parse("div[").is_err());
        assert!(Selector::parse("div[attr]").is_err());
        assert!(Selector::parse("div[attr=unquoted]").is_err());
        assert!(Selector::parse("div.class").is_err());
        assert!(Selector::parse("div trailing").is_err());
    }

    #[test]
    fn test_display_round_trip() {
        let source = "div[data-view='Item'][class='big']";
        let selector = Selector::parse(source).unwrap();
        assert_eq!(selector.to_string(), source);
        assert_eq!(Selector::parse(&selector.to_string()).unwrap(), selector);
    }

    #[test]
    fn test_matches() {
        let element = MemoryElement::new("div")
            .with_attribute("data-view", "Item")
            .into_shared();
        assert!(Selector::parse("div").unwrap().matches(element.as_ref()));
        assert!(Selector::parse("div[data-view='Item']").unwrap().matches(element.as_ref()));
        assert!(Selector::parse("[data-view='Item']").unwrap().matches(element.as_ref()));
        assert!(!Selector::parse("span").unwrap().matches(element.as_ref()));
        assert!(!Selector::parse("div[data-view='Other']").unwrap().matches(element.as_ref()));
        assert!(!Selector::parse("div[missing='x']").unwrap().matches(element.as_ref()));
    }
}
