//! Naming templates with a single positional placeholder.
//!
//! Index and tag families are described by templates such as `"k{}"` or
//! `"I{}"`. A [`Template`] is parsed once, so formatting a value can never
//! fail afterwards.

use std::fmt;

use crate::error::{NetworkError, Result};

/// Parsed template of the form `prefix{}suffix`.
///
/// # Example
/// ```
/// use ttn_core::Template;
///
/// let t = Template::parse("I{}").unwrap();
/// assert_eq!(t.format(7), "I7");
/// assert!(Template::parse("I").is_err());
/// assert!(Template::parse("{}_{}").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Template {
    prefix: String,
    suffix: String,
}

impl Template {
    /// Parse a template containing exactly one `{}` placeholder.
    pub fn parse(template: &str) -> Result<Self> {
        let invalid = || NetworkError::InvalidTemplate {
            template: template.to_string(),
        };
        let (prefix, suffix) = template.split_once("{}").ok_or_else(invalid)?;
        if suffix.contains("{}") {
            return Err(invalid());
        }
        Ok(Self {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        })
    }

    /// Substitute `value` for the placeholder.
    pub fn format(&self, value: usize) -> String {
        format!("{}{}{}", self.prefix, value, self.suffix)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{}}{}", self.prefix, self.suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_format() {
        let t = Template::parse("site_{}_x").unwrap();
        assert_eq!(t.format(0), "site_0_x");
        assert_eq!(t.format(12), "site_12_x");
        assert_eq!(t.to_string(), "site_{}_x");
    }

    #[test]
    fn test_rejects_missing_or_repeated_placeholder() {
        assert_eq!(
            Template::parse("abc"),
            Err(NetworkError::InvalidTemplate {
                template: "abc".to_string()
            })
        );
        assert!(Template::parse("{}{}").is_err());
    }
}
