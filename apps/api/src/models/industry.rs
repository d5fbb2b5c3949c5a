use serde::{Deserialize, Serialize};

/// Closed set of industries the dictionaries are scoped by.
/// Unknown names resolve to `General`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Industry {
    Technology,
    Healthcare,
    Finance,
    Marketing,
    Sales,
    #[default]
    General,
}

impl Industry {
    /// Every industry, in detection tie-break order.
    pub const ALL: [Industry; 6] = [
        Industry::Technology,
        Industry::Healthcare,
        Industry::Finance,
        Industry::Marketing,
        Industry::Sales,
        Industry::General,
    ];

    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "technology" | "tech" => Industry::Technology,
            "healthcare" => Industry::Healthcare,
            "finance" => Industry::Finance,
            "marketing" => Industry::Marketing,
            "sales" => Industry::Sales,
            _ => Industry::General,
        }
    }

    /// Resolves an optional caller-supplied name. `None` stays `None` so the
    /// extractor can distinguish "not given" from "given as general".
    pub fn resolve(name: Option<&str>) -> Option<Self> {
        name.filter(|n| !n.trim().is_empty()).map(Self::from_name)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Industry::Technology => "Technology",
            Industry::Healthcare => "Healthcare",
            Industry::Finance => "Finance",
            Industry::Marketing => "Marketing",
            Industry::Sales => "Sales",
            Industry::General => "General",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_names_resolve_case_insensitively() {
        assert_eq!(Industry::from_name("Healthcare"), Industry::Healthcare);
        assert_eq!(Industry::from_name(" FINANCE "), Industry::Finance);
    }

    #[test]
    fn test_unknown_name_falls_back_to_general() {
        assert_eq!(Industry::from_name("aerospace"), Industry::General);
    }

    #[test]
    fn test_resolve_keeps_absence() {
        assert_eq!(Industry::resolve(None), None);
        assert_eq!(Industry::resolve(Some("  ")), None);
        assert_eq!(Industry::resolve(Some("sales")), Some(Industry::Sales));
    }

    #[test]
    fn test_serde_is_snake_case() {
        let json = serde_json::to_string(&Industry::Technology).unwrap();
        assert_eq!(json, r#""technology""#);
    }
}
