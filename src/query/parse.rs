use crate::errors::ArchiveError;
use serde::{Deserialize, Serialize};

use super::types::FilterTriple;

/// Inbound query body: `{"filters": [{"field": .., "operator": .., "value": ..}]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryForm {
    #[serde(default)]
    pub filters: Vec<FilterTriple>,
}

/// # Errors
/// Returns an error if the JSON text is not a query body.
pub fn parse_query_json(json: &str) -> Result<QueryForm, ArchiveError> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_filters_in_order() {
        let j = r#"{"filters":[{"field":"AUTHOR","operator":"EQ","value":"dan"},{"field":"TAGS","operator":"GT","value":"m"}]}"#;
        let form = parse_query_json(j).unwrap();
        assert_eq!(form.filters.len(), 2);
        assert_eq!(form.filters[1], FilterTriple::new("TAGS", "GT", "m"));
    }

    #[test]
    fn missing_filters_is_empty() {
        assert!(parse_query_json("{}").unwrap().filters.is_empty());
    }

    #[test]
    fn malformed_body_is_a_json_error() {
        assert!(matches!(parse_query_json("{\"filters\":3}"), Err(ArchiveError::Json(_))));
    }
}
