//! Cache Key Construction
//!
//! Builds deterministic cache keys from an operation name and its normalized
//! parameters, so that semantically identical calls land on the same entry
//! regardless of argument order.

// == Cache Key ==
/// Derives a cache key from an operation name and its parameters.
///
/// Normalization rules:
/// - parameters with a `None` value are omitted entirely
/// - remaining parameters are sorted lexicographically by name
/// - the result is `operation?name=value&name=value`, or just `operation`
///   when no parameters survive normalization
pub fn cache_key(operation: &str, params: &[(&str, Option<String>)]) -> String {
    let mut fields: Vec<(&str, &str)> = params
        .iter()
        .filter_map(|(name, value)| value.as_deref().map(|v| (*name, v)))
        .collect();

    if fields.is_empty() {
        return operation.to_string();
    }

    fields.sort_by(|a, b| a.0.cmp(b.0));

    let query: Vec<String> = fields
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect();

    format!("{}?{}", operation, query.join("&"))
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_no_params() {
        let key = cache_key("contacts:list", &[]);
        assert_eq!(key, "contacts:list");
    }

    #[test]
    fn test_key_omits_none_params() {
        let key = cache_key(
            "contacts:list",
            &[("where", Some("Name==\"A\"".to_string())), ("page", None)],
        );
        assert_eq!(key, "contacts:list?where=Name==\"A\"");
    }

    #[test]
    fn test_key_order_independence() {
        let a = cache_key(
            "contacts:list",
            &[("where", Some("Name==\"A\"".to_string())), ("page", None)],
        );
        let b = cache_key(
            "contacts:list",
            &[("page", None), ("where", Some("Name==\"A\"".to_string()))],
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_key_sorted_by_field_name() {
        let key = cache_key(
            "invoices:list",
            &[
                ("page", Some("2".to_string())),
                ("order", Some("Date".to_string())),
            ],
        );
        assert_eq!(key, "invoices:list?order=Date&page=2");
    }

    #[test]
    fn test_key_all_none_collapses_to_operation() {
        let key = cache_key("invoices:list", &[("page", None), ("where", None)]);
        assert_eq!(key, "invoices:list");
    }
}
