use orr_sdk::objects::moderation::FieldDiff;
use std::collections::BTreeMap;

/// Compare a proposed payload against the canonical state of its target.
///
/// Only keys present in `proposed` are considered; a key appears in the
/// result when its proposed value differs (strict inequality) from the
/// canonical one. Identical fields are omitted entirely rather than
/// returned as no-op pairs. With no canonical record every proposed key
/// differs by definition.
pub fn diff_fields(
    current: Option<&serde_json::Value>,
    proposed: &serde_json::Value,
) -> BTreeMap<String, FieldDiff> {
    let mut out = BTreeMap::new();
    let Some(proposed_map) = proposed.as_object() else {
        return out;
    };

    for (key, proposed_value) in proposed_map {
        let current_value = current.and_then(|c| c.get(key));
        if current_value == Some(proposed_value) {
            continue;
        }
        out.insert(
            key.clone(),
            FieldDiff {
                current: current_value.cloned(),
                proposed: proposed_value.clone(),
            },
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn identical_fields_are_omitted() {
        let current = json!({"vin": "A", "sequence": 182, "destroyed": false});
        let proposed = json!({"vin": "A", "sequence": 183});

        let diff = diff_fields(Some(&current), &proposed);

        assert_eq!(diff.len(), 1);
        assert_eq!(diff["sequence"].current, Some(json!(182)));
        assert_eq!(diff["sequence"].proposed, json!(183));
    }

    #[test]
    fn comparison_is_strict() {
        // "182" (string) and 182 (number) are different values.
        let current = json!({"sequence": "182"});
        let proposed = json!({"sequence": 182});
        let diff = diff_fields(Some(&current), &proposed);
        assert_eq!(diff.len(), 1);
    }

    #[test]
    fn keys_absent_from_proposed_are_ignored() {
        let current = json!({"vin": "A", "sequence": 182});
        let proposed = json!({});
        assert!(diff_fields(Some(&current), &proposed).is_empty());
    }

    #[test]
    fn missing_canonical_record_diffs_everything() {
        let proposed = json!({"vin": "A", "sequence": 182});
        let diff = diff_fields(None, &proposed);
        assert_eq!(diff.len(), 2);
        assert_eq!(diff["vin"].current, None);
        assert_eq!(diff["vin"].proposed, json!("A"));
    }

    #[test]
    fn null_current_field_differs_from_value() {
        let current = json!({"sold_date": null});
        let proposed = json!({"sold_date": "1991-05-20"});
        let diff = diff_fields(Some(&current), &proposed);
        assert_eq!(diff["sold_date"].current, Some(json!(null)));
    }
}
