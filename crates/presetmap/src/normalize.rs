use std::collections::BTreeMap;

use serde_json::Value;

use crate::diagnostics::Diagnostic;
use crate::ranges::RangeTable;

/// Normalized preset values plus notices for every setting left out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    pub values: BTreeMap<String, f64>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Rescale each setting that has known bounds into `[0, 1]`.
///
/// Settings without bounds, with non-numeric values, with an empty range or
/// whose rescaled value is not finite are dropped and reported. Values outside
/// their bounds are kept unclamped and reported.
pub fn normalize<'a, I>(ranges: &RangeTable, settings: I) -> Normalized
where
    I: IntoIterator<Item = (&'a String, &'a Value)>,
{
    let mut normalized = Normalized::default();
    for (name, value) in settings {
        let Some(range) = ranges.get(name) else {
            normalized
                .diagnostics
                .push(Diagnostic::NoRange { name: name.clone() });
            continue;
        };
        let Some(raw) = value.as_f64() else {
            normalized
                .diagnostics
                .push(Diagnostic::NotNumeric { name: name.clone() });
            continue;
        };
        let Some(scaled) = range.normalize(raw) else {
            normalized.diagnostics.push(Diagnostic::DegenerateRange {
                name: name.clone(),
                min: range.min,
                max: range.max,
            });
            continue;
        };
        if !scaled.is_finite() {
            normalized.diagnostics.push(Diagnostic::NonFinite {
                name: name.clone(),
                value: raw,
            });
            continue;
        }
        if !range.contains(raw) {
            normalized.diagnostics.push(Diagnostic::OutOfRange {
                name: name.clone(),
                value: raw,
            });
        }
        normalized.values.insert(name.clone(), scaled);
    }
    normalized
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::ranges::ParameterRange;

    fn settings(value: Value) -> serde_json::Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn scenario_ranges() -> RangeTable {
        RangeTable::parse(r#"{ "Volume", 0.0, 1.0, foo},{ "Cutoff", 20.0, 20000.0, bar}"#)
            .unwrap()
    }

    #[test]
    fn normalizes_known_and_drops_unknown() {
        let raw = settings(json!({"Volume": 0.5, "Cutoff": 10000.0, "Unknown": 9}));
        let result = normalize(&scenario_ranges(), &raw);

        assert_eq!(result.values.len(), 2);
        assert_eq!(result.values["Volume"], 0.5);
        assert!((result.values["Cutoff"] - 9980.0 / 19980.0).abs() < 1e-12);
        assert!(!result.values.contains_key("Unknown"));
        assert_eq!(
            result.diagnostics,
            vec![Diagnostic::NoRange {
                name: "Unknown".into()
            }]
        );
    }

    #[test]
    fn endpoints_map_to_zero_and_one() {
        let mut ranges = RangeTable::default();
        ranges.insert("filter_resonance", ParameterRange::new(-3.5, 12.25));
        for (raw, expected) in [(-3.5, 0.0), (12.25, 1.0)] {
            let values = settings(json!({ "filter_resonance": raw }));
            let result = normalize(&ranges, &values);
            assert_eq!(result.values["filter_resonance"], expected);
            assert!(result.diagnostics.is_empty());
        }
    }

    #[test]
    fn in_range_values_stay_in_unit_interval() {
        let range = ParameterRange::new(-24.0, 48.0);
        let mut ranges = RangeTable::default();
        ranges.insert("osc_1_transpose", range);
        for step in 0..=72 {
            let raw = -24.0 + step as f64;
            let values = settings(json!({ "osc_1_transpose": raw }));
            let scaled = normalize(&ranges, &values).values["osc_1_transpose"];
            assert!((0.0..=1.0).contains(&scaled), "{raw} -> {scaled}");
        }
    }

    #[test]
    fn never_emits_names_without_range() {
        let ranges = scenario_ranges();
        let raw = settings(json!({"Volume": 1.0, "Resonance": 0.2, "Drive": 3}));
        let result = normalize(&ranges, &raw);
        assert!(result.values.keys().all(|name| ranges.get(name).is_some()));
        assert_eq!(result.diagnostics.len(), 2);
    }

    #[test]
    fn degenerate_range_is_reported_not_divided() {
        let mut ranges = RangeTable::default();
        ranges.insert("polyphony", ParameterRange::new(1.0, 1.0));
        let raw = settings(json!({"polyphony": 1.0}));
        let result = normalize(&ranges, &raw);
        assert!(result.values.is_empty());
        assert_eq!(
            result.diagnostics,
            vec![Diagnostic::DegenerateRange {
                name: "polyphony".into(),
                min: 1.0,
                max: 1.0,
            }]
        );
    }

    #[test]
    fn non_numeric_value_with_range_is_reported() {
        let ranges = scenario_ranges();
        let raw = settings(json!({"Volume": "loud", "modulations": []}));
        let result = normalize(&ranges, &raw);
        assert!(result.values.is_empty());
        assert_eq!(
            result.diagnostics,
            vec![
                Diagnostic::NotNumeric {
                    name: "Volume".into()
                },
                Diagnostic::NoRange {
                    name: "modulations".into()
                },
            ]
        );
    }

    #[test]
    fn overflowing_value_is_dropped_not_emitted_as_infinity() {
        let mut ranges = RangeTable::default();
        ranges.insert("volume", ParameterRange::new(0.0, 1e-10));
        let raw = settings(json!({"volume": 1e308}));
        let result = normalize(&ranges, &raw);
        assert!(result.values.is_empty());
        assert_eq!(
            result.diagnostics,
            vec![Diagnostic::NonFinite {
                name: "volume".into(),
                value: 1e308,
            }]
        );
        assert!(result.diagnostics[0].is_dropped());
    }

    #[test]
    fn out_of_range_value_is_kept_and_reported() {
        let ranges = scenario_ranges();
        let raw = settings(json!({"Volume": 1.5}));
        let result = normalize(&ranges, &raw);
        assert_eq!(result.values["Volume"], 1.5);
        assert!(!result.diagnostics[0].is_dropped());
    }
}
