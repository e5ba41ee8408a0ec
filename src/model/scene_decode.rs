use serde_json::Value;

/// Decode the model's reply into (scene text, choice labels).
///
/// The reply is untrusted: models wrap the requested JSON object in prose,
/// markdown fences, or nothing at all. Try a strict parse of the whole
/// payload first, then a greedy first-`{`-to-last-`}` substring. This
/// function never fails; anything unusable degrades to an empty scene and no
/// labels, and the resolver's fallback routing takes over.
pub fn decode_scene(raw: &str) -> (String, Vec<String>) {
    let Some(value) = parse_object(raw) else {
        return (String::new(), Vec::new());
    };

    let scene = value
        .get("scene")
        .and_then(Value::as_str)
        .unwrap_or("")
        .trim()
        .to_string();

    let labels = value
        .get("options")
        .and_then(Value::as_array)
        .and_then(|items| string_list(items))
        .unwrap_or_default();

    (scene, labels)
}

fn parse_object(raw: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str(raw) {
        return Some(value);
    }

    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    serde_json::from_str(&raw[start..=end]).ok()
}

// One non-string entry discards the whole list. At most two labels survive.
fn string_list(items: &[Value]) -> Option<Vec<String>> {
    let mut labels = Vec::new();
    for item in items {
        labels.push(item.as_str()?.trim().to_string());
    }
    labels.truncate(2);
    Some(labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_a_clean_reply() {
        let (scene, labels) = decode_scene(r#"{"scene":"The fog lifts.","options":["Run","Hide"]}"#);
        assert_eq!(scene, "The fog lifts.");
        assert_eq!(labels, vec!["Run", "Hide"]);
    }

    #[test]
    fn recovers_object_wrapped_in_noise() {
        let raw = "noise {\"scene\":\"S\",\"options\":[\"A\",\"B\"]} trailing";
        let (scene, labels) = decode_scene(raw);
        assert_eq!(scene, "S");
        assert_eq!(labels, vec!["A", "B"]);
    }

    #[test]
    fn garbage_degrades_to_empty() {
        let (scene, labels) = decode_scene("garbage");
        assert_eq!(scene, "");
        assert!(labels.is_empty());
    }

    #[test]
    fn unparseable_braced_span_degrades_to_empty() {
        let (scene, labels) = decode_scene("so { this is not json } really");
        assert_eq!(scene, "");
        assert!(labels.is_empty());
    }

    #[test]
    fn non_string_scene_becomes_empty() {
        let (scene, labels) = decode_scene(r#"{"scene":42,"options":["A"]}"#);
        assert_eq!(scene, "");
        assert_eq!(labels, vec!["A"]);
    }

    #[test]
    fn non_string_option_discards_the_list() {
        let (scene, labels) = decode_scene(r#"{"scene":"S","options":["A",2]}"#);
        assert_eq!(scene, "S");
        assert!(labels.is_empty());
    }

    #[test]
    fn non_object_reply_degrades_to_empty() {
        let (scene, labels) = decode_scene(r#"["scene","options"]"#);
        assert_eq!(scene, "");
        assert!(labels.is_empty());
    }

    #[test]
    fn keeps_at_most_two_labels_in_order() {
        let (_, labels) = decode_scene(r#"{"scene":"S","options":["A","B","C"]}"#);
        assert_eq!(labels, vec!["A", "B"]);
    }

    #[test]
    fn trims_scene_and_labels() {
        let (scene, labels) = decode_scene(r#"{"scene":"  S  ","options":["  A ","B  "]}"#);
        assert_eq!(scene, "S");
        assert_eq!(labels, vec!["A", "B"]);
    }

    #[test]
    fn missing_options_field_yields_no_labels() {
        let (scene, labels) = decode_scene(r#"{"scene":"S"}"#);
        assert_eq!(scene, "S");
        assert!(labels.is_empty());
    }
}
