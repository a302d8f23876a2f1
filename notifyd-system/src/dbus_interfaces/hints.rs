//! Decoding of the `Notify` hints dictionary.
//!
//! Only the keys the daemon acts on are decoded. Values of an unexpected type
//! are treated like absent keys, and unknown keys are ignored.

use std::collections::HashMap;

use novade_notifyd_domain::notifications::{Hints, ImageData, NotificationImage, Urgency};
use zbus::zvariant::{OwnedValue, Value};

const IMAGE_DATA_KEYS: &[&str] = &["image-data", "image_data", "icon_data"];
const IMAGE_PATH_KEYS: &[&str] = &["image-path", "image_path"];

/// Strips variant wrappers (`v` inside `v`).
fn unwrap_variant<'a, 'v>(value: &'a Value<'v>) -> &'a Value<'v> {
    match value {
        Value::Value(inner) => unwrap_variant(inner),
        other => other,
    }
}

fn as_integer(value: &Value<'_>) -> Option<i64> {
    match unwrap_variant(value) {
        Value::U8(v) => Some(i64::from(*v)),
        Value::I16(v) => Some(i64::from(*v)),
        Value::U16(v) => Some(i64::from(*v)),
        Value::I32(v) => Some(i64::from(*v)),
        Value::U32(v) => Some(i64::from(*v)),
        Value::I64(v) => Some(*v),
        Value::U64(v) => i64::try_from(*v).ok(),
        _ => None,
    }
}

fn as_bool(value: &Value<'_>) -> Option<bool> {
    match unwrap_variant(value) {
        Value::Bool(b) => Some(*b),
        _ => None,
    }
}

fn as_string(value: &Value<'_>) -> Option<String> {
    match unwrap_variant(value) {
        Value::Str(s) => Some(s.as_str().to_string()),
        _ => None,
    }
}

/// Decodes an `(iiibiiay)` image structure.
fn as_image_data(value: &Value<'_>) -> Option<ImageData> {
    let Value::Structure(structure) = unwrap_variant(value) else {
        return None;
    };
    let fields = structure.fields();
    if fields.len() != 7 {
        return None;
    }
    let int = |index: usize| match unwrap_variant(&fields[index]) {
        Value::I32(v) => Some(*v),
        _ => None,
    };
    let data = match unwrap_variant(&fields[6]) {
        Value::Array(array) => array
            .get()
            .iter()
            .map(|byte| match byte {
                Value::U8(b) => Some(*b),
                _ => None,
            })
            .collect::<Option<Vec<u8>>>()?,
        _ => return None,
    };

    Some(ImageData {
        width: int(0)?,
        height: int(1)?,
        rowstride: int(2)?,
        has_alpha: as_bool(&fields[3])?,
        bits_per_sample: int(4)?,
        channels: int(5)?,
        data,
    })
}

fn first_of<T>(hints: &HashMap<String, OwnedValue>, keys: &[&str], decode: impl Fn(&Value<'_>) -> Option<T>) -> Option<T> {
    keys.iter().find_map(|key| hints.get(*key).and_then(|value| decode(&**value)))
}

/// Decodes the recognized hints. Pixel data wins over an image path when both are sent.
pub fn decode_hints(hints: &HashMap<String, OwnedValue>) -> Hints {
    let urgency = hints
        .get("urgency")
        .and_then(|v| as_integer(v))
        .map(Urgency::from_level)
        .unwrap_or_default();

    let image = first_of(hints, IMAGE_DATA_KEYS, as_image_data)
        .map(NotificationImage::Pixels)
        .or_else(|| first_of(hints, IMAGE_PATH_KEYS, as_string).map(NotificationImage::Path));

    Hints {
        urgency,
        action_icons: hints.get("action-icons").and_then(|v| as_bool(v)).unwrap_or(false),
        value: hints
            .get("value")
            .and_then(|v| as_integer(v))
            .map(|progress| progress.clamp(0, 100) as u8),
        image,
        category: hints.get("category").and_then(|v| as_string(v)),
        desktop_entry: hints.get("desktop-entry").and_then(|v| as_string(v)),
        transient: hints.get("transient").and_then(|v| as_bool(v)).unwrap_or(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use zbus::zvariant::Structure;

    fn hints(entries: Vec<(&str, Value<'static>)>) -> HashMap<String, OwnedValue> {
        entries
            .into_iter()
            .map(|(key, value)| (key.to_string(), OwnedValue::from(value)))
            .collect()
    }

    fn image_value(width: i32, data: Vec<u8>) -> Value<'static> {
        Value::from(Structure::from((width, 1i32, width * 4, true, 8i32, 4i32, data)))
    }

    #[rstest]
    #[case(Value::U8(0), Urgency::Low)]
    #[case(Value::U8(1), Urgency::Normal)]
    #[case(Value::U8(2), Urgency::Critical)]
    #[case(Value::U8(7), Urgency::Normal)]
    #[case(Value::I32(2), Urgency::Critical)]
    #[case(Value::U32(0), Urgency::Low)]
    #[case(Value::from("critical"), Urgency::Normal)]
    fn urgency_hint(#[case] raw: Value<'static>, #[case] expected: Urgency) {
        assert_eq!(decode_hints(&hints(vec![("urgency", raw)])).urgency, expected);
    }

    #[test]
    fn empty_hints_decode_to_defaults() {
        assert_eq!(decode_hints(&HashMap::new()), Hints::default());
    }

    #[test]
    fn nested_variants_are_unwrapped() {
        let decoded = decode_hints(&hints(vec![("urgency", Value::Value(Box::new(Value::U8(2))))]));
        assert_eq!(decoded.urgency, Urgency::Critical);
    }

    #[test]
    fn pass_through_hints() {
        let decoded = decode_hints(&hints(vec![
            ("action-icons", Value::Bool(true)),
            ("category", Value::from("email.arrived")),
            ("desktop-entry", Value::from("org.example.Mail")),
            ("transient", Value::Bool(true)),
            ("x-vendor-extension", Value::U32(99)),
        ]));
        assert!(decoded.action_icons);
        assert!(decoded.transient);
        assert_eq!(decoded.category.as_deref(), Some("email.arrived"));
        assert_eq!(decoded.desktop_entry.as_deref(), Some("org.example.Mail"));
    }

    #[rstest]
    #[case(Value::I32(42), Some(42))]
    #[case(Value::I32(150), Some(100))]
    #[case(Value::I32(-5), Some(0))]
    #[case(Value::from("half"), None)]
    fn progress_value(#[case] raw: Value<'static>, #[case] expected: Option<u8>) {
        assert_eq!(decode_hints(&hints(vec![("value", raw)])).value, expected);
    }

    #[rstest]
    #[case("image-data")]
    #[case("image_data")]
    #[case("icon_data")]
    fn image_data_spellings(#[case] key: &str) {
        let decoded = decode_hints(&hints(vec![(key, image_value(1, vec![1, 2, 3, 4]))]));
        assert_eq!(
            decoded.image,
            Some(NotificationImage::Pixels(ImageData {
                width: 1,
                height: 1,
                rowstride: 4,
                has_alpha: true,
                bits_per_sample: 8,
                channels: 4,
                data: vec![1, 2, 3, 4],
            }))
        );
    }

    #[test]
    fn image_path_and_pixels_prefer_pixels() {
        let path_only = decode_hints(&hints(vec![("image_path", Value::from("/usr/share/icons/mail.png"))]));
        assert_eq!(
            path_only.image,
            Some(NotificationImage::Path("/usr/share/icons/mail.png".to_string()))
        );

        let both = decode_hints(&hints(vec![
            ("image-path", Value::from("mail-unread")),
            ("image-data", image_value(1, vec![0, 0, 0, 255])),
        ]));
        assert!(matches!(both.image, Some(NotificationImage::Pixels(_))));
    }

    #[test]
    fn malformed_image_data_is_ignored() {
        let decoded = decode_hints(&hints(vec![("image-data", Value::from(Structure::from((1i32, 2i32))))]));
        assert_eq!(decoded.image, None);
    }
}
