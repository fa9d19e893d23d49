use serde_json::Value;

/// A field value resolved into a scoring class, exactly once at extraction
/// time.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueClass {
	/// Comparable text, already trimmed.
	Text(String),
	/// JSON numbers and all-digit strings. Never compared as text.
	Numeric,
	/// Nested mappings, nulls and empty text. Never compared.
	Unsupported,
}
impl ValueClass {
	pub fn as_text(&self) -> Option<&str> {
		match self {
			Self::Text(text) => Some(text),
			_ => None,
		}
	}
}

/// Resolves a raw JSON value into a [`ValueClass`].
///
/// Rules:
/// - strings are trimmed; all-digit strings are numeric, empty strings are
///   unsupported;
/// - numbers are numeric;
/// - booleans are stringified;
/// - lists are space-joined (string elements as-is, other elements in their
///   JSON form) and the joined text is not re-checked for digits;
/// - mappings and nulls are unsupported, since semantic comparison of nested
///   structures is undefined.
pub fn classify(value: &Value) -> ValueClass {
	match value {
		Value::String(raw) => {
			let trimmed = raw.trim();

			if trimmed.is_empty() {
				return ValueClass::Unsupported;
			}
			if trimmed.chars().all(|ch| ch.is_ascii_digit()) {
				return ValueClass::Numeric;
			}

			ValueClass::Text(trimmed.to_string())
		},
		Value::Number(_) => ValueClass::Numeric,
		Value::Bool(flag) => ValueClass::Text(flag.to_string()),
		Value::Array(items) => {
			let joined = items
				.iter()
				.map(|item| match item {
					Value::String(text) => text.clone(),
					other => other.to_string(),
				})
				.collect::<Vec<_>>()
				.join(" ");
			let trimmed = joined.trim();

			if trimmed.is_empty() {
				ValueClass::Unsupported
			} else {
				ValueClass::Text(trimmed.to_string())
			}
		},
		Value::Object(_) | Value::Null => ValueClass::Unsupported,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn trims_and_keeps_text() {
		assert_eq!(
			classify(&Value::String("  widget sales  ".to_string())),
			ValueClass::Text("widget sales".to_string())
		);
	}

	#[test]
	fn digit_strings_and_numbers_are_numeric() {
		assert_eq!(classify(&Value::String("12345".to_string())), ValueClass::Numeric);
		assert_eq!(classify(&serde_json::json!(12.5)), ValueClass::Numeric);
	}

	#[test]
	fn decimal_strings_stay_text() {
		assert_eq!(
			classify(&Value::String("12.5".to_string())),
			ValueClass::Text("12.5".to_string())
		);
	}

	#[test]
	fn empty_text_is_unsupported() {
		assert_eq!(classify(&Value::String("   ".to_string())), ValueClass::Unsupported);
	}

	#[test]
	fn lists_are_space_joined() {
		let value = serde_json::json!(["sales", 7, "marketing"]);

		assert_eq!(classify(&value), ValueClass::Text("sales 7 marketing".to_string()));
	}

	#[test]
	fn joined_digit_list_is_not_reclassified() {
		assert_eq!(
			classify(&serde_json::json!(["123"])),
			ValueClass::Text("123".to_string())
		);
	}

	#[test]
	fn mappings_and_nulls_are_unsupported() {
		assert_eq!(classify(&serde_json::json!({ "nested": true })), ValueClass::Unsupported);
		assert_eq!(classify(&Value::Null), ValueClass::Unsupported);
	}

	#[test]
	fn booleans_are_stringified() {
		assert_eq!(classify(&Value::Bool(true)), ValueClass::Text("true".to_string()));
	}
}
