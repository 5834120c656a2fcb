use serde_json::Value;

pub trait IntoStringRows {
    fn into_string_rows(self) -> Vec<Vec<String>>;
}

/// Cell text as the sheet shows it: strings verbatim, numbers and booleans
/// printed, empty cells as `""`.
pub fn cell_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl IntoStringRows for Vec<Vec<Value>> {
    fn into_string_rows(self) -> Vec<Vec<String>> {
        self.into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect()
    }
}
