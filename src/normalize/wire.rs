use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;

/* --------- Minimal serde mapping for spreadsheet grid JSON --------- */

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Workbook {
    // Sheets are decoded one by one so a malformed sheet does not hide the others.
    #[serde(default)]
    pub(crate) sheets: Vec<Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Sheet {
    pub(crate) properties: Option<SheetProperties>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub(crate) data: Vec<GridData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SheetProperties {
    pub(crate) title: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GridData {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub(crate) row_data: Vec<RowData>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RowData {
    // Cells keep their position: a malformed cell becomes an empty one.
    #[serde(default, deserialize_with = "lenient_vec")]
    pub(crate) values: Vec<CellData>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CellData {
    // Usually a string, but hand-built payloads put numbers here too.
    pub(crate) formatted_value: Option<Value>,
    pub(crate) effective_value: Option<ExtendedValue>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExtendedValue {
    pub(crate) number_value: Option<f64>,
    pub(crate) string_value: Option<String>,
}

/// Decodes a list element by element, replacing elements that do not fit `T` with
/// `T::default()`. A missing, `null` or non-array list is empty.
fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let raw = Value::deserialize(deserializer)?;
    let Value::Array(items) = raw else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .map(|item| serde_json::from_value(item).unwrap_or_default())
        .collect())
}

impl Sheet {
    pub(crate) fn title(&self) -> &str {
        self.properties
            .as_ref()
            .and_then(|p| p.title.as_deref())
            .unwrap_or("")
    }
}

impl CellData {
    /// The cell's content: `formattedValue` first, then the effective value.
    pub(crate) fn content(&self) -> Option<Value> {
        if let Some(v) = self.formatted_value.as_ref().filter(|v| !v.is_null()) {
            return Some(v.clone());
        }
        let ev = self.effective_value.as_ref()?;
        ev.number_value
            .and_then(|n| serde_json::Number::from_f64(n).map(Value::Number))
            .or_else(|| ev.string_value.clone().map(Value::String))
    }

    /// The cell's content as a label; non-text cells give an empty label.
    pub(crate) fn label(&self) -> String {
        match self.content() {
            Some(Value::String(s)) => s.to_lowercase(),
            _ => String::new(),
        }
    }
}
