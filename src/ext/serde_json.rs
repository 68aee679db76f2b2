// === Module Header (agents-tooling) START ===
// purpose: Ergonomic dotted-path access into HAL/JSON payloads with typed, default-tolerant extraction
// role: extension/serde_json
// outputs: JsonFetch trait and JsonFetched wrapper over serde_json::Value
// invariants: No panics; missing paths yield None; *_or helpers never fail
// === Module Header END ===

use serde::de::DeserializeOwned;

/// Wrapper around a JSON location so typed extraction reads as a clear second step.
pub struct JsonFetched<'a> {
  inner: Option<&'a serde_json::Value>,
}

impl<'a> JsonFetched<'a> {
  /// Attempt to deserialize the fetched value as `T`.
  pub fn to<T>(&self) -> Option<T>
  where
    T: DeserializeOwned,
  {
    self.inner.and_then(|v| serde_json::from_value::<T>(v.clone()).ok())
  }

  /// Deserialize as `T`, returning `T::default()` on failure.
  pub fn to_or_default<T>(&self) -> T
  where
    T: DeserializeOwned + Default,
  {
    self.to::<T>().unwrap_or_default()
  }

  /// Borrow the value as a string slice when it is a JSON string.
  pub fn as_str(&self) -> Option<&'a str> {
    self.inner.and_then(|v| v.as_str())
  }

  /// String content of the value, or the empty string when absent or non-string.
  pub fn str_or_empty(&self) -> String {
    self.as_str().unwrap_or_default().to_string()
  }

  /// Clone the value as an array, empty when absent or non-array.
  pub fn array_or_empty(&self) -> Vec<serde_json::Value> {
    self.inner.and_then(|v| v.as_array()).cloned().unwrap_or_default()
  }

  /// Raw value reference, when present.
  pub fn value(&self) -> Option<&'a serde_json::Value> {
    self.inner
  }
}

/// Extension to fetch nested values via dotted paths like `_embedded.status.name`.
///
/// Numeric segments index into arrays, so `_embedded.elements.0.id` reaches the
/// first element of a HAL collection.
pub trait JsonFetch {
  fn fetch(&self, path: &str) -> JsonFetched<'_>;
}

impl JsonFetch for serde_json::Value {
  fn fetch(&self, path: &str) -> JsonFetched<'_> {
    if path.is_empty() {
      return JsonFetched { inner: Some(self) };
    }

    let mut cur = self;

    for key in path.split('.') {
      let next = match cur {
        serde_json::Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => cur.get(key),
      };

      match next {
        Some(v) => cur = v,
        None => return JsonFetched { inner: None },
      }
    }

    JsonFetched { inner: Some(cur) }
  }
}
