use serde::de::DeserializeOwned;
use thiserror::Error;

/// A serde error plus the JSON path it happened at.
#[derive(Debug, Error)]
#[error("at JSON path {path} → {message}")]
pub struct PathError {
    pub path: String,
    pub message: String,
}

fn with_path<'de, T, R>(de: &mut serde_json::Deserializer<R>) -> Result<T, PathError>
where
    T: DeserializeOwned,
    R: serde_json::de::Read<'de>,
{
    let value = serde_path_to_error::deserialize::<_, T>(&mut *de).map_err(|err| {
        let path = err.path().to_string();
        PathError { path, message: err.into_inner().to_string() }
    })?;
    // trailing garbage after the document is an error too
    de.end().map_err(|err| PathError { path: ".".into(), message: err.to_string() })?;
    Ok(value)
}

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, PathError> {
    with_path(&mut serde_json::Deserializer::from_str(src))
}

pub fn from_slice_with_path<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, PathError> {
    with_path(&mut serde_json::Deserializer::from_slice(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, serde::Deserialize)]
    struct Outer {
        #[allow(unused)]
        inner: Vec<Inner>,
    }

    #[derive(Debug, serde::Deserialize)]
    struct Inner {
        #[allow(unused)]
        n: u8,
    }

    #[test]
    fn error_carries_path() {
        let err = from_str_with_path::<Outer>(r#"{ "inner": [ { "n": 1 }, { "n": "x" } ] }"#).unwrap_err();
        assert_eq!(err.path, "inner[1].n");
        assert!(err.to_string().contains("inner[1].n"));
    }

    #[test]
    fn trailing_characters_rejected() {
        assert!(from_slice_with_path::<Outer>(br#"{ "inner": [] } x"#).is_err());
    }
}
