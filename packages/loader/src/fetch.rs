//! Reads a `GeoJSON` `FeatureCollection` from a file or URL.

use crate::{DatasetLocation, LoadError};

/// Fetches the `features` array of the collection at `location`.
///
/// # Errors
///
/// Returns [`LoadError`] if the file cannot be read, the request fails,
/// the body is not JSON, or it has no `features` array.
pub async fn fetch_features(
    client: &reqwest::Client,
    location: &DatasetLocation,
) -> Result<Vec<serde_json::Value>, LoadError> {
    let body = match location {
        DatasetLocation::File(path) => {
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| LoadError::Io {
                    path: path.clone(),
                    source,
                })?
        }
        DatasetLocation::Url(url) => fetch_url(client, url).await?,
    };

    parse_features(&body)
}

async fn fetch_url(client: &reqwest::Client, url: &str) -> Result<String, LoadError> {
    let resp = client.get(url).send().await?;
    if !resp.status().is_success() {
        return Err(LoadError::Conversion {
            message: format!("GeoJSON request to {url} failed with status {}", resp.status()),
        });
    }
    Ok(resp.text().await?)
}

/// Extracts the `features` array from a `FeatureCollection` document.
///
/// # Errors
///
/// Returns [`LoadError`] if `body` is not JSON or has no `features` array.
pub fn parse_features(body: &str) -> Result<Vec<serde_json::Value>, LoadError> {
    let mut json: serde_json::Value = serde_json::from_str(body)?;

    match json.get_mut("features").map(serde_json::Value::take) {
        Some(serde_json::Value::Array(features)) => Ok(features),
        _ => Err(LoadError::Conversion {
            message: "No features array in GeoJSON document".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_features() {
        let features = parse_features(r#"{ "type": "FeatureCollection", "features": [{}, {}] }"#)
            .unwrap();
        assert_eq!(features.len(), 2);
    }

    #[test]
    fn missing_features_is_an_error() {
        let err = parse_features(r#"{ "type": "Feature" }"#).unwrap_err();
        assert!(matches!(err, LoadError::Conversion { .. }), "{err}");

        let err = parse_features(r#"{ "features": {} }"#).unwrap_err();
        assert!(matches!(err, LoadError::Conversion { .. }), "{err}");
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(matches!(parse_features("nope"), Err(LoadError::Json(_))));
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let location = DatasetLocation::parse("/nonexistent/business-map.geojson");
        let err = fetch_features(&reqwest::Client::new(), &location)
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }), "{err}");
    }
}
