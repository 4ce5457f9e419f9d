//! Extracted image records

use crate::error::{Error, Result};
use base64::Engine;
use serde::{Deserialize, Serialize};

/// One image returned by the extraction service.
///
/// Deserialization is strict: `name` must be non-empty, `data` must be a
/// base64 data URI and `page` must not be negative. A missing, `null` or `0`
/// page is read as page 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawImageRecord")]
pub struct ImageRecord {
    /// File name, also the selection key
    pub name: String,
    /// `data:<mime>;base64,<payload>`
    pub data: String,
    /// Source page (1-indexed)
    pub page: u32,
}

#[derive(Deserialize)]
struct RawImageRecord {
    name: String,
    data: String,
    #[serde(default)]
    page: Option<i64>,
}

impl TryFrom<RawImageRecord> for ImageRecord {
    type Error = String;

    fn try_from(raw: RawImageRecord) -> std::result::Result<Self, Self::Error> {
        if raw.name.is_empty() {
            return Err("image name must not be empty".to_string());
        }

        let header = raw
            .data
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(','))
            .map(|(header, _)| header)
            .ok_or_else(|| format!("image {:?} data is not a data URI", raw.name))?;
        if !header.ends_with(";base64") {
            return Err(format!("image {:?} data URI is not base64 encoded", raw.name));
        }

        let page = match raw.page {
            None | Some(0) => 1,
            Some(p) if p < 0 => {
                return Err(format!("image {:?} has negative page {}", raw.name, p));
            }
            Some(p) => u32::try_from(p)
                .map_err(|_| format!("image {:?} page {} out of range", raw.name, p))?,
        };

        Ok(ImageRecord {
            name: raw.name,
            data: raw.data,
            page,
        })
    }
}

impl ImageRecord {
    /// Build a record from raw image bytes
    pub fn from_bytes(name: impl Into<String>, mime_type: &str, bytes: &[u8], page: u32) -> Self {
        let engine = base64::engine::general_purpose::STANDARD;
        Self {
            name: name.into(),
            data: format!("data:{};base64,{}", mime_type, engine.encode(bytes)),
            page: page.max(1),
        }
    }

    /// The base64 payload: everything after the first comma of the data URI
    pub fn payload(&self) -> &str {
        self.data
            .split_once(',')
            .map(|(_, payload)| payload)
            .unwrap_or_default()
    }

    /// MIME type declared in the data URI header
    pub fn mime_type(&self) -> &str {
        self.data
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(';'))
            .map(|(mime, _)| mime)
            .unwrap_or("application/octet-stream")
    }

    /// Approximate decoded size of the payload in bytes
    pub fn payload_size(&self) -> usize {
        let payload = self.payload().trim_end_matches('=');
        payload.len() * 3 / 4
    }

    /// Entry for the ZIP request: `<name>|<payload>`
    pub fn zip_entry(&self) -> String {
        format!("{}|{}", self.name, self.payload())
    }

    /// Decode the payload into raw image bytes
    pub fn decode(&self) -> Result<Vec<u8>> {
        let engine = base64::engine::general_purpose::STANDARD;
        engine.decode(self.payload()).map_err(Error::Base64Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn record(json: &str) -> std::result::Result<ImageRecord, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[test]
    fn test_zip_entry_strips_data_uri_header() {
        let img = record(r#"{"name": "x.png", "data": "data:image/png;base64,AAAA", "page": 1}"#)
            .unwrap();
        assert_eq!(img.zip_entry(), "x.png|AAAA");
        assert_eq!(img.payload(), "AAAA");
        assert_eq!(img.mime_type(), "image/png");
    }

    #[rstest]
    #[case(r#"{"name": "a.png", "data": "data:image/png;base64,AAAA"}"#, 1)]
    #[case(r#"{"name": "a.png", "data": "data:image/png;base64,AAAA", "page": null}"#, 1)]
    #[case(r#"{"name": "a.png", "data": "data:image/png;base64,AAAA", "page": 0}"#, 1)]
    #[case(r#"{"name": "a.png", "data": "data:image/png;base64,AAAA", "page": 12}"#, 12)]
    fn test_page_defaults(#[case] json: &str, #[case] expected: u32) {
        assert_eq!(record(json).unwrap().page, expected);
    }

    #[rstest]
    #[case::negative_page(r#"{"name": "a.png", "data": "data:image/png;base64,AAAA", "page": -2}"#)]
    #[case::empty_name(r#"{"name": "", "data": "data:image/png;base64,AAAA"}"#)]
    #[case::plain_base64(r#"{"name": "a.png", "data": "AAAA"}"#)]
    #[case::not_base64(r#"{"name": "a.png", "data": "data:text/plain,hello"}"#)]
    #[case::missing_data(r#"{"name": "a.png", "page": 1}"#)]
    #[case::page_as_string(r#"{"name": "a.png", "data": "data:image/png;base64,AAAA", "page": "1"}"#)]
    fn test_schema_violations_rejected(#[case] json: &str) {
        assert!(record(json).is_err());
    }

    #[test]
    fn test_decode_round_trip() {
        let img = ImageRecord::from_bytes("pixel.png", "image/png", &[0x89, b'P', b'N', b'G'], 3);
        assert_eq!(img.page, 3);
        assert!(img.data.starts_with("data:image/png;base64,"));
        assert_eq!(img.decode().unwrap(), vec![0x89, b'P', b'N', b'G']);
        assert_eq!(img.payload_size(), 4);
    }

    #[test]
    fn test_decode_invalid_payload() {
        let img = record(r#"{"name": "bad.png", "data": "data:image/png;base64,!!!"}"#).unwrap();
        assert!(matches!(img.decode(), Err(Error::Base64Decode(_))));
    }

    #[test]
    fn test_serializes_plain_shape() {
        let img = ImageRecord::from_bytes("a.png", "image/png", b"abc", 2);
        let value = serde_json::to_value(&img).unwrap();
        assert_eq!(value["name"], "a.png");
        assert_eq!(value["page"], 2);
        assert_eq!(value["data"], "data:image/png;base64,YWJj");
    }
}
