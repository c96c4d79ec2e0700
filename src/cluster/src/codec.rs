use base64::Engine;

#[inline]
pub fn encode<A: AsRef<[u8]>>(bytes: A) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes.as_ref())
}

#[inline]
pub fn decode<A: AsRef<[u8]>>(input: A) -> Result<Vec<u8>, base64::DecodeError> {
    base64::engine::general_purpose::STANDARD.decode(input.as_ref())
}

/// Serde adapter storing raw bytes as a standard base64 string.
pub mod base64_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::decode(s).map_err(serde::de::Error::custom)
    }
}
