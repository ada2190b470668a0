use crate::{NetError, Status, MAX_FRAME_LEN};
use chrono::{DateTime, Utc};
use flate2::{read::DeflateDecoder, write::DeflateEncoder, Compression};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum MessageKind {
    Request = 1,
    Answer = 2,
}

impl TryFrom<u8> for MessageKind {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(MessageKind::Request),
            2 => Ok(MessageKind::Answer),
            other => Err(format!("unknown message type {other}")),
        }
    }
}

impl From<MessageKind> for u8 {
    fn from(value: MessageKind) -> Self {
        value as u8
    }
}

/// Operation codes carried in [`Message::id`]
#[repr(u32)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Operation {
    Login = 1,
    Logout = 2,
    Message = 3,
    GetBlockId = 4,
}

impl Operation {
    pub fn id(self) -> u32 {
        self as u32
    }
}

impl TryFrom<u32> for Operation {
    type Error = u32;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Operation::Login),
            2 => Ok(Operation::Logout),
            3 => Ok(Operation::Message),
            4 => Ok(Operation::GetBlockId),
            other => Err(other),
        }
    }
}

impl From<Operation> for u32 {
    fn from(value: Operation) -> Self {
        value.id()
    }
}

/// One request or answer as it travels inside the cascade
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub id: u32,
    /// Only answers carry a status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
    #[serde(default, with = "base64_bytes", skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<u8>,
    /// Bytes whose meaning depends on the operation
    #[serde(default, with = "base64_bytes", skip_serializing_if = "Vec::is_empty")]
    pub blob: Vec<u8>,
    pub counter: u32,
    pub marker: f32,
    #[serde(rename = "tstamp")]
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn request(id: u32, counter: u32, marker: f32, data: &[u8], extra: &[u8]) -> Self {
        Self {
            kind: MessageKind::Request,
            id,
            status: None,
            data: data.to_vec(),
            extra: extra.to_vec(),
            blob: Vec::new(),
            counter,
            marker,
            timestamp: cm_crypto::now(),
        }
    }

    /// Answer to `request`: same id and counter, marker shifted by the offset
    pub fn answer(request: &Message, status: Status, data: &[u8], extra: &[u8]) -> Self {
        Self {
            kind: MessageKind::Answer,
            id: request.id,
            status: Some(status),
            data: data.to_vec(),
            extra: extra.to_vec(),
            blob: Vec::new(),
            counter: request.counter,
            marker: request.marker + crate::MARKER_OFFSET,
            timestamp: cm_crypto::now(),
        }
    }

    pub fn with_blob(mut self, blob: &[u8]) -> Self {
        self.blob = blob.to_vec();
        self
    }

    pub fn operation(&self) -> Option<Operation> {
        Operation::try_from(self.id).ok()
    }

    /// JSON, deflate compressed
    pub fn to_packed(&self) -> Result<Vec<u8>, NetError> {
        let json = serde_json::to_vec(self)?;
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&json)?;
        Ok(encoder.finish()?)
    }

    pub fn from_packed(packed: &[u8]) -> Result<Self, NetError> {
        let mut json = Vec::new();
        DeflateDecoder::new(packed)
            .take(MAX_FRAME_LEN as u64 + 1)
            .read_to_end(&mut json)
            .map_err(|e| NetError::Decode(e.to_string()))?;
        if json.len() > MAX_FRAME_LEN {
            return Err(NetError::Decode("inflated message is too large".into()));
        }
        Ok(serde_json::from_slice(&json)?)
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Message {{")?;
        writeln!(f, "    counter: {}", self.counter)?;
        match self.operation() {
            Some(op) => writeln!(f, "         id: {} ({op:?})", self.id)?,
            None => writeln!(f, "         id: {}", self.id)?,
        }
        if let Some(status) = self.status {
            writeln!(f, "     status: {status:?}")?;
        }
        writeln!(f, "       type: {:?}", self.kind)?;
        writeln!(f, "       data: {}", cm_crypto::to_hex(&self.data))?;
        if !self.extra.is_empty() {
            writeln!(f, "      extra: {}", cm_crypto::to_hex(&self.extra))?;
        }
        if !self.blob.is_empty() {
            writeln!(f, "       blob: {}", cm_crypto::to_hex(&self.blob))?;
        }
        writeln!(f, "     marker: {}", self.marker)?;
        writeln!(f, "  timestamp: {}", self.timestamp.format("%Y-%m-%d %H:%M:%S"))?;
        write!(f, "}}")
    }
}

mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        STANDARD.decode(text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Message {
        let mut msg = Message::request(Operation::Message.id(), 7, 42.5, b"hello", b"");
        msg.timestamp = Utc.with_ymd_and_hms(2024, 2, 29, 12, 30, 5).unwrap();
        msg
    }

    #[test]
    fn packed_round_trip() {
        let request = sample();
        let packed = request.to_packed().unwrap();
        assert_eq!(Message::from_packed(&packed).unwrap(), request);

        let answer = Message::answer(&request, Status::Ok, b"", b"\x00\x80extra");
        let decoded = Message::from_packed(&answer.to_packed().unwrap()).unwrap();
        assert_eq!(decoded, answer);
        assert_eq!(decoded.status, Some(Status::Ok));
    }

    #[test]
    fn json_field_names() {
        let json: serde_json::Value = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["type"], 1);
        assert_eq!(json["id"], 3);
        assert_eq!(json["data"], "aGVsbG8=");
        assert_eq!(json["counter"], 7);
        assert_eq!(json["tstamp"], "2024-02-29T12:30:05Z");
        assert!(json.get("status").is_none());
        assert!(json.get("extra").is_none());
        assert!(json.get("blob").is_none());
    }

    #[test]
    fn blob_travels_when_present() {
        let request = sample().with_blob(&[0xca, 0xfe]);
        let json: serde_json::Value = serde_json::to_value(&request).unwrap();
        assert_eq!(json["blob"], "yv4=");

        let decoded = Message::from_packed(&request.to_packed().unwrap()).unwrap();
        assert_eq!(decoded.blob, [0xca, 0xfe]);
        assert!(decoded.to_string().contains("blob: cafe"));
    }

    #[test]
    fn unknown_type_is_rejected() {
        let mut json = serde_json::to_value(sample()).unwrap();
        json["type"] = 3.into();
        let bytes = serde_json::to_vec(&json).unwrap();
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&bytes).unwrap();
        let packed = encoder.finish().unwrap();
        assert!(matches!(Message::from_packed(&packed), Err(NetError::Decode(_))));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(matches!(
            Message::from_packed(b"definitely not deflate"),
            Err(NetError::Decode(_))
        ));
    }

    #[test]
    fn answer_mirrors_request() {
        let request = sample();
        let answer = Message::answer(&request, Status::Error, b"no", b"");
        assert_eq!(answer.kind, MessageKind::Answer);
        assert_eq!(answer.id, request.id);
        assert_eq!(answer.counter, request.counter);
        assert_eq!(answer.marker, 42.5 + crate::MARKER_OFFSET);
    }

    #[test]
    fn operations() {
        assert_eq!(Operation::try_from(4), Ok(Operation::GetBlockId));
        assert_eq!(Operation::try_from(9), Err(9));
        assert_eq!(u32::from(Operation::Login), 1);
        assert_eq!(sample().operation(), Some(Operation::Message));
    }

    #[test]
    fn display_shows_payload_as_hex() {
        let text = sample().to_string();
        assert!(text.contains("id: 3 (Message)"));
        assert!(text.contains("data: 68656c6c6f"));
        assert!(text.contains("timestamp: 2024-02-29 12:30:05"));
    }
}
