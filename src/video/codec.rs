//! Mapping between Rust structs and user-defined type values.

use crate::core::{CqlError, FromValue, UdtValue, Value};

use super::dto::VideoFormat;
use super::schema::{UDT_VIDEO_FORMAT_HEIGHT, UDT_VIDEO_FORMAT_NAME, UDT_VIDEO_FORMAT_WIDTH};

/// Two-way mapping of a struct onto a user-defined type.
pub trait UdtCodec: Sized {
    const TYPE_NAME: &'static str;

    fn encode(&self) -> UdtValue;

    fn decode(value: &UdtValue) -> Result<Self, CqlError>;
}

impl UdtCodec for VideoFormat {
    const TYPE_NAME: &'static str = UDT_VIDEO_FORMAT_NAME;

    fn encode(&self) -> UdtValue {
        UdtValue {
            type_name: Self::TYPE_NAME.to_string(),
            fields: vec![
                (UDT_VIDEO_FORMAT_WIDTH.to_string(), Value::Int(self.width)),
                (UDT_VIDEO_FORMAT_HEIGHT.to_string(), Value::Int(self.height)),
            ],
        }
    }

    fn decode(value: &UdtValue) -> Result<Self, CqlError> {
        if value.type_name != Self::TYPE_NAME {
            return Err(CqlError::mismatch(Self::TYPE_NAME, &value.type_name));
        }
        Ok(Self {
            width: value.get_int(UDT_VIDEO_FORMAT_WIDTH)?,
            height: value.get_int(UDT_VIDEO_FORMAT_HEIGHT)?,
        })
    }
}

impl From<VideoFormat> for Value {
    fn from(format: VideoFormat) -> Self {
        Self::Udt(format.encode())
    }
}

impl FromValue for VideoFormat {
    fn from_value(value: &Value) -> Result<Self, CqlError> {
        match value {
            Value::Udt(udt) => Self::decode(udt),
            Value::Null => Err(CqlError::UnexpectedNull(Self::TYPE_NAME.to_string())),
            other => Err(CqlError::mismatch(Self::TYPE_NAME, other.kind())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::schema::video_format_type;

    #[test]
    fn test_encode_matches_type_layout() {
        let encoded = VideoFormat::new(640, 480).encode();
        let built = video_format_type()
            .new_value()
            .set_int(UDT_VIDEO_FORMAT_WIDTH, 640)
            .and_then(|v| v.set_int(UDT_VIDEO_FORMAT_HEIGHT, 480))
            .unwrap();
        assert_eq!(encoded, built);
        assert_eq!(VideoFormat::decode(&built).unwrap(), VideoFormat::new(640, 480));
    }

    #[test]
    fn test_decode_rejects_null_field_and_other_type() {
        let partial = video_format_type().new_value().set_int(UDT_VIDEO_FORMAT_WIDTH, 1).unwrap();
        assert!(matches!(VideoFormat::decode(&partial), Err(CqlError::UnexpectedNull(_))));

        let other = UdtValue {
            type_name: "address".to_string(),
            fields: Vec::new(),
        };
        assert!(matches!(VideoFormat::decode(&other), Err(CqlError::TypeMismatch { .. })));
    }
}
