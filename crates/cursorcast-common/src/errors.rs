#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("frame encode error: {0}")]
    Encode(String),

    #[error("frame decode error: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_error_display() {
        let err = ProtocolError::Encode("payload not serializable".into());
        assert_eq!(err.to_string(), "frame encode error: payload not serializable");

        let err = ProtocolError::Decode("unexpected token".into());
        assert_eq!(err.to_string(), "frame decode error: unexpected token");
    }
}
