//! Storage encoding for client passwords.
//!
//! Passwords must be recoverable because they are replayed to the billing
//! system, so the codec is reversible. Today the stored form is the cleartext;
//! swapping in an encrypting codec only touches this module and the wiring
//! in the repository constructor.

use crate::domain::ClientPassword;

/// Failures while encoding or decoding a stored password.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordCodecError {
    /// The stored value could not be turned back into a password.
    #[error("stored password could not be decoded: {message}")]
    Decode { message: String },
}

/// Reversible transform between domain passwords and their stored form.
pub trait PasswordCodec: Send + Sync {
    /// Produce the value written to the `password` column.
    fn encode(&self, password: &ClientPassword) -> String;

    /// Recover a password from its stored form.
    fn decode(&self, stored: &str) -> Result<ClientPassword, PasswordCodecError>;
}

/// Stores passwords as-is.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaintextPasswordCodec;

impl PasswordCodec for PlaintextPasswordCodec {
    fn encode(&self, password: &ClientPassword) -> String {
        password.expose().to_owned()
    }

    fn decode(&self, stored: &str) -> Result<ClientPassword, PasswordCodecError> {
        ClientPassword::new(stored).map_err(|err| PasswordCodecError::Decode {
            message: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn plaintext_codec_round_trips() {
        let codec = PlaintextPasswordCodec;
        let password = ClientPassword::new("s3cret").expect("password");
        let stored = codec.encode(&password);
        assert_eq!(stored, "s3cret");
        assert_eq!(codec.decode(&stored), Ok(password));
    }

    #[rstest]
    fn plaintext_codec_rejects_blank_rows() {
        let error = PlaintextPasswordCodec.decode("").expect_err("blank");
        assert!(error.to_string().contains("must not be empty"));
    }
}
