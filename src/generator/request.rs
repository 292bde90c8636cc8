//! Per-request generation commands and their results

use serde::Serialize;

use super::error::GeneratorError;
use super::identifier::generate_uuid;
use super::password::{generate_password, PasswordOptions};
use super::qrcode::{qr_code_url, DEFAULT_QR_SIZE};

/// One generation job, built from an incoming request and dropped after use
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationRequest {
    Uuid,
    Password {
        length: usize,
        options: PasswordOptions,
    },
    QrCode {
        text: String,
        size: Option<u32>,
    },
}

/// Successful output; serializes as a single-key JSON object
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum GenerationOutput {
    #[serde(rename = "uuid")]
    Uuid(String),
    #[serde(rename = "password")]
    Password(String),
    #[serde(rename = "qrCodeURL")]
    QrCodeUrl(String),
}

pub type GenerationResult = Result<GenerationOutput, GeneratorError>;

impl GenerationRequest {
    /// Run the generator this request names
    pub fn execute(self) -> GenerationResult {
        match self {
            Self::Uuid => Ok(GenerationOutput::Uuid(generate_uuid())),
            Self::Password { length, options } => {
                generate_password(length, &options).map(GenerationOutput::Password)
            }
            Self::QrCode { text, size } => Ok(GenerationOutput::QrCodeUrl(qr_code_url(
                &text,
                size.unwrap_or(DEFAULT_QR_SIZE),
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_serializes_with_single_key() {
        let json = serde_json::to_value(GenerationOutput::QrCodeUrl("u".to_string())).unwrap();
        assert_eq!(json, serde_json::json!({ "qrCodeURL": "u" }));

        let json = serde_json::to_value(GenerationOutput::Uuid("id".to_string())).unwrap();
        assert_eq!(json, serde_json::json!({ "uuid": "id" }));
    }

    #[test]
    fn test_execute_uuid() {
        let output = GenerationRequest::Uuid.execute().unwrap();
        assert!(matches!(&output, GenerationOutput::Uuid(id) if id.len() == 36));
    }

    #[test]
    fn test_execute_password_error_propagates() {
        let err = GenerationRequest::Password {
            length: 4,
            options: PasswordOptions::default(),
        }
        .execute()
        .unwrap_err();
        assert!(err.is_client_error());
    }

    #[test]
    fn test_execute_qrcode_defaults_size() {
        let output = GenerationRequest::QrCode {
            text: "hi".to_string(),
            size: None,
        }
        .execute()
        .unwrap();
        assert_eq!(
            output,
            GenerationOutput::QrCodeUrl(
                "https://api.qrserver.com/v1/create-qr-code/?size=350x350&data=hi".to_string()
            )
        );
    }
}
