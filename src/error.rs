pub type GeneratorResult<T> = Result<T, GeneratorError>;

#[derive(thiserror::Error, Debug)]
pub enum GeneratorError {
    #[error("configuration error: no stage covers level {level}")]
    Configuration { level: u32 },

    #[error("invalid stage table: {0}")]
    StageTable(String),

    #[error("unknown color: {0}")]
    UnknownColor(String),

    #[error("invalid level record: {0}")]
    InvalidRecord(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl GeneratorError {
    pub fn configuration(level: u32) -> Self {
        Self::Configuration { level }
    }

    pub fn stage_table(msg: impl Into<String>) -> Self {
        Self::StageTable(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        let msg = GeneratorError::configuration(301).to_string();
        assert!(msg.contains("configuration error:"));
        assert!(msg.contains("301"));
        assert!(
            GeneratorError::UnknownColor("ochre".into())
                .to_string()
                .contains("unknown color: ochre")
        );
        assert_eq!(
            GeneratorError::stage_table("stages end at 299").to_string(),
            "invalid stage table: stages end at 299"
        );
    }

    #[test]
    fn io_preserves_source() {
        let err: GeneratorError = std::io::Error::other("boom").into();
        assert!(err.to_string().contains("boom"));
    }
}
