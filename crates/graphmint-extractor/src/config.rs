//! Configuration for the extraction pipeline

use crate::error::ExtractorError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Known node labels and relationship types to constrain extraction
///
/// When non-empty, these are rendered into the prompt's schema section
/// so the model reuses existing types instead of inventing synonyms.
/// When empty, the prompt instead instructs the model to invent fairly
/// general types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaHints {
    /// Allowed node labels
    pub labels: Vec<String>,

    /// Allowed relationship types
    pub rel_types: Vec<String>,
}

impl SchemaHints {
    /// Whether no labels and no relationship types are set
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() && self.rel_types.is_empty()
    }
}

/// Configuration for the extraction pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Target chunk size in bytes
    pub chunk_size: usize,

    /// Bytes of trailing text repeated at the start of the next chunk
    pub chunk_overlap: usize,

    /// Pull chunk cuts back to whitespace boundaries when possible
    pub approximate: bool,

    /// Instruction section of the extraction prompt
    pub instruction: String,

    /// Worked-examples section of the extraction prompt
    pub examples: String,

    /// Label/relationship-type constraints for the prompt's schema section
    pub schema: SchemaHints,

    /// Maximum time for a single extraction call (seconds)
    pub extraction_timeout_secs: u64,

    /// Maximum number of extraction calls in flight at once
    pub max_concurrent_extractions: usize,
}

impl ExtractorConfig {
    /// Get the extraction timeout as a Duration
    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_secs(self.extraction_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ExtractorError> {
        if self.chunk_size == 0 {
            return Err(ExtractorError::InvalidConfiguration(
                "chunk_size must be greater than 0".to_string(),
            ));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(ExtractorError::InvalidConfiguration(format!(
                "chunk_overlap {} must be smaller than chunk_size {}",
                self.chunk_overlap, self.chunk_size
            )));
        }
        if self.extraction_timeout_secs == 0 {
            return Err(ExtractorError::InvalidConfiguration(
                "extraction_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.max_concurrent_extractions == 0 {
            return Err(ExtractorError::InvalidConfiguration(
                "max_concurrent_extractions must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ExtractorConfig {
    /// Default configuration with balanced settings
    fn default() -> Self {
        Self {
            chunk_size: 5_000,
            chunk_overlap: 200,
            approximate: true,
            instruction: DEFAULT_INSTRUCTION.to_string(),
            examples: DEFAULT_EXAMPLES.to_string(),
            schema: SchemaHints::default(),
            extraction_timeout_secs: 120,
            max_concurrent_extractions: 4,
        }
    }
}

impl ExtractorConfig {
    /// Fine-grained preset: small chunks, more parallel calls
    ///
    /// Better entity recall on dense text, at the cost of more
    /// extraction calls per document.
    pub fn fine_grained() -> Self {
        Self {
            chunk_size: 1_000,
            chunk_overlap: 100,
            max_concurrent_extractions: 8,
            ..Self::default()
        }
    }

    /// Coarse preset: large chunks, longer call budget
    ///
    /// Fewer calls per document; suited to slower models or long,
    /// repetitive sources.
    pub fn coarse() -> Self {
        Self {
            chunk_size: 20_000,
            chunk_overlap: 500,
            extraction_timeout_secs: 300,
            max_concurrent_extractions: 2,
            ..Self::default()
        }
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to a TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

/// Default extraction instruction
///
/// Kept deliberately domain-neutral: documents from different sources
/// feed one shared graph, so entity types need to stay general enough
/// to connect.
const DEFAULT_INSTRUCTION: &str = r#"You are a data scientist working for a company that is building a graph database. Your task is to extract information from text and convert it into a graph database.
Provide a set of Nodes in the form [ENTITY_ID, TYPE, PROPERTIES] and a set of relationships in the form [ENTITY_ID_1, RELATIONSHIP, ENTITY_ID_2, PROPERTIES].
It is important that ENTITY_ID_1 and ENTITY_ID_2 exist as nodes with a matching ENTITY_ID. If you can't pair a relationship with a pair of nodes don't add it.
The relationship direction goes from the start node to the end node.
Give each node a "name" property holding the entity's name as written in the text.
Multiple documents will be ingested from different sources and this property graph is used to connect information, so make sure entity types are fairly general.
Use only the information from the input text. Do not add any additional information. If the input text is empty, return empty JSON."#;

/// Default worked example shown to the model
const DEFAULT_EXAMPLES: &str = r#"Input: Alice is a lawyer and is 25 years old and Bob is her roommate since 2001. Bob works as a journalist. Alice owns the webpage www.alice.com and Bob owns the webpage www.bob.com.
Output:
{"Nodes": [["alice", "Person", {"age": 25, "occupation": "lawyer", "name": "Alice"}], ["bob", "Person", {"occupation": "journalist", "name": "Bob"}], ["alice.com", "Webpage", {"url": "www.alice.com", "name": "alice.com"}], ["bob.com", "Webpage", {"url": "www.bob.com", "name": "bob.com"}]],
 "Edges": [["alice", "roommate", "bob", {"start": 2001}], ["alice", "owns", "alice.com", {}], ["bob", "owns", "bob.com", {}]]}"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_preset_configs_are_valid() {
        assert!(ExtractorConfig::fine_grained().validate().is_ok());
        assert!(ExtractorConfig::coarse().validate().is_ok());
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let mut config = ExtractorConfig::default();
        config.chunk_size = 0;
        assert!(matches!(
            config.validate(),
            Err(ExtractorError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_overlap_must_be_smaller_than_chunk_size() {
        let mut config = ExtractorConfig::default();
        config.chunk_size = 100;
        config.chunk_overlap = 100;
        assert!(config.validate().is_err());

        config.chunk_overlap = 99;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let mut config = ExtractorConfig::default();
        config.max_concurrent_extractions = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ExtractorConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();

        assert_eq!(config.chunk_size, parsed.chunk_size);
        assert_eq!(config.chunk_overlap, parsed.chunk_overlap);
        assert_eq!(config.instruction, parsed.instruction);
        assert_eq!(config.schema, parsed.schema);
    }
}
