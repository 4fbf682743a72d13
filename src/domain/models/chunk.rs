use serde::{Deserialize, Serialize};

/// A contiguous slice of a source file plus everything derived from it:
/// metadata from C3, symbol information from C4, and the embedding/keyword
/// inputs produced by C5/C6.
///
/// Identity is the pair `(file_path, location)` — callers re-index a file by
/// deleting every chunk whose `file_path` matches and inserting fresh rows,
/// so chunk identity never needs to survive a re-chunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub file_path: String,
    pub location: ChunkLocation,
    pub content: String,
    pub language_id: String,
    pub block_type: String,
    pub hierarchy: Vec<String>,
    pub symbol: Option<SymbolMetadata>,
    pub embedding: Option<Vec<f32>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkLocation {
    pub start_line: u32,
    pub end_line: u32,
}

impl ChunkLocation {
    pub fn new(start_line: u32, end_line: u32) -> Self {
        Self {
            start_line,
            end_line,
        }
    }
}

/// Canonical symbol kinds a `SymbolExtractor` may report. Kept closed per
/// the design note's fixed symbol taxonomy rather than a free-form string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Function,
    Class,
    Method,
    Interface,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Class => "class",
            Self::Method => "method",
            Self::Interface => "interface",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolMetadata {
    pub kind: SymbolKind,
    /// Qualified name, e.g. `Owner.method` for a method on `Owner`.
    pub name: String,
    pub signature: Option<String>,
}

impl Chunk {
    pub fn new(
        file_path: impl Into<String>,
        location: ChunkLocation,
        content: impl Into<String>,
        language_id: impl Into<String>,
        block_type: impl Into<String>,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            location,
            content: content.into(),
            language_id: language_id.into(),
            block_type: block_type.into(),
            hierarchy: Vec::new(),
            symbol: None,
            embedding: None,
        }
    }

    pub fn with_hierarchy(mut self, hierarchy: Vec<String>) -> Self {
        self.hierarchy = hierarchy;
        self
    }

    pub fn with_symbol(mut self, symbol: SymbolMetadata) -> Self {
        self.symbol = Some(symbol);
        self
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    pub fn is_definition(&self) -> bool {
        self.symbol.is_some()
    }
}
