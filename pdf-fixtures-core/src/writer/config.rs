use std::fmt;

/// Header version written as `%PDF-x.y`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PdfVersion {
    V1_0,
    V1_1,
    V1_2,
    V1_3,
    V1_4,
    V1_5,
    V1_6,
    V1_7,
    V2_0,
}

impl PdfVersion {
    /// Cross-reference streams and object streams need PDF 1.5
    pub fn supports_xref_streams(self) -> bool {
        self >= PdfVersion::V1_5
    }
}

impl fmt::Display for PdfVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let version = match self {
            PdfVersion::V1_0 => "1.0",
            PdfVersion::V1_1 => "1.1",
            PdfVersion::V1_2 => "1.2",
            PdfVersion::V1_3 => "1.3",
            PdfVersion::V1_4 => "1.4",
            PdfVersion::V1_5 => "1.5",
            PdfVersion::V1_6 => "1.6",
            PdfVersion::V1_7 => "1.7",
            PdfVersion::V2_0 => "2.0",
        };
        write!(f, "{version}")
    }
}

/// Configuration for PDF writing
#[derive(Debug, Clone, PartialEq)]
pub struct WriterConfig {
    /// zlib level (0-9) used for filtered streams, object streams and
    /// cross-reference streams
    pub compression_level: u32,
    /// Emit the `%\xE2\xE3\xCF\xD3` comment after the header line
    pub binary_marker: bool,
    /// Header version when a recipe does not pick one
    pub pdf_version: PdfVersion,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            compression_level: 6,
            binary_marker: false,
            pdf_version: PdfVersion::V1_4,
        }
    }
}

impl WriterConfig {
    /// Config with a specific header version
    pub fn with_version(mut self, version: PdfVersion) -> Self {
        self.pdf_version = version;
        self
    }
}
