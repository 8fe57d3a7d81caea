//! Parquet compression codecs and the decompression registry

use std::collections::BTreeSet;
use std::fmt;

use parquet::basic::{BrotliLevel, Compression, GzipLevel, ZstdLevel};
use serde::{Deserialize, Serialize};

/// Codec identifier of a Parquet column chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Codec {
    /// No compression
    Uncompressed,
    /// Snappy compression
    Snappy,
    /// Gzip compression
    Gzip,
    /// LZO compression
    Lzo,
    /// Brotli compression
    Brotli,
    /// LZ4 compression (Hadoop framing)
    Lz4,
    /// LZ4 compression (raw block)
    Lz4Raw,
    /// Zstd compression
    Zstd,
}

impl Codec {
    /// Writer-side compression for this codec, at the codec's default level
    pub fn compression(self) -> Compression {
        match self {
            Codec::Uncompressed => Compression::UNCOMPRESSED,
            Codec::Snappy => Compression::SNAPPY,
            Codec::Gzip => Compression::GZIP(GzipLevel::default()),
            Codec::Lzo => Compression::LZO,
            Codec::Brotli => Compression::BROTLI(BrotliLevel::default()),
            Codec::Lz4 => Compression::LZ4,
            Codec::Lz4Raw => Compression::LZ4_RAW,
            Codec::Zstd => Compression::ZSTD(ZstdLevel::default()),
        }
    }
}

impl From<Compression> for Codec {
    fn from(compression: Compression) -> Self {
        match compression {
            Compression::UNCOMPRESSED => Codec::Uncompressed,
            Compression::SNAPPY => Codec::Snappy,
            Compression::GZIP(_) => Codec::Gzip,
            Compression::LZO => Codec::Lzo,
            Compression::BROTLI(_) => Codec::Brotli,
            Compression::LZ4 => Codec::Lz4,
            Compression::LZ4_RAW => Codec::Lz4Raw,
            Compression::ZSTD(_) => Codec::Zstd,
        }
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Codec::Uncompressed => "UNCOMPRESSED",
            Codec::Snappy => "SNAPPY",
            Codec::Gzip => "GZIP",
            Codec::Lzo => "LZO",
            Codec::Brotli => "BROTLI",
            Codec::Lz4 => "LZ4",
            Codec::Lz4Raw => "LZ4_RAW",
            Codec::Zstd => "ZSTD",
        };
        f.write_str(name)
    }
}

/// Set of codecs a Parquet reader is allowed to decompress
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecRegistry {
    codecs: BTreeSet<Codec>,
}

impl CodecRegistry {
    /// A registry that accepts nothing, not even uncompressed chunks
    pub fn empty() -> Self {
        Self {
            codecs: BTreeSet::new(),
        }
    }

    /// Add a codec
    #[must_use]
    pub fn with(mut self, codec: Codec) -> Self {
        self.codecs.insert(codec);
        self
    }

    /// Remove a codec
    #[must_use]
    pub fn without(mut self, codec: Codec) -> Self {
        self.codecs.remove(&codec);
        self
    }

    /// Check if chunks compressed with `codec` can be read
    pub fn supports(&self, codec: Codec) -> bool {
        self.codecs.contains(&codec)
    }

    /// Registered codecs in a stable order
    pub fn iter(&self) -> impl Iterator<Item = Codec> + '_ {
        self.codecs.iter().copied()
    }
}

impl Default for CodecRegistry {
    /// Every codec compiled into the `parquet` dependency. LZO has no
    /// implementation there.
    fn default() -> Self {
        [
            Codec::Uncompressed,
            Codec::Snappy,
            Codec::Gzip,
            Codec::Brotli,
            Codec::Lz4,
            Codec::Lz4Raw,
            Codec::Zstd,
        ]
        .into_iter()
        .fold(Self::empty(), Self::with)
    }
}
