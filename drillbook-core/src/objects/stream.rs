#[cfg(feature = "compression")]
use crate::error::{ExportError, Result};
use crate::objects::Dictionary;

/// A stream object: a dictionary followed by raw bytes.
#[derive(Debug, Clone)]
pub struct Stream {
    dictionary: Dictionary,
    data: Vec<u8>,
}

impl Stream {
    pub fn new(data: Vec<u8>) -> Self {
        let mut dictionary = Dictionary::new();
        dictionary.set("Length", data.len());

        Self { dictionary, data }
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[cfg(feature = "compression")]
    pub fn compress_flate(&mut self) -> Result<()> {
        use flate2::write::ZlibEncoder;
        use flate2::Compression;
        use std::io::Write;

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(&self.data)
            .map_err(|e| ExportError::Compression(e.to_string()))?;
        let compressed = encoder
            .finish()
            .map_err(|e| ExportError::Compression(e.to_string()))?;

        self.data = compressed;
        self.dictionary.set("Length", self.data.len());
        self.dictionary
            .set("Filter", crate::objects::Object::name("FlateDecode"));

        Ok(())
    }
}
