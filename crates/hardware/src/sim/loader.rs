//! Program Image Loader.
//!
//! This module builds the word stream the driver preloads into the device. It performs:
//! 1. **Hex parsing:** Reads the line-oriented `@address` / byte-token text format.
//! 2. **Binary packing:** Packs a raw `objcopy -O binary` dump into little-endian words.
//! 3. **ELF loading:** Collects the `PT_LOAD` segments of an executable.
//! 4. **Hex rendering:** Writes an image back out in the text format.
//!
//! # Text format
//!
//! ```text
//! @00001000
//! 13 05 a0 02 73 00 10 00
//! ```
//!
//! A line starting with `@` sets the load address (hex, no prefix). Every
//! other non-blank line holds two-digit hex byte tokens, packed four at a
//! time, least significant byte first, into 32-bit words. The address
//! advances by 4 per word. A trailing group of fewer than 4 bytes on a line
//! is discarded, though its tokens must still be valid bytes.

use std::fs;
use std::path::Path;

use object::read::elf::{FileHeader, ProgramHeader};
use object::{Endianness, FileKind, elf};

use crate::common::constants::{ADDRESS_MARKER, BYTES_PER_WORD};
use crate::common::{ImageError, WORD_BYTES};

/// A single 32-bit word and the byte address it is preloaded at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PreloadWord {
    /// Byte address presented on the preload address bus.
    pub addr: u32,
    /// Little-endian packed word presented on the preload data bus.
    pub data: u32,
}

/// Ordered sequence of words to preload into device memory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProgramImage {
    words: Vec<PreloadWord>,
}

impl ProgramImage {
    /// Creates an image from an explicit word list.
    pub const fn from_words(words: Vec<PreloadWord>) -> Self {
        Self { words }
    }

    /// Parses the text hex image format.
    ///
    /// The load address starts at 0 until the first `@` line.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidAddress`] for a malformed `@` line,
    /// [`ImageError::InvalidByte`] for a token that is not two hex digits, and
    /// [`ImageError::AddressOverflow`] when a word would land past `0xFFFF_FFFC`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dutsim_core::sim::loader::ProgramImage;
    ///
    /// let image = ProgramImage::parse("@1000\n01 02 03 04\n").unwrap();
    /// assert_eq!(image.words()[0].addr, 0x1000);
    /// assert_eq!(image.words()[0].data, 0x0403_0201);
    /// ```
    pub fn parse(text: &str) -> Result<Self, ImageError> {
        let mut words = Vec::new();
        let mut cursor: u64 = 0;

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(addr) = line.strip_prefix(ADDRESS_MARKER) {
                cursor = u64::from(parse_address(addr.trim(), line_no)?);
                continue;
            }

            let bytes = line
                .split_whitespace()
                .map(|token| parse_byte(token, line_no))
                .collect::<Result<Vec<u8>, _>>()?;

            for chunk in bytes.chunks_exact(BYTES_PER_WORD) {
                let addr =
                    u32::try_from(cursor).map_err(|_| ImageError::AddressOverflow { line: line_no })?;
                words.push(PreloadWord {
                    addr,
                    data: u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]),
                });
                cursor += u64::from(WORD_BYTES);
            }
        }

        Ok(Self { words })
    }

    /// Reads and parses a hex image file.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::Io`] when the file cannot be read, otherwise the
    /// errors of [`ProgramImage::parse`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ImageError> {
        let text = read_to_string(path.as_ref())?;
        Self::parse(&text)
    }

    /// Packs a raw binary into consecutive little-endian words starting at `base`.
    ///
    /// A trailing partial word (1 to 3 bytes) is dropped, matching the hex
    /// generator used to produce images from `objcopy` output.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::AddressOverflow`] (reported as line 0) when the
    /// binary does not fit below the top of the 32-bit address space.
    pub fn from_binary(base: u32, bytes: &[u8]) -> Result<Self, ImageError> {
        let mut words = Vec::with_capacity(bytes.len() / BYTES_PER_WORD);
        let mut addr = u64::from(base);
        for chunk in bytes.chunks_exact(BYTES_PER_WORD) {
            words.push(PreloadWord {
                addr: u32::try_from(addr).map_err(|_| ImageError::AddressOverflow { line: 0 })?,
                data: u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]),
            });
            addr += u64::from(WORD_BYTES);
        }
        Ok(Self { words })
    }

    /// Loads every `PT_LOAD` segment of an ELF executable at its address.
    ///
    /// Each `PT_LOAD` segment's file-backed bytes are placed at its physical
    /// load address (`p_paddr`), the layout `objcopy -O binary` produces.
    /// Bytes are packed little-endian; a segment whose length is not a
    /// multiple of 4 is zero-padded to a whole word.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::Elf`] when the bytes are not a readable ELF file
    /// or a segment lies outside the 32-bit address space.
    pub fn from_elf(bytes: &[u8]) -> Result<Self, ImageError> {
        let words = match FileKind::parse(bytes).map_err(elf_error)? {
            FileKind::Elf32 => load_segments::<elf::FileHeader32<Endianness>>(bytes)?,
            FileKind::Elf64 => load_segments::<elf::FileHeader64<Endianness>>(bytes)?,
            kind => {
                return Err(ImageError::Elf(format!(
                    "unsupported object format {kind:?}"
                )));
            }
        };
        Ok(Self { words })
    }

    /// Loads an image from disk, choosing the format from its contents.
    ///
    /// ELF files are recognized by their magic number; files ending in
    /// `.bin` are packed as raw binaries at `base`; anything else is parsed
    /// as the text hex format.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::Io`] when the file cannot be read, otherwise the
    /// errors of the selected constructor.
    pub fn load(path: impl AsRef<Path>, base: u32) -> Result<Self, ImageError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| ImageError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if bytes.starts_with(b"\x7fELF") {
            Self::from_elf(&bytes)
        } else if path.extension().is_some_and(|ext| ext == "bin") {
            Self::from_binary(base, &bytes)
        } else {
            let text = String::from_utf8_lossy(&bytes);
            Self::parse(&text)
        }
    }

    /// Renders the image in the text hex format.
    ///
    /// An `@` header is written before the first word and before every word
    /// that does not directly follow its predecessor; each word is one line of
    /// four byte tokens.
    pub fn to_hex(&self) -> String {
        let mut out = String::with_capacity(self.words.len() * 12 + 10);
        let mut expected: Option<u32> = None;
        for word in &self.words {
            if expected != Some(word.addr) {
                out.push_str(&format!("{ADDRESS_MARKER}{:08x}\n", word.addr));
            }
            let [b0, b1, b2, b3] = word.data.to_le_bytes();
            out.push_str(&format!("{b0:02x} {b1:02x} {b2:02x} {b3:02x}\n"));
            expected = word.addr.checked_add(WORD_BYTES);
        }
        out
    }

    /// Returns the words in preload order.
    pub fn words(&self) -> &[PreloadWord] {
        &self.words
    }

    /// Returns an iterator over the words in preload order.
    pub fn iter(&self) -> std::slice::Iter<'_, PreloadWord> {
        self.words.iter()
    }

    /// Returns the number of words in the image.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns `true` when the image holds no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<'a> IntoIterator for &'a ProgramImage {
    type Item = &'a PreloadWord;
    type IntoIter = std::slice::Iter<'a, PreloadWord>;

    fn into_iter(self) -> Self::IntoIter {
        self.words.iter()
    }
}

/// Packs the `PT_LOAD` segments of an ELF file by physical address.
fn load_segments<Elf>(bytes: &[u8]) -> Result<Vec<PreloadWord>, ImageError>
where
    Elf: FileHeader<Endian = Endianness>,
{
    let header = Elf::parse(bytes).map_err(elf_error)?;
    let endian = header.endian().map_err(elf_error)?;
    let mut words = Vec::new();

    for phdr in header.program_headers(endian, bytes).map_err(elf_error)? {
        if phdr.p_type(endian) != elf::PT_LOAD {
            continue;
        }
        let data = phdr
            .data(endian, bytes)
            .map_err(|()| ImageError::Elf("segment data lies past end of file".to_string()))?;
        if data.is_empty() {
            continue;
        }
        let paddr: u64 = phdr.p_paddr(endian).into();
        let base = u32::try_from(paddr).map_err(|_| {
            ImageError::Elf(format!(
                "segment at {paddr:#x} is outside the 32-bit address space"
            ))
        })?;

        let mut addr = u64::from(base);
        for chunk in data.chunks(BYTES_PER_WORD) {
            let mut word = [0u8; BYTES_PER_WORD];
            word[..chunk.len()].copy_from_slice(chunk);
            words.push(PreloadWord {
                addr: u32::try_from(addr).map_err(|_| {
                    ImageError::Elf(format!("segment at {base:#x} overflows the address space"))
                })?,
                data: u32::from_le_bytes(word),
            });
            addr += u64::from(WORD_BYTES);
        }
    }

    Ok(words)
}

fn elf_error(err: object::Error) -> ImageError {
    ImageError::Elf(err.to_string())
}

fn read_to_string(path: &Path) -> Result<String, ImageError> {
    fs::read_to_string(path).map_err(|source| ImageError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_address(text: &str, line: usize) -> Result<u32, ImageError> {
    let invalid = || ImageError::InvalidAddress {
        line,
        text: text.to_string(),
    };
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    u32::from_str_radix(text, 16).map_err(|_| invalid())
}

fn parse_byte(token: &str, line: usize) -> Result<u8, ImageError> {
    let invalid = || ImageError::InvalidByte {
        line,
        token: token.to_string(),
    };
    if token.len() != 2 || !token.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    u8::from_str_radix(token, 16).map_err(|_| invalid())
}
