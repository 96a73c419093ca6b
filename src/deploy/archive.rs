// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 DriveCorp

//! Virtual folder tree serialized to one gzip-compressed tar blob.
//!
//! Entries are written with fixed GNU headers (mtime 0, uid/gid 0), so the
//! same tree always produces the same bytes. Entry order is insertion
//! order; callers append in the order the manifest should read.

use std::io;
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;
use tar::{Builder, EntryType, Header};

/// Incremental builder for an in-memory archive.
pub struct ArchiveBuilder {
    builder: Builder<GzEncoder<Vec<u8>>>,
}

impl ArchiveBuilder {
    /// Start an empty archive.
    pub fn new() -> Self {
        let encoder = GzEncoder::new(Vec::new(), Compression::default());
        Self {
            builder: Builder::new(encoder),
        }
    }

    /// Append a directory entry.
    pub fn dir(&mut self, path: &str) -> io::Result<()> {
        let mut header = Header::new_gnu();
        header.set_entry_type(EntryType::Directory);
        header.set_mtime(0);
        header.set_uid(0);
        header.set_gid(0);
        header.set_mode(0o755);
        header.set_size(0);
        self.builder
            .append_data(&mut header, Path::new(path), io::empty())
    }

    /// Append a regular file entry with the given payload.
    pub fn file(&mut self, path: &str, payload: &[u8]) -> io::Result<()> {
        let mut header = Header::new_gnu();
        header.set_entry_type(EntryType::Regular);
        header.set_mtime(0);
        header.set_uid(0);
        header.set_gid(0);
        header.set_mode(0o644);
        header.set_size(payload.len() as u64);
        self.builder
            .append_data(&mut header, Path::new(path), payload)
    }

    /// Finish the archive and return the compressed bytes.
    pub fn finish(self) -> io::Result<Vec<u8>> {
        let encoder = self.builder.into_inner()?;
        encoder.finish()
    }
}

impl Default for ArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn build_sample() -> Vec<u8> {
        let mut archive = ArchiveBuilder::new();
        archive.dir("Pkg").unwrap();
        archive.file("Pkg/manifest.txt", b"- a (text)").unwrap();
        archive.dir("Pkg/bin").unwrap();
        archive.file("Pkg/bin/core.exe", b"BINARY_PLACEHOLDER").unwrap();
        archive.finish().unwrap()
    }

    fn entry_paths(bytes: &[u8]) -> Vec<String> {
        let mut archive = tar::Archive::new(GzDecoder::new(bytes));
        archive
            .entries()
            .unwrap()
            .map(|entry| {
                entry
                    .unwrap()
                    .path()
                    .unwrap()
                    .to_string_lossy()
                    .trim_end_matches('/')
                    .to_string()
            })
            .collect()
    }

    #[test]
    fn entries_keep_insertion_order() {
        let bytes = build_sample();
        assert_eq!(
            entry_paths(&bytes),
            vec!["Pkg", "Pkg/manifest.txt", "Pkg/bin", "Pkg/bin/core.exe"]
        );
    }

    #[test]
    fn payloads_round_trip() {
        let bytes = build_sample();
        let mut archive = tar::Archive::new(GzDecoder::new(&bytes[..]));
        for entry in archive.entries().unwrap() {
            let mut entry = entry.unwrap();
            if entry.path().unwrap().ends_with("core.exe") {
                let mut payload = String::new();
                entry.read_to_string(&mut payload).unwrap();
                assert_eq!(payload, "BINARY_PLACEHOLDER");
                return;
            }
        }
        panic!("core.exe entry missing");
    }

    #[test]
    fn identical_trees_produce_identical_bytes() {
        assert_eq!(build_sample(), build_sample());
    }
}
