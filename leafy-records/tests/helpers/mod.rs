//! Test Helper Utilities
//!
//! Shared utilities for the leafy-records integration tests

#![allow(dead_code)]

pub mod log_capture;

pub use log_capture::LogCapture;

use image::{ImageFormat, RgbImage};
use leafy_common::config::{Endpoints, ImageSearchConfig, LookupConfig};
use std::io::Cursor;
use std::path::PathBuf;
use wiremock::MockServer;

/// ISBN of the French picture book used across fixtures
pub const FR_ISBN: &str = "9782013944762";

/// ISBN of the Open Library fixture
pub const EN_ISBN: &str = "9780738531366";

/// Read a file from `tests/fixtures`
pub fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Missing fixture {}: {}", path.display(), e))
}

/// Lookup config pointing every service at the mock server
pub fn mock_config(server: &MockServer) -> LookupConfig {
    LookupConfig {
        request_timeout_ms: 2_000,
        connect_timeout_ms: 1_000,
        endpoints: Endpoints::all_at(&server.uri()),
        ..Default::default()
    }
}

/// Mock config with image-search credentials
pub fn mock_config_with_search(server: &MockServer) -> LookupConfig {
    LookupConfig {
        image_search: Some(ImageSearchConfig::new("test-key", "test-cx")),
        ..mock_config(server)
    }
}

/// Solid-colour PNG of the given size
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    RgbImage::from_pixel(width, height, image::Rgb([200, 120, 40]))
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("encode PNG");
    bytes
}
