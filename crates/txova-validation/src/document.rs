//! Document and image upload validation
//!
//! Copyright (c) 2025 Txova Team
//! Licensed under the Apache-2.0 license

use crate::validation::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 5 MiB
pub const MAX_DOCUMENT_SIZE: i64 = 5 * 1024 * 1024;
/// 2 MiB
pub const MAX_PROFILE_PHOTO_SIZE: i64 = 2 * 1024 * 1024;

pub const MIN_IMAGE_WIDTH: u32 = 200;
pub const MIN_IMAGE_HEIGHT: u32 = 200;
pub const MAX_IMAGE_WIDTH: u32 = 4096;
pub const MAX_IMAGE_HEIGHT: u32 = 4096;

/// 1:4
pub const MIN_ASPECT_RATIO: f64 = 0.25;
/// 4:1
pub const MAX_ASPECT_RATIO: f64 = 4.0;

const IMAGE_FORMATS: &[&str] = &["jpg", "jpeg", "png"];
const DOCUMENT_FORMATS: &[&str] = &["jpg", "jpeg", "png", "pdf"];

const JPEG_MIME: &[&str] = &["image/jpeg"];
const PNG_MIME: &[&str] = &["image/png"];
const PDF_MIME: &[&str] = &["application/pdf"];

/// Kinds of document a driver or rider can upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    DriverLicense,
    VehicleRegistration,
    Insurance,
    IdCard,
    ProfilePhoto,
    VehiclePhoto,
}

impl DocumentType {
    pub const ALL: [DocumentType; 6] = [
        DocumentType::DriverLicense,
        DocumentType::VehicleRegistration,
        DocumentType::Insurance,
        DocumentType::IdCard,
        DocumentType::ProfilePhoto,
        DocumentType::VehiclePhoto,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::DriverLicense => "driver_license",
            DocumentType::VehicleRegistration => "vehicle_registration",
            DocumentType::Insurance => "insurance",
            DocumentType::IdCard => "id_card",
            DocumentType::ProfilePhoto => "profile_photo",
            DocumentType::VehiclePhoto => "vehicle_photo",
        }
    }

    /// Photos only accept image formats
    pub fn is_image(&self) -> bool {
        matches!(self, DocumentType::ProfilePhoto | DocumentType::VehiclePhoto)
    }

    pub fn max_file_size(&self) -> i64 {
        match self {
            DocumentType::ProfilePhoto => MAX_PROFILE_PHOTO_SIZE,
            _ => MAX_DOCUMENT_SIZE,
        }
    }

    pub fn allowed_formats(&self) -> &'static [&'static str] {
        if self.is_image() {
            IMAGE_FORMATS
        } else {
            DOCUMENT_FORMATS
        }
    }
}

impl FromStr for DocumentType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentType::ALL
            .iter()
            .copied()
            .find(|dt| dt.as_str() == s)
            .ok_or_else(|| {
                ValidationError::invalid_option("document_type", &all_doc_types()).with_value(s)
            })
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wire names of every document type
pub fn all_doc_types() -> Vec<&'static str> {
    DocumentType::ALL.iter().map(DocumentType::as_str).collect()
}

/// Expected MIME types for a file extension
pub fn mime_types(extension: &str) -> Option<&'static [&'static str]> {
    match extension {
        "jpg" | "jpeg" => Some(JPEG_MIME),
        "png" => Some(PNG_MIME),
        "pdf" => Some(PDF_MIME),
        _ => None,
    }
}

fn normalize_extension(extension: &str) -> String {
    extension.trim_start_matches('.').to_lowercase()
}

pub fn validate_doc_type(doc_type: &str) -> Result<(), ValidationError> {
    doc_type.parse::<DocumentType>().map(|_| ())
}

pub fn is_valid_doc_type(doc_type: &str) -> bool {
    validate_doc_type(doc_type).is_ok()
}

/// File size must be positive and within the type's limit
pub fn validate_file_size(size: i64, doc_type: &str) -> Result<(), ValidationError> {
    let max = doc_type.parse::<DocumentType>()?.max_file_size();
    if size > max {
        return Err(ValidationError::out_of_range("file_size", 0, max).with_value(size));
    }
    if size <= 0 {
        return Err(ValidationError::out_of_range("file_size", 1, max).with_value(size));
    }
    Ok(())
}

/// MIME type must match the extension (both case-insensitive)
pub fn validate_mime_type(mime_type: &str, extension: &str) -> Result<(), ValidationError> {
    let ext = normalize_extension(extension);
    let mime = mime_type.trim().to_lowercase();

    let Some(expected) = mime_types(&ext) else {
        return Err(
            ValidationError::invalid_format("extension", "jpg, jpeg, png, or pdf")
                .with_value(extension),
        );
    };

    if expected.contains(&mime.as_str()) {
        return Ok(());
    }
    Err(ValidationError::invalid_format("mime_type", &expected.join(" or ")).with_value(mime_type))
}

pub fn validate_image_dimensions(width: u32, height: u32) -> Result<(), ValidationError> {
    if !(MIN_IMAGE_WIDTH..=MAX_IMAGE_WIDTH).contains(&width) {
        return Err(
            ValidationError::out_of_range("width", MIN_IMAGE_WIDTH, MAX_IMAGE_WIDTH)
                .with_value(width),
        );
    }
    if !(MIN_IMAGE_HEIGHT..=MAX_IMAGE_HEIGHT).contains(&height) {
        return Err(
            ValidationError::out_of_range("height", MIN_IMAGE_HEIGHT, MAX_IMAGE_HEIGHT)
                .with_value(height),
        );
    }
    Ok(())
}

pub fn validate_aspect_ratio(width: u32, height: u32) -> Result<(), ValidationError> {
    if height == 0 {
        return Err(ValidationError::invalid_format("height", "non-zero value"));
    }

    let ratio = f64::from(width) / f64::from(height);
    if !(MIN_ASPECT_RATIO..=MAX_ASPECT_RATIO).contains(&ratio) {
        return Err(ValidationError::out_of_range("aspect_ratio", MIN_ASPECT_RATIO, MAX_ASPECT_RATIO)
            .with_optional_value(serde_json::Number::from_f64(ratio).map(Into::into)));
    }
    Ok(())
}

/// Size, then dimensions, then aspect ratio
pub fn validate_image(
    width: u32,
    height: u32,
    size: i64,
    doc_type: &str,
) -> Result<(), ValidationError> {
    validate_file_size(size, doc_type)?;
    validate_image_dimensions(width, height)?;
    validate_aspect_ratio(width, height)
}

/// Allowed extensions for a document type; empty for unknown types
pub fn allowed_formats(doc_type: &str) -> &'static [&'static str] {
    doc_type
        .parse::<DocumentType>()
        .map(|dt| dt.allowed_formats())
        .unwrap_or(&[])
}

pub fn is_allowed_format(extension: &str, doc_type: &str) -> bool {
    let ext = normalize_extension(extension);
    allowed_formats(doc_type).contains(&ext.as_str())
}

pub fn validate_format(extension: &str, doc_type: &str) -> Result<(), ValidationError> {
    let dt = doc_type.parse::<DocumentType>()?;
    if !is_allowed_format(extension, doc_type) {
        return Err(
            ValidationError::invalid_option("format", dt.allowed_formats()).with_value(extension),
        );
    }
    Ok(())
}

pub fn is_image_type(doc_type: &str) -> bool {
    doc_type.parse::<DocumentType>().map(|dt| dt.is_image()).unwrap_or(false)
}

/// Size limit in bytes; unknown types get the general document limit
pub fn max_file_size(doc_type: &str) -> i64 {
    doc_type
        .parse::<DocumentType>()
        .map(|dt| dt.max_file_size())
        .unwrap_or(MAX_DOCUMENT_SIZE)
}
