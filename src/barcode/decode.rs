use image::DynamicImage;
use rxing::common::HybridBinarizer;
use rxing::{BarcodeFormat, BinaryBitmap, Luma8LuminanceSource, MultiFormatReader, Reader};
use tracing::{debug, warn};

use crate::error::AnalyzeError;

/// Decode uploaded bytes as an image and scan it for barcode symbols.
///
/// `Ok(None)` means the image is readable but carries no symbol. Bytes that
/// cannot be decoded as pixel data are a recoverable [`AnalyzeError::Decode`].
pub fn decode_image_bytes(bytes: &[u8]) -> Result<Option<String>, AnalyzeError> {
    let image = image::load_from_memory(bytes).map_err(|e| {
        warn!(error = %e, "uploaded bytes are not a decodable image");
        AnalyzeError::Decode(e.to_string())
    })?;
    Ok(scan(&image))
}

fn scan(image: &DynamicImage) -> Option<String> {
    let luma = image.to_luma8();
    let (width, height) = luma.dimensions();
    let source = Luma8LuminanceSource::new(luma.into_raw(), width, height);
    let mut bitmap = BinaryBitmap::new(HybridBinarizer::new(source));
    let mut reader = MultiFormatReader::default();
    // The symbol reported by the reader wins; which one that is on an
    // image with several symbols is up to rxing, not this service.
    match reader.decode(&mut bitmap) {
        Ok(result) => {
            debug!(format = ?result.getBarcodeFormat(), "barcode symbol detected");
            // UPC-A is the leading-zero range of EAN-13; report the full
            // 13-digit form so lookups hit the product database's GTIN keys.
            if result.getBarcodeFormat() == &BarcodeFormat::UPC_A {
                Some(format!("0{}", result.getText()))
            } else {
                Some(result.getText().to_string())
            }
        }
        Err(e) => {
            debug!(error = ?e, "no barcode symbol found");
            None
        }
    }
}
