use thiserror::Error;

/// Everything that can go wrong while processing one submission.
///
/// `Auth` and `Recommendation` never abort a submission; they are reported
/// next to the nutrition result instead.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("could not decode image: {0}")]
    Decode(String),

    #[error("no barcode detected in the image")]
    BarcodeNotFound,

    #[error("no product found for barcode {0}")]
    ProductNotFound(String),

    #[error("nutrition lookup failed: {0}")]
    Lookup(String),

    #[error("recommendation failed: {0}")]
    Recommendation(String),

    #[error("{0}")]
    Auth(String),
}
