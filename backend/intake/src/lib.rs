pub mod extract;
pub mod mime;
pub mod ocr;

pub use extract::{Extraction, ExtractionSource, StockExtractor};
pub use mime::ImageFormat;
pub use ocr::OcrService;
