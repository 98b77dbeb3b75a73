pub mod approval;
pub mod error;
pub mod session;
pub mod traits;
pub mod types;

pub use approval::{ApprovalBoard, DraftStatus};
pub use error::RestockError;
pub use session::{SessionState, UploadedImage};
pub use traits::{ImageAttachment, LlmProvider, LlmRequest, LlmResponse, ResponseFormat};
pub use types::{
    Channel, ChatHistory, ChatRole, ChatTurn, DraftRecord, DraftSet, DraftSource, ParLevels,
    StockSnapshot,
};
