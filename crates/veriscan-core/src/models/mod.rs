pub mod detection;

pub use detection::{
    resolve_display_filename, user_label_to_flag, DetectResponse, DetectionRecord,
    DetectionSummary, HistoryResponse, NewDetection, DEFAULT_MODEL_VERSION,
};
