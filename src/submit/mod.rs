pub mod builder;
pub mod report_model;
pub mod transport;

pub use builder::build_report;
pub use report_model::{AncestorInfo, ElementPayload, FeedbackReport, SelectionPayload};
pub use transport::{HttpTransport, MockTransport, PendingSubmission, SubmissionRequest, Transport};
