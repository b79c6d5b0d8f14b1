pub mod receipt;

pub use receipt::{NormalizedReceipt, RawExtraction, RawItem, ReceiptItem};
