pub mod card_selector;
pub mod grading;
pub mod knowledge;

pub use card_selector::{select_next_card, Selection};
pub use grading::grade_card;
pub use knowledge::{classify, counts, KnowledgeCounts};
