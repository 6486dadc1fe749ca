pub mod card;
pub mod progress;
pub mod session;

pub use card::{Card, CardStore, Source};
pub use progress::{clamp_box, Grade, KnowledgeFilter, ProgressEntry, ProgressMap};
pub use session::{RecentHistory, SessionRecord};
