pub mod repository;
pub mod storage;
pub mod types;

pub use repository::{resolve, AnalysisRepository, JsonFileRepository, MemoryRepository};
pub use storage::{get_store_path, load_store, save_store};
pub use types::{StoreState, StoredAnalysis};
