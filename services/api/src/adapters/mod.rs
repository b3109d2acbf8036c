pub mod chat_llm;
pub mod csv_store;
pub mod quotes;
pub mod sentiment;

pub use chat_llm::OpenAiChatAdapter;
pub use csv_store::{CsvDeedLog, CsvMoodLog};
pub use quotes::QuoteBook;
pub use sentiment::HttpSentimentAdapter;
